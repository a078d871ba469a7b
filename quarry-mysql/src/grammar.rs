use quarry_core::{Clauses, Column, FullTextMode, FullTextOptions, Grammar, Value};

/// MySQL dialect: backtick quoting, `RAND(seed)`, full text search and
/// `ORDER BY`/`LIMIT` on single table updates and deletes.
#[derive(Default, Debug, Clone)]
pub struct MySqlGrammar {
    table_prefix: String,
}

impl MySqlGrammar {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_table_prefix(prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: prefix.into(),
        }
    }
}

impl Grammar for MySqlGrammar {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn special_operators(&self) -> &'static [&'static str] {
        &["sounds like"]
    }

    fn supports_full_text(&self) -> bool {
        true
    }

    fn compile_random(&self, seed: &str) -> String {
        format!("RAND({seed})")
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(out, value, '`', "``");
        out.push('`');
    }

    fn write_full_text(&self, out: &mut String, columns: &[Column], options: &FullTextOptions) {
        out.push_str("match (");
        self.write_columnize(out, columns);
        out.push_str(") against (?");
        match options.mode {
            FullTextMode::Boolean => out.push_str(" in boolean mode"),
            FullTextMode::NaturalLanguage => {
                out.push_str(" in natural language mode");
                if options.expanded {
                    out.push_str(" with query expansion");
                }
            }
        }
        out.push(')');
    }

    fn write_insert_empty(&self, out: &mut String) {
        out.push_str(" () VALUES ()");
    }

    fn write_update_tail(&self, out: &mut String, query: &Clauses) {
        self.write_order_and_limit(out, query);
    }

    fn write_delete_tail(&self, out: &mut String, query: &Clauses) {
        self.write_order_and_limit(out, query);
    }

    fn writes_mutation_orders(&self, query: &Clauses) -> bool {
        query.joins.is_empty()
    }

    /// Lists are stored as JSON.
    fn prepare_update_value(&self, value: Value) -> Value {
        if value.is_list() {
            Value::Varchar(Some(value.to_json().to_string()))
        } else {
            value
        }
    }
}

impl MySqlGrammar {
    fn write_order_and_limit(&self, out: &mut String, query: &Clauses) {
        if !query.orders.is_empty() {
            out.push(' ');
            self.write_orders(out, &query.orders);
        }
        if let Some(limit) = query.limit {
            out.push(' ');
            self.write_limit(out, limit);
        }
    }
}
