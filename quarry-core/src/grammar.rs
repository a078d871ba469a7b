use crate::{
    Aggregate, BindingGroup, Boolean, Clauses, Column, Condition, Distinct,
    FullTextOptions, Join, JoinOperand, Order, Predicate, TableRef, Value, separated_by,
};
use std::{collections::BTreeMap, fmt::Debug};

/// One row to insert or the set of columns to update, keys are kept sorted.
pub type Record = BTreeMap<String, Value>;

/// Operators every grammar accepts, matched case-insensitively.
pub const OPERATORS: &[&str] = &[
    "=", "<", ">", "<=", ">=", "<>", "!=", "<=>", "like", "like binary", "not like", "ilike", "in",
    "not in", "all", "and", "any", "between", "exists", "not", "or", "some", "&", "|", "^", "<<",
    ">>", "&~", "is", "is not", "rlike", "not rlike", "regexp", "not regexp", "~", "~*", "!~",
    "!~*", "similar to", "not similar to", "not ilike", "~~*", "!~~*",
];

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Runs `f` after a single space separator, the space is dropped again when `f` writes nothing.
fn write_component(out: &mut String, start: usize, f: impl FnOnce(&mut String)) {
    let len = out.len();
    if len > start {
        out.push(' ');
    }
    let mark = out.len();
    f(out);
    if out.len() == mark {
        out.truncate(len);
    }
}

/// Splits `users as u` into `("users", "u")`.
fn split_alias(value: &str) -> Option<(&str, &str)> {
    let position = value.to_ascii_lowercase().find(" as ")?;
    Some((value[..position].trim(), value[position + 4..].trim()))
}

/// Compiles [`Clauses`] into SQL text.
///
/// Every method has a default implementation producing the generic dialect,
/// drivers override the pieces where their dialect differs. Placeholders are
/// always a single `?` and are emitted in the same order
/// [`Bindings::flatten`](crate::Bindings::flatten) returns the values.
pub trait Grammar: Debug + Send + Sync {
    fn name(&self) -> &'static str {
        "generic"
    }

    /// Prepended to every table name.
    fn table_prefix(&self) -> &str {
        ""
    }

    /// Operators accepted on top of [`OPERATORS`].
    fn special_operators(&self) -> &'static [&'static str] {
        &[]
    }

    fn is_valid_operator(&self, operator: &str) -> bool {
        let operator = operator.to_lowercase();
        OPERATORS.contains(&operator.as_str())
            || self.special_operators().contains(&operator.as_str())
    }

    /// NULL can only be compared with `=`, `<>` or `!=`.
    fn is_illegal_operator_and_value(&self, operator: &str, value: &Value) -> bool {
        value.is_null() && OPERATORS.contains(&operator) && !["=", "<>", "!="].contains(&operator)
    }

    fn supports_full_text(&self) -> bool {
        false
    }

    fn compile_random(&self, _seed: &str) -> String {
        "RANDOM()".into()
    }

    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', r#""""#);
        out.push('"');
    }

    /// Single identifier segment, `*` is left alone.
    fn write_value_wrapped(&self, out: &mut String, value: &str) {
        if value == "*" {
            out.push('*');
        } else {
            self.write_identifier_quoted(out, value);
        }
    }

    /// Table name, optionally schema qualified, with the table prefix applied.
    fn write_table_name(&self, out: &mut String, name: &str) {
        let (schema, table) = match name.rsplit_once('.') {
            Some((schema, table)) => (Some(schema), table),
            None => (None, name),
        };
        if let Some(schema) = schema {
            self.write_value_wrapped(out, schema);
            out.push('.');
        }
        if self.table_prefix().is_empty() {
            self.write_value_wrapped(out, table);
        } else {
            self.write_value_wrapped(out, &format!("{}{}", self.table_prefix(), table));
        }
    }

    /// Column or qualified column, `x as y` becomes `"x" AS "y"`.
    fn write_wrapped(&self, out: &mut String, value: &str, prefix_alias: bool) {
        if let Some((value, alias)) = split_alias(value) {
            self.write_wrapped(out, value, false);
            out.push_str(" AS ");
            if prefix_alias && !self.table_prefix().is_empty() {
                self.write_value_wrapped(out, &format!("{}{}", self.table_prefix(), alias));
            } else {
                self.write_value_wrapped(out, alias);
            }
            return;
        }
        match value.rsplit_once('.') {
            Some((table, column)) => {
                self.write_table_name(out, table);
                out.push('.');
                self.write_value_wrapped(out, column);
            }
            None => self.write_value_wrapped(out, value),
        }
    }

    fn write_column(&self, out: &mut String, column: &Column) {
        match column {
            Column::Name(v) => self.write_wrapped(out, v, false),
            Column::Raw(v) => out.push_str(v.as_str()),
        }
    }

    fn write_columnize(&self, out: &mut String, columns: &[Column]) {
        separated_by(out, columns, |out, v| self.write_column(out, v), ", ");
    }

    fn write_table(&self, out: &mut String, table: &TableRef) {
        match table {
            TableRef::None => {}
            TableRef::Name { name, alias } => {
                let (name, alias) = match (alias.as_deref(), split_alias(name)) {
                    (Some(alias), _) => (name.as_str(), Some(alias)),
                    (None, Some((name, alias))) => (name, Some(alias)),
                    (None, None) => (name.as_str(), None),
                };
                self.write_table_name(out, name);
                if let Some(alias) = alias {
                    out.push_str(" AS ");
                    if self.table_prefix().is_empty() {
                        self.write_value_wrapped(out, alias);
                    } else {
                        self.write_value_wrapped(out, &format!("{}{}", self.table_prefix(), alias));
                    }
                }
            }
            TableRef::Raw(v) => out.push_str(v.as_str()),
        }
    }

    fn write_parameterize(&self, out: &mut String, count: usize) {
        separated_by(out, 0..count, |out, _| out.push('?'), ", ");
    }

    /// Convenience over [`Grammar::write_wrapped`].
    fn wrap(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 4);
        self.write_wrapped(&mut out, value, false);
        out
    }

    fn wrap_table(&self, table: &str) -> String {
        let mut out = String::with_capacity(table.len() + 4);
        self.write_table(&mut out, &table.into());
        out
    }

    fn compile_select(&self, query: &Clauses) -> String {
        let mut out = String::with_capacity(128);
        self.write_select(&mut out, query);
        out
    }

    fn write_select(&self, out: &mut String, query: &Clauses) {
        if (!query.unions.is_empty() || !query.havings.is_empty()) && query.aggregate.is_some() {
            self.write_union_aggregate(out, query);
            return;
        }
        let has_unions = !query.unions.is_empty();
        if has_unions {
            out.push('(');
        }
        self.write_components(out, query);
        if has_unions {
            out.push(')');
            self.write_unions(out, query);
        }
    }

    /// Every group in order, `select` is dropped when an aggregate replaces the columns.
    fn prepare_bindings_for_select(&self, query: &Clauses) -> Vec<Value> {
        let wrapped = !query.unions.is_empty() || !query.havings.is_empty();
        if query.aggregate.is_some() && !wrapped {
            query.bindings.flatten_except(&[BindingGroup::Select])
        } else {
            query.bindings.flatten()
        }
    }

    /// Select components in their fixed order, separated by single spaces.
    fn write_components(&self, out: &mut String, query: &Clauses) {
        let start = out.len();
        if let Some(aggregate) = &query.aggregate {
            write_component(out, start, |out| self.write_aggregate(out, query, aggregate));
        }
        write_component(out, start, |out| self.write_columns(out, query));
        write_component(out, start, |out| self.write_from(out, &query.from));
        write_component(out, start, |out| self.write_joins(out, &query.joins));
        write_component(out, start, |out| self.write_wheres(out, &query.wheres));
        write_component(out, start, |out| self.write_groups(out, &query.groups));
        write_component(out, start, |out| self.write_havings(out, &query.havings));
        write_component(out, start, |out| self.write_orders(out, &query.orders));
        if let Some(limit) = query.limit {
            write_component(out, start, |out| self.write_limit(out, limit));
        }
        if let Some(offset) = query.offset {
            write_component(out, start, |out| self.write_offset(out, offset));
        }
    }

    fn write_aggregate(&self, out: &mut String, query: &Clauses, aggregate: &Aggregate) {
        out.push_str("SELECT ");
        out.push_str(&aggregate.function);
        out.push('(');
        let all = matches!(aggregate.columns.as_slice(), [Column::Name(v)] if v == "*");
        match &query.distinct {
            Distinct::Columns(columns) => {
                out.push_str("DISTINCT ");
                self.write_columnize(out, columns);
            }
            Distinct::All if !all => {
                out.push_str("DISTINCT ");
                self.write_columnize(out, &aggregate.columns);
            }
            _ => self.write_columnize(out, &aggregate.columns),
        }
        out.push_str(") AS aggregate");
    }

    fn write_columns(&self, out: &mut String, query: &Clauses) {
        if query.aggregate.is_some() {
            return;
        }
        out.push_str(if query.distinct.is_distinct() {
            "SELECT DISTINCT "
        } else {
            "SELECT "
        });
        match &query.columns {
            Some(columns) if !columns.is_empty() => self.write_columnize(out, columns),
            _ => out.push('*'),
        }
    }

    fn write_from(&self, out: &mut String, table: &TableRef) {
        if table.is_none() {
            return;
        }
        out.push_str("FROM ");
        self.write_table(out, table);
    }

    fn write_joins(&self, out: &mut String, joins: &[Join]) {
        separated_by(out, joins, |out, v| self.write_join(out, v), " ");
    }

    fn write_join(&self, out: &mut String, join: &Join) {
        out.push_str(join.kind.as_str());
        out.push_str(" JOIN ");
        self.write_table(out, &join.table);
        out.push_str(" ON ");
        self.write_column(out, &join.first);
        out.push(' ');
        out.push_str(&join.operator);
        out.push(' ');
        match &join.second {
            JoinOperand::Column(column) => self.write_column(out, column),
            JoinOperand::Value(..) => out.push('?'),
        }
    }

    /// The leading connector is dropped, a leading negation is kept.
    fn write_conditions(&self, out: &mut String, conditions: &[Condition], having: bool) {
        for (i, condition) in conditions.iter().enumerate() {
            if i > 0 {
                out.push(' ');
                out.push_str(condition.boolean.as_str());
                out.push(' ');
            } else if matches!(condition.boolean, Boolean::AndNot | Boolean::OrNot) {
                out.push_str("not ");
            }
            if having {
                self.write_having_predicate(out, &condition.predicate);
            } else {
                self.write_predicate(out, &condition.predicate);
            }
        }
    }

    fn write_wheres(&self, out: &mut String, wheres: &[Condition]) {
        if wheres.is_empty() {
            return;
        }
        out.push_str("WHERE ");
        self.write_conditions(out, wheres, false);
    }

    fn write_predicate(&self, out: &mut String, predicate: &Predicate) {
        match predicate {
            Predicate::Basic {
                column, operator, ..
            } => {
                self.write_column(out, column);
                out.push(' ');
                self.write_escaped(out, operator, '?', "??");
                out.push_str(" ?");
            }
            Predicate::ColumnCompare {
                first,
                operator,
                second,
            } => {
                self.write_column(out, first);
                out.push(' ');
                out.push_str(operator);
                out.push(' ');
                self.write_column(out, second);
            }
            Predicate::In {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    out.push_str(if *negated { "1 = 1" } else { "0 = 1" });
                    return;
                }
                self.write_column(out, column);
                out.push_str(if *negated { " not in (" } else { " in (" });
                self.write_parameterize(out, values.len());
                out.push(')');
            }
            Predicate::Null { column, negated } => {
                self.write_column(out, column);
                out.push_str(if *negated { " is not null" } else { " is null" });
            }
            Predicate::Raw { sql } => out.push_str(sql),
            Predicate::FullText {
                columns, options, ..
            } => self.write_full_text(out, columns, options),
        }
    }

    /// Only reachable through hand built clauses, the builder rejects full text
    /// predicates on grammars that do not support them.
    fn write_full_text(&self, out: &mut String, _columns: &[Column], _options: &FullTextOptions) {
        log::error!("Full text search is not supported by the {} grammar", self.name());
        out.push_str("0 = 1");
    }

    fn write_groups(&self, out: &mut String, groups: &[Column]) {
        if groups.is_empty() {
            return;
        }
        out.push_str("GROUP BY ");
        self.write_columnize(out, groups);
    }

    fn write_havings(&self, out: &mut String, havings: &[Condition]) {
        if havings.is_empty() {
            return;
        }
        out.push_str("HAVING ");
        self.write_conditions(out, havings, true);
    }

    fn write_having_predicate(&self, out: &mut String, predicate: &Predicate) {
        match predicate {
            Predicate::Basic {
                column, operator, ..
            } => {
                self.write_column(out, column);
                out.push(' ');
                out.push_str(operator);
                out.push_str(" ?");
            }
            Predicate::Null { column, negated } => {
                self.write_column(out, column);
                out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            _ => self.write_predicate(out, predicate),
        }
    }

    fn write_orders(&self, out: &mut String, orders: &[Order]) {
        if orders.is_empty() {
            return;
        }
        out.push_str("ORDER BY ");
        separated_by(
            out,
            orders,
            |out, order| match order {
                Order::Column { column, direction } => {
                    self.write_column(out, column);
                    out.push(' ');
                    out.push_str(direction.as_str());
                }
                Order::Raw(sql) => out.push_str(sql.as_str()),
            },
            ", ",
        );
    }

    fn write_limit(&self, out: &mut String, limit: u64) {
        out.push_str("LIMIT ");
        write_integer!(out, limit);
    }

    fn write_offset(&self, out: &mut String, offset: u64) {
        out.push_str("OFFSET ");
        write_integer!(out, offset);
    }

    fn write_unions(&self, out: &mut String, query: &Clauses) {
        for union in &query.unions {
            out.push_str(if union.all { " UNION ALL (" } else { " UNION (" });
            self.write_select(out, &union.query);
            out.push(')');
        }
        if !query.union_orders.is_empty() {
            out.push(' ');
            self.write_orders(out, &query.union_orders);
        }
        if let Some(limit) = query.union_limit {
            out.push(' ');
            self.write_limit(out, limit);
        }
        if let Some(offset) = query.union_offset {
            out.push(' ');
            self.write_offset(out, offset);
        }
    }

    /// `SELECT fn(col) AS aggregate FROM (<select>) AS "temp_table"`
    fn write_union_aggregate(&self, out: &mut String, query: &Clauses) {
        let mut inner = query.clone();
        let Some(aggregate) = inner.aggregate.take() else {
            self.write_select(out, query);
            return;
        };
        self.write_aggregate(out, query, &aggregate);
        out.push_str(" FROM (");
        self.write_select(out, &inner);
        out.push_str(") AS ");
        self.write_table_name(out, "temp_table");
    }

    fn compile_exists(&self, query: &Clauses) -> String {
        let mut out = String::with_capacity(128);
        out.push_str("SELECT EXISTS(");
        self.write_select(&mut out, query);
        out.push_str(") AS ");
        self.write_value_wrapped(&mut out, "exists");
        out
    }

    /// Columns come from the first record, every record binds its values in key order.
    fn compile_insert(&self, query: &Clauses, records: &[Record]) -> String {
        let mut out = String::with_capacity(128);
        out.push_str("INSERT INTO ");
        self.write_table(&mut out, &query.from);
        let Some(first) = records.first() else {
            self.write_insert_empty(&mut out);
            return out;
        };
        out.push_str(" (");
        separated_by(
            &mut out,
            first.keys(),
            |out, v| self.write_wrapped(out, v, false),
            ", ",
        );
        out.push_str(") VALUES ");
        separated_by(
            &mut out,
            records,
            |out, v| {
                out.push('(');
                self.write_parameterize(out, v.len());
                out.push(')');
            },
            ", ",
        );
        out
    }

    fn write_insert_empty(&self, out: &mut String) {
        out.push_str(" DEFAULT VALUES");
    }

    fn compile_update(&self, query: &Clauses, values: &Record) -> String {
        let mut out = String::with_capacity(128);
        out.push_str("UPDATE ");
        self.write_table(&mut out, &query.from);
        let start = 0;
        if !query.joins.is_empty() {
            write_component(&mut out, start, |out| self.write_joins(out, &query.joins));
        }
        out.push_str(" SET ");
        separated_by(
            &mut out,
            values.keys(),
            |out, v| {
                self.write_wrapped(out, v, false);
                out.push_str(" = ?");
            },
            ", ",
        );
        write_component(&mut out, start, |out| self.write_wheres(out, &query.wheres));
        if query.joins.is_empty() {
            self.write_update_tail(&mut out, query);
        }
        out
    }

    /// Trailing clauses of an `UPDATE` without joins.
    fn write_update_tail(&self, _out: &mut String, _query: &Clauses) {}

    /// Whether the `UPDATE`/`DELETE` tail writes the `ORDER BY` clause of `query`.
    fn writes_mutation_orders(&self, _query: &Clauses) -> bool {
        false
    }

    /// Only the groups the statement writes: `from`, `join`, the new values,
    /// `where`, then `order` when the tail emits it.
    fn prepare_bindings_for_update(&self, query: &Clauses, values: &Record) -> Vec<Value> {
        let bindings = &query.bindings;
        let mut result = bindings.get(BindingGroup::From).to_vec();
        result.extend_from_slice(bindings.get(BindingGroup::Join));
        result.extend(values.values().cloned().map(|v| self.prepare_update_value(v)));
        result.extend_from_slice(bindings.get(BindingGroup::Where));
        if self.writes_mutation_orders(query) {
            result.extend_from_slice(bindings.get(BindingGroup::Order));
        }
        result
    }

    fn prepare_update_value(&self, value: Value) -> Value {
        value
    }

    fn compile_delete(&self, query: &Clauses) -> String {
        let mut table = String::new();
        self.write_table(&mut table, &query.from);
        let mut out = String::with_capacity(128);
        let start = 0;
        if query.joins.is_empty() {
            out.push_str("DELETE FROM ");
            out.push_str(&table);
            write_component(&mut out, start, |out| self.write_wheres(out, &query.wheres));
            self.write_delete_tail(&mut out, query);
        } else {
            let alias = table.rsplit(" AS ").next().unwrap_or(&table);
            out.push_str("DELETE ");
            out.push_str(alias);
            out.push_str(" FROM ");
            out.push_str(&table);
            write_component(&mut out, start, |out| self.write_joins(out, &query.joins));
            write_component(&mut out, start, |out| self.write_wheres(out, &query.wheres));
        }
        out
    }

    /// Trailing clauses of a `DELETE` without joins.
    fn write_delete_tail(&self, _out: &mut String, _query: &Clauses) {}

    fn prepare_bindings_for_delete(&self, query: &Clauses) -> Vec<Value> {
        let bindings = &query.bindings;
        let mut result = bindings.get(BindingGroup::From).to_vec();
        result.extend_from_slice(bindings.get(BindingGroup::Join));
        result.extend_from_slice(bindings.get(BindingGroup::Where));
        if self.writes_mutation_orders(query) {
            result.extend_from_slice(bindings.get(BindingGroup::Order));
        }
        result
    }
}

/// Grammar of the generic dialect: double quoted identifiers and no extensions.
#[derive(Default, Debug, Clone)]
pub struct GenericGrammar {
    table_prefix: String,
}

impl GenericGrammar {
    pub const fn new() -> Self {
        Self {
            table_prefix: String::new(),
        }
    }
    pub fn with_table_prefix(prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: prefix.into(),
        }
    }
}

impl Grammar for GenericGrammar {
    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }
}
