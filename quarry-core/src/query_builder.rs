use crate::{
    Aggregate, AsValue, BindingGroup, Boolean, Clauses, Collection, Column, Condition, Connection,
    DatabaseError, Direction, Distinct, Error, Expression, FullTextOptions, Grammar, IntoColumns,
    Join, JoinOperand, JoinType, Order, Predicate, Record, Result, RowLabeled, TableRef, Union,
    Value,
};
use std::{fmt, sync::Arc};

/// Fluent builder of one statement.
///
/// Constraint methods consume and return the builder, the ones that can reject
/// their input return a [`Result`]. Terminal methods borrow the builder and run
/// the compiled statement on the given [`Connection`], so the same builder can
/// be executed again.
///
/// ```ignore
/// let rows = connection
///     .table("users")
///     .where_("votes", ">", 100)?
///     .order_by("name", "asc")?
///     .get(&mut connection)?;
/// ```
#[derive(Clone)]
pub struct QueryBuilder {
    grammar: Arc<dyn Grammar>,
    clauses: Clauses,
}

impl QueryBuilder {
    pub fn new(grammar: Arc<dyn Grammar>) -> Self {
        Self {
            grammar,
            clauses: Clauses::default(),
        }
    }

    pub fn grammar(&self) -> &Arc<dyn Grammar> {
        &self.grammar
    }

    pub fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    pub fn into_clauses(self) -> Clauses {
        self.clauses
    }

    pub fn raw(&self, sql: impl Into<String>) -> Expression {
        Expression::new(sql)
    }

    /// Replaces the selected columns.
    pub fn select(mut self, columns: impl IntoColumns) -> Self {
        self.clauses.columns = Some(columns.into_columns());
        self.clauses.bindings.clear(BindingGroup::Select);
        self
    }

    pub fn add_select(mut self, columns: impl IntoColumns) -> Self {
        self.clauses
            .columns
            .get_or_insert_with(Vec::new)
            .extend(columns.into_columns());
        self
    }

    pub fn select_raw(mut self, sql: impl Into<String>, bindings: &[Value]) -> Self {
        self.clauses
            .columns
            .get_or_insert_with(Vec::new)
            .push(Column::Raw(Expression::new(sql)));
        self.add_bindings(BindingGroup::Select, bindings.iter().cloned());
        self
    }

    pub fn distinct(mut self) -> Self {
        self.clauses.distinct = Distinct::All;
        self
    }

    /// Distinct over explicit columns, aggregates compile them as `COUNT(DISTINCT a, b)`.
    pub fn distinct_on(mut self, columns: impl IntoColumns) -> Self {
        self.clauses.distinct = Distinct::Columns(columns.into_columns());
        self
    }

    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.clauses.from = table.into();
        self
    }

    pub fn from_as(mut self, table: impl Into<String>, alias: impl Into<String>) -> Self {
        self.clauses.from = TableRef::Name {
            name: table.into(),
            alias: Some(alias.into()),
        };
        self
    }

    pub fn from_raw(mut self, sql: impl Into<String>, bindings: &[Value]) -> Self {
        self.clauses.from = TableRef::Raw(Expression::new(sql));
        self.add_bindings(BindingGroup::From, bindings.iter().cloned());
        self
    }

    /// `INNER JOIN table ON first operator second`
    pub fn join(
        self,
        table: impl Into<TableRef>,
        first: impl Into<Column>,
        operator: &str,
        second: impl Into<Column>,
    ) -> Self {
        self.join_with(JoinType::Inner, table, first, operator, second)
    }

    pub fn left_join(
        self,
        table: impl Into<TableRef>,
        first: impl Into<Column>,
        operator: &str,
        second: impl Into<Column>,
    ) -> Self {
        self.join_with(JoinType::Left, table, first, operator, second)
    }

    pub fn right_join(
        self,
        table: impl Into<TableRef>,
        first: impl Into<Column>,
        operator: &str,
        second: impl Into<Column>,
    ) -> Self {
        self.join_with(JoinType::Right, table, first, operator, second)
    }

    pub fn join_with(
        mut self,
        kind: JoinType,
        table: impl Into<TableRef>,
        first: impl Into<Column>,
        operator: &str,
        second: impl Into<Column>,
    ) -> Self {
        self.clauses.joins.push(Join {
            kind,
            table: table.into(),
            first: first.into(),
            operator: operator.into(),
            second: JoinOperand::Column(second.into()),
        });
        self
    }

    /// Joins comparing `first` with a bound value instead of another column.
    pub fn join_where(
        mut self,
        table: impl Into<TableRef>,
        first: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Self {
        let value = value.into().first_scalar();
        self.clauses.bindings.push(BindingGroup::Join, value.clone());
        self.clauses.joins.push(Join {
            kind: JoinType::Inner,
            table: table.into(),
            first: first.into(),
            operator: operator.into(),
            second: JoinOperand::Value(value),
        });
        self
    }

    fn push_where(&mut self, boolean: Boolean, predicate: Predicate) {
        self.clauses.wheres.push(Condition { boolean, predicate });
    }

    fn add_bindings(&mut self, group: BindingGroup, values: impl IntoIterator<Item = Value>) {
        self.clauses
            .bindings
            .extend(group, values.into_iter().flat_map(Value::flatten));
    }

    /// Resolves the operator of a basic predicate.
    ///
    /// NULL compared with an ordering operator is an error, an unknown
    /// operator is taken as the value and compared with `=`.
    fn prepare_value_and_operator(&self, operator: &str, value: Value) -> Result<(String, Value)> {
        if self.grammar.is_illegal_operator_and_value(operator, &value) {
            return Err(DatabaseError::IllegalOperatorAndValue {
                operator: operator.into(),
            }
            .into());
        }
        if self.grammar.is_valid_operator(operator) {
            Ok((operator.to_string(), value))
        } else {
            Ok(("=".into(), Value::Varchar(Some(operator.into()))))
        }
    }

    /// Core of every basic `where`, NULL values turn into `is [not] null`.
    pub fn where_with(
        mut self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
        boolean: Boolean,
    ) -> Result<Self> {
        let value = value.into().first_scalar();
        let (operator, value) = self.prepare_value_and_operator(operator, value)?;
        if value.is_null() {
            let negated = operator != "=";
            self.push_where(
                boolean,
                Predicate::Null {
                    column: column.into(),
                    negated,
                },
            );
            return Ok(self);
        }
        self.clauses.bindings.push(BindingGroup::Where, value.clone());
        self.push_where(
            boolean,
            Predicate::Basic {
                column: column.into(),
                operator,
                value,
            },
        );
        Ok(self)
    }

    pub fn where_(
        self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.where_with(column, operator, value, Boolean::And)
    }

    pub fn or_where(
        self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.where_with(column, operator, value, Boolean::Or)
    }

    pub fn where_not(
        self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.where_with(column, operator, value, Boolean::AndNot)
    }

    pub fn or_where_not(
        self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.where_with(column, operator, value, Boolean::OrNot)
    }

    fn where_eq_with(
        mut self,
        column: impl Into<Column>,
        value: impl Into<Value>,
        boolean: Boolean,
    ) -> Self {
        let value = value.into().first_scalar();
        if value.is_null() {
            self.push_where(
                boolean,
                Predicate::Null {
                    column: column.into(),
                    negated: false,
                },
            );
            return self;
        }
        self.clauses.bindings.push(BindingGroup::Where, value.clone());
        self.push_where(
            boolean,
            Predicate::Basic {
                column: column.into(),
                operator: "=".into(),
                value,
            },
        );
        self
    }

    /// `column = ?`, or `column is null` for a NULL value.
    pub fn where_eq(self, column: impl Into<Column>, value: impl Into<Value>) -> Self {
        self.where_eq_with(column, value, Boolean::And)
    }

    pub fn or_where_eq(self, column: impl Into<Column>, value: impl Into<Value>) -> Self {
        self.where_eq_with(column, value, Boolean::Or)
    }

    fn where_column_with(
        mut self,
        first: impl Into<Column>,
        operator: &str,
        second: impl Into<Column>,
        boolean: Boolean,
    ) -> Self {
        let (operator, second) = if self.grammar.is_valid_operator(operator) {
            (operator.to_string(), second.into())
        } else {
            log::warn!(
                "`{}` is not a valid operator, comparing with `=` against it as a column",
                operator
            );
            ("=".to_string(), Column::from(operator))
        };
        self.push_where(
            boolean,
            Predicate::ColumnCompare {
                first: first.into(),
                operator,
                second,
            },
        );
        self
    }

    /// Compares two columns, nothing is bound.
    pub fn where_column(
        self,
        first: impl Into<Column>,
        operator: &str,
        second: impl Into<Column>,
    ) -> Self {
        self.where_column_with(first, operator, second, Boolean::And)
    }

    pub fn or_where_column(
        self,
        first: impl Into<Column>,
        operator: &str,
        second: impl Into<Column>,
    ) -> Self {
        self.where_column_with(first, operator, second, Boolean::Or)
    }

    /// `column [not] in (...)`, list values are expanded.
    pub fn where_in_with<V: Into<Value>>(
        mut self,
        column: impl Into<Column>,
        values: impl IntoIterator<Item = V>,
        boolean: Boolean,
        negated: bool,
    ) -> Self {
        let values: Vec<Value> = values
            .into_iter()
            .flat_map(|v| v.into().flatten())
            .collect();
        self.clauses
            .bindings
            .extend(BindingGroup::Where, values.iter().cloned());
        self.push_where(
            boolean,
            Predicate::In {
                column: column.into(),
                values,
                negated,
            },
        );
        self
    }

    pub fn where_in<V: Into<Value>>(
        self,
        column: impl Into<Column>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_in_with(column, values, Boolean::And, false)
    }

    pub fn or_where_in<V: Into<Value>>(
        self,
        column: impl Into<Column>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_in_with(column, values, Boolean::Or, false)
    }

    pub fn where_not_in<V: Into<Value>>(
        self,
        column: impl Into<Column>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_in_with(column, values, Boolean::And, true)
    }

    pub fn or_where_not_in<V: Into<Value>>(
        self,
        column: impl Into<Column>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_in_with(column, values, Boolean::Or, true)
    }

    /// One `is [not] null` predicate per column.
    pub fn where_null_with(mut self, columns: impl IntoColumns, boolean: Boolean, negated: bool) -> Self {
        for column in columns.into_columns() {
            self.push_where(boolean, Predicate::Null { column, negated });
        }
        self
    }

    pub fn where_null(self, columns: impl IntoColumns) -> Self {
        self.where_null_with(columns, Boolean::And, false)
    }

    pub fn or_where_null(self, columns: impl IntoColumns) -> Self {
        self.where_null_with(columns, Boolean::Or, false)
    }

    pub fn where_not_null(self, columns: impl IntoColumns) -> Self {
        self.where_null_with(columns, Boolean::And, true)
    }

    pub fn or_where_not_null(self, columns: impl IntoColumns) -> Self {
        self.where_null_with(columns, Boolean::Or, true)
    }

    pub fn where_raw(mut self, sql: impl Into<String>, bindings: &[Value]) -> Self {
        self.push_where(Boolean::And, Predicate::Raw { sql: sql.into() });
        self.add_bindings(BindingGroup::Where, bindings.iter().cloned());
        self
    }

    pub fn or_where_raw(mut self, sql: impl Into<String>, bindings: &[Value]) -> Self {
        self.push_where(Boolean::Or, Predicate::Raw { sql: sql.into() });
        self.add_bindings(BindingGroup::Where, bindings.iter().cloned());
        self
    }

    /// Full text match, only on grammars supporting it.
    pub fn where_full_text(
        mut self,
        columns: impl IntoColumns,
        value: impl Into<Value>,
        options: FullTextOptions,
    ) -> Result<Self> {
        if !self.grammar.supports_full_text() {
            return Err(DatabaseError::Unsupported {
                feature: "Full text search",
                grammar: self.grammar.name(),
            }
            .into());
        }
        let value = value.into().first_scalar();
        self.clauses.bindings.push(BindingGroup::Where, value.clone());
        self.push_where(
            Boolean::And,
            Predicate::FullText {
                columns: columns.into_columns(),
                value,
                options,
            },
        );
        Ok(self)
    }

    pub fn group_by(mut self, columns: impl IntoColumns) -> Self {
        self.clauses.groups.extend(columns.into_columns());
        self
    }

    pub fn group_by_raw(mut self, sql: impl Into<String>, bindings: &[Value]) -> Self {
        self.clauses.groups.push(Column::Raw(Expression::new(sql)));
        self.add_bindings(BindingGroup::GroupBy, bindings.iter().cloned());
        self
    }

    pub fn having_with(
        mut self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
        boolean: Boolean,
    ) -> Result<Self> {
        let (operator, value) = self.prepare_value_and_operator(operator, value.into())?;
        let value = value.first_scalar();
        self.clauses.bindings.push(BindingGroup::Having, value.clone());
        self.clauses.havings.push(Condition {
            boolean,
            predicate: Predicate::Basic {
                column: column.into(),
                operator,
                value,
            },
        });
        Ok(self)
    }

    pub fn having(
        self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.having_with(column, operator, value, Boolean::And)
    }

    pub fn or_having(
        self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self> {
        self.having_with(column, operator, value, Boolean::Or)
    }

    fn having_null_with(mut self, columns: impl IntoColumns, boolean: Boolean, negated: bool) -> Self {
        for column in columns.into_columns() {
            self.clauses.havings.push(Condition {
                boolean,
                predicate: Predicate::Null { column, negated },
            });
        }
        self
    }

    pub fn having_null(self, columns: impl IntoColumns) -> Self {
        self.having_null_with(columns, Boolean::And, false)
    }

    pub fn or_having_null(self, columns: impl IntoColumns) -> Self {
        self.having_null_with(columns, Boolean::Or, false)
    }

    pub fn having_not_null(self, columns: impl IntoColumns) -> Self {
        self.having_null_with(columns, Boolean::And, true)
    }

    pub fn or_having_not_null(self, columns: impl IntoColumns) -> Self {
        self.having_null_with(columns, Boolean::Or, true)
    }

    fn having_raw_with(mut self, sql: impl Into<String>, bindings: &[Value], boolean: Boolean) -> Self {
        self.clauses.havings.push(Condition {
            boolean,
            predicate: Predicate::Raw { sql: sql.into() },
        });
        self.add_bindings(BindingGroup::Having, bindings.iter().cloned());
        self
    }

    pub fn having_raw(self, sql: impl Into<String>, bindings: &[Value]) -> Self {
        self.having_raw_with(sql, bindings, Boolean::And)
    }

    pub fn or_having_raw(self, sql: impl Into<String>, bindings: &[Value]) -> Self {
        self.having_raw_with(sql, bindings, Boolean::Or)
    }

    /// Orders added after a union apply to the union.
    fn push_order(&mut self, order: Order) {
        if self.clauses.unions.is_empty() {
            self.clauses.orders.push(order);
        } else {
            self.clauses.union_orders.push(order);
        }
    }

    /// Direction is `asc` or `desc`, case-insensitive.
    pub fn order_by(mut self, column: impl Into<Column>, direction: &str) -> Result<Self> {
        let direction = direction.parse::<Direction>()?;
        self.push_order(Order::Column {
            column: column.into(),
            direction,
        });
        Ok(self)
    }

    pub fn order_by_desc(mut self, column: impl Into<Column>) -> Self {
        self.push_order(Order::Column {
            column: column.into(),
            direction: Direction::Desc,
        });
        self
    }

    /// Newest first by `created_at`.
    pub fn latest(self) -> Self {
        self.order_by_desc("created_at")
    }

    pub fn latest_by(self, column: impl Into<Column>) -> Self {
        self.order_by_desc(column)
    }

    /// Oldest first by `created_at`.
    pub fn oldest(self) -> Self {
        self.oldest_by("created_at")
    }

    pub fn oldest_by(mut self, column: impl Into<Column>) -> Self {
        self.push_order(Order::Column {
            column: column.into(),
            direction: Direction::Asc,
        });
        self
    }

    pub fn order_by_raw(mut self, sql: impl Into<String>, bindings: &[Value]) -> Self {
        let group = if self.clauses.unions.is_empty() {
            BindingGroup::Order
        } else {
            BindingGroup::UnionOrder
        };
        self.push_order(Order::Raw(Expression::new(sql)));
        self.add_bindings(group, bindings.iter().cloned());
        self
    }

    pub fn in_random_order(self, seed: &str) -> Self {
        let sql = self.grammar.compile_random(seed);
        self.order_by_raw(sql, &[])
    }

    /// Negative values are ignored.
    pub fn limit(mut self, value: i64) -> Self {
        if let Ok(value) = u64::try_from(value) {
            if self.clauses.unions.is_empty() {
                self.clauses.limit = Some(value);
            } else {
                self.clauses.union_limit = Some(value);
            }
        }
        self
    }

    /// Negative values count as zero.
    pub fn offset(mut self, value: i64) -> Self {
        let value = value.max(0) as u64;
        if self.clauses.unions.is_empty() {
            self.clauses.offset = Some(value);
        } else {
            self.clauses.union_offset = Some(value);
        }
        self
    }

    /// Page `page` (starting from 1) of `per_page` rows.
    pub fn for_page(self, page: i64, per_page: i64) -> Self {
        self.offset(page.saturating_sub(1).saturating_mul(per_page))
            .limit(per_page)
    }

    pub fn union(self, query: QueryBuilder) -> Self {
        self.union_with(query, false)
    }

    pub fn union_all(self, query: QueryBuilder) -> Self {
        self.union_with(query, true)
    }

    fn union_with(mut self, query: QueryBuilder, all: bool) -> Self {
        let bindings = query.bindings();
        self.clauses.bindings.extend(BindingGroup::Union, bindings);
        self.clauses.unions.push(Union {
            query: Box::new(query.clauses),
            all,
        });
        self
    }

    /// Adds bindings to the group named `group`, `where` or `unionOrder` for instance.
    pub fn add_binding(mut self, value: impl Into<Value>, group: &str) -> Result<Self> {
        let group = group.parse::<BindingGroup>()?;
        self.add_bindings(group, [value.into()]);
        Ok(self)
    }

    /// Sets the aggregate, orders are dropped unless the query is grouped.
    pub fn set_aggregate(mut self, function: impl Into<String>, columns: impl IntoColumns) -> Self {
        self.clauses.aggregate = Some(Aggregate {
            function: function.into(),
            columns: columns.into_columns(),
        });
        if self.clauses.groups.is_empty() {
            self.clauses.orders.clear();
            self.clauses.bindings.clear(BindingGroup::Order);
        }
        self
    }

    pub fn to_sql(&self) -> String {
        self.grammar.compile_select(&self.clauses)
    }

    /// Every binding, in placeholder order.
    pub fn bindings(&self) -> Vec<Value> {
        self.grammar.prepare_bindings_for_select(&self.clauses)
    }

    /// Statement with the bindings interpolated, meant for logs only.
    pub fn to_raw_sql(&self) -> String {
        let sql = self.to_sql();
        let mut bindings = self.bindings().into_iter();
        let mut out = String::with_capacity(sql.len() + 16);
        let mut chars = sql.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '?' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'?') {
                chars.next();
                out.push_str("??");
                continue;
            }
            match bindings.next() {
                Some(v) if v.is_integer() => out.push_str(&v.to_string()),
                Some(v) => {
                    out.push('\'');
                    out.push_str(&v.to_string());
                    out.push('\'');
                }
                None => out.push('?'),
            }
        }
        out
    }

    /// Runs the select.
    pub fn get(&self, connection: &mut Connection) -> Result<Collection<RowLabeled>> {
        let rows = connection.select(&self.to_sql(), &self.bindings())?;
        Ok(rows.into())
    }

    /// Runs the select with `columns` when no column was selected yet.
    pub fn get_columns(
        &self,
        connection: &mut Connection,
        columns: impl IntoColumns,
    ) -> Result<Collection<RowLabeled>> {
        if self.clauses.columns.is_some() {
            return self.get(connection);
        }
        let mut query = self.clone();
        query.clauses.columns = Some(columns.into_columns());
        query.get(connection)
    }

    pub fn first(&self, connection: &mut Connection) -> Result<Option<RowLabeled>> {
        Ok(self.clone().limit(1).get(connection)?.into_iter().next())
    }

    pub fn first_columns(
        &self,
        connection: &mut Connection,
        columns: impl IntoColumns,
    ) -> Result<Option<RowLabeled>> {
        Ok(self
            .clone()
            .limit(1)
            .get_columns(connection, columns)?
            .into_iter()
            .next())
    }

    /// Row whose `id` equals `id`.
    pub fn find(&self, connection: &mut Connection, id: impl Into<Value>) -> Result<Option<RowLabeled>> {
        self.clone().where_eq("id", id).first(connection)
    }

    /// First column of the first row.
    pub fn value(&self, connection: &mut Connection, column: impl Into<Column>) -> Result<Option<Value>> {
        let row = self.first_columns(connection, [column.into()])?;
        Ok(row.and_then(|v| v.values.into_vec().into_iter().next()))
    }

    pub fn exists(&self, connection: &mut Connection) -> Result<bool> {
        let sql = self.grammar.compile_exists(&self.clauses);
        let rows = connection.select(&sql, &self.bindings())?;
        Ok(rows
            .first()
            .and_then(|v| v.get_column_ignore_case("exists"))
            .is_some_and(is_truthy))
    }

    pub fn doesnt_exist(&self, connection: &mut Connection) -> Result<bool> {
        Ok(!self.exists(connection)?)
    }

    /// Runs `function(columns)`, `NULL` when the query returns no row.
    pub fn aggregate(
        &self,
        connection: &mut Connection,
        function: &str,
        columns: impl IntoColumns,
    ) -> Result<Value> {
        let query = self.clone().set_aggregate(function.to_uppercase(), columns);
        let rows = query.get(connection)?;
        Ok(rows
            .first()
            .and_then(|v| v.get_column_ignore_case("aggregate"))
            .cloned()
            .unwrap_or_default())
    }

    pub fn count(&self, connection: &mut Connection) -> Result<i64> {
        self.count_columns(connection, "*")
    }

    pub fn count_columns(&self, connection: &mut Connection, columns: impl IntoColumns) -> Result<i64> {
        let value = self.aggregate(connection, "count", columns)?;
        if value.is_null() {
            return Ok(0);
        }
        i64::try_from_value(value)
    }

    pub fn min(&self, connection: &mut Connection, column: impl Into<Column>) -> Result<Value> {
        self.aggregate(connection, "min", [column.into()])
    }

    pub fn max(&self, connection: &mut Connection, column: impl Into<Column>) -> Result<Value> {
        self.aggregate(connection, "max", [column.into()])
    }

    /// Zero when there is nothing to sum.
    pub fn sum(&self, connection: &mut Connection, column: impl Into<Column>) -> Result<Value> {
        let value = self.aggregate(connection, "sum", [column.into()])?;
        Ok(if value.is_null() {
            Value::Int64(Some(0))
        } else {
            value
        })
    }

    pub fn avg(&self, connection: &mut Connection, column: impl Into<Column>) -> Result<Value> {
        self.aggregate(connection, "avg", [column.into()])
    }

    /// Inserts every record, all of them must have the same columns.
    ///
    /// Nothing is sent for an empty batch, a batch of empty records inserts a
    /// single row of defaults.
    pub fn insert(&self, connection: &mut Connection, records: Vec<Record>) -> Result<bool> {
        if records.is_empty() {
            return Ok(true);
        }
        if records.iter().all(Record::is_empty) {
            let sql = self.grammar.compile_insert(&self.clauses, &[]);
            return connection.insert(&sql, &[]);
        }
        if let Some(first) = records.first() {
            for record in &records[1..] {
                if !first.keys().eq(record.keys()) {
                    return Err(Error::new(DatabaseError::InconsistentInsertColumns {
                        expected: column_list(first),
                        found: column_list(record),
                    }));
                }
            }
        }
        let sql = self.grammar.compile_insert(&self.clauses, &records);
        let bindings: Vec<Value> = records.into_iter().flat_map(Record::into_values).collect();
        connection.insert(&sql, &bindings)
    }

    /// Updates the matching rows, returns how many were affected.
    pub fn update(&self, connection: &mut Connection, values: Record) -> Result<u64> {
        if values.is_empty() {
            log::warn!("Update without any column to set, nothing is sent");
            return Ok(0);
        }
        let sql = self.grammar.compile_update(&self.clauses, &values);
        let bindings = self
            .grammar
            .prepare_bindings_for_update(&self.clauses, &values);
        connection.update(&sql, &bindings)
    }

    /// Deletes the matching rows, returns how many were affected.
    pub fn delete(&self, connection: &mut Connection) -> Result<u64> {
        let sql = self.grammar.compile_delete(&self.clauses);
        let bindings = self.grammar.prepare_bindings_for_delete(&self.clauses);
        connection.delete(&sql, &bindings)
    }

    pub fn delete_by_id(&self, connection: &mut Connection, id: impl Into<Value>) -> Result<u64> {
        self.clone().where_eq("id", id).delete(connection)
    }
}

fn column_list(record: &Record) -> String {
    let mut out = String::new();
    crate::separated_by(&mut out, record.keys(), |out, v| out.push_str(v), ", ");
    out
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Boolean(Some(v)) => *v,
        Value::Varchar(Some(v)) => !v.is_empty() && v != "0",
        v => v.as_integer().is_some_and(|v| v != 0),
    }
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("grammar", &self.grammar.name())
            .field("clauses", &self.clauses)
            .finish()
    }
}
