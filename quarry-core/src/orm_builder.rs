use crate::{
    Collection, Column, Connection, DatabaseError, IntoColumns, Model, ModelDefinition,
    QueryBuilder, Record, Result, RowLabeled, TableRef, Value,
};
use std::sync::Arc;

/// Query over the table of one model, returning hydrated models.
///
/// Constraint methods forward to the wrapped [`QueryBuilder`], use
/// [`OrmBuilder::map_query`] for the ones not forwarded.
#[derive(Debug, Clone)]
pub struct OrmBuilder {
    query: QueryBuilder,
    definition: Arc<ModelDefinition>,
}

macro_rules! forward {
    ($(
        $(#[$meta:meta])*
        fn $name:ident($($arg:ident: $ty:ty),*);
    )*) => {
        $(
            $(#[$meta])*
            pub fn $name(self, $($arg: $ty),*) -> Self {
                Self {
                    query: self.query.$name($($arg),*),
                    definition: self.definition,
                }
            }
        )*
    };
}

macro_rules! try_forward {
    ($(
        $(#[$meta:meta])*
        fn $name:ident($($arg:ident: $ty:ty),*);
    )*) => {
        $(
            $(#[$meta])*
            pub fn $name(self, $($arg: $ty),*) -> Result<Self> {
                Ok(Self {
                    query: self.query.$name($($arg),*)?,
                    definition: self.definition,
                })
            }
        )*
    };
}

impl OrmBuilder {
    pub fn new(query: QueryBuilder, definition: impl Into<Arc<ModelDefinition>>) -> Self {
        let definition: Arc<ModelDefinition> = definition.into();
        Self {
            query: query.from(TableRef::from(definition.table.as_str())),
            definition,
        }
    }

    pub fn definition(&self) -> &Arc<ModelDefinition> {
        &self.definition
    }

    pub fn query(&self) -> &QueryBuilder {
        &self.query
    }

    pub fn into_query(self) -> QueryBuilder {
        self.query
    }

    /// Applies any [`QueryBuilder`] constraint.
    pub fn map_query(self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        Self {
            query: f(self.query),
            definition: self.definition,
        }
    }

    pub fn try_map_query(self, f: impl FnOnce(QueryBuilder) -> Result<QueryBuilder>) -> Result<Self> {
        Ok(Self {
            query: f(self.query)?,
            definition: self.definition,
        })
    }

    forward! {
        fn select(columns: impl IntoColumns);
        fn add_select(columns: impl IntoColumns);
        fn distinct();
        fn where_eq(column: impl Into<Column>, value: impl Into<Value>);
        fn or_where_eq(column: impl Into<Column>, value: impl Into<Value>);
        fn where_column(first: impl Into<Column>, operator: &str, second: impl Into<Column>);
        fn where_null(columns: impl IntoColumns);
        fn where_not_null(columns: impl IntoColumns);
        fn or_where_null(columns: impl IntoColumns);
        fn or_where_not_null(columns: impl IntoColumns);
        fn where_raw(sql: &str, bindings: &[Value]);
        fn or_where_raw(sql: &str, bindings: &[Value]);
        fn join(table: &str, first: &str, operator: &str, second: &str);
        fn left_join(table: &str, first: &str, operator: &str, second: &str);
        fn group_by(columns: impl IntoColumns);
        fn order_by_desc(column: impl Into<Column>);
        fn latest();
        fn oldest();
        fn limit(value: i64);
        fn offset(value: i64);
        fn for_page(page: i64, per_page: i64);
    }

    try_forward! {
        fn where_(column: impl Into<Column>, operator: &str, value: impl Into<Value>);
        fn or_where(column: impl Into<Column>, operator: &str, value: impl Into<Value>);
        fn where_not(column: impl Into<Column>, operator: &str, value: impl Into<Value>);
        fn having(column: impl Into<Column>, operator: &str, value: impl Into<Value>);
        fn order_by(column: impl Into<Column>, direction: &str);
    }

    pub fn where_in<V: Into<Value>>(
        self,
        column: impl Into<Column>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.map_query(|q| q.where_in(column, values))
    }

    pub fn where_not_in<V: Into<Value>>(
        self,
        column: impl Into<Column>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.map_query(|q| q.where_not_in(column, values))
    }

    pub fn to_sql(&self) -> String {
        self.query.to_sql()
    }

    pub fn bindings(&self) -> Vec<Value> {
        self.query.bindings()
    }

    /// New unsaved model, `attributes` go through mass assignment.
    pub fn new_model(&self, connection: &Connection, attributes: Record) -> Model {
        let mut model = Model::new(self.definition.clone());
        model.set_connection_name(connection.name());
        model.fill(attributes);
        model
    }

    /// Existing models from raw rows.
    pub fn hydrate(
        &self,
        connection: &Connection,
        rows: impl IntoIterator<Item = RowLabeled>,
    ) -> Collection<Model> {
        rows.into_iter()
            .map(|row| {
                let mut model = Model::hydrate(self.definition.clone(), row.into_record());
                model.set_connection_name(connection.name());
                model
            })
            .collect()
    }

    pub fn get(&self, connection: &mut Connection) -> Result<Collection<Model>> {
        let rows = self.query.get(connection)?;
        Ok(self.hydrate(connection, rows))
    }

    pub fn get_columns(
        &self,
        connection: &mut Connection,
        columns: impl IntoColumns,
    ) -> Result<Collection<Model>> {
        let rows = self.query.get_columns(connection, columns)?;
        Ok(self.hydrate(connection, rows))
    }

    pub fn first(&self, connection: &mut Connection) -> Result<Option<Model>> {
        let row = self.query.first(connection)?;
        Ok(self.hydrate(connection, row).into_iter().next())
    }

    /// Model whose primary key equals `id`.
    pub fn find(&self, connection: &mut Connection, id: impl Into<Value>) -> Result<Option<Model>> {
        self.find_with_columns(connection, id, "*")
    }

    pub fn find_with_columns(
        &self,
        connection: &mut Connection,
        id: impl Into<Value>,
        columns: impl IntoColumns,
    ) -> Result<Option<Model>> {
        let Some(key) = self.definition.primary_key.as_deref() else {
            return Err(DatabaseError::MissingPrimaryKey(self.definition.table.clone()).into());
        };
        let row = self
            .query
            .clone()
            .where_eq(key, id)
            .first_columns(connection, columns)?;
        Ok(self.hydrate(connection, row).into_iter().next())
    }

    /// Like [`OrmBuilder::find`], failing when no row matches.
    pub fn find_or_fail(&self, connection: &mut Connection, id: impl Into<Value>) -> Result<Model> {
        let id = id.into();
        self.find(connection, id.clone())?.ok_or_else(|| {
            DatabaseError::ModelNotFound {
                model: self.definition.table.clone(),
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Fills a new model with `attributes` and saves it.
    pub fn create(&self, connection: &mut Connection, attributes: Record) -> Result<Model> {
        let mut model = self.new_model(connection, attributes);
        model.save(connection)?;
        Ok(model)
    }

    pub fn exists(&self, connection: &mut Connection) -> Result<bool> {
        self.query.exists(connection)
    }

    pub fn count(&self, connection: &mut Connection) -> Result<i64> {
        self.query.count(connection)
    }

    pub fn min(&self, connection: &mut Connection, column: impl Into<Column>) -> Result<Value> {
        self.query.min(connection, column)
    }

    pub fn max(&self, connection: &mut Connection, column: impl Into<Column>) -> Result<Value> {
        self.query.max(connection, column)
    }

    pub fn sum(&self, connection: &mut Connection, column: impl Into<Column>) -> Result<Value> {
        self.query.sum(connection, column)
    }

    pub fn avg(&self, connection: &mut Connection, column: impl Into<Column>) -> Result<Value> {
        self.query.avg(connection, column)
    }

    pub fn value(&self, connection: &mut Connection, column: impl Into<Column>) -> Result<Option<Value>> {
        self.query.value(connection, column)
    }

    /// Updates every matching row without loading the models.
    pub fn update(&self, connection: &mut Connection, values: Record) -> Result<u64> {
        self.query.update(connection, values)
    }

    /// Deletes every matching row without loading the models.
    pub fn delete(&self, connection: &mut Connection) -> Result<u64> {
        self.query.delete(connection)
    }
}
