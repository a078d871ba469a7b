use crate::{
    DatabaseError, Driver, Error, Expression, Grammar, Prepared, QueryBuilder,
    QueryExecutionError, Result, RowLabeled, Value, truncate_long,
};
use std::{fmt, sync::Arc};

/// An open database session: runs SQL through its [`Driver`] and creates
/// builders compiled by its [`Grammar`].
///
/// Every method blocks until the server answers. A failing statement is
/// returned as a [`QueryExecutionError`] carrying the statement and its bindings.
pub struct Connection {
    name: String,
    driver: Option<Box<dyn Driver>>,
    grammar: Arc<dyn Grammar>,
    database: String,
    last_insert_id: Option<i64>,
    records_modified: bool,
}

impl Connection {
    pub fn new(name: impl Into<String>, driver: Box<dyn Driver>, grammar: Arc<dyn Grammar>) -> Self {
        Self {
            name: name.into(),
            driver: Some(driver),
            grammar,
            database: String::new(),
            last_insert_id: None,
            records_modified: false,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn grammar(&self) -> &Arc<dyn Grammar> {
        &self.grammar
    }

    pub fn driver_name(&self) -> Option<&'static str> {
        self.driver.as_ref().map(|v| v.name())
    }

    pub fn is_connected(&self) -> bool {
        self.driver.is_some()
    }

    /// Builder without a table.
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(self.grammar.clone())
    }

    pub fn table(&self, table: &str) -> QueryBuilder {
        self.query().from(table)
    }

    pub fn table_as(&self, table: &str, alias: &str) -> QueryBuilder {
        self.query().from_as(table, alias)
    }

    pub fn raw(&self, sql: impl Into<String>) -> Expression {
        Expression::new(sql)
    }

    /// Run a statement returning rows.
    pub fn select(&mut self, sql: &str, bindings: &[Value]) -> Result<Vec<RowLabeled>> {
        self.run(sql, bindings, |driver, prepared| driver.fetch_all(prepared))
    }

    /// Run an insert, the generated id is available from [`Connection::last_insert_id`].
    pub fn insert(&mut self, sql: &str, bindings: &[Value]) -> Result<bool> {
        let result = self.run(sql, bindings, |driver, prepared| driver.execute(prepared))?;
        self.last_insert_id = result.last_affected_id.filter(|v| *v != 0);
        self.records_have_been_modified(result.rows_affected > 0);
        Ok(true)
    }

    /// Run an update, returns the number of affected rows.
    pub fn update(&mut self, sql: &str, bindings: &[Value]) -> Result<u64> {
        self.affecting_statement(sql, bindings)
    }

    /// Run a delete, returns the number of affected rows.
    pub fn delete(&mut self, sql: &str, bindings: &[Value]) -> Result<u64> {
        self.affecting_statement(sql, bindings)
    }

    /// Run any statement, session settings for instance.
    pub fn statement(&mut self, sql: &str, bindings: &[Value]) -> Result<bool> {
        self.run(sql, bindings, |driver, prepared| driver.execute(prepared))?;
        Ok(true)
    }

    pub fn affecting_statement(&mut self, sql: &str, bindings: &[Value]) -> Result<u64> {
        let result = self.run(sql, bindings, |driver, prepared| driver.execute(prepared))?;
        self.records_have_been_modified(result.rows_affected > 0);
        Ok(result.rows_affected)
    }

    /// Id generated by the last insert, `None` when there was none.
    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }

    /// Whether any write on this connection affected at least one row.
    pub fn records_modified(&self) -> bool {
        self.records_modified
    }

    pub fn forget_records_modified(&mut self) {
        self.records_modified = false;
    }

    fn records_have_been_modified(&mut self, value: bool) {
        if !self.records_modified {
            self.records_modified = value;
        }
    }

    pub fn server_version(&mut self) -> Result<String> {
        self.driver()?.server_version()
    }

    /// Close the session, any later statement fails with [`DatabaseError::Disconnected`].
    pub fn disconnect(&mut self) -> Result<()> {
        if let Some(mut driver) = self.driver.take() {
            log::info!("Disconnecting from database connection [{}]", self.name);
            driver.close()?;
        }
        Ok(())
    }

    fn driver(&mut self) -> Result<&mut (dyn Driver + 'static)> {
        match self.driver.as_deref_mut() {
            Some(driver) => Ok(driver),
            None => Err(DatabaseError::Disconnected(self.name.clone()).into()),
        }
    }

    fn run<T>(
        &mut self,
        sql: &str,
        bindings: &[Value],
        f: impl FnOnce(&mut dyn Driver, Prepared) -> Result<T>,
    ) -> Result<T> {
        log::debug!("[{}] {}", self.name, truncate_long!(sql));
        let driver = self.driver()?;
        let result = driver.prepare(sql).and_then(|mut prepared| {
            for value in bindings {
                prepared.bind(Self::prepare_binding(value))?;
            }
            prepared.check()?;
            f(driver, prepared)
        });
        result.map_err(|e| {
            let e = Error::new(DatabaseError::from(QueryExecutionError::new(sql, bindings, e)));
            log::error!("{:#}", e);
            e
        })
    }

    /// Booleans travel as integers.
    fn prepare_binding(value: &Value) -> Value {
        match value {
            Value::Boolean(Some(v)) => Value::Int32(Some(*v as i32)),
            Value::Boolean(None) => Value::Int32(None),
            v => v.clone(),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("driver", &self.driver_name())
            .field("grammar", &self.grammar.name())
            .field("database", &self.database)
            .field("last_insert_id", &self.last_insert_id)
            .field("records_modified", &self.records_modified)
            .finish()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Err(e) = self.disconnect() {
            log::warn!("{:#}", e);
        }
    }
}
