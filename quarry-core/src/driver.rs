use crate::{Connection, ConnectionConfig, Prepared, Result, RowLabeled, RowsAffected};

/// Blocking access to one database session.
///
/// A [`Connection`] only talks to the server through this trait, so any client
/// library able to prepare, bind and run a statement can back it.
pub trait Driver: Send {
    /// Name of the driver, `mysql` for instance.
    fn name(&self) -> &'static str;

    /// Prepare `sql`, the result is ready to be bound.
    fn prepare(&mut self, sql: &str) -> Result<Prepared> {
        Ok(Prepared::new(sql))
    }

    /// Run a statement returning rows and collect all of them.
    fn fetch_all(&mut self, prepared: Prepared) -> Result<Vec<RowLabeled>>;

    /// Run a statement that modifies data.
    fn execute(&mut self, prepared: Prepared) -> Result<RowsAffected>;

    /// Version string reported by the server, `8.0.36` for instance.
    fn server_version(&mut self) -> Result<String>;

    /// Release the session, the driver is not used afterwards.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens configured connections for one driver name.
pub trait Connector: Send + Sync {
    /// The value of [`ConnectionConfig::driver`] this connector handles.
    fn driver_name(&self) -> &'static str;

    fn connect(&self, name: &str, config: &ConnectionConfig) -> Result<Connection>;
}
