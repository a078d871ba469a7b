use crate::{Connection, Connector, DatabaseConfig, DatabaseError, Result};
use std::collections::{BTreeMap, btree_map::Entry};

/// Opens configured connections on first use and keeps them until disconnected.
///
/// Connectors are registered per driver name, a connection is opened by the
/// connector matching the `driver` of its configuration. Resolution needs
/// `&mut self`, share the manager between threads behind a lock.
pub struct DatabaseManager {
    config: DatabaseConfig,
    connectors: BTreeMap<String, Box<dyn Connector>>,
    connections: BTreeMap<String, Connection>,
    current: Option<String>,
}

impl DatabaseManager {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            connectors: BTreeMap::new(),
            connections: BTreeMap::new(),
            current: None,
        }
    }

    pub fn with_connector(mut self, connector: impl Connector + 'static) -> Self {
        self.register_connector(Box::new(connector));
        self
    }

    pub fn register_connector(&mut self, connector: Box<dyn Connector>) -> &mut Self {
        self.connectors
            .insert(connector.driver_name().to_string(), connector);
        self
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Name used by [`DatabaseManager::connection`], the configured default unless changed.
    pub fn current_connection_name(&self) -> &str {
        self.current.as_deref().unwrap_or(&self.config.default)
    }

    pub fn change_current_connection(&mut self, name: impl Into<String>) {
        self.current = Some(name.into());
    }

    /// The current connection, opened if needed.
    pub fn connection(&mut self) -> Result<&mut Connection> {
        let name = self.current_connection_name().to_string();
        self.connection_named(&name)
    }

    /// Connection `name` when given, the current one otherwise.
    pub fn connection_for(&mut self, name: Option<&str>) -> Result<&mut Connection> {
        match name {
            Some(name) => self.connection_named(name),
            None => self.connection(),
        }
    }

    pub fn connection_named(&mut self, name: &str) -> Result<&mut Connection> {
        match self.connections.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let config = self.config.connection(name)?;
                let Some(connector) = self.connectors.get(&config.driver) else {
                    return Err(DatabaseError::UnsupportedDriver(config.driver.clone()).into());
                };
                log::info!(
                    "Opening database connection [{}] with the {} driver",
                    name,
                    config.driver
                );
                let connection = connector.connect(name, config)?;
                Ok(entry.insert(connection))
            }
        }
    }

    /// Whether `name` is open.
    pub fn is_connected(&self, name: &str) -> bool {
        self.connections.contains_key(name)
    }

    /// Closes `name`, or every open connection when `None`.
    pub fn disconnect(&mut self, name: Option<&str>) -> Result<()> {
        match name {
            Some(name) => {
                if let Some(mut connection) = self.connections.remove(name) {
                    connection.disconnect()?;
                }
            }
            None => {
                let mut result = Ok(());
                for (_, mut connection) in std::mem::take(&mut self.connections) {
                    if let Err(e) = connection.disconnect() {
                        log::error!("{:#}", e);
                        result = Err(e);
                    }
                }
                return result;
            }
        }
        Ok(())
    }
}
