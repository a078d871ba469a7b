use quarry_core::{
    Connection, ConnectionConfig, Connector, Driver, Error, GenericGrammar, Grammar, Prepared,
    Result, RowLabeled, RowNames, RowsAffected, Value,
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// A statement that reached the scripted driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql: String,
    pub bindings: Vec<Value>,
}

#[derive(Debug)]
struct State {
    rows: VecDeque<Vec<RowLabeled>>,
    affected: VecDeque<RowsAffected>,
    executed: Vec<Executed>,
    echo: bool,
    fail_next: Option<String>,
    closed: bool,
    version: String,
}

impl Default for State {
    fn default() -> Self {
        Self {
            rows: VecDeque::new(),
            affected: VecDeque::new(),
            executed: Vec::new(),
            echo: false,
            fail_next: None,
            closed: false,
            version: "8.0.36".into(),
        }
    }
}

/// Results handed out by a [`ScriptedDriver`] and the statements it received.
///
/// Clones share the same script, keep one in the test while the connection
/// owns the driver.
#[derive(Debug, Clone, Default)]
pub struct Script {
    state: Arc<Mutex<State>>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rows returned by the next select.
    pub fn push_rows(&self, labels: &[&str], rows: Vec<Vec<Value>>) -> &Self {
        let labels: RowNames = labels.iter().map(|v| v.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|v| RowLabeled::new(labels.clone(), v.into_boxed_slice()))
            .collect();
        self.state().rows.push_back(rows);
        self
    }

    /// Outcome of the next write, writes without a scripted outcome affect nothing.
    pub fn push_affected(&self, rows_affected: u64, last_insert_id: Option<i64>) -> &Self {
        self.state().affected.push_back(RowsAffected {
            rows_affected,
            last_affected_id: last_insert_id,
        });
        self
    }

    /// Selects return a single row holding the bound values, labelled by position.
    pub fn set_echo(&self, echo: bool) -> &Self {
        self.state().echo = echo;
        self
    }

    pub fn fail_next(&self, message: impl Into<String>) -> &Self {
        self.state().fail_next = Some(message.into());
        self
    }

    pub fn set_server_version(&self, version: impl Into<String>) -> &Self {
        self.state().version = version.into();
        self
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.state().executed.clone()
    }

    pub fn statements(&self) -> Vec<String> {
        self.state().executed.iter().map(|v| v.sql.clone()).collect()
    }

    pub fn last(&self) -> Option<Executed> {
        self.state().executed.last().cloned()
    }

    pub fn clear(&self) {
        self.state().executed.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    pub fn driver(&self) -> ScriptedDriver {
        ScriptedDriver {
            script: self.clone(),
        }
    }

    /// Connection named `scripted` over this script.
    pub fn connection(&self, grammar: Arc<dyn Grammar>) -> Connection {
        Connection::new("scripted", Box::new(self.driver()), grammar)
    }

    fn record(&self, prepared: &Prepared) -> Result<()> {
        let mut state = self.state();
        state.executed.push(Executed {
            sql: prepared.sql().to_string(),
            bindings: prepared.values().cloned().collect(),
        });
        match state.fail_next.take() {
            Some(message) => Err(Error::msg(message)),
            None => Ok(()),
        }
    }
}

/// In memory [`Driver`] answering from a [`Script`].
#[derive(Debug)]
pub struct ScriptedDriver {
    script: Script,
}

/// Number of `?`, an escaped `??` does not count.
fn placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '?' {
            if chars.peek() == Some(&'?') {
                chars.next();
            } else {
                count += 1;
            }
        }
    }
    count
}

impl Driver for ScriptedDriver {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn prepare(&mut self, sql: &str) -> Result<Prepared> {
        Ok(Prepared::new(sql).with_param_count(placeholders(sql)))
    }

    fn fetch_all(&mut self, prepared: Prepared) -> Result<Vec<RowLabeled>> {
        self.script.record(&prepared)?;
        let mut state = self.script.state();
        if state.echo {
            let values: Vec<Value> = prepared.into_params().into_iter().map(|(v, ..)| v).collect();
            let labels: RowNames = (0..values.len()).map(|i| i.to_string()).collect();
            return Ok(vec![RowLabeled::new(labels, values.into_boxed_slice())]);
        }
        Ok(state.rows.pop_front().unwrap_or_default())
    }

    fn execute(&mut self, prepared: Prepared) -> Result<RowsAffected> {
        self.script.record(&prepared)?;
        Ok(self.script.state().affected.pop_front().unwrap_or_default())
    }

    fn server_version(&mut self) -> Result<String> {
        Ok(self.script.state().version.clone())
    }

    fn close(&mut self) -> Result<()> {
        self.script.state().closed = true;
        Ok(())
    }
}

/// Opens connections over a shared [`Script`] for configurations using the `scripted` driver.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    script: Script,
}

impl ScriptedConnector {
    pub fn new(script: Script) -> Self {
        Self { script }
    }
}

impl Connector for ScriptedConnector {
    fn driver_name(&self) -> &'static str {
        "scripted"
    }

    fn connect(&self, name: &str, config: &ConnectionConfig) -> Result<Connection> {
        let grammar = Arc::new(GenericGrammar::with_table_prefix(config.prefix.clone()));
        Ok(
            Connection::new(name, Box::new(self.script.driver()), grammar)
                .with_database(config.database.clone()),
        )
    }
}
