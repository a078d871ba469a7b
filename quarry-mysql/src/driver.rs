use crate::{RowWrap, ValueWrap};
use mysql::{Conn, Params, prelude::{FromRow, Queryable}};
use quarry_core::{Driver, Error, ErrorContext, Prepared, Result, RowLabeled, RowsAffected};

/// [`Driver`] over a blocking `mysql` client session.
pub struct MySqlDriver {
    connection: Conn,
}

impl MySqlDriver {
    pub fn new(connection: Conn) -> Self {
        Self { connection }
    }

    fn params(prepared: Prepared) -> Result<Params> {
        let values = prepared
            .into_params()
            .into_iter()
            .map(|(value, ..)| mysql::Value::try_from(ValueWrap(value)))
            .collect::<Result<Vec<_>>>()?;
        Ok(if values.is_empty() {
            Params::Empty
        } else {
            Params::Positional(values)
        })
    }
}

impl Driver for MySqlDriver {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn prepare(&mut self, sql: &str) -> Result<Prepared> {
        let statement = self
            .connection
            .prep(sql)
            .context("While preparing the statement")?;
        Ok(Prepared::new(sql).with_param_count(statement.num_params() as usize))
    }

    fn fetch_all(&mut self, prepared: Prepared) -> Result<Vec<RowLabeled>> {
        let sql = prepared.sql().to_string();
        let params = Self::params(prepared)?;
        let result = self.connection.exec_iter(sql, params)?;
        result
            .map(|row| {
                let row = RowWrap::from_row_opt(row?).map_err(|e| {
                    Error::msg(format!("Cannot decode a row of {} columns", e.0.len()))
                })?;
                Ok(row.0)
            })
            .collect()
    }

    fn execute(&mut self, prepared: Prepared) -> Result<RowsAffected> {
        let sql = prepared.sql().to_string();
        let params = Self::params(prepared)?;
        let result = self.connection.exec_iter(sql, params)?;
        let rows_affected = result.affected_rows();
        let last_affected_id = result
            .last_insert_id()
            .and_then(|v| i64::try_from(v).ok());
        // Drains the remaining packets before the session is reused.
        drop(result);
        Ok(RowsAffected {
            rows_affected,
            last_affected_id,
        })
    }

    fn server_version(&mut self) -> Result<String> {
        let (major, minor, patch) = self.connection.server_version();
        Ok(format!("{major}.{minor}.{patch}"))
    }
}
