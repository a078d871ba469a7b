use crate::{MySqlDriver, MySqlGrammar};
use mysql::{Conn, Opts};
use quarry_core::{
    Connection, ConnectionConfig, Connector, Error, ErrorContext, Result, truncate_long,
};
use std::sync::Arc;

/// Opens `mysql` connections and applies the session settings of their configuration.
#[derive(Default, Debug, Clone, Copy)]
pub struct MySqlConnector;

impl MySqlConnector {
    pub const fn new() -> Self {
        Self
    }
}

impl Connector for MySqlConnector {
    fn driver_name(&self) -> &'static str {
        "mysql"
    }

    fn connect(&self, name: &str, config: &ConnectionConfig) -> Result<Connection> {
        let url = config.to_url()?;
        let mut shown = url.clone();
        let _ = shown.set_password(None);
        let context = || {
            format!(
                "While trying to connect to `{}`",
                truncate_long!(shown.as_str())
            )
        };
        if url.scheme() != self.driver_name() {
            let error = Error::msg(format!(
                "MySQL connection url must start with `{}://`",
                self.driver_name()
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let opts = Opts::from_url(url.as_str()).with_context(context)?;
        let connection = Conn::new(opts).with_context(context)?;
        let mut connection = Connection::new(
            name,
            Box::new(MySqlDriver::new(connection)),
            Arc::new(MySqlGrammar::with_table_prefix(config.prefix.clone())),
        )
        .with_database(config.database.clone());
        configure_session(&mut connection, config)
            .with_context(|| format!("While configuring the session of [{name}]"))?;
        Ok(connection)
    }
}

/// Applies the character set, time zone and SQL modes of `config`.
pub fn configure_session(connection: &mut Connection, config: &ConnectionConfig) -> Result<()> {
    let needs_version =
        config.version.is_none() && config.modes.is_none() && config.strict == Some(true);
    let server_version = if needs_version {
        Some(connection.server_version()?)
    } else {
        None
    };
    for statement in session_statements(config, server_version.as_deref()) {
        connection.statement(&statement, &[])?;
    }
    Ok(())
}

/// Statements run right after connecting, in order.
///
/// The configured `version` wins over `server_version`. Servers older than
/// 8.0.11 still accept `NO_AUTO_CREATE_USER` in strict mode. A version that
/// does not start with a number counts as older, no version at all as newer.
pub fn session_statements(config: &ConnectionConfig, server_version: Option<&str>) -> Vec<String> {
    let mut result = Vec::new();
    if let Some(charset) = &config.charset {
        let mut statement = format!("set names '{charset}'");
        if let Some(collation) = &config.collation {
            statement.push_str(&format!(" collate '{collation}'"));
        }
        result.push(statement);
    }
    if let Some(timezone) = &config.timezone {
        result.push(format!("set time_zone=\"{timezone}\""));
    }
    if let Some(modes) = &config.modes {
        result.push(format!("set session sql_mode='{}'", modes.join(",")));
    } else if let Some(strict) = config.strict {
        result.push(if strict {
            let version = config.version.as_deref().or(server_version);
            let legacy = version.is_some_and(|v| {
                !matches!(parse_version(v), Some(parsed) if parsed >= (8, 0, 11))
            });
            format!(
                "set session sql_mode='ONLY_FULL_GROUP_BY,STRICT_TRANS_TABLES,NO_ZERO_IN_DATE,NO_ZERO_DATE,ERROR_FOR_DIVISION_BY_ZERO,{}NO_ENGINE_SUBSTITUTION'",
                if legacy { "NO_AUTO_CREATE_USER," } else { "" }
            )
        } else {
            "set session sql_mode='NO_ENGINE_SUBSTITUTION'".into()
        });
    }
    result
}

/// Leading `major.minor.patch` of a version string like `5.7.44-log`.
pub fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
    let mut parts = version
        .split(|c: char| !c.is_ascii_digit())
        .take(3)
        .map(|v| v.parse::<u32>().ok());
    let major = parts.next()??;
    let minor = parts.next().flatten().unwrap_or(0);
    let patch = parts.next().flatten().unwrap_or(0);
    Some((major, minor, patch))
}
