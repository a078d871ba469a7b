use crate::{Error, Result, Value, truncate_long};
use std::fmt::{self, Display};

/// How a driver should transmit a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Int,
    Lob,
    Str,
}

impl ParamType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Boolean(Some(..)) => ParamType::Int,
            Value::Blob(Some(..)) => ParamType::Lob,
            v if v.is_integer() => ParamType::Int,
            _ => ParamType::Str,
        }
    }
}

/// A statement handed back by [`crate::Driver::prepare`], with its positional parameters.
///
/// # Binding Semantics
/// * `bind` appends a value after the last one bound.
/// * `bind_index` sets the parameter at `index` (from 0).
///
/// ```rust
/// use quarry_core::{ParamType, Prepared};
/// let mut prepared = Prepared::new("SELECT * FROM users WHERE id = ? AND name = ?").with_param_count(2);
/// prepared.bind(1).unwrap().bind("Ann").unwrap();
/// assert_eq!(prepared.params()[0].1, ParamType::Int);
/// assert!(prepared.check().is_ok());
/// ```
#[derive(Default, Debug, Clone)]
pub struct Prepared {
    sql: String,
    params: Vec<(Value, ParamType)>,
    expected: Option<usize>,
    index: u64,
}

impl Prepared {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Default::default()
        }
    }

    /// Number of placeholders, as reported by the server.
    pub fn with_param_count(mut self, count: usize) -> Self {
        self.expected = Some(count);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[(Value, ParamType)] {
        &self.params
    }

    pub fn into_params(self) -> Vec<(Value, ParamType)> {
        self.params
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.params.iter().map(|(v, ..)| v)
    }

    pub fn bind(&mut self, value: impl Into<Value>) -> Result<&mut Self> {
        self.bind_index(value, self.index)
    }

    pub fn bind_index(&mut self, value: impl Into<Value>, index: u64) -> Result<&mut Self> {
        let position = index as usize;
        if let Some(expected) = self.expected
            && position >= expected
        {
            return Err(Error::msg(format!(
                "Index {index} cannot be bound, the statement has only {expected} parameters"
            )));
        }
        if self.params.len() <= position {
            self.params
                .resize(position + 1, (Value::Null, ParamType::Str));
        }
        let value = value.into();
        let kind = ParamType::of(&value);
        self.params[position] = (value, kind);
        self.index = index + 1;
        Ok(self)
    }

    pub fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.params.clear();
        self.index = 0;
        Ok(self)
    }

    /// Fails when the bound parameters do not match the placeholders.
    pub fn check(&self) -> Result<()> {
        match self.expected {
            Some(expected) if expected != self.params.len() => Err(Error::msg(format!(
                "The statement expects {expected} parameters but {} were bound",
                self.params.len()
            ))),
            _ => Ok(()),
        }
    }
}

impl Display for Prepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&truncate_long!(self.sql))
    }
}
