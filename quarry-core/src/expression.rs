use std::fmt::{self, Display};

/// Raw SQL fragment, written verbatim and never quoted.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Expression(pub String);

impl Expression {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Column reference: either a (possibly dotted or aliased) name or a raw expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Name(String),
    Raw(Expression),
}

impl Column {
    pub fn is_raw(&self) -> bool {
        matches!(self, Column::Raw(..))
    }
    /// Name as written, or the raw SQL.
    pub fn as_str(&self) -> &str {
        match self {
            Column::Name(v) => v,
            Column::Raw(v) => v.as_str(),
        }
    }
}

impl From<&str> for Column {
    fn from(value: &str) -> Self {
        Column::Name(value.into())
    }
}

impl From<String> for Column {
    fn from(value: String) -> Self {
        Column::Name(value)
    }
}

impl From<&String> for Column {
    fn from(value: &String) -> Self {
        Column::Name(value.clone())
    }
}

impl From<Expression> for Column {
    fn from(value: Expression) -> Self {
        Column::Raw(value)
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a list of things into columns, `select(["id", "name"])`.
pub trait IntoColumns {
    fn into_columns(self) -> Vec<Column>;
}

impl<C: Into<Column>> IntoColumns for Vec<C> {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<C: Into<Column>, const N: usize> IntoColumns for [C; N] {
    fn into_columns(self) -> Vec<Column> {
        self.into_iter().map(Into::into).collect()
    }
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<Column> {
        vec![self.into()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<Column> {
        vec![self.into()]
    }
}

impl IntoColumns for Expression {
    fn into_columns(self) -> Vec<Column> {
        vec![self.into()]
    }
}

impl IntoColumns for Column {
    fn into_columns(self) -> Vec<Column> {
        vec![self]
    }
}

/// Table the statement reads from or writes to.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    #[default]
    None,
    Name {
        name: String,
        alias: Option<String>,
    },
    Raw(Expression),
}

impl TableRef {
    pub fn is_none(&self) -> bool {
        matches!(self, TableRef::None)
    }
    /// `users` for `users as u`, `None` for raw sources.
    pub fn name(&self) -> Option<&str> {
        match self {
            TableRef::Name { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl From<&str> for TableRef {
    fn from(value: &str) -> Self {
        TableRef::Name {
            name: value.into(),
            alias: None,
        }
    }
}

impl From<String> for TableRef {
    fn from(value: String) -> Self {
        TableRef::Name {
            name: value,
            alias: None,
        }
    }
}

impl From<Expression> for TableRef {
    fn from(value: Expression) -> Self {
        TableRef::Raw(value)
    }
}
