use crate::{Column, DatabaseError, Error, Expression, TableRef, Value};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Connector between a predicate and the one before it.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boolean {
    #[default]
    And,
    Or,
    AndNot,
    OrNot,
}

impl Boolean {
    /// Lenient parsing, anything unknown becomes `AND`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "or" => Boolean::Or,
            "and not" => Boolean::AndNot,
            "or not" => Boolean::OrNot,
            _ => Boolean::And,
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Boolean::And => Boolean::AndNot,
            Boolean::Or => Boolean::OrNot,
            Boolean::AndNot => Boolean::And,
            Boolean::OrNot => Boolean::Or,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Boolean::And => "and",
            Boolean::Or => "or",
            Boolean::AndNot => "and not",
            Boolean::OrNot => "or not",
        }
    }
}

impl Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullTextMode {
    #[default]
    NaturalLanguage,
    Boolean,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullTextOptions {
    pub mode: FullTextMode,
    /// Query expansion, ignored in boolean mode.
    pub expanded: bool,
}

/// Single condition of a `WHERE` or `HAVING` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column operator ?`
    Basic {
        column: Column,
        operator: String,
        value: Value,
    },
    /// `first operator second`, no bindings.
    ColumnCompare {
        first: Column,
        operator: String,
        second: Column,
    },
    /// `column [not] in (?, ...)`, one placeholder per value.
    In {
        column: Column,
        values: Vec<Value>,
        negated: bool,
    },
    Null {
        column: Column,
        negated: bool,
    },
    Raw {
        sql: String,
    },
    FullText {
        columns: Vec<Column>,
        value: Value,
        options: FullTextOptions,
    },
}

impl Predicate {
    /// Number of `?` the predicate compiles to.
    pub fn placeholders(&self) -> usize {
        match self {
            Predicate::Basic { .. } | Predicate::FullText { .. } => 1,
            Predicate::In { values, .. } => values.len(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub boolean: Boolean,
    pub predicate: Predicate,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
        }
    }
}

/// Right hand side of a join condition.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOperand {
    Column(Column),
    /// Bound into the `join` group.
    Value(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinType,
    pub table: TableRef,
    pub first: Column,
    pub operator: String,
    pub second: JoinOperand,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(DatabaseError::InvalidOrderDirection(value.into()).into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    Column { column: Column, direction: Direction },
    Raw(Expression),
}

#[derive(Debug, Clone)]
pub struct Union {
    pub query: Box<Clauses>,
    pub all: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub function: String,
    pub columns: Vec<Column>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub enum Distinct {
    #[default]
    No,
    All,
    Columns(Vec<Column>),
}

impl Distinct {
    pub fn is_distinct(&self) -> bool {
        !matches!(self, Distinct::No)
    }
}

/// Clause group a binding belongs to, declared in the order the groups are flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingGroup {
    Select,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    Order,
    Union,
    UnionOrder,
}

impl BindingGroup {
    pub const ALL: [BindingGroup; 9] = [
        BindingGroup::Select,
        BindingGroup::From,
        BindingGroup::Join,
        BindingGroup::Where,
        BindingGroup::GroupBy,
        BindingGroup::Having,
        BindingGroup::Order,
        BindingGroup::Union,
        BindingGroup::UnionOrder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BindingGroup::Select => "select",
            BindingGroup::From => "from",
            BindingGroup::Join => "join",
            BindingGroup::Where => "where",
            BindingGroup::GroupBy => "groupBy",
            BindingGroup::Having => "having",
            BindingGroup::Order => "order",
            BindingGroup::Union => "union",
            BindingGroup::UnionOrder => "unionOrder",
        }
    }
}

impl FromStr for BindingGroup {
    type Err = Error;
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BindingGroup::ALL
            .into_iter()
            .find(|v| v.as_str() == value)
            .ok_or_else(|| DatabaseError::InvalidBindingType(value.into()).into())
    }
}

impl Display for BindingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values waiting for a `?`, kept per clause group.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Bindings {
    groups: [Vec<Value>; 9],
}

impl Bindings {
    pub fn push(&mut self, group: BindingGroup, value: Value) {
        self.groups[group as usize].push(value);
    }
    pub fn extend(&mut self, group: BindingGroup, values: impl IntoIterator<Item = Value>) {
        self.groups[group as usize].extend(values);
    }
    pub fn get(&self, group: BindingGroup) -> &[Value] {
        &self.groups[group as usize]
    }
    pub fn clear(&mut self, group: BindingGroup) {
        self.groups[group as usize].clear();
    }
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }
    /// Every group in declaration order.
    pub fn flatten(&self) -> Vec<Value> {
        self.flatten_except(&[])
    }
    pub fn flatten_except(&self, excluded: &[BindingGroup]) -> Vec<Value> {
        BindingGroup::ALL
            .iter()
            .filter(|g| !excluded.contains(g))
            .flat_map(|g| self.get(*g).iter().cloned())
            .collect()
    }
}

/// Everything a statement under construction is made of.
#[derive(Default, Debug, Clone)]
pub struct Clauses {
    pub from: TableRef,
    /// `None` compiles to `*`.
    pub columns: Option<Vec<Column>>,
    pub distinct: Distinct,
    pub joins: Vec<Join>,
    pub wheres: Vec<Condition>,
    pub groups: Vec<Column>,
    pub havings: Vec<Condition>,
    pub orders: Vec<Order>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub unions: Vec<Union>,
    pub union_orders: Vec<Order>,
    pub union_limit: Option<u64>,
    pub union_offset: Option<u64>,
    pub aggregate: Option<Aggregate>,
    pub bindings: Bindings,
}

impl Clauses {
    pub fn new(from: impl Into<TableRef>) -> Self {
        Self {
            from: from.into(),
            ..Default::default()
        }
    }
}
