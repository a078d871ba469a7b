mod as_value;
mod attributes;
mod clause;
mod collection;
mod config;
mod connection;
mod driver;
mod entity;
mod error;
mod expression;
mod grammar;
mod guard;
mod manager;
mod model;
mod orm_builder;
mod prepared;
mod query;
mod query_builder;
mod util;
mod value;
mod visibility;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use attributes::*;
pub use clause::*;
pub use collection::*;
pub use config::*;
pub use connection::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use expression::*;
pub use grammar::*;
pub use guard::*;
pub use manager::*;
pub use model::*;
pub use orm_builder::*;
pub use prepared::*;
pub use query::*;
pub use query_builder::*;
pub use util::*;
pub use value::*;
pub use visibility::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
