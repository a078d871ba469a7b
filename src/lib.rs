//! Fluent SQL query builder, dialect aware grammars and Active Record models.
//!
//! The core lives in `quarry-core`, dialects are re-exported under their name.
pub use quarry_core::*;
pub use quarry_mysql as mysql;
