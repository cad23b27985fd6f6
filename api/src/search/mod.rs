mod builder;
mod error;
mod parser;
mod sql;
mod types;

pub use builder::{build_filter, CompositePredicate};
pub use error::FilterError;
pub use parser::{parse_clause, parse_search};
pub use sql::{build_sql, SqlValue};
pub use types::{ArticleField, Comparison, FieldValue, Operation, Predicate, SearchCriteria};
