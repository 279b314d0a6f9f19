//! condition matching engine
//!
//! decides whether a JSON value satisfies a declarative condition tree:
//! - logical operators: or, and, not
//! - comparison operators: =, !=, <, <=, >, >= (plus word and unicode aliases)
//! - set operator: in
//! - field paths with array quantifiers: `a.[*].b` (all), `a.[+].b` (any), `a.[-1].b` (index)
//!
//! conditions are plain serde data, so they can be authored in JSON, JSON5 or YAML.

mod compare;
mod error;
mod eval;
mod options;
mod parser;
mod time;
mod types;

pub use compare::values_equal;
pub use error::MatchError;
pub use eval::{matches, matches_value};
pub use options::{MatchOptions, Policy};
pub use parser::parse_field_path;
pub use time::DateTimeFormat;
pub use types::{CompareOp, Condition, Expression, PathStep};

pub(crate) use parser::dropped_segments;
