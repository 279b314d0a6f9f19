// library crate for jsonmatch
// matches JSON values against declarative condition trees

pub mod conditions;
pub mod config;

pub use conditions::{
    matches, matches_value, CompareOp, Condition, DateTimeFormat, Expression, MatchError,
    MatchOptions, PathStep, Policy,
};
pub use config::{RuleError, RuleSet};
