//! condition evaluator
//!
//! walks the condition tree, resolves each leaf's field path against the
//! value and hands terminal values to the comparator

use log::{debug, trace};
use serde::Serialize;
use serde_json::Value;

use super::compare::{compare, type_name};
use super::error::MatchError;
use super::options::MatchOptions;
use super::time::DateTimeFormat;
use super::types::{Condition, Expression, PathStep};

/// match any serializable value against a condition
pub fn matches<T>(value: &T, condition: &Condition, options: &MatchOptions) -> Result<bool, MatchError>
where
    T: Serialize + ?Sized,
{
    let root = serde_json::to_value(value).map_err(MatchError::Import)?;
    condition.evaluate(&root, options)
}

/// match an already-imported value against a condition
pub fn matches_value(
    value: &Value,
    condition: &Condition,
    options: &MatchOptions,
) -> Result<bool, MatchError> {
    condition.evaluate(value, options)
}

impl Condition {
    /// evaluate this condition against a value
    ///
    /// errors from children halt evaluation and propagate; the not-found and
    /// type-mismatch policies apply only where a leaf is evaluated.
    pub fn evaluate(&self, value: &Value, options: &MatchOptions) -> Result<bool, MatchError> {
        match self {
            Condition::Or(children) => {
                debug!("do or ({} branches)", children.len());
                for child in children {
                    if child.evaluate(value, options)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Condition::And(children) => {
                debug!("do and ({} branches)", children.len());
                for child in children {
                    if !child.evaluate(value, options)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Not(inner) => {
                debug!("do not");
                Ok(!inner.evaluate(value, options)?)
            }
            Condition::Expr(expr) => {
                debug!("do expr {}", expr);
                options.resolve(expr.matches(value, options.date_time_format()))
            }
        }
    }
}

impl Expression {
    /// match this expression against a value, without applying any policy
    pub fn matches(
        &self,
        value: &Value,
        date_time: Option<&DateTimeFormat>,
    ) -> Result<bool, MatchError> {
        let leaf = Leaf {
            op: self.op(),
            target: self.value(),
            date_time,
        };
        leaf.match_steps(self.steps(), value)
    }
}

/// the parts of an expression that stay fixed while walking its path
struct Leaf<'a> {
    op: &'a str,
    target: &'a Value,
    date_time: Option<&'a DateTimeFormat>,
}

impl Leaf<'_> {
    fn match_steps(&self, steps: &[PathStep], current: &Value) -> Result<bool, MatchError> {
        let Some((step, rest)) = steps.split_first() else {
            return compare(current, self.op, self.target, self.date_time);
        };

        match step {
            PathStep::Key(key) => {
                let object = current.as_object().ok_or_else(|| {
                    MatchError::TypeMismatch(format!(
                        "cannot look up key '{}' in {}",
                        key,
                        type_name(current)
                    ))
                })?;
                let child = object
                    .get(key)
                    .ok_or_else(|| MatchError::NotFound(format!("key '{}'", key)))?;
                self.match_steps(rest, child)
            }
            PathStep::All => {
                for item in array_for(step, current)? {
                    if !self.match_steps(rest, item)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            PathStep::Any => {
                let mut last_error = None;
                for item in array_for(step, current)? {
                    match self.match_steps(rest, item) {
                        Ok(true) => return Ok(true),
                        Ok(false) => {}
                        Err(err) => {
                            trace!("element did not match: {}", err);
                            last_error = Some(err);
                        }
                    }
                }
                match last_error {
                    Some(err) => Err(err),
                    None => Ok(false),
                }
            }
            PathStep::At(index) => {
                let items = array_for(step, current)?;
                let item = resolve_index(*index, items.len())
                    .and_then(|i| items.get(i))
                    .ok_or_else(|| {
                        MatchError::NotFound(format!(
                            "index {} in array of length {}",
                            index,
                            items.len()
                        ))
                    })?;
                self.match_steps(rest, item)
            }
        }
    }
}

fn array_for<'v>(step: &PathStep, current: &'v Value) -> Result<&'v Vec<Value>, MatchError> {
    current.as_array().ok_or_else(|| {
        MatchError::TypeMismatch(format!(
            "{} expects an array, but got {}",
            step,
            type_name(current)
        ))
    })
}

/// map a signed index onto an array of `len` elements
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        usize::try_from(index).ok().filter(|i| *i < len)
    } else {
        let back = usize::try_from(index.unsigned_abs()).ok()?;
        len.checked_sub(back)
    }
}
