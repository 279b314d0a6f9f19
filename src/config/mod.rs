//! rule files: named conditions plus the options they are matched with
//!
//! rule files are JSON5 (plain JSON is accepted as-is):
//!
//! ```json5
//! {
//!   options: { when_not_found: "return_false", date_time_format: "%Y-%m-%d" },
//!   rules: {
//!     adult: ["user.age", ">=", 18],
//!     recent: { and: [["orders.[+].date", ">=", "2024-01-01"], ["user.banned", "=", false]] },
//!   },
//! }
//! ```

mod schema;

pub use schema::{OptionsConfig, RuleError, RuleFile, RuleSet};

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

use crate::conditions::{dropped_segments, CompareOp, DateTimeFormat};

/// load a rule set from a file
pub fn load(path: &Path) -> Result<RuleSet> {
    Ok(read(path)?.into())
}

/// parse a rule set from JSON5 text
pub fn parse(content: &str) -> Result<RuleSet> {
    Ok(parse_file(content)?.into())
}

fn parse_file(content: &str) -> Result<RuleFile> {
    json5::from_str(content).context("failed to parse rules")
}

fn read(path: &Path) -> Result<RuleFile> {
    if !path.exists() {
        return Err(anyhow!("rule file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read rule file: {}", path.display()))?;

    parse_file(&content).with_context(|| format!("invalid rule file: {}", path.display()))
}

/// verify a rule file and return a list of problems
///
/// a file that loads can still hold rules that fail at match time or
/// silently ignore parts of their definition; those are reported here.
pub fn verify(path: &Path) -> Result<Vec<String>> {
    Ok(check(&read(path)?))
}

/// verify rule file text, see [`verify`]
pub fn verify_str(content: &str) -> Result<Vec<String>> {
    Ok(check(&parse_file(content)?))
}

fn check(file: &RuleFile) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(layout) = &file.options.date_time_format {
        if DateTimeFormat::new(layout).is_none() {
            errors.push(format!(
                "options.date_time_format: '{}' cannot round-trip a date-time and will be ignored",
                layout
            ));
        }
    }

    for (name, condition) in &file.rules {
        let prefix = format!("rules.{}", name);

        for expr in condition.expressions() {
            if CompareOp::parse(expr.op()).is_none() {
                errors.push(format!("{}: unknown operator '{}'", prefix, expr.op()));
            }

            for segment in dropped_segments(expr.field()) {
                errors.push(format!(
                    "{}: segment '{}' in field '{}' is not [*], [+] or an index and will be ignored",
                    prefix,
                    segment,
                    expr.field()
                ));
            }
        }
    }

    errors
}
