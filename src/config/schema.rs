use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::conditions::{Condition, MatchError, MatchOptions, Policy};

/// a rule file as written on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub options: OptionsConfig,
    #[serde(default)]
    pub rules: BTreeMap<String, Condition>,
}

/// match options as written in a rule file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsConfig {
    #[serde(default)]
    pub when_not_found: Policy,
    #[serde(default)]
    pub when_type_mismatch: Policy,
    /// chrono strftime layout, e.g. "%Y-%m-%d"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time_format: Option<String>,
}

impl OptionsConfig {
    pub fn to_options(&self) -> MatchOptions {
        let options = MatchOptions::new()
            .with_not_found(self.when_not_found)
            .with_type_mismatch(self.when_type_mismatch);

        match &self.date_time_format {
            Some(layout) => options.with_date_time_format(layout),
            None => options,
        }
    }
}

/// error returned when evaluating a named rule
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("unknown rule: '{0}'")]
    UnknownRule(String),

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// named conditions sharing one set of match options
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    options: MatchOptions,
    rules: BTreeMap<String, Condition>,
}

impl RuleSet {
    pub fn new(options: MatchOptions, rules: BTreeMap<String, Condition>) -> Self {
        Self { options, rules }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn get(&self, name: &str) -> Option<&Condition> {
        self.rules.get(name)
    }

    /// rule names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// evaluate one named rule against a value
    pub fn matches(&self, name: &str, value: &Value) -> Result<bool, RuleError> {
        let condition = self
            .get(name)
            .ok_or_else(|| RuleError::UnknownRule(name.to_string()))?;
        Ok(condition.evaluate(value, &self.options)?)
    }

    /// names of every rule the value satisfies, stopping at the first error
    pub fn matching(&self, value: &Value) -> Result<Vec<&str>, MatchError> {
        let mut matched = Vec::new();
        for (name, condition) in &self.rules {
            if condition.evaluate(value, &self.options)? {
                matched.push(name.as_str());
            }
        }
        Ok(matched)
    }
}

impl From<RuleFile> for RuleSet {
    fn from(file: RuleFile) -> Self {
        Self::new(file.options.to_options(), file.rules)
    }
}
