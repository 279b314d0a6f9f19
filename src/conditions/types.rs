//! core types for the condition system

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value;

use super::error::MatchError;
use super::parser::parse_field_path;

/// comparison operators supported in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// equality: =, ==, ===, eq
    Eq,
    /// inequality: !=, <>, ne, ≠, ≹, ≸
    Ne,
    /// set membership: in
    In,
    /// less than: <, lt, ≱
    Lt,
    /// less than or equal: <=, le, ≤, ≦, ≯
    Lte,
    /// greater than: >, gt, ≰
    Gt,
    /// greater than or equal: >=, ge, ≥, ≧, ≮
    Gte,
    /// numeric inequality expressed through ordering: ≶, ≷
    LessOrGreater,
}

lazy_static::lazy_static! {
    /// every accepted operator token, lowercase
    static ref OPERATOR_ALIASES: HashMap<&'static str, CompareOp> = {
        let table: [(&[&'static str], CompareOp); 8] = [
            (&["=", "==", "===", "eq"], CompareOp::Eq),
            (&["!=", "<>", "ne", "≠", "≹", "≸"], CompareOp::Ne),
            (&["in"], CompareOp::In),
            (&["<", "lt", "≱"], CompareOp::Lt),
            (&["<=", "le", "≤", "≦", "≯"], CompareOp::Lte),
            (&[">", "gt", "≰"], CompareOp::Gt),
            (&[">=", "ge", "≥", "≧", "≮"], CompareOp::Gte),
            (&["≶", "≷"], CompareOp::LessOrGreater),
        ];

        let mut aliases = HashMap::new();
        for (tokens, op) in table {
            for token in tokens {
                aliases.insert(*token, op);
            }
        }
        aliases
    };
}

impl CompareOp {
    /// parse operator from string (case-insensitive, surrounding whitespace ignored)
    pub fn parse(s: &str) -> Option<Self> {
        OPERATOR_ALIASES
            .get(s.trim().to_lowercase().as_str())
            .copied()
    }

    /// whether the operator needs both operands to be ordered (numbers or time instants)
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            CompareOp::Lt
                | CompareOp::Lte
                | CompareOp::Gt
                | CompareOp::Gte
                | CompareOp::LessOrGreater
        )
    }

    /// check an ordering result against this operator
    pub(crate) fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne | CompareOp::LessOrGreater => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::In => false,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::Ne => write!(f, "!="),
            CompareOp::In => write!(f, "in"),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::LessOrGreater => write!(f, "≶"),
        }
    }
}

/// one segment of a parsed field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// object member lookup
    Key(String),
    /// `[*]`: every array element must match the rest of the path
    All,
    /// `[+]`: at least one array element must match the rest of the path
    Any,
    /// `[n]`: the element at a signed index, negative counts from the end
    At(i64),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => write!(f, "{}", key),
            PathStep::All => write!(f, "[*]"),
            PathStep::Any => write!(f, "[+]"),
            PathStep::At(index) => write!(f, "[{}]", index),
        }
    }
}

/// a leaf predicate: the value at `field` compared against `value` with `op`
///
/// The parsed path is computed on first use and cached for the lifetime of
/// the expression. Initialization goes through a `OnceLock`, so a shared
/// expression can be matched from several threads at once.
#[derive(Debug, Clone)]
pub struct Expression {
    field: String,
    op: String,
    value: Value,
    steps: OnceLock<Vec<PathStep>>,
}

impl Expression {
    /// create an expression from an already-imported target value
    pub fn new(field: impl Into<String>, op: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value,
            steps: OnceLock::new(),
        }
    }

    /// create an expression, importing the target from any serializable value
    pub fn try_new<T>(
        field: impl Into<String>,
        op: impl Into<String>,
        value: &T,
    ) -> Result<Self, MatchError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value).map_err(MatchError::Import)?;
        Ok(Self::new(field, op, value))
    }

    /// dotted field path as written; empty means the current value itself
    pub fn field(&self) -> &str {
        &self.field
    }

    /// operator token as written
    pub fn op(&self) -> &str {
        &self.op
    }

    /// comparison target
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// parsed path steps, empty when no field was given
    pub fn steps(&self) -> &[PathStep] {
        self.steps.get_or_init(|| {
            if self.field.is_empty() {
                Vec::new()
            } else {
                parse_field_path(&self.field)
            }
        })
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.op == other.op && self.value == other.value
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = if self.field.is_empty() {
            "$"
        } else {
            self.field.as_str()
        };
        write!(f, "{} {} {}", field, self.op.trim(), self.value)
    }
}

/// the condition tree
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// at least one child must match (OR), first match wins
    Or(Vec<Condition>),
    /// every child must match (AND)
    And(Vec<Condition>),
    /// negate the child (NOT)
    Not(Box<Condition>),
    /// a leaf expression
    Expr(Expression),
}

impl Condition {
    /// create an OR condition
    ///
    /// an empty list evaluates to false. the decoder treats `"or": []` as
    /// absent, so an empty OR does not survive a serialize/decode round trip.
    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Or(conditions)
    }

    /// create an AND condition
    ///
    /// an empty list evaluates to true. like [`Condition::or`], an empty AND
    /// decodes as absent after a round trip.
    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::And(conditions)
    }

    /// create a NOT condition
    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    /// create a leaf condition
    pub fn expr(field: impl Into<String>, op: impl Into<String>, value: Value) -> Self {
        Condition::Expr(Expression::new(field, op, value))
    }

    /// every leaf expression in the tree, depth first
    pub fn expressions(&self) -> Vec<&Expression> {
        let mut leaves = Vec::new();
        self.collect_expressions(&mut leaves);
        leaves
    }

    fn collect_expressions<'a>(&'a self, leaves: &mut Vec<&'a Expression>) {
        match self {
            Condition::Or(children) | Condition::And(children) => {
                for child in children {
                    child.collect_expressions(leaves);
                }
            }
            Condition::Not(inner) => inner.collect_expressions(leaves),
            Condition::Expr(expr) => leaves.push(expr),
        }
    }
}

impl From<Expression> for Condition {
    fn from(expr: Expression) -> Self {
        Condition::Expr(expr)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, items: &[Condition]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, c) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Or(conditions) => write_list(f, "or", conditions),
            Condition::And(conditions) => write_list(f, "and", conditions),
            Condition::Not(inner) => write!(f, "not({})", inner),
            Condition::Expr(expr) => write!(f, "{}", expr),
        }
    }
}
