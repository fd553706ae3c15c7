//! Query construction
//!
//! Typed WHERE clause predicates.

use crate::validation::{ValidatedFieldName, ValidationError};
use serde_json::Value;

/// Comparison operators available in a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Eq,        // =
    Ne,        // !=
    Gt,        // >
    Gte,       // >=
    Lt,        // <
    Lte,       // <=
    Like,      // LIKE
    ILike,     // ILIKE (case insensitive)
    In,        // IN
    NotIn,     // NOT IN
    IsNull,    // IS NULL
    IsNotNull, // IS NOT NULL
}

/// Single predicate in a WHERE clause
#[derive(Debug, Clone)]
pub struct Predicate {
    pub column: ValidatedFieldName,
    pub op: Op,
    pub value: Option<Value>, // None for IS NULL/IS NOT NULL
}

/// Ordered list of predicates, joined with AND
///
/// Builder methods validate the column name up front and return `Err` for
/// anything that is not a plain identifier, so a hostile name never reaches
/// a SQL string. Values always travel as bound parameters.
///
/// # Example
/// ```ignore
/// let conditions = Conditions::new()
///     .eq("status", json!("active"))?
///     .gt("lessons_taken", json!(10))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    predicates: Vec<Predicate>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map plain column/value pairs onto predicates
    ///
    /// A sequence value becomes `IN`, JSON null becomes `IS NULL`, any other
    /// scalar becomes an equality check. Pair order is preserved so the
    /// resulting placeholders line up with iteration order.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut conditions = Self::new();
        for (column, value) in pairs {
            conditions = match value {
                Value::Array(members) => conditions.in_values(&column, members)?,
                Value::Null => conditions.push(&column, Op::Eq, None)?,
                scalar => conditions.eq(&column, scalar)?,
            };
        }
        Ok(conditions)
    }

    fn push(mut self, column: &str, op: Op, value: Option<Value>) -> Result<Self, ValidationError> {
        self.predicates.push(Predicate {
            column: ValidatedFieldName::new(column)?,
            op,
            value,
        });
        Ok(self)
    }

    /// Equal condition
    pub fn eq(self, column: &str, value: Value) -> Result<Self, ValidationError> {
        self.push(column, Op::Eq, Some(value))
    }

    /// Not equal condition
    pub fn ne(self, column: &str, value: Value) -> Result<Self, ValidationError> {
        self.push(column, Op::Ne, Some(value))
    }

    /// Greater than condition
    pub fn gt(self, column: &str, value: Value) -> Result<Self, ValidationError> {
        self.push(column, Op::Gt, Some(value))
    }

    /// Greater than or equal condition
    pub fn gte(self, column: &str, value: Value) -> Result<Self, ValidationError> {
        self.push(column, Op::Gte, Some(value))
    }

    /// Less than condition
    pub fn lt(self, column: &str, value: Value) -> Result<Self, ValidationError> {
        self.push(column, Op::Lt, Some(value))
    }

    /// Less than or equal condition
    pub fn lte(self, column: &str, value: Value) -> Result<Self, ValidationError> {
        self.push(column, Op::Lte, Some(value))
    }

    /// LIKE condition; the pattern is carried as a bound parameter
    pub fn like(self, column: &str, pattern: &str) -> Result<Self, ValidationError> {
        self.push(column, Op::Like, Some(Value::String(pattern.to_string())))
    }

    /// ILIKE condition (case insensitive)
    pub fn ilike(self, column: &str, pattern: &str) -> Result<Self, ValidationError> {
        self.push(column, Op::ILike, Some(Value::String(pattern.to_string())))
    }

    /// IN condition
    pub fn in_values(self, column: &str, values: Vec<Value>) -> Result<Self, ValidationError> {
        self.push(column, Op::In, Some(Value::Array(values)))
    }

    /// NOT IN condition
    pub fn not_in_values(self, column: &str, values: Vec<Value>) -> Result<Self, ValidationError> {
        self.push(column, Op::NotIn, Some(Value::Array(values)))
    }

    /// IS NULL condition
    pub fn is_null(self, column: &str) -> Result<Self, ValidationError> {
        self.push(column, Op::IsNull, None)
    }

    /// IS NOT NULL condition
    pub fn is_not_null(self, column: &str) -> Result<Self, ValidationError> {
        self.push(column, Op::IsNotNull, None)
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }
}
