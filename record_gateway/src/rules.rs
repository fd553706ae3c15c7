//! Field validation rules
//!
//! Callers describe per-field constraints as pipe-delimited rule strings
//! ("required|max:50") and get back a field-to-message mapping for whatever
//! failed. Rules are checked in declaration order and the first failing rule
//! wins for its field. Format rules (email, numeric, min, max) only apply to
//! values that are actually present; absent or empty optional fields pass.

use crate::record::Record;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Field name to error message, one message per failed field
pub type FieldErrors = BTreeMap<String, String>;

/// Errors raised while parsing a rule string
#[derive(Debug, Clone, PartialEq)]
pub enum RuleParseError {
    /// Rule token is not one of the supported rules
    UnknownRule(String),
    /// Rule requires an argument but none was given ("min" without ":N")
    MissingArgument(String),
    /// Rule argument is not a valid length
    InvalidArgument { rule: String, argument: String },
}

impl fmt::Display for RuleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleParseError::UnknownRule(token) => {
                write!(f, "Unknown validation rule '{}'", token)
            }
            RuleParseError::MissingArgument(rule) => {
                write!(f, "Validation rule '{}' requires an argument", rule)
            }
            RuleParseError::InvalidArgument { rule, argument } => {
                write!(
                    f,
                    "Invalid argument '{}' for validation rule '{}'",
                    argument, rule
                )
            }
        }
    }
}

impl std::error::Error for RuleParseError {}

/// A single validation rule
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    Email,
    Numeric,
    MinLen(usize),
    MaxLen(usize),
}

impl Rule {
    /// Check one value against this rule, returning an error message on failure
    fn check(&self, field: &str, value: Option<&Value>) -> Option<String> {
        let present = !is_absent(value);

        match self {
            Rule::Required => (!present).then(|| format!("{} is required", field)),
            // Format rules never fail an absent or empty optional field
            _ if !present => None,
            Rule::Email => {
                let value = value?;
                match value {
                    Value::String(s) if is_valid_email(s) => None,
                    _ => Some(format!("{} must be a valid email address", field)),
                }
            }
            Rule::Numeric => {
                let value = value?;
                if is_numeric(value) {
                    None
                } else {
                    Some(format!("{} must be a number", field))
                }
            }
            Rule::MinLen(min) => {
                let value = value?;
                if length_of(value) < *min {
                    Some(format!("{} must be at least {} characters", field, min))
                } else {
                    None
                }
            }
            Rule::MaxLen(max) => {
                let value = value?;
                if length_of(value) > *max {
                    Some(format!("{} must be at most {} characters", field, max))
                } else {
                    None
                }
            }
        }
    }
}

/// Parsed rules for one field, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRules {
    rules: Vec<Rule>,
}

impl FieldRules {
    /// Parse a pipe-delimited rule string such as "required|email|max:100"
    pub fn parse(spec: &str) -> Result<Self, RuleParseError> {
        let mut rules = Vec::new();

        for token in spec.split('|') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            let rule = match token.split_once(':') {
                None => match token {
                    "required" => Rule::Required,
                    "email" => Rule::Email,
                    "numeric" => Rule::Numeric,
                    "min" | "max" => {
                        return Err(RuleParseError::MissingArgument(token.to_string()))
                    }
                    other => return Err(RuleParseError::UnknownRule(other.to_string())),
                },
                Some((name, argument)) => match name {
                    "min" => Rule::MinLen(parse_length(name, argument)?),
                    "max" => Rule::MaxLen(parse_length(name, argument)?),
                    other => return Err(RuleParseError::UnknownRule(other.to_string())),
                },
            };
            rules.push(rule);
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

fn parse_length(rule: &str, argument: &str) -> Result<usize, RuleParseError> {
    argument
        .trim()
        .parse()
        .map_err(|_| RuleParseError::InvalidArgument {
            rule: rule.to_string(),
            argument: argument.to_string(),
        })
}

/// Validation rules for a whole payload, field by field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: Vec<(String, FieldRules)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rules for one field, parsed from a pipe-delimited string
    pub fn field(mut self, name: &str, spec: &str) -> Result<Self, RuleParseError> {
        let rules = FieldRules::parse(spec)?;
        self.fields.push((name.to_string(), rules));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check a payload against every field's rules
    ///
    /// Returns an empty mapping when everything passes. Each failed field
    /// carries the message of its first failing rule only.
    pub fn validate(&self, data: &Record) -> FieldErrors {
        let mut errors = FieldErrors::new();

        for (field, rules) in &self.fields {
            let value = data.get(field.as_str());
            for rule in rules.rules() {
                if let Some(message) = rule.check(field, value) {
                    errors.insert(field.clone(), message);
                    break;
                }
            }
        }

        errors
    }
}

/// Absent, null, empty string and empty collections all count as "not supplied"
fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

fn is_valid_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            let trimmed = s.trim();
            !trimmed.is_empty()
                && trimmed
                    .parse::<f64>()
                    .map(|parsed| parsed.is_finite())
                    .unwrap_or(false)
        }
        _ => false,
    }
}

/// Length of the value's text form, in characters
fn length_of(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        other => other.to_string().chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_required_rejects_empty_string() {
        let rules = RuleSet::new().field("name", "required").unwrap();
        let errors = rules.validate(&record(json!({"name": ""})));

        assert!(errors.contains_key("name"));
    }

    #[test]
    fn test_required_rejects_absent_field() {
        let rules = RuleSet::new().field("name", "required").unwrap();
        let errors = rules.validate(&record(json!({})));

        assert!(errors.contains_key("name"));
    }

    #[test]
    fn test_required_rejects_null_and_empty_collections() {
        let rules = RuleSet::new()
            .field("a", "required")
            .unwrap()
            .field("b", "required")
            .unwrap();

        let errors = rules.validate(&record(json!({"a": null, "b": []})));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_required_accepts_present_value() {
        let rules = RuleSet::new().field("name", "required").unwrap();
        let errors = rules.validate(&record(json!({"name": "Alice"})));

        assert!(errors.is_empty());
    }

    #[test]
    fn test_email_rule() {
        let rules = RuleSet::new().field("email", "email").unwrap();

        let errors = rules.validate(&record(json!({"email": "not-an-email"})));
        assert!(errors.contains_key("email"));

        let errors = rules.validate(&record(json!({"email": "alice@example.com"})));
        assert!(errors.is_empty());

        // Absent optional field never fails a format rule
        let errors = rules.validate(&record(json!({})));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_email_rejects_malformed_addresses() {
        let rules = RuleSet::new().field("email", "email").unwrap();

        for bad in ["@example.com", "alice@", "alice@example", "a b@example.com"] {
            let errors = rules.validate(&record(json!({ "email": bad })));
            assert!(errors.contains_key("email"), "should reject: {}", bad);
        }
    }

    #[test]
    fn test_numeric_rule() {
        let rules = RuleSet::new().field("age", "numeric").unwrap();

        assert!(rules.validate(&record(json!({"age": 21}))).is_empty());
        assert!(rules.validate(&record(json!({"age": "21"}))).is_empty());
        assert!(rules.validate(&record(json!({"age": "21.5"}))).is_empty());
        assert!(rules
            .validate(&record(json!({"age": "twenty"})))
            .contains_key("age"));
    }

    #[test]
    fn test_numeric_with_min_passes_for_numeric_string() {
        let rules = RuleSet::new().field("age", "numeric|min:1").unwrap();
        let errors = rules.validate(&record(json!({"age": "5"})));

        assert!(errors.is_empty());
    }

    #[test]
    fn test_min_and_max_length() {
        let rules = RuleSet::new()
            .field("code", "min:3")
            .unwrap()
            .field("name", "max:5")
            .unwrap();

        let errors = rules.validate(&record(json!({"code": "ab", "name": "toolongname"})));
        assert!(errors.contains_key("code"));
        assert!(errors.contains_key("name"));

        let errors = rules.validate(&record(json!({"code": "abc", "name": "ok"})));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_length_rules_skip_absent_values() {
        let rules = RuleSet::new().field("code", "min:3").unwrap();

        assert!(rules.validate(&record(json!({}))).is_empty());
        assert!(rules.validate(&record(json!({"code": ""}))).is_empty());
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let rules = RuleSet::new().field("email", "required|email").unwrap();
        let errors = rules.validate(&record(json!({"email": ""})));

        assert_eq!(errors.get("email").unwrap(), "email is required");
    }

    #[test]
    fn test_rules_run_in_declaration_order() {
        let rules = RuleSet::new().field("code", "min:10|max:2").unwrap();
        let errors = rules.validate(&record(json!({"code": "short"})));

        // min:10 fails first even though max:2 would fail too
        assert!(errors.get("code").unwrap().contains("at least 10"));
    }

    #[test]
    fn test_unknown_rule_is_a_parse_error() {
        let result = RuleSet::new().field("name", "required|shouty");
        assert_eq!(
            result.unwrap_err(),
            RuleParseError::UnknownRule("shouty".to_string())
        );
    }

    #[test]
    fn test_min_without_argument_is_a_parse_error() {
        let result = FieldRules::parse("min");
        assert_eq!(
            result.unwrap_err(),
            RuleParseError::MissingArgument("min".to_string())
        );

        let result = FieldRules::parse("min:abc");
        assert!(matches!(
            result.unwrap_err(),
            RuleParseError::InvalidArgument { .. }
        ));
    }

    #[test]
    fn test_empty_rule_string_validates_nothing() {
        let rules = RuleSet::new().field("name", "").unwrap();
        assert!(rules.validate(&record(json!({"name": ""}))).is_empty());
    }
}
