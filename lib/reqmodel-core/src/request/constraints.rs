use regex::Regex;
use serde_json::Value;

/// Validation constraints checked on a field value before building the request.
///
/// Length bounds apply to strings (counted in characters) and arrays (counted in items),
/// numeric bounds to numbers, the pattern to strings. A constraint that does not apply
/// to the value type is ignored.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub(super) min_length: Option<usize>,
    pub(super) max_length: Option<usize>,
    pub(super) minimum: Option<f64>,
    pub(super) maximum: Option<f64>,
    pub(super) pattern: Option<Regex>,
}

/// A field value that does not satisfy one of its constraints.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
#[display("field '{field}' violates {constraint}, got {value}")]
pub struct ConstraintViolation {
    /// The declared field name.
    pub field: String,
    /// The violated constraint, e.g. `min_length=3`.
    pub constraint: String,
    /// The offending value.
    pub value: Value,
}

impl Constraints {
    /// The minimum length, if any.
    #[must_use]
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// The maximum length, if any.
    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// The inclusive numeric lower bound, if any.
    #[must_use]
    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    /// The inclusive numeric upper bound, if any.
    #[must_use]
    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }

    /// The pattern strings must match, if any.
    #[must_use]
    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Checks a value, returning every violated constraint.
    #[must_use]
    pub fn check(&self, field: &str, value: &Value) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();
        let mut violated = |constraint: String| {
            violations.push(ConstraintViolation {
                field: field.to_string(),
                constraint,
                value: value.clone(),
            });
        };

        let length = match value {
            Value::String(text) => Some(text.chars().count()),
            Value::Array(items) => Some(items.len()),
            _ => None,
        };
        if let Some(length) = length {
            if let Some(min) = self.min_length.filter(|min| length < *min) {
                violated(format!("min_length={min}"));
            }
            if let Some(max) = self.max_length.filter(|max| length > *max) {
                violated(format!("max_length={max}"));
            }
        }

        if let Some(number) = value.as_f64() {
            if let Some(min) = self.minimum.filter(|min| number < *min) {
                violated(format!("minimum={min}"));
            }
            if let Some(max) = self.maximum.filter(|max| number > *max) {
                violated(format!("maximum={max}"));
            }
        }

        if let (Some(pattern), Value::String(text)) = (&self.pattern, value)
            && !pattern.is_match(text)
        {
            violated(format!("pattern={}", pattern.as_str()));
        }

        violations
    }
}
