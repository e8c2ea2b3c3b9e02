//! Declarative field validators.
//!
//! Rules other than [`Rule::Required`] accept a blank value, so optional
//! fields only need the rules for their shape. Rules are checked in order and
//! the first failure wins.

#[cfg(test)]
#[path = "validators_test.rs"]
mod validators_test;

/// Why a field value was rejected. Messages are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{label} is required")]
    Required { label: String },
    #[error("{label} must be a valid email address")]
    InvalidEmail { label: String },
    #[error("{label} must be at least {min} characters")]
    TooShort { label: String, min: usize },
    #[error("{label} must be at most {max} characters")]
    TooLong { label: String, max: usize },
    #[error("{label} must match {other}")]
    Mismatch { label: String, other: String },
}

/// One constraint on a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    /// Value must equal another field's current value (e.g. password confirmation).
    MatchesField { label: String, value: String },
}

/// Labelled list of rules for one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidator {
    label: String,
    rules: Vec<Rule>,
}

impl FieldValidator {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), rules: Vec::new() }
    }

    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    #[must_use]
    pub fn email(self) -> Self {
        self.rule(Rule::Email)
    }

    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.rule(Rule::MinLength(min))
    }

    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.rule(Rule::MaxLength(max))
    }

    #[must_use]
    pub fn matches(self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rule(Rule::MatchesField { label: label.into(), value: value.into() })
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Check `value` against every rule in order.
    ///
    /// # Errors
    ///
    /// Returns the first rule violation.
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        let blank = is_blank(value);
        for rule in &self.rules {
            if blank && *rule != Rule::Required {
                continue;
            }
            self.check(rule, value)?;
        }
        Ok(())
    }

    fn check(&self, rule: &Rule, value: &str) -> Result<(), ValidationError> {
        let label = || self.label.clone();
        match rule {
            Rule::Required if is_blank(value) => Err(ValidationError::Required { label: label() }),
            Rule::Email if !is_email(value) => Err(ValidationError::InvalidEmail { label: label() }),
            Rule::MinLength(min) if value.chars().count() < *min => {
                Err(ValidationError::TooShort { label: label(), min: *min })
            }
            Rule::MaxLength(max) if value.chars().count() > *max => {
                Err(ValidationError::TooLong { label: label(), max: *max })
            }
            Rule::MatchesField { label: other, value: expected } if value != expected.as_str() => {
                Err(ValidationError::Mismatch { label: label(), other: other.clone() })
            }
            _ => Ok(()),
        }
    }
}

/// Validate several `(validator, value)` pairs, collecting one error per failing field.
///
/// # Errors
///
/// Returns every field's first violation, in input order.
pub fn validate_fields(fields: &[(&FieldValidator, &str)]) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = fields
        .iter()
        .filter_map(|(validator, value)| validator.validate(value).err())
        .collect();
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Structural email check: one `@`, non-empty local part, dotted domain with
/// no empty labels, no whitespace.
#[must_use]
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}
