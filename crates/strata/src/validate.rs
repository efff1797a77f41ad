//! Aggregated validation results.
//!
//! Validation never stops at the first failure: every violated constraint is
//! collected into [`ValidationErrors`] so operators can fix a configuration
//! in one pass.

use std::fmt;

/// A constraint declared on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The field must not be left unset.
    Required,
    /// A custom predicate rejected the value.
    Custom {
        /// Name of the predicate.
        name: String,
        /// Message returned by the predicate.
        message: String,
    },
}

impl Constraint {
    /// Create a custom constraint violation.
    pub fn custom(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Custom {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Short name of the constraint, e.g. `required`.
    pub fn name(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Custom { name, .. } => name,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::Custom { name, message } => write!(f, "{name}: {message}"),
        }
    }
}

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path of the field, e.g. `database.host`.
    pub field: String,
    /// The violated constraint.
    pub constraint: Constraint,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Constraint::Required => write!(f, "field '{}' failed on 'required'", self.field),
            Constraint::Custom { name, message } => {
                write!(f, "field '{}' failed on '{name}': {message}", self.field)
            }
        }
    }
}

/// Every constraint violation found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, field: impl Into<String>, constraint: Constraint) {
        self.violations.push(FieldViolation {
            field: field.into(),
            constraint,
        });
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of recorded violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// All recorded violations, in field declaration order.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Iterate over the names of failing fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.field.as_str())
    }

    /// Returns `true` if `field` failed `constraint_name`.
    pub fn has(&self, field: &str, constraint_name: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.constraint.name() == constraint_name)
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldViolation;
    type IntoIter = std::slice::Iter<'a, FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

/// Join a parent path and a key with `.`.
pub fn field_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
