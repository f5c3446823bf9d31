//! Validation gate.
//!
//! # Responsibilities
//! - Run the configured [`RuleEngine`] against a freshly decoded value
//! - Flatten nested `validator` reports into a list of [`Violation`]s
//!
//! # Design Decisions
//! - Constraint semantics belong to the engine; this module never interprets them
//! - Every violated constraint is reported, not just the first
//! - Violations are sorted by path so descriptions are stable

pub mod engine;

use std::fmt;

use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

pub use engine::{RuleEngine, Rules, Schema};

/// Key `validator` uses for schema-level errors.
const SCHEMA_LEVEL: &str = "__all__";

/// Run `engine` against `instance`.
pub fn check<T: Schema>(engine: &dyn RuleEngine, instance: &T) -> Result<(), Violations> {
    engine.check(instance).map_err(Violations::from)
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted path to the field (`profile.email`, `items.0.sku`).
    #[serde(rename = "field")]
    pub path: String,
    /// Rule name (`email`, `range`, `required`, or a custom rule name).
    pub code: String,
    /// Message attached to the rule, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.message.as_deref().unwrap_or(&self.code);
        if self.path.is_empty() {
            f.write_str(detail)
        } else {
            write!(f, "{}: {}", self.path, detail)
        }
    }
}

/// Every constraint a decoded value violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `path` violated the rule named `code`.
    pub fn contains(&self, path: &str, code: &str) -> bool {
        self.0.iter().any(|v| v.path == path && v.code == code)
    }
}

impl From<ValidationErrors> for Violations {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations = Vec::new();
        collect(&errors, "", &mut violations);
        violations.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.code.cmp(&b.code)));
        Self(violations)
    }
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<Violation>) {
    for (field, kind) in errors.errors() {
        let field = field.to_string();
        let path = match (prefix.is_empty(), field == SCHEMA_LEVEL) {
            (_, true) => prefix.to_string(),
            (true, false) => field,
            (false, false) => format!("{prefix}.{field}"),
        };

        match kind {
            ValidationErrorsKind::Field(errs) => out.extend(errs.iter().map(|e| Violation {
                path: path.clone(),
                code: e.code.to_string(),
                message: e.message.as_ref().map(|m| m.to_string()),
            })),
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}.{index}"), out);
                }
            }
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Profile {
        #[validate(length(min = 1))]
        name: String,
        #[validate(email(message = "must be an email address"))]
        email: String,
    }

    #[derive(Validate)]
    struct Account {
        #[validate(range(min = 1))]
        id: i64,
        #[validate(nested)]
        profile: Profile,
        #[validate(nested)]
        friends: Vec<Profile>,
    }

    fn profile(name: &str, email: &str) -> Profile {
        Profile {
            name: name.into(),
            email: email.into(),
        }
    }

    #[test]
    fn test_valid_instance() {
        let account = Account {
            id: 1,
            profile: profile("John", "john@example.com"),
            friends: vec![],
        };
        assert!(check(&Rules::new(), &account).is_ok());
    }

    #[test]
    fn test_nested_and_list_paths() {
        let account = Account {
            id: 0,
            profile: profile("John", "not-an-email"),
            friends: vec![profile("Ann", "ann@example.com"), profile("", "bob@example.com")],
        };

        let violations = check(&Rules::new(), &account).unwrap_err();
        assert_eq!(violations.len(), 3);
        assert!(violations.contains("id", "range"));
        assert!(violations.contains("profile.email", "email"));
        assert!(violations.contains("friends.1.name", "length"));
        assert_eq!(
            violations.to_string(),
            "friends.1.name: length; id: range; profile.email: must be an email address"
        );
    }
}
