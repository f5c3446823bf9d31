//! Rule engines.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use validator::{Validate, ValidationError, ValidationErrors};

/// A decoded value the rule engine can inspect.
///
/// Implemented for every `validator::Validate` type that can cross threads.
pub trait Schema: Validate + Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Validate + Any + Send + Sync> Schema for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Checks a decoded value against its declared constraints.
pub trait RuleEngine: Send + Sync + 'static {
    fn check(&self, instance: &dyn Schema) -> Result<(), ValidationErrors>;
}

impl<F> RuleEngine for F
where
    F: Fn(&dyn Schema) -> Result<(), ValidationErrors> + Send + Sync + 'static,
{
    fn check(&self, instance: &dyn Schema) -> Result<(), ValidationErrors> {
        self(instance)
    }
}

type Predicate = Box<dyn Fn(&dyn Any) -> bool + Send + Sync>;

struct CustomRule {
    field: &'static str,
    code: &'static str,
    predicate: Predicate,
}

/// The default engine: derived `validator` rules plus named custom rules
/// registered per schema type.
///
/// ```rust,ignore
/// let rules = Rules::new().rule::<Page, _>("id", "even", |page| page.id % 2 == 0);
/// settings.set_rule_engine(rules);
/// ```
#[derive(Default)]
pub struct Rules {
    custom: HashMap<TypeId, Vec<CustomRule>>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule named `code` on `field` of schema `T`.
    ///
    /// The rule is violated when `predicate` returns false.
    pub fn rule<T, F>(mut self, field: &'static str, code: &'static str, predicate: F) -> Self
    where
        T: Schema,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate: Predicate = Box::new(move |any: &dyn Any| {
            any.downcast_ref::<T>().map_or(true, |value| predicate(value))
        });
        self.custom
            .entry(TypeId::of::<T>())
            .or_default()
            .push(CustomRule {
                field,
                code,
                predicate,
            });
        self
    }
}

impl RuleEngine for Rules {
    fn check(&self, instance: &dyn Schema) -> Result<(), ValidationErrors> {
        let mut errors = match instance.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        let value = instance.as_any();
        if let Some(rules) = self.custom.get(&value.type_id()) {
            for rule in rules.iter().filter(|rule| !(rule.predicate)(value)) {
                errors.add(rule.field, ValidationError::new(rule.code));
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
