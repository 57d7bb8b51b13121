//! Shape contracts for consumed resources.
//!
//! # Responsibility
//! - Let a consumer declare a pure check over values resolved for it.
//! - Report pass/fail with a human-readable reason for wiring diagnostics.
//!
//! # Invariants
//! - Validators are pure: no state, no side effects, same verdict for the
//!   same value.
//! - A validator never panics on a foreign payload type; a type mismatch is
//!   a `Fail` with a reason.

use crate::feature::resource::ResourceValue;
use std::sync::Arc;

/// Verdict of one contract check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCheck {
    Pass,
    Fail(String),
}

impl ContractCheck {
    /// Returns `true` for a passing verdict.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns the failure reason for a failing verdict.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Pass => None,
            Self::Fail(reason) => Some(reason),
        }
    }
}

/// Named pure check applied to every value resolved for a consumption.
#[derive(Clone)]
pub struct ContractValidator {
    name: String,
    check: Arc<dyn Fn(&ResourceValue) -> ContractCheck + Send + Sync>,
}

impl ContractValidator {
    /// Creates a validator from a name and a pure check function.
    pub fn new<F>(name: &str, check: F) -> Self
    where
        F: Fn(&ResourceValue) -> ContractCheck + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            check: Arc::new(check),
        }
    }

    /// Returns the validator's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the check against one value.
    pub fn check(&self, value: &ResourceValue) -> ContractCheck {
        (self.check)(value)
    }

    /// Validator that requires the payload to downcast to `T`.
    ///
    /// `type_name` is the reported name, not a language-level identifier;
    /// pick the name consumers will recognize in a wiring error.
    pub fn expect_type<T: Send + Sync + 'static>(type_name: &str) -> Self {
        let reported = type_name.to_string();
        Self::new(&format!("expect_type({type_name})"), move |value| {
            if value.downcast_ref::<T>().is_some() {
                ContractCheck::Pass
            } else {
                ContractCheck::Fail(format!("value is not a {reported}"))
            }
        })
    }

    /// Validator that passes only when every inner validator passes.
    ///
    /// The first failing inner validator's reason is reported, prefixed with
    /// its name.
    pub fn all_of(name: &str, validators: Vec<ContractValidator>) -> Self {
        Self::new(name, move |value| {
            for validator in &validators {
                if let ContractCheck::Fail(reason) = validator.check(value) {
                    return ContractCheck::Fail(format!("{}: {reason}", validator.name()));
                }
            }
            ContractCheck::Pass
        })
    }
}

impl std::fmt::Debug for ContractValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContractValidator({})", self.name)
    }
}
