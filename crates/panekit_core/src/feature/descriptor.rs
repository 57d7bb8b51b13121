//! Feature declaration unit.
//!
//! # Responsibility
//! - Let a feature author declare provided resources, consumed resource
//!   queries, and lifecycle hooks in one value.
//! - Validate declaration-level invariants before registration.
//!
//! # Invariants
//! - The feature name is a wildcard-free dotted identifier.
//! - A descriptor never provides the same exact key twice.
//! - Provided keys never contain a wildcard; only consumption patterns may.

use crate::feature::contract::ContractValidator;
use crate::feature::key::ResourceKey;
use crate::feature::resolver::ConsumedResources;
use crate::feature::resource::{Provision, RootUiUnit};
use crate::lifecycle::status::StatusSink;
use futures::future::BoxFuture;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;

/// Asynchronous `on_init` hook.
///
/// Receives only its injected context, never an ambient global. A rejection
/// reason aborts the whole startup sequence.
pub type InitHook = Arc<dyn Fn(InitContext) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// Synchronous `on_start` hook.
///
/// Returns the application root UI unit, or `None` when this feature does not
/// supply the shell.
pub type StartHook = Arc<dyn Fn(&StartContext) -> Option<RootUiUnit> + Send + Sync>;

/// Context injected into one feature's `on_init` hook.
pub struct InitContext {
    feature: String,
    status: Arc<dyn StatusSink>,
}

impl InitContext {
    pub(crate) fn new(feature: &str, status: Arc<dyn StatusSink>) -> Self {
        Self {
            feature: feature.to_string(),
            status,
        }
    }

    /// Returns the owning feature's name.
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Reports one human-readable progress string.
    ///
    /// Reporting is diagnostics-only; it cannot fail the startup sequence.
    pub fn report(&self, message: &str) {
        self.status.report(&self.feature, message);
    }
}

/// Context injected into one feature's `on_start` hook.
pub struct StartContext {
    feature: String,
    resources: ConsumedResources,
}

impl StartContext {
    pub(crate) fn new(feature: &str, resources: ConsumedResources) -> Self {
        Self {
            feature: feature.to_string(),
            resources,
        }
    }

    /// Returns the owning feature's name.
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Returns the resources this feature declared via `consumes`.
    pub fn resources(&self) -> &ConsumedResources {
        &self.resources
    }
}

/// One consumed resource query.
#[derive(Clone, Debug)]
pub struct Consumption {
    pattern: ResourceKey,
    required: bool,
    validate: Option<ContractValidator>,
}

impl Consumption {
    /// Declares an optional consumption; zero matches is acceptable.
    pub fn optional(pattern: ResourceKey) -> Self {
        Self {
            pattern,
            required: false,
            validate: None,
        }
    }

    /// Declares a required consumption; zero matches is startup-fatal.
    pub fn required(pattern: ResourceKey) -> Self {
        Self {
            pattern,
            required: true,
            validate: None,
        }
    }

    /// Attaches a shape contract checked against every resolved value.
    pub fn with_validator(mut self, validator: ContractValidator) -> Self {
        self.validate = Some(validator);
        self
    }

    /// Returns the query pattern.
    pub fn pattern(&self) -> &ResourceKey {
        &self.pattern
    }

    /// Returns `true` when zero matches is startup-fatal.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the attached contract validator, if any.
    pub fn validator(&self) -> Option<&ContractValidator> {
        self.validate.as_ref()
    }
}

/// Declaration unit one feature author supplies.
#[derive(Clone, Default)]
pub struct FeatureDescriptor {
    name: String,
    provides: Vec<(ResourceKey, Provision)>,
    consumes: Vec<Consumption>,
    on_init: Option<InitHook>,
    on_start: Option<StartHook>,
}

impl FeatureDescriptor {
    /// Creates an empty descriptor for `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            ..Self::default()
        }
    }

    /// Declares one provided resource entry.
    pub fn provide(mut self, key: ResourceKey, provision: Provision) -> Self {
        self.provides.push((key, provision));
        self
    }

    /// Declares one consumed resource query.
    pub fn consume(mut self, consumption: Consumption) -> Self {
        self.consumes.push(consumption);
        self
    }

    /// Attaches the asynchronous `on_init` hook.
    pub fn on_init<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(InitContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        self.on_init = Some(Arc::new(move |ctx| Box::pin(hook(ctx))));
        self
    }

    /// Attaches the synchronous `on_start` hook.
    pub fn on_start<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StartContext) -> Option<RootUiUnit> + Send + Sync + 'static,
    {
        self.on_start = Some(Arc::new(hook));
        self
    }

    /// Returns the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns provided entries in declaration order.
    pub fn provides(&self) -> &[(ResourceKey, Provision)] {
        &self.provides
    }

    /// Returns consumed queries in declaration order.
    pub fn consumes(&self) -> &[Consumption] {
        &self.consumes
    }

    pub(crate) fn init_hook(&self) -> Option<&InitHook> {
        self.on_init.as_ref()
    }

    pub(crate) fn start_hook(&self) -> Option<&StartHook> {
        self.on_start.as_ref()
    }

    /// Validates declaration-level invariants.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.name.is_empty() {
            return Err(DescriptorError::EmptyName);
        }
        let name_key = ResourceKey::parse(&self.name)
            .map_err(|_| DescriptorError::InvalidName(self.name.clone()))?;
        if name_key.is_pattern() {
            return Err(DescriptorError::InvalidName(self.name.clone()));
        }

        let mut seen = BTreeSet::<&str>::new();
        for (key, _) in &self.provides {
            if key.is_pattern() {
                return Err(DescriptorError::WildcardProvidedKey {
                    feature: self.name.clone(),
                    key: key.clone(),
                });
            }
            if !seen.insert(key.as_str()) {
                return Err(DescriptorError::DuplicateProvidedKey {
                    feature: self.name.clone(),
                    key: key.clone(),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FeatureDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureDescriptor")
            .field("name", &self.name)
            .field("provides", &self.provides.len())
            .field("consumes", &self.consumes.len())
            .field("on_init", &self.on_init.is_some())
            .field("on_start", &self.on_start.is_some())
            .finish()
    }
}

/// Declaration-level descriptor errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Feature name is empty or whitespace-only.
    EmptyName,
    /// Feature name is not a wildcard-free dotted identifier.
    InvalidName(String),
    /// A provided key contains a wildcard segment.
    WildcardProvidedKey { feature: String, key: ResourceKey },
    /// The same exact key is provided twice by this descriptor.
    DuplicateProvidedKey { feature: String, key: ResourceKey },
}

impl Display for DescriptorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "feature name must not be empty"),
            Self::InvalidName(name) => write!(f, "feature name is invalid: `{name}`"),
            Self::WildcardProvidedKey { feature, key } => {
                write!(f, "feature `{feature}` provides wildcard key `{key}`")
            }
            Self::DuplicateProvidedKey { feature, key } => {
                write!(f, "feature `{feature}` provides key `{key}` twice")
            }
        }
    }
}

impl Error for DescriptorError {}
