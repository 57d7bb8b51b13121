//! In-process feature registry with populate-then-freeze lifecycle.
//!
//! # Responsibility
//! - Hold registered feature descriptors in registration order.
//! - Reject duplicate feature names and duplicate exact provided keys.
//! - Seal the descriptor set before resolution begins.
//!
//! # Invariants
//! - Registration order is preserved and is the only ordering guarantee
//!   offered to wildcard consumers; ordering is caller-supplied.
//! - Once frozen, the descriptor set never changes; reads need no
//!   synchronization.
//! - Each exact provided key has exactly one providing feature.

use crate::feature::descriptor::{DescriptorError, FeatureDescriptor};
use crate::feature::key::ResourceKey;
use log::info;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ordered registry of feature descriptors.
#[derive(Debug, Default)]
pub struct FeatureRegistry {
    features: Vec<FeatureDescriptor>,
    provided_keys: BTreeMap<String, String>,
    frozen: bool,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one feature descriptor.
    ///
    /// Fails when the registry is frozen, the descriptor's own declaration is
    /// invalid, the feature name is taken, or an exact provided key collides
    /// with one from an already-registered feature.
    pub fn register(&mut self, descriptor: FeatureDescriptor) -> Result<(), RegistryError> {
        if self.frozen {
            return Err(RegistryError::Frozen(descriptor.name().to_string()));
        }
        descriptor.validate()?;

        let name = descriptor.name().to_string();
        if self.features.iter().any(|feature| feature.name() == name) {
            return Err(RegistryError::DuplicateFeatureName(name));
        }

        for (key, _) in descriptor.provides() {
            if let Some(other) = self.provided_keys.get(key.as_str()) {
                return Err(RegistryError::DuplicateProvidedKey {
                    key: key.clone(),
                    feature: name,
                    other_feature: other.clone(),
                });
            }
        }

        for (key, _) in descriptor.provides() {
            self.provided_keys
                .insert(key.as_str().to_string(), name.clone());
        }
        info!(
            "event=feature_registered module=feature status=ok feature={} provides={} consumes={}",
            name,
            descriptor.provides().len(),
            descriptor.consumes().len()
        );
        self.features.push(descriptor);
        Ok(())
    }

    /// Transitions the registry into read-only resolution mode.
    ///
    /// Idempotent; every later `register` call fails.
    pub fn freeze(&mut self) {
        if !self.frozen {
            self.frozen = true;
            info!(
                "event=registry_frozen module=feature status=ok features={}",
                self.features.len()
            );
        }
    }

    /// Returns `true` once the registry is sealed.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns descriptors in registration order.
    pub fn features(&self) -> &[FeatureDescriptor] {
        &self.features
    }

    /// Returns one descriptor by feature name.
    pub fn get(&self, name: &str) -> Option<&FeatureDescriptor> {
        self.features
            .iter()
            .find(|feature| feature.name() == name.trim())
    }

    /// Returns the providing feature's name for one exact key.
    pub fn provider_of(&self, key: &ResourceKey) -> Option<&str> {
        self.provided_keys.get(key.as_str()).map(String::as_str)
    }
}

/// Registration-time configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Descriptor declaration is invalid.
    InvalidDescriptor(DescriptorError),
    /// Feature name already registered.
    DuplicateFeatureName(String),
    /// Exact provided key already provided by another feature.
    DuplicateProvidedKey {
        key: ResourceKey,
        feature: String,
        other_feature: String,
    },
    /// Registration attempted after `freeze()`.
    Frozen(String),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDescriptor(err) => write!(f, "invalid feature descriptor: {err}"),
            Self::DuplicateFeatureName(name) => {
                write!(f, "feature name already registered: {name}")
            }
            Self::DuplicateProvidedKey {
                key,
                feature,
                other_feature,
            } => write!(
                f,
                "key `{key}` provided by both `{other_feature}` and `{feature}`"
            ),
            Self::Frozen(name) => {
                write!(f, "registry is frozen; cannot register feature `{name}`")
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDescriptor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DescriptorError> for RegistryError {
    fn from(value: DescriptorError) -> Self {
        Self::InvalidDescriptor(value)
    }
}
