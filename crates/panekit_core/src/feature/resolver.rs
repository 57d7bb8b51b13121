//! Resource resolution over a frozen feature registry.
//!
//! # Responsibility
//! - Answer exact-key and wildcard consumer queries in registration order.
//! - Splice collection provisions into wildcard results, one level deep.
//! - Check every declared consumption: `required` coverage and shape
//!   contracts, with provider/consumer attribution on failure.
//!
//! # Invariants
//! - Resolution only operates on a frozen registry; the descriptor list is
//!   immutable, so repeated queries return identical ordered sequences.
//! - Wildcard results are ordered by feature registration order, then by
//!   declaration order within a feature.
//! - Absence of an exact key is a normal result, never an error.

use crate::feature::descriptor::{Consumption, FeatureDescriptor};
use crate::feature::key::ResourceKey;
use crate::feature::registry::FeatureRegistry;
use crate::feature::resource::{Provision, ResourceValue};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Read-only resolver over a frozen registry.
#[derive(Clone)]
pub struct ResourceResolver {
    registry: Arc<FeatureRegistry>,
}

/// One provided value matched by a query, with provider attribution.
struct ProvidedMatch<'a> {
    provider: &'a str,
    key: &'a ResourceKey,
    value: &'a ResourceValue,
}

impl ResourceResolver {
    /// Creates a resolver over `registry`.
    ///
    /// Fails when the registry has not been frozen yet; resolution before
    /// sealing would race registration.
    pub fn new(registry: Arc<FeatureRegistry>) -> Result<Self, ResolveError> {
        if !registry.is_frozen() {
            return Err(ResolveError::UnfrozenRegistry);
        }
        Ok(Self { registry })
    }

    /// Creates a resolver where the caller already guarantees a frozen
    /// registry (orchestrator-internal path).
    pub(crate) fn over_frozen(registry: Arc<FeatureRegistry>) -> Self {
        debug_assert!(registry.is_frozen());
        Self { registry }
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    /// Resolves one exact key to its single provided value.
    ///
    /// `Ok(None)` means no feature provides the key — consumers treat that as
    /// "feature not installed", not as a failure.
    pub fn resolve_one(&self, key: &ResourceKey) -> Result<Option<ResourceValue>, ResolveError> {
        if key.is_pattern() {
            return Err(ResolveError::WildcardQuery(key.clone()));
        }
        for feature in self.registry.features() {
            for (provided_key, provision) in feature.provides() {
                if provided_key == key {
                    return match provision {
                        Provision::Single(value) => Ok(Some(value.clone())),
                        Provision::Collection(_) => {
                            Err(ResolveError::CollectionProvision(key.clone()))
                        }
                    };
                }
            }
        }
        Ok(None)
    }

    /// Resolves a pattern to an ordered sequence of values.
    ///
    /// Collection provisions are spliced in place; nested collections are not
    /// recursively flattened. An exact key is a legal pattern and yields its
    /// zero-or-more matches the same way.
    pub fn resolve_many(&self, pattern: &ResourceKey) -> Vec<ResourceValue> {
        self.collect(pattern)
            .into_iter()
            .map(|m| m.value.clone())
            .collect()
    }

    /// Checks every registered feature's consumption declarations.
    ///
    /// A `required` pattern with zero matches, or any validator failure, is a
    /// startup-fatal wiring error. Features are checked in registration
    /// order; the first error is returned.
    pub fn check_consumptions(&self) -> Result<(), ConsumptionError> {
        for feature in self.registry.features() {
            for consumption in feature.consumes() {
                self.check_consumption(feature.name(), consumption)?;
            }
        }
        Ok(())
    }

    /// Builds the consumed-resource view injected into one feature's
    /// `on_start` hook, applying the same validation as
    /// [`check_consumptions`](Self::check_consumptions).
    pub fn resolve_consumed(
        &self,
        feature: &FeatureDescriptor,
    ) -> Result<ConsumedResources, ConsumptionError> {
        let mut entries = Vec::with_capacity(feature.consumes().len());
        for consumption in feature.consumes() {
            let matches = self.check_consumption(feature.name(), consumption)?;
            entries.push(ConsumedEntry {
                pattern: consumption.pattern().as_str().to_string(),
                values: matches,
            });
        }
        Ok(ConsumedResources { entries })
    }

    fn check_consumption(
        &self,
        consumer: &str,
        consumption: &Consumption,
    ) -> Result<Vec<ResourceValue>, ConsumptionError> {
        let matches = self.collect(consumption.pattern());
        if consumption.is_required() && matches.is_empty() {
            return Err(ConsumptionError::MissingRequired {
                consumer: consumer.to_string(),
                pattern: consumption.pattern().clone(),
            });
        }
        if let Some(validator) = consumption.validator() {
            for m in &matches {
                if let Some(reason) = validator.check(m.value).reason() {
                    return Err(ConsumptionError::Contract {
                        provider: m.provider.to_string(),
                        consumer: consumer.to_string(),
                        key: m.key.clone(),
                        validator: validator.name().to_string(),
                        reason: reason.to_string(),
                    });
                }
            }
        }
        Ok(matches.into_iter().map(|m| m.value.clone()).collect())
    }

    fn collect<'a>(&'a self, pattern: &ResourceKey) -> Vec<ProvidedMatch<'a>> {
        let mut matches = Vec::new();
        for feature in self.registry.features() {
            for (key, provision) in feature.provides() {
                if !pattern.matches(key) {
                    continue;
                }
                match provision {
                    Provision::Single(value) => matches.push(ProvidedMatch {
                        provider: feature.name(),
                        key,
                        value,
                    }),
                    Provision::Collection(values) => {
                        for value in values {
                            matches.push(ProvidedMatch {
                                provider: feature.name(),
                                key,
                                value,
                            });
                        }
                    }
                }
            }
        }
        matches
    }
}

impl std::fmt::Debug for ResourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceResolver")
            .field("features", &self.registry.len())
            .finish()
    }
}

/// Resources resolved for one feature's declared consumptions.
///
/// Lookup is by the declared pattern text; querying a pattern the feature
/// never declared yields an empty result, keeping hooks honest about their
/// declarations.
#[derive(Default)]
pub struct ConsumedResources {
    entries: Vec<ConsumedEntry>,
}

struct ConsumedEntry {
    pattern: String,
    values: Vec<ResourceValue>,
}

impl ConsumedResources {
    /// Returns the single value for one declared exact pattern.
    pub fn one(&self, pattern: &str) -> Option<&ResourceValue> {
        self.entry(pattern).and_then(|entry| entry.values.first())
    }

    /// Returns the ordered values for one declared pattern.
    pub fn many(&self, pattern: &str) -> &[ResourceValue] {
        self.entry(pattern)
            .map(|entry| entry.values.as_slice())
            .unwrap_or(&[])
    }

    fn entry(&self, pattern: &str) -> Option<&ConsumedEntry> {
        self.entries.iter().find(|entry| entry.pattern == pattern)
    }
}

/// Resolution query errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Resolver construction over a registry that is not frozen.
    UnfrozenRegistry,
    /// `resolve_one` called with a wildcard pattern.
    WildcardQuery(ResourceKey),
    /// `resolve_one` hit a key provided as a collection.
    CollectionProvision(ResourceKey),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnfrozenRegistry => {
                write!(f, "registry must be frozen before resolution")
            }
            Self::WildcardQuery(key) => {
                write!(f, "resolve_one rejects wildcard pattern `{key}`")
            }
            Self::CollectionProvision(key) => {
                write!(
                    f,
                    "key `{key}` is provided as a collection; query it with resolve_many"
                )
            }
        }
    }
}

impl Error for ResolveError {}

/// Consumption-check wiring errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumptionError {
    /// A `required` pattern matched nothing.
    MissingRequired { consumer: String, pattern: ResourceKey },
    /// A validator rejected a provided value.
    Contract {
        provider: String,
        consumer: String,
        key: ResourceKey,
        validator: String,
        reason: String,
    },
}

impl Display for ConsumptionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { consumer, pattern } => write!(
                f,
                "feature `{consumer}` requires `{pattern}` but nothing provides it"
            ),
            Self::Contract {
                provider,
                consumer,
                key,
                validator,
                reason,
            } => write!(
                f,
                "value under `{key}` from `{provider}` failed `{validator}` declared by `{consumer}`: {reason}"
            ),
        }
    }
}

impl Error for ConsumptionError {}
