//! Feature registration, resource contracts, and composition engine.
//! This crate is the single source of truth for composition invariants.
//!
//! Independently authored UI features declare what they provide (under named
//! resource keys) and what they consume (patterns with optional contracts);
//! the engine aggregates and validates the declarations, seals the set, and
//! sequences startup so exactly one feature supplies the application root.

pub mod backend;
pub mod feature;
pub mod lifecycle;
pub mod logging;
pub mod scope;

pub use backend::api::{BackendApi, BackendError, BackendResult, ScopedBackend};
pub use backend::path::derive_sub_resource;
pub use feature::contract::{ContractCheck, ContractValidator};
pub use feature::descriptor::{
    Consumption, DescriptorError, FeatureDescriptor, InitContext, StartContext,
};
pub use feature::key::{ResourceKey, ResourceKeyError};
pub use feature::registry::{FeatureRegistry, RegistryError};
pub use feature::resolver::{ConsumedResources, ConsumptionError, ResolveError, ResourceResolver};
pub use feature::resource::{
    downcast_resource, resource, Provision, Renderable, ResourceValue, RootUiUnit,
};
pub use lifecycle::orchestrator::{LifecycleOrchestrator, LifecyclePhase, StartupError};
pub use lifecycle::status::{LogStatusSink, NullStatusSink, StatusSink};
pub use logging::{default_log_level, init_logging, logging_status};
pub use scope::authority::{
    filter_allowed, is_allowed, parse_scope_level, ScopeError, ScopeLevel, ScopeRequirement,
    ScopedItem, Session,
};

/// Returns the engine crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
