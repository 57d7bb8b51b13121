//! Type-erased resource payloads and renderable units.
//!
//! The engine never inspects a contributed value's internals; it only stores,
//! orders, and hands values back to consumers. Consumers downcast to the
//! concrete type they declared via a contract validator.

use std::any::Any;
use std::sync::Arc;

/// Opaque resource payload contributed by a feature.
pub type ResourceValue = Arc<dyn Any + Send + Sync>;

/// Wraps one concrete value as an opaque resource payload.
pub fn resource<T: Send + Sync + 'static>(value: T) -> ResourceValue {
    Arc::new(value)
}

/// Downcasts one resource payload to a concrete reference.
pub fn downcast_resource<T: Send + Sync + 'static>(value: &ResourceValue) -> Option<&T> {
    value.downcast_ref::<T>()
}

/// One provided resource entry.
///
/// `Collection` elements are spliced into wildcard query results in place,
/// one level deep; nested collections are not recursively flattened.
#[derive(Clone)]
pub enum Provision {
    Single(ResourceValue),
    Collection(Vec<ResourceValue>),
}

impl Provision {
    /// Wraps one concrete value as a single provision.
    pub fn single<T: Send + Sync + 'static>(value: T) -> Self {
        Self::Single(resource(value))
    }

    /// Wraps concrete values as an append-to-collection provision.
    pub fn collection<T, I>(values: I) -> Self
    where
        T: Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        Self::Collection(values.into_iter().map(resource).collect())
    }
}

impl std::fmt::Debug for Provision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(_) => write!(f, "Provision::Single"),
            Self::Collection(values) => write!(f, "Provision::Collection(len={})", values.len()),
        }
    }
}

/// Opaque UI unit produced by a feature.
///
/// The engine counts and orders renderables; it never looks inside them. The
/// label is metadata-only and is used in diagnostic log lines.
pub trait Renderable: Send + Sync {
    /// Stable diagnostic label, e.g. `app.shell`.
    fn label(&self) -> &str {
        "renderable"
    }
}

/// The single application root UI unit.
///
/// At most one instance exists per lifecycle; the orchestrator enforces that
/// during the `Starting` pass.
pub type RootUiUnit = Arc<dyn Renderable>;
