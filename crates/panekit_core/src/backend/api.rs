//! Address-based data-access collaborator surface.
//!
//! # Responsibility
//! - Define the `BackendApi` seam features call to fetch/mutate data.
//! - Derive narrower data-access scopes via sub-resource path composition.
//!
//! # Invariants
//! - No transport lives here; implementations are supplied by the host.
//! - Errors carry the full address and a stable code so a wiring problem is
//!   diagnosable without re-running.

use crate::backend::path::derive_sub_resource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Result alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Transport/status error envelope for one backend call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendError {
    /// Full address the call targeted.
    pub address: String,
    /// Stable machine-readable code, e.g. `not_found`.
    pub code: String,
    /// Human-readable detail.
    pub message: String,
}

impl BackendError {
    pub fn new(address: &str, code: &str, message: &str) -> Self {
        Self {
            address: address.to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "backend call to `{}` failed ({}): {}",
            self.address, self.code, self.message
        )
    }
}

impl Error for BackendError {}

/// Address-based data-access surface supplied by the host.
pub trait BackendApi: Send + Sync {
    fn get(&self, path: &str) -> BackendResult<Value>;
    fn post(&self, path: &str, body: Value) -> BackendResult<Value>;
    fn patch(&self, path: &str, body: Value) -> BackendResult<Value>;
    fn delete(&self, path: &str) -> BackendResult<Value>;
}

/// Backend handle narrowed to one base path.
///
/// Features hold a scoped handle instead of composing raw addresses; `sub`
/// derives an even narrower scope, e.g. a `modules` sub-resource under an
/// `admin` base.
#[derive(Clone)]
pub struct ScopedBackend {
    backend: Arc<dyn BackendApi>,
    base: String,
}

impl ScopedBackend {
    /// Creates a handle over `backend` rooted at `base`.
    pub fn new(backend: Arc<dyn BackendApi>, base: &str) -> Self {
        Self {
            backend,
            base: base.to_string(),
        }
    }

    /// Returns the current base path.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Derives a handle for one sub-resource of this base.
    pub fn sub(&self, sub_path: &str) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            base: derive_sub_resource(&self.base, sub_path),
        }
    }

    /// Returns the full address for one path under this base.
    pub fn address(&self, path: &str) -> String {
        if path.is_empty() {
            return self.base.clone();
        }
        format!(
            "{}{}",
            self.base.trim_end_matches('/'),
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        )
    }

    pub fn get(&self, path: &str) -> BackendResult<Value> {
        self.backend.get(&self.address(path))
    }

    pub fn post(&self, path: &str, body: Value) -> BackendResult<Value> {
        self.backend.post(&self.address(path), body)
    }

    pub fn patch(&self, path: &str, body: Value) -> BackendResult<Value> {
        self.backend.patch(&self.address(path), body)
    }

    pub fn delete(&self, path: &str) -> BackendResult<Value> {
        self.backend.delete(&self.address(path))
    }
}

impl std::fmt::Debug for ScopedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedBackend")
            .field("base", &self.base)
            .finish()
    }
}
