//! Application startup state machine.
//!
//! # Responsibility
//! - Drive `Created → Initializing → Starting → Running`, terminal `Failed`.
//! - Fan out every feature's `on_init` concurrently and barrier on all of
//!   them before any feature starts.
//! - Invoke `on_start` sequentially in registration order and enforce the
//!   single-root invariant.
//! - Hand the root UI unit to the host mount function exactly once.
//!
//! # Invariants
//! - The registry is sealed before any hook runs.
//! - A failure during `Initializing` aborts the whole sequence; no feature
//!   is partially started.
//! - Exactly one feature supplies the root UI unit per lifecycle.
//! - No retry, no cancellation, no timeouts; these are wiring-time errors
//!   and timeout policy belongs to the host.

use crate::feature::descriptor::{InitContext, StartContext};
use crate::feature::registry::FeatureRegistry;
use crate::feature::resolver::{ConsumptionError, ResourceResolver};
use crate::feature::resource::RootUiUnit;
use crate::lifecycle::status::{LogStatusSink, StatusSink};
use futures::future::join_all;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Startup state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Created,
    Initializing,
    Starting,
    Running,
    Failed,
}

impl Display for LifecyclePhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Initializing => "initializing",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Drives registered features through startup and owns the root UI unit.
pub struct LifecycleOrchestrator {
    registry: Arc<FeatureRegistry>,
    status: Arc<dyn StatusSink>,
    phase: LifecyclePhase,
    root: Option<(String, RootUiUnit)>,
}

impl LifecycleOrchestrator {
    /// Creates an orchestrator over `registry`, sealing it immediately.
    ///
    /// Sealing at construction means no `provides` can be added once any
    /// hook can observe the registry.
    pub fn new(mut registry: FeatureRegistry, status: Arc<dyn StatusSink>) -> Self {
        registry.freeze();
        Self {
            registry: Arc::new(registry),
            status,
            phase: LifecyclePhase::Created,
            root: None,
        }
    }

    /// Creates an orchestrator reporting init status to the log.
    pub fn with_log_status(registry: FeatureRegistry) -> Self {
        Self::new(registry, Arc::new(LogStatusSink))
    }

    /// Returns the current phase.
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Returns the sealed registry.
    pub fn registry(&self) -> &Arc<FeatureRegistry> {
        &self.registry
    }

    /// Returns a resolver for runtime queries (menu rebuilding and the like).
    pub fn resolver(&self) -> ResourceResolver {
        ResourceResolver::over_frozen(Arc::clone(&self.registry))
    }

    /// Returns the root UI unit once `Running` is reached.
    pub fn root_unit(&self) -> Option<&RootUiUnit> {
        self.root.as_ref().map(|(_, unit)| unit)
    }

    /// Runs the startup sequence and hands the single root UI unit to
    /// `mount` on success.
    ///
    /// Fatal errors carry the offending feature name(s) and key(s); the
    /// machine stops at `Failed` and nothing is retried.
    pub async fn run<M>(&mut self, mount: M) -> Result<(), StartupError>
    where
        M: FnOnce(RootUiUnit),
    {
        if self.phase != LifecyclePhase::Created {
            return Err(StartupError::AlreadyRan(self.phase));
        }

        self.initialize_all().await?;
        self.start_all()?;

        self.phase = LifecyclePhase::Running;
        let (feature, root) = match &self.root {
            Some(entry) => entry,
            // start_all guarantees a root before Running is entered.
            None => return Err(self.fail(StartupError::MissingRootUnit)),
        };
        info!(
            "event=lifecycle_phase module=lifecycle status=ok phase=running root_feature={} root_label={}",
            feature,
            root.label()
        );
        mount(Arc::clone(root));
        Ok(())
    }

    /// `Initializing`: fan out every `on_init`, barrier on all of them.
    async fn initialize_all(&mut self) -> Result<(), StartupError> {
        self.phase = LifecyclePhase::Initializing;
        info!(
            "event=lifecycle_phase module=lifecycle status=ok phase=initializing features={}",
            self.registry.len()
        );

        let mut names = Vec::new();
        let mut futures = Vec::new();
        for feature in self.registry.features() {
            if let Some(hook) = feature.init_hook() {
                let ctx = InitContext::new(feature.name(), Arc::clone(&self.status));
                names.push(feature.name().to_string());
                futures.push(hook(ctx));
            }
        }

        // join_all returns results in submission order regardless of
        // completion order, so the first failure below is the first in
        // registration order.
        let results = join_all(futures).await;
        for (name, result) in names.into_iter().zip(results) {
            if let Err(reason) = result {
                return Err(self.fail(StartupError::Init {
                    feature: name,
                    reason,
                }));
            }
        }
        Ok(())
    }

    /// `Starting`: check the contract graph, then run `on_start` hooks
    /// sequentially in registration order.
    fn start_all(&mut self) -> Result<(), StartupError> {
        self.phase = LifecyclePhase::Starting;
        info!(
            "event=lifecycle_phase module=lifecycle status=ok phase=starting features={}",
            self.registry.len()
        );

        let resolver = self.resolver();
        if let Err(err) = resolver.check_consumptions() {
            return Err(self.fail(StartupError::Consumption(err)));
        }

        let mut root: Option<(String, RootUiUnit)> = None;
        for feature in self.registry.features() {
            let Some(hook) = feature.start_hook() else {
                continue;
            };
            let resources = resolver
                .resolve_consumed(feature)
                .map_err(StartupError::Consumption);
            let resources = match resources {
                Ok(resources) => resources,
                Err(err) => return Err(self.fail(err)),
            };
            let ctx = StartContext::new(feature.name(), resources);
            if let Some(unit) = hook(&ctx) {
                if let Some((first, _)) = &root {
                    let err = StartupError::DuplicateRootUnit {
                        first: first.clone(),
                        second: feature.name().to_string(),
                    };
                    return Err(self.fail(err));
                }
                root = Some((feature.name().to_string(), unit));
            }
        }

        match root {
            Some(entry) => {
                self.root = Some(entry);
                Ok(())
            }
            None => Err(self.fail(StartupError::MissingRootUnit)),
        }
    }

    fn fail(&mut self, err: StartupError) -> StartupError {
        self.phase = LifecyclePhase::Failed;
        error!("event=lifecycle_failed module=lifecycle status=error reason={err}");
        err
    }
}

impl std::fmt::Debug for LifecycleOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleOrchestrator")
            .field("phase", &self.phase)
            .field("features", &self.registry.len())
            .field("root", &self.root.as_ref().map(|(name, _)| name))
            .finish()
    }
}

/// Startup-fatal errors surfaced to the host.
#[derive(Debug)]
pub enum StartupError {
    /// `run` called on a machine that already left `Created`.
    AlreadyRan(LifecyclePhase),
    /// An `on_init` hook rejected; the whole sequence aborts.
    Init { feature: String, reason: String },
    /// A consumption declaration is unmet or a contract was violated.
    Consumption(ConsumptionError),
    /// A second feature returned a root UI unit.
    DuplicateRootUnit { first: String, second: String },
    /// No feature supplied the application shell.
    MissingRootUnit,
}

impl Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRan(phase) => {
                write!(f, "startup already ran; machine is in phase `{phase}`")
            }
            Self::Init { feature, reason } => {
                write!(f, "feature `{feature}` failed to initialize: {reason}")
            }
            Self::Consumption(err) => write!(f, "{err}"),
            Self::DuplicateRootUnit { first, second } => write!(
                f,
                "both `{first}` and `{second}` supplied a root UI unit; exactly one feature may"
            ),
            Self::MissingRootUnit => {
                write!(f, "no feature supplied the application root UI unit")
            }
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Consumption(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConsumptionError> for StartupError {
    fn from(value: ConsumptionError) -> Self {
        Self::Consumption(value)
    }
}
