//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire a small set of built-in features through the full startup sequence.
//! - Keep output deterministic for quick local sanity checks.

use panekit_core::{
    downcast_resource, Consumption, ContractValidator, FeatureDescriptor, FeatureRegistry,
    LifecycleOrchestrator, Provision, Renderable, ResourceKey, RootUiUnit, StatusSink,
};
use std::process::ExitCode;
use std::sync::Arc;

struct ConsoleShell;

impl Renderable for ConsoleShell {
    fn label(&self) -> &str {
        "console.shell"
    }
}

/// Reports init progress to stdout, splash-screen style.
struct StdoutStatus;

impl StatusSink for StdoutStatus {
    fn report(&self, feature: &str, message: &str) {
        println!("[init] {feature}: {message}");
    }
}

fn key(value: &str) -> ResourceKey {
    ResourceKey::parse(value).expect("static key literal")
}

fn build_registry() -> Result<FeatureRegistry, Box<dyn std::error::Error>> {
    let mut registry = FeatureRegistry::new();

    registry.register(
        FeatureDescriptor::new("navigation")
            .provide(key("navigation.routes"), Provision::single("home".to_string()))
            .on_init(|ctx| async move {
                ctx.report("navigation ready");
                Ok(())
            }),
    )?;

    registry.register(
        FeatureDescriptor::new("services").provide(
            key("services.routes"),
            Provision::collection(vec!["services".to_string(), "service-detail".to_string()]),
        ),
    )?;

    registry.register(
        FeatureDescriptor::new("settings")
            .provide(key("settings.routes"), Provision::single("settings".to_string())),
    )?;

    registry.register(
        FeatureDescriptor::new("shell")
            .consume(
                Consumption::required(key("*.routes"))
                    .with_validator(ContractValidator::expect_type::<String>("route label")),
            )
            .on_start(|ctx| {
                let routes = ctx.resources().many("*.routes");
                for route in routes {
                    if let Some(label) = downcast_resource::<String>(route) {
                        println!("[route] {label}");
                    }
                }
                println!("[shell] wired {} routes", routes.len());
                Some(Arc::new(ConsoleShell) as RootUiUnit)
            }),
    )?;

    Ok(registry)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("PANEKIT_LOG_DIR") {
        if let Err(err) = panekit_core::init_logging(panekit_core::default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("panekit_core version={}", panekit_core::core_version());

    let registry = match build_registry() {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("registration failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut orchestrator = LifecycleOrchestrator::new(registry, Arc::new(StdoutStatus));
    match orchestrator.run(|root| println!("[mount] {}", root.label())).await {
        Ok(()) => {
            println!("phase={}", orchestrator.phase());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("startup failed: {err}");
            ExitCode::FAILURE
        }
    }
}
