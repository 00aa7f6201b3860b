//! # autopopupd: auto-popup demo daemon
//!
//! Composition root that wires the demo adapters into the popup-trigger
//! engine and drives it from a scenario file.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Construct the adapters and the engine, injecting them via port traits
//! - Log every engine event from the in-process bus
//! - Replay the scenario, then shut the engine down (also on Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod clock;
mod config;
mod scenario;

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing_subscriber::EnvFilter;

use autopopup_adapter_virtual::{StateRuleEvaluator, VirtualPopupSurface};
use autopopup_app::event_bus::InProcessEventBus;
use autopopup_app::popup_engine::PopupTriggerEngine;
use autopopup_domain::event::Event;

use crate::clock::TokioClock;
use crate::config::Config;
use crate::scenario::Scenario;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let script = match &config.scenario.path {
        Some(path) => Some(Scenario::load(path)?),
        None => None,
    };

    // Adapters
    let event_bus = Arc::new(InProcessEventBus::new(256));
    let surface = Arc::new(VirtualPopupSurface::default());
    let events = tokio::spawn(log_events(event_bus.subscribe()));

    // Engine
    let mut engine = PopupTriggerEngine::new(
        config.engine_settings(),
        StateRuleEvaluator,
        Arc::clone(&surface),
        Arc::clone(&event_bus),
        TokioClock::new(),
    )?;
    engine.configure(
        config.engine.enabled,
        config.dashboard()?,
        config.active_page(),
        config.card_settings(),
    );
    tracing::info!(
        pages = config.dashboard.pages.len(),
        enabled = config.engine.enabled,
        "popup trigger engine configured"
    );

    match script {
        Some(script) => {
            tracing::info!(steps = script.steps.len(), "replaying scenario");
            tokio::select! {
                () = scenario::replay(&mut engine, &script) => {
                    tracing::info!(popups = surface.shown().len(), "scenario finished");
                }
                res = tokio::signal::ctrl_c() => {
                    res?;
                    tracing::info!("interrupted");
                }
            }
        }
        None => {
            tracing::info!("no scenario configured, waiting for ctrl-c");
            tokio::signal::ctrl_c().await?;
        }
    }

    engine.shutdown();
    events.abort();
    Ok(())
}

async fn log_events(receiver: broadcast::Receiver<Event>) {
    let mut stream = BroadcastStream::new(receiver);
    while let Some(item) = stream.next().await {
        match item {
            Ok(event) => tracing::info!(
                event_type = %event.event_type,
                trigger_id = ?event.trigger_id,
                data = %event.data,
                "engine event"
            ),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event log fell behind");
            }
        }
    }
}
