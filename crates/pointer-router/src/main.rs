//! Pointer Router entry point.
//!
//! Loads the configuration, wires the router to per-session channels, seeds
//! the configured surfaces, and replays the configured script through the
//! router.  Each session's channel is drained by a task that logs what the
//! client would receive.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config_from()        -- CLI arg / env / platform dir
//!  └─ ChannelSink               -- one channel per session
//!  └─ RoutePointerUseCase       -- seeded with [[surfaces]]
//!  └─ ScriptedInputSource       -- replays [[script]] on a blocking thread
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pointer_core::{InputEvent, SessionId};
use pointer_router::application::dispatch::EventSink;
use pointer_router::application::route_pointer::RoutePointerUseCase;
use pointer_router::infrastructure::input_source::{script::ScriptedInputSource, InputSource};
use pointer_router::infrastructure::session_channel::ChannelSink;
use pointer_router::infrastructure::storage::config::{load_config_from, resolve_config_path};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = resolve_config_path(std::env::args().nth(1).map(PathBuf::from))
        .context("locating config file")?;
    let config = load_config_from(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.router.log_level)),
        )
        .init();

    info!(config = %config_path.display(), "Pointer Router starting");

    // ── Session channels ──────────────────────────────────────────────────────
    let sink = Arc::new(ChannelSink::new());
    let consumers: Vec<JoinHandle<()>> = config
        .sessions()
        .into_iter()
        .map(|session| spawn_session_logger(&sink, session))
        .collect();

    // ── Router ────────────────────────────────────────────────────────────────
    let mut router = RoutePointerUseCase::new(
        config.router.initial_x,
        config.router.initial_y,
        Arc::clone(&sink) as Arc<dyn EventSink>,
    );
    for entry in &config.surfaces {
        let (surface, stacking) = entry.to_surface();
        router
            .surface_added(surface, stacking)
            .with_context(|| format!("seeding surface {}", entry.id))?;
    }
    info!(surfaces = router.surface_count(), "surfaces seeded");

    // ── Script replay ─────────────────────────────────────────────────────────
    let source = Arc::new(ScriptedInputSource::with_step_delay(
        config.script.clone(),
        Duration::from_millis(config.router.script_step_ms),
    ));
    let events = source.start().context("starting scripted input")?;

    let replay_sink = Arc::clone(&sink);
    let replay_source = Arc::clone(&source);
    let mut replay = tokio::task::spawn_blocking(move || {
        for event in events {
            if replay_source.is_stopped() {
                info!("script replay interrupted");
                break;
            }
            let closed = match event {
                InputEvent::SessionClosed { session } => Some(session),
                _ => None,
            };
            match router.handle_event(event) {
                Ok(report) if !report.is_clean() => {
                    warn!(failures = report.failures.len(), "some sessions missed events");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "input event rejected"),
            }
            if let Some(session) = closed {
                replay_sink.disconnect(session);
            }
        }
        router
    });

    let router = tokio::select! {
        joined = &mut replay => joined.context("script replay panicked")?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            source.stop();
            replay.await.context("script replay panicked")?
        }
    };

    info!(
        focus = ?router.current_focus(),
        position = ?router.current_position(),
        surfaces = router.surface_count(),
        "script finished"
    );

    sink.disconnect_all();
    for consumer in consumers {
        consumer.await.context("session logger panicked")?;
    }

    info!("Pointer Router stopped");
    Ok(())
}

/// Connects `session` and spawns a task that logs every event it receives.
fn spawn_session_logger(sink: &ChannelSink, session: SessionId) -> JoinHandle<()> {
    let mut rx = sink.connect(session);
    tokio::spawn(async move {
        while let Some(delivery) = rx.recv().await {
            info!(%session, serial = delivery.serial, event = ?delivery.event, "client event");
        }
    })
}
