//! zaplink-shell: launcher shell hosting the ZapLink windows
//!
//! Opens the splash and main windows, serves backend commands over IPC,
//! keeps the main window's hotkey display in sync and runs the startup
//! sequence once.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use zaplink_shell::backend::LocalBackend;
use zaplink_shell::config::Config;
use zaplink_shell::events::EventBus;
use zaplink_shell::ipc::Server;
use zaplink_shell::lifecycle::ShutdownSignal;
use zaplink_shell::notify::DesktopNotifier;
use zaplink_shell::startup::{StartupOrchestrator, StartupSettings};
use zaplink_shell::store::{HotkeyDisplay, HotkeyStoreProxy};
use zaplink_shell::version::GithubReleaseFeed;
use zaplink_shell::window::{WindowRegistry, WindowSpec, MAIN_WINDOW};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "zaplink-shell starting");

    let config = Config::load()?;
    config.ensure_dirs()?;
    info!(?config.socket_path, ?config.hotkey_path, "configuration loaded");

    let shutdown = ShutdownSignal::new();

    // Splash first, then the (hidden) main window
    let windows = WindowRegistry::new();
    windows.open(&WindowSpec::splash());
    let (_, main_liveness) = windows.open(&WindowSpec::main());

    let backend = Arc::new(LocalBackend::with_store(&config.hotkey_path, windows.clone()).await);
    let bus = EventBus::default();

    let server = Server::new(
        &config.socket_path,
        Arc::clone(&backend),
        bus.clone(),
        shutdown.trigger(),
    )?;

    // Main window: hotkey cache plus the one-shot startup sequence
    let proxy = HotkeyStoreProxy::mount(Arc::clone(&backend), &bus, main_liveness.clone());
    let orchestrator = StartupOrchestrator::new(
        Arc::clone(&backend),
        Arc::new(GithubReleaseFeed::new(config.release_feed_url.clone())?),
        Arc::new(DesktopNotifier::new()),
        main_liveness,
        StartupSettings::from_config(&config),
    );
    let startup = tokio::spawn(async move {
        let state = orchestrator.run().await;
        info!(%state, "startup sequence finished");
    });

    let mut display = proxy.watch();

    info!("shell initialized, entering main loop");

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!(?e, "IPC server error");
            }
        }

        // Mirror the main window's hotkey chips into the log
        _ = async {
            while display.changed().await.is_ok() {
                let chips = HotkeyDisplay::from(&*display.borrow_and_update());
                info!(hotkey = %chips, "main window hotkey display updated");
            }
        } => {
            info!("hotkey display watcher exited");
        }

        result = shutdown.wait() => {
            match result {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => error!(?e, "failed to listen for shutdown signals"),
            }
        }
    }

    info!("shutting down...");

    if let Err(e) = windows.close(MAIN_WINDOW) {
        warn!(error = %e, "main window already closed");
    }
    proxy.unmount().await;
    startup.abort();
    server.shutdown().await;

    info!("zaplink-shell stopped");

    Ok(())
}
