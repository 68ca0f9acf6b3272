//! Startup state machine for the main window
//!
//! Two independent completions feed the machine: the version check and
//! a fixed splash timer. When the timer fires the splash is closed, and
//! whatever version information is available at that instant decides
//! whether the main window is revealed with an update notice.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::backend::{Backend, BackendError};
use crate::config::Config;
use crate::notify::{self, Notice, Notifier};
use crate::version::{resolve_versions, ReleaseFeed, VersionPair};
use crate::window::Liveness;

/// Startup phases of the main window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupState {
    #[default]
    Initializing,
    /// Version check finished (with or without a latest tag)
    VersionChecked,
    /// Splash timer fired, splash close requested
    SplashClosing,
    /// Update available: main window revealed and user notified
    Revealed,
    /// No update: splash closed, main window left as is
    Hidden,
}

impl StartupState {
    pub fn is_terminal(self) -> bool {
        matches!(self, StartupState::Revealed | StartupState::Hidden)
    }
}

impl std::fmt::Display for StartupState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupState::Initializing => write!(f, "Initializing"),
            StartupState::VersionChecked => write!(f, "VersionChecked"),
            StartupState::SplashClosing => write!(f, "SplashClosing"),
            StartupState::Revealed => write!(f, "Revealed"),
            StartupState::Hidden => write!(f, "Hidden"),
        }
    }
}

/// Timing and notice used by the orchestrator
#[derive(Debug, Clone)]
pub struct StartupSettings {
    /// Measured from window creation
    pub splash_delay: Duration,
    pub notice: Notice,
}

impl StartupSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            splash_delay: config.splash_delay,
            notice: Notice::update_available(config.notice_icon.clone()),
        }
    }
}

impl Default for StartupSettings {
    fn default() -> Self {
        Self {
            splash_delay: Duration::from_millis(1000),
            notice: Notice::update_available(None),
        }
    }
}

/// Runs once per main window; `run` consumes it
pub struct StartupOrchestrator<B, F, N> {
    backend: Arc<B>,
    feed: Arc<F>,
    notifier: Arc<N>,
    settings: StartupSettings,
    /// Main window handle; the splash timer runs from its creation
    liveness: Liveness,
    state: Arc<watch::Sender<StartupState>>,
}

impl<B, F, N> StartupOrchestrator<B, F, N>
where
    B: Backend,
    F: ReleaseFeed,
    N: Notifier,
{
    /// Create the orchestrator for the main window behind `liveness`
    pub fn new(
        backend: Arc<B>,
        feed: Arc<F>,
        notifier: Arc<N>,
        liveness: Liveness,
        settings: StartupSettings,
    ) -> Self {
        let (state, _) = watch::channel(StartupState::Initializing);
        Self {
            backend,
            feed,
            notifier,
            settings,
            liveness,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> StartupState {
        *self.state.borrow()
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<StartupState> {
        self.state.subscribe()
    }

    /// Drive startup to a terminal state
    ///
    /// Returns early with the current state if the main window closes
    /// first; pending completions then do nothing.
    pub async fn run(self) -> StartupState {
        info!(
            splash_delay_ms = self.settings.splash_delay.as_millis() as u64,
            "startup sequence started"
        );

        let versions = self.spawn_version_check();

        tokio::time::sleep_until(self.liveness.created_at() + self.settings.splash_delay).await;
        if !self.liveness.is_alive() {
            debug!("main window closed before splash timer fired");
            return self.state();
        }

        self.transition_to(StartupState::SplashClosing);
        if let Err(e) = self
            .retry_once("close_splashscreen", || self.backend.close_splashscreen())
            .await
        {
            error!(error = %e, "splash screen could not be closed, revealing main window instead");
            if let Err(e) = self
                .retry_once("unhide_window", || self.backend.unhide_window())
                .await
            {
                error!(error = %e, "fallback reveal failed");
            }
        }

        if !self.liveness.is_alive() {
            debug!("main window closed while closing splash");
            return self.state();
        }

        // Whatever the version check has produced so far; it is not awaited
        let versions = versions.borrow().clone();
        let next = if versions.is_update_available() {
            info!(current = %versions.current, latest = %versions.latest, "update available");
            if let Err(e) = self
                .retry_once("unhide_window", || self.backend.unhide_window())
                .await
            {
                error!(error = %e, "failed to reveal main window");
            }
            notify::deliver(&*self.notifier, &self.settings.notice);
            StartupState::Revealed
        } else {
            StartupState::Hidden
        };

        self.transition_to(next);
        next
    }

    /// Start the version check as an independent completion
    fn spawn_version_check(&self) -> watch::Receiver<VersionPair> {
        let (tx, rx) = watch::channel(VersionPair::default());
        let backend = Arc::clone(&self.backend);
        let feed = Arc::clone(&self.feed);
        let state = Arc::clone(&self.state);
        let liveness = self.liveness.clone();

        tokio::spawn(async move {
            let versions = resolve_versions(&*backend, &*feed).await;
            if !liveness.is_alive() {
                debug!("main window closed before version check completed");
                return;
            }

            info!(
                current = %versions.current,
                latest = %versions.latest,
                update = versions.is_update_available(),
                "version check completed"
            );
            tx.send_replace(versions);

            // Only meaningful while the splash timer has not fired yet
            state.send_if_modified(|current| {
                if *current == StartupState::Initializing {
                    info!(
                        from = %StartupState::Initializing,
                        to = %StartupState::VersionChecked,
                        "startup transition"
                    );
                    *current = StartupState::VersionChecked;
                    true
                } else {
                    false
                }
            });
        });

        rx
    }

    fn transition_to(&self, next: StartupState) {
        if !self.liveness.is_alive() {
            return;
        }
        let previous = self.state.send_replace(next);
        info!(from = %previous, to = %next, "startup transition");
    }

    /// Run a backend command, retrying once on failure
    async fn retry_once<Op, Fut>(&self, command: &'static str, op: Op) -> Result<(), BackendError>
    where
        Op: Fn() -> Fut,
        Fut: Future<Output = Result<(), BackendError>>,
    {
        match op().await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(command, error = %e, "backend command failed, retrying once");
                op().await
            }
        }
    }
}
