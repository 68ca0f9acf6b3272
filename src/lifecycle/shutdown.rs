//! Shutdown on SIGTERM/SIGINT or on request

use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{debug, info};

/// Resolves once the shell should stop
pub struct ShutdownSignal {
    requested: Arc<watch::Sender<bool>>,
}

/// Cloneable handle that requests shutdown from anywhere
#[derive(Clone)]
pub struct ShutdownTrigger {
    requested: Arc<watch::Sender<bool>>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        if !self.requested.send_replace(true) {
            info!("shutdown requested");
        }
    }
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (requested, _) = watch::channel(false);
        Self {
            requested: Arc::new(requested),
        }
    }

    pub fn trigger(&self) -> ShutdownTrigger {
        ShutdownTrigger {
            requested: Arc::clone(&self.requested),
        }
    }

    /// Wait for a signal or a programmatic trigger
    pub async fn wait(&self) -> std::io::Result<()> {
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut requested = self.requested.subscribe();

        tokio::select! {
            _ = sigterm.recv() => {
                debug!("received SIGTERM");
            }
            _ = sigint.recv() => {
                debug!("received SIGINT");
            }
            _ = requested.wait_for(|requested| *requested) => {
                debug!("shutdown triggered");
            }
        }
        Ok(())
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
