//! Main-window copy of the saved hotkey
//!
//! The proxy fetches the hotkey once on mount and again on every
//! `hotkey-updated` broadcast. It never shares the value with other
//! windows; each window holds its own cache.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::events::{EventBus, SyncEvent};
use crate::hotkey::HotkeyCombination;
use crate::window::Liveness;

/// Chip rendering of a chord: one chip per token, joined by `+`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotkeyDisplay {
    chips: Vec<String>,
}

impl HotkeyDisplay {
    pub fn chips(&self) -> &[String] {
        &self.chips
    }

    /// Nothing loaded yet; renders as an empty string
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }
}

impl From<&HotkeyCombination> for HotkeyDisplay {
    fn from(chord: &HotkeyCombination) -> Self {
        Self {
            chips: chord.tokens().to_vec(),
        }
    }
}

impl std::fmt::Display for HotkeyDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.chips.join("+"))
    }
}

pub struct HotkeyStoreProxy {
    cache: watch::Receiver<HotkeyCombination>,
    task: Option<JoinHandle<()>>,
}

impl HotkeyStoreProxy {
    /// Mount on a window: fetch now, then refresh on every sync event
    pub fn mount<B: Backend>(backend: Arc<B>, bus: &EventBus, liveness: Liveness) -> Self {
        // Subscribe before the first fetch so an update racing the mount is not lost
        let events = bus.subscribe();
        let (cache_tx, cache) = watch::channel(HotkeyCombination::default());

        let task = tokio::spawn(run(backend, events, cache_tx, liveness));

        Self {
            cache,
            task: Some(task),
        }
    }

    /// Currently cached chord; empty until the first fetch lands
    pub fn current(&self) -> HotkeyCombination {
        self.cache.borrow().clone()
    }

    pub fn display(&self) -> HotkeyDisplay {
        HotkeyDisplay::from(&*self.cache.borrow())
    }

    /// Observe cache replacements
    pub fn watch(&self) -> watch::Receiver<HotkeyCombination> {
        self.cache.clone()
    }

    /// Tear down: stop listening and drop the subscription
    pub async fn unmount(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        debug!("hotkey store proxy unmounted");
    }
}

impl Drop for HotkeyStoreProxy {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run<B: Backend>(
    backend: Arc<B>,
    mut events: broadcast::Receiver<SyncEvent>,
    cache: watch::Sender<HotkeyCombination>,
    liveness: Liveness,
) {
    refresh(&*backend, &cache, &liveness).await;

    loop {
        tokio::select! {
            _ = liveness.closed() => {
                debug!("window closed, dropping hotkey subscription");
                break;
            }
            event = events.recv() => match event {
                Ok(SyncEvent::HotkeyUpdated) => {
                    debug!("hotkey-updated received, re-querying");
                    refresh(&*backend, &cache, &liveness).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Events carry no payload, so one refresh covers all missed ones
                    warn!(skipped, "sync event receiver lagged");
                    refresh(&*backend, &cache, &liveness).await;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    debug!("hotkey store proxy stopped");
}

async fn refresh<B: Backend>(
    backend: &B,
    cache: &watch::Sender<HotkeyCombination>,
    liveness: &Liveness,
) {
    match backend.get_hotkey().await {
        Ok(hotkey) => {
            if !liveness.is_alive() {
                debug!("window closed before hotkey fetch completed, dropping result");
                return;
            }
            info!(hotkey = %hotkey.accelerator(), "hotkey cache refreshed");
            cache.send_replace(hotkey);
        }
        Err(e) => {
            warn!(error = %e, "failed to fetch hotkey, keeping cached value");
        }
    }
}
