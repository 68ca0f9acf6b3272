//! Unix domain socket server for backend commands
//!
//! Serves the backend command surface to windows running in other
//! processes. A successful `update_hotkey` is followed by a
//! `hotkey-updated` broadcast inside this process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::backend::{Backend, BackendError, LocalBackend};
use crate::events::{EventBus, SyncEvent};
use crate::lifecycle::ShutdownTrigger;
use crate::window::{self, HOTKEY_SETTINGS_WINDOW};

use super::frame::{read_message, write_message};
use super::protocol::{Request, Response};

/// Everything a request handler needs
#[derive(Clone)]
struct Shared {
    backend: Arc<LocalBackend>,
    bus: EventBus,
    shutdown: ShutdownTrigger,
}

/// IPC server handling client connections
pub struct Server {
    socket_path: PathBuf,
    listener: UnixListener,
    shared: Shared,
    shutdown_tx: broadcast::Sender<()>,
}

impl Server {
    /// Bind the socket, replacing a stale one
    pub fn new(
        socket_path: &Path,
        backend: Arc<LocalBackend>,
        bus: EventBus,
        shutdown: ShutdownTrigger,
    ) -> Result<Self> {
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create socket directory")?;
        }

        if socket_path.exists() {
            std::fs::remove_file(socket_path).context("failed to remove stale socket")?;
        }

        let listener = UnixListener::bind(socket_path).context("failed to bind Unix socket")?;

        // Owner-only access
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        info!(?socket_path, "IPC server listening");

        Ok(Self {
            socket_path: socket_path.to_owned(),
            listener,
            shared: Shared {
                backend,
                bus,
                shutdown,
            },
            shutdown_tx,
        })
    }

    /// Run the server, accepting connections
    pub async fn run(&self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("client connected");
                    let shared = self.shared.clone();
                    let mut shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        tokio::select! {
                            result = handle_client(stream, shared) => {
                                if let Err(e) = result {
                                    warn!(?e, "client handler error");
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                debug!("client handler shutting down");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(?e, "accept error");
                }
            }
        }
    }

    /// Gracefully shutdown the server
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(?e, "failed to remove socket file");
            }
        }

        info!("IPC server shutdown complete");
    }
}

/// Serve requests on one connection until it closes
async fn handle_client(mut stream: UnixStream, shared: Shared) -> Result<()> {
    while let Some(request) = read_message::<Request, _>(&mut stream)
        .await
        .context("failed to read request")?
    {
        debug!(?request, "received request");
        let response = process_request(request, &shared).await;
        write_message(&mut stream, &response)
            .await
            .context("failed to send response")?;
    }

    debug!("client disconnected");
    Ok(())
}

async fn process_request(request: Request, shared: &Shared) -> Response {
    let backend = &shared.backend;
    match request {
        Request::Ping => Response::Pong,

        Request::GetHotkey => match backend.get_hotkey().await {
            Ok(keys) => Response::Hotkey { keys },
            Err(e) => Response::from(&e),
        },

        Request::UpdateHotkey { new_hotkey } => match backend.update_hotkey(new_hotkey).await {
            Ok(()) => {
                shared.bus.publish(SyncEvent::HotkeyUpdated);
                Response::Ok
            }
            Err(e) => {
                warn!(error = %e, "update_hotkey rejected");
                Response::from(&e)
            }
        },

        Request::CloseSplashscreen => unit_response(backend.close_splashscreen().await),

        Request::UnhideWindow => unit_response(backend.unhide_window().await),

        Request::CloseWindow { label } => unit_response(backend.close_window(&label).await),

        Request::ToggleVisibility => match backend.toggle_visibility() {
            Ok(visible) => Response::Visibility { visible },
            Err(e) => Response::from(&e),
        },

        Request::GetVersion => Response::Version {
            version: backend.app_version().await,
        },

        Request::OpenHotkeySettings => {
            let (outcome, _) = window::open_hotkey_settings(backend.windows());
            Response::WindowOpened {
                label: HOTKEY_SETTINGS_WINDOW.to_string(),
                outcome,
            }
        }

        Request::Quit => {
            shared.shutdown.trigger();
            Response::Ok
        }
    }
}

fn unit_response(result: Result<(), BackendError>) -> Response {
    match result {
        Ok(()) => Response::Ok,
        Err(e) => Response::from(&e),
    }
}
