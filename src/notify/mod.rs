//! User notifications, gated behind OS permission

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

const APP_NAME: &str = "ZapLink";

/// OS notification permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// Not asked yet
    Prompt,
}

/// A notification with fixed title and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
}

impl Notice {
    pub fn update_available(icon: Option<String>) -> Self {
        Self {
            title: APP_NAME.to_string(),
            body: "A new version of ZapLink is available!".to_string(),
            icon,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

pub trait Notifier: Send + Sync + 'static {
    fn permission(&self) -> Permission;

    /// Ask the OS for permission; returns the resulting state
    fn request_permission(&self) -> Permission;

    fn send(&self, notice: &Notice) -> Result<(), NotifyError>;
}

/// Send `notice` if permission is (or becomes) granted
///
/// Issues at most one permission request. Returns whether the notice
/// was delivered; denial is not an error.
pub fn deliver<N: Notifier + ?Sized>(notifier: &N, notice: &Notice) -> bool {
    let mut permission = notifier.permission();
    if permission != Permission::Granted {
        debug!(?permission, "requesting notification permission");
        permission = notifier.request_permission();
    }

    if permission != Permission::Granted {
        debug!(?permission, "notification permission not granted, skipping");
        return false;
    }

    match notifier.send(notice) {
        Ok(()) => {
            info!(title = %notice.title, "notification sent");
            true
        }
        Err(e) => {
            warn!(error = %e, "notification failed");
            false
        }
    }
}

/// Desktop notifications through the platform notification server
///
/// Freedesktop servers and Windows toasts have no permission step, so
/// the permission here is a local opt-out: it starts granted, and a
/// prompt resolves to granted while an explicit denial sticks.
pub struct DesktopNotifier {
    permission: Mutex<Permission>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::with_permission(Permission::Granted)
    }

    /// Start from an explicit permission, e.g. after the user opted out
    pub fn with_permission(permission: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Permission> {
        self.permission.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        *self.lock()
    }

    fn request_permission(&self) -> Permission {
        let mut permission = self.lock();
        if *permission == Permission::Prompt {
            *permission = Permission::Granted;
        }
        *permission
    }

    fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        let mut notification = notify_rust::Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&notice.title)
            .body(&notice.body);
        if let Some(icon) = &notice.icon {
            notification.icon(icon);
        }

        notification
            .show()
            .map(drop)
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}
