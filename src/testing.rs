//! Test doubles for the backend, release feed and notifier

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::backend::{Backend, BackendError};
use crate::hotkey::HotkeyCombination;
use crate::notify::{Notice, Notifier, NotifyError, Permission};
use crate::version::{FeedError, ReleaseFeed};
use crate::window::{Liveness, WindowRegistry};

/// Scriptable backend recording every command it receives
pub struct FakeBackend {
    hotkey: Mutex<HotkeyCombination>,
    version: String,
    fail_get: AtomicBool,
    update_failures: AtomicUsize,
    splash_failures: AtomicUsize,
    unhide_failures: AtomicUsize,
    /// Window closed while the splash close is in flight
    close_during_splash: Mutex<Option<Liveness>>,
    windows: WindowRegistry,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            hotkey: Mutex::new(HotkeyCombination::default_binding()),
            version: "1.2.0".to_string(),
            fail_get: AtomicBool::new(false),
            update_failures: AtomicUsize::new(0),
            splash_failures: AtomicUsize::new(0),
            unhide_failures: AtomicUsize::new(0),
            close_during_splash: Mutex::new(None),
            windows: WindowRegistry::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Fail the next `n` calls to `update_hotkey`
    pub fn fail_updates(&self, n: usize) {
        self.update_failures.store(n, Ordering::SeqCst);
    }

    pub fn fail_splash(&self, n: usize) {
        self.splash_failures.store(n, Ordering::SeqCst);
    }

    pub fn fail_unhide(&self, n: usize) {
        self.unhide_failures.store(n, Ordering::SeqCst);
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    /// Kill `liveness` from inside the next `close_splashscreen`
    pub fn close_during_splash(&self, liveness: Liveness) {
        *self.close_during_splash.lock().unwrap() = Some(liveness);
    }

    /// Registry that `close_window` acts on
    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    /// Change the stored chord without going through a window
    pub fn set_hotkey(&self, hotkey: HotkeyCombination) {
        *self.hotkey.lock().unwrap() = hotkey;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls().iter().filter(|c| **c == command).count()
    }

    fn record(&self, command: &'static str) {
        self.calls.lock().unwrap().push(command);
    }
}

fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn rejected(message: &str) -> BackendError {
    BackendError::Rejected {
        code: "fake".to_string(),
        message: message.to_string(),
    }
}

impl Backend for FakeBackend {
    async fn get_hotkey(&self) -> Result<HotkeyCombination, BackendError> {
        self.record("get_hotkey");
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(rejected("get_hotkey unavailable"));
        }
        Ok(self.hotkey.lock().unwrap().clone())
    }

    async fn update_hotkey(&self, new_hotkey: HotkeyCombination) -> Result<(), BackendError> {
        self.record("update_hotkey");
        if take_failure(&self.update_failures) {
            return Err(rejected("shortcut already registered"));
        }
        *self.hotkey.lock().unwrap() = new_hotkey;
        Ok(())
    }

    async fn close_splashscreen(&self) -> Result<(), BackendError> {
        self.record("close_splashscreen");
        if let Some(liveness) = self.close_during_splash.lock().unwrap().take() {
            liveness.kill();
        }
        if take_failure(&self.splash_failures) {
            return Err(rejected("splashscreen busy"));
        }
        Ok(())
    }

    async fn unhide_window(&self) -> Result<(), BackendError> {
        self.record("unhide_window");
        if take_failure(&self.unhide_failures) {
            return Err(rejected("main window busy"));
        }
        Ok(())
    }

    async fn close_window(&self, label: &str) -> Result<(), BackendError> {
        self.record("close_window");
        self.windows.request_close(label)?;
        Ok(())
    }

    async fn app_version(&self) -> String {
        self.version.clone()
    }
}

/// Release feed with a canned answer
pub enum FakeFeed {
    Tag(String),
    Failing,
    /// Never answers
    Hanging,
}

impl FakeFeed {
    pub fn tag(tag: &str) -> Self {
        FakeFeed::Tag(tag.to_string())
    }

    pub fn failing() -> Self {
        FakeFeed::Failing
    }
}

impl ReleaseFeed for FakeFeed {
    async fn latest_tag(&self) -> Result<String, FeedError> {
        match self {
            FakeFeed::Tag(tag) => Ok(tag.clone()),
            FakeFeed::Failing => Err(FeedError::MissingTag),
            FakeFeed::Hanging => std::future::pending().await,
        }
    }
}

/// Notifier recording permission requests and sent notices
pub struct FakeNotifier {
    permission: Mutex<Permission>,
    on_request: Permission,
    requests: AtomicUsize,
    sent: Mutex<Vec<Notice>>,
}

impl FakeNotifier {
    pub fn new(initial: Permission, on_request: Permission) -> Self {
        Self {
            permission: Mutex::new(initial),
            on_request,
            requests: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn granted() -> Self {
        Self::new(Permission::Granted, Permission::Granted)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Notice> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for FakeNotifier {
    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&self) -> Permission {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.permission.lock().unwrap() = self.on_request;
        self.on_request
    }

    fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notice.clone());
        Ok(())
    }
}
