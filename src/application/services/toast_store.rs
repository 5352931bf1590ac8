//! Transient notices shown to the user.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::{DEFAULT_TOAST_DURATION_MS, Toast, ToastKind, ToastRequest};

/// Ordered list of transient notices with timed removal.
#[derive(Debug, Clone)]
pub struct ToastStore {
    toasts: Arc<Mutex<Vec<Toast>>>,
    default_duration_ms: i64,
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION_MS)
    }
}

impl ToastStore {
    /// Creates an empty store; helpers use `default_duration_ms`.
    #[must_use]
    pub fn new(default_duration_ms: i64) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(Vec::new())),
            default_duration_ms,
        }
    }

    /// Appends a toast and schedules its removal when it has a positive duration.
    pub fn add(&self, request: ToastRequest) -> Uuid {
        let toast = Toast::from_request(request, self.default_duration_ms);
        let id = toast.id;
        let dismiss_after = toast.auto_dismiss_after();

        debug!(%id, kind = toast.kind.label(), title = %toast.title, "Toast added");
        self.toasts.lock().push(toast);

        if let Some(delay) = dismiss_after {
            self.schedule_removal(id, delay);
        }

        id
    }

    /// Adds a success toast with the default duration.
    pub fn success(&self, title: impl Into<String>, message: Option<String>) -> Uuid {
        self.notify(ToastKind::Success, title, message)
    }

    /// Adds an error toast with the default duration.
    pub fn error(&self, title: impl Into<String>, message: Option<String>) -> Uuid {
        self.notify(ToastKind::Error, title, message)
    }

    /// Adds a warning toast with the default duration.
    pub fn warning(&self, title: impl Into<String>, message: Option<String>) -> Uuid {
        self.notify(ToastKind::Warning, title, message)
    }

    /// Adds an informational toast with the default duration.
    pub fn info(&self, title: impl Into<String>, message: Option<String>) -> Uuid {
        self.notify(ToastKind::Info, title, message)
    }

    /// Removes a toast. Unknown ids are ignored.
    pub fn remove(&self, id: Uuid) {
        self.toasts.lock().retain(|toast| toast.id != id);
    }

    /// Removes every toast. Pending timers become no-ops.
    pub fn clear(&self) {
        self.toasts.lock().clear();
    }

    /// Snapshot in insertion order.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    /// True when nothing is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.lock().is_empty()
    }

    fn notify(&self, kind: ToastKind, title: impl Into<String>, message: Option<String>) -> Uuid {
        let mut request = ToastRequest::new(kind, title);
        request.message = message;
        self.add(request)
    }

    fn schedule_removal(&self, id: Uuid, delay: std::time::Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(%id, "No async runtime, toast will not expire");
            return;
        };

        let toasts: Weak<Mutex<Vec<Toast>>> = Arc::downgrade(&self.toasts);
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(toasts) = toasts.upgrade() {
                toasts.lock().retain(|toast| toast.id != id);
                debug!(%id, "Toast expired");
            }
        });
    }
}
