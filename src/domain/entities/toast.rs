//! Toast notices.

use std::time::Duration;

use uuid::Uuid;

/// Default lifetime of a toast in milliseconds.
pub const DEFAULT_TOAST_DURATION_MS: i64 = 5000;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    /// Lower-case name for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Parameters for a new toast.
#[derive(Debug, Clone)]
pub struct ToastRequest {
    /// Severity.
    pub kind: ToastKind,
    /// Headline.
    pub title: String,
    /// Optional detail line.
    pub message: Option<String>,
    /// Lifetime override; `None` uses the store default.
    pub duration_ms: Option<i64>,
}

impl ToastRequest {
    /// Request with the default duration.
    #[must_use]
    pub fn new(kind: ToastKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: None,
            duration_ms: None,
        }
    }

    /// Adds a detail line.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Zero or negative keeps the toast until it is removed.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Toast currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Handle for removal.
    pub id: Uuid,
    /// Severity.
    pub kind: ToastKind,
    /// Headline.
    pub title: String,
    /// Optional detail line.
    pub message: Option<String>,
    /// Lifetime in milliseconds; zero or less persists.
    pub duration_ms: i64,
}

impl Toast {
    /// Creates a toast with a fresh id.
    #[must_use]
    pub fn from_request(request: ToastRequest, default_duration_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: request.kind,
            title: request.title,
            message: request.message,
            duration_ms: request.duration_ms.unwrap_or(default_duration_ms),
        }
    }

    /// Delay before automatic removal, `None` for persistent toasts.
    #[must_use]
    pub fn auto_dismiss_after(&self) -> Option<Duration> {
        u64::try_from(self.duration_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_uses_default_duration() {
        let toast = Toast::from_request(
            ToastRequest::new(ToastKind::Info, "Saved").with_message("Client updated"),
            DEFAULT_TOAST_DURATION_MS,
        );

        assert_eq!(toast.title, "Saved");
        assert_eq!(toast.message.as_deref(), Some("Client updated"));
        assert_eq!(toast.auto_dismiss_after(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_non_positive_duration_is_persistent() {
        for duration in [0, -1, -5000] {
            let toast = Toast::from_request(
                ToastRequest::new(ToastKind::Error, "Failed").with_duration_ms(duration),
                DEFAULT_TOAST_DURATION_MS,
            );
            assert_eq!(toast.auto_dismiss_after(), None);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Toast::from_request(ToastRequest::new(ToastKind::Info, "a"), 1);
        let b = Toast::from_request(ToastRequest::new(ToastKind::Info, "b"), 1);
        assert_ne!(a.id, b.id);
    }
}
