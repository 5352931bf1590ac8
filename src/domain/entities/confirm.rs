//! Confirmation dialog requests.

/// Question shown in a confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOptions {
    /// Dialog title.
    pub title: String,
    /// Question text.
    pub message: String,
    /// Accept button label.
    pub confirm_label: String,
    /// Decline button label.
    pub cancel_label: String,
    /// Marks actions that delete or revoke data.
    pub destructive: bool,
}

impl ConfirmOptions {
    /// Non-destructive question with `Confirm`/`Cancel` labels.
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            destructive: false,
        }
    }

    /// Replaces both button labels.
    #[must_use]
    pub fn with_labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = confirm.into();
        self.cancel_label = cancel.into();
        self
    }

    /// Marks the action as destructive.
    #[must_use]
    pub const fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

/// A queued confirmation awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    /// Queue-assigned id, increasing.
    pub id: u64,
    /// What to ask.
    pub options: ConfirmOptions,
}
