//! Operator notifications ("toasts").
//!
//! Actions never fail loudly: they push a [`Notice`] and the screen renders
//! whatever is queued the next time it draws.

use crate::error::ClientError;

/// Visual variant of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    Success,
    Error,
}

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub variant: NoticeVariant,
    pub title: String,
    pub description: String,
}

impl Notice {
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Error notice for a failed remote call.
    ///
    /// Network failures get their own title so the operator knows retrying
    /// may help; everything else carries `title`.
    #[must_use]
    pub fn from_client_error(title: &str, err: &ClientError) -> Self {
        match err {
            ClientError::Network(_) => Self::error("Network error", err.user_message()),
            _ => Self::error(title, err.user_message()),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.variant, NoticeVariant::Error)
    }
}

/// Queue of notices waiting to be shown.
#[derive(Debug, Default)]
pub struct Notifications {
    queue: Vec<Notice>,
}

impl Notifications {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        tracing::debug!(title = %notice.title, error = notice.is_error(), "Notice queued");
        self.queue.push(notice);
    }

    /// Notices currently queued, oldest first.
    #[must_use]
    pub fn pending(&self) -> &[Notice] {
        &self.queue
    }

    /// Remove and return every queued notice.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.queue)
    }

    /// Dismiss the notice at `index`, if present.
    pub fn dismiss(&mut self, index: usize) -> Option<Notice> {
        (index < self.queue.len()).then(|| self.queue.remove(index))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.queue.iter().any(Notice::is_error)
    }
}
