use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A user-facing outcome message, the equivalent of an alert dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Server error payload or transport error text, when there is one.
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.to_string(),
            detail: None,
        }
    }

    pub fn failure(message: &str, detail: Option<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.to_string(),
            detail,
        }
    }
}

/// Host environment of a controller: receives notices, navigations and
/// reloads. Only invoked at the end of an operation.
pub trait Shell: Send + Sync {
    fn notify(&self, notice: &Notice);
    fn navigate(&self, page: &str);
    fn reload(&self);
}

impl<T: Shell + ?Sized> Shell for Arc<T> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice)
    }

    fn navigate(&self, page: &str) {
        (**self).navigate(page)
    }

    fn reload(&self) {
        (**self).reload()
    }
}
