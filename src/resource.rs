//! Three-state wrapper used to hand asynchronous outcomes to presentation code.

/// Outcome of one asynchronous load.
///
/// Exactly one variant is active. Nothing enforces an order of transitions;
/// whoever runs the load publishes whichever variant matches the current step.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Loading { in_progress: bool },
    Success(T),
    Error { message: String },
}

const UNKNOWN_ERROR: &str = "unknown error";

impl<T> Resource<T> {
    pub fn loading() -> Self {
        Resource::Loading { in_progress: true }
    }

    /// Nothing requested yet.
    pub fn idle() -> Self {
        Resource::Loading { in_progress: false }
    }

    pub fn success(data: T) -> Self {
        Resource::Success(data)
    }

    /// Error variant; an empty message is replaced so callers always have text to show.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        Resource::Error { message }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading { in_progress: true })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Resource::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Resource::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Loading { in_progress } => Resource::Loading { in_progress },
            Resource::Success(data) => Resource::Success(f(data)),
            Resource::Error { message } => Resource::Error { message },
        }
    }
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Resource::idle()
    }
}
