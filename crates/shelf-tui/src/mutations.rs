//! Cross-slice state mutations.
//!
//! Feature reducers and overlays return these instead of reaching into state
//! they do not own; `update::apply_mutations` applies them.

use crate::features::toast::ToastLevel;

#[derive(Debug, Clone, PartialEq)]
pub enum StateMutation {
    PushToast { level: ToastLevel, message: String },
}

impl StateMutation {
    pub fn info(message: impl Into<String>) -> Self {
        StateMutation::PushToast {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        StateMutation::PushToast {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        StateMutation::PushToast {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}
