use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastStyle {
    Animated,
    Success,
    Failure,
}

/// A transient notification shown by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub style: ToastStyle,
    pub title: String,
    pub message: Option<String>,
}

impl Toast {
    pub fn animated(title: impl Into<String>) -> Self {
        Self {
            style: ToastStyle::Animated,
            title: title.into(),
            message: None,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            style: ToastStyle::Success,
            title: title.into(),
            message: Some(message.into()),
        }
    }

    pub fn failure(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            style: ToastStyle::Failure,
            title: title.into(),
            message: Some(message.into()),
        }
    }
}

/// The launcher commands one view can start another as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandName {
    ListSessions,
    StartNewSession,
    MenuBarStatus,
}

impl CommandName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::ListSessions => "list-sessions",
            CommandName::StartNewSession => "start-new-session",
            CommandName::MenuBarStatus => "menu-bar-status",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
