pub mod desktop;
pub mod types;

pub use desktop::DesktopHost;
pub use types::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Unsupported operating system")]
    UnsupportedPlatform,
}

/// What the views need from the surface they are shown in.
pub trait Host: Send + Sync {
    fn show_toast(&self, toast: Toast);

    fn open_url(&self, url: &str) -> Result<(), HostError>;

    fn copy_to_clipboard(&self, text: &str) -> Result<(), HostError>;

    /// Start another launcher command as if the user had picked it.
    fn launch_command(&self, command: CommandName) -> Result<(), HostError>;
}
