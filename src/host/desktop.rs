use super::{CommandName, Host, HostError, Toast, ToastStyle};
use std::path::PathBuf;
use std::process::Command;

/// Terminal host used by the `jules-launcher` binary. Toasts go to stderr,
/// urls open with the platform opener, launches re-run this executable.
pub struct DesktopHost {
    executable: Option<PathBuf>,
}

impl DesktopHost {
    pub fn new() -> Self {
        Self {
            executable: std::env::current_exe().ok(),
        }
    }

    pub fn with_executable(executable: PathBuf) -> Self {
        Self {
            executable: Some(executable),
        }
    }
}

impl Default for DesktopHost {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_toast(toast: &Toast) -> String {
    let marker = match toast.style {
        ToastStyle::Animated => "…",
        ToastStyle::Success => "✔",
        ToastStyle::Failure => "✖",
    };
    match &toast.message {
        Some(message) if !message.is_empty() => {
            format!("{} {}: {}", marker, toast.title, message)
        }
        _ => format!("{} {}", marker, toast.title),
    }
}

/// Program and arguments that open `url` in the default browser.
pub fn opener_command(url: &str) -> Result<(&'static str, Vec<String>), HostError> {
    #[cfg(target_os = "macos")]
    {
        Ok(("open", vec![url.to_string()]))
    }

    #[cfg(target_os = "linux")]
    {
        Ok(("xdg-open", vec![url.to_string()]))
    }

    #[cfg(target_os = "windows")]
    {
        // The empty string is the window title `start` expects first
        Ok((
            "cmd",
            vec!["/C".to_string(), "start".to_string(), String::new(), url.to_string()],
        ))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        let _ = url;
        Err(HostError::UnsupportedPlatform)
    }
}

impl Host for DesktopHost {
    fn show_toast(&self, toast: Toast) {
        match toast.style {
            ToastStyle::Failure => {
                tracing::warn!(title = %toast.title, message = ?toast.message, "failure toast")
            }
            _ => tracing::info!(title = %toast.title, message = ?toast.message, "toast"),
        }
        eprintln!("{}", format_toast(&toast));
    }

    fn open_url(&self, url: &str) -> Result<(), HostError> {
        let (program, args) = opener_command(url)?;
        tracing::debug!(%url, program, "opening url");

        Command::new(program)
            .args(&args)
            .spawn()
            .map_err(|source| HostError::Io {
                program: program.to_string(),
                source,
            })?;
        Ok(())
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<(), HostError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| HostError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| HostError::Clipboard(e.to_string()))
    }

    fn launch_command(&self, command: CommandName) -> Result<(), HostError> {
        let executable = self
            .executable
            .clone()
            .unwrap_or_else(|| PathBuf::from("jules-launcher"));
        tracing::info!(command = %command, executable = %executable.display(), "launching command");

        Command::new(&executable)
            .arg(command.as_str())
            .spawn()
            .map_err(|source| HostError::Io {
                program: executable.display().to_string(),
                source,
            })?;
        Ok(())
    }
}
