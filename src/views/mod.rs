pub mod list_sessions;
pub mod menu_bar;
pub mod selection;
pub mod start_session;

pub use list_sessions::{ListSessionsView, SessionAction, SessionList, SessionListItem};
pub use menu_bar::{
    status_icon, truncate, MenuAction, MenuBarMenu, MenuBarView, MenuItem, MenuSection, StatusIcon,
};
pub use selection::SourceSelection;
pub use start_session::{FormError, FormValues, SessionForm, StartSessionView};

use crate::host::{Host, Toast};
use crate::jules::{ApiError, Session, Source};

pub const FAILED_TO_FETCH_SOURCES: &str = "Failed to fetch sources";
pub const FAILED_TO_FETCH_SESSIONS: &str = "Failed to fetch sessions";

/// One entry of a source dropdown: value is the resource name, title is
/// "owner/repo".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownItem {
    pub value: String,
    pub title: String,
}

pub fn source_dropdown(sources: &[Source]) -> Vec<DropdownItem> {
    sources
        .iter()
        .map(|s| DropdownItem {
            value: s.name.clone(),
            title: s.label(),
        })
        .collect()
}

/// Sessions referencing `source`, in their original order.
pub fn filter_sessions_by_source<'a>(sessions: &'a [Session], source: &str) -> Vec<&'a Session> {
    sessions
        .iter()
        .filter(|s| s.source_name() == Some(source))
        .collect()
}

/// Keeps a busy flag raised while alive. Dropping it, including when the
/// owning future is cancelled mid-request, lowers the flag again.
pub(crate) struct BusyFlag<'a>(&'a mut bool);

impl<'a> BusyFlag<'a> {
    pub(crate) fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Show a failure toast for `result` and hand back the value on success.
pub(crate) fn report<T>(host: &dyn Host, title: &str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "{}", title);
            host.show_toast(Toast::failure(title, e.to_string()));
            None
        }
    }
}
