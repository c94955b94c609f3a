use super::{
    filter_sessions_by_source, report, source_dropdown, BusyFlag, DropdownItem, SourceSelection,
    FAILED_TO_FETCH_SESSIONS, FAILED_TO_FETCH_SOURCES,
};
use crate::host::{Host, HostError};
use crate::jules::{JulesApi, Session, SessionsResponse, Source, SourcesResponse};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    OpenInBrowser(String),
    CopyId(String),
}

impl SessionAction {
    pub fn title(&self) -> &'static str {
        match self {
            SessionAction::OpenInBrowser(_) => "Open in Browser",
            SessionAction::CopyId(_) => "Copy Session ID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionListItem {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub accessory: String,
    pub actions: Vec<SessionAction>,
}

impl SessionListItem {
    fn from_session(session: &Session) -> Self {
        let mut actions = Vec::with_capacity(2);
        if let Some(url) = session.browser_url() {
            actions.push(SessionAction::OpenInBrowser(url.to_string()));
        }
        actions.push(SessionAction::CopyId(session.id.clone()));

        Self {
            id: session.id.clone(),
            title: session.display_title().to_string(),
            subtitle: session.state.clone(),
            accessory: session.id.clone(),
            actions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionList {
    pub is_loading: bool,
    pub source_dropdown: Vec<DropdownItem>,
    pub selected_source: Option<String>,
    pub items: Vec<SessionListItem>,
}

/// Sessions of one source, with a dropdown to switch sources.
pub struct ListSessionsView {
    api: Arc<dyn JulesApi>,
    host: Arc<dyn Host>,
    sources: Option<Vec<Source>>,
    sessions: Option<Vec<Session>>,
    selection: SourceSelection,
    is_loading_sources: bool,
    is_loading_sessions: bool,
}

impl ListSessionsView {
    pub fn new(api: Arc<dyn JulesApi>, host: Arc<dyn Host>) -> Self {
        Self {
            api,
            host,
            sources: None,
            sessions: None,
            selection: SourceSelection::Unset,
            is_loading_sources: false,
            is_loading_sessions: false,
        }
    }

    /// Fetch sources and sessions side by side. A failed fetch keeps
    /// whatever was loaded before.
    pub async fn load(&mut self) {
        let api = Arc::clone(&self.api);
        let (sources, sessions) = {
            let _sources = BusyFlag::raise(&mut self.is_loading_sources);
            let _sessions = BusyFlag::raise(&mut self.is_loading_sessions);
            tokio::join!(api.list_sources(), api.list_sessions())
        };

        if let Some(resp) = report(self.host.as_ref(), FAILED_TO_FETCH_SOURCES, sources) {
            self.apply_sources(resp);
        }
        if let Some(resp) = report(self.host.as_ref(), FAILED_TO_FETCH_SESSIONS, sessions) {
            self.apply_sessions(resp);
        }
    }

    pub fn apply_sources(&mut self, response: SourcesResponse) {
        tracing::info!(count = response.sources.len(), "loaded sources");
        if self.selection.apply_default(&response.sources) {
            tracing::debug!(source = ?self.selection.value(), "defaulted source selection");
        }
        self.sources = Some(response.sources);
    }

    pub fn apply_sessions(&mut self, response: SessionsResponse) {
        tracing::info!(count = response.sessions.len(), "loaded sessions");
        self.sessions = Some(response.sessions);
    }

    pub fn select_source(&mut self, name: impl Into<String>) {
        self.selection.choose(name);
    }

    pub fn selection(&self) -> &SourceSelection {
        &self.selection
    }

    pub fn sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading_sources || self.is_loading_sessions
    }

    pub fn filtered_sessions(&self) -> Vec<&Session> {
        match (self.sessions.as_deref(), self.selection.value()) {
            (Some(sessions), Some(source)) => filter_sessions_by_source(sessions, source),
            _ => Vec::new(),
        }
    }

    pub fn render(&self) -> SessionList {
        SessionList {
            is_loading: self.is_loading(),
            source_dropdown: source_dropdown(self.sources()),
            selected_source: self.selection.value().map(str::to_string),
            items: self
                .filtered_sessions()
                .into_iter()
                .map(SessionListItem::from_session)
                .collect(),
        }
    }

    pub fn perform(&self, action: &SessionAction) -> Result<(), HostError> {
        match action {
            SessionAction::OpenInBrowser(url) => self.host.open_url(url),
            SessionAction::CopyId(id) => self.host.copy_to_clipboard(id),
        }
    }
}
