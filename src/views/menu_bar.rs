use super::{report, BusyFlag, FAILED_TO_FETCH_SESSIONS};
use crate::host::{CommandName, Host, HostError};
use crate::jules::{JulesApi, Session};
use std::sync::Arc;

pub const RECENT_SESSION_LIMIT: usize = 5;
pub const TITLE_MAX_CHARS: usize = 40;
const TOOLTIP: &str = "Jules Session Status";

/// Status bucket of a session, derived from its free-text state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    InProgress,
    Succeeded,
    Failed,
    Other,
}

impl StatusIcon {
    pub fn icon(&self) -> &'static str {
        match self {
            StatusIcon::InProgress | StatusIcon::Other => "circle",
            StatusIcon::Succeeded => "checkmark",
            StatusIcon::Failed => "xmark-circle",
        }
    }

    pub fn tint(&self) -> &'static str {
        match self {
            StatusIcon::InProgress => "orange",
            StatusIcon::Succeeded => "green",
            StatusIcon::Failed => "red",
            StatusIcon::Other => "secondary-text",
        }
    }

    /// Single-character form for terminal output.
    pub fn glyph(&self) -> char {
        match self {
            StatusIcon::InProgress => '●',
            StatusIcon::Succeeded => '✔',
            StatusIcon::Failed => '✖',
            StatusIcon::Other => '○',
        }
    }
}

pub fn status_icon(state: Option<&str>) -> StatusIcon {
    match state.unwrap_or_default().to_lowercase().as_str() {
        "running" | "in_progress" | "active" | "awaiting_user_feedback" => StatusIcon::InProgress,
        "succeeded" | "completed" | "done" => StatusIcon::Succeeded,
        "failed" | "error" => StatusIcon::Failed,
        _ => StatusIcon::Other,
    }
}

/// Cut `text` to `max` characters, appending "..." when anything was removed.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    OpenUrl(String),
    Launch(CommandName),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: Option<StatusIcon>,
    pub action: MenuAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    pub title: Option<&'static str>,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuBarMenu {
    pub tooltip: &'static str,
    pub is_loading: bool,
    pub recent: MenuSection,
    pub actions: MenuSection,
}

/// Persistent summary of the most recent sessions.
pub struct MenuBarView {
    api: Arc<dyn JulesApi>,
    host: Arc<dyn Host>,
    sessions: Option<Vec<Session>>,
    is_loading: bool,
}

impl MenuBarView {
    pub fn new(api: Arc<dyn JulesApi>, host: Arc<dyn Host>) -> Self {
        Self {
            api,
            host,
            sessions: None,
            is_loading: false,
        }
    }

    /// One poll cycle. Nothing from the previous poll is kept except the
    /// list itself, which survives a failed fetch.
    pub async fn poll(&mut self) {
        let result = {
            let _loading = BusyFlag::raise(&mut self.is_loading);
            self.api.list_sessions().await
        };

        if let Some(response) = report(self.host.as_ref(), FAILED_TO_FETCH_SESSIONS, result) {
            tracing::debug!(count = response.sessions.len(), "polled sessions");
            self.sessions = Some(response.sessions);
        }
    }

    /// First five sessions in API order.
    pub fn recent_sessions(&self) -> &[Session] {
        let sessions = self.sessions.as_deref().unwrap_or_default();
        &sessions[..sessions.len().min(RECENT_SESSION_LIMIT)]
    }

    pub fn render(&self) -> MenuBarMenu {
        let mut items: Vec<MenuItem> = self
            .recent_sessions()
            .iter()
            .map(|session| MenuItem {
                title: truncate(session.display_title(), TITLE_MAX_CHARS),
                subtitle: Some(session.state.clone()),
                icon: Some(status_icon(Some(&session.state))),
                action: session
                    .browser_url()
                    .map(|url| MenuAction::OpenUrl(url.to_string()))
                    .unwrap_or(MenuAction::None),
            })
            .collect();

        if items.is_empty() && !self.is_loading {
            items.push(MenuItem {
                title: "No recent sessions".to_string(),
                subtitle: None,
                icon: None,
                action: MenuAction::None,
            });
        }

        MenuBarMenu {
            tooltip: TOOLTIP,
            is_loading: self.is_loading,
            recent: MenuSection {
                title: Some("Recent Sessions"),
                items,
            },
            actions: MenuSection {
                title: None,
                items: vec![
                    MenuItem {
                        title: "Start New Session".to_string(),
                        subtitle: None,
                        icon: None,
                        action: MenuAction::Launch(CommandName::StartNewSession),
                    },
                    MenuItem {
                        title: "Search Sessions".to_string(),
                        subtitle: None,
                        icon: None,
                        action: MenuAction::Launch(CommandName::ListSessions),
                    },
                ],
            },
        }
    }

    pub fn perform(&self, action: &MenuAction) -> Result<(), HostError> {
        match action {
            MenuAction::OpenUrl(url) => self.host.open_url(url),
            MenuAction::Launch(command) => self.host.launch_command(*command),
            MenuAction::None => Ok(()),
        }
    }

    /// Click the recent-session item at `index`.
    pub fn activate_session(&self, index: usize) -> Result<(), HostError> {
        match self.recent_sessions().get(index).and_then(Session::browser_url) {
            Some(url) => self.host.open_url(url),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jules::JulesApiClient;
    use crate::test_helpers::mocks::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn setup(api: MockJulesApi) -> (MenuBarView, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::new());
        let view = MenuBarView::new(Arc::new(api), host.clone());
        (view, host)
    }

    #[test]
    fn test_status_icon_is_case_insensitive() {
        assert_eq!(status_icon(Some("Running")), StatusIcon::InProgress);
        assert_eq!(status_icon(Some("running")), StatusIcon::InProgress);
        assert_eq!(status_icon(Some("ACTIVE")), StatusIcon::InProgress);
        assert_eq!(status_icon(Some("AWAITING_USER_FEEDBACK")), StatusIcon::InProgress);
        assert_eq!(status_icon(Some("Completed")), StatusIcon::Succeeded);
        assert_eq!(status_icon(Some("done")), StatusIcon::Succeeded);
        assert_eq!(status_icon(Some("ERROR")), StatusIcon::Failed);
        assert_eq!(status_icon(Some("queued")), StatusIcon::Other);
        assert_eq!(status_icon(Some("")), StatusIcon::Other);
        assert_eq!(status_icon(None), StatusIcon::Other);
    }

    #[test]
    fn test_status_icon_appearance() {
        assert_eq!(StatusIcon::InProgress.tint(), "orange");
        assert_eq!(StatusIcon::Succeeded.icon(), "checkmark");
        assert_eq!(StatusIcon::Failed.tint(), "red");
        assert_eq!(StatusIcon::Other.icon(), "circle");
        assert_eq!(StatusIcon::Other.tint(), "secondary-text");
    }

    #[test]
    fn test_truncate_at_forty_chars() {
        let forty = "a".repeat(40);
        let forty_one = "b".repeat(41);

        assert_eq!(truncate(&forty, TITLE_MAX_CHARS), forty);
        assert_eq!(
            truncate(&forty_one, TITLE_MAX_CHARS),
            format!("{}...", "b".repeat(40))
        );
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let title = "é".repeat(41);
        assert_eq!(truncate(&title, 40), format!("{}...", "é".repeat(40)));
    }

    #[tokio::test]
    async fn test_shows_first_five_in_api_order() {
        let sessions: Vec<_> = (1..=7)
            .map(|i| session(&i.to_string(), "a", &format!("s{}", i), "RUNNING"))
            .collect();
        let (mut view, _host) = setup(MockJulesApi::new().with_sessions(sessions));

        view.poll().await;

        let menu = view.render();
        let titles: Vec<_> = menu.recent.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["s1", "s2", "s3", "s4", "s5"]);
        assert_eq!(menu.recent.title, Some("Recent Sessions"));
        assert_eq!(menu.tooltip, "Jules Session Status");
        assert_eq!(menu.recent.items[0].icon, Some(StatusIcon::InProgress));
    }

    #[tokio::test]
    async fn test_empty_menu_shows_placeholder() {
        let (mut view, _host) = setup(MockJulesApi::new().with_sessions(Vec::new()));

        view.poll().await;

        let menu = view.render();
        assert_eq!(menu.recent.items.len(), 1);
        assert_eq!(menu.recent.items[0].title, "No recent sessions");
        assert_eq!(menu.recent.items[0].action, MenuAction::None);
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_previous_sessions() {
        let api = MockJulesApi::new().with_sessions(vec![session("1", "a", "one", "DONE")]);
        let api = Arc::new(api);
        let host = Arc::new(RecordingHost::new());
        let mut view = MenuBarView::new(api.clone(), host.clone());

        view.poll().await;
        api.fail_sessions();
        view.poll().await;

        assert_eq!(view.recent_sessions().len(), 1);
        assert_eq!(host.failures()[0].title, "Failed to fetch sessions");
    }

    #[tokio::test]
    async fn test_item_and_static_actions() {
        let mut no_url = session("2", "a", "two", "FAILED");
        no_url.url = None;
        let api =
            MockJulesApi::new().with_sessions(vec![session("1", "a", "one", "RUNNING"), no_url]);
        let (mut view, host) = setup(api);
        view.poll().await;

        view.activate_session(0).unwrap();
        view.activate_session(1).unwrap();
        view.activate_session(9).unwrap();

        let menu = view.render();
        for item in &menu.actions.items {
            view.perform(&item.action).unwrap();
        }

        assert_eq!(
            host.events(),
            vec![
                HostEvent::OpenUrl("https://jules.google.com/session/1".to_string()),
                HostEvent::Launch(CommandName::StartNewSession),
                HostEvent::Launch(CommandName::ListSessions),
            ]
        );
    }

    #[tokio::test]
    async fn test_cancelled_poll_clears_loading() {
        let host = Arc::new(RecordingHost::new());
        let mut view = MenuBarView::new(Arc::new(StalledJulesApi), host.clone());

        let poll = tokio::time::timeout(Duration::from_millis(20), view.poll()).await;
        assert!(poll.is_err());

        let menu = view.render();
        assert!(!menu.is_loading);
        assert_eq!(menu.recent.items.len(), 1);
        assert_eq!(menu.recent.items[0].title, "No recent sessions");
        assert!(host.toasts().is_empty());
    }

    #[test]
    fn test_no_placeholder_while_loading() {
        let (mut view, _host) = setup(MockJulesApi::new());
        view.is_loading = true;

        let menu = view.render();

        assert!(menu.is_loading);
        assert!(menu.recent.items.is_empty());
        assert_eq!(menu.actions.items.len(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_sessions_body_shows_failure_toast() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = Arc::new(JulesApiClient::with_base_url(&mock_server.uri(), "key"));
        let host = Arc::new(RecordingHost::new());
        let mut view = MenuBarView::new(api, host.clone());

        view.poll().await;

        let failures = host.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].title, "Failed to fetch sessions");
        let message = failures[0].message.as_deref().unwrap();
        assert!(message.starts_with("Failed to parse response"));
        assert!(!view.render().is_loading);
    }
}
