pub mod render;

use crate::config::LauncherConfig;
use crate::host::{CommandName, Host};
use crate::jules::JulesApi;
use crate::views::{
    ListSessionsView, MenuAction, MenuBarView, SessionAction, SessionList, SessionListItem,
    StartSessionView,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use render::{render_menu, render_session_form, render_session_list};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "jules-launcher", version, about = "Browse and start Jules coding agent sessions")]
pub struct Cli {
    /// Preferences file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List sessions of one source
    ListSessions {
        /// Source resource name, e.g. sources/github/acme/widgets
        #[arg(long)]
        source: Option<String>,
        /// Open the session with this id in the browser
        #[arg(long, value_name = "SESSION_ID")]
        open: Option<String>,
        /// Copy this session id to the clipboard
        #[arg(long, value_name = "SESSION_ID")]
        copy: Option<String>,
    },
    /// Start a new session (prints the form when --message is omitted)
    StartNewSession {
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    /// Recent session status
    MenuBarStatus {
        /// Keep polling until Ctrl-C
        #[arg(long)]
        watch: bool,
        /// Poll interval in seconds
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
        /// Open the recent session at this index
        #[arg(long, value_name = "INDEX")]
        open: Option<usize>,
        #[arg(long, value_enum)]
        launch: Option<QuickAction>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuickAction {
    Start,
    Search,
}

impl From<QuickAction> for CommandName {
    fn from(action: QuickAction) -> Self {
        match action {
            QuickAction::Start => CommandName::StartNewSession,
            QuickAction::Search => CommandName::ListSessions,
        }
    }
}

/// Everything a command needs, built once in `run`.
pub struct AppState {
    pub config: LauncherConfig,
    pub api: Arc<dyn JulesApi>,
    pub host: Arc<dyn Host>,
}

pub async fn execute(command: Commands, ctx: &AppState) -> Result<()> {
    match command {
        Commands::ListSessions { source, open, copy } => {
            list_sessions(ctx, source, open, copy).await
        }
        Commands::StartNewSession {
            source,
            branch,
            message,
        } => start_new_session(ctx, source, branch, message).await,
        Commands::MenuBarStatus {
            watch,
            interval,
            open,
            launch,
        } => menu_bar_status(ctx, watch, interval, open, launch).await,
    }
}

async fn list_sessions(
    ctx: &AppState,
    source: Option<String>,
    open: Option<String>,
    copy: Option<String>,
) -> Result<()> {
    let mut view = ListSessionsView::new(ctx.api.clone(), ctx.host.clone());
    if let Some(source) = source {
        view.select_source(source);
    }
    view.load().await;

    let list = view.render();
    print!("{}", render_session_list(&list));

    if let Some(id) = open {
        let action = find_item(&list, &id)?
            .actions
            .iter()
            .find(|a| matches!(a, SessionAction::OpenInBrowser(_)))
            .ok_or_else(|| anyhow!("Session {} has no URL", id))?;
        view.perform(action)?;
    }

    if let Some(id) = copy {
        let action = find_item(&list, &id)?
            .actions
            .iter()
            .find(|a| matches!(a, SessionAction::CopyId(_)))
            .ok_or_else(|| anyhow!("Session {} has no id to copy", id))?;
        view.perform(action)?;
    }

    Ok(())
}

/// Errors when `id` is not among the rendered items.
fn find_item<'a>(list: &'a SessionList, id: &str) -> Result<&'a SessionListItem> {
    list.items
        .iter()
        .find(|i| i.id == id)
        .ok_or_else(|| anyhow!("Session {} is not in the list", id))
}

async fn start_new_session(
    ctx: &AppState,
    source: Option<String>,
    branch: Option<String>,
    message: Option<String>,
) -> Result<()> {
    let mut view = StartSessionView::new(ctx.api.clone(), ctx.host.clone());
    view.load().await;
    if let Some(source) = source {
        view.select_source(source).await;
    }

    let Some(message) = message else {
        print!("{}", render_session_form(&view.render()));
        return Ok(());
    };

    let values = view.form_values(None, branch, message)?;
    view.submit(values)
        .await
        .map(|_| ())
        .context("Session was not created")
}

async fn menu_bar_status(
    ctx: &AppState,
    watch: bool,
    interval: Option<u64>,
    open: Option<usize>,
    launch: Option<QuickAction>,
) -> Result<()> {
    let mut view = MenuBarView::new(ctx.api.clone(), ctx.host.clone());

    if !watch {
        view.poll().await;
        print!("{}", render_menu(&view.render()));

        if let Some(index) = open {
            view.activate_session(index)?;
        }
        if let Some(action) = launch {
            view.perform(&MenuAction::Launch(action.into()))?;
        }
        return Ok(());
    }

    let secs = interval
        .filter(|s| *s > 0)
        .unwrap_or(ctx.config.poll_interval_secs);
    tracing::info!(interval_secs = secs, "watching sessions");

    watch_menu(&mut view, Duration::from_secs(secs), tokio::signal::ctrl_c()).await;
    Ok(())
}

/// Poll and print the menu every `period` until `shutdown` resolves.
/// `shutdown` is polled across iterations and races each fetch.
async fn watch_menu<F: Future>(view: &mut MenuBarView, period: Duration, shutdown: F) {
    let mut ticker = tokio::time::interval(period);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        let polled = tokio::select! {
            _ = view.poll() => true,
            _ = &mut shutdown => false,
        };
        if !polled {
            break;
        }
        print!("{}", render_menu(&view.render()));
    }

    tracing::info!("stopping menu bar watch");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::mocks::*;
    use clap::CommandFactory;

    fn context(api: MockJulesApi) -> (AppState, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::new());
        let ctx = AppState {
            config: LauncherConfig {
                api_key: "k".to_string(),
                ..Default::default()
            },
            api: Arc::new(api),
            host: host.clone(),
        };
        (ctx, host)
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommand_names_match_launch_commands() {
        for command in [
            CommandName::ListSessions,
            CommandName::StartNewSession,
            CommandName::MenuBarStatus,
        ] {
            let cli = Cli::try_parse_from(["jules-launcher", command.as_str()]);
            assert!(cli.is_ok(), "{} should parse", command);
        }
    }

    #[tokio::test]
    async fn test_start_new_session_submits_with_default_branch() {
        let api = MockJulesApi::new()
            .with_sources(vec![source_with_branches("sources/42", "main", &["main"])]);
        let (ctx, host) = context(api);

        execute(
            Commands::StartNewSession {
                source: None,
                branch: None,
                message: Some("fix bug".to_string()),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert!(host.failures().is_empty());
        assert_eq!(host.toasts().last().unwrap().title, "Session created successfully");
    }

    #[tokio::test]
    async fn test_list_sessions_open_unknown_id_fails() {
        let api = MockJulesApi::new()
            .with_sources(vec![source("a", "o", "r")])
            .with_sessions(vec![session("1", "a", "x", "RUNNING")]);
        let (ctx, host) = context(api);

        let result = execute(
            Commands::ListSessions {
                source: None,
                open: Some("404".to_string()),
                copy: None,
            },
            &ctx,
        )
        .await;

        assert!(result.is_err());
        assert!(host.events().iter().all(|e| !matches!(e, HostEvent::OpenUrl(_))));
    }

    #[tokio::test]
    async fn test_menu_bar_launch_quick_action() {
        let (ctx, host) = context(MockJulesApi::new().with_sessions(Vec::new()));

        execute(
            Commands::MenuBarStatus {
                watch: false,
                interval: None,
                open: None,
                launch: Some(QuickAction::Start),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(host.events(), vec![HostEvent::Launch(CommandName::StartNewSession)]);
    }

    #[tokio::test]
    async fn test_list_sessions_copy_listed_id() {
        let api = MockJulesApi::new()
            .with_sources(vec![source("a", "o", "r")])
            .with_sessions(vec![session("1", "a", "x", "RUNNING")]);
        let (ctx, host) = context(api);

        execute(
            Commands::ListSessions {
                source: None,
                open: None,
                copy: Some("1".to_string()),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(host.events(), vec![HostEvent::Copy("1".to_string())]);
    }

    #[tokio::test]
    async fn test_list_sessions_copy_unknown_id_fails() {
        let api = MockJulesApi::new()
            .with_sources(vec![source("a", "o", "r")])
            .with_sessions(vec![
                session("1", "a", "x", "RUNNING"),
                session("2", "b", "other source", "RUNNING"),
            ]);
        let (ctx, host) = context(api);

        let result = execute(
            Commands::ListSessions {
                source: None,
                open: None,
                copy: Some("2".to_string()),
            },
            &ctx,
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Session 2 is not in the list");
        assert!(host.events().is_empty());
    }

    #[tokio::test]
    async fn test_watch_stops_while_poll_is_stalled() {
        let host = Arc::new(RecordingHost::new());
        let mut view = MenuBarView::new(Arc::new(StalledJulesApi), host);
        let shutdown = tokio::time::sleep(Duration::from_millis(20));

        let watch = watch_menu(&mut view, Duration::from_secs(60), shutdown);
        let stopped = tokio::time::timeout(Duration::from_secs(5), watch).await;

        assert!(stopped.is_ok());
        assert!(!view.render().is_loading);
    }

    #[tokio::test]
    async fn test_watch_polls_once_per_tick_until_shutdown() {
        let api = Arc::new(MockJulesApi::new().with_sessions(Vec::new()));
        let host = Arc::new(RecordingHost::new());
        let mut view = MenuBarView::new(api.clone(), host);
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();

        let watch = watch_menu(&mut view, Duration::from_secs(60), stopped);
        tokio::pin!(watch);
        assert!(tokio::time::timeout(Duration::from_millis(20), &mut watch)
            .await
            .is_err());
        stop.send(()).unwrap();
        watch.await;

        assert_eq!(api.calls(), vec!["GET /sessions"]);
    }
}
