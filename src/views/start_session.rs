use super::{
    report, source_dropdown, BusyFlag, DropdownItem, SourceSelection, FAILED_TO_FETCH_SOURCES,
};
use crate::host::{Host, Toast};
use crate::jules::{ApiError, CreateSessionRequest, GitHubBranch, JulesApi, Source};
use std::sync::Arc;
use thiserror::Error;

const FAILED_TO_FETCH_SOURCE_DETAILS: &str = "Failed to fetch source details";
const FAILED_TO_CREATE_SESSION: &str = "Failed to create session";
const MESSAGE_PLACEHOLDER: &str = "Enter your chat message...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub source: String,
    pub branch: String,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("No source selected")]
    NoSource,
    #[error("No branch given and the source has no default branch")]
    NoBranch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionForm {
    pub is_loading: bool,
    pub source_dropdown: Vec<DropdownItem>,
    pub selected_source: Option<String>,
    pub branch_dropdown: Vec<DropdownItem>,
    pub default_branch: Option<String>,
    pub message_placeholder: &'static str,
}

/// Form for starting a new Jules session on a source and branch.
pub struct StartSessionView {
    api: Arc<dyn JulesApi>,
    host: Arc<dyn Host>,
    sources: Option<Vec<Source>>,
    selection: SourceSelection,
    source_details: Option<Source>,
    is_submitting: bool,
    is_loading_sources: bool,
    is_loading_details: bool,
}

impl StartSessionView {
    pub fn new(api: Arc<dyn JulesApi>, host: Arc<dyn Host>) -> Self {
        Self {
            api,
            host,
            sources: None,
            selection: SourceSelection::Unset,
            source_details: None,
            is_submitting: false,
            is_loading_sources: false,
            is_loading_details: false,
        }
    }

    pub async fn load(&mut self) {
        let result = {
            let _loading = BusyFlag::raise(&mut self.is_loading_sources);
            self.api.list_sources().await
        };

        let Some(response) = report(self.host.as_ref(), FAILED_TO_FETCH_SOURCES, result) else {
            return;
        };

        tracing::info!(count = response.sources.len(), "loaded sources");
        let defaulted = self.selection.apply_default(&response.sources);
        self.sources = Some(response.sources);

        if defaulted {
            self.refresh_source_details().await;
        }
    }

    pub async fn select_source(&mut self, name: impl Into<String>) {
        if self.selection.choose(name) {
            self.source_details = None;
            self.refresh_source_details().await;
        }
    }

    /// Branch list and default branch come from the single-source endpoint;
    /// nothing is fetched while no source is selected.
    async fn refresh_source_details(&mut self) {
        let Some(name) = self.selection.value().map(str::to_string) else {
            return;
        };

        let result = {
            let _loading = BusyFlag::raise(&mut self.is_loading_details);
            self.api.get_source(&name).await
        };

        if let Some(source) = report(self.host.as_ref(), FAILED_TO_FETCH_SOURCE_DETAILS, result) {
            tracing::debug!(
                source = %source.name,
                branches = source.github_repo.branches.len(),
                "loaded source details"
            );
            self.source_details = Some(source);
        }
    }

    pub fn selection(&self) -> &SourceSelection {
        &self.selection
    }

    pub fn branches(&self) -> &[GitHubBranch] {
        self.source_details
            .as_ref()
            .map(|s| s.github_repo.branches.as_slice())
            .unwrap_or_default()
    }

    pub fn default_branch(&self) -> Option<&str> {
        self.source_details.as_ref().and_then(Source::default_branch)
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_loading(&self) -> bool {
        self.is_submitting || self.is_loading_sources || self.is_loading_details
    }

    pub fn render(&self) -> SessionForm {
        SessionForm {
            is_loading: self.is_loading(),
            source_dropdown: source_dropdown(self.sources.as_deref().unwrap_or_default()),
            selected_source: self.selection.value().map(str::to_string),
            branch_dropdown: self
                .branches()
                .iter()
                .map(|b| DropdownItem {
                    value: b.display_name.clone(),
                    title: b.display_name.clone(),
                })
                .collect(),
            default_branch: self.default_branch().map(str::to_string),
            message_placeholder: MESSAGE_PLACEHOLDER,
        }
    }

    /// Fill in what the user left out: the selected source and the source's
    /// default branch.
    pub fn form_values(
        &self,
        source: Option<String>,
        branch: Option<String>,
        message: impl Into<String>,
    ) -> Result<FormValues, FormError> {
        let source = source
            .or_else(|| self.selection.value().map(str::to_string))
            .ok_or(FormError::NoSource)?;
        let branch = branch
            .or_else(|| self.default_branch().map(str::to_string))
            .ok_or(FormError::NoBranch)?;

        Ok(FormValues {
            source,
            branch,
            message: message.into(),
        })
    }

    pub async fn submit(&mut self, values: FormValues) -> Result<serde_json::Value, ApiError> {
        let _submitting = BusyFlag::raise(&mut self.is_submitting);
        self.host.show_toast(Toast::animated("Creating session..."));

        let request = CreateSessionRequest::new(values.source, values.branch, values.message);
        match self.api.create_session(&request).await {
            Ok(created) => {
                tracing::info!(session = %created, "Session created");
                self.host.show_toast(Toast::success(
                    "Session created successfully",
                    "Check logs for details",
                ));
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(error = %e, "{}", FAILED_TO_CREATE_SESSION);
                self.host
                    .show_toast(Toast::failure(FAILED_TO_CREATE_SESSION, e.to_string()));
                Err(e)
            }
        }
    }
}
