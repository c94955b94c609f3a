use serde::{Deserialize, Serialize};

const UNTITLED_SESSION: &str = "Untitled Session";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubBranch {
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubRepo {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub default_branch: Option<GitHubBranch>,
    #[serde(default)]
    pub branches: Vec<GitHubBranch>,
}

/// A repository registered with Jules. `name` is the resource name
/// (`sources/...`) that sessions point back to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub github_repo: GitHubRepo,
}

impl Source {
    /// "owner/repo", as shown in source dropdowns.
    pub fn label(&self) -> String {
        format!("{}/{}", self.github_repo.owner, self.github_repo.repo)
    }

    pub fn default_branch(&self) -> Option<&str> {
        self.github_repo
            .default_branch
            .as_ref()
            .map(|b| b.display_name.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesResponse {
    #[serde(default)]
    pub sources: Vec<Source>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSourceContext {
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub source_context: Option<SessionSourceContext>,
}

impl Session {
    /// Title, falling back to the prompt and then to a placeholder.
    pub fn display_title(&self) -> &str {
        [self.title.as_str(), self.prompt.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or(UNTITLED_SESSION)
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_context.as_ref().map(|c| c.source.as_str())
    }

    pub fn browser_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<Session>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubRepoContext {
    pub starting_branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionSourceContext {
    pub source: String,
    pub github_repo_context: GitHubRepoContext,
}

/// Body of `POST /sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub prompt: String,
    pub source_context: CreateSessionSourceContext,
}

impl CreateSessionRequest {
    pub fn new(
        source: impl Into<String>,
        starting_branch: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            source_context: CreateSessionSourceContext {
                source: source.into(),
                github_repo_context: GitHubRepoContext {
                    starting_branch: starting_branch.into(),
                },
            },
        }
    }
}
