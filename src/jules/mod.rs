pub mod api_client;
pub mod types;

pub use api_client::{ApiError, JulesApi, JulesApiClient, API_BASE_URL, API_KEY_HEADER};
pub use types::*;
