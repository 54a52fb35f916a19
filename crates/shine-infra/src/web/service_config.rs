use serde::{Deserialize, Serialize};

/// The http service configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub port: u16,
    /// Indicates if the full problem response should be returned. In production, it should be `false`.
    #[serde(default)]
    pub full_problem_response: bool,
}
