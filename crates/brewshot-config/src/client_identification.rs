use serde::Deserialize;

/// How requester identity is read from incoming requests
///
/// Authentication itself happens upstream (a session-aware proxy or the
/// front-end application); Brewshot only trusts the forwarded headers.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientIdentificationConfig {
    /// Header carrying the authenticated user ID
    #[serde(default = "default_client_id_header")]
    pub client_id_header: String,
    /// Header carrying the user's group
    #[serde(default)]
    pub group_header: Option<String>,
    /// Accepted group values (empty accepts any)
    #[serde(default)]
    pub allowed_groups: Vec<String>,
}

impl Default for ClientIdentificationConfig {
    fn default() -> Self {
        Self {
            client_id_header: default_client_id_header(),
            group_header: None,
            allowed_groups: Vec::new(),
        }
    }
}

fn default_client_id_header() -> String {
    "x-brewshot-user".to_string()
}
