use serde::{Deserialize, Serialize};

/// Identified requester and their group membership
///
/// Inserted into request extensions by the client identification
/// middleware. Absent for anonymous requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// Client identifier (e.g. user ID)
    pub client_id: String,
    /// Group the client belongs to (e.g. "member", "admin")
    pub group: Option<String>,
}

impl ClientIdentity {
    /// Identity without group membership
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            group: None,
        }
    }
}
