use serde::{Deserialize, Serialize};

/// Scheduling-backend account resolved from a platform sender id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub platform_id: String,
}
