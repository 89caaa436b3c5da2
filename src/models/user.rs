use serde::{Deserialize, Serialize};

/// Identity resolved from the user directory
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserInfo {
    pub eua_user_id: String,
    pub common_name: String,
    pub email: String,
}

impl UserInfo {
    pub fn new(
        eua_user_id: impl Into<String>,
        common_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            eua_user_id: eua_user_id.into(),
            common_name: common_name.into(),
            email: email.into(),
        }
    }

    /// True when email, display name and directory ID are all present
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.common_name.is_empty() && !self.eua_user_id.is_empty()
    }
}
