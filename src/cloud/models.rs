use serde::{Deserialize, Serialize};

/// Uniform answer of every cloud call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Serialized remote document, present when the remote copy is newer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default)]
    pub should_update_local: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_last_modified: Option<String>,
}

impl SyncResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Remote copy is newer; the caller must take it
    pub fn update_local(data: String, remote_last_modified: Option<String>) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
            should_update_local: true,
            remote_last_modified,
        }
    }
}

/// Cloud account status (detailed)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Available,
    NoAccount,
    Restricted,
    CouldNotDetermine,
    TemporarilyUnavailable,
    Error,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Available => "available",
            AccountStatus::NoAccount => "no_account",
            AccountStatus::Restricted => "restricted",
            AccountStatus::CouldNotDetermine => "could_not_determine",
            AccountStatus::TemporarilyUnavailable => "temporarily_unavailable",
            AccountStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountStatusResult {
    pub available: bool,
    pub status: AccountStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AccountStatusResult {
    pub fn available() -> Self {
        Self {
            available: true,
            status: AccountStatus::Available,
            error: None,
        }
    }

    pub fn unavailable(status: AccountStatus, error: impl Into<String>) -> Self {
        Self {
            available: false,
            status,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_result_wire_shape() {
        let json = r#"{"success": true, "shouldUpdateLocal": true, "data": "{}", "remoteLastModified": "2026-01-02T03:04:05.000Z"}"#;
        let result: SyncResult = serde_json::from_str(json).unwrap();
        assert!(result.should_update_local);
        assert_eq!(result.data.as_deref(), Some("{}"));

        let minimal: SyncResult = serde_json::from_str(r#"{"success": false, "error": "offline"}"#).unwrap();
        assert!(!minimal.should_update_local);
        assert_eq!(minimal.error.as_deref(), Some("offline"));
    }

    #[test]
    fn test_account_status_strings() {
        assert_eq!(AccountStatus::NoAccount.as_str(), "no_account");
        assert_eq!(
            serde_json::to_string(&AccountStatus::TemporarilyUnavailable).unwrap(),
            "\"temporarily_unavailable\""
        );
    }
}
