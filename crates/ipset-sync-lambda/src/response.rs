//! Invocation response

use ipset_sync_core::SyncOutcome;
use serde::Serialize;

/// Response returned to the Lambda caller
///
/// `body` holds a JSON-encoded string, so the confirmation arrives quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl SyncResponse {
    pub fn from_outcome(outcome: &SyncOutcome) -> serde_json::Result<Self> {
        Ok(Self {
            status_code: 200,
            body: serde_json::to_string(&outcome.message())?,
        })
    }
}
