//! Small JSON bodies shared by the HTTP handlers and the client.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub const HEALTH_MESSAGE: &str = "Student Information Management API is running";
pub const DELETED_MESSAGE: &str = "Student deleted successfully";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl Default for DeleteConfirmation {
    fn default() -> Self {
        Self {
            message: DELETED_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub timestamp: Timestamp,
}

impl HealthStatus {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            message: HEALTH_MESSAGE.to_string(),
            timestamp: Timestamp::now(),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}
