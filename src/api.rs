use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorMessage {
    pub message: String,
}

/// `{"error": {"message": "..."}}`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: ErrorMessage,
}

impl ErrorBody {
    pub fn new(msg: &str) -> Self {
        ErrorBody {
            error: ErrorMessage {
                message: msg.to_owned(),
            },
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct APIResponse {
    pub status: String,
}

impl APIResponse {
    pub fn new(msg: &str) -> Self {
        APIResponse {
            status: msg.to_owned(),
        }
    }
}
