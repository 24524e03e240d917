// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Inbound body of `POST /api/chat`. Fields stay loosely typed so that a
/// wrong type is reported as a 400 with a useful message instead of a
/// generic deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default, rename = "systemPrompt")]
    pub system_prompt: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn reply(response: impl Into<String>, reasoning: Option<String>) -> Self {
        Self {
            response: response.into(),
            reasoning,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            response: String::new(),
            reasoning: None,
            error: Some(error.into()),
        }
    }
}

/// A request that passed validation and is ready to forward.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub message: String,
}

impl ChatRequest {
    pub fn validate(self, max_chars: usize, default_system: &str) -> Result<Prompt, AppError> {
        let message = match self.message {
            Some(Value::String(s)) => s,
            _ => return Err(AppError::BadRequest("Message is required".to_string())),
        };

        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(AppError::BadRequest("Message is required".to_string()));
        }

        // Length is judged on what the user sent, surrounding whitespace included.
        if message.chars().count() > max_chars {
            return Err(AppError::BadRequest(format!(
                "Message is too long (maximum {max_chars} characters)"
            )));
        }

        let system = match self.system_prompt {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => default_system.to_string(),
        };

        Ok(Prompt {
            system,
            message: trimmed.to_string(),
        })
    }
}
