//! Emitter error types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitterError {
    #[error("event cannot be absent")]
    InvalidEvent,

    #[error("error listener failed: {0}")]
    ErrorListenerFailed(Failure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The listener returned an error.
    Error,
    /// The listener panicked.
    Panic,
}

/// Captured information about a listener that failed during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Event the failing listener was registered for, in the JSON form of
    /// [`crate::EventKey::to_value`]; `null` is the error channel.
    pub event: Value,
    pub kind: FailureKind,
    pub message: String,
    /// Messages of the underlying causes, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<String>,
}

impl Failure {
    pub(crate) fn from_error(event: Value, error: &anyhow::Error) -> Self {
        Self {
            event,
            kind: FailureKind::Error,
            message: error.to_string(),
            chain: error.chain().skip(1).map(|cause| cause.to_string()).collect(),
        }
    }

    pub(crate) fn from_panic(event: Value, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "listener panicked".to_string()
        };

        Self {
            event,
            kind: FailureKind::Panic,
            message,
            chain: Vec::new(),
        }
    }

    pub fn is_panic(&self) -> bool {
        self.kind == FailureKind::Panic
    }

    /// Whether the failing listener was handling the error channel.
    pub fn from_error_channel(&self) -> bool {
        self.event.is_null()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            FailureKind::Error => "failed",
            FailureKind::Panic => "panicked",
        };
        match &self.event {
            Value::Null => write!(f, "listener for '<error>' {}: {}", verb, self.message)?,
            Value::String(name) => write!(f, "listener for '{}' {}: {}", name, verb, self.message)?,
            other => write!(f, "listener for '{}' {}: {}", other, verb, self.message)?,
        }
        for cause in &self.chain {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for Failure {}
