//! Error types for revoir operations.
//!
//! Provides a structured error hierarchy with stable error codes so API
//! layers can map failures to transport-level responses without string
//! matching.

use thiserror::Error;

/// Result type alias for revoir operations.
pub type RevoirResult<T> = Result<T, RevoirError>;

/// Main error type for all revoir operations.
#[derive(Error, Debug)]
pub enum RevoirError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Deck or card not found.
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        entity_id: Option<String>,
    },

    /// Concurrent review update lost the version check.
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        code: ErrorCode,
        card_id: Option<String>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValInvalidQuality,
    ValMissingField,

    // Entities (CARD_xxx / DECK_xxx)
    CardNotFound,
    DeckNotFound,

    // Review (REV_xxx)
    ReviewConflict,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValInvalidQuality => "VAL_002",
            ErrorCode::ValMissingField => "VAL_003",
            ErrorCode::CardNotFound => "CARD_001",
            ErrorCode::DeckNotFound => "DECK_001",
            ErrorCode::ReviewConflict => "REV_001",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl RevoirError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error for an out-of-range quality rating.
    pub fn invalid_quality(rating: u8) -> Self {
        Self::Validation {
            message: format!("Quality rating must be between 1 and 5, got {}", rating),
            code: ErrorCode::ValInvalidQuality,
            suggestion: Some("Use 1 (again), 3 (hard), 4 (good) or 5 (easy)".to_string()),
        }
    }

    /// Create a validation error for a missing or empty field.
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::Validation {
            message: format!("Field '{}' must not be empty", field),
            code: ErrorCode::ValMissingField,
            suggestion: None,
        }
    }

    /// Create a not-found error for a card.
    pub fn card_not_found(card_id: impl Into<String>) -> Self {
        let id = card_id.into();
        Self::NotFound {
            message: format!("Card with id '{}' not found", id),
            code: ErrorCode::CardNotFound,
            entity_id: Some(id),
        }
    }

    /// Create a not-found error for a deck.
    pub fn deck_not_found(deck_id: impl Into<String>) -> Self {
        let id = deck_id.into();
        Self::NotFound {
            message: format!("Deck with id '{}' not found", id),
            code: ErrorCode::DeckNotFound,
            entity_id: Some(id),
        }
    }

    /// Create a conflict error for a review that lost its version check.
    pub fn review_conflict(card_id: impl Into<String>) -> Self {
        let id = card_id.into();
        Self::Conflict {
            message: format!("Concurrent review detected for card '{}'", id),
            code: ErrorCode::ReviewConflict,
            card_id: Some(id),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Conflict { code, .. } => *code,
            Self::Database { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::NotFound { .. } => Some("Please check the id and ensure it exists"),
            Self::Conflict { .. } => Some("Please retry the review"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RevoirError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}
