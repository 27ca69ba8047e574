//! Core types for board extraction: wire-format types, the flattened output
//! record, and the error taxonomy.
//!
//! The wire types mirror the shapes returned by the monday.com GraphQL API
//! (`boards` / `items_page` / `next_items_page`). They are deserialized from
//! the raw JSON response by the traversal engine; no schema validation is
//! performed beyond what deserialization itself requires.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A board as returned by the root query: a name and its groups.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Board {
    /// Display name of the board.
    pub name: String,
    /// Groups in source order. Extraction preserves this order.
    pub groups: Vec<Group>,
}

/// A named partition of items within a board.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    /// Group title; every record extracted from this group is tagged with it.
    pub title: String,
    /// The first page of items, embedded in the root response.
    pub items_page: ItemsPage,
}

/// One page of items plus the cursor for the next page.
///
/// A missing, `null`, or empty-string cursor means this is the last page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemsPage {
    /// Opaque pagination token. `None` (or empty) terminates pagination.
    #[serde(default)]
    pub cursor: Option<String>,
    /// Items on this page, in source order.
    pub items: Vec<Item>,
}

/// A single board entry with its typed column values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub column_values: Vec<ColumnValue>,
}

/// One typed, JSON-encoded attribute of an item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnValue {
    /// Column metadata; only the title is requested.
    pub column: ColumnMeta,
    /// Declared column type, e.g. `"status"` or `"board_relation"`.
    #[serde(rename = "type")]
    pub column_type: String,
    /// The raw value, JSON-encoded as a string even for plain scalars.
    ///
    /// The API sends `null` for columns that have never been set; decoding
    /// treats that the same as an encoded JSON `null`.
    #[serde(default)]
    pub value: Option<String>,
}

/// Column metadata attached to each column value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnMeta {
    pub title: String,
}

// ---------------------------------------------------------------------------
// Column type names
// ---------------------------------------------------------------------------

/// Declared column types that receive dedicated decoding.
///
/// Any type not listed here passes through as its parsed JSON value.
pub mod column_types {
    pub const BOARD_RELATION: &str = "board_relation";
    pub const PHONE: &str = "phone";
    pub const EMAIL: &str = "email";
    pub const CREATION_LOG: &str = "creation_log";
    pub const STATUS: &str = "status";
}

// ---------------------------------------------------------------------------
// Output record
// ---------------------------------------------------------------------------

/// The flattened output unit: item identity, group membership, and the
/// decoded column values.
///
/// The decoded fields are dynamic; which keys are present depends on which
/// columns the item carried and which of them passed the decoder's emission
/// gate. The map also holds the `type` key, which reflects the declared type
/// of the last column processed for the item. Serialization flattens the map
/// into the record, so the JSON form is a single flat object:
///
/// ```json
/// {"id": "7", "name": "Call dentist", "group": "Todo", "Phone": "12345", "type": "phone"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Item id as reported by the source.
    pub id: String,
    /// Item display name.
    pub name: String,
    /// Title of the group the item was extracted from.
    pub group: String,
    /// Decoded column values keyed by column title, plus the `type` key.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl FlatRecord {
    /// Returns the decoded value for a column title, if one was emitted.
    pub fn field(&self, title: &str) -> Option<&Value> {
        self.fields.get(title)
    }

    /// Returns the `type` key: the declared type of the last column processed
    /// while decoding this item, or `None` for an item with no columns.
    pub fn last_column_type(&self) -> Option<&str> {
        self.fields.get("type").and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Error context
// ---------------------------------------------------------------------------

/// Operation names used in [`ErrorContext`].
pub mod operations {
    pub const URL_VALIDATION: &str = "url_validation";
    pub const EXECUTE_QUERY: &str = "execute_query";
    pub const READ_RESPONSE_BODY: &str = "read_response_body";
    pub const BOARD_QUERY: &str = "board_query";
    pub const NEXT_ITEMS_QUERY: &str = "next_items_query";
}

/// Where and during what an error occurred.
///
/// `subject` is whatever the failing operation was acting on: the endpoint
/// URL for transport errors, the board id for the root query, the cursor for
/// a continuation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// What the operation was acting on.
    pub subject: String,
    /// Operation name, one of the [`operations`] constants.
    pub operation: String,
    /// Optional free-form detail, e.g. the HTTP status line.
    pub additional_info: Option<String>,
}

impl ErrorContext {
    /// Creates a context for `operation` acting on `subject`.
    pub fn new(subject: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            operation: operation.into(),
            additional_info: None,
        }
    }

    /// Attaches free-form detail to the context.
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}'", self.operation, self.subject)?;
        if let Some(info) = &self.additional_info {
            write!(f, ": {info}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error kinds
// ---------------------------------------------------------------------------

/// Transport-level failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NetworkErrorKind {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// The connection could not be established or was dropped.
    #[error("connection failed")]
    ConnectionFailed,
    /// The API answered 429.
    #[error("rate limited")]
    RateLimited,
    /// The API answered a non-success status other than 401/403/429.
    #[error("server returned HTTP {0}")]
    ServerError(u16),
    /// The response body was not valid JSON.
    #[error("response body was not valid JSON")]
    InvalidResponseBody,
}

/// Credential failure kinds (401 and 403 responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthErrorKind {
    /// The API rejected the credential (HTTP 401).
    #[error("credential missing or rejected")]
    InvalidToken,
    /// The credential is valid but lacks access (HTTP 403).
    #[error("permission denied")]
    PermissionDenied,
}

/// Input validation failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    /// The endpoint URL is malformed or uses an unsupported scheme.
    #[error("invalid endpoint URL")]
    InvalidUrl,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong during an extraction.
///
/// All variants are fatal to the run: the traversal aborts on the first
/// error and any partially accumulated records are discarded. The library
/// never retries; [`ExtractError::is_retryable`] is advisory, for callers
/// that want to re-run the whole extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Locally detected bad input, before any network traffic.
    #[error("validation error: {kind} ({context})")]
    Validation {
        kind: ValidationErrorKind,
        context: ErrorContext,
    },

    /// Network failure, non-success HTTP status, or an unparseable body.
    #[error("network error: {kind} ({context})")]
    Network {
        kind: NetworkErrorKind,
        context: ErrorContext,
    },

    /// The API rejected the credential outright.
    #[error("authentication error: {kind} ({context})")]
    Auth {
        kind: AuthErrorKind,
        context: ErrorContext,
    },

    /// The response parsed as JSON but is missing an expected field, or no
    /// board matched the requested id.
    #[error("unexpected response shape: {message} ({context})")]
    Shape {
        message: String,
        context: ErrorContext,
    },

    /// A raw column value was not valid JSON.
    #[error("failed to decode column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl ExtractError {
    /// Whether re-running the extraction might succeed.
    ///
    /// Timeouts, connection failures, rate limiting, and 5xx responses are
    /// transient; everything else indicates a problem a retry will not fix.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtractError::Network { kind, .. } => matches!(
                kind,
                NetworkErrorKind::Timeout
                    | NetworkErrorKind::ConnectionFailed
                    | NetworkErrorKind::RateLimited
                    | NetworkErrorKind::ServerError(500..=599)
            ),
            _ => false,
        }
    }
}
