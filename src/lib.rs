//! # boarddown
//!
//! Pulls every item off a monday.com-style board through the cursor-paginated
//! GraphQL API and flattens typed column values into plain records, grouped
//! by the group each item came from.
//!
//! The pipeline has three parts: a GraphQL executor
//! ([`client::GraphqlClient`]), a traversal engine that follows pagination
//! cursors per group ([`extractor::BoardExtractor`]), and a column value
//! decoder that normalizes typed payloads into key/value pairs
//! ([`columns`]). [`BoardDown`] wires them together behind one call.
//!
//! ## Quick start
//!
//! ```no_run
//! use boarddown::BoardDown;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), boarddown::ExtractError> {
//!     let board = BoardDown::new("https://api.monday.com/v2", "api-token");
//!     let records = board.extract_board("1234567890").await?;
//!
//!     for record in &records {
//!         println!("[{}] {} ({})", record.group, record.name, record.id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Or, for one-off extractions:
//!
//! ```no_run
//! # async fn run() -> Result<(), boarddown::ExtractError> {
//! let records =
//!     boarddown::extract_board("https://api.monday.com/v2", "api-token", "1234567890").await?;
//! # Ok(())
//! # }
//! ```
//!
//! The returned records serialize to flat JSON objects, one key per decoded
//! column, so `serde_json::to_string(&records)` yields the complete board as
//! a JSON array.
//!
//! Extraction is all-or-nothing: the record collection is returned only when
//! every group and every page succeeded. The library never retries;
//! [`ExtractError::is_retryable`] tells callers whether re-running might
//! help.

pub mod client;
pub mod columns;
pub mod config;
pub mod extractor;
pub mod types;

pub use client::{GraphqlClient, GraphqlExecutor};
pub use config::Config;
pub use extractor::BoardExtractor;
pub use types::{ExtractError, FlatRecord};

/// Main entry point: a configured extraction pipeline bound to one endpoint
/// and credential.
pub struct BoardDown {
    extractor: BoardExtractor<GraphqlClient>,
    config: Config,
}

impl BoardDown {
    /// Creates an instance for the given endpoint and credential with
    /// default HTTP settings.
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self::with_config(Config::new(api_url, api_token))
    }

    /// Creates an instance from a full [`Config`].
    pub fn with_config(config: Config) -> Self {
        let client = GraphqlClient::with_config(&config);
        Self {
            extractor: BoardExtractor::new(client),
            config,
        }
    }

    /// Returns the configuration this instance was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extracts every item of `board_id` into flat records.
    ///
    /// One root query, then as many continuation queries as the board's
    /// groups need. See [`BoardExtractor::extract`] for ordering and error
    /// semantics.
    pub async fn extract_board(&self, board_id: &str) -> Result<Vec<FlatRecord>, ExtractError> {
        self.extractor.extract(board_id).await
    }
}

/// Convenience function for one-off extractions with default settings.
pub async fn extract_board(
    api_url: &str,
    api_token: &str,
    board_id: &str,
) -> Result<Vec<FlatRecord>, ExtractError> {
    BoardDown::new(api_url, api_token).extract_board(board_id).await
}
