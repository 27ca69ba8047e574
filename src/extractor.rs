//! Board traversal: one root query, then per-group cursor-following until
//! every page is exhausted.
//!
//! Pagination is an explicit loop over the cursor rather than recursion, so
//! stack depth stays flat no matter how many pages a group spans. There is
//! no page-count guard: an endpoint that always returns a cursor keeps the
//! traversal running.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::client::GraphqlExecutor;
use crate::columns::flatten_item;
use crate::types::{
    operations, Board, ErrorContext, ExtractError, FlatRecord, Group, Item, ItemsPage,
};

/// Root query: every group of the board, each with its first page of items
/// and that page's cursor.
const BOARD_QUERY: &str = "\
query ($ids: [ID!]) {
  boards(ids: $ids) {
    name
    groups {
      title
      items_page {
        cursor
        items {
          id
          name
          column_values {
            column { title }
            type
            value
          }
        }
      }
    }
  }
}";

/// Continuation query: one more page of items for a cursor. Carries no group
/// context; the caller remembers which group the cursor came from.
const NEXT_ITEMS_QUERY: &str = "\
query ($cursor: String!) {
  next_items_page(cursor: $cursor) {
    cursor
    items {
      id
      name
      column_values {
        column { title }
        type
        value
      }
    }
  }
}";

#[derive(Debug, serde::Deserialize)]
struct BoardsEnvelope {
    data: BoardsData,
}

#[derive(Debug, serde::Deserialize)]
struct BoardsData {
    boards: Vec<Board>,
}

#[derive(Debug, serde::Deserialize)]
struct NextItemsEnvelope {
    data: NextItemsData,
}

#[derive(Debug, serde::Deserialize)]
struct NextItemsData {
    next_items_page: ItemsPage,
}

/// Walks a board and accumulates every item as a [`FlatRecord`].
///
/// Generic over the executor so traversal logic runs against anything that
/// can answer GraphQL queries, scripted test doubles included.
pub struct BoardExtractor<E> {
    executor: E,
}

impl<E: GraphqlExecutor> BoardExtractor<E> {
    /// Creates an extractor on top of the given executor.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Extracts every item of `board_id` across all groups and pages.
    ///
    /// Groups are visited in source order; within a group, pages are fetched
    /// one at a time and items keep their page order. The collection is only
    /// returned on full success; any failure discards accumulated progress.
    ///
    /// # Errors
    ///
    /// Everything from [`GraphqlExecutor::execute`], plus
    /// [`ExtractError::Shape`] when the response is missing expected fields
    /// or no board matches `board_id`, and [`ExtractError::Decode`] when a
    /// column payload is not valid JSON.
    #[instrument(skip(self))]
    pub async fn extract(&self, board_id: &str) -> Result<Vec<FlatRecord>, ExtractError> {
        debug!("Requesting board root page");
        let response = self
            .executor
            .execute(BOARD_QUERY, json!({ "ids": [board_id] }))
            .await?;
        let envelope: BoardsEnvelope =
            parse_envelope(response, board_id, operations::BOARD_QUERY)?;

        let board = envelope
            .data
            .boards
            .into_iter()
            .next()
            .ok_or_else(|| ExtractError::Shape {
                message: format!("no board returned for id {board_id}"),
                context: ErrorContext::new(board_id, operations::BOARD_QUERY),
            })?;
        debug!(board = %board.name, groups = board.groups.len(), "Board root page received");

        let mut records = Vec::new();
        for group in board.groups {
            self.collect_group(group, &mut records).await?;
        }

        info!("Extracted {} records from board {}", records.len(), board_id);
        Ok(records)
    }

    /// Drains one group: the embedded first page, then continuation pages
    /// while a cursor is present.
    async fn collect_group(
        &self,
        group: Group,
        records: &mut Vec<FlatRecord>,
    ) -> Result<(), ExtractError> {
        let Group { title, items_page } = group;
        debug!(group = %title, items = items_page.items.len(), "Collecting group");

        append_page(items_page.items, &title, records)?;

        let mut cursor = next_cursor(items_page.cursor);
        while let Some(current) = cursor {
            let page = self.fetch_page(&current).await?;
            append_page(page.items, &title, records)?;
            cursor = next_cursor(page.cursor);
        }

        Ok(())
    }

    /// Fetches one continuation page for `cursor`.
    async fn fetch_page(&self, cursor: &str) -> Result<ItemsPage, ExtractError> {
        debug!("Fetching continuation page");
        let response = self
            .executor
            .execute(NEXT_ITEMS_QUERY, json!({ "cursor": cursor }))
            .await?;
        let envelope: NextItemsEnvelope =
            parse_envelope(response, cursor, operations::NEXT_ITEMS_QUERY)?;
        Ok(envelope.data.next_items_page)
    }
}

/// Normalizes the terminal cursor conditions: absent and empty both stop.
fn next_cursor(cursor: Option<String>) -> Option<String> {
    cursor.filter(|c| !c.is_empty())
}

/// Flattens a page of items into `records`, tagging each with `group`.
fn append_page(
    items: Vec<Item>,
    group: &str,
    records: &mut Vec<FlatRecord>,
) -> Result<(), ExtractError> {
    for item in items {
        records.push(flatten_item(item, group)?);
    }
    Ok(())
}

/// Deserializes a response body into the expected envelope, mapping serde
/// failures (missing `data`, missing fields) to shape errors.
fn parse_envelope<T: DeserializeOwned>(
    response: Value,
    subject: &str,
    operation: &'static str,
) -> Result<T, ExtractError> {
    serde_json::from_value(response).map_err(|e| ExtractError::Shape {
        message: e.to_string(),
        context: ErrorContext::new(subject, operation),
    })
}
