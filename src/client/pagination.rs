//! Cursor pagination for list endpoints
//!
//! Cursor-paginated scanner endpoints return the full envelope on every page:
//! a list of items plus `pagination.cursors = [current, next, ...]`. The
//! walker follows `next` until the backend declares the end, either by
//! sending fewer than two cursors or by sending an empty `next`.

use std::collections::HashSet;

use log::{debug, error, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::models::PageSet;
use super::transport::{DecodePolicy, OutboundRequest, Transport, send_cancellable};
use crate::error::{ApiError, Result};

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 99;

/// Pages are decoded tolerantly: one bad page ends the walk without failing it.
const PAGE_DECODE: DecodePolicy = DecodePolicy::Tolerant;

/// One page of a cursor-paginated listing.
///
/// The item array is named after the resource (`reports`, `scans`).
#[derive(Debug, Deserialize)]
pub struct CursorEnvelope<T> {
    #[serde(default = "Vec::new", alias = "reports", alias = "scans")]
    pub items: Vec<T>,

    #[serde(default)]
    pub pagination: Option<CursorPagination>,
}

/// Pagination block of a cursor envelope
#[derive(Debug, Default, Deserialize)]
pub struct CursorPagination {
    #[serde(default)]
    pub cursors: Vec<Option<String>>,
}

/// What the walker should do after a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch the page behind this cursor
    Follow(String),
    /// Fewer than two cursors: the backend declared no further pages
    NoCursor,
    /// The next cursor is explicitly empty
    EndOfStream,
}

impl CursorPagination {
    /// Decide whether another page exists.
    pub fn next_page(&self) -> NextPage {
        if self.cursors.len() < 2 {
            return NextPage::NoCursor;
        }

        match self.cursors[1].as_deref() {
            None | Some("") => NextPage::EndOfStream,
            Some(cursor) => NextPage::Follow(cursor.to_string()),
        }
    }
}

/// Sequential cursor walker over a single list endpoint.
///
/// `build` produces the request for a page given the cursor to resume from
/// (`None` for the first page). Transport failures and cancellation abort
/// the walk and discard everything collected so far.
pub struct CursorWalker<'a> {
    transport: &'a dyn Transport,
    resource: &'a str,
}

impl<'a> CursorWalker<'a> {
    pub fn new(transport: &'a dyn Transport, resource: &'a str) -> Self {
        Self {
            transport,
            resource,
        }
    }

    pub async fn walk<T, F>(&self, build: F, cancel: &CancellationToken) -> Result<PageSet<T>>
    where
        T: DeserializeOwned,
        F: Fn(Option<&str>) -> OutboundRequest,
    {
        let mut set = PageSet::default();
        let mut cursor: Option<String> = None;
        let mut followed: HashSet<String> = HashSet::new();

        loop {
            if cancel.is_cancelled() {
                return Err(ApiError::Cancelled.into());
            }

            let request = build(cursor.as_deref());
            let response = send_cancellable(self.transport, request, cancel).await?;
            set.pages += 1;

            if !response.is_success() {
                error!("{}", response.body);
                error!(
                    "Listing {} page {} returned status {}",
                    self.resource, set.pages, response.status
                );
                set.flag(format!(
                    "{} page {} returned status {}",
                    self.resource, set.pages, response.status
                ));
            }

            let Some(envelope) = response.decode::<CursorEnvelope<T>>(PAGE_DECODE)? else {
                set.flag(format!(
                    "{} page {} could not be decoded; listing may be incomplete",
                    self.resource, set.pages
                ));
                break;
            };

            set.items.extend(envelope.items);

            match envelope.pagination.unwrap_or_default().next_page() {
                NextPage::NoCursor => {
                    debug!("No pagination cursors found or no more {} pages.", self.resource);
                    break;
                }
                NextPage::EndOfStream => {
                    debug!("No more {} to fetch (empty cursor).", self.resource);
                    break;
                }
                NextPage::Follow(next) => {
                    if !followed.insert(next.clone()) {
                        warn!("Cursor {} was already followed, stopping", next);
                        set.flag(format!(
                            "{} pagination repeated cursor {}",
                            self.resource, next
                        ));
                        break;
                    }
                    debug!("Next cursor for {}: {}", self.resource, next);
                    cursor = Some(next);
                }
            }
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::ScriptedTransport;
    use crate::client::transport::RawResponse;
    use crate::error::Error;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    fn cursors(list: &[Option<&str>]) -> CursorPagination {
        CursorPagination {
            cursors: list.iter().map(|c| c.map(str::to_string)).collect(),
        }
    }

    fn page(ids: &[&str], cursors: &str) -> RawResponse {
        let items: Vec<String> = ids.iter().map(|id| format!(r#"{{"id": "{}"}}"#, id)).collect();
        RawResponse::new(
            200,
            format!(
                r#"{{"reports": [{}], "pagination": {{"cursors": {}}}}}"#,
                items.join(","),
                cursors
            ),
        )
    }

    fn build(cursor: Option<&str>) -> OutboundRequest {
        let request = OutboundRequest::get("http://scanner/api/v1/reports").query("l", "2");
        match cursor {
            Some(c) => request.query("c", c),
            None => request,
        }
    }

    #[test]
    fn test_next_page_decisions() {
        assert_eq!(cursors(&[]).next_page(), NextPage::NoCursor);
        assert_eq!(cursors(&[Some("a")]).next_page(), NextPage::NoCursor);
        assert_eq!(cursors(&[Some(""), Some("")]).next_page(), NextPage::EndOfStream);
        assert_eq!(cursors(&[Some("a"), None]).next_page(), NextPage::EndOfStream);
        assert_eq!(
            cursors(&[Some(""), Some("2"), Some("4")]).next_page(),
            NextPage::Follow("2".to_string())
        );
    }

    #[test]
    fn test_envelope_accepts_resource_names() {
        let reports: CursorEnvelope<Item> =
            serde_json::from_str(r#"{"reports": [{"id": "r"}]}"#).unwrap();
        assert_eq!(reports.items.len(), 1);
        assert!(reports.pagination.is_none());

        let scans: CursorEnvelope<Item> = serde_json::from_str(
            r#"{"scans": [{"id": "s"}], "pagination": {"cursors": ["", "99"]}}"#,
        )
        .unwrap();
        assert_eq!(scans.items[0].id, "s");
        assert_eq!(
            scans.pagination.unwrap().next_page(),
            NextPage::Follow("99".to_string())
        );
    }

    #[tokio::test]
    async fn test_stops_when_cursor_list_too_short() {
        let transport = ScriptedTransport::new(vec![
            page(&["1", "2"], r#"["", "c2"]"#),
            page(&["3", "4"], r#"["c2", "c3"]"#),
            page(&["5"], r#"["c3"]"#),
            page(&["never"], r#"[]"#),
        ]);

        let set: PageSet<Item> = CursorWalker::new(&transport, "reports")
            .walk(build, &CancellationToken::new())
            .await
            .unwrap();

        let ids: Vec<&str> = set.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(set.pages, 3);
        assert!(set.complete);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].query_value("c"), None);
        assert_eq!(requests[1].query_value("c"), Some("c2"));
        assert_eq!(requests[2].query_value("c"), Some("c3"));
    }

    #[tokio::test]
    async fn test_stops_on_explicit_empty_cursor() {
        let transport = ScriptedTransport::new(vec![
            page(&["1"], r#"["", "c2"]"#),
            page(&["2"], r#"["c2", ""]"#),
            page(&["never"], r#"[]"#),
        ]);

        let set: PageSet<Item> = CursorWalker::new(&transport, "reports")
            .walk(build, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(set.items.len(), 2);
        assert_eq!(transport.requests().len(), 2);
        assert!(set.complete);
    }

    #[tokio::test]
    async fn test_repeated_cursor_terminates() {
        let transport = ScriptedTransport::new(vec![
            page(&["1"], r#"["", "same"]"#),
            page(&["2"], r#"["same", "same"]"#),
            page(&["never"], r#"["same", "same"]"#),
        ]);

        let set: PageSet<Item> = CursorWalker::new(&transport, "reports")
            .walk(build, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(transport.requests().len(), 2);
        assert_eq!(set.items.len(), 2);
        assert!(!set.complete);
        assert!(set.warnings[0].contains("repeated cursor"));
    }

    #[tokio::test]
    async fn test_iterations_bounded_by_supplied_pages() {
        let transport = ScriptedTransport::new(vec![
            page(&["1"], r#"["", "a"]"#),
            page(&["2"], r#"["a", "b"]"#),
            page(&["3"], r#"["b", "c"]"#),
        ]);

        // The fourth request finds the script exhausted and fails at the transport.
        let result: Result<PageSet<Item>> = CursorWalker::new(&transport, "reports")
            .walk(build, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(Error::Api(ApiError::Transport(_)))));
        assert_eq!(transport.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_non_success_page_is_tolerated_and_flagged() {
        let transport = ScriptedTransport::new(vec![
            page(&["1"], r#"["", "c2"]"#),
            RawResponse::new(
                500,
                r#"{"reports": [{"id": "2"}], "pagination": {"cursors": ["c2"]}}"#,
            ),
        ]);

        let set: PageSet<Item> = CursorWalker::new(&transport, "reports")
            .walk(build, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(set.items.len(), 2);
        assert!(!set.complete);
        assert!(set.warnings[0].contains("500"));
    }

    #[tokio::test]
    async fn test_undecodable_page_ends_walk_with_partial_result() {
        let transport = ScriptedTransport::new(vec![
            page(&["1"], r#"["", "c2"]"#),
            RawResponse::new(502, "<html>Bad Gateway</html>"),
            page(&["never"], r#"[]"#),
        ]);

        let set: PageSet<Item> = CursorWalker::new(&transport, "reports")
            .walk(build, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(set.items, vec![Item { id: "1".to_string() }]);
        assert_eq!(transport.requests().len(), 2);
        assert!(!set.complete);
        assert_eq!(set.warnings.len(), 2);
    }

    #[tokio::test]
    async fn test_transport_error_aborts_walk() {
        let transport = ScriptedTransport::new(vec![page(&["1"], r#"["", "c2"]"#)])
            .fail_at(1, "connection reset");

        let result: Result<PageSet<Item>> = CursorWalker::new(&transport, "reports")
            .walk(build, &CancellationToken::new())
            .await;

        match result {
            Err(Error::Api(ApiError::Transport(msg))) => assert!(msg.contains("connection reset")),
            other => panic!("Expected transport error, got {:?}", other.map(|s| s.items)),
        }
    }

    #[tokio::test]
    async fn test_cancellation_discards_partial_results() {
        let cancel = CancellationToken::new();
        let transport = ScriptedTransport::new(vec![
            page(&["1"], r#"["", "c2"]"#),
            page(&["2"], r#"["c2"]"#),
        ])
        .cancel_after(1, cancel.clone());

        let result: Result<PageSet<Item>> = CursorWalker::new(&transport, "reports")
            .walk(build, &cancel)
            .await;

        assert!(matches!(result, Err(Error::Api(ApiError::Cancelled))));
        assert_eq!(transport.requests().len(), 1);
    }
}
