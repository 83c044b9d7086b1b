//! Offset (`page`/`per_page`) and checkpoint (`from`/`take`) pagination.
//!
//! Collection endpoints use one style or the other. [`fetch_all`] drives
//! either until the API reports no further pages and returns the items in
//! response order.

use crate::error::{ManagementError, ManagementResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use tracing::warn;

/// Largest page size the Management API accepts.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Upper bound on items collected by [`fetch_all`] for a single collection.
pub const MAX_COLLECTION_ITEMS: usize = 50_000;

/// Position in a paginated collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    Offset { page: u32, per_page: u32 },
    Checkpoint { from: Option<String>, take: u32 },
}

impl PageRequest {
    #[must_use]
    pub fn first_offset() -> Self {
        Self::Offset {
            page: 0,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn first_checkpoint() -> Self {
        Self::Checkpoint {
            from: None,
            take: DEFAULT_PAGE_SIZE,
        }
    }

    /// Query parameters for this page.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Offset { page, per_page } => vec![
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
                ("include_totals", "true".to_string()),
            ],
            Self::Checkpoint { from, take } => {
                let mut pairs = vec![("take", take.to_string())];
                if let Some(from) = from {
                    pairs.push(("from", from.clone()));
                }
                pairs
            }
        }
    }
}

/// One page of a collection plus where to continue, if anywhere.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageRequest>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Decode a list response body.
///
/// Offset endpoints answer `{ "start", "limit", "total", "<key>": [...] }`
/// (or a bare array when totals are not included); checkpoint endpoints
/// answer `{ "<key>": [...], "next": "<token>" }`.
///
/// Offset paging continues while `start + items < total`, addressing the
/// next page with the `limit` the tenant applied. Without totals a short
/// page ends the collection. Checkpoint paging ends on an empty page or a
/// token equal to the one just sent.
pub fn decode_page<T: DeserializeOwned>(
    body: Value,
    key: &str,
    request: &PageRequest,
) -> ManagementResult<Page<T>> {
    let (raw_items, totals, next_token) = match body {
        Value::Array(items) => (Value::Array(items), Totals::default(), None),
        Value::Object(mut map) => {
            let items = map.remove(key).unwrap_or(Value::Array(Vec::new()));
            let totals = Totals {
                start: map.get("start").and_then(Value::as_u64),
                limit: map.get("limit").and_then(Value::as_u64),
                total: map.get("total").and_then(Value::as_u64),
            };
            let next = map
                .get("next")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            (items, totals, next)
        }
        other => {
            return Err(ManagementError::ParseError(format!(
                "expected list response for '{key}', got {other}"
            )))
        }
    };

    let items: Vec<T> = serde_json::from_value(raw_items)
        .map_err(|e| ManagementError::ParseError(format!("invalid '{key}' list: {e}")))?;

    let next = match request {
        PageRequest::Offset { page, per_page } => {
            let requested = u64::from(*per_page);
            let start = totals.start.unwrap_or(u64::from(*page) * requested);
            let limit = totals.limit.filter(|l| *l > 0).unwrap_or(requested);
            let next_start = start + items.len() as u64;
            let more = !items.is_empty()
                && match totals.total {
                    Some(total) => next_start < total,
                    None => items.len() as u64 >= requested,
                };
            if more {
                offset_at(next_start, limit)
            } else {
                None
            }
        }
        PageRequest::Checkpoint { from, take } => next_token
            .filter(|token| !items.is_empty() && from.as_deref() != Some(token.as_str()))
            .map(|from| PageRequest::Checkpoint {
                from: Some(from),
                take: *take,
            }),
    };

    Ok(Page { items, next })
}

/// Paging fields reported by an offset response.
#[derive(Debug, Default)]
struct Totals {
    start: Option<u64>,
    limit: Option<u64>,
    total: Option<u64>,
}

/// The offset page beginning at item `start`, using `limit` items per page
/// when `start` falls on a page boundary and the largest size that does
/// otherwise.
fn offset_at(start: u64, limit: u64) -> Option<PageRequest> {
    let per_page = if start % limit == 0 {
        limit
    } else {
        gcd(start, limit)
    };
    Some(PageRequest::Offset {
        page: u32::try_from(start / per_page).ok()?,
        per_page: u32::try_from(per_page).ok()?,
    })
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Follow pages from `first` until none remain.
///
/// Errors from `fetch` are returned unchanged; the caller decides what a
/// 404 on the parent means. A collection larger than
/// [`MAX_COLLECTION_ITEMS`] fails with
/// [`ManagementError::CollectionTooLarge`] rather than being truncated.
pub async fn fetch_all<T, F, Fut>(first: PageRequest, fetch: F) -> ManagementResult<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = ManagementResult<Page<T>>>,
{
    collect_pages(first, MAX_COLLECTION_ITEMS, fetch).await
}

async fn collect_pages<T, F, Fut>(
    first: PageRequest,
    max_items: usize,
    mut fetch: F,
) -> ManagementResult<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = ManagementResult<Page<T>>>,
{
    let mut all = Vec::new();
    let mut request = first;

    loop {
        let page = fetch(request.clone()).await?;
        all.extend(page.items);

        if all.len() > max_items {
            warn!(
                fetched = all.len(),
                limit = max_items,
                "Collection exceeds item limit, aborting pagination"
            );
            return Err(ManagementError::CollectionTooLarge { limit: max_items });
        }

        match page.next {
            Some(next) if next == request => {
                warn!(request = ?next, "Pagination did not advance");
                return Err(ManagementError::ParseError(format!(
                    "pagination did not advance past {next:?}"
                )));
            }
            Some(next) => request = next,
            None => break,
        }
    }

    Ok(all)
}
