//! Cursor pagination with hard caps.
//!
//! Every list endpoint hands back an opaque cursor for the next page. The
//! loop here stops on the first of: no cursor, `max_pages` pages fetched,
//! `max_items` entries collected. Hitting a cap truncates and returns what
//! was collected; it is not an error.
//!
//! A 429 mid-walk gets exactly one fixed backoff and one retry of the same
//! page. A second 429 aborts the walk. An abort after at least one page
//! keeps what was collected, like a cap; only a failed first page is an
//! error.

use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLimits {
    pub max_pages: usize,
    pub max_items: usize,
    pub rate_limit_backoff: Duration,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_items: 10_000,
            rate_limit_backoff: Duration::from_millis(2_000),
        }
    }
}

/// One page of results plus the cursor for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }
}

/// Walks pages starting from `None` until the provider stops handing out
/// cursors or a cap is hit.
///
/// # Errors
///
/// Only when no page was fetched: the first non-429 error from `fetch_page`,
/// or the second 429.
pub async fn collect_pages<T, F, Fut>(
    limits: &PaginationLimits,
    context: &str,
    mut fetch_page: F,
) -> Result<Vec<T>, SourceError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, SourceError>>,
{
    let mut items: Vec<T> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;
    let mut backed_off = false;

    while pages < limits.max_pages {
        let page = match fetch_page(cursor.clone()).await {
            Ok(page) => page,
            Err(err @ SourceError::RateLimited { .. }) => {
                if backed_off {
                    return abort(context, pages, items, err);
                }
                backed_off = true;
                tracing::warn!(
                    context,
                    pages,
                    backoff_ms = u64::try_from(limits.rate_limit_backoff.as_millis()).unwrap_or(u64::MAX),
                    "rate limited during pagination, backing off once"
                );
                tokio::time::sleep(limits.rate_limit_backoff).await;
                continue;
            }
            Err(err) => return abort(context, pages, items, err),
        };
        pages += 1;

        let remaining = limits.max_items.saturating_sub(items.len());
        let page_len = page.items.len();
        items.extend(page.items.into_iter().take(remaining));
        tracing::debug!(context, page = pages, page_len, total = items.len(), "fetched page");

        if items.len() >= limits.max_items {
            tracing::debug!(context, max_items = limits.max_items, "item cap reached");
            break;
        }

        match page.next_cursor.filter(|c| !c.is_empty()) {
            Some(next) => cursor = Some(next),
            None => return Ok(items),
        }
    }

    if pages >= limits.max_pages {
        tracing::debug!(context, max_pages = limits.max_pages, "page cap reached");
    }
    Ok(items)
}

/// Ends a walk on an error: the error itself when nothing was fetched yet,
/// otherwise the partial list.
fn abort<T>(
    context: &str,
    pages: usize,
    items: Vec<T>,
    err: SourceError,
) -> Result<Vec<T>, SourceError> {
    if pages == 0 {
        return Err(err);
    }
    tracing::warn!(
        context,
        pages,
        collected = items.len(),
        kind = %err.kind(),
        error = %err,
        "pagination aborted, keeping partial list"
    );
    Ok(items)
}
