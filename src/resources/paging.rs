//! Offset paging over the track listing endpoints.
//!
//! The server does not always report a trustworthy `total`/`limit` pair, so
//! termination is decided in three tiers, checked in order after every page:
//!
//! 1. a caller-supplied limit has been met (the last page may overshoot),
//! 2. the server-reported window reaches `total`,
//! 3. without usable metadata, the page came back short.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    client::Lexicon,
    error::Result,
    transport::{Request, Transport},
    validation::CallOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    Continue,
    Done,
}

/// Bookkeeping for one paged fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub next_offset: usize,
    /// `None` when unbounded.
    pub remaining: Option<usize>,
}

impl PageCursor {
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self {
            next_offset: offset,
            remaining: limit,
        }
    }

    /// A zero limit needs no request at all.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    pub fn page_limit(&self, page_size: usize) -> usize {
        let page_size = page_size.max(1);
        match self.remaining {
            Some(remaining) => remaining.min(page_size),
            None => page_size,
        }
    }

    /// Records a page of `received` items fetched with `requested` as limit,
    /// plus whatever `total`/`limit` the server reported.
    pub fn record(
        &mut self,
        received: usize,
        requested: usize,
        total: Option<i64>,
        server_limit: Option<i64>,
    ) -> PageStep {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(received);
            if *remaining == 0 {
                return PageStep::Done;
            }
        }

        // A non-positive page size cannot advance the offset.
        if let (Some(total), Some(limit)) = (total, server_limit.filter(|l| *l > 0)) {
            if self.next_offset as i64 + limit >= total {
                return PageStep::Done;
            }
            self.next_offset += limit as usize;
            return PageStep::Continue;
        }

        if received < requested {
            return PageStep::Done;
        }
        self.next_offset += requested;
        PageStep::Continue
    }
}

/// Fetches pages from `path` until the cursor says stop.
///
/// `base` is the listing payload without `limit`/`offset`. Any failed or
/// malformed page fails the whole fetch; pages already collected are dropped.
pub(crate) async fn fetch_pages<T: Transport>(
    client: &Lexicon<T>,
    path: &str,
    base: &Map<String, Value>,
    limit: Option<usize>,
    offset: usize,
    opts: CallOptions,
) -> Result<Option<Vec<Value>>> {
    let mut cursor = PageCursor::new(offset, limit);
    let mut collected = Vec::new();
    if cursor.is_exhausted() {
        return Ok(Some(collected));
    }

    loop {
        let page_limit = cursor.page_limit(client.settings().page_size);
        let mut payload = base.clone();
        payload.insert("limit".into(), Value::from(page_limit));
        payload.insert("offset".into(), Value::from(cursor.next_offset));
        debug!(path, offset = cursor.next_offset, limit = page_limit, "Fetching page");

        let request = Request::get(path)
            .json(Value::Object(payload))
            .timeout(opts.timeout);
        let Some(response) = client.request(request).await? else {
            return Ok(None);
        };
        let Some(data) = response.get("data").filter(|d| d.is_object()) else {
            warn!("Tracks response missing expected data; response was {response}");
            return Ok(None);
        };
        let Some(Value::Array(tracks)) = data.get("tracks") else {
            warn!("Tracks response missing expected list; response was {response}");
            return Ok(None);
        };

        let received = tracks.len();
        collected.extend(tracks.iter().cloned());

        let total = data.get("total").and_then(Value::as_i64);
        let server_limit = data.get("limit").and_then(Value::as_i64);
        if cursor.record(received, page_limit, total, server_limit) == PageStep::Done {
            break;
        }
    }
    Ok(Some(collected))
}
