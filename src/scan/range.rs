use super::cursor::RESET_TOKEN;
use super::item::ListElement;
use super::source::{Page, PageRequest, PageSource};
use anyhow::{Context, Result};
use std::future::Future;
use tracing::debug;

/// Offset-addressed reads, as lists are served (`LRANGE key start stop`,
/// `stop` inclusive).
pub trait RangeSource: Send + Sync {
    fn fetch_range(
        &self,
        key: &str,
        db: u32,
        start: usize,
        stop: usize,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Exposes a [`RangeSource`] through the cursor contract so lists page
/// through the same [`ScanSession`](super::ScanSession) as the other kinds.
///
/// The cursor token is the decimal offset of the next element. A page that
/// comes back shorter than requested ends the scan.
pub struct RangePager<R> {
    ranges: R,
}

impl<R: RangeSource> RangePager<R> {
    pub fn new(ranges: R) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &R {
        &self.ranges
    }

    pub fn into_inner(self) -> R {
        self.ranges
    }
}

impl<R: RangeSource> PageSource<ListElement> for RangePager<R> {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<ListElement>> {
        if request.filter.is_some() {
            debug!(key = %request.key, "range reads do not filter; ignoring filter");
        }
        let page_size = request.page_size.max(1);
        let start = parse_offset(&request.cursor)?;
        let stop = start + page_size - 1;

        let values = self
            .ranges
            .fetch_range(&request.key, request.db, start, stop)
            .await?;

        let cursor = if values.len() < page_size {
            RESET_TOKEN.to_string()
        } else {
            (start + values.len()).to_string()
        };
        Ok(Page::new(
            cursor,
            values.into_iter().map(ListElement::new).collect(),
        ))
    }
}

/// Read an offset cursor token; the reset token is offset zero.
pub(crate) fn parse_offset(token: &str) -> Result<usize> {
    token
        .parse::<usize>()
        .with_context(|| format!("Invalid offset cursor: {token:?}"))
}
