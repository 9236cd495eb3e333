use serde::Serialize;
use std::fmt;
use std::future::Future;

/// Identity of the key a session scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KeyRef {
    pub name: String,
    pub db: u32,
}

impl KeyRef {
    pub fn new(name: impl Into<String>, db: u32) -> Self {
        Self {
            name: name.into(),
            db,
        }
    }
}

impl fmt::Display for KeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.db)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub key: String,
    pub db: u32,
    pub cursor: String,
    pub page_size: usize,
    pub filter: Option<String>,
}

/// One page of a collection. `items` may hold fewer or more entries than the
/// requested page size.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<I> {
    pub cursor: String,
    pub items: Vec<I>,
}

impl<I> Page<I> {
    pub fn new(cursor: impl Into<String>, items: Vec<I>) -> Self {
        Self {
            cursor: cursor.into(),
            items,
        }
    }
}

/// The RPC boundary serving one page of a collection per call.
///
/// A returned cursor of `"0"` means the scan is complete; anything else is
/// passed back verbatim on the next request.
pub trait PageSource<I>: Send + Sync {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = anyhow::Result<Page<I>>> + Send;
}

impl<I, S: PageSource<I>> PageSource<I> for std::sync::Arc<S> {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = anyhow::Result<Page<I>>> + Send {
        (**self).fetch_page(request)
    }
}
