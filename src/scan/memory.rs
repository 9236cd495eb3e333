use super::cursor::RESET_TOKEN;
use super::item::{ListElement, ScanItem};
use super::range::{RangeSource, parse_offset};
use super::source::{KeyRef, Page, PageRequest, PageSource};
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-process stand-in for a server holding collections.
///
/// Pages follow cursor-scan rules: the cursor is the offset of the next
/// unvisited element, each call visits up to `page_size` elements, and a
/// filter only removes visited elements from the page, so filtered pages may
/// come back short or empty while the scan continues. Collections can be
/// mutated between fetches to play the part of another client.
pub struct MemorySource<I> {
    collections: RwLock<HashMap<KeyRef, Vec<I>>>,
    requests: AtomicUsize,
}

impl<I: ScanItem + Sync> MemorySource<I> {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_collection(self, key: KeyRef, items: Vec<I>) -> Self {
        self.write().insert(key, items);
        self
    }

    pub fn set_collection(&self, key: KeyRef, items: Vec<I>) {
        self.write().insert(key, items);
    }

    pub fn push(&self, key: &KeyRef, item: I) {
        self.write().entry(key.clone()).or_default().push(item);
    }

    /// Remove every element for which `predicate` holds; returns how many
    /// were removed.
    pub fn remove_where(&self, key: &KeyRef, predicate: impl Fn(&I) -> bool) -> usize {
        let mut collections = self.write();
        let Some(items) = collections.get_mut(key) else {
            return 0;
        };
        let before = items.len();
        items.retain(|item| !predicate(item));
        before - items.len()
    }

    pub fn collection(&self, key: &KeyRef) -> Vec<I> {
        self.read().get(key).cloned().unwrap_or_default()
    }

    /// Number of page or range requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<KeyRef, Vec<I>>> {
        self.collections.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<KeyRef, Vec<I>>> {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn serve_page(&self, request: &PageRequest) -> Result<Page<I>> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let start = parse_offset(&request.cursor)?;
        let matcher = request
            .filter
            .as_deref()
            .map(filter_matcher)
            .transpose()?;

        let collections = self.read();
        let items = collections
            .get(&KeyRef::new(request.key.as_str(), request.db))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let start = start.min(items.len());
        let end = start.saturating_add(request.page_size.max(1)).min(items.len());
        let page: Vec<I> = items[start..end]
            .iter()
            .filter(|item| {
                matcher
                    .as_ref()
                    .is_none_or(|m| m.is_match(item.match_subject()))
            })
            .cloned()
            .collect();

        let cursor = if end >= items.len() {
            RESET_TOKEN.to_string()
        } else {
            end.to_string()
        };
        Ok(Page::new(cursor, page))
    }
}

impl<I: ScanItem + Sync> Default for MemorySource<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ScanItem + Sync> PageSource<I> for MemorySource<I> {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<I>> {
        self.serve_page(&request)
    }
}

impl RangeSource for MemorySource<ListElement> {
    async fn fetch_range(
        &self,
        key: &str,
        db: u32,
        start: usize,
        stop: usize,
    ) -> Result<Vec<String>> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let collections = self.read();
        let items = collections
            .get(&KeyRef::new(key, db))
            .map(Vec::as_slice)
            .unwrap_or_default();
        if start >= items.len() || stop < start {
            return Ok(Vec::new());
        }
        let end = stop.saturating_add(1).min(items.len());
        Ok(items[start..end].iter().map(|e| e.value.clone()).collect())
    }
}

/// Substring filter expressed as a glob, the way scans are issued with
/// `MATCH *{filter}*`.
///
/// Server globs have no `{a,b}` alternation, so braces and commas match
/// literally.
pub fn filter_matcher(filter: &str) -> Result<GlobMatcher> {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('*');
    for c in filter.chars() {
        match c {
            '{' | '}' | ',' => {
                pattern.push('[');
                pattern.push(c);
                pattern.push(']');
            }
            _ => pattern.push(c),
        }
    }
    pattern.push('*');

    let glob = GlobBuilder::new(&pattern)
        .build()
        .with_context(|| format!("Invalid filter pattern: {filter}"))?;
    Ok(glob.compile_matcher())
}
