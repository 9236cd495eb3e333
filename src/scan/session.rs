use super::cursor::ScanCursor;
use super::item::{InsertAt, Locator, ScanItem};
use super::source::{KeyRef, PageRequest, PageSource};
use crate::error::{ScanError, ScanResult};
use futures::stream::{self, Stream};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Incremental scan over one key's collection with a locally editable view.
///
/// The session pages through the collection with a server cursor and keeps
/// every received item in arrival order. Items are never deduplicated across
/// pages: a cursor scan over a collection that other clients mutate may
/// repeat or skip elements, and the view reflects exactly what the server
/// returned.
///
/// Cloning yields another handle to the same session, so a caller can reset
/// or retarget it while a `load_next` started elsewhere is still pending. A
/// page that arrives after such a reset is dropped.
pub struct ScanSession<I, S> {
    inner: Arc<Inner<I, S>>,
}

struct Inner<I, S> {
    source: S,
    state: Mutex<SessionState<I>>,
    revision: watch::Sender<u64>,
}

struct SessionState<I> {
    target: KeyRef,
    cursor: ScanCursor,
    view: Vec<I>,
    filter: Option<String>,
    page_size: usize,
    pending_page_size: usize,
    // Bumped by every reset; a load only applies to the generation it started in.
    generation: u64,
    in_flight: Option<u64>,
    locally_edited: bool,
    closed: bool,
}

impl<I, S> Clone for ScanSession<I, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: ScanItem, S: PageSource<I>> ScanSession<I, S> {
    pub fn new(source: S, target: KeyRef, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                source,
                state: Mutex::new(SessionState {
                    target,
                    cursor: ScanCursor::new(),
                    view: Vec::new(),
                    filter: None,
                    page_size,
                    pending_page_size: page_size,
                    generation: 0,
                    in_flight: None,
                    locally_edited: false,
                    closed: false,
                }),
                revision,
            }),
        }
    }

    pub fn with_filter(self, filter: Option<String>) -> Self {
        self.set_filter(filter);
        self
    }

    /// Start over: empty view, cursor back at the reset token, pending page
    /// size applied. Any load still in flight is invalidated.
    pub fn reset(&self) {
        {
            let mut state = self.lock();
            reset_state(&mut state);
            debug!(key = %state.target, generation = state.generation, "scan reset");
        }
        self.bump_revision();
    }

    /// Change the server-side filter and reset. An empty filter clears it.
    pub fn set_filter(&self, filter: Option<String>) {
        {
            let mut state = self.lock();
            state.filter = filter.filter(|f| !f.is_empty());
            reset_state(&mut state);
        }
        self.bump_revision();
    }

    /// Point the session at another key or database and reset.
    pub fn retarget(&self, target: KeyRef) {
        {
            let mut state = self.lock();
            debug!(from = %state.target, to = %target, "scan retargeted");
            state.target = target;
            reset_state(&mut state);
        }
        self.bump_revision();
    }

    /// Takes effect on the next reset.
    pub fn set_page_size(&self, page_size: usize) {
        self.lock().pending_page_size = page_size.max(1);
    }

    /// Release the session when its owner goes away. Pending loads are
    /// discarded on arrival and later loads fail with [`ScanError::Closed`].
    pub fn close(&self) {
        {
            let mut state = self.lock();
            state.closed = true;
            reset_state(&mut state);
        }
        self.bump_revision();
    }

    /// Fetch the next page and append it to the view.
    ///
    /// Returns the appended items. The view and cursor are untouched on any
    /// error.
    pub async fn load_next(&self) -> ScanResult<Vec<I>> {
        let (request, generation) = {
            let mut state = self.lock();
            if state.closed {
                return Err(ScanError::Closed);
            }
            if state.in_flight.is_some() {
                return Err(ScanError::LoadInProgress);
            }
            if state.cursor.is_exhausted() {
                return Err(ScanError::AlreadyExhausted);
            }
            state.in_flight = Some(state.generation);
            let request = PageRequest {
                key: state.target.name.clone(),
                db: state.target.db,
                cursor: state.cursor.token().to_string(),
                page_size: state.page_size,
                filter: state.filter.clone(),
            };
            (request, state.generation)
        };

        debug!(
            key = %request.key,
            db = request.db,
            cursor = %request.cursor,
            page_size = request.page_size,
            filter = ?request.filter,
            "fetching page"
        );

        let mut guard = InFlight {
            state: &self.inner.state,
            generation,
            armed: true,
        };
        let key = request.key.clone();
        let result = self.inner.source.fetch_page(request).await;
        guard.armed = false;

        let appended = {
            let mut state = self.lock();
            if state.generation != generation {
                debug!(
                    key = %key,
                    generation,
                    current = state.generation,
                    "discarding page for superseded scan"
                );
                return Err(ScanError::Superseded);
            }
            state.in_flight = None;

            let page = match result {
                Ok(page) => page,
                Err(source) => {
                    warn!(key = %key, error = %source, "page fetch failed");
                    return Err(ScanError::Transport { key, source });
                }
            };

            state.cursor.advance(page.cursor);
            state.view.extend(page.items.iter().cloned());
            debug!(
                key = %key,
                received = page.items.len(),
                total = state.view.len(),
                exhausted = state.cursor.is_exhausted(),
                "page appended"
            );
            page.items
        };

        self.bump_revision();
        Ok(appended)
    }

    /// Stream of pages until the scan is exhausted. The stream ends after
    /// the first error it yields.
    pub fn pages(&self) -> impl Stream<Item = ScanResult<Vec<I>>> + '_ {
        stream::unfold(false, move |done| async move {
            if done {
                return None;
            }
            match self.load_next().await {
                Ok(items) => Some((Ok(items), !self.has_more())),
                Err(ScanError::AlreadyExhausted) => None,
                Err(error) => Some((Err(error), true)),
            }
        })
    }

    pub fn has_more(&self) -> bool {
        !self.lock().cursor.is_exhausted()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    /// Insert an item the server has just accepted, without refetching.
    ///
    /// For keyed kinds an existing entry with the same key is replaced in
    /// place, keeping keys unique in the view.
    pub fn apply_local_insert(&self, item: I, at: InsertAt) {
        {
            let mut state = self.lock();
            let existing = item
                .match_key()
                .and_then(|key| position_of_key(&state.view, key));
            match existing {
                Some(index) => state.view[index] = item,
                None => {
                    let index = match at {
                        InsertAt::Append => state.view.len(),
                        InsertAt::Index(index) => index.min(state.view.len()),
                    };
                    state.view.insert(index, item);
                }
            }
            state.locally_edited = true;
        }
        self.bump_revision();
    }

    pub fn apply_local_update(&self, locator: &Locator, item: I) -> ScanResult<()> {
        {
            let mut state = self.lock();
            let index = locate(&state.view, locator)?;
            let new_key = item.match_key().map(str::to_string);
            state.view[index] = item;
            // A renamed key must not collide with another entry.
            if let Some(new_key) = new_key {
                let mut position = 0;
                state.view.retain(|other| {
                    let keep = position == index || other.match_key() != Some(new_key.as_str());
                    position += 1;
                    keep
                });
            }
            state.locally_edited = true;
        }
        self.bump_revision();
        Ok(())
    }

    pub fn apply_local_remove(&self, locator: &Locator) -> ScanResult<I> {
        let removed = {
            let mut state = self.lock();
            let index = locate(&state.view, locator)?;
            state.locally_edited = true;
            state.view.remove(index)
        };
        self.bump_revision();
        Ok(removed)
    }

    pub fn snapshot(&self) -> Vec<I> {
        self.lock().view.clone()
    }

    /// Run `f` against the view without cloning it.
    ///
    /// The session lock is held while `f` runs, so `f` must not call back
    /// into this session or any clone of it; that deadlocks. Use
    /// [`snapshot`](Self::snapshot) when the closure needs the session.
    pub fn with_view<R>(&self, f: impl FnOnce(&[I]) -> R) -> R {
        f(&self.lock().view)
    }

    /// View items paired with their view-local index.
    pub fn indexed(&self) -> Vec<(usize, I)> {
        self.lock().view.iter().cloned().enumerate().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().view.is_empty()
    }

    pub fn cursor(&self) -> ScanCursor {
        self.lock().cursor.clone()
    }

    pub fn filter(&self) -> Option<String> {
        self.lock().filter.clone()
    }

    pub fn target(&self) -> KeyRef {
        self.lock().target.clone()
    }

    pub fn page_size(&self) -> usize {
        self.lock().page_size
    }

    /// Whether local edits were applied since the last reset, meaning the
    /// view may no longer match a fresh scan.
    pub fn is_locally_edited(&self) -> bool {
        self.lock().locally_edited
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Receiver of a counter bumped on every view change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState<I>> {
        lock_state(&self.inner.state)
    }

    fn bump_revision(&self) {
        self.inner
            .revision
            .send_modify(|revision| *revision = revision.wrapping_add(1));
    }
}

// Releases the in-flight marker when a `load_next` future is dropped before
// its page arrives.
struct InFlight<'a, I> {
    state: &'a Mutex<SessionState<I>>,
    generation: u64,
    armed: bool,
}

impl<I> Drop for InFlight<'_, I> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = lock_state(self.state);
            if state.in_flight == Some(self.generation) {
                state.in_flight = None;
            }
        }
    }
}

fn lock_state<I>(state: &Mutex<SessionState<I>>) -> MutexGuard<'_, SessionState<I>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reset_state<I>(state: &mut SessionState<I>) {
    state.generation = state.generation.wrapping_add(1);
    state.in_flight = None;
    state.cursor.reset();
    state.view.clear();
    state.page_size = state.pending_page_size;
    state.locally_edited = false;
}

fn position_of_key<I: ScanItem>(view: &[I], key: &str) -> Option<usize> {
    view.iter().position(|item| item.match_key() == Some(key))
}

fn locate<I: ScanItem>(view: &[I], locator: &Locator) -> ScanResult<usize> {
    let found = match locator {
        Locator::Position(index) => (*index < view.len()).then_some(*index),
        Locator::Key(key) => position_of_key(view, key),
    };
    found.ok_or_else(|| ScanError::NotFound {
        locator: locator.to_string(),
    })
}
