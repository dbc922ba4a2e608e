//! List store
//!
//! Per-screen cache of one page of records. The store never merges or
//! patches records locally: every refresh replaces the whole page, and a
//! failed refresh keeps the last good page.

use crate::client::{ClientError, ListApi, Page};
use crate::lifetime::{Ended, Lifetime};
use crate::models::Entity;

/// Page-number pagination with a floor of 1 and no upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    limit: u32,
}

impl Pager {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn next(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// "Prev" is disabled exactly on the first page
    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    /// 1-based serial number of the row at `index` on this page
    pub fn serial(&self, index: usize) -> u64 {
        (self.page as u64 - 1) * self.limit as u64 + index as u64 + 1
    }

    pub fn as_page(&self) -> Page {
        Page {
            number: self.page,
            limit: self.limit,
        }
    }
}

/// Outcome of a refresh
#[derive(Debug, PartialEq, Eq)]
pub enum Refresh {
    /// Records were replaced
    Loaded(usize),
    /// The fetch failed; previous records are kept
    Failed,
    /// The screen ended while fetching; nothing was applied
    Abandoned,
}

#[derive(Debug)]
pub struct ListStore<E: Entity> {
    records: Vec<E>,
    loading: bool,
    error: Option<String>,
    pager: Option<Pager>,
}

impl<E: Entity> Default for ListStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> ListStore<E> {
    /// An unpaginated store
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
            pager: None,
        }
    }

    /// A store that fetches `limit` records per page
    pub fn paged(limit: u32) -> Self {
        Self {
            pager: Some(Pager::new(limit)),
            ..Self::new()
        }
    }

    pub fn records(&self) -> &[E] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.records.get(index)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed fetch, cleared by the next success
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pager(&self) -> Option<&Pager> {
        self.pager.as_ref()
    }

    /// Serial number shown for the row at `index`
    pub fn serial(&self, index: usize) -> u64 {
        match &self.pager {
            Some(pager) => pager.serial(index),
            None => index as u64 + 1,
        }
    }

    /// Advance one page. Returns false on an unpaginated store.
    pub fn next_page(&mut self) -> bool {
        match &mut self.pager {
            Some(pager) => {
                pager.next();
                true
            }
            None => false,
        }
    }

    /// Go back one page. Returns false when already on the first page.
    pub fn prev_page(&mut self) -> bool {
        match &mut self.pager {
            Some(pager) if pager.can_prev() => {
                pager.prev();
                true
            }
            _ => false,
        }
    }

    /// Mark the store loading and return the page to request
    pub fn begin_refresh(&mut self) -> Option<Page> {
        self.loading = true;
        self.pager.map(|p| p.as_page())
    }

    /// Apply a fetch result. Loading is cleared either way.
    pub fn finish_refresh(&mut self, result: Result<Vec<E>, ClientError>) -> Refresh {
        self.loading = false;
        match result {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.error = None;
                Refresh::Loaded(count)
            }
            Err(e) => {
                tracing::warn!(kind = %E::KIND, error = %e, "list refresh failed, keeping previous records");
                self.error = Some(e.to_string());
                Refresh::Failed
            }
        }
    }

    /// Refetch the current page, abandoning the result if the lifetime ends
    pub async fn refresh<A>(&mut self, api: &A, lifetime: &Lifetime) -> Refresh
    where
        A: ListApi<E> + ?Sized,
    {
        let page = self.begin_refresh();
        match lifetime.guard(api.list(page)).await {
            Ok(result) => self.finish_refresh(result),
            Err(Ended) => {
                self.loading = false;
                Refresh::Abandoned
            }
        }
    }
}
