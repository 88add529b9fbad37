use std::{cmp::Reverse, collections::BTreeSet, num::NonZeroUsize};

use crate::infra::transport::HttpError;

use super::ListRow;

/// Rows of the current page, or the screen's empty-state text.
#[derive(Debug, PartialEq)]
pub enum PageRows<'a, R> {
    Rows(Vec<&'a R>),
    Empty(&'static str),
}

/// Pure view state of a list screen. No I/O happens here.
#[derive(Debug, Clone)]
pub struct ListState<R: ListRow> {
    rows: Vec<R>,
    query: String,
    status: Option<R::Status>,
    page: usize,
    page_size: NonZeroUsize,
    selected: BTreeSet<String>,
    visible: Vec<usize>,
    error: Option<HttpError>,
}

impl<R: ListRow> ListState<R> {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            rows: Vec::new(),
            query: String::new(),
            status: None,
            page: 1,
            page_size,
            selected: BTreeSet::new(),
            visible: Vec::new(),
            error: None,
        }
    }

    /// Swap in a freshly loaded set of rows.
    pub fn replace_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.error = None;
        let ids: BTreeSet<&str> = self.rows.iter().map(ListRow::id).collect();
        self.selected.retain(|id| ids.contains(id.as_str()));
        self.recompute();
    }

    pub fn record_error(&mut self, error: HttpError) {
        self.error = Some(error);
    }

    pub fn set_filter(&mut self, query: &str, status: Option<R::Status>) {
        self.query = query.trim().to_lowercase();
        self.status = status;
        self.recompute();
    }

    fn recompute(&mut self) {
        let mut visible: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.matches(row))
            .map(|(idx, _)| idx)
            .collect();
        // stable: equal timestamps keep server order
        visible.sort_by_key(|&idx| {
            let ts = self.rows[idx].timestamp();
            (ts.is_none(), ts.map(Reverse))
        });
        self.visible = visible;
        self.page = 1;
    }

    fn matches(&self, row: &R) -> bool {
        if let Some(wanted) = self.status
            && row.status() != Some(wanted)
        {
            return false;
        }
        self.query.is_empty()
            || row
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.query))
    }

    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.page_size.get()).max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    pub fn last_page(&mut self) {
        self.page = self.total_pages();
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    fn page_indices(&self) -> &[usize] {
        let size = self.page_size.get();
        let start = (self.page - 1).saturating_mul(size).min(self.visible.len());
        let end = start.saturating_add(size).min(self.visible.len());
        &self.visible[start..end]
    }

    pub fn page_rows(&self, empty_message: &'static str) -> PageRows<'_, R> {
        let rows: Vec<&R> = self.page_indices().iter().map(|&idx| &self.rows[idx]).collect();
        if rows.is_empty() {
            PageRows::Empty(empty_message)
        } else {
            PageRows::Rows(rows)
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &R> {
        self.visible.iter().map(|&idx| &self.rows[idx])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status_filter(&self) -> Option<R::Status> {
        self.status
    }

    pub fn error(&self) -> Option<&HttpError> {
        self.error.as_ref()
    }

    pub fn toggle(&mut self, id: &str) {
        if self.find(id).is_none() {
            return;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn select_page(&mut self) {
        let ids: Vec<String> = self
            .page_indices()
            .iter()
            .map(|&idx| self.rows[idx].id().to_string())
            .collect();
        self.selected.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }
}
