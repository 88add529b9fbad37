//! Generic list screen: fetch, filter, sort, paginate and bulk-mutate rows
//! of any record type exposed by a collection endpoint.

mod controller;
mod state;

use std::{fmt::Debug, num::NonZeroUsize};

use reqwest::Method;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;

pub use controller::{
    Confirm, ListController, LoadOutcome, LoadTicket, MutationOutcome, MutationReport,
};
pub use state::{ListState, PageRows};

/// A record the list controller can display.
///
/// Only the identity, the searchable text, an optional status and the sort
/// timestamp are interpreted; everything else is opaque.
pub trait ListRow: DeserializeOwned + Clone + Debug {
    type Status: Copy + Eq + Debug;

    fn id(&self) -> &str;

    /// Text matched case-insensitively by the search query.
    fn search_fields(&self) -> Vec<&str>;

    fn status(&self) -> Option<Self::Status> {
        None
    }

    /// Newest rows come first; rows without one go last.
    fn timestamp(&self) -> Option<OffsetDateTime> {
        None
    }
}

/// Per-row mutation available on a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Delete,
    Approve,
}

impl RowAction {
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Delete)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Approve => "approve",
        }
    }

    pub fn request(self, endpoint: &str, id: &str) -> (Method, String) {
        let endpoint = endpoint.trim_end_matches('/');
        match self {
            Self::Delete => (Method::DELETE, format!("{endpoint}/{id}")),
            Self::Approve => (Method::PUT, format!("{endpoint}/{id}/approve")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListConfig {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub page_size: NonZeroUsize,
    pub actions: &'static [RowAction],
    pub empty_message: &'static str,
}

impl ListConfig {
    pub fn allows(&self, action: RowAction) -> bool {
        self.actions.contains(&action)
    }
}
