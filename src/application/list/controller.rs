use futures::future::join_all;
use reqwest::Method;
use tracing::{debug, info, warn};

use crate::{
    application::client::AuthorizedClient, domain::error::ValidationError,
    infra::transport::{HttpError, RequestBody},
};

use super::{ListConfig, ListRow, ListState, PageRows, RowAction};

/// Asks the operator before a destructive action runs.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Identifies one load; only the newest ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Superseded,
}

#[derive(Debug)]
pub struct MutationReport {
    pub action: RowAction,
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, HttpError)>,
    /// Result of the reconciliation load that follows every mutation.
    pub reload: Result<LoadOutcome, HttpError>,
}

impl MutationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub enum MutationOutcome {
    Applied(MutationReport),
    Cancelled,
}

#[derive(Debug)]
pub struct ListController<R: ListRow> {
    client: AuthorizedClient,
    config: ListConfig,
    state: ListState<R>,
    generation: u64,
}

impl<R: ListRow> ListController<R> {
    pub fn new(client: AuthorizedClient, config: ListConfig) -> Self {
        let state = ListState::new(config.page_size);
        Self {
            client,
            config,
            state,
            generation: 0,
        }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn state(&self) -> &ListState<R> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ListState<R> {
        &mut self.state
    }

    pub fn client(&self) -> &AuthorizedClient {
        &self.client
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Drop every in-flight load, e.g. when the screen goes away.
    pub fn teardown(&mut self) {
        self.generation += 1;
    }

    /// Fetch the collection without touching state.
    pub async fn fetch(&self) -> Result<Vec<R>, HttpError> {
        let body = self
            .client
            .request(Method::GET, self.config.endpoint, RequestBody::Empty)
            .await?;
        Ok(decode_rows(self.config.name, body))
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<R>, HttpError>,
    ) -> Result<LoadOutcome, HttpError> {
        if ticket.0 != self.generation {
            debug!(list = self.config.name, "discarding superseded load");
            return Ok(LoadOutcome::Superseded);
        }
        match result {
            Ok(rows) => {
                debug!(list = self.config.name, rows = rows.len(), "list loaded");
                self.state.replace_rows(rows);
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                self.state.record_error(err.clone());
                Err(err)
            }
        }
    }

    pub async fn load(&mut self) -> Result<LoadOutcome, HttpError> {
        let ticket = self.begin_load();
        let result = self.fetch().await;
        self.finish_load(ticket, result)
    }

    pub fn set_filter(&mut self, query: &str, status: Option<R::Status>) {
        self.state.set_filter(query, status);
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.set_page(page);
    }

    pub fn page_rows(&self) -> PageRows<'_, R> {
        self.state.page_rows(self.config.empty_message)
    }

    /// Apply `action` to every id, then reload once.
    ///
    /// Requests run concurrently and independently; a failed id does not stop
    /// the others. The list is reloaded even when some of them failed.
    pub async fn mutate(
        &mut self,
        ids: &[String],
        action: RowAction,
        confirm: &dyn Confirm,
    ) -> Result<MutationOutcome, ValidationError> {
        if !self.config.allows(action) {
            return Err(ValidationError::new(
                "action",
                format!("{} is not available for {}", action.label(), self.config.name),
            ));
        }
        if ids.is_empty() {
            return Err(ValidationError::new("ids", "Select at least one item"));
        }
        if action.is_destructive() {
            let prompt = match ids {
                [_] => format!("{} {}?", capitalize(action.label()), self.config.name),
                _ => format!("{} {} selected items?", capitalize(action.label()), ids.len()),
            };
            if !confirm.confirm(&prompt) {
                info!(list = self.config.name, action = action.label(), "mutation cancelled");
                return Ok(MutationOutcome::Cancelled);
            }
        }

        let client = &self.client;
        let endpoint = self.config.endpoint;
        let results = join_all(ids.iter().map(|id| async move {
            let (method, path) = action.request(endpoint, id);
            (id.clone(), client.request_unit(method, &path).await)
        }))
        .await;

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (id, result) in results {
            match result {
                Ok(()) => succeeded.push(id),
                Err(err) => {
                    warn!(list = self.config.name, action = action.label(), %id, error = %err, "row mutation failed");
                    failed.push((id, err));
                }
            }
        }
        info!(
            list = self.config.name,
            action = action.label(),
            succeeded = succeeded.len(),
            failed = failed.len(),
            "mutation settled"
        );

        let reload = self.load().await;
        Ok(MutationOutcome::Applied(MutationReport {
            action,
            succeeded,
            failed,
            reload,
        }))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decode_rows<R: ListRow>(list: &str, body: serde_json::Value) -> Vec<R> {
    let serde_json::Value::Array(items) = body else {
        warn!(list, "collection response is not an array");
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<R>(item) {
            Ok(row) => Some(row),
            Err(err) => {
                warn!(list, error = %err, "skipping undecodable row");
                None
            }
        })
        .collect()
}
