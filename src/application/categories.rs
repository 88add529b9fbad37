//! Category management.

use std::{convert::Infallible, num::NonZeroUsize};

use blog_admin_types::Category;
use reqwest::Method;
use tracing::info;

use crate::domain::forms::CategoryDraft;

use super::{
    client::AuthorizedClient,
    error::AppError,
    list::{ListConfig, ListController, ListRow, RowAction},
};

pub const CATEGORIES_ENDPOINT: &str = "/api/categories";

impl ListRow for Category {
    type Status = Infallible;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.slug.as_deref());
        fields
    }
}

pub fn categories_config(page_size: NonZeroUsize) -> ListConfig {
    ListConfig {
        name: "category",
        endpoint: CATEGORIES_ENDPOINT,
        page_size,
        actions: &[RowAction::Delete],
        empty_message: "No categories found.",
    }
}

pub fn category_list(client: AuthorizedClient, page_size: NonZeroUsize) -> ListController<Category> {
    ListController::new(client, categories_config(page_size))
}

#[derive(Clone, Debug)]
pub struct CategoryService {
    client: AuthorizedClient,
}

impl CategoryService {
    pub fn new(client: AuthorizedClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, draft: CategoryDraft) -> Result<Option<Category>, AppError> {
        let payload = draft.into_payload()?;
        let value: serde_json::Value = self
            .client
            .send_json(Method::POST, CATEGORIES_ENDPOINT, &payload)
            .await?;
        info!(name = %payload.name, "category created");
        Ok(serde_json::from_value(value).ok())
    }

    pub async fn update(
        &self,
        id: &str,
        draft: CategoryDraft,
    ) -> Result<Option<Category>, AppError> {
        let payload = draft.into_payload()?;
        let path = format!("{CATEGORIES_ENDPOINT}/{id}");
        let value: serde_json::Value = self.client.send_json(Method::PUT, &path, &payload).await?;
        info!(%id, name = %payload.name, "category updated");
        Ok(serde_json::from_value(value).ok())
    }

    /// Current values of one category, the base for partial edits.
    pub async fn find(&self, id: &str) -> Result<Category, AppError> {
        let categories: Vec<Category> = self.client.get(CATEGORIES_ENDPOINT).await?;
        categories
            .into_iter()
            .find(|category| category.id == id)
            .ok_or_else(|| AppError::not_found("Category not found"))
    }
}
