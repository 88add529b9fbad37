//! Blog posts: listing, multipart create and edit.

use std::num::NonZeroUsize;

use blog_admin_types::Blog;
use reqwest::{Method, multipart::Form};
use time::OffsetDateTime;
use tracing::info;

use crate::{
    domain::{
        error::ValidationError,
        forms::{BlogChanges, BlogDraft},
    },
    infra::transport::RequestBody,
};

use super::{
    client::AuthorizedClient,
    error::AppError,
    list::{ListConfig, ListController, ListRow, RowAction},
    uploads::image_part,
};

pub const BLOGS_ENDPOINT: &str = "/api/blogs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Published,
    Draft,
}

impl PublishStatus {
    pub fn parse_filter(value: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match value.map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some("published") => Ok(Some(Self::Published)),
            Some("draft") => Ok(Some(Self::Draft)),
            Some(other) => Err(ValidationError::new(
                "status",
                format!("unknown blog filter `{other}`; expected all, published or draft"),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
        }
    }
}

impl ListRow for Blog {
    type Status = PublishStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.posted_by.as_deref());
        fields.extend(self.category.as_ref().and_then(|c| c.name()));
        fields.extend(self.slug.as_deref());
        fields
    }

    fn status(&self) -> Option<PublishStatus> {
        Some(if self.published {
            PublishStatus::Published
        } else {
            PublishStatus::Draft
        })
    }

    fn timestamp(&self) -> Option<OffsetDateTime> {
        self.created_at
    }
}

pub fn blogs_config(page_size: NonZeroUsize) -> ListConfig {
    ListConfig {
        name: "blog",
        endpoint: BLOGS_ENDPOINT,
        page_size,
        actions: &[RowAction::Delete],
        empty_message: "No blogs found.",
    }
}

pub fn blog_list(client: AuthorizedClient, page_size: NonZeroUsize) -> ListController<Blog> {
    ListController::new(client, blogs_config(page_size))
}

#[derive(Clone, Debug)]
pub struct BlogService {
    client: AuthorizedClient,
}

impl BlogService {
    pub fn new(client: AuthorizedClient) -> Self {
        Self { client }
    }

    /// The service has no single-post admin endpoint; look the post up in the
    /// collection instead.
    pub async fn find(&self, id: &str) -> Result<Blog, AppError> {
        let blogs: Vec<Blog> = self.client.get(BLOGS_ENDPOINT).await?;
        blogs
            .into_iter()
            .find(|blog| blog.id == id)
            .ok_or_else(|| AppError::not_found("Blog not found"))
    }

    pub async fn create(&self, draft: &BlogDraft) -> Result<Option<Blog>, AppError> {
        draft.validate_for_create()?;
        let form = multipart(draft).await?;
        let value = self
            .client
            .request(Method::POST, BLOGS_ENDPOINT, RequestBody::Multipart(form))
            .await?;
        info!(title = %draft.title, "blog created");
        Ok(serde_json::from_value(value).ok())
    }

    /// Merge `changes` into the stored post and send the whole form back.
    pub async fn update(&self, id: &str, changes: BlogChanges) -> Result<Option<Blog>, AppError> {
        let current = self.find(id).await?;
        let mut draft = BlogDraft::from_blog(&current);
        draft.apply(changes);
        draft.validate_for_update()?;

        let form = multipart(&draft).await?;
        let path = format!("{BLOGS_ENDPOINT}/{id}");
        let value = self
            .client
            .request(Method::PUT, &path, RequestBody::Multipart(form))
            .await?;
        info!(%id, title = %draft.title, "blog updated");
        Ok(serde_json::from_value(value).ok())
    }
}

async fn multipart(draft: &BlogDraft) -> Result<Form, AppError> {
    let mut form = draft
        .text_fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));
    if let Some(path) = &draft.main_image {
        form = form.part("mainImage", image_part("mainImage", path).await?);
    }
    Ok(form)
}
