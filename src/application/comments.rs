//! Comment moderation queue.

use std::num::NonZeroUsize;

use blog_admin_types::Comment;
use time::OffsetDateTime;

use crate::domain::error::ValidationError;

use super::{
    client::AuthorizedClient,
    list::{ListConfig, ListController, ListRow, RowAction},
};

pub const COMMENTS_ENDPOINT: &str = "/api/admin/comments";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationStatus {
    Pending,
    Approved,
}

impl ModerationStatus {
    /// `all` (or nothing) means no status filter.
    pub fn parse_filter(value: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match value.map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some("pending") => Ok(Some(Self::Pending)),
            Some("approved") => Ok(Some(Self::Approved)),
            Some(other) => Err(ValidationError::new(
                "status",
                format!("unknown comment filter `{other}`; expected all, pending or approved"),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

impl ListRow for Comment {
    type Status = ModerationStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let post = self.post.as_ref();
        [
            post.and_then(|p| p.title.as_deref()),
            post.and_then(|p| p.slug.as_deref()),
            self.name.as_deref(),
            self.email.as_deref(),
            self.message.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn status(&self) -> Option<ModerationStatus> {
        Some(if self.approved {
            ModerationStatus::Approved
        } else {
            ModerationStatus::Pending
        })
    }

    fn timestamp(&self) -> Option<OffsetDateTime> {
        self.created_at
    }
}

pub fn comments_config(page_size: NonZeroUsize) -> ListConfig {
    ListConfig {
        name: "comment",
        endpoint: COMMENTS_ENDPOINT,
        page_size,
        actions: &[RowAction::Approve, RowAction::Delete],
        empty_message: "No comments found.",
    }
}

pub fn comment_list(client: AuthorizedClient, page_size: NonZeroUsize) -> ListController<Comment> {
    ListController::new(client, comments_config(page_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(json: &str) -> Comment {
        serde_json::from_str(json).expect("comment")
    }

    #[test]
    fn searches_post_and_author_fields() {
        let c = comment(
            r#"{"_id":"c1","post":{"slug":"hello-rust","title":"Hello"},"name":"Ann","email":"ann@x.io","message":"Great"}"#,
        );
        assert_eq!(
            c.search_fields(),
            vec!["Hello", "hello-rust", "Ann", "ann@x.io", "Great"]
        );
        assert_eq!(c.status(), Some(ModerationStatus::Pending));
    }

    #[test]
    fn missing_fields_are_skipped() {
        let c = comment(r#"{"_id":"c2","approved":true}"#);
        assert!(c.search_fields().is_empty());
        assert_eq!(c.status(), Some(ModerationStatus::Approved));
    }

    #[test]
    fn filter_values() {
        assert_eq!(ModerationStatus::parse_filter(None), Ok(None));
        assert_eq!(ModerationStatus::parse_filter(Some("all")), Ok(None));
        assert_eq!(
            ModerationStatus::parse_filter(Some("pending")),
            Ok(Some(ModerationStatus::Pending))
        );
        assert!(ModerationStatus::parse_filter(Some("spam")).is_err());
    }
}
