//! Request and response shapes for the blog administration REST API.
//!
//! Records use the wire names of the service (`_id`, camelCase fields) and are
//! lenient where the service is: optional strings default to `None`, unknown
//! fields are ignored and malformed timestamps read as absent.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Authenticated administrator as returned by `/api/auth/me` and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub admin: Option<User>,
}

/// Error body emitted by the service on non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
}

/// Body for `POST /api/categories` and `PUT /api/categories/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: String,
    pub meta_title: String,
    pub meta_description: String,
}

/// Category embedded in a blog: populated object or bare id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Embedded(CategorySummary),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Embedded(summary) => &summary.id,
            Self::Id(id) => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Embedded(summary) => summary.name.as_deref(),
            Self::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub posted_by: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub content_html: Option<String>,
    #[serde(default)]
    pub main_image: Option<String>,
    #[serde(default)]
    pub schema_markup: Option<String>,
    #[serde(default, with = "lenient_rfc3339")]
    pub created_at: Option<OffsetDateTime>,
}

/// Post a comment belongs to, as populated by the moderation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPost {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub post: Option<CommentPost>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default, with = "lenient_rfc3339")]
    pub created_at: Option<OffsetDateTime>,
}

/// Response of `POST /api/uploads/image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Homepage placement a blog can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    TopNew,
    MostPopular,
    EditorsPick,
    LatestPosts,
    Highlights,
    Banner,
}

impl Section {
    pub const ALL: [Self; 6] = [
        Self::TopNew,
        Self::MostPopular,
        Self::EditorsPick,
        Self::LatestPosts,
        Self::Highlights,
        Self::Banner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopNew => "top_new",
            Self::MostPopular => "most_popular",
            Self::EditorsPick => "editors_pick",
            Self::LatestPosts => "latest_posts",
            Self::Highlights => "highlights",
            Self::Banner => "banner",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TopNew => "Top New",
            Self::MostPopular => "Most Popular",
            Self::EditorsPick => "Editor Pick's",
            Self::LatestPosts => "Latest Posts",
            Self::Highlights => "Highlights",
            Self::Banner => "Banner",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.as_str() == value)
    }

    /// Human label for a raw section value, echoing unknown values back.
    pub fn label_for(value: &str) -> &str {
        Self::parse(value).map_or(value, |section| section.label())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RFC 3339 timestamps that read as `None` when missing or malformed.
pub mod lenient_rfc3339 {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::Error as _};
    use time::{OffsetDateTime, format_description::well_known::Rfc3339};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(|value| OffsetDateTime::parse(value, &Rfc3339).ok()))
    }

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value
            .map(|at| at.format(&Rfc3339))
            .transpose()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_reads_wire_names_and_populated_post() {
        let comment: Comment = serde_json::from_str(
            r#"{"_id":"c1","post":{"slug":"hello","title":"Hello"},"name":"Ann","approved":true,"createdAt":"2025-11-09T02:22:54.123Z"}"#,
        )
        .expect("comment");

        assert_eq!(comment.id, "c1");
        assert_eq!(comment.post.and_then(|p| p.title).as_deref(), Some("Hello"));
        assert!(comment.approved);
        assert_eq!(comment.created_at.map(OffsetDateTime::year), Some(2025));
    }

    #[test]
    fn malformed_timestamp_reads_as_absent() {
        let comment: Comment =
            serde_json::from_str(r#"{"_id":"c1","createdAt":"yesterday"}"#).expect("comment");
        assert!(comment.created_at.is_none());
        assert!(!comment.approved);
    }

    #[test]
    fn blog_category_accepts_object_or_id() {
        let populated: Blog =
            serde_json::from_str(r#"{"_id":"b1","title":"T","category":{"_id":"c9","name":"Rust"}}"#)
                .expect("populated");
        let bare: Blog =
            serde_json::from_str(r#"{"_id":"b2","title":"T","category":"c9"}"#).expect("bare");

        let populated = populated.category.expect("category");
        assert_eq!(populated.id(), "c9");
        assert_eq!(populated.name(), Some("Rust"));
        assert_eq!(bare.category.expect("category").id(), "c9");
    }

    #[test]
    fn section_labels_fall_back_to_raw_value() {
        assert_eq!(Section::label_for("editors_pick"), "Editor Pick's");
        assert_eq!(Section::label_for("sidebar"), "sidebar");
    }

    #[test]
    fn category_payload_uses_camel_case() {
        let payload = CategoryPayload {
            name: "Rust".into(),
            meta_title: "T".into(),
            meta_description: "D".into(),
        };
        let value = serde_json::to_value(payload).expect("json");
        assert_eq!(value["metaTitle"], "T");
        assert_eq!(value["metaDescription"], "D");
    }
}
