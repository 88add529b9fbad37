//! Overview counters for the dashboard screen.

use serde::Serialize;
use tracing::warn;

use crate::infra::transport::HttpError;

use super::{
    blogs::BLOGS_ENDPOINT, categories::CATEGORIES_ENDPOINT, client::AuthorizedClient,
    comments::COMMENTS_ENDPOINT,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub posts: usize,
    pub categories: usize,
    pub comments: usize,
    pub pending_comments: usize,
    /// Collections that could not be fetched and were counted as zero.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<&'static str>,
}

/// Fetch all three collections concurrently. A failing collection counts as
/// zero instead of failing the whole dashboard.
pub async fn load_stats(client: &AuthorizedClient) -> DashboardStats {
    let (blogs, categories, comments) = tokio::join!(
        client.get::<serde_json::Value>(BLOGS_ENDPOINT),
        client.get::<serde_json::Value>(CATEGORIES_ENDPOINT),
        client.get::<serde_json::Value>(COMMENTS_ENDPOINT),
    );

    let mut stats = DashboardStats::default();
    let blogs = settle("blogs", blogs, &mut stats.unavailable);
    let categories = settle("categories", categories, &mut stats.unavailable);
    let comments = settle("comments", comments, &mut stats.unavailable);

    stats.posts = blogs.len();
    stats.categories = categories.len();
    stats.comments = comments.len();
    stats.pending_comments = comments
        .iter()
        .filter(|comment| {
            !comment
                .get("approved")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
        })
        .count();
    stats
}

fn settle(
    name: &'static str,
    result: Result<serde_json::Value, HttpError>,
    unavailable: &mut Vec<&'static str>,
) -> Vec<serde_json::Value> {
    match result {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => Vec::new(),
        Err(err) => {
            warn!(collection = name, error = %err, "dashboard count unavailable");
            unavailable.push(name);
            Vec::new()
        }
    }
}
