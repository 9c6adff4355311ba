use serde::{Deserialize, Serialize};

/// Response to `POST /{page_id}/feed`.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishResponse {
    pub id: String,
}

/// Response to `POST /{object_id}/comments`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentCreated {
    pub id: String,
}

/// Body of an edge queried with `summary=true`. Only the summary is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeSummaryResponse {
    #[serde(default)]
    pub summary: EdgeSummary,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeSummary {
    #[serde(default)]
    pub total_count: u64,
}

/// Response to `GET /{post_id}?fields=shares`.
///
/// The API omits `shares` entirely for posts that were never shared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharesResponse {
    pub shares: Option<ShareCount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShareCount {
    #[serde(default)]
    pub count: u64,
}

/// Paged list wrapper used by collection edges.
#[derive(Debug, Clone, Deserialize)]
pub struct Paged<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A comment as returned by `GET /{post_id}/comments?fields=id,message,from`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Empty when the entry came without an id.
    #[serde(default)]
    pub id: String,
    pub message: Option<String>,
    pub from: Option<CommentAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl Comment {
    /// Author display name, if the API exposed one.
    pub fn author_name(&self) -> Option<&str> {
        self.from.as_ref().and_then(|f| f.name.as_deref())
    }
}

/// Generic `{"success": true}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}
