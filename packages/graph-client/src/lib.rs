//! Pure Facebook Graph REST API client.
//!
//! A minimal client for the page-level Graph API surface: publishing to a page
//! feed, reading engagement summaries and comments, liking and replying to
//! comments.
//!
//! # Example
//!
//! ```rust,ignore
//! use graph_client::{GraphClient, GraphOptions};
//!
//! let client = GraphClient::new(GraphOptions::new("page-token"))?;
//!
//! let post = client.publish_to_feed("1234567890", "Hello from the bot").await?;
//! let likes = client.likes_count(&post.id).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{GraphError, Result};
pub use types::{Comment, CommentAuthor, CommentCreated, PublishResponse};

use std::time::Duration;

use serde::de::DeserializeOwned;
use types::{EdgeSummaryResponse, Paged, SharesResponse, SuccessResponse};

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`GraphClient`].
#[derive(Debug, Clone)]
pub struct GraphOptions {
    pub access_token: String,
    pub base_url: String,
    /// Outbound proxy applied to every scheme.
    pub proxy_url: Option<String>,
    pub timeout: Duration,
}

impl GraphOptions {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_proxy(mut self, proxy_url: Option<String>) -> Self {
        self.proxy_url = proxy_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct GraphClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GraphClient {
    pub fn new(options: GraphOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(options.timeout);

        if let Some(proxy_url) = options.proxy_url.as_deref() {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| GraphError::Config(format!("invalid proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| GraphError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            token: options.access_token,
        })
    }

    /// Publish a text post to a page feed. Returns the new post id.
    pub async fn publish_to_feed(&self, page_id: &str, message: &str) -> Result<PublishResponse> {
        tracing::debug!(page_id, "Publishing to page feed");
        self.post_form(
            &format!("{}/feed", page_id),
            &[("message", message), ("published", "true")],
        )
        .await
    }

    /// `total_count` from `GET /{object_id}/{edge}?summary=true`.
    pub async fn edge_total_count(&self, object_id: &str, edge: &str) -> Result<u64> {
        let resp: EdgeSummaryResponse = self
            .get_json(&format!("{}/{}", object_id, edge), &[("summary", "true")])
            .await?;
        Ok(resp.summary.total_count)
    }

    pub async fn likes_count(&self, post_id: &str) -> Result<u64> {
        self.edge_total_count(post_id, "likes").await
    }

    pub async fn comments_count(&self, post_id: &str) -> Result<u64> {
        self.edge_total_count(post_id, "comments").await
    }

    /// Share count of a post. Posts that were never shared report 0.
    pub async fn shares_count(&self, post_id: &str) -> Result<u64> {
        let resp: SharesResponse = self.get_json(post_id, &[("fields", "shares")]).await?;
        Ok(resp.shares.map(|s| s.count).unwrap_or(0))
    }

    /// Up to `limit` most recent comments on an object.
    pub async fn comments(&self, object_id: &str, limit: u32) -> Result<Vec<Comment>> {
        let limit = limit.to_string();
        let page: Paged<Comment> = self
            .get_json(
                &format!("{}/comments", object_id),
                &[("fields", "id,message,from"), ("limit", limit.as_str())],
            )
            .await?;
        tracing::debug!(object_id, count = page.data.len(), "Fetched comments");
        Ok(page.data)
    }

    /// Like an object (post or comment) as the page.
    pub async fn like(&self, object_id: &str) -> Result<()> {
        let resp: SuccessResponse = self
            .post_form(&format!("{}/likes", object_id), &[])
            .await?;
        if !resp.success {
            tracing::debug!(object_id, "Like acknowledged without success flag");
        }
        Ok(())
    }

    /// Comment on an object. Replying to a comment nests the reply under it.
    pub async fn comment_on(&self, object_id: &str, message: &str) -> Result<CommentCreated> {
        self.post_form(&format!("{}/comments", object_id), &[("message", message)])
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let resp = self
            .client
            .get(self.url(path))
            .query(&[("access_token", self.token.as_str())])
            .query(query)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: &[(&str, &str)]) -> Result<T> {
        let resp = self
            .client
            .post(self.url(path))
            .query(&[("access_token", self.token.as_str())])
            .form(form)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GraphError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }
}
