//! Flat-file [`RecordStore`].
//!
//! Layout inside the data directory:
//!
//! ```text
//! processed_comments.txt   one comment id per line, append-only
//! posted_posts.txt         one post id per line, append-only
//! post_stats.json          metrics table, rewritten whole on every upsert
//! ```
//!
//! Id logs are only ever appended to, so a failed write can at worst lose the
//! line being written. The metrics table is written to a sibling temp file and
//! renamed over the original, so readers see either the old or the new table.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{RecordStore, StoreError, StoreResult};
use crate::common::{CommentId, MetricCounts, PostId};
use crate::domains::posts::models::TrackedPost;

pub const PROCESSED_COMMENTS_FILE: &str = "processed_comments.txt";
pub const POSTED_POSTS_FILE: &str = "posted_posts.txt";
pub const POST_STATS_FILE: &str = "post_stats.json";

/// Resolved file locations for a [`FileRecordStore`].
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub processed_comments: PathBuf,
    pub posted_posts: PathBuf,
    pub post_stats: PathBuf,
}

impl StorePaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            processed_comments: dir.join(PROCESSED_COMMENTS_FILE),
            posted_posts: dir.join(POSTED_POSTS_FILE),
            post_stats: dir.join(POST_STATS_FILE),
        }
    }

    fn post_stats_tmp(&self) -> PathBuf {
        self.post_stats.with_extension("json.tmp")
    }
}

pub struct FileRecordStore {
    paths: StorePaths,
    /// Serializes every operation; the files themselves carry no locking.
    lock: Mutex<()>,
}

impl FileRecordStore {
    /// Open the store in `dir`, creating the directory and an empty metrics
    /// table when they do not exist yet.
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await.map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let store = Self {
            paths: StorePaths::in_dir(dir),
            lock: Mutex::new(()),
        };

        if !fs::try_exists(&store.paths.post_stats)
            .await
            .map_err(|source| StoreError::Io {
                path: store.paths.post_stats.clone(),
                source,
            })?
        {
            store.write_table(&[]).await?;
            tracing::info!(path = %store.paths.post_stats.display(), "Created empty metrics table");
        }

        Ok(store)
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    async fn read_id_log(path: &Path) -> StoreResult<Vec<String>> {
        let text = match fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn append_id(path: &Path, id: &str) -> StoreResult<()> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(io_err)?;

        file.write_all(format!("{}\n", id).as_bytes())
            .await
            .map_err(io_err)?;
        file.flush().await.map_err(io_err)?;
        file.sync_data().await.map_err(io_err)?;
        Ok(())
    }

    /// Append `id` unless the log already holds it.
    async fn append_unique(path: &Path, id: &str) -> StoreResult<bool> {
        let existing = Self::read_id_log(path).await?;
        if existing.iter().any(|line| line == id) {
            return Ok(false);
        }
        Self::append_id(path, id).await?;
        Ok(true)
    }

    async fn read_table(&self) -> StoreResult<Vec<TrackedPost>> {
        let path = &self.paths.post_stats;
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })
    }

    async fn write_table(&self, rows: &[TrackedPost]) -> StoreResult<()> {
        let tmp = self.paths.post_stats_tmp();
        let json = serde_json::to_vec_pretty(rows).map_err(|source| StoreError::Corrupt {
            path: tmp.clone(),
            source,
        })?;

        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };

        let mut file = fs::File::create(&tmp).await.map_err(io_err(&tmp))?;
        file.write_all(&json).await.map_err(io_err(&tmp))?;
        file.flush().await.map_err(io_err(&tmp))?;
        file.sync_all().await.map_err(io_err(&tmp))?;
        drop(file);

        fs::rename(&tmp, &self.paths.post_stats)
            .await
            .map_err(io_err(&self.paths.post_stats))?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn add_post(&self, post_id: &PostId) -> StoreResult<bool> {
        let _guard = self.lock.lock().await;
        Self::append_unique(&self.paths.posted_posts, post_id.as_str()).await
    }

    async fn posted_posts(&self) -> StoreResult<Vec<PostId>> {
        let _guard = self.lock.lock().await;
        let mut seen = HashSet::new();
        Ok(Self::read_id_log(&self.paths.posted_posts)
            .await?
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .map(PostId::new)
            .collect())
    }

    async fn upsert_post_metrics(
        &self,
        post_id: &PostId,
        counts: MetricCounts,
        content: Option<&str>,
    ) -> StoreResult<TrackedPost> {
        let _guard = self.lock.lock().await;
        let mut rows = self.read_table().await?;
        let now = Utc::now();

        let row = match rows.iter().position(|row| &row.post_id == post_id) {
            Some(idx) => {
                let row =
                    TrackedPost::upserted(Some(rows[idx].clone()), post_id, counts, content, now);
                rows[idx] = row.clone();
                row
            }
            None => {
                let row = TrackedPost::upserted(None, post_id, counts, content, now);
                rows.push(row.clone());
                row
            }
        };

        self.write_table(&rows).await?;
        Ok(row)
    }

    async fn tracked_post(&self, post_id: &PostId) -> StoreResult<Option<TrackedPost>> {
        let _guard = self.lock.lock().await;
        Ok(self
            .read_table()
            .await?
            .into_iter()
            .find(|row| &row.post_id == post_id))
    }

    async fn tracked_posts(&self) -> StoreResult<Vec<TrackedPost>> {
        let _guard = self.lock.lock().await;
        self.read_table().await
    }

    async fn mark_comment_processed(&self, comment_id: &CommentId) -> StoreResult<bool> {
        let _guard = self.lock.lock().await;
        Self::append_unique(&self.paths.processed_comments, comment_id.as_str()).await
    }

    async fn is_comment_processed(&self, comment_id: &CommentId) -> StoreResult<bool> {
        let _guard = self.lock.lock().await;
        Ok(Self::read_id_log(&self.paths.processed_comments)
            .await?
            .iter()
            .any(|id| id == comment_id.as_str()))
    }

    async fn processed_comments(&self) -> StoreResult<HashSet<CommentId>> {
        let _guard = self.lock.lock().await;
        Ok(Self::read_id_log(&self.paths.processed_comments)
            .await?
            .into_iter()
            .map(CommentId::new)
            .collect())
    }
}
