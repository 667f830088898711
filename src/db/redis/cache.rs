use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::fmt::Display;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};
use crate::models::MovieId;

/// Keys for cached catalog responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    PopularMovies(u32),
    TopRatedMovies(u32),
    MovieSearch { query: String, page: u32 },
    MovieDetails(MovieId),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::PopularMovies(page) => write!(f, "catalog:popular:{}", page),
            CacheKey::TopRatedMovies(page) => write!(f, "catalog:top_rated:{}", page),
            CacheKey::MovieSearch { query, page } => write!(
                f,
                "catalog:search:{}:{}",
                query.trim().to_lowercase(),
                page
            ),
            CacheKey::MovieDetails(id) => write!(f, "catalog:movie:{}", id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Pending write for the background writer
struct CacheWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed cache for catalog responses
///
/// Reads go straight to Redis. Writes are queued and applied by a background
/// task so a slow cache never delays a response.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
    write_tx: mpsc::UnboundedSender<CacheWrite>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Stops the writer after it has applied every queued write
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
        tracing::info!("Cache writer stopped");
    }
}

impl Cache {
    /// Connects to Redis and spawns the background writer
    pub async fn new(redis_client: Client) -> AppResult<(Self, CacheWriterHandle)> {
        let connection = ConnectionManager::new(redis_client).await?;
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(run_writer(connection.clone(), write_rx, shutdown_rx));

        let cache = Self {
            connection,
            write_tx,
        };

        Ok((cache, CacheWriterHandle { shutdown_tx, task }))
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                tracing::debug!(key = %key, "Cache hit");
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => {
                tracing::debug!(key = %key, "Cache miss");
                Ok(None)
            }
        }
    }

    /// Queues a value for storage with a TTL in seconds; never blocks
    ///
    /// Serialization or queueing failures are logged and otherwise ignored,
    /// since a missed cache write only costs a future upstream call.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let value = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache serialization error");
                return;
            }
        };

        let write = CacheWrite {
            key: key.to_string(),
            value,
            ttl,
        };

        if self.write_tx.send(write).is_err() {
            tracing::warn!(key = %key, "Cache writer is gone, dropping write");
        }
    }
}

async fn apply_write(connection: &mut ConnectionManager, write: CacheWrite) {
    let result: redis::RedisResult<()> = connection.set_ex(&write.key, write.value, write.ttl).await;
    if let Err(e) = result {
        tracing::error!(key = %write.key, error = %e, "Failed to write to Redis cache");
    }
}

/// Applies queued writes until shutdown, then drains what is left
async fn run_writer(
    mut connection: ConnectionManager,
    mut write_rx: mpsc::UnboundedReceiver<CacheWrite>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    tracing::info!("Cache writer task started");

    loop {
        tokio::select! {
            Some(write) = write_rx.recv() => apply_write(&mut connection, write).await,
            _ = shutdown_rx.recv() => break,
        }
    }

    // Senders live on in cloned caches; close so the drain terminates
    write_rx.close();
    let mut flushed = 0usize;
    while let Some(write) = write_rx.recv().await {
        apply_write(&mut connection, write).await;
        flushed += 1;
    }

    tracing::info!(flushed, "Cache writer flushed pending writes");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_popular() {
        assert_eq!(CacheKey::PopularMovies(2).to_string(), "catalog:popular:2");
    }

    #[test]
    fn test_cache_key_top_rated() {
        assert_eq!(
            CacheKey::TopRatedMovies(1).to_string(),
            "catalog:top_rated:1"
        );
    }

    #[test]
    fn test_cache_key_search_is_normalized() {
        let key = CacheKey::MovieSearch {
            query: "  The MATRIX ".to_string(),
            page: 1,
        };
        assert_eq!(key.to_string(), "catalog:search:the matrix:1");
    }

    #[test]
    fn test_cache_key_search_includes_page() {
        let first = CacheKey::MovieSearch {
            query: "alien".to_string(),
            page: 1,
        };
        let second = CacheKey::MovieSearch {
            query: "alien".to_string(),
            page: 2,
        };
        assert_ne!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_cache_key_movie_details() {
        assert_eq!(CacheKey::MovieDetails(27205).to_string(), "catalog:movie:27205");
    }

    #[test]
    fn test_create_redis_client_rejects_bad_url() {
        assert!(create_redis_client("not a url").is_err());
        assert!(create_redis_client("redis://localhost:6379").is_ok());
    }
}
