use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use tokio::task;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::models::TravelQuery;
use crate::{Outcome, SmartTravelError};

/// On-disk document for one travel query
#[derive(Serialize, Deserialize)]
struct StoredQuery {
    start_city: String,
    end_city: String,
    timestamp_micros: i64,
    route_summary: String,
}

/// Append-only log of submitted travel queries, backed by an embedded fjall database
#[derive(Clone)]
pub struct QueryStore {
    queries: Keyspace,
}

impl std::fmt::Debug for QueryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStore").finish_non_exhaustive()
    }
}

/// Raw `(key, value)` pairs as read from the keyspace
type Entries = Vec<(Vec<u8>, Vec<u8>)>;

fn read_all(store: Keyspace) -> std::result::Result<Entries, SmartTravelError> {
    let mut entries = Vec::new();
    for guard in store.iter() {
        let (key, value) = guard.into_inner()?;
        entries.push((key.to_vec(), value.to_vec()));
    }
    Ok(entries)
}

impl QueryStore {
    /// Open (or create) the fixed database and collection
    pub fn open(config: &StorageConfig) -> Result<Self> {
        Self::open_at(config.database_path(), &config.collection)
    }

    pub fn open_at(path: impl AsRef<Path>, collection: &str) -> Result<Self> {
        let path = path.as_ref();
        let db = fjall::Database::builder(path)
            .open()
            .with_context(|| format!("Failed to open query store at {}", path.display()))?;
        let queries = db
            .keyspace(collection, fjall::KeyspaceCreateOptions::default)
            .with_context(|| format!("Failed to open collection {collection}"))?;
        Ok(QueryStore { queries })
    }

    /// Insert a timestamped record. Returns the new id, or `None` when storage failed.
    #[tracing::instrument(name = "save_query", level = "debug", skip(self, route_summary))]
    pub async fn save(
        &self,
        start_city: &str,
        end_city: &str,
        route_summary: &str,
    ) -> Outcome<Option<String>> {
        match self.save_call(start_city, end_city, route_summary).await {
            Ok(id) => {
                tracing::debug!("Saved travel query {}", id);
                Outcome::Success(Some(id))
            }
            Err(e) => {
                tracing::warn!("Error saving travel query: {}", e);
                Outcome::degraded(None, e)
            }
        }
    }

    async fn save_call(
        &self,
        start_city: &str,
        end_city: &str,
        route_summary: &str,
    ) -> std::result::Result<String, SmartTravelError> {
        let id = Uuid::now_v7().to_string();
        let document = StoredQuery {
            start_city: start_city.to_string(),
            end_city: end_city.to_string(),
            timestamp_micros: Utc::now().timestamp_micros(),
            route_summary: route_summary.to_string(),
        };
        let bytes = postcard::to_stdvec(&document)?;

        let store = self.queries.clone();
        let key = id.clone().into_bytes();
        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(|e| SmartTravelError::storage(format!("Store task failed: {e}")))??;

        Ok(id)
    }

    /// Every stored query, newest first. Degrades to an empty list.
    #[tracing::instrument(name = "list_queries", level = "debug", skip(self))]
    pub async fn list_all(&self) -> Outcome<Vec<TravelQuery>> {
        match self.list_call().await {
            Ok(queries) => {
                tracing::debug!("Loaded {} travel queries", queries.len());
                Outcome::Success(queries)
            }
            Err(e) => {
                tracing::warn!("Error getting history: {}", e);
                Outcome::degraded(Vec::new(), e)
            }
        }
    }

    async fn list_call(&self) -> std::result::Result<Vec<TravelQuery>, SmartTravelError> {
        let store = self.queries.clone();
        let entries = task::spawn_blocking(move || read_all(store))
            .await
            .map_err(|e| SmartTravelError::storage(format!("Store task failed: {e}")))??;

        let mut queries: Vec<TravelQuery> = entries
            .into_iter()
            .filter_map(|(key, value)| match decode(&key, &value) {
                Ok(query) => Some(query),
                Err(e) => {
                    tracing::warn!("Skipping unreadable travel query: {}", e);
                    None
                }
            })
            .collect();

        newest_first(&mut queries);
        Ok(queries)
    }
}

/// Descending by timestamp, ties broken by the time-ordered id
fn newest_first(queries: &mut [TravelQuery]) {
    queries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn decode(key: &[u8], value: &[u8]) -> std::result::Result<TravelQuery, SmartTravelError> {
    let id = String::from_utf8(key.to_vec())
        .map_err(|e| SmartTravelError::storage(format!("Invalid record id: {e}")))?;
    let document: StoredQuery = postcard::from_bytes(value)?;
    let timestamp = DateTime::<Utc>::from_timestamp_micros(document.timestamp_micros)
        .ok_or_else(|| SmartTravelError::storage(format!("Invalid timestamp in record {id}")))?;

    Ok(TravelQuery {
        id,
        start_city: document.start_city,
        end_city: document.end_city,
        timestamp,
        route_summary: document.route_summary,
    })
}
