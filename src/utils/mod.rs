//! Project-specific utilities live here.

use std::fmt::Debug;

use anyhow::{ensure, Context};
use chrono::{DateTime, Duration, Utc};
use saboga_db::bson::{self, Document};
use saboga_db::DocumentStore;
use serde::{de::DeserializeOwned, Serialize};

/// Formats a shared log prefix for project logs.
pub fn log_prefix(module: &str) -> String {
    format!("saboga::{module}")
}

/// BSON timestamp `days` whole days before `now`, at millisecond precision.
pub fn days_before(now: DateTime<Utc>, days: i64) -> bson::DateTime {
    bson::DateTime::from_millis((now - Duration::days(days)).timestamp_millis())
}

/// Encode records as BSON documents, keeping their order.
pub fn to_documents<T: Serialize>(records: &[T]) -> anyhow::Result<Vec<Document>> {
    records
        .iter()
        .map(|record| bson::to_document(record).context("failed to encode record"))
        .collect()
}

/// Read `collection` back and check it holds exactly `expected`. Both sides
/// are ordered by `key`, then compared pairwise with `same`.
pub async fn verify_collection<T, K, F, S>(
    store: &dyn DocumentStore,
    collection: &str,
    expected: &[T],
    key: F,
    same: S,
) -> anyhow::Result<()>
where
    T: DeserializeOwned + Debug + Clone,
    K: Ord,
    F: Fn(&T) -> K,
    S: Fn(&T, &T) -> bool,
{
    let stored = store
        .find_all(collection)
        .await
        .with_context(|| format!("failed to read collection '{collection}'"))?;

    let mut actual = stored
        .into_iter()
        .map(bson::from_document::<T>)
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to decode documents from '{collection}'"))?;

    ensure!(
        actual.len() == expected.len(),
        "collection '{}' holds {} documents, expected {}",
        collection,
        actual.len(),
        expected.len()
    );

    let mut expected = expected.to_vec();
    actual.sort_by_key(|record| key(record));
    expected.sort_by_key(|record| key(record));

    for (found, wanted) in actual.iter().zip(&expected) {
        ensure!(
            same(found, wanted),
            "collection '{}' mismatch: found {:?}, expected {:?}",
            collection,
            found,
            wanted
        );
    }

    Ok(())
}
