//! In-process document store used for dry runs and tests.
//!
//! Mirrors the server semantics the seeder relies on: `_id` assignment,
//! unique index enforcement, and user/role bookkeeping.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use crate::{DbError, DocumentStore, IndexSpec, UserSpec};

#[derive(Default)]
struct State {
    collections: BTreeMap<String, Vec<Document>>,
    indexes: BTreeMap<String, Vec<IndexSpec>>,
    users: BTreeMap<String, UserSpec>,
}

/// Document store that keeps everything in memory.
pub struct MemoryStore {
    database: String,
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            state: RwLock::new(State::default()),
        }
    }

    /// Copy of every collection, keyed by collection name
    pub async fn snapshot(&self) -> BTreeMap<String, Vec<Document>> {
        self.state.read().await.collections.clone()
    }

    /// Look up a user created through [`DocumentStore::create_user`]
    pub async fn user(&self, name: &str) -> Option<UserSpec> {
        self.state.read().await.users.get(name).cloned()
    }

    /// Names of the indexes defined on `collection`
    pub async fn index_names(&self, collection: &str) -> Vec<String> {
        self.state
            .read()
            .await
            .indexes
            .get(collection)
            .map(|indexes| indexes.iter().map(|index| index.name.clone()).collect())
            .unwrap_or_default()
    }
}

fn index_key(index: &IndexSpec, doc: &Document) -> Vec<Bson> {
    index
        .keys
        .iter()
        .map(|(field, _)| doc.get(field).cloned().unwrap_or(Bson::Null))
        .collect()
}

/// First unique index violated when `incoming` joins `existing`.
fn violated_index<'a>(
    indexes: &'a [IndexSpec],
    existing: &[Document],
    incoming: &[Document],
) -> Option<&'a IndexSpec> {
    indexes.iter().filter(|index| index.unique).find(|index| {
        let mut seen: Vec<Vec<Bson>> = existing.iter().map(|d| index_key(index, d)).collect();
        incoming.iter().any(|doc| {
            let key = index_key(index, doc);
            if seen.contains(&key) {
                true
            } else {
                seen.push(key);
                false
            }
        })
    })
}

fn with_object_id(doc: Document) -> Document {
    if doc.contains_key("_id") {
        return doc;
    }

    let mut stored = Document::new();
    stored.insert("_id", ObjectId::new());
    for (key, value) in doc {
        stored.insert(key, value);
    }
    stored
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn database(&self) -> &str {
        &self.database
    }

    async fn create_user(&self, user: &UserSpec) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.name) {
            return Err(DbError::user_exists(&user.name, &self.database));
        }
        state.users.insert(user.name.clone(), user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &UserSpec) -> Result<(), DbError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&user.name) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(DbError::access_denied(
                &user.name,
                &self.database,
                "user not found",
            )),
        }
    }

    async fn check_access(&self, user: &UserSpec) -> Result<(), DbError> {
        let state = self.state.read().await;
        let stored = state.users.get(&user.name).ok_or_else(|| {
            DbError::access_denied(&user.name, &self.database, "authentication failed")
        })?;

        if stored.password != user.password {
            return Err(DbError::access_denied(
                &user.name,
                &self.database,
                "authentication failed",
            ));
        }

        if !stored.can_read_write(&self.database) {
            return Err(DbError::access_denied(
                &user.name,
                &self.database,
                "not authorized for read and write",
            ));
        }

        Ok(())
    }

    async fn clear(&self, collection: &str) -> Result<u64, DbError> {
        let mut state = self.state.write().await;
        let removed = state
            .collections
            .get_mut(collection)
            .map(|docs| docs.drain(..).count())
            .unwrap_or(0);
        Ok(removed as u64)
    }

    async fn ensure_index(&self, collection: &str, index: &IndexSpec) -> Result<(), DbError> {
        let mut state = self.state.write().await;

        let defined = state.indexes.entry(collection.to_string()).or_default();
        if defined
            .iter()
            .any(|existing| existing.name == index.name || existing.keys == index.keys)
        {
            return Ok(());
        }

        let docs = state.collections.get(collection).cloned().unwrap_or_default();
        if violated_index(std::slice::from_ref(index), &[], &docs).is_some() {
            return Err(DbError::duplicate_key(collection, &index.name));
        }

        state
            .indexes
            .entry(collection.to_string())
            .or_default()
            .push(index.clone());
        Ok(())
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<usize, DbError> {
        let mut state = self.state.write().await;
        let docs: Vec<Document> = docs.into_iter().map(with_object_id).collect();

        let indexes = state.indexes.get(collection).cloned().unwrap_or_default();
        let existing = state.collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);
        if let Some(index) = violated_index(&indexes, existing, &docs) {
            return Err(DbError::duplicate_key(collection, &index.name));
        }

        let inserted = docs.len();
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .extend(docs);
        Ok(inserted)
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, DbError> {
        let state = self.state.read().await;
        Ok(state.collections.get(collection).cloned().unwrap_or_default())
    }
}
