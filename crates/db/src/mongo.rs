//! MongoDB-backed document store

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{ClientOptions, Credential, IndexOptions},
    Client, Collection, Database, IndexModel,
};

use crate::error::{self, DbError};
use crate::{DocumentStore, IndexSpec, UserSpec};

/// Collection [`MongoStore`] writes its access probe into; dropped after each check.
const ACCESS_PROBE_COLLECTION: &str = "seed_access_probe";

/// Store bound to one database of a MongoDB deployment.
pub struct MongoStore {
    client: Client,
    options: ClientOptions,
    database: String,
}

impl MongoStore {
    /// Connect to `uri` and ping `database` so failures surface before any seeding.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, DbError> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options.clone())?;

        client.database(database).run_command(doc! { "ping": 1 }).await?;

        tracing::info!(target: "saboga-db", database, "connected to mongodb");

        Ok(Self {
            client,
            options,
            database: database.to_string(),
        })
    }

    fn db(&self) -> Database {
        self.client.database(&self.database)
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db().collection(name)
    }

    fn role_documents(user: &UserSpec) -> Vec<Document> {
        user.roles
            .iter()
            .map(|grant| doc! { "role": grant.role.as_str(), "db": grant.db.as_str() })
            .collect()
    }

    /// Probe collection reached through a client authenticated as `user`.
    fn probe_collection(&self, user: &UserSpec) -> Result<Collection<Document>, DbError> {
        let mut options = self.options.clone();
        options.credential = Some(
            Credential::builder()
                .username(user.name.clone())
                .password(user.password.clone())
                .source(self.database.clone())
                .build(),
        );

        let client = Client::with_options(options)?;
        Ok(client
            .database(&self.database)
            .collection(ACCESS_PROBE_COLLECTION))
    }

    /// Write, read back and delete one marker document. `Ok(false)` when the
    /// write succeeded but the document could not be found again.
    async fn round_trip(
        probes: &Collection<Document>,
        user: &UserSpec,
    ) -> Result<bool, mongodb::error::Error> {
        let marker = doc! { "probe": user.name.as_str(), "nonce": ObjectId::new() };
        probes.insert_one(&marker).await?;
        let found = probes.find_one(marker.clone()).await?;
        probes.delete_many(marker).await?;
        Ok(found.is_some())
    }

    fn access_error(&self, user: &UserSpec, err: mongodb::error::Error) -> DbError {
        if error::is_access_denied(&err) {
            DbError::access_denied(&user.name, &self.database, err.to_string())
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn database(&self) -> &str {
        &self.database
    }

    async fn create_user(&self, user: &UserSpec) -> Result<(), DbError> {
        let command = doc! {
            "createUser": user.name.as_str(),
            "pwd": user.password.as_str(),
            "roles": Self::role_documents(user),
        };

        match self.db().run_command(command).await {
            Ok(_) => Ok(()),
            Err(e) if error::is_user_exists(&e) => {
                Err(DbError::user_exists(&user.name, &self.database))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_user(&self, user: &UserSpec) -> Result<(), DbError> {
        let command = doc! {
            "updateUser": user.name.as_str(),
            "pwd": user.password.as_str(),
            "roles": Self::role_documents(user),
        };

        self.db().run_command(command).await?;
        Ok(())
    }

    async fn check_access(&self, user: &UserSpec) -> Result<(), DbError> {
        let probes = self.probe_collection(user)?;
        let outcome = Self::round_trip(&probes, user).await;
        // the probe collection never outlives the check
        let dropped = probes.drop().await;

        match outcome {
            Ok(true) => {}
            Ok(false) => {
                return Err(DbError::access_denied(
                    &user.name,
                    &self.database,
                    "probe document not readable",
                ))
            }
            Err(e) => return Err(self.access_error(user, e)),
        }

        dropped.map_err(|e| self.access_error(user, e))
    }

    async fn clear(&self, collection: &str) -> Result<u64, DbError> {
        let result = self.collection(collection).delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }

    async fn ensure_index(&self, collection: &str, index: &IndexSpec) -> Result<(), DbError> {
        let model = IndexModel::builder()
            .keys(index.key_document())
            .options(
                IndexOptions::builder()
                    .name(index.name.clone())
                    .unique(index.unique)
                    .build(),
            )
            .build();

        match self.collection(collection).create_index(model).await {
            Ok(_) => Ok(()),
            Err(e) if error::is_index_options_conflict(&e) => {
                tracing::warn!(
                    target: "saboga-db",
                    collection,
                    index = %index.name,
                    "index keys already exist under another name; keeping it"
                );
                Ok(())
            }
            Err(e) => match error::duplicate_key_message(&e) {
                Some(_) => Err(DbError::duplicate_key(collection, &index.name)),
                None => Err(e.into()),
            },
        }
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<usize, DbError> {
        // insertMany rejects an empty batch
        if docs.is_empty() {
            return Ok(0);
        }

        match self.collection(collection).insert_many(docs).await {
            Ok(result) => Ok(result.inserted_ids.len()),
            Err(e) => match error::duplicate_key_message(&e) {
                Some(message) => Err(DbError::duplicate_key(
                    collection,
                    error::index_from_message(&message),
                )),
                None => Err(e.into()),
            },
        }
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, DbError> {
        let cursor = self.collection(collection).find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}
