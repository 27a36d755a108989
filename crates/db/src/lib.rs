//! Document store abstraction backed by MongoDB, plus an in-memory store
//! used for dry runs and tests.

use async_trait::async_trait;

pub mod error;
pub mod memory;
pub mod mongo;

pub use error::DbError;
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use mongodb::bson;

use bson::Document;

/// A role granted to a database user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: String,
    pub db: String,
}

/// Credentials and roles for a user to create on the target database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSpec {
    pub name: String,
    pub password: String,
    pub roles: Vec<RoleGrant>,
}

impl UserSpec {
    /// Whether any role lets this user read and write `database`.
    pub fn can_read_write(&self, database: &str) -> bool {
        self.roles.iter().any(|grant| {
            grant.db == database && matches!(grant.role.as_str(), "readWrite" | "dbOwner")
        })
    }
}

/// Index definition; keys keep their declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: String,
    pub keys: Vec<(String, i32)>,
    pub unique: bool,
}

impl IndexSpec {
    /// Ascending index named the way the server names it by default
    /// (`bgg_id_1_date_1`), so clients declaring the same keys share it.
    pub fn ascending(fields: &[&str]) -> Self {
        let keys: Vec<(String, i32)> = fields.iter().map(|field| (field.to_string(), 1)).collect();
        Self {
            name: default_name(&keys),
            keys,
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Key document in the shape `createIndexes` expects.
    pub fn key_document(&self) -> Document {
        let mut keys = Document::new();
        for (field, direction) in &self.keys {
            keys.insert(field.clone(), *direction);
        }
        keys
    }
}

fn default_name(keys: &[(String, i32)]) -> String {
    keys.iter()
        .map(|(field, direction)| format!("{field}_{direction}"))
        .collect::<Vec<_>>()
        .join("_")
}

/// Operations the seeder needs from a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the database this store is bound to
    fn database(&self) -> &str;

    /// Create a user; fails with [`DbError::UserExists`] when already defined
    async fn create_user(&self, user: &UserSpec) -> Result<(), DbError>;

    /// Replace the password and roles of an existing user
    async fn update_user(&self, user: &UserSpec) -> Result<(), DbError>;

    /// Authenticate as `user` and exercise a write, a read and a delete
    async fn check_access(&self, user: &UserSpec) -> Result<(), DbError>;

    /// Delete every document in `collection`, returning how many were removed
    async fn clear(&self, collection: &str) -> Result<u64, DbError>;

    /// Create the index unless one with the same name or the same keys exists
    async fn ensure_index(&self, collection: &str, index: &IndexSpec) -> Result<(), DbError>;

    /// Insert documents in order, returning how many were inserted
    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<usize, DbError>;

    /// Every document in `collection`, in insertion order
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, DbError>;
}
