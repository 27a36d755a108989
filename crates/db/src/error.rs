//! Error types surfaced by document stores

use mongodb::bson;
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// Server code returned by `createUser` when the user is already defined.
const USER_ALREADY_EXISTS: i32 = 51003;
/// Server code for unique index violations.
const DUPLICATE_KEY: i32 = 11000;
/// Server code for commands rejected by authorization.
const UNAUTHORIZED: i32 = 13;
/// Server code for an index whose keys already exist under another name.
const INDEX_OPTIONS_CONFLICT: i32 = 85;

/// Failures raised by [`crate::DocumentStore`] implementations.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("failed to encode document: {0}")]
    Serialize(#[from] bson::ser::Error),

    #[error("failed to decode document: {0}")]
    Deserialize(#[from] bson::de::Error),

    #[error("user '{name}' already exists on database '{database}'")]
    UserExists { name: String, database: String },

    #[error("duplicate key in collection '{collection}' for index '{index}'")]
    DuplicateKey { collection: String, index: String },

    #[error("user '{user}' cannot access database '{database}': {reason}")]
    AccessDenied {
        user: String,
        database: String,
        reason: String,
    },
}

impl DbError {
    /// Create a user exists error
    pub fn user_exists(name: impl Into<String>, database: impl Into<String>) -> Self {
        Self::UserExists {
            name: name.into(),
            database: database.into(),
        }
    }

    /// Create a duplicate key error
    pub fn duplicate_key(collection: impl Into<String>, index: impl Into<String>) -> Self {
        Self::DuplicateKey {
            collection: collection.into(),
            index: index.into(),
        }
    }

    /// Create an access denied error
    pub fn access_denied(
        user: impl Into<String>,
        database: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AccessDenied {
            user: user.into(),
            database: database.into(),
            reason: reason.into(),
        }
    }
}

pub(crate) fn is_user_exists(err: &mongodb::error::Error) -> bool {
    matches!(&*err.kind, ErrorKind::Command(c) if c.code == USER_ALREADY_EXISTS)
}

pub(crate) fn is_access_denied(err: &mongodb::error::Error) -> bool {
    match &*err.kind {
        ErrorKind::Authentication { .. } => true,
        ErrorKind::Command(c) => c.code == UNAUTHORIZED,
        _ => false,
    }
}

pub(crate) fn is_index_options_conflict(err: &mongodb::error::Error) -> bool {
    matches!(&*err.kind, ErrorKind::Command(c) if c.code == INDEX_OPTIONS_CONFLICT)
}

/// Returns the message of the first duplicate key write error, if any.
pub(crate) fn duplicate_key_message(err: &mongodb::error::Error) -> Option<String> {
    match &*err.kind {
        ErrorKind::InsertMany(failure) => failure
            .write_errors
            .as_ref()?
            .iter()
            .find(|e| e.code == DUPLICATE_KEY)
            .map(|e| e.message.clone()),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => {
            Some(e.message.clone())
        }
        ErrorKind::Command(c) if c.code == DUPLICATE_KEY => Some(c.message.clone()),
        _ => None,
    }
}

/// Pulls the index name out of a server duplicate key message
/// (`E11000 duplicate key error collection: db.c index: name dup key: ...`).
pub(crate) fn index_from_message(message: &str) -> String {
    message
        .split("index: ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_name_extraction() {
        let message = "E11000 duplicate key error collection: boardgames.boardgames \
                       index: bgg_id_1 dup key: { bgg_id: 1 }";
        assert_eq!(index_from_message(message), "bgg_id_1");
    }

    #[test]
    fn test_index_name_missing() {
        assert_eq!(index_from_message("E11000 duplicate key error"), "unknown");
    }

    #[test]
    fn test_error_display() {
        let error = DbError::user_exists("api-user", "boardgames");
        assert_eq!(
            error.to_string(),
            "user 'api-user' already exists on database 'boardgames'"
        );

        let error = DbError::duplicate_key("rankhistory", "bgg_id_1_date_1");
        assert_eq!(
            error.to_string(),
            "duplicate key in collection 'rankhistory' for index 'bgg_id_1_date_1'"
        );
    }
}
