//! Runs against a live server only when `SABOGA_TEST_MONGODB_URI` is set.

use saboga_db::bson::{doc, oid::ObjectId};
use saboga_db::{DbError, DocumentStore, IndexSpec, MongoStore, RoleGrant, UserSpec};

const URI_ENV: &str = "SABOGA_TEST_MONGODB_URI";
const DATABASE: &str = "saboga_store_test";

async fn connect() -> Option<(MongoStore, mongodb::Database)> {
    let uri = std::env::var(URI_ENV).ok()?;
    let store = MongoStore::connect(&uri, DATABASE)
        .await
        .expect("test server should be reachable");
    let admin = mongodb::Client::with_uri_str(&uri)
        .await
        .expect("test server should be reachable")
        .database(DATABASE);
    Some((store, admin))
}

fn user(name: &str, password: &str) -> UserSpec {
    UserSpec {
        name: name.to_string(),
        password: password.to_string(),
        roles: vec![RoleGrant {
            role: "readWrite".to_string(),
            db: DATABASE.to_string(),
        }],
    }
}

#[tokio::test]
async fn test_clear_insert_and_unique_index() {
    let Some((store, _)) = connect().await else {
        eprintln!("{URI_ENV} not set; skipping");
        return;
    };

    store.clear("games").await.unwrap();
    let index = IndexSpec::ascending(&["bgg_id"]).unique();
    store.ensure_index("games", &index).await.unwrap();
    store.ensure_index("games", &index).await.unwrap();

    let inserted = store
        .insert_many("games", vec![doc! { "bgg_id": 1 }, doc! { "bgg_id": 2 }])
        .await
        .unwrap();
    assert_eq!(inserted, 2);
    assert_eq!(store.insert_many("games", Vec::new()).await.unwrap(), 0);

    let err = store
        .insert_many("games", vec![doc! { "bgg_id": 1 }])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::DuplicateKey { ref index, .. } if index == "bgg_id_1"));

    assert_eq!(store.find_all("games").await.unwrap().len(), 2);
    assert_eq!(store.clear("games").await.unwrap(), 2);
}

#[tokio::test]
async fn test_index_declared_under_another_name_is_accepted() {
    let Some((store, admin)) = connect().await else {
        eprintln!("{URI_ENV} not set; skipping");
        return;
    };

    let collection = format!("ranked_{}", ObjectId::new());
    let model = mongodb::IndexModel::builder()
        .keys(doc! { "bgg_rank": 1 })
        .options(
            mongodb::options::IndexOptions::builder()
                .name("bgg_rank_idx".to_string())
                .build(),
        )
        .build();
    admin
        .collection::<mongodb::bson::Document>(&collection)
        .create_index(model)
        .await
        .unwrap();

    store
        .ensure_index(&collection, &IndexSpec::ascending(&["bgg_rank"]))
        .await
        .unwrap();

    admin
        .collection::<mongodb::bson::Document>(&collection)
        .drop()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_user_lifecycle_and_access_check() {
    let Some((store, admin)) = connect().await else {
        eprintln!("{URI_ENV} not set; skipping");
        return;
    };

    let name = format!("seed-user-{}", ObjectId::new());
    store.create_user(&user(&name, "test")).await.unwrap();

    let err = store.create_user(&user(&name, "test")).await.unwrap_err();
    assert!(matches!(err, DbError::UserExists { .. }));

    store.check_access(&user(&name, "test")).await.unwrap();
    let collections = admin.list_collection_names().await.unwrap();
    assert!(!collections.iter().any(|c| c == "seed_access_probe"));

    let err = store.check_access(&user(&name, "wrong")).await.unwrap_err();
    assert!(matches!(err, DbError::AccessDenied { .. }), "{err:?}");

    store.update_user(&user(&name, "rotated")).await.unwrap();
    store.check_access(&user(&name, "rotated")).await.unwrap();
    assert!(store.check_access(&user(&name, "test")).await.is_err());

    admin
        .run_command(doc! { "dropUser": name.as_str() })
        .await
        .unwrap();
}
