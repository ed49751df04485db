use std::time::Duration;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_document, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Cursor, Database, IndexModel};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::{Store, StoreError, StoreResult, ADMISSIONS, COLLEGES, REVIEWS, USERS};
use crate::models::{Admission, College, Review, UpdateAck, User, UserCreation};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> StoreResult<Self> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.app_name = Some("college-flow-service".to_string());

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the service relies on. The unique users(email)
    /// index is required; without it duplicate users could be inserted.
    async fn ensure_indexes(&self) -> StoreResult<()> {
        log::info!("🔧 Creating database indexes...");

        if let Err(e) = self.collection(USERS).create_index(users_email_index()).await {
            log::error!("❌ Could not create users(email) unique index: {}", e);
            return Err(e.into());
        }
        log::info!("   ✅ Index created: users(email) unique");

        let admissions_index = IndexModel::builder()
            .keys(doc! { "candidate_email": 1 })
            .build();

        match self.collection(ADMISSIONS).create_index(admissions_index).await {
            Ok(_) => log::info!("   ✅ Index created: admissions(candidate_email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl Store for MongoDB {
    async fn list_colleges(&self) -> StoreResult<Vec<College>> {
        collect(self.collection(COLLEGES).find(doc! {}).await?).await
    }

    async fn search_colleges(&self, needle: Option<&str>) -> StoreResult<Vec<College>> {
        let filter = match needle {
            Some(text) => doc! { "name": { "$regex": escape_regex(text), "$options": "i" } },
            None => doc! {},
        };

        collect(self.collection(COLLEGES).find(filter).await?).await
    }

    async fn find_college(&self, id: &str) -> StoreResult<Option<College>> {
        let object_id = ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;

        self.collection(COLLEGES)
            .find_one(doc! { "_id": object_id })
            .await?
            .map(decode)
            .transpose()
    }

    async fn insert_admission(&self, admission: Admission) -> StoreResult<String> {
        let result = self.collection(ADMISSIONS).insert_one(encode(&admission)?).await?;
        Ok(id_to_string(result.inserted_id))
    }

    async fn admissions_for(&self, candidate_email: &str) -> StoreResult<Vec<Admission>> {
        let filter = doc! { "candidate_email": candidate_email };
        collect(self.collection(ADMISSIONS).find(filter).await?).await
    }

    async fn insert_review(&self, review: Review) -> StoreResult<String> {
        let result = self.collection(REVIEWS).insert_one(encode(&review)?).await?;
        Ok(id_to_string(result.inserted_id))
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let cursor = self
            .collection(REVIEWS)
            .find(doc! {})
            .sort(doc! { "_id": -1 })
            .await?;

        collect(cursor).await
    }

    async fn create_user(&self, user: User) -> StoreResult<UserCreation> {
        let users = self.collection(USERS);
        if users.find_one(doc! { "email": user.email.as_str() }).await?.is_some() {
            return Ok(UserCreation::AlreadyExists);
        }

        // Concurrent inserts past the check are stopped by the unique index
        match users.insert_one(encode(&user)?).await {
            Ok(result) => Ok(UserCreation::Created(id_to_string(result.inserted_id))),
            Err(e) if is_duplicate_key(&e) => Ok(UserCreation::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, email: &str) -> StoreResult<Option<User>> {
        self.collection(USERS)
            .find_one(doc! { "email": email })
            .await?
            .map(decode)
            .transpose()
    }

    async fn upsert_user(&self, email: &str, fields: Map<String, Value>) -> StoreResult<UpdateAck> {
        // An empty $set is rejected by older servers; the filter's email is
        // copied into an upserted document either way.
        let update = if fields.is_empty() {
            doc! { "$setOnInsert": { "email": email } }
        } else {
            let set = to_document(&fields)?;
            doc! { "$set": set }
        };

        let result = self
            .collection(USERS)
            .update_one(doc! { "email": email }, update)
            .upsert(true)
            .await?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id.map(id_to_string),
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

async fn collect<T: DeserializeOwned>(cursor: Cursor<Document>) -> StoreResult<Vec<T>> {
    let documents: Vec<Document> = cursor.try_collect().await?;
    Ok(decode_all(documents))
}

/// Decodes a listing, skipping documents that do not fit the record type.
fn decode_all<T: DeserializeOwned>(documents: Vec<Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get("_id").cloned();
            match decode(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("⚠️  Skipping undecodable document {:?}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

fn users_email_index() -> IndexModel {
    let unique = IndexOptions::builder()
        .unique(true)
        .name("email_unique".to_string())
        .build();

    IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(unique)
        .build()
}

/// Decodes a stored document, exposing `_id` as its hex string.
fn decode<T: DeserializeOwned>(mut document: Document) -> StoreResult<T> {
    if let Ok(object_id) = document.get_object_id("_id") {
        document.insert("_id", object_id.to_hex());
    }

    Ok(serde_json::from_value(Bson::Document(document).into_relaxed_extjson())?)
}

/// Encodes a record for insertion. The server assigns `_id`.
fn encode<T: Serialize>(record: &T) -> StoreResult<Document> {
    let mut document = to_document(record)?;
    document.remove("_id");
    Ok(document)
}

fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(object_id) => object_id.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

/// Escapes regex metacharacters so search text is matched literally.
fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if r"\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("mit"), "mit");
        assert_eq!(escape_regex("a.b (c)"), r"a\.b \(c\)");
        assert_eq!(escape_regex("C++"), r"C\+\+");
    }

    #[test]
    fn test_decode_exposes_hex_id() {
        let object_id = ObjectId::new();
        let document = doc! { "_id": object_id, "name": "MIT Institute", "rank": 1 };

        let college: College = decode(document).unwrap();
        assert_eq!(college.id, Some(object_id.to_hex()));
        assert_eq!(college.extra["rank"], json!(1));
    }

    #[test]
    fn test_encode_strips_client_id() {
        let review: Review = serde_json::from_value(json!({ "_id": "client-chosen", "rating": 5 })).unwrap();
        let document = encode(&review).unwrap();
        assert!(!document.contains_key("_id"));
        assert!(document.contains_key("rating"));
    }

    #[test]
    fn test_decode_all_skips_malformed_documents() {
        let documents = vec![
            doc! { "_id": ObjectId::new(), "name": "MIT Institute", "gallery": ["a.jpg"] },
            doc! { "_id": ObjectId::new(), "name": "Broken", "gallery": [1, 2] },
            doc! { "_id": ObjectId::new(), "name": 42 },
        ];

        let colleges: Vec<College> = decode_all(documents);
        assert_eq!(colleges.len(), 1);
        assert_eq!(colleges[0].name.as_deref(), Some("MIT Institute"));
    }

    #[test]
    fn test_users_email_index_is_unique() {
        let index = users_email_index();
        assert_eq!(index.keys, doc! { "email": 1 });
        assert_eq!(index.options.and_then(|o| o.unique), Some(true));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_refuses_to_start_over_duplicate_users() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db_name = format!("collegeFlowDB_dupes_{}", ObjectId::new().to_hex());

        let client = mongodb::Client::with_uri_str(&uri).await.unwrap();
        let users = client.database(&db_name).collection::<Document>(USERS);
        users
            .insert_many(vec![doc! { "email": "a@x.com" }, doc! { "email": "a@x.com" }])
            .await
            .unwrap();

        let started = MongoDB::new(&uri, &db_name).await;
        client.database(&db_name).drop().await.unwrap();

        assert!(started.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_user_is_created_once() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::new(&uri, "collegeFlowDB_test").await.unwrap();

        let email = format!("{}@test.local", uuid::Uuid::new_v4());
        let user = User {
            id: None,
            email: email.clone(),
            name: Some("Test".into()),
            extra: Map::new(),
        };

        assert!(matches!(db.create_user(user.clone()).await.unwrap(), UserCreation::Created(_)));
        assert_eq!(db.create_user(user).await.unwrap(), UserCreation::AlreadyExists);
    }
}
