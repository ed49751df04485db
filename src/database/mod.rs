mod mongo;

#[cfg(test)]
pub mod memory;

pub use mongo::MongoDB;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Admission, College, Review, UpdateAck, User, UserCreation};

pub const COLLEGES: &str = "colleges";
pub const ADMISSIONS: &str = "admissions";
pub const REVIEWS: &str = "reviews";
pub const USERS: &str = "users";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("'{0}' is not a valid document id")]
    InvalidId(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The four collections behind the HTTP surface. Every method is one round trip.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_colleges(&self) -> StoreResult<Vec<College>>;

    /// Case-insensitive literal substring match on `name`. `None` matches everything.
    async fn search_colleges(&self, needle: Option<&str>) -> StoreResult<Vec<College>>;

    async fn find_college(&self, id: &str) -> StoreResult<Option<College>>;

    async fn insert_admission(&self, admission: Admission) -> StoreResult<String>;

    async fn admissions_for(&self, candidate_email: &str) -> StoreResult<Vec<Admission>>;

    async fn insert_review(&self, review: Review) -> StoreResult<String>;

    /// Newest insertion first.
    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;

    /// Inserts unless a user with the same email exists. Must be atomic.
    async fn create_user(&self, user: User) -> StoreResult<UserCreation>;

    async fn find_user(&self, email: &str) -> StoreResult<Option<User>>;

    /// `$set` the fields on the user with this email, inserting it when absent.
    async fn upsert_user(&self, email: &str, fields: Map<String, Value>) -> StoreResult<UpdateAck>;

    async fn ping(&self) -> StoreResult<()>;
}
