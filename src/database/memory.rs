//! In-process store used by handler tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value};

use super::{Store, StoreError, StoreResult};
use crate::models::{Admission, College, Review, UpdateAck, User, UserCreation};

#[derive(Default)]
struct Collections {
    colleges: Vec<College>,
    admissions: Vec<Admission>,
    reviews: Vec<Review>,
    users: Vec<User>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn with_colleges(colleges: Vec<College>) -> Self {
        let colleges = colleges
            .into_iter()
            .map(|mut college| {
                college.id.get_or_insert_with(|| ObjectId::new().to_hex());
                college
            })
            .collect();

        Self {
            inner: Mutex::new(Collections {
                colleges,
                ..Default::default()
            }),
        }
    }

    pub fn admission_count(&self) -> usize {
        self.lock().admissions.len()
    }

    pub fn review_count(&self) -> usize {
        self.lock().reviews.len()
    }

    pub fn user_count(&self, email: &str) -> usize {
        self.lock().users.iter().filter(|u| u.email == email).count()
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.inner.lock().expect("memory store poisoned")
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_colleges(&self) -> StoreResult<Vec<College>> {
        Ok(self.lock().colleges.clone())
    }

    async fn search_colleges(&self, needle: Option<&str>) -> StoreResult<Vec<College>> {
        let needle = needle.map(str::to_lowercase);
        Ok(self
            .lock()
            .colleges
            .iter()
            .filter(|college| match &needle {
                Some(text) => college
                    .name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(text.as_str())),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn find_college(&self, id: &str) -> StoreResult<Option<College>> {
        ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;
        Ok(self
            .lock()
            .colleges
            .iter()
            .find(|college| college.id.as_deref() == Some(id))
            .cloned())
    }

    async fn insert_admission(&self, mut admission: Admission) -> StoreResult<String> {
        let id = ObjectId::new().to_hex();
        admission.id = Some(id.clone());
        self.lock().admissions.push(admission);
        Ok(id)
    }

    async fn admissions_for(&self, candidate_email: &str) -> StoreResult<Vec<Admission>> {
        Ok(self
            .lock()
            .admissions
            .iter()
            .filter(|a| a.candidate_email == candidate_email)
            .cloned()
            .collect())
    }

    async fn insert_review(&self, mut review: Review) -> StoreResult<String> {
        let id = ObjectId::new().to_hex();
        review.id = Some(id.clone());
        self.lock().reviews.push(review);
        Ok(id)
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.lock().reviews.iter().rev().cloned().collect())
    }

    async fn create_user(&self, mut user: User) -> StoreResult<UserCreation> {
        let mut collections = self.lock();
        if collections.users.iter().any(|u| u.email == user.email) {
            return Ok(UserCreation::AlreadyExists);
        }

        let id = ObjectId::new().to_hex();
        user.id = Some(id.clone());
        collections.users.push(user);
        Ok(UserCreation::Created(id))
    }

    async fn find_user(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn upsert_user(&self, email: &str, fields: Map<String, Value>) -> StoreResult<UpdateAck> {
        let mut collections = self.lock();

        if let Some(user) = collections.users.iter_mut().find(|u| u.email == email) {
            let Value::Object(mut current) = serde_json::to_value(&*user)? else {
                unreachable!("users serialize to objects");
            };

            let mut modified = false;
            for (key, value) in fields {
                if current.get(&key) != Some(&value) {
                    current.insert(key, value);
                    modified = true;
                }
            }
            *user = serde_json::from_value(Value::Object(current))?;

            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_count: 0,
                upserted_id: None,
            });
        }

        let id = ObjectId::new().to_hex();
        let mut document = fields;
        document.insert("_id".to_string(), Value::String(id.clone()));
        document.insert("email".to_string(), Value::String(email.to_string()));
        collections.users.push(serde_json::from_value(Value::Object(document))?);

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
