//! # Redis
//!
//! Durable home of every contact submission.
//!
//! ## Layout
//!
//! - One hash per record: `contact:<uuid>` holding `id`, `fullName`, `email`,
//!   `phoneNumber`, `message`, `createdAt`, `updatedAt`
//! - One list, `contacts`, of record ids in insertion order
//! - Both writes go through a single `MULTI`/`EXEC` pipeline, so a failed
//!   insert leaves neither behind
//!
//! Records are written once and never updated or deleted from here. There is
//! no deduplication: the same payload submitted twice is two records.
use std::time::Duration;

use async_trait::async_trait;
use redis::{
    Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::info;

use crate::{
    error::PersistenceError,
    models::{StoredRecord, Submission},
};

pub const CONTACT_PREFIX: &str = "contact";
pub const CONTACT_INDEX: &str = "contacts";

#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    async fn insert(&self, submission: Submission) -> Result<StoredRecord, PersistenceError>;
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_secs(2));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    info!("Connected to Redis");

    Ok(connection_manager)
}

pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl RecordStore for RedisStore {
    async fn insert(&self, submission: Submission) -> Result<StoredRecord, PersistenceError> {
        let record = StoredRecord::new(submission);
        let id = record.id.to_string();

        // ConnectionManager is a cheap handle onto one multiplexed connection
        let mut connection = self.connection.clone();

        redis::pipe()
            .atomic()
            .hset_multiple(record_key(&id), &record_fields(&record))
            .ignore()
            .rpush(CONTACT_INDEX, &id)
            .ignore()
            .query_async::<()>(&mut connection)
            .await?;

        Ok(record)
    }
}

pub fn record_key(id: &str) -> String {
    format!("{CONTACT_PREFIX}:{id}")
}

fn record_fields(record: &StoredRecord) -> [(&'static str, String); 7] {
    let submission = &record.submission;

    [
        ("id", record.id.to_string()),
        ("fullName", submission.full_name.clone()),
        ("email", submission.email.clone()),
        ("phoneNumber", submission.phone_number.clone()),
        ("message", submission.message.clone()),
        ("createdAt", record.created_at.to_rfc3339()),
        ("updatedAt", record.updated_at.to_rfc3339()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Submission {
        Submission {
            full_name: "Jane Doe".into(),
            email: "jane@x.com".into(),
            phone_number: "555-1234".into(),
            message: "hi".into(),
        }
    }

    #[test]
    fn record_key_is_prefixed() {
        assert_eq!(record_key("abc"), "contact:abc");
    }

    #[test]
    fn hash_carries_every_field_verbatim() {
        let record = StoredRecord::new(jane());
        let fields = record_fields(&record);

        assert_eq!(fields[0], ("id", record.id.to_string()));
        assert_eq!(fields[1], ("fullName", "Jane Doe".to_string()));
        assert_eq!(fields[2], ("email", "jane@x.com".to_string()));
        assert_eq!(fields[3], ("phoneNumber", "555-1234".to_string()));
        assert_eq!(fields[4], ("message", "hi".to_string()));
        assert_eq!(fields[5].1, fields[6].1);
    }

    #[test]
    fn every_record_gets_its_own_id() {
        assert_ne!(StoredRecord::new(jane()).id, StoredRecord::new(jane()).id);
    }
}
