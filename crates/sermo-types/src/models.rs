use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. `password` always holds an argon2 hash, never the
/// plaintext the client submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub userid: Uuid,
    pub email: String,
    pub password: String,
    pub createdat: DateTime<Utc>,
    pub updatedat: DateTime<Utc>,
}

/// A chat channel owned by a user. Removed together with its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub channelid: Uuid,
    pub channelname: String,
    pub maxpopulation: i64,
    pub userid: Uuid,
    pub createdat: DateTime<Utc>,
    pub updatedat: DateTime<Utc>,
}

/// Generic record with one unique string attribute and one integer attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data {
    pub id: Uuid,
    pub strattr: String,
    pub intattr: i64,
    pub createdat: DateTime<Utc>,
    pub updatedat: DateTime<Utc>,
}
