use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Token claims --

/// Claims carried by every bearer token. The token only gates access, so
/// there is no subject claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub authorized: bool,
    pub client: String,
    pub exp: usize,
}

// -- Users --

/// Signup payload. Missing fields reach the store as NULL and are rejected
/// by its NOT NULL constraints.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Update payload. Absent fields keep their stored value; an absent or empty
/// password leaves the stored hash untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// -- Channels --

#[derive(Debug, Default, Deserialize)]
pub struct CreateChannelRequest {
    pub channelname: Option<String>,
    pub maxpopulation: Option<i64>,
    pub userid: Option<Uuid>,
}

/// The owning user of a channel cannot be changed.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateChannelRequest {
    pub channelname: Option<String>,
    pub maxpopulation: Option<i64>,
}

// -- Data --

#[derive(Debug, Default, Deserialize)]
pub struct CreateDataRequest {
    pub strattr: Option<String>,
    pub intattr: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDataRequest {
    pub strattr: Option<String>,
    pub intattr: Option<i64>,
}

// -- Responses --

/// Body returned by successful deletes, e.g. `{"result": "user deleted"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
