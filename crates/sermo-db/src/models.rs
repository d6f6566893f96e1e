//! Database row types. These map directly to SQLite rows.
//! Distinct from sermo-types API models to keep the DB layer independent.

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub userid: String,
    pub email: String,
    pub password: String,
    pub createdat: String,
    pub updatedat: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRow {
    pub channelid: String,
    pub channelname: String,
    pub maxpopulation: i64,
    pub userid: String,
    pub createdat: String,
    pub updatedat: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub id: String,
    pub strattr: String,
    pub intattr: i64,
    pub createdat: String,
    pub updatedat: String,
}
