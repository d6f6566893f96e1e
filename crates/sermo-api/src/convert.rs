//! Row to wire conversions and path id parsing.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use sermo_db::models::{ChannelRow, DataRow, UserRow};
use sermo_types::models::{Channel, Data, User};

use crate::error::ApiError;

/// Parse the `{id}` path segment. A malformed id is reported as a 500 with the
/// parser's message, which existing clients rely on.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::Internal(e.to_string()))
}

pub fn user(row: UserRow) -> User {
    User {
        userid: uuid_or_default(&row.userid, "userid"),
        email: row.email,
        password: row.password,
        createdat: timestamp_or_default(&row.createdat, "createdat"),
        updatedat: timestamp_or_default(&row.updatedat, "updatedat"),
    }
}

pub fn channel(row: ChannelRow) -> Channel {
    Channel {
        channelid: uuid_or_default(&row.channelid, "channelid"),
        channelname: row.channelname,
        maxpopulation: row.maxpopulation,
        userid: uuid_or_default(&row.userid, "userid"),
        createdat: timestamp_or_default(&row.createdat, "createdat"),
        updatedat: timestamp_or_default(&row.updatedat, "updatedat"),
    }
}

pub fn data(row: DataRow) -> Data {
    Data {
        id: uuid_or_default(&row.id, "id"),
        strattr: row.strattr,
        intattr: row.intattr,
        createdat: timestamp_or_default(&row.createdat, "createdat"),
        updatedat: timestamp_or_default(&row.updatedat, "updatedat"),
    }
}

fn uuid_or_default(raw: &str, column: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", column, raw, e);
        Uuid::default()
    })
}

fn timestamp_or_default(raw: &str, column: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!("Corrupt {} '{}': {}", column, raw, e);
            DateTime::default()
        })
}
