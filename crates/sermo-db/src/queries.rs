use crate::models::{ChannelRow, DataRow, UserRow};
use crate::{Database, Lookup};
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

const USER_COLUMNS: &str = "userid, email, password, createdat, updatedat";
const CHANNEL_COLUMNS: &str = "channelid, channelname, maxpopulation, userid, createdat, updatedat";
const DATA_COLUMNS: &str = "id, strattr, intattr, createdat, updatedat";

/// Server-assigned timestamp, RFC 3339 UTC with microseconds.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    // -- Users --

    /// `password_hash` must already be hashed; `None` values are rejected by
    /// the NOT NULL constraints.
    pub fn create_user(&self, email: Option<&str>, password_hash: Option<&str>) -> Result<UserRow> {
        let id = Uuid::new_v4().to_string();
        self.with_conn(|conn| {
            // Taken under the lock so commit order and timestamp order agree.
            let now = timestamp();
            let row = conn.query_row(
                &format!(
                    "INSERT INTO users (userid, email, password, createdat, updatedat)
                     VALUES (?1, ?2, ?3, ?4, ?4) RETURNING {USER_COLUMNS}"
                ),
                rusqlite::params![id, email, password_hash, now],
                user_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_user(&self, id: &str) -> Result<Lookup<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE userid = ?1"),
                [id],
                user_from_row,
            )
            .lookup()
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Lookup<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                [email],
                user_from_row,
            )
            .lookup()
        })
    }

    pub fn list_users(&self, start: i64, count: i64) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY rowid LIMIT ?1 OFFSET ?2"
            ))?;
            let rows = stmt
                .query_map([count, start], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Overwrites the given fields and refreshes `updatedat`. `None` keeps the
    /// stored value.
    pub fn update_user(
        &self,
        id: &str,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Lookup<UserRow>> {
        self.with_conn(|conn| {
            let now = timestamp();
            conn.query_row(
                &format!(
                    "UPDATE users
                     SET email = COALESCE(?1, email), password = COALESCE(?2, password), updatedat = ?3
                     WHERE userid = ?4 RETURNING {USER_COLUMNS}"
                ),
                rusqlite::params![email, password_hash, now, id],
                user_from_row,
            )
            .lookup()
        })
    }

    /// Deleting a user also removes the channels it owns.
    pub fn delete_user(&self, id: &str) -> Result<Lookup<()>> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM users WHERE userid = ?1", [id])?;
            Ok(deleted(removed))
        })
    }

    // -- Channels --

    pub fn create_channel(
        &self,
        name: Option<&str>,
        max_population: Option<i64>,
        user_id: Option<&str>,
    ) -> Result<ChannelRow> {
        let id = Uuid::new_v4().to_string();
        self.with_conn(|conn| {
            let now = timestamp();
            let row = conn.query_row(
                &format!(
                    "INSERT INTO channels (channelid, channelname, maxpopulation, userid, createdat, updatedat)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING {CHANNEL_COLUMNS}"
                ),
                rusqlite::params![id, name, max_population, user_id, now],
                channel_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_channel(&self, id: &str) -> Result<Lookup<ChannelRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {CHANNEL_COLUMNS} FROM channels WHERE channelid = ?1"),
                [id],
                channel_from_row,
            )
            .lookup()
        })
    }

    pub fn list_channels(&self, start: i64, count: i64) -> Result<Vec<ChannelRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHANNEL_COLUMNS} FROM channels ORDER BY rowid LIMIT ?1 OFFSET ?2"
            ))?;
            let rows = stmt
                .query_map([count, start], channel_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_channel(
        &self,
        id: &str,
        name: Option<&str>,
        max_population: Option<i64>,
    ) -> Result<Lookup<ChannelRow>> {
        self.with_conn(|conn| {
            let now = timestamp();
            conn.query_row(
                &format!(
                    "UPDATE channels
                     SET channelname = COALESCE(?1, channelname),
                         maxpopulation = COALESCE(?2, maxpopulation),
                         updatedat = ?3
                     WHERE channelid = ?4 RETURNING {CHANNEL_COLUMNS}"
                ),
                rusqlite::params![name, max_population, now, id],
                channel_from_row,
            )
            .lookup()
        })
    }

    pub fn delete_channel(&self, id: &str) -> Result<Lookup<()>> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM channels WHERE channelid = ?1", [id])?;
            Ok(deleted(removed))
        })
    }

    // -- Data --

    pub fn create_data(&self, str_attr: Option<&str>, int_attr: Option<i64>) -> Result<DataRow> {
        let id = Uuid::new_v4().to_string();
        self.with_conn(|conn| {
            let now = timestamp();
            let row = conn.query_row(
                &format!(
                    "INSERT INTO data (id, strattr, intattr, createdat, updatedat)
                     VALUES (?1, ?2, ?3, ?4, ?4) RETURNING {DATA_COLUMNS}"
                ),
                rusqlite::params![id, str_attr, int_attr, now],
                data_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_data(&self, id: &str) -> Result<Lookup<DataRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {DATA_COLUMNS} FROM data WHERE id = ?1"),
                [id],
                data_from_row,
            )
            .lookup()
        })
    }

    pub fn list_data(&self, start: i64, count: i64) -> Result<Vec<DataRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DATA_COLUMNS} FROM data ORDER BY rowid LIMIT ?1 OFFSET ?2"
            ))?;
            let rows = stmt
                .query_map([count, start], data_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_data(
        &self,
        id: &str,
        str_attr: Option<&str>,
        int_attr: Option<i64>,
    ) -> Result<Lookup<DataRow>> {
        self.with_conn(|conn| {
            let now = timestamp();
            conn.query_row(
                &format!(
                    "UPDATE data
                     SET strattr = COALESCE(?1, strattr), intattr = COALESCE(?2, intattr), updatedat = ?3
                     WHERE id = ?4 RETURNING {DATA_COLUMNS}"
                ),
                rusqlite::params![str_attr, int_attr, now, id],
                data_from_row,
            )
            .lookup()
        })
    }

    pub fn delete_data(&self, id: &str) -> Result<Lookup<()>> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM data WHERE id = ?1", [id])?;
            Ok(deleted(removed))
        })
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        userid: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        createdat: row.get(3)?,
        updatedat: row.get(4)?,
    })
}

fn channel_from_row(row: &Row<'_>) -> rusqlite::Result<ChannelRow> {
    Ok(ChannelRow {
        channelid: row.get(0)?,
        channelname: row.get(1)?,
        maxpopulation: row.get(2)?,
        userid: row.get(3)?,
        createdat: row.get(4)?,
        updatedat: row.get(5)?,
    })
}

fn data_from_row(row: &Row<'_>) -> rusqlite::Result<DataRow> {
    Ok(DataRow {
        id: row.get(0)?,
        strattr: row.get(1)?,
        intattr: row.get(2)?,
        createdat: row.get(3)?,
        updatedat: row.get(4)?,
    })
}

fn deleted(removed: usize) -> Lookup<()> {
    if removed == 0 {
        Lookup::NotFound
    } else {
        Lookup::Found(())
    }
}

/// Turns "no rows" into `Lookup::NotFound`; every other error stays an error.
trait LookupExt<T> {
    fn lookup(self) -> Result<Lookup<T>>;
}

impl<T> LookupExt<T> for std::result::Result<T, rusqlite::Error> {
    fn lookup(self) -> Result<Lookup<T>> {
        match self {
            Ok(val) => Ok(Lookup::Found(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Lookup::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
