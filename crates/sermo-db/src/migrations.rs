use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Creates the schema. Safe to run against an existing database.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            userid      TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            createdat   TEXT NOT NULL,
            updatedat   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS channels (
            channelid       TEXT PRIMARY KEY,
            channelname     TEXT NOT NULL UNIQUE,
            maxpopulation   INTEGER NOT NULL CHECK (maxpopulation >= 1),
            userid          TEXT NOT NULL REFERENCES users(userid) ON DELETE CASCADE,
            createdat       TEXT NOT NULL,
            updatedat       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_channels_user
            ON channels(userid);

        CREATE TABLE IF NOT EXISTS data (
            id          TEXT PRIMARY KEY,
            strattr     TEXT NOT NULL UNIQUE,
            intattr     INTEGER NOT NULL,
            createdat   TEXT NOT NULL,
            updatedat   TEXT NOT NULL
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
