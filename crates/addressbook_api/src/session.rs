//! Per-request database session.
//!
//! # Invariants
//! - One connection per request; it is closed when the session drops, on
//!   success and error paths alike.
//! - The connection is migrated before any repository sees it.

use addressbook_core::db::{open_db, DbResult};
use log::debug;
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

pub(crate) struct DbSession {
    conn: Connection,
    operation: &'static str,
    opened_at: Instant,
}

impl DbSession {
    pub(crate) fn open(path: &Path, operation: &'static str) -> DbResult<Self> {
        let conn = open_db(path)?;
        debug!("event=db_session module=api status=open operation={operation}");
        Ok(Self {
            conn,
            operation,
            opened_at: Instant::now(),
        })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for DbSession {
    fn drop(&mut self) {
        debug!(
            "event=db_session module=api status=closed operation={} duration_ms={}",
            self.operation,
            self.opened_at.elapsed().as_millis()
        );
    }
}
