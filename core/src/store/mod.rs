//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The service calls store methods; it never executes SQL directly.

mod conversion;
mod event_log;
mod wallet;

use crate::{error::ExchangeResult, program::Program, types::{EntityId, Points, UserId}};
use rusqlite::{types::Type, Connection, Row};
use serde::{Deserialize, Serialize};

pub struct ExchangeStore {
    conn: Connection,
}

/// A linked loyalty-program account and its balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRow {
    pub user_id:             UserId,
    pub program:             Program,
    pub external_account_id: String,
    pub balance:             Points,
    pub linked_at:           String,
}

/// A committed conversion as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub conversion_id: EntityId,
    pub user_id:       UserId,
    pub from_program:  Program,
    pub to_program:    Program,
    pub amount_in:     Points,
    pub rate:          f64,
    pub gross_amount:  Points,
    pub fee:           Points,
    pub net_amount:    Points,
    pub status:        String,
    pub created_at:    String,
}

impl ExchangeStore {
    /// Open (or create) the exchange database at `path`.
    pub fn open(path: &str) -> ExchangeResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ExchangeResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply the embedded schema. Idempotent.
    pub fn migrate(&self) -> ExchangeResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_exchange.sql"))?;
        Ok(())
    }
}

/// Read a program code column, failing the row on unknown codes.
fn program_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Program> {
    let code: String = row.get(idx)?;
    code.parse::<Program>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
