//! The exchange event log.
//!
//! Every state change made by the service (a link, a committed
//! conversion) and every rejected request is recorded here as JSON.
//! Variants are appended, never removed or reordered.

use crate::{
    program::Program,
    types::{EntityId, Points, UserId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExchangeEvent {
    // ── Wallet events ──────────────────────────────
    AccountLinked {
        user_id:             UserId,
        program:             Program,
        external_account_id: String,
        opening_balance:     Points,
    },

    // ── Conversion events ──────────────────────────
    ConversionCommitted {
        conversion_id: EntityId,
        user_id:       UserId,
        from_program:  Program,
        to_program:    Program,
        amount_in:     Points,
        net_amount:    Points,
        fee:           Points,
    },
    ConversionRejected {
        user_id:      UserId,
        from_program: Program,
        to_program:   Program,
        amount:       Points,
        reason:       String,
    },
}

impl ExchangeEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::AccountLinked { .. }       => "account_linked",
            Self::ConversionCommitted { .. } => "conversion_committed",
            Self::ConversionRejected { .. }  => "conversion_rejected",
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Self::AccountLinked { user_id, .. }
            | Self::ConversionCommitted { user_id, .. }
            | Self::ConversionRejected { user_id, .. } => user_id,
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:          Option<i64>,
    pub user_id:     UserId,
    pub event_type:  String,
    pub payload:     String, // JSON-serialized ExchangeEvent
    pub recorded_at: String, // RFC 3339, UTC
}

impl EventLogEntry {
    pub fn event(&self) -> serde_json::Result<ExchangeEvent> {
        serde_json::from_str(&self.payload)
    }
}
