use super::{now_rfc3339, ExchangeStore};
use crate::{
    error::ExchangeResult,
    event::{EventLogEntry, ExchangeEvent},
};
use rusqlite::params;

impl ExchangeStore {
    // ── Event log ──────────────────────────────────────────────────

    pub fn append_event(&self, event: &ExchangeEvent) -> ExchangeResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (user_id, event_type, payload, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                event.user_id(),
                event.type_name(),
                serde_json::to_string(event)?,
                now_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Events for a user, oldest first.
    pub fn events_for_user(&self, user_id: &str) -> ExchangeResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, event_type, payload, recorded_at
             FROM event_log WHERE user_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![user_id], |row| {
                Ok(EventLogEntry {
                    id:          Some(row.get(0)?),
                    user_id:     row.get(1)?,
                    event_type:  row.get(2)?,
                    payload:     row.get(3)?,
                    recorded_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, user_id: &str, event_type: &str) -> ExchangeResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE user_id = ?1 AND event_type = ?2",
            params![user_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
