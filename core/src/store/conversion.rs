use super::{program_at, ConversionRecord, ExchangeStore};
use crate::{
    error::{ExchangeError, ExchangeResult},
    event::ExchangeEvent,
};
use rusqlite::{params, OptionalExtension};

impl ExchangeStore {
    // ── Conversions ────────────────────────────────────────────────

    /// Debit the source wallet, credit the destination wallet, persist the
    /// record and its event, all in one transaction. The debit only
    /// applies when the balance covers it; otherwise nothing is written.
    pub fn apply_conversion(
        &self,
        record: &ConversionRecord,
        event: &ExchangeEvent,
    ) -> ExchangeResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let debited = tx.execute(
            "UPDATE linked_account SET balance = balance - ?1
             WHERE user_id = ?2 AND program = ?3 AND balance >= ?1",
            params![record.amount_in, record.user_id, record.from_program.code()],
        )?;
        if debited != 1 {
            let available: i64 = tx
                .query_row(
                    "SELECT balance FROM linked_account WHERE user_id = ?1 AND program = ?2",
                    params![record.user_id, record.from_program.code()],
                    |row| row.get(0),
                )
                .optional()?
                .unwrap_or(0);
            return Err(ExchangeError::InsufficientBalance {
                program:   record.from_program.to_string(),
                requested: record.amount_in,
                available,
            });
        }

        let credited = tx.execute(
            "UPDATE linked_account SET balance = balance + ?1
             WHERE user_id = ?2 AND program = ?3",
            params![record.net_amount, record.user_id, record.to_program.code()],
        )?;
        if credited != 1 {
            return Err(ExchangeError::WalletNotLinked {
                user_id: record.user_id.clone(),
                program: record.to_program.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO conversion (
                conversion_id, user_id, from_program, to_program,
                amount_in, rate, gross_amount, fee, net_amount, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                record.conversion_id,
                record.user_id,
                record.from_program.code(),
                record.to_program.code(),
                record.amount_in,
                record.rate,
                record.gross_amount,
                record.fee,
                record.net_amount,
                record.status,
                record.created_at,
            ],
        )?;

        tx.execute(
            "INSERT INTO event_log (user_id, event_type, payload, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                event.user_id(),
                event.type_name(),
                serde_json::to_string(event)?,
                record.created_at,
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Conversions for a user, newest first.
    pub fn conversion_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> ExchangeResult<Vec<ConversionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT conversion_id, user_id, from_program, to_program,
                    amount_in, rate, gross_amount, fee, net_amount, status, created_at
             FROM conversion WHERE user_id = ?1
             ORDER BY rowid DESC
             LIMIT ?2",
        )?;
        let records = stmt
            .query_map(params![user_id, limit as i64], |row| {
                Ok(ConversionRecord {
                    conversion_id: row.get(0)?,
                    user_id:       row.get(1)?,
                    from_program:  program_at(row, 2)?,
                    to_program:    program_at(row, 3)?,
                    amount_in:     row.get(4)?,
                    rate:          row.get(5)?,
                    gross_amount:  row.get(6)?,
                    fee:           row.get(7)?,
                    net_amount:    row.get(8)?,
                    status:        row.get(9)?,
                    created_at:    row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn conversion_count(&self, user_id: &str) -> ExchangeResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM conversion WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
