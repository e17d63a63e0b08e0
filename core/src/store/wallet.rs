use super::{now_rfc3339, program_at, ExchangeStore, WalletRow};
use crate::{error::ExchangeResult, program::Program, types::Points};
use rusqlite::{params, OptionalExtension};

impl ExchangeStore {
    // ── Linked accounts ───────────────────────────────────────────

    pub fn insert_wallet(
        &self,
        user_id: &str,
        program: Program,
        external_account_id: &str,
        balance: Points,
    ) -> ExchangeResult<WalletRow> {
        let linked_at = now_rfc3339();
        self.conn.execute(
            "INSERT INTO linked_account (user_id, program, external_account_id, balance, linked_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, program.code(), external_account_id, balance, linked_at],
        )?;
        Ok(WalletRow {
            user_id: user_id.to_string(),
            program,
            external_account_id: external_account_id.to_string(),
            balance,
            linked_at,
        })
    }

    pub fn wallet(&self, user_id: &str, program: Program) -> ExchangeResult<Option<WalletRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT user_id, program, external_account_id, balance, linked_at
                 FROM linked_account WHERE user_id = ?1 AND program = ?2",
                params![user_id, program.code()],
                |row| {
                    Ok(WalletRow {
                        user_id:             row.get(0)?,
                        program:             program_at(row, 1)?,
                        external_account_id: row.get(2)?,
                        balance:             row.get(3)?,
                        linked_at:           row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// All wallets for a user, in program code order.
    pub fn wallets_for_user(&self, user_id: &str) -> ExchangeResult<Vec<WalletRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, program, external_account_id, balance, linked_at
             FROM linked_account WHERE user_id = ?1
             ORDER BY program ASC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(WalletRow {
                user_id:             row.get(0)?,
                program:             program_at(row, 1)?,
                external_account_id: row.get(2)?,
                balance:             row.get(3)?,
                linked_at:           row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn wallet_balance(&self, user_id: &str, program: Program) -> ExchangeResult<Option<Points>> {
        let balance = self
            .conn
            .query_row(
                "SELECT balance FROM linked_account WHERE user_id = ?1 AND program = ?2",
                params![user_id, program.code()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(balance)
    }
}
