//! Exchange service — the backend facade over wallets and conversions.
//!
//! Owns the reference data and the store. Every operation either reads
//! the static tables (translation, previews, rate verification) or goes
//! through the store (links, commits, history).
//!
//! Conversion lifecycle:
//!   validate → quote → debit/credit/record (one transaction) → completed
//! A request that fails validation is recorded as `ConversionRejected`
//! and returned to the caller; no balance moves.

use crate::{
    config::ExchangeConfig,
    conversion::ConversionQuote,
    error::{ExchangeError, ExchangeResult},
    event::ExchangeEvent,
    narrative::{NarrativeSource, Storyteller, ValueNarrative},
    program::Program,
    rate_board::RateVerification,
    store::{ConversionRecord, ExchangeStore, WalletRow},
    translator::{PointTranslator, TranslateQuery, TranslatedReward},
    types::{round_cents, Points},
};
use serde::{Deserialize, Serialize};

pub const STATUS_COMPLETED: &str = "completed";

/// A wallet with its dollar value under the canonical rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub program:             Program,
    pub external_account_id: String,
    pub balance:             Points,
    pub dollar_value:        f64,
}

pub struct ExchangeService {
    config: ExchangeConfig,
    store:  ExchangeStore,
}

impl ExchangeService {
    pub fn new(config: ExchangeConfig, store: ExchangeStore) -> Self {
        Self { config, store }
    }

    /// Service over the test config and a migrated in-memory store.
    pub fn in_memory_test() -> ExchangeResult<Self> {
        let store = ExchangeStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(ExchangeConfig::default_test(), store))
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    pub fn store(&self) -> &ExchangeStore {
        &self.store
    }

    pub fn translator(&self) -> PointTranslator<'_> {
        PointTranslator::new(&self.config.rate_table, &self.config.catalog)
    }

    // ── Wallets ────────────────────────────────────────────────────

    pub fn link_account(
        &self,
        user_id: &str,
        program: Program,
        external_account_id: &str,
        opening_balance: Points,
    ) -> ExchangeResult<WalletRow> {
        if opening_balance < 0 {
            return Err(ExchangeError::NegativeBalance {
                balance: opening_balance,
            });
        }
        if self.store.wallet(user_id, program)?.is_some() {
            return Err(ExchangeError::AlreadyLinked {
                user_id: user_id.to_string(),
                program: program.to_string(),
            });
        }

        let wallet = self
            .store
            .insert_wallet(user_id, program, external_account_id, opening_balance)?;
        self.store.append_event(&ExchangeEvent::AccountLinked {
            user_id:             user_id.to_string(),
            program,
            external_account_id: external_account_id.to_string(),
            opening_balance,
        })?;

        log::info!("exchange: linked {program} for {user_id} with {opening_balance} pts");
        Ok(wallet)
    }

    pub fn balances(&self, user_id: &str) -> ExchangeResult<Vec<WalletBalance>> {
        let wallets = self.store.wallets_for_user(user_id)?;
        Ok(wallets
            .into_iter()
            .map(|w| WalletBalance {
                dollar_value: round_cents(
                    self.config.rate_table.points_dollar_value(w.balance, w.program),
                ),
                program: w.program,
                external_account_id: w.external_account_id,
                balance: w.balance,
            })
            .collect())
    }

    // ── Conversions ────────────────────────────────────────────────

    /// Quote without touching any wallet. Uses the same calculator as
    /// `commit_conversion`, so the figures match.
    pub fn preview_conversion(
        &self,
        from: Program,
        to: Program,
        amount: Points,
    ) -> ExchangeResult<ConversionQuote> {
        if from == to {
            return Err(ExchangeError::SameProgram {
                program: from.to_string(),
            });
        }
        let rate = self.config.rate_board.rate(from, to)?;
        self.config.calculator.quote(amount, rate)
    }

    pub fn commit_conversion(
        &self,
        user_id: &str,
        from: Program,
        to: Program,
        amount: Points,
    ) -> ExchangeResult<ConversionRecord> {
        match self.try_commit(user_id, from, to, amount) {
            Ok(record) => {
                log::info!(
                    "exchange: {user_id} converted {amount} {from} -> {} {to} ({})",
                    record.net_amount,
                    record.conversion_id
                );
                Ok(record)
            }
            Err(e) if e.is_validation() => {
                log::warn!("exchange: rejected {amount} {from} -> {to} for {user_id}: {e}");
                self.store.append_event(&ExchangeEvent::ConversionRejected {
                    user_id:      user_id.to_string(),
                    from_program: from,
                    to_program:   to,
                    amount,
                    reason:       e.to_string(),
                })?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn try_commit(
        &self,
        user_id: &str,
        from: Program,
        to: Program,
        amount: Points,
    ) -> ExchangeResult<ConversionRecord> {
        let quote = self.preview_conversion(from, to, amount)?;

        let source = self.require_wallet(user_id, from)?;
        let destination = self.require_wallet(user_id, to)?;
        if source.balance < amount {
            return Err(ExchangeError::InsufficientBalance {
                program:   from.to_string(),
                requested: amount,
                available: source.balance,
            });
        }
        if destination.balance.checked_add(quote.net_amount).is_none() {
            return Err(ExchangeError::BalanceOverflow {
                program: to.to_string(),
                balance: destination.balance,
                credit:  quote.net_amount,
            });
        }

        let record = ConversionRecord {
            conversion_id: uuid::Uuid::new_v4().to_string(),
            user_id:       user_id.to_string(),
            from_program:  from,
            to_program:    to,
            amount_in:     quote.source_amount,
            rate:          quote.rate,
            gross_amount:  quote.destination_amount,
            fee:           quote.fee,
            net_amount:    quote.net_amount,
            status:        STATUS_COMPLETED.to_string(),
            created_at:    chrono::Utc::now().to_rfc3339(),
        };
        let event = ExchangeEvent::ConversionCommitted {
            conversion_id: record.conversion_id.clone(),
            user_id:       record.user_id.clone(),
            from_program:  from,
            to_program:    to,
            amount_in:     record.amount_in,
            net_amount:    record.net_amount,
            fee:           record.fee,
        };

        self.store.apply_conversion(&record, &event)?;
        Ok(record)
    }

    pub fn history(&self, user_id: &str, limit: usize) -> ExchangeResult<Vec<ConversionRecord>> {
        self.store.conversion_history(user_id, limit)
    }

    // ── Translation and narratives ─────────────────────────────────

    /// Translate a linked wallet's balance into rewards.
    pub fn translate_wallet(
        &self,
        user_id: &str,
        program: Program,
        query: &TranslateQuery,
    ) -> ExchangeResult<Vec<TranslatedReward>> {
        let wallet = self.require_wallet(user_id, program)?;
        Ok(self.translator().translate_points(wallet.balance, program, query))
    }

    /// Rewards a linked wallet can pay for, most expensive first.
    pub fn affordable_for_wallet(
        &self,
        user_id: &str,
        program: Program,
    ) -> ExchangeResult<Vec<TranslatedReward>> {
        let wallet = self.require_wallet(user_id, program)?;
        Ok(self.translator().affordable_rewards(program, wallet.balance))
    }

    /// "What are my points worth" for a linked wallet. Source failures
    /// degrade to the fallback narrative.
    pub fn narrative(
        &self,
        user_id: &str,
        program: Program,
        source: Option<&dyn NarrativeSource>,
    ) -> ExchangeResult<ValueNarrative> {
        let wallet = self.require_wallet(user_id, program)?;
        let storyteller = Storyteller::new(self.translator(), &self.config.fallback_table);
        Ok(storyteller.describe(wallet.balance, program, source))
    }

    pub fn verify_rates(&self) -> Vec<RateVerification> {
        self.config
            .rate_board
            .verify(&self.config.rate_table, self.config.verification_tolerance)
    }

    fn require_wallet(&self, user_id: &str, program: Program) -> ExchangeResult<WalletRow> {
        self.store
            .wallet(user_id, program)?
            .ok_or_else(|| ExchangeError::WalletNotLinked {
                user_id: user_id.to_string(),
                program: program.to_string(),
            })
    }
}
