use crate::{
    error::ExchangeResult,
    exchange_service::ExchangeService,
    program::Program,
    translator::TranslateQuery,
    types::{Points, UserId},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Requests accepted by the runner's command loop, one JSON object per line.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExchangeCommand {
    // ── Wallets ───────────────────────────────────
    LinkAccount {
        user_id:             UserId,
        program:             Program,
        external_account_id: String,
        #[serde(default)]
        opening_balance:     Points,
    },
    Balances {
        user_id: UserId,
    },

    // ── Conversions ───────────────────────────────
    Preview {
        from:   Program,
        to:     Program,
        amount: Points,
    },
    Convert {
        user_id: UserId,
        from:    Program,
        to:      Program,
        amount:  Points,
    },
    History {
        user_id: UserId,
        #[serde(default)]
        limit:   Option<usize>,
    },

    // ── Translation ───────────────────────────────
    /// Raw program code: unknown codes use the default coefficient.
    Translate {
        points:  Points,
        program: String,
        #[serde(flatten)]
        query:   TranslateQuery,
    },
    Affordable {
        user_id: UserId,
        program: Program,
    },
    Narrative {
        user_id: UserId,
        program: Program,
    },
    VerifyRates,

    Quit,
}

impl ExchangeService {
    /// Execute one command and render its result as JSON.
    /// `Quit` is handled by the caller and renders as `null` here.
    pub fn dispatch(&self, command: &ExchangeCommand) -> ExchangeResult<Value> {
        let value = match command {
            ExchangeCommand::LinkAccount {
                user_id,
                program,
                external_account_id,
                opening_balance,
            } => serde_json::to_value(self.link_account(
                user_id,
                *program,
                external_account_id,
                *opening_balance,
            )?)?,
            ExchangeCommand::Balances { user_id } => {
                serde_json::to_value(self.balances(user_id)?)?
            }
            ExchangeCommand::Preview { from, to, amount } => {
                serde_json::to_value(self.preview_conversion(*from, *to, *amount)?)?
            }
            ExchangeCommand::Convert {
                user_id,
                from,
                to,
                amount,
            } => serde_json::to_value(self.commit_conversion(user_id, *from, *to, *amount)?)?,
            ExchangeCommand::History { user_id, limit } => serde_json::to_value(
                self.history(user_id, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))?,
            )?,
            ExchangeCommand::Translate {
                points,
                program,
                query,
            } => {
                let translator = self.translator();
                json!({
                    "dollar_value": self.config().rate_table.coefficient_for_code(program)
                        * *points as f64,
                    "rewards": translator.translate_points_for_code(*points, program, query),
                })
            }
            ExchangeCommand::Affordable { user_id, program } => {
                serde_json::to_value(self.affordable_for_wallet(user_id, *program)?)?
            }
            ExchangeCommand::Narrative { user_id, program } => {
                serde_json::to_value(self.narrative(user_id, *program, None)?)?
            }
            ExchangeCommand::VerifyRates => serde_json::to_value(self.verify_rates())?,
            ExchangeCommand::Quit => Value::Null,
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_json_lines() {
        let cmd: ExchangeCommand = serde_json::from_str(
            r#"{"type": "translate", "points": 5000, "program": "bonvoy", "order": "best_value"}"#,
        )
        .unwrap();
        match cmd {
            ExchangeCommand::Translate { points, program, query } => {
                assert_eq!(points, 5000);
                assert_eq!(program, "bonvoy");
                assert_eq!(query.order, crate::translator::RewardOrder::BestValue);
                assert!(query.balance_cap.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cmd: ExchangeCommand =
            serde_json::from_str(r#"{"type": "history", "user_id": "u1"}"#).unwrap();
        assert!(matches!(cmd, ExchangeCommand::History { limit: None, .. }));
    }
}
