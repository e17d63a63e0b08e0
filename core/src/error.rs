use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Amount must be greater than zero, got {amount}")]
    InvalidAmount { amount: i64 },

    #[error("Opening balance cannot be negative, got {balance}")]
    NegativeBalance { balance: i64 },

    #[error("Exchange rate must be a positive number, got {rate}")]
    InvalidRate { rate: f64 },

    #[error("No published rate from {from} to {to}")]
    RateUnavailable { from: String, to: String },

    #[error("Cannot convert {program} into itself")]
    SameProgram { program: String },

    #[error("Unknown program '{code}'")]
    UnknownProgram { code: String },

    #[error("No {program} account linked for user '{user_id}'")]
    WalletNotLinked { user_id: String, program: String },

    #[error("A {program} account is already linked for user '{user_id}'")]
    AlreadyLinked { user_id: String, program: String },

    #[error("Insufficient {program} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        program:   String,
        requested: i64,
        available: i64,
    },

    #[error("Converting {amount} points leaves nothing to credit after rounding and fees")]
    AmountTooSmall { amount: i64 },

    #[error("Crediting {credit} {program} would overflow the balance of {balance}")]
    BalanceOverflow {
        program: String,
        balance: i64,
        credit:  i64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExchangeError {
    /// True for errors caused by caller input rather than infrastructure.
    /// These are surfaced to the end user verbatim.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::NegativeBalance { .. }
                | Self::InvalidRate { .. }
                | Self::RateUnavailable { .. }
                | Self::SameProgram { .. }
                | Self::UnknownProgram { .. }
                | Self::WalletNotLinked { .. }
                | Self::AlreadyLinked { .. }
                | Self::InsufficientBalance { .. }
                | Self::AmountTooSmall { .. }
                | Self::BalanceOverflow { .. }
        )
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;
