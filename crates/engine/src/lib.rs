//! Expense-splitting engine.
//!
//! The engine owns the bill-splitting rules: how a total is divided among
//! participants ([`compute_split`]) and how a transaction and its shares are
//! written, read and removed as one unit ([`Engine`]).

pub use accounts::Account;
pub use commands::{CreateTransactionCmd, ParticipantInput, UpdateTransactionCmd};
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use participants::ParticipantShare;
pub use split::{SplitShare, SplitStrategy, compute_split, split_with};
pub use transactions::Transaction;

mod accounts;
mod commands;
mod error;
mod money;
mod ops;
mod participants;
mod split;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
