//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create/update), keeping
//! call sites readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::MoneyCents;

/// A participant as listed by the caller, before shares are computed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantInput {
    pub id: String,
    pub fractional_share: Option<i32>,
}

impl ParticipantInput {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fractional_share: None,
        }
    }

    #[must_use]
    pub fn fractional_share(mut self, weight: i32) -> Self {
        self.fractional_share = Some(weight);
        self
    }
}

/// Record a shared expense.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub payer_id: String,
    pub occurred_at: DateTime<Utc>,
    pub amount: MoneyCents,
    pub split_type: String,
    pub participants: Vec<ParticipantInput>,
}

impl CreateTransactionCmd {
    /// Starts an `equal` split with no participants.
    #[must_use]
    pub fn new(payer_id: impl Into<String>, amount: MoneyCents, occurred_at: DateTime<Utc>) -> Self {
        Self {
            payer_id: payer_id.into(),
            occurred_at,
            amount,
            split_type: "equal".to_string(),
            participants: Vec::new(),
        }
    }

    #[must_use]
    pub fn split_type(mut self, split_type: impl Into<String>) -> Self {
        self.split_type = split_type.into();
        self
    }

    #[must_use]
    pub fn participant(mut self, participant: ParticipantInput) -> Self {
        self.participants.push(participant);
        self
    }

    #[must_use]
    pub fn participants<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants
            .extend(ids.into_iter().map(ParticipantInput::new));
        self
    }

    /// Returns `true` if `account_id` is the payer or one of the participants.
    ///
    /// Ids are compared trimmed, as the engine stores them.
    pub fn involves(&self, account_id: &str) -> bool {
        let account_id = account_id.trim();
        self.payer_id.trim() == account_id
            || self.participants.iter().any(|p| p.id.trim() == account_id)
    }
}

/// Replace the payer and timestamp of an existing transaction.
///
/// Shares are left untouched.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub transaction_id: Uuid,
    pub actor_id: String,
    pub payer_id: String,
    pub occurred_at: DateTime<Utc>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(
        transaction_id: Uuid,
        actor_id: impl Into<String>,
        payer_id: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id,
            actor_id: actor_id.into(),
            payer_id: payer_id.into(),
            occurred_at,
        }
    }
}
