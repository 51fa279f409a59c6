//! Transaction primitives.
//!
//! A `Transaction` is a shared expense: a payer, a total amount and the
//! ordered shares owed by each participant. The shares always sum to the
//! total.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, SplitStrategy, util::parse_uuid};

use super::{
    accounts,
    participants::{self, ParticipantShare},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub payer_id: String,
    pub occurred_at: DateTime<Utc>,
    pub split_type: SplitStrategy,
    pub amount: MoneyCents,
    pub shares: Vec<ParticipantShare>,
}

impl Transaction {
    /// Builds a new transaction, checking that `shares` is non-empty and adds
    /// up to `amount`.
    pub fn new(
        payer_id: String,
        occurred_at: DateTime<Utc>,
        split_type: SplitStrategy,
        amount: MoneyCents,
        shares: Vec<ParticipantShare>,
    ) -> ResultEngine<Self> {
        if shares.is_empty() {
            return Err(EngineError::InvalidParticipants(
                "at least one participant is required".to_string(),
            ));
        }
        let sum = shares
            .iter()
            .try_fold(MoneyCents::ZERO, |acc, share| acc.checked_add(share.amount))
            .ok_or_else(|| EngineError::InvalidAmount("shares overflow".to_string()))?;
        if sum != amount {
            return Err(EngineError::InvalidAmount(format!(
                "shares sum to {sum}, expected {amount}"
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            payer_id,
            occurred_at,
            split_type,
            amount,
            shares,
        })
    }

    /// Rebuilds a transaction from its header and participant rows, each
    /// paired with the participant's account when it could be loaded.
    pub(crate) fn from_parts(
        model: Model,
        participant_models: Vec<(participants::Model, Option<accounts::Model>)>,
    ) -> ResultEngine<Self> {
        let mut participant_models = participant_models;
        participant_models.sort_by_key(|(p, _)| p.position);

        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            payer_id: model.payer_id,
            occurred_at: model.occurred_at,
            split_type: SplitStrategy::try_from(model.split_type.as_str())?,
            amount: MoneyCents::new(model.amount_minor),
            shares: participant_models
                .into_iter()
                .map(ParticipantShare::from)
                .collect(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub payer_id: String,
    pub occurred_at: DateTimeUtc,
    pub split_type: String,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::PayerId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Payer,
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            payer_id: ActiveValue::Set(tx.payer_id.clone()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            split_type: ActiveValue::Set(tx.split_type.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
        }
    }
}
