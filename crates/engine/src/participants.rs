//! Transaction participants.
//!
//! One row per participant of a [`Transaction`](crate::Transaction), holding
//! the amount that participant owes in minor units. `position` keeps the
//! listing order the shares were computed in.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MoneyCents;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantShare {
    pub participant_id: String,
    pub amount: MoneyCents,
    /// Weight supplied by the client, stored as-is.
    pub fractional_share: Option<i32>,
    /// Display name of the participant's account. Filled on reads only.
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transaction_participants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_id: String,
    pub position: i32,
    pub amount_minor: i64,
    pub fractional_share: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Transactions,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ParticipantShare {
    pub(crate) fn active_model(&self, transaction_id: Uuid, position: i32) -> ActiveModel {
        ActiveModel {
            transaction_id: ActiveValue::Set(transaction_id.to_string()),
            account_id: ActiveValue::Set(self.participant_id.clone()),
            position: ActiveValue::Set(position),
            amount_minor: ActiveValue::Set(self.amount.cents()),
            fractional_share: ActiveValue::Set(self.fractional_share),
        }
    }
}

impl From<(Model, Option<super::accounts::Model>)> for ParticipantShare {
    fn from((model, account): (Model, Option<super::accounts::Model>)) -> Self {
        let (name, email) = match account {
            Some(account) => (Some(account.name), Some(account.email)),
            None => (None, None),
        };
        Self {
            participant_id: model.account_id,
            amount: MoneyCents::new(model.amount_minor),
            fractional_share: model.fractional_share,
            name,
            email,
        }
    }
}
