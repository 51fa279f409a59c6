use std::collections::HashMap;

use sea_orm::{
    Condition, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
    TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Transaction, accounts, participants, transactions};

use super::{BIND_CHUNK, Engine, with_tx};

type ParticipantRow = (participants::Model, Option<accounts::Model>);

mod write;

impl Engine {
    async fn load_participants(
        &self,
        db: &DatabaseTransaction,
        transaction_ids: Vec<String>,
    ) -> ResultEngine<HashMap<String, Vec<ParticipantRow>>> {
        let mut by_tx: HashMap<String, Vec<ParticipantRow>> = HashMap::new();
        for chunk in transaction_ids.chunks(BIND_CHUNK) {
            let rows = participants::Entity::find()
                .find_also_related(accounts::Entity)
                .filter(participants::Column::TransactionId.is_in(chunk.iter().cloned()))
                .order_by_asc(participants::Column::Position)
                .all(db)
                .await?;
            for row in rows {
                by_tx.entry(row.0.transaction_id.clone()).or_default().push(row);
            }
        }
        Ok(by_tx)
    }

    /// Returns one transaction with its shares.
    ///
    /// Transactions the actor is not party to are reported as missing.
    pub async fn transaction(&self, actor_id: &str, transaction_id: Uuid) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let not_found = || EngineError::KeyNotFound("transaction not exists".to_string());
            let header = self
                .find_transaction_header(&db_tx, transaction_id)
                .await?
                .ok_or_else(not_found)?;
            if !self.is_party(&db_tx, &header, actor_id).await? {
                return Err(not_found());
            }
            let mut rows = self.load_participants(&db_tx, vec![header.id.clone()]).await?;
            let shares = rows.remove(&header.id).unwrap_or_default();
            Transaction::from_parts(header, shares)
        })
    }

    /// Lists every transaction `actor_id` paid for or participates in, newest
    /// first.
    pub async fn list_transactions(&self, actor_id: &str) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            let participating = participants::Entity::find()
                .select_only()
                .column(participants::Column::TransactionId)
                .filter(participants::Column::AccountId.eq(actor_id))
                .into_query();

            let headers = transactions::Entity::find()
                .filter(
                    Condition::any()
                        .add(transactions::Column::PayerId.eq(actor_id))
                        .add(transactions::Column::Id.in_subquery(participating)),
                )
                .order_by_desc(transactions::Column::OccurredAt)
                .order_by_asc(transactions::Column::Id)
                .all(&db_tx)
                .await?;

            let ids = headers.iter().map(|h| h.id.clone()).collect();
            let mut rows = self.load_participants(&db_tx, ids).await?;

            headers
                .into_iter()
                .map(|header| {
                    let shares = rows.remove(&header.id).unwrap_or_default();
                    Transaction::from_parts(header, shares)
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }
}
