use std::collections::HashSet;

use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, accounts, participants, transactions};

use super::{BIND_CHUNK, Engine, with_tx};

impl Engine {
    pub(super) async fn find_transaction_header(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> ResultEngine<Option<transactions::Model>> {
        transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_transaction_header(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        self.find_transaction_header(db, transaction_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }

    async fn is_participant(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
        account_id: &str,
    ) -> ResultEngine<bool> {
        participants::Entity::find_by_id((transaction_id.to_string(), account_id.to_string()))
            .one(db)
            .await
            .map(|model| model.is_some())
            .map_err(Into::into)
    }

    /// Whether `actor_id` is the payer of `header` or one of its participants.
    pub(super) async fn is_party(
        &self,
        db: &DatabaseTransaction,
        header: &transactions::Model,
        actor_id: &str,
    ) -> ResultEngine<bool> {
        if header.payer_id == actor_id {
            return Ok(true);
        }
        let transaction_id = crate::util::parse_uuid(&header.id, "transaction")?;
        self.is_participant(db, transaction_id, actor_id).await
    }

    /// Loads the header and fails with `Unauthorized` unless `actor_id` is a
    /// party to it.
    pub(super) async fn require_party(
        &self,
        db: &DatabaseTransaction,
        transaction_id: Uuid,
        actor_id: &str,
    ) -> ResultEngine<transactions::Model> {
        let header = self.require_transaction_header(db, transaction_id).await?;
        if !self.is_party(db, &header, actor_id).await? {
            return Err(EngineError::Unauthorized(format!(
                "{actor_id} is not a party to this transaction"
            )));
        }
        Ok(header)
    }

    /// Fails with `PersistenceConflict` naming the first identifier that has
    /// no account.
    pub(super) async fn require_accounts_exist(
        &self,
        db: &DatabaseTransaction,
        account_ids: &[&str],
    ) -> ResultEngine<()> {
        let mut found: HashSet<String> = HashSet::with_capacity(account_ids.len());
        for chunk in account_ids.chunks(BIND_CHUNK) {
            let ids = accounts::Entity::find()
                .filter(accounts::Column::Id.is_in(chunk.iter().copied()))
                .all(db)
                .await?
                .into_iter()
                .map(|model| model.id);
            found.extend(ids);
        }

        if let Some(missing) = account_ids.iter().find(|id| !found.contains(**id)) {
            return Err(EngineError::PersistenceConflict(format!(
                "unknown account: {missing}"
            )));
        }
        Ok(())
    }

    /// Returns `true` if `actor_id` paid for or participates in the
    /// transaction. Missing transactions yield `false`.
    pub async fn is_party_to_transaction(
        &self,
        actor_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            match self.find_transaction_header(&db_tx, transaction_id).await? {
                Some(header) => self.is_party(&db_tx, &header, actor_id).await,
                None => Ok(false),
            }
        })
    }
}
