use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CreateTransactionCmd, EngineError, ParticipantShare, ResultEngine, SplitStrategy,
    Transaction, UpdateTransactionCmd, participants, split_with, transactions,
    util::normalize_required_id,
};

use super::super::{BIND_CHUNK, Engine, with_tx};

/// Validates the command and computes the shares. Performs no I/O.
fn build_transaction(cmd: CreateTransactionCmd) -> ResultEngine<Transaction> {
    let strategy = SplitStrategy::try_from(cmd.split_type.trim())?;
    let payer_id = normalize_required_id(&cmd.payer_id, "payer")?;
    let ids = cmd
        .participants
        .iter()
        .map(|p| normalize_required_id(&p.id, "participant"))
        .collect::<ResultEngine<Vec<_>>>()?;

    let split = split_with(cmd.amount, &ids, strategy)?;
    let shares = split
        .into_iter()
        .zip(&cmd.participants)
        .map(|(share, input)| ParticipantShare {
            participant_id: share.participant_id,
            amount: share.amount,
            fractional_share: input.fractional_share,
            name: None,
            email: None,
        })
        .collect();

    Transaction::new(payer_id, cmd.occurred_at, strategy, cmd.amount, shares)
}

impl Engine {
    /// Records a shared expense and returns its id.
    ///
    /// Shares are computed before touching the database. The header and every
    /// participant row are then written inside one DB transaction: either all
    /// of them are committed or none is.
    pub async fn create_transaction(&self, cmd: CreateTransactionCmd) -> ResultEngine<Uuid> {
        let tx = build_transaction(cmd)?;

        with_tx!(self, |db_tx| {
            let mut account_ids: Vec<&str> = vec![tx.payer_id.as_str()];
            account_ids.extend(tx.shares.iter().map(|s| s.participant_id.as_str()));
            self.require_accounts_exist(&db_tx, &account_ids).await?;

            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            let rows = tx
                .shares
                .iter()
                .enumerate()
                .map(|(position, share)| {
                    let position = i32::try_from(position).map_err(|_| {
                        EngineError::InvalidParticipants("too many participants".to_string())
                    })?;
                    Ok(share.active_model(tx.id, position))
                })
                .collect::<ResultEngine<Vec<_>>>()?;
            let mut rows = rows.into_iter().peekable();
            while rows.peek().is_some() {
                participants::Entity::insert_many(rows.by_ref().take(BIND_CHUNK))
                    .exec_without_returning(&db_tx)
                    .await?;
            }

            tracing::debug!(
                transaction_id = %tx.id,
                payer = %tx.payer_id,
                amount = %tx.amount,
                participants = tx.shares.len(),
                "transaction created"
            );
            Ok::<_, EngineError>(tx.id)
        })
    }

    /// Replaces payer and timestamp of a transaction. Shares are not touched.
    ///
    /// Only the payer or a participant may update it.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<()> {
        let payer_id = normalize_required_id(&cmd.payer_id, "payer")?;

        with_tx!(self, |db_tx| {
            let header = self
                .require_party(&db_tx, cmd.transaction_id, &cmd.actor_id)
                .await?;
            self.require_accounts_exist(&db_tx, &[payer_id.as_str()])
                .await?;

            let active = transactions::ActiveModel {
                id: ActiveValue::Unchanged(header.id),
                payer_id: ActiveValue::Set(payer_id.clone()),
                occurred_at: ActiveValue::Set(cmd.occurred_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            tracing::debug!(
                transaction_id = %cmd.transaction_id,
                actor = %cmd.actor_id,
                payer = %payer_id,
                "transaction updated"
            );
            Ok::<_, EngineError>(())
        })
    }

    /// Deletes a transaction together with its participant rows.
    ///
    /// Fails with [`EngineError::Unauthorized`] when `actor_id` is neither the
    /// payer nor a participant; the transaction is left in place.
    pub async fn delete_transaction(&self, actor_id: &str, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let header = self
                .require_party(&db_tx, transaction_id, actor_id)
                .await?;

            participants::Entity::delete_many()
                .filter(participants::Column::TransactionId.eq(header.id.clone()))
                .exec(&db_tx)
                .await?;
            transactions::Entity::delete_by_id(header.id)
                .exec(&db_tx)
                .await?;

            tracing::debug!(%transaction_id, actor = %actor_id, "transaction deleted");
            Ok::<_, EngineError>(())
        })
    }
}
