//! Transactions API endpoints

use api_types::transaction::{
    ParticipantView, TransactionCreated, TransactionListResponse, TransactionNew,
    TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::{FixedOffset, Utc};
use engine::{EngineError, MoneyCents};
use uuid::Uuid;

use crate::{Principal, ServerError, server::ServerState};

fn view(tx: engine::Transaction, utc: FixedOffset) -> TransactionView {
    TransactionView {
        id: tx.id,
        amount: tx.amount.to_string(),
        timestamp: tx.occurred_at.with_timezone(&utc),
        payer: tx.payer_id,
        split_type: tx.split_type.to_string(),
        participants: tx
            .shares
            .into_iter()
            .map(|share| ParticipantView {
                id: share.participant_id,
                dollar_share: share.amount.to_string(),
                fractional_share: share.fractional_share,
                name: share.name,
                email: share.email,
            })
            .collect(),
    }
}

fn utc_offset() -> Result<FixedOffset, ServerError> {
    FixedOffset::east_opt(0).ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))
}

pub async fn list(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let utc = utc_offset()?;
    let transactions = state
        .engine
        .list_transactions(&principal.0)
        .await?
        .into_iter()
        .map(|tx| view(tx, utc))
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn get(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(&principal.0, id).await?;
    Ok(Json(view(tx, utc_offset()?)))
}

pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionNew>, ServerError>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let amount: MoneyCents = payload.amount.parse()?;
    let payer = payload.payer.unwrap_or_else(|| principal.0.clone());

    let mut cmd = engine::CreateTransactionCmd::new(
        payer,
        amount,
        payload.timestamp.with_timezone(&Utc),
    )
    .split_type(payload.split_type);
    for participant in payload.participants {
        let mut input = engine::ParticipantInput::new(participant.id);
        input.fractional_share = participant.fractional_share;
        cmd = cmd.participant(input);
    }

    if !cmd.involves(&principal.0) {
        return Err(EngineError::Unauthorized(
            "caller must be the payer or a participant".to_string(),
        )
        .into());
    }

    let id = state.engine.create_transaction(cmd).await?;
    tracing::info!(transaction_id = %id, actor = %principal.0, "transaction recorded");

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn update(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): WithRejection<Json<TransactionUpdate>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_transaction(engine::UpdateTransactionCmd::new(
            id,
            principal.0,
            payload.payer,
            payload.timestamp.with_timezone(&Utc),
        ))
        .await?;

    Ok(StatusCode::OK)
}

pub async fn delete(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&principal.0, id).await?;
    tracing::info!(transaction_id = %id, actor = %principal.0, "transaction deleted");

    Ok(StatusCode::NO_CONTENT)
}
