//! Profile of the calling principal.

use api_types::account::{AccountUpdate, AccountView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;

use crate::{Principal, ServerError, server::ServerState};

fn view(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        email: account.email,
        name: account.name,
        picture: account.picture,
    }
}

pub async fn get(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.engine.account(&principal.0).await?;
    Ok(Json(view(account)))
}

/// Registers the principal or refreshes its profile.
pub async fn put(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<AccountUpdate>, ServerError>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    state
        .engine
        .upsert_account(engine::Account {
            id: principal.0.clone(),
            email: payload.email,
            name: payload.name,
            picture: payload.picture,
        })
        .await?;
    let account = state.engine.account(&principal.0).await?;
    Ok((StatusCode::OK, Json(view(account))))
}
