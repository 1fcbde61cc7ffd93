use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    api::{AppState, invalid_body},
    error::ProxyError,
    spotify::auth::{TokenGrant, exchange_token},
    types::{CallbackRequest, TokenPair},
};

/// `POST /callback` - exchanges an authorization code for a token pair.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CallbackRequest>, JsonRejection>,
) -> Result<Json<TokenPair>, ProxyError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let code = request.code.unwrap_or_default();

    let tokens = exchange_token(
        state.api.as_ref(),
        &state.config.credentials,
        TokenGrant::AuthorizationCode { code },
    )
    .await?;

    Ok(Json(tokens))
}
