//! HTTP routes.

use std::sync::Arc;

use assetvault_common::{AssetId, AssetView, UserId};
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::{header, request::Parts, StatusCode},
    routing::get,
    Form, Json, Router,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::service::AssetFields;
use crate::state::AppState;
use crate::valuation::ValuationResult;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Asset fields taken from a JSON object or a urlencoded form.
///
/// An empty body yields no fields, so validation reports what is missing.
pub struct AssetPayload(pub AssetFields);

impl<S> FromRequest<S> for AssetPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.starts_with(FORM_CONTENT_TYPE));

        if is_form {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            return Ok(Self(
                pairs
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect(),
            ));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Map::new()));
        }

        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(fields)) => Ok(Self(fields)),
            Ok(_) => Err(ApiError::BadRequest(
                "Request body must be a JSON object.".to_string(),
            )),
            Err(e) => Err(ApiError::BadRequest(format!("Malformed JSON body: {}", e))),
        }
    }
}

/// Path parameters whose rejection is reported as an [`ApiError`].
pub struct IdPath<T>(pub T);

impl<S, T> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|e| ApiError::BadRequest(e.body_text()))
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_asset(
    State(state): State<Arc<AppState>>,
    IdPath(user_id): IdPath<UserId>,
    AssetPayload(fields): AssetPayload,
) -> ApiResult<(StatusCode, Json<AssetView>)> {
    let asset = state.assets.create_asset(user_id, &fields).await?;
    Ok((StatusCode::CREATED, Json(asset.into())))
}

async fn get_asset(
    State(state): State<Arc<AppState>>,
    IdPath((user_id, asset_id)): IdPath<(UserId, AssetId)>,
) -> ApiResult<Json<AssetView>> {
    let asset = state.assets.get_asset(user_id, asset_id).await?;
    Ok(Json(asset.into()))
}

async fn update_asset(
    State(state): State<Arc<AppState>>,
    IdPath((user_id, asset_id)): IdPath<(UserId, AssetId)>,
    AssetPayload(fields): AssetPayload,
) -> ApiResult<Json<AssetView>> {
    let asset = state.assets.update_asset(user_id, asset_id, &fields).await?;
    Ok(Json(asset.into()))
}

async fn delete_asset(
    State(state): State<Arc<AppState>>,
    IdPath((user_id, asset_id)): IdPath<(UserId, AssetId)>,
) -> ApiResult<StatusCode> {
    state.assets.delete_asset(user_id, asset_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_assets(
    State(state): State<Arc<AppState>>,
    IdPath(user_id): IdPath<UserId>,
) -> ApiResult<Json<Vec<AssetView>>> {
    let assets = state.assets.list_assets(user_id).await?;
    Ok(Json(assets.into_iter().map(AssetView::from).collect()))
}

async fn delete_all_assets(
    State(state): State<Arc<AppState>>,
    IdPath(user_id): IdPath<UserId>,
) -> ApiResult<StatusCode> {
    state.assets.delete_all_assets(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn total_values(
    State(state): State<Arc<AppState>>,
    IdPath(user_id): IdPath<UserId>,
) -> ApiResult<Json<Decimal>> {
    let total = state
        .valuation
        .total_value(user_id, &state.reference_currency)
        .await?;
    Ok(Json(total))
}

async fn separate_values(
    State(state): State<Arc<AppState>>,
    IdPath(user_id): IdPath<UserId>,
) -> ApiResult<Json<ValuationResult>> {
    let values = state
        .valuation
        .value_by_currency(user_id, &state.reference_currency)
        .await?;
    Ok(Json(values))
}

/// Build the API router, nested under `/api/v1`.
pub fn app_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/users/{user_id}/assets",
            get(list_assets).post(create_asset).delete(delete_all_assets),
        )
        .route(
            "/users/{user_id}/assets/{asset_id}",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
        .route("/users/{user_id}/assets-total-values", get(total_values))
        .route("/users/{user_id}/assets-separate-values", get(separate_values));

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}
