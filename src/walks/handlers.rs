use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::{AppError, AppJson},
    state::AppState,
    walks::{
        dto::{CountResponse, CreateWalkRequest, UpdateWalkRequest},
        repo_types::{ArrondissementCount, NewWalk, Walk, WalkChanges},
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_walks))
        .route("/id/:id", get(get_walk))
        .route("/search/:search", get(search_walks))
        .route("/arrondissement/:num", get(count_by_arrondissement))
        .route("/synthese", get(summary))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(create_walk))
        .route("/update-one/:id", post(update_walk))
        .route("/delete/:id", delete(delete_walk))
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| {
        warn!(id = %raw, "malformed walk id");
        AppError::InvalidId
    })
}

#[instrument(skip(state))]
pub async fn list_walks(State(state): State<AppState>) -> Result<Json<Vec<Walk>>, AppError> {
    let walks = state.walks.list().await?;
    Ok(Json(walks))
}

#[instrument(skip(state))]
pub async fn get_walk(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Walk>, AppError> {
    let id = parse_id(&id)?;
    state
        .walks
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state))]
pub async fn search_walks(
    State(state): State<AppState>,
    Path(search): Path<String>,
) -> Result<Json<Vec<Walk>>, AppError> {
    let walks = state.walks.search_intro(&search).await?;
    Ok(Json(walks))
}

#[instrument(skip(state))]
pub async fn count_by_arrondissement(
    State(state): State<AppState>,
    Path(num): Path<String>,
) -> Result<Json<CountResponse>, AppError> {
    let value = num.trim().parse::<i64>().map_err(|_| {
        warn!(value = %num, "non-numeric arrondissement");
        AppError::InvalidArrondissement
    })?;
    // no stored walk can have an arrondissement outside i32
    let Ok(arrondissement) = i32::try_from(value) else {
        return Ok(Json(CountResponse { count: 0 }));
    };
    let count = state.walks.count_by_arrondissement(arrondissement).await?;
    Ok(Json(CountResponse { count }))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArrondissementCount>>, AppError> {
    let rows = state.walks.summary().await?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn create_walk(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateWalkRequest>,
) -> Result<(StatusCode, Json<Walk>), AppError> {
    let new_walk = NewWalk::try_from(payload).inspect_err(|e| {
        warn!(%user_id, error = %e, "rejected walk");
    })?;
    let walk = state.walks.create(new_walk).await?;
    info!(%user_id, walk_id = %walk.id, arrondissement = walk.arrondissement, "walk created");
    Ok((StatusCode::CREATED, Json(walk)))
}

#[instrument(skip(state, payload))]
pub async fn update_walk(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateWalkRequest>,
) -> Result<Json<Walk>, AppError> {
    let id = parse_id(&id)?;
    let changes = WalkChanges::try_from(payload)?;
    let walk = state
        .walks
        .update(id, changes)
        .await?
        .ok_or(AppError::NotFound)?;
    info!(%user_id, walk_id = %walk.id, "walk updated");
    Ok(Json(walk))
}

#[instrument(skip(state))]
pub async fn delete_walk(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<&'static str, AppError> {
    let id = parse_id(&id)?;
    if !state.walks.delete(id).await? {
        return Err(AppError::NotFound);
    }
    info!(%user_id, walk_id = %id, "walk deleted");
    Ok("Walk deleted.")
}
