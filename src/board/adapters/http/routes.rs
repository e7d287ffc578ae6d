//! Axum routes exposing column management and the board protocol.

use super::{
    error::{HttpError, HttpResult},
    extract::{BoardForm, BoardJson, BoardPath, BoardQuery},
};
use crate::board::{
    domain::{BoardVersion, Column, ColumnBulkUpdate, ColumnId, ColumnTaskCount, ProjectId},
    ports::{BoardErrorKind, BoardStore},
    services::{BoardCheck, BoardSnapshot, BoardSyncService, ColumnManager, MoveRequest},
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Services shared by every board route.
pub struct BoardHttpState<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    columns: ColumnManager<S, C>,
    sync: BoardSyncService<S, C>,
}

impl<S, C> BoardHttpState<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    /// Bundles the services behind the routes.
    #[must_use]
    pub const fn new(columns: ColumnManager<S, C>, sync: BoardSyncService<S, C>) -> Self {
        Self { columns, sync }
    }
}

/// Query string of the change check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckQuery {
    /// Version token from the client's last snapshot.
    pub version: Option<String>,
}

/// Body of the column creation route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateColumnBody {
    /// Column title.
    pub title: String,
    /// Task limit; zero or absent means unlimited.
    #[serde(default)]
    pub task_limit: i64,
}

/// Response of the column reorder routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedBody {
    /// `false` when the column was already at the boundary.
    pub moved: bool,
}

/// Builds the board router over shared services.
pub fn board_router<S, C>(state: Arc<BoardHttpState<S, C>>) -> Router
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/projects/:project_id/board", get(fetch_board::<S, C>))
        .route("/projects/:project_id/board/check", get(check_board::<S, C>))
        .route("/projects/:project_id/board/moves", post(submit_move::<S, C>))
        .route(
            "/projects/:project_id/columns",
            get(list_columns::<S, C>).post(create_column::<S, C>),
        )
        .route(
            "/projects/:project_id/columns/bulk",
            post(bulk_update_columns::<S, C>),
        )
        .route(
            "/projects/:project_id/columns/stats",
            get(column_stats::<S, C>),
        )
        .route(
            "/projects/:project_id/columns/:column_id/up",
            post(move_column_up::<S, C>),
        )
        .route(
            "/projects/:project_id/columns/:column_id/down",
            post(move_column_down::<S, C>),
        )
        .route(
            "/projects/:project_id/columns/:column_id",
            delete(remove_column::<S, C>),
        )
        .with_state(state)
}

async fn fetch_board<S, C>(
    State(state): State<Arc<BoardHttpState<S, C>>>,
    BoardPath(project_id): BoardPath<i64>,
) -> HttpResult<Json<BoardSnapshot>>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    Ok(Json(state.sync.fetch(ProjectId::new(project_id)).await?))
}

async fn check_board<S, C>(
    State(state): State<Arc<BoardHttpState<S, C>>>,
    BoardPath(project_id): BoardPath<i64>,
    BoardQuery(query): BoardQuery<CheckQuery>,
) -> HttpResult<Response>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    let client_version = BoardVersion::from_client(query.version.unwrap_or_default());
    let check = state
        .sync
        .check(ProjectId::new(project_id), &client_version)
        .await?;
    Ok(match check {
        BoardCheck::Unchanged => StatusCode::NOT_MODIFIED.into_response(),
        BoardCheck::Changed(snapshot) => Json(*snapshot).into_response(),
    })
}

async fn submit_move<S, C>(
    State(state): State<Arc<BoardHttpState<S, C>>>,
    BoardPath(project_id): BoardPath<i64>,
    BoardJson(request): BoardJson<MoveRequest>,
) -> HttpResult<Json<BoardSnapshot>>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    let snapshot = state
        .sync
        .submit_move(ProjectId::new(project_id), request)
        .await?;
    Ok(Json(snapshot))
}

async fn list_columns<S, C>(
    State(state): State<Arc<BoardHttpState<S, C>>>,
    BoardPath(project_id): BoardPath<i64>,
) -> HttpResult<Json<Vec<Column>>>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    Ok(Json(
        state.columns.list_columns(ProjectId::new(project_id)).await?,
    ))
}

async fn create_column<S, C>(
    State(state): State<Arc<BoardHttpState<S, C>>>,
    BoardPath(project_id): BoardPath<i64>,
    BoardJson(body): BoardJson<CreateColumnBody>,
) -> HttpResult<impl IntoResponse>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    let column = state
        .columns
        .add_column(ProjectId::new(project_id), &body.title, body.task_limit)
        .await?;
    Ok((StatusCode::CREATED, Json(column)))
}

async fn bulk_update_columns<S, C>(
    State(state): State<Arc<BoardHttpState<S, C>>>,
    BoardPath(project_id): BoardPath<i64>,
    BoardForm(pairs): BoardForm<Vec<(String, String)>>,
) -> HttpResult<Json<Vec<Column>>>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    let form = ColumnBulkUpdate::from_form_pairs(pairs)
        .map_err(|err| HttpError::new(BoardErrorKind::Validation, err.to_string()))?;
    let columns = state
        .columns
        .bulk_update(ProjectId::new(project_id), &form)
        .await?;
    Ok(Json(columns))
}

async fn column_stats<S, C>(
    State(state): State<Arc<BoardHttpState<S, C>>>,
    BoardPath(project_id): BoardPath<i64>,
) -> HttpResult<Json<Vec<ColumnTaskCount>>>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    let stats = state
        .columns
        .column_stats(ProjectId::new(project_id))
        .await?;
    Ok(Json(
        stats
            .into_iter()
            .map(|(column_id, total)| ColumnTaskCount { column_id, total })
            .collect(),
    ))
}

async fn move_column_up<S, C>(
    State(state): State<Arc<BoardHttpState<S, C>>>,
    BoardPath((project_id, column_id)): BoardPath<(i64, i64)>,
) -> HttpResult<Json<MovedBody>>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    let moved = state
        .columns
        .move_up(ProjectId::new(project_id), ColumnId::new(column_id))
        .await?;
    Ok(Json(MovedBody { moved }))
}

async fn move_column_down<S, C>(
    State(state): State<Arc<BoardHttpState<S, C>>>,
    BoardPath((project_id, column_id)): BoardPath<(i64, i64)>,
) -> HttpResult<Json<MovedBody>>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    let moved = state
        .columns
        .move_down(ProjectId::new(project_id), ColumnId::new(column_id))
        .await?;
    Ok(Json(MovedBody { moved }))
}

async fn remove_column<S, C>(
    State(state): State<Arc<BoardHttpState<S, C>>>,
    BoardPath((project_id, column_id)): BoardPath<(i64, i64)>,
) -> HttpResult<StatusCode>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    state
        .columns
        .remove_column(ProjectId::new(project_id), ColumnId::new(column_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
