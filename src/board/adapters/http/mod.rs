//! HTTP adapter exposing the board over axum.

mod error;
mod extract;
mod routes;

pub use error::{ErrorBody, HttpError, HttpResult};
pub use extract::{BoardForm, BoardJson, BoardPath, BoardQuery};
pub use routes::{BoardHttpState, CheckQuery, CreateColumnBody, MovedBody, board_router};
