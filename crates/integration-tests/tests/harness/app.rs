//! Sample application routes exercising each error class

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use faultline_core::HttpError;
use faultline_server::ApiError;
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("account {0} not found")]
    NotFound(String),
    #[error("account {0} is locked")]
    Locked(String),
    #[error("too many attempts")]
    Throttled,
    #[error("ledger unavailable")]
    Ledger(#[source] std::io::Error),
}

impl HttpError for AccountError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Locked(_) => StatusCode::CONFLICT,
            Self::Throttled => StatusCode::TOO_MANY_REQUESTS,
            Self::Ledger(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_code(&self) -> Option<&str> {
        match self {
            Self::Locked(_) => Some("ACCOUNT_LOCKED"),
            _ => None,
        }
    }

    fn is_operational(&self) -> bool {
        !matches!(self, Self::Ledger(_))
    }
}

/// Routes served behind the boundary in every test
pub fn routes() -> Router {
    Router::new()
        .route("/accounts/{id}", get(show_account).post(update_account))
        .route("/accounts/{id}/ledger", get(ledger))
        .route("/login", post(login))
        .route("/reports", get(reports))
        .route("/session", get(session))
}

async fn show_account(Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    if id == "missing" {
        return Err(AccountError::NotFound(id).into());
    }
    Ok(Json(json!({ "id": id })))
}

async fn update_account(Path(id): Path<String>, Json(_body): Json<Value>) -> Result<Json<Value>, ApiError> {
    Err(AccountError::Locked(id).into())
}

async fn ledger(Path(_id): Path<String>) -> Result<Json<Value>, ApiError> {
    let io = std::io::Error::other("connection refused");
    Err(AccountError::Ledger(io).into())
}

async fn login() -> Result<Json<Value>, ApiError> {
    Err(AccountError::Throttled.into())
}

async fn reports() -> Result<Json<Value>, ApiError> {
    let rows = query_warehouse().await?;
    Ok(Json(Value::Array(rows)))
}

async fn query_warehouse() -> anyhow::Result<Vec<Value>> {
    anyhow::bail!("warehouse query timed out")
}

async fn session() -> Result<Json<Value>, ApiError> {
    verify_session()?;
    Ok(Json(json!({ "active": true })))
}

fn verify_session() -> Result<(), jwt_compact::ValidationError> {
    Err(jwt_compact::ValidationError::Expired)
}
