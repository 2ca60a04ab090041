pub mod orders;
pub mod settings;
pub mod system;

pub use orders::*;
pub use settings::*;
pub use system::*;

use axum::http::StatusCode;
use axum::Json;

use crate::error::DeskError;

use super::types::ApiErrorBody;

/// Map a [`DeskError`] to an HTTP status and JSON body. Validation failures
/// name the offending field; venue rejections keep the exchange's code.
pub(crate) fn error_response(err: DeskError) -> (StatusCode, Json<ApiErrorBody>) {
    match err {
        DeskError::Validation(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiErrorBody {
                error: e.to_string(),
                field: Some(e.field().to_string()),
                exchange_code: None,
            }),
        ),
        DeskError::Exchange { code, message } => (
            StatusCode::BAD_GATEWAY,
            Json(ApiErrorBody {
                error: message,
                field: None,
                exchange_code: Some(code),
            }),
        ),
        DeskError::Auth(msg) => (StatusCode::UNAUTHORIZED, Json(ApiErrorBody::message(msg))),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiErrorBody::message(other.to_string())),
        ),
    }
}
