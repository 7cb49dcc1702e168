use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ledgerd_convert::ConvertError;
use ledgerd_core::LedgerError;

// Stable wire codes, kept from the original public API.
pub const CODE_OK: i32 = 1;
pub const CODE_INTERNAL: i32 = 2;
pub const CODE_VALIDATION: i32 = 3;
pub const CODE_CURRENCY: i32 = 4;
pub const CODE_NEGATIVE_BALANCE: i32 = 5;
pub const CODE_SENDER_MISSING: i32 = 6;
pub const CODE_RECEIVER_MISSING: i32 = 7;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, CODE_VALIDATION, msg),
        LedgerError::AccountNotFound => {
            json_error(StatusCode::NOT_FOUND, CODE_VALIDATION, "account not found")
        }
        LedgerError::SenderNotFound(_) | LedgerError::ReceiverNotFound(_) => {
            let code = if matches!(err, LedgerError::SenderNotFound(_)) {
                CODE_SENDER_MISSING
            } else {
                CODE_RECEIVER_MISSING
            };
            json_error(StatusCode::CONFLICT, code, err.to_string())
        }
        LedgerError::BalanceWouldBeNegative => json_error(
            StatusCode::BAD_REQUEST,
            CODE_NEGATIVE_BALANCE,
            "balance cannot go negative",
        ),
        LedgerError::InsufficientFunds => json_error(
            StatusCode::CONFLICT,
            CODE_NEGATIVE_BALANCE,
            "balance would go below zero after transfer",
        ),
        LedgerError::Store(detail) => {
            // Store detail stays in the logs.
            tracing::error!(error = %detail, "store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                CODE_INTERNAL,
                "internal error",
            )
        }
    }
}

pub fn convert_error_to_response(err: ConvertError) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, CODE_CURRENCY, err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: i32,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "code": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Minimal `{code: 1}` acknowledgement for mutating operations.
pub fn ack() -> axum::response::Response {
    (StatusCode::OK, axum::Json(json!({ "code": CODE_OK }))).into_response()
}
