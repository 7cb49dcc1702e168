use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;

use ledgerd_core::{HistoryQuery, SortBy, SortOrder};

use crate::app::{
    AppServices, dto, errors,
    extract::{Json, Query},
};

pub async fn get_balance(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::BalanceQuery>,
) -> axum::response::Response {
    let currency = params
        .currency
        .unwrap_or_else(|| services.convertor.native().to_string());

    let account = match services.store.get_account(params.id).await {
        Ok(a) => a,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let balance = match services.convertor.convert(account.balance, &currency) {
        Ok(b) => b,
        Err(e) => return errors::convert_error_to_response(e),
    };

    (
        StatusCode::OK,
        axum::Json(dto::BalanceResponse { balance, currency }),
    )
        .into_response()
}

pub async fn adjust_balance(
    Extension(services): Extension<Arc<AppServices>>,
    Query(target): Query<dto::AccountTarget>,
    Json(body): Json<dto::AdjustBalanceRequest>,
) -> axum::response::Response {
    // Validation contract: the engine never sees a zero amount.
    if body.amount == Decimal::ZERO {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            errors::CODE_VALIDATION,
            "amount must not be 0",
        );
    }

    match services
        .store
        .adjust(target.id, body.amount, &body.comment)
        .await
    {
        Ok(_) => errors::ack(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::TransferRequest>,
) -> axum::response::Response {
    if body.id_from == 0 || body.id_to == 0 {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            errors::CODE_VALIDATION,
            "cannot transfer money to/from the system",
        );
    }
    if body.id_from == body.id_to {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            errors::CODE_VALIDATION,
            "cannot transfer money to the same account",
        );
    }
    if body.amount <= Decimal::ZERO {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            errors::CODE_VALIDATION,
            "amount must be > 0",
        );
    }

    match services
        .store
        .transfer(body.id_from, body.id_to, body.amount, &body.comment)
        .await
    {
        Ok(()) => errors::ack(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_history(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::HistoryParams>,
) -> axum::response::Response {
    let currency = params
        .currency
        .unwrap_or_else(|| services.convertor.native().to_string());

    let sort_by = match params.sort_by.as_deref().map(SortBy::parse).transpose() {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };
    let sort_order = match params
        .sort_order
        .as_deref()
        .map(SortOrder::parse)
        .transpose()
    {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let query = match HistoryQuery::new(params.limit, params.offset, sort_by, sort_order) {
        Ok(q) => q,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let page = match services.store.history(params.id, query).await {
        Ok(p) => p,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let mut history = Vec::with_capacity(page.entries.len());
    for entry in page.entries {
        let amount = match services.convertor.convert(entry.amount, &currency) {
            Ok(a) => a,
            Err(e) => return errors::convert_error_to_response(e),
        };
        history.push(dto::TransactionJson::from_entry(entry, amount, &currency));
    }

    (
        StatusCode::OK,
        axum::Json(dto::HistoryResponse {
            count: page.total,
            history,
        }),
    )
        .into_response()
}
