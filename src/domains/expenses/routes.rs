//! REST routes for expenses.
//!
//! Each endpoint maps to exactly one repository operation. Extractor
//! rejections (malformed JSON, missing fields, non-numeric ids) are turned
//! into validation errors so every bad request answers 400.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tracing::{error, warn};

use super::{
    DeleteResult, Expense, ExpenseError, ExpenseQuery, ExpenseRepository, ExpenseResult,
    MonthlySummary, NewExpense, SummaryQuery,
};

/// Build the expense routes, already bound to their repository.
pub fn router<S>(repository: Arc<ExpenseRepository>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/expenses", get(list_expenses).post(add_expense))
        .route(
            "/expenses/{expense_id}",
            get(get_expense_by_id).delete(delete_expense),
        )
        .route("/summary/monthly", get(get_monthly_summary))
        .with_state(repository)
}

impl IntoResponse for ExpenseError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

async fn add_expense(
    State(repository): State<Arc<ExpenseRepository>>,
    payload: Result<Json<NewExpense>, JsonRejection>,
) -> ExpenseResult<(StatusCode, Json<Expense>)> {
    let Json(new_expense) = payload.map_err(|e| ExpenseError::validation(e.body_text()))?;
    let expense = repository.create(&new_expense).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn list_expenses(
    State(repository): State<Arc<ExpenseRepository>>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> ExpenseResult<Json<Vec<Expense>>> {
    let Query(query) = query.map_err(|e| ExpenseError::validation(e.body_text()))?;
    Ok(Json(repository.list(&query).await?))
}

async fn get_expense_by_id(
    State(repository): State<Arc<ExpenseRepository>>,
    expense_id: Result<Path<i64>, PathRejection>,
) -> ExpenseResult<Json<Expense>> {
    let Path(expense_id) = expense_id.map_err(|e| ExpenseError::validation(e.body_text()))?;
    Ok(Json(repository.get(expense_id).await?))
}

async fn delete_expense(
    State(repository): State<Arc<ExpenseRepository>>,
    expense_id: Result<Path<i64>, PathRejection>,
) -> ExpenseResult<Json<DeleteResult>> {
    let Path(expense_id) = expense_id.map_err(|e| ExpenseError::validation(e.body_text()))?;
    Ok(Json(repository.delete(expense_id).await?))
}

async fn get_monthly_summary(
    State(repository): State<Arc<ExpenseRepository>>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ExpenseResult<Json<MonthlySummary>> {
    let Query(query) = query.map_err(|e| ExpenseError::validation(e.body_text()))?;
    Ok(Json(repository.monthly_summary(&query).await?))
}
