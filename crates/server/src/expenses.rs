//! Expense endpoints: creation, approvals, reimbursement.

use api_types::booking::VoteView;
use api_types::expense::{
    AllocationView, ExpenseDetailResponse, ExpenseNew, ExpenseView, ExpensesResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use engine::{CastExpenseApprovalCmd, CreateExpenseCmd};

use crate::bookings::{map_api_choice, map_choice, tally_view};
use crate::{ServerError, server::ServerState, user};

fn expense_view(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        property_id: expense.property_id,
        amount_cents: expense.amount_cents,
        status: expense.status.as_str().to_string(),
        vendor_name: expense.vendor_name,
        category: expense.category,
        receipt_url: expense.receipt_url,
        decision_summary: expense.decision_summary,
        incurred_on: expense.incurred_on.to_string(),
        created_by: expense.created_by,
    }
}

fn detail_response(detail: engine::ExpenseDetail) -> ExpenseDetailResponse {
    ExpenseDetailResponse {
        expense: expense_view(detail.expense),
        approvals: detail
            .approvals
            .into_iter()
            .map(|approval| VoteView {
                ownership_id: approval.ownership_id,
                choice: map_choice(approval.choice),
                rationale: approval.rationale,
            })
            .collect(),
        allocations: detail
            .allocations
            .into_iter()
            .map(|allocation| AllocationView {
                ownership_id: allocation.ownership_id,
                amount_cents: allocation.amount_cents,
            })
            .collect(),
        tally: tally_view(detail.tally),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseDetailResponse>), ServerError> {
    let mut cmd = CreateExpenseCmd::new(
        property_id,
        &user.username,
        payload.amount_cents,
        payload.vendor_name,
        payload.incurred_on,
    );
    if let Some(category) = payload.category {
        cmd = cmd.category(category);
    }
    if let Some(url) = payload.receipt_url {
        cmd = cmd.receipt_url(url);
    }
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }

    let detail = state.engine.create_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(detail_response(detail))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(property_id, &user.username)
        .await?
        .into_iter()
        .map(expense_view)
        .collect();
    Ok(Json(ExpensesResponse { expenses }))
}

pub async fn detail(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<ExpenseDetailResponse>, ServerError> {
    let detail = state
        .engine
        .expense_detail(expense_id, &user.username)
        .await?;
    Ok(Json(detail_response(detail)))
}

pub async fn approve(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<api_types::booking::VoteNew>,
) -> Result<Json<ExpenseDetailResponse>, ServerError> {
    let mut cmd = CastExpenseApprovalCmd::new(
        expense_id,
        payload.ownership_id,
        &user.username,
        map_api_choice(payload.choice),
    );
    if let Some(rationale) = payload.rationale {
        cmd = cmd.rationale(rationale);
    }

    let detail = state.engine.cast_expense_approval(cmd).await?;
    Ok(Json(detail_response(detail)))
}

pub async fn reimburse(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .mark_expense_reimbursed(expense_id, &user.username)
        .await?;
    Ok(Json(expense_view(expense)))
}
