//! Shared-expense primitives.
//!
//! An expense is a cost one owner incurred on behalf of the property. Its
//! proportional split across ownerships is computed once at creation and
//! stored immutably in [`expense_allocations`](super::expense_allocations);
//! approval then follows the same weighted-vote flow as bookings, plus a
//! manual `reimbursed` transition once settled.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, VoteTally, expense_allocations::ExpenseAllocation,
    expense_approvals::ExpenseApproval,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
    Reimbursed,
}

impl ExpenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Reimbursed => "reimbursed",
        }
    }
}

impl TryFrom<&str> for ExpenseStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "reimbursed" => Ok(Self::Reimbursed),
            other => Err(EngineError::Validation(format!(
                "invalid expense status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub property_id: Uuid,
    pub amount_cents: i64,
    pub status: ExpenseStatus,
    pub vendor_name: String,
    pub category: Option<String>,
    pub receipt_url: Option<String>,
    pub notes: Option<String>,
    pub decision_summary: Option<String>,
    pub incurred_on: chrono::NaiveDate,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        property_id: Uuid,
        amount_cents: i64,
        vendor_name: String,
        category: Option<String>,
        receipt_url: Option<String>,
        notes: Option<String>,
        incurred_on: chrono::NaiveDate,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount_cents <= 0 {
            return Err(EngineError::Validation(
                "amount_cents must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            property_id,
            amount_cents,
            status: ExpenseStatus::Pending,
            vendor_name,
            category,
            receipt_url,
            notes,
            decision_summary: None,
            incurred_on,
            created_by,
            created_at,
        })
    }
}

/// An expense with its approvals, immutable allocations and current tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDetail {
    pub expense: Expense,
    pub approvals: Vec<ExpenseApproval>,
    pub allocations: Vec<ExpenseAllocation>,
    pub tally: VoteTally,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub property_id: String,
    pub amount_cents: i64,
    pub status: String,
    pub vendor_name: String,
    pub category: Option<String>,
    pub receipt_url: Option<String>,
    pub notes: Option<String>,
    pub decision_summary: Option<String>,
    pub incurred_on: Date,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::properties::Entity",
        from = "Column::PropertyId",
        to = "super::properties::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Properties,
    #[sea_orm(has_many = "super::expense_approvals::Entity")]
    ExpenseApprovals,
    #[sea_orm(has_many = "super::expense_allocations::Entity")]
    ExpenseAllocations,
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl Related<super::expense_approvals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseApprovals.def()
    }
}

impl Related<super::expense_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            property_id: ActiveValue::Set(expense.property_id.to_string()),
            amount_cents: ActiveValue::Set(expense.amount_cents),
            status: ActiveValue::Set(expense.status.as_str().to_string()),
            vendor_name: ActiveValue::Set(expense.vendor_name.clone()),
            category: ActiveValue::Set(expense.category.clone()),
            receipt_url: ActiveValue::Set(expense.receipt_url.clone()),
            notes: ActiveValue::Set(expense.notes.clone()),
            decision_summary: ActiveValue::Set(expense.decision_summary.clone()),
            incurred_on: ActiveValue::Set(expense.incurred_on),
            created_by: ActiveValue::Set(expense.created_by.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("expense".to_string()))?,
            property_id: Uuid::parse_str(&model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?,
            amount_cents: model.amount_cents,
            status: ExpenseStatus::try_from(model.status.as_str())?,
            vendor_name: model.vendor_name,
            category: model.category,
            receipt_url: model.receipt_url,
            notes: model.notes,
            decision_summary: model.decision_summary,
            incurred_on: model.incurred_on,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
