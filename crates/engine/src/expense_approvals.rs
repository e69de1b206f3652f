//! Per-ownership approval votes on an expense.
//!
//! Same shape and upsert rule as booking votes; additionally only
//! ownerships flagged `expense_approver` may hold a row here.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, VoteChoice};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseApproval {
    pub expense_id: Uuid,
    pub ownership_id: Uuid,
    pub choice: VoteChoice,
    pub rationale: Option<String>,
    pub voted_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_approvals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub expense_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ownership_id: String,
    pub choice: String,
    pub rationale: Option<String>,
    pub voted_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
    #[sea_orm(
        belongs_to = "super::ownerships::Entity",
        from = "Column::OwnershipId",
        to = "super::ownerships::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Ownerships,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::ownerships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ownerships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ExpenseApproval> for ActiveModel {
    fn from(approval: &ExpenseApproval) -> Self {
        Self {
            expense_id: ActiveValue::Set(approval.expense_id.to_string()),
            ownership_id: ActiveValue::Set(approval.ownership_id.to_string()),
            choice: ActiveValue::Set(approval.choice.as_str().to_string()),
            rationale: ActiveValue::Set(approval.rationale.clone()),
            voted_at: ActiveValue::Set(approval.voted_at),
        }
    }
}

impl TryFrom<Model> for ExpenseApproval {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            expense_id: Uuid::parse_str(&model.expense_id)
                .map_err(|_| EngineError::NotFound("expense".to_string()))?,
            ownership_id: Uuid::parse_str(&model.ownership_id)
                .map_err(|_| EngineError::NotFound("ownership".to_string()))?,
            choice: VoteChoice::try_from(model.choice.as_str())?,
            rationale: model.rationale,
            voted_at: model.voted_at,
        })
    }
}
