//! Immutable proportional splits of an expense across ownerships.
//!
//! One row per (expense, ownership), written once when the expense is
//! created and never recomputed. The amounts sum exactly to the expense
//! total; any rounding drift sits on the last ownership in creation order.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseAllocation {
    pub expense_id: Uuid,
    pub ownership_id: Uuid,
    pub amount_cents: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_allocations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub expense_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ownership_id: String,
    pub amount_cents: i64,
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

impl From<&ExpenseAllocation> for ActiveModel {
    fn from(allocation: &ExpenseAllocation) -> Self {
        Self {
            expense_id: ActiveValue::Set(allocation.expense_id.to_string()),
            ownership_id: ActiveValue::Set(allocation.ownership_id.to_string()),
            amount_cents: ActiveValue::Set(allocation.amount_cents),
        }
    }
}

impl TryFrom<Model> for ExpenseAllocation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            expense_id: Uuid::parse_str(&model.expense_id)
                .map_err(|_| EngineError::NotFound("expense".to_string()))?,
            ownership_id: Uuid::parse_str(&model.ownership_id)
                .map_err(|_| EngineError::NotFound("ownership".to_string()))?,
            amount_cents: model.amount_cents,
        })
    }
}
