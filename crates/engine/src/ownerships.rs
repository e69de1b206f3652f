//! The module contains the representation of an ownership stake.
//!
//! One row per (property, user): the owner's share in basis points, their
//! voting power for approval tallies, a role, and capability flags. Share
//! and power are deliberately independent, a 10% owner may well hold half
//! the voting power. Shares across a property sum to 10000 bps by
//! convention; the allocation math assumes it but does not enforce it.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, money::BPS_SCALE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipRole {
    Primary,
    Owner,
    Caretaker,
}

impl OwnershipRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Owner => "owner",
            Self::Caretaker => "caretaker",
        }
    }

    /// Only the primary ownership manages the roster and settles expenses.
    #[must_use]
    pub fn can_manage(self) -> bool {
        matches!(self, Self::Primary)
    }
}

impl TryFrom<&str> for OwnershipRole {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "primary" => Ok(Self::Primary),
            "owner" => Ok(Self::Owner),
            "caretaker" => Ok(Self::Caretaker),
            other => Err(EngineError::Validation(format!(
                "invalid ownership role: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    pub id: Uuid,
    pub property_id: Uuid,
    pub user_id: String,
    pub share_bps: i64,
    pub voting_power: i64,
    pub role: OwnershipRole,
    pub blackout_manager: bool,
    pub expense_approver: bool,
    pub created_at: DateTime<Utc>,
}

impl Ownership {
    pub fn new(
        property_id: Uuid,
        user_id: String,
        share_bps: i64,
        voting_power: i64,
        role: OwnershipRole,
        blackout_manager: bool,
        expense_approver: bool,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !(0..=BPS_SCALE).contains(&share_bps) {
            return Err(EngineError::Validation(format!(
                "share_bps must be within 0..={BPS_SCALE}"
            )));
        }
        if voting_power < 0 {
            return Err(EngineError::Validation(
                "voting_power must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            property_id,
            user_id,
            share_bps,
            voting_power,
            role,
            blackout_manager,
            expense_approver,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ownerships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub property_id: String,
    pub user_id: String,
    pub share_bps: i64,
    pub voting_power: i64,
    pub role: String,
    pub blackout_manager: bool,
    pub expense_approver: bool,
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
    #[sea_orm(has_many = "super::booking_votes::Entity")]
    BookingVotes,
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

impl Related<super::booking_votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookingVotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Ownership> for ActiveModel {
    fn from(ownership: &Ownership) -> Self {
        Self {
            id: ActiveValue::Set(ownership.id.to_string()),
            property_id: ActiveValue::Set(ownership.property_id.to_string()),
            user_id: ActiveValue::Set(ownership.user_id.clone()),
            share_bps: ActiveValue::Set(ownership.share_bps),
            voting_power: ActiveValue::Set(ownership.voting_power),
            role: ActiveValue::Set(ownership.role.as_str().to_string()),
            blackout_manager: ActiveValue::Set(ownership.blackout_manager),
            expense_approver: ActiveValue::Set(ownership.expense_approver),
            created_at: ActiveValue::Set(ownership.created_at),
        }
    }
}

impl TryFrom<Model> for Ownership {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("ownership".to_string()))?,
            property_id: Uuid::parse_str(&model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?,
            user_id: model.user_id,
            share_bps: model.share_bps,
            voting_power: model.voting_power,
            role: OwnershipRole::try_from(model.role.as_str())?,
            blackout_manager: model.blackout_manager,
            expense_approver: model.expense_approver,
            created_at: model.created_at,
        })
    }
}
