//! Per-ownership votes on a booking request.
//!
//! The composite primary key (booking_id, ownership_id) is the uniqueness
//! constraint that makes re-voting an upsert: the same owner voting twice
//! overwrites their previous choice instead of double-counting.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, VoteChoice};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingVote {
    pub booking_id: Uuid,
    pub ownership_id: Uuid,
    pub choice: VoteChoice,
    pub rationale: Option<String>,
    pub voted_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "booking_votes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub booking_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub ownership_id: String,
    pub choice: String,
    pub rationale: Option<String>,
    pub voted_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Bookings,
    #[sea_orm(
        belongs_to = "super::ownerships::Entity",
        from = "Column::OwnershipId",
        to = "super::ownerships::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Ownerships,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::ownerships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ownerships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BookingVote> for ActiveModel {
    fn from(vote: &BookingVote) -> Self {
        Self {
            booking_id: ActiveValue::Set(vote.booking_id.to_string()),
            ownership_id: ActiveValue::Set(vote.ownership_id.to_string()),
            choice: ActiveValue::Set(vote.choice.as_str().to_string()),
            rationale: ActiveValue::Set(vote.rationale.clone()),
            voted_at: ActiveValue::Set(vote.voted_at),
        }
    }
}

impl TryFrom<Model> for BookingVote {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            booking_id: Uuid::parse_str(&model.booking_id)
                .map_err(|_| EngineError::NotFound("booking".to_string()))?,
            ownership_id: Uuid::parse_str(&model.ownership_id)
                .map_err(|_| EngineError::NotFound("ownership".to_string()))?,
            choice: VoteChoice::try_from(model.choice.as_str())?,
            rationale: model.rationale,
            voted_at: model.voted_at,
        })
    }
}
