//! Owner-declared unavailable windows.
//!
//! A blackout is a half-open `[start_date, end_date)` window during which no
//! new booking may be created. It is independent of bookings and only gates
//! requests made after it exists.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DayRange, EngineError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blackout {
    pub id: Uuid,
    pub property_id: Uuid,
    pub window: DayRange,
    pub reason: Option<String>,
    pub created_by: String,
}

impl Blackout {
    pub fn new(
        property_id: Uuid,
        window: DayRange,
        reason: Option<String>,
        created_by: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            window,
            reason,
            created_by,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "blackouts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub property_id: String,
    pub start_date: Date,
    pub end_date: Date,
    pub reason: Option<String>,
    pub created_by: String,
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
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Blackout> for ActiveModel {
    fn from(blackout: &Blackout) -> Self {
        Self {
            id: ActiveValue::Set(blackout.id.to_string()),
            property_id: ActiveValue::Set(blackout.property_id.to_string()),
            start_date: ActiveValue::Set(blackout.window.start),
            end_date: ActiveValue::Set(blackout.window.end),
            reason: ActiveValue::Set(blackout.reason.clone()),
            created_by: ActiveValue::Set(blackout.created_by.clone()),
        }
    }
}

impl TryFrom<Model> for Blackout {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("blackout".to_string()))?,
            property_id: Uuid::parse_str(&model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?,
            window: DayRange::new(model.start_date, model.end_date)?,
            reason: model.reason,
            created_by: model.created_by,
        })
    }
}
