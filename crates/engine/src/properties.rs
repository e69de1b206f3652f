//! The module contains the representation of a shared property.
//!
//! A property is the physical asset the co-owners share: it carries the
//! pricing inputs for bookings (nightly rate and cleaning fee, both integer
//! cents), the minimum-stay policy, and the approval policy used to decide
//! booking and expense requests. Ownership stakes live in
//! [`ownerships`](super::ownerships).

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// How booking/expense requests on a property get decided.
///
/// Only strict majority of total voting power is implemented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPolicy {
    #[default]
    Majority,
}

impl ApprovalPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Majority => "majority",
        }
    }
}

impl TryFrom<&str> for ApprovalPolicy {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "majority" => Ok(Self::Majority),
            other => Err(EngineError::Validation(format!(
                "invalid approval policy: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub nightly_rate_cents: i64,
    pub cleaning_fee_cents: i64,
    pub min_nights: i64,
    pub approval_policy: ApprovalPolicy,
    pub created_by: String,
}

impl Property {
    pub fn new(
        name: String,
        nightly_rate_cents: i64,
        cleaning_fee_cents: i64,
        min_nights: i64,
        created_by: String,
    ) -> ResultEngine<Self> {
        if nightly_rate_cents < 0 {
            return Err(EngineError::Validation(
                "nightly_rate_cents must be >= 0".to_string(),
            ));
        }
        if cleaning_fee_cents < 0 {
            return Err(EngineError::Validation(
                "cleaning_fee_cents must be >= 0".to_string(),
            ));
        }
        if min_nights < 1 {
            return Err(EngineError::Validation(
                "min_nights must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            nightly_rate_cents,
            cleaning_fee_cents,
            min_nights,
            approval_policy: ApprovalPolicy::default(),
            created_by,
        })
    }
}

/// A property together with its ownership roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDetail {
    pub property: Property,
    pub ownerships: Vec<super::ownerships::Ownership>,
    /// Sum of voting power across all ownerships; the tally denominator.
    pub total_voting_power: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub nightly_rate_cents: i64,
    pub cleaning_fee_cents: i64,
    pub min_nights: i64,
    pub approval_policy: String,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ownerships::Entity")]
    Ownerships,
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::blackouts::Entity")]
    Blackouts,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::ownerships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ownerships.def()
    }
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::blackouts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blackouts.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Property> for ActiveModel {
    fn from(property: &Property) -> Self {
        Self {
            id: ActiveValue::Set(property.id.to_string()),
            name: ActiveValue::Set(property.name.clone()),
            nightly_rate_cents: ActiveValue::Set(property.nightly_rate_cents),
            cleaning_fee_cents: ActiveValue::Set(property.cleaning_fee_cents),
            min_nights: ActiveValue::Set(property.min_nights),
            approval_policy: ActiveValue::Set(property.approval_policy.as_str().to_string()),
            created_by: ActiveValue::Set(property.created_by.clone()),
        }
    }
}

impl TryFrom<Model> for Property {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?,
            name: model.name,
            nightly_rate_cents: model.nightly_rate_cents,
            cleaning_fee_cents: model.cleaning_fee_cents,
            min_nights: model.min_nights,
            approval_policy: ApprovalPolicy::try_from(model.approval_policy.as_str())?,
            created_by: model.created_by,
        })
    }
}
