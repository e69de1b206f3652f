//! Booking request primitives.
//!
//! A booking is a half-open `[start_date, end_date)` stay request against a
//! property. It is created `pending` with a price computed from the
//! property's rates, then decided by weighted owner votes.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DayRange, EngineError, VoteTally, booking_votes::BookingVote};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a booking in this status still blocks its dates.
    ///
    /// Pending requests hold their dates until decided; rejected and
    /// cancelled bookings free them.
    #[must_use]
    pub fn blocks_dates(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl TryFrom<&str> for BookingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::Validation(format!(
                "invalid booking status: {other}"
            ))),
        }
    }
}

/// Optional contact details for the stay's guest party.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub property_id: Uuid,
    pub stay: DayRange,
    pub status: BookingStatus,
    pub total_cents: i64,
    pub decision_summary: Option<String>,
    pub request_notes: Option<String>,
    pub guest: GuestInfo,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        property_id: Uuid,
        stay: DayRange,
        total_cents: i64,
        request_notes: Option<String>,
        guest: GuestInfo,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            stay,
            status: BookingStatus::Pending,
            total_cents,
            decision_summary: None,
            request_notes,
            guest,
            created_by,
            created_at,
        }
    }
}

/// A booking together with its vote set and the recomputed tally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetail {
    pub booking: Booking,
    pub votes: Vec<BookingVote>,
    pub tally: VoteTally,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub property_id: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub total_cents: i64,
    pub decision_summary: Option<String>,
    pub request_notes: Option<String>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
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
    #[sea_orm(has_many = "super::booking_votes::Entity")]
    BookingVotes,
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

impl From<&Booking> for ActiveModel {
    fn from(booking: &Booking) -> Self {
        Self {
            id: ActiveValue::Set(booking.id.to_string()),
            property_id: ActiveValue::Set(booking.property_id.to_string()),
            start_date: ActiveValue::Set(booking.stay.start),
            end_date: ActiveValue::Set(booking.stay.end),
            status: ActiveValue::Set(booking.status.as_str().to_string()),
            total_cents: ActiveValue::Set(booking.total_cents),
            decision_summary: ActiveValue::Set(booking.decision_summary.clone()),
            request_notes: ActiveValue::Set(booking.request_notes.clone()),
            guest_name: ActiveValue::Set(booking.guest.name.clone()),
            guest_email: ActiveValue::Set(booking.guest.email.clone()),
            guest_phone: ActiveValue::Set(booking.guest.phone.clone()),
            created_by: ActiveValue::Set(booking.created_by.clone()),
            created_at: ActiveValue::Set(booking.created_at),
        }
    }
}

impl TryFrom<Model> for Booking {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("booking".to_string()))?,
            property_id: Uuid::parse_str(&model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?,
            stay: DayRange::new(model.start_date, model.end_date)?,
            status: BookingStatus::try_from(model.status.as_str())?,
            total_cents: model.total_cents,
            decision_summary: model.decision_summary,
            request_notes: model.request_notes,
            guest: GuestInfo {
                name: model.guest_name,
                email: model.guest_email,
                phone: model.guest_phone,
            },
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
