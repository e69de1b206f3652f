//! Date-range availability: overlap queries, the day calendar, pricing.
//!
//! All overlap checks use the half-open rule from [`crate::dates`]: a range
//! blocks the days `[start, end)` and nothing else, so back-to-back stays
//! sharing a checkout/check-in day never conflict.

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Blackout, Booking, BookingStatus, DayRange, EngineError, ResultEngine, blackouts, bookings,
    properties,
};

use super::{Engine, with_tx};

/// One day of the requested reporting window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityDay {
    pub day: chrono::NaiveDate,
    pub available: bool,
}

/// Day-by-day availability for a window, with the items blocking it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub window: DayRange,
    pub days: Vec<AvailabilityDay>,
    pub bookings: Vec<Booking>,
    pub blackouts: Vec<Blackout>,
}

impl Engine {
    /// Bookings that still block dates and overlap the given range.
    ///
    /// Rejected and cancelled bookings free their dates and are excluded.
    pub(super) async fn blocking_bookings(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        range: &DayRange,
    ) -> ResultEngine<Vec<bookings::Model>> {
        bookings::Entity::find()
            .filter(bookings::Column::PropertyId.eq(property_id.to_string()))
            .filter(bookings::Column::Status.is_in([
                BookingStatus::Pending.as_str(),
                BookingStatus::Approved.as_str(),
            ]))
            .filter(bookings::Column::StartDate.lt(range.end))
            .filter(bookings::Column::EndDate.gt(range.start))
            .order_by_asc(bookings::Column::StartDate)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Blackout windows overlapping the given range.
    pub(super) async fn blackouts_overlapping(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        range: &DayRange,
    ) -> ResultEngine<Vec<blackouts::Model>> {
        blackouts::Entity::find()
            .filter(blackouts::Column::PropertyId.eq(property_id.to_string()))
            .filter(blackouts::Column::StartDate.lt(range.end))
            .filter(blackouts::Column::EndDate.gt(range.start))
            .order_by_asc(blackouts::Column::StartDate)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Fails with a conflict when the candidate range overlaps any blocking
    /// booking or blackout. Must run inside the same transaction as the
    /// insert it gates.
    pub(super) async fn ensure_range_free(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        range: &DayRange,
    ) -> ResultEngine<()> {
        if !self.blocking_bookings(db, property_id, range).await?.is_empty() {
            return Err(EngineError::Conflict(
                "requested dates overlap an existing booking".to_string(),
            ));
        }
        if !self
            .blackouts_overlapping(db, property_id, range)
            .await?
            .is_empty()
        {
            return Err(EngineError::Conflict(
                "requested dates fall inside a blackout".to_string(),
            ));
        }
        Ok(())
    }

    /// Total price of a stay: nights x nightly rate, plus the cleaning fee.
    pub(super) fn price_stay(property: &properties::Model, range: &DayRange) -> i64 {
        range.nights() * property.nightly_rate_cents + property.cleaning_fee_cents
    }

    /// Day-by-day availability over `[from, to)` for a property.
    ///
    /// Member-only. A day is unavailable when it falls inside any blocking
    /// booking's or blackout's half-open interval.
    pub async fn check_availability(
        &self,
        property_id: Uuid,
        from: &str,
        to: &str,
        user_id: &str,
    ) -> ResultEngine<AvailabilityReport> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, property_id, user_id).await?;
            let window = DayRange::parse(from, to)?;

            let booking_models = self.blocking_bookings(&db_tx, property_id, &window).await?;
            let blackout_models = self
                .blackouts_overlapping(&db_tx, property_id, &window)
                .await?;

            let mut bookings_out = Vec::with_capacity(booking_models.len());
            for model in booking_models {
                bookings_out.push(Booking::try_from(model)?);
            }
            let mut blackouts_out = Vec::with_capacity(blackout_models.len());
            for model in blackout_models {
                blackouts_out.push(Blackout::try_from(model)?);
            }

            let days = window
                .days()
                .map(|day| {
                    let blocked = bookings_out.iter().any(|b| b.stay.contains(day))
                        || blackouts_out.iter().any(|b| b.window.contains(day));
                    AvailabilityDay {
                        day,
                        available: !blocked,
                    }
                })
                .collect();

            Ok(AvailabilityReport {
                window,
                days,
                bookings: bookings_out,
                blackouts: blackouts_out,
            })
        })
    }
}
