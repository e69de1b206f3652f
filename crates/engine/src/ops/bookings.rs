//! Booking lifecycle: creation with availability gating, weighted voting,
//! cancellation.
//!
//! Every write runs in a single transaction: the availability check and the
//! insert are never split, and a vote upsert always recomputes the tally
//! from the full committed vote set before a status transition is applied.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Booking, BookingDetail, BookingStatus, BookingVote, CastBookingVoteCmd, CreateBookingCmd,
    DayRange, EngineError, ResultEngine, VoteTally, booking_votes, bookings, tally_votes,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    async fn find_booking(
        &self,
        db: &DatabaseTransaction,
        booking_id: Uuid,
    ) -> ResultEngine<bookings::Model> {
        bookings::Entity::find_by_id(booking_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("booking".to_string()))
    }

    async fn booking_votes(
        &self,
        db: &DatabaseTransaction,
        booking_id: Uuid,
    ) -> ResultEngine<Vec<BookingVote>> {
        let models = booking_votes::Entity::find()
            .filter(booking_votes::Column::BookingId.eq(booking_id.to_string()))
            .order_by_asc(booking_votes::Column::VotedAt)
            .all(db)
            .await?;

        let mut votes = Vec::with_capacity(models.len());
        for model in models {
            votes.push(BookingVote::try_from(model)?);
        }
        Ok(votes)
    }

    /// Recomputes the tally for a booking from all committed votes and the
    /// property's full ownership roster.
    async fn booking_tally(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        votes: &[BookingVote],
    ) -> ResultEngine<VoteTally> {
        let ownerships = self.property_ownerships(db, property_id).await?;
        let total_power: i64 = ownerships.iter().map(|o| o.voting_power).sum();
        let power_by_id: HashMap<String, i64> = ownerships
            .into_iter()
            .map(|o| (o.id, o.voting_power))
            .collect();

        let weighted = votes.iter().map(|vote| {
            let power = power_by_id
                .get(&vote.ownership_id.to_string())
                .copied()
                .unwrap_or(0);
            (power, vote.choice)
        });
        Ok(tally_votes(weighted, total_power))
    }

    async fn booking_detail_in(
        &self,
        db: &DatabaseTransaction,
        model: bookings::Model,
    ) -> ResultEngine<BookingDetail> {
        let booking = Booking::try_from(model)?;
        let votes = self.booking_votes(db, booking.id).await?;
        let tally = self.booking_tally(db, booking.property_id, &votes).await?;
        Ok(BookingDetail {
            booking,
            votes,
            tally,
        })
    }

    /// Creates a booking request in `pending` state.
    ///
    /// The availability check, min-stay policy and pricing all run inside
    /// the same transaction as the insert, so two concurrent requests for
    /// overlapping dates cannot both slip through.
    pub async fn create_booking(&self, cmd: CreateBookingCmd) -> ResultEngine<Booking> {
        with_tx!(self, |db_tx| {
            let (property, _membership) = self
                .require_member(&db_tx, cmd.property_id, &cmd.user_id)
                .await?;

            let stay = DayRange::parse(&cmd.start_date, &cmd.end_date)?;
            if stay.nights() < property.min_nights {
                return Err(EngineError::Validation(format!(
                    "minimum stay is {} nights",
                    property.min_nights
                )));
            }
            self.ensure_range_free(&db_tx, cmd.property_id, &stay).await?;

            let total_cents = Self::price_stay(&property, &stay);
            let booking = Booking::new(
                cmd.property_id,
                stay,
                total_cents,
                normalize_optional_text(cmd.request_notes.as_deref()),
                cmd.guest,
                cmd.user_id,
                Utc::now(),
            );
            bookings::ActiveModel::from(&booking).insert(&db_tx).await?;

            Ok(booking)
        })
    }

    /// Casts (or replaces) a vote on a pending booking and recomputes the
    /// decision.
    ///
    /// The vote is upserted on its (booking, ownership) key, the tally is
    /// recomputed from the full vote set, and a decisive result updates the
    /// booking's status and decision summary, all in one transaction.
    pub async fn cast_booking_vote(&self, cmd: CastBookingVoteCmd) -> ResultEngine<BookingDetail> {
        with_tx!(self, |db_tx| {
            let booking_model = self.find_booking(&db_tx, cmd.booking_id).await?;
            let property_id = Uuid::parse_str(&booking_model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?;
            self.require_member(&db_tx, property_id, &cmd.user_id).await?;

            let ownership = self
                .require_ownership_in_property(&db_tx, property_id, cmd.ownership_id)
                .await?;
            if ownership.user_id != cmd.user_id {
                return Err(EngineError::Forbidden(
                    "votes must be cast through your own ownership".to_string(),
                ));
            }

            let status = BookingStatus::try_from(booking_model.status.as_str())?;
            if status != BookingStatus::Pending {
                return Err(EngineError::Conflict(
                    "booking is no longer open for voting".to_string(),
                ));
            }

            let vote = BookingVote {
                booking_id: cmd.booking_id,
                ownership_id: cmd.ownership_id,
                choice: cmd.choice,
                rationale: normalize_optional_text(cmd.rationale.as_deref()),
                voted_at: Utc::now(),
            };
            let active = booking_votes::ActiveModel::from(&vote);

            // Upsert on the composite key: re-voting overwrites, never duplicates.
            match booking_votes::Entity::find_by_id((
                cmd.booking_id.to_string(),
                cmd.ownership_id.to_string(),
            ))
            .one(&db_tx)
            .await?
            {
                Some(_) => {
                    active.update(&db_tx).await?;
                }
                None => {
                    active.insert(&db_tx).await?;
                }
            }

            let votes = self.booking_votes(&db_tx, cmd.booking_id).await?;
            let tally = self.booking_tally(&db_tx, property_id, &votes).await?;

            let mut booking = Booking::try_from(booking_model)?;
            if let Some(summary) = tally.decision_summary() {
                let new_status = match tally.decision() {
                    Some(crate::Decision::Approved) => BookingStatus::Approved,
                    _ => BookingStatus::Rejected,
                };
                let update = bookings::ActiveModel {
                    id: ActiveValue::Set(cmd.booking_id.to_string()),
                    status: ActiveValue::Set(new_status.as_str().to_string()),
                    decision_summary: ActiveValue::Set(Some(summary.clone())),
                    ..Default::default()
                };
                update.update(&db_tx).await?;

                booking.status = new_status;
                booking.decision_summary = Some(summary);
            }

            Ok(BookingDetail {
                booking,
                votes,
                tally,
            })
        })
    }

    /// Cancels a pending booking (requester or primary owner).
    ///
    /// Cancellation is terminal and frees the booked dates.
    pub async fn cancel_booking(&self, booking_id: Uuid, user_id: &str) -> ResultEngine<Booking> {
        with_tx!(self, |db_tx| {
            let booking_model = self.find_booking(&db_tx, booking_id).await?;
            let property_id = Uuid::parse_str(&booking_model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?;
            let (_, membership) = self.require_member(&db_tx, property_id, user_id).await?;

            let role = crate::OwnershipRole::try_from(membership.role.as_str())?;
            if booking_model.created_by != user_id && !role.can_manage() {
                return Err(EngineError::Forbidden(
                    "only the requester or the primary owner can cancel".to_string(),
                ));
            }

            let status = BookingStatus::try_from(booking_model.status.as_str())?;
            if status != BookingStatus::Pending {
                return Err(EngineError::Conflict(format!(
                    "cannot cancel a {} booking",
                    status.as_str()
                )));
            }

            let update = bookings::ActiveModel {
                id: ActiveValue::Set(booking_id.to_string()),
                status: ActiveValue::Set(BookingStatus::Cancelled.as_str().to_string()),
                ..Default::default()
            };
            update.update(&db_tx).await?;

            let mut booking = Booking::try_from(booking_model)?;
            booking.status = BookingStatus::Cancelled;
            Ok(booking)
        })
    }

    /// Returns a booking with its votes and current tally (member-only).
    pub async fn booking_detail(
        &self,
        booking_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<BookingDetail> {
        with_tx!(self, |db_tx| {
            let booking_model = self.find_booking(&db_tx, booking_id).await?;
            let property_id = Uuid::parse_str(&booking_model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?;
            self.require_member(&db_tx, property_id, user_id).await?;
            self.booking_detail_in(&db_tx, booking_model).await
        })
    }

    /// Lists a property's bookings ordered by start date (member-only).
    pub async fn list_bookings(
        &self,
        property_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Booking>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, property_id, user_id).await?;

            let models = bookings::Entity::find()
                .filter(bookings::Column::PropertyId.eq(property_id.to_string()))
                .order_by_asc(bookings::Column::StartDate)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Booking::try_from(model)?);
            }
            Ok(out)
        })
    }
}
