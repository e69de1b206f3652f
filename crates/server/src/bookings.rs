//! Booking endpoints: availability calendar, requests, votes, cancellation.

use api_types::availability::{AvailabilityDayView, AvailabilityQuery, AvailabilityResponse};
use api_types::blackout::BlackoutView;
use api_types::booking::{
    BookingDetailResponse, BookingNew, BookingView, BookingsResponse, VoteNew, VoteView,
};
use api_types::{TallyView, VoteChoice as ApiChoice};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use engine::{CastBookingVoteCmd, CreateBookingCmd, GuestInfo};

use crate::{ServerError, server::ServerState, user};

pub(crate) fn map_choice(choice: engine::VoteChoice) -> ApiChoice {
    match choice {
        engine::VoteChoice::Approve => ApiChoice::Approve,
        engine::VoteChoice::Reject => ApiChoice::Reject,
    }
}

pub(crate) fn map_api_choice(choice: ApiChoice) -> engine::VoteChoice {
    match choice {
        ApiChoice::Approve => engine::VoteChoice::Approve,
        ApiChoice::Reject => engine::VoteChoice::Reject,
    }
}

pub(crate) fn tally_view(tally: engine::VoteTally) -> TallyView {
    TallyView {
        total_power: tally.total_power,
        threshold: tally.threshold,
        approvals_power: tally.approvals_power,
        rejections_power: tally.rejections_power,
    }
}

fn booking_view(booking: engine::Booking) -> BookingView {
    BookingView {
        id: booking.id,
        property_id: booking.property_id,
        start_date: booking.stay.start.to_string(),
        end_date: booking.stay.end.to_string(),
        status: booking.status.as_str().to_string(),
        total_cents: booking.total_cents,
        decision_summary: booking.decision_summary,
        request_notes: booking.request_notes,
        guest_name: booking.guest.name,
        created_by: booking.created_by,
    }
}

fn blackout_view(blackout: engine::Blackout) -> BlackoutView {
    BlackoutView {
        id: blackout.id,
        start_date: blackout.window.start.to_string(),
        end_date: blackout.window.end.to_string(),
        reason: blackout.reason,
        created_by: blackout.created_by,
    }
}

fn detail_response(detail: engine::BookingDetail) -> BookingDetailResponse {
    BookingDetailResponse {
        booking: booking_view(detail.booking),
        votes: detail
            .votes
            .into_iter()
            .map(|vote| VoteView {
                ownership_id: vote.ownership_id,
                choice: map_choice(vote.choice),
                rationale: vote.rationale,
            })
            .collect(),
        tally: tally_view(detail.tally),
    }
}

pub async fn availability(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, ServerError> {
    let report = state
        .engine
        .check_availability(property_id, &query.from, &query.to, &user.username)
        .await?;

    Ok(Json(AvailabilityResponse {
        days: report
            .days
            .into_iter()
            .map(|d| AvailabilityDayView {
                day: d.day.to_string(),
                available: d.available,
            })
            .collect(),
        bookings: report.bookings.into_iter().map(booking_view).collect(),
        blackouts: report.blackouts.into_iter().map(blackout_view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
    Json(payload): Json<BookingNew>,
) -> Result<(StatusCode, Json<BookingView>), ServerError> {
    let mut cmd = CreateBookingCmd::new(
        property_id,
        &user.username,
        payload.start_date,
        payload.end_date,
    )
    .guest(GuestInfo {
        name: payload.guest_name,
        email: payload.guest_email,
        phone: payload.guest_phone,
    });
    if let Some(notes) = payload.request_notes {
        cmd = cmd.request_notes(notes);
    }

    let booking = state.engine.create_booking(cmd).await?;
    Ok((StatusCode::CREATED, Json(booking_view(booking))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<BookingsResponse>, ServerError> {
    let bookings = state
        .engine
        .list_bookings(property_id, &user.username)
        .await?
        .into_iter()
        .map(booking_view)
        .collect();
    Ok(Json(BookingsResponse { bookings }))
}

pub async fn detail(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingDetailResponse>, ServerError> {
    let detail = state
        .engine
        .booking_detail(booking_id, &user.username)
        .await?;
    Ok(Json(detail_response(detail)))
}

pub async fn vote(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<VoteNew>,
) -> Result<Json<BookingDetailResponse>, ServerError> {
    let mut cmd = CastBookingVoteCmd::new(
        booking_id,
        payload.ownership_id,
        &user.username,
        map_api_choice(payload.choice),
    );
    if let Some(rationale) = payload.rationale {
        cmd = cmd.rationale(rationale);
    }

    let detail = state.engine.cast_booking_vote(cmd).await?;
    Ok(Json(detail_response(detail)))
}

pub async fn cancel(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state
        .engine
        .cancel_booking(booking_id, &user.username)
        .await?;
    Ok(Json(booking_view(booking)))
}
