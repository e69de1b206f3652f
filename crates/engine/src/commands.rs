//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create booking, cast
//! vote, create expense, ...), keeping call sites readable and avoiding long
//! argument lists. Dates travel as ISO `YYYY-MM-DD` strings so the engine
//! owns their validation.

use uuid::Uuid;

use crate::{GuestInfo, OwnershipRole, VoteChoice};

/// Create a booking request on a property.
#[derive(Clone, Debug)]
pub struct CreateBookingCmd {
    pub property_id: Uuid,
    pub start_date: String,
    pub end_date: String,
    pub guest: GuestInfo,
    pub request_notes: Option<String>,
    pub user_id: String,
}

impl CreateBookingCmd {
    #[must_use]
    pub fn new(
        property_id: Uuid,
        user_id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            property_id,
            start_date: start_date.into(),
            end_date: end_date.into(),
            guest: GuestInfo::default(),
            request_notes: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn guest(mut self, guest: GuestInfo) -> Self {
        self.guest = guest;
        self
    }

    #[must_use]
    pub fn request_notes(mut self, notes: impl Into<String>) -> Self {
        self.request_notes = Some(notes.into());
        self
    }
}

/// Cast (or replace) a vote on a pending booking.
#[derive(Clone, Debug)]
pub struct CastBookingVoteCmd {
    pub booking_id: Uuid,
    pub ownership_id: Uuid,
    pub choice: VoteChoice,
    pub rationale: Option<String>,
    pub user_id: String,
}

impl CastBookingVoteCmd {
    #[must_use]
    pub fn new(
        booking_id: Uuid,
        ownership_id: Uuid,
        user_id: impl Into<String>,
        choice: VoteChoice,
    ) -> Self {
        Self {
            booking_id,
            ownership_id,
            choice,
            rationale: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

/// Record a shared expense; allocations are computed once at creation.
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub property_id: Uuid,
    pub amount_cents: i64,
    pub vendor_name: String,
    pub category: Option<String>,
    pub receipt_url: Option<String>,
    pub notes: Option<String>,
    pub incurred_on: String,
    pub user_id: String,
}

impl CreateExpenseCmd {
    #[must_use]
    pub fn new(
        property_id: Uuid,
        user_id: impl Into<String>,
        amount_cents: i64,
        vendor_name: impl Into<String>,
        incurred_on: impl Into<String>,
    ) -> Self {
        Self {
            property_id,
            amount_cents,
            vendor_name: vendor_name.into(),
            category: None,
            receipt_url: None,
            notes: None,
            incurred_on: incurred_on.into(),
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn receipt_url(mut self, url: impl Into<String>) -> Self {
        self.receipt_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Cast (or replace) an approval vote on a pending expense.
#[derive(Clone, Debug)]
pub struct CastExpenseApprovalCmd {
    pub expense_id: Uuid,
    pub ownership_id: Uuid,
    pub choice: VoteChoice,
    pub rationale: Option<String>,
    pub user_id: String,
}

impl CastExpenseApprovalCmd {
    #[must_use]
    pub fn new(
        expense_id: Uuid,
        ownership_id: Uuid,
        user_id: impl Into<String>,
        choice: VoteChoice,
    ) -> Self {
        Self {
            expense_id,
            ownership_id,
            choice,
            rationale: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

/// Declare a blackout window on a property.
#[derive(Clone, Debug)]
pub struct CreateBlackoutCmd {
    pub property_id: Uuid,
    pub start_date: String,
    pub end_date: String,
    pub reason: Option<String>,
    pub user_id: String,
}

impl CreateBlackoutCmd {
    #[must_use]
    pub fn new(
        property_id: Uuid,
        user_id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            property_id,
            start_date: start_date.into(),
            end_date: end_date.into(),
            reason: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Provision a property with its primary ownership.
#[derive(Clone, Debug)]
pub struct NewPropertyCmd {
    pub name: String,
    pub nightly_rate_cents: i64,
    pub cleaning_fee_cents: i64,
    pub min_nights: i64,
    pub user_id: String,
}

impl NewPropertyCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nightly_rate_cents: 0,
            cleaning_fee_cents: 0,
            min_nights: 1,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn nightly_rate_cents(mut self, cents: i64) -> Self {
        self.nightly_rate_cents = cents;
        self
    }

    #[must_use]
    pub fn cleaning_fee_cents(mut self, cents: i64) -> Self {
        self.cleaning_fee_cents = cents;
        self
    }

    #[must_use]
    pub fn min_nights(mut self, nights: i64) -> Self {
        self.min_nights = nights;
        self
    }
}

/// Add or update a co-owner row (primary-only).
#[derive(Clone, Debug)]
pub struct UpsertOwnershipCmd {
    pub property_id: Uuid,
    pub member_user_id: String,
    pub share_bps: i64,
    pub voting_power: i64,
    pub role: OwnershipRole,
    pub blackout_manager: bool,
    pub expense_approver: bool,
    pub user_id: String,
}

impl UpsertOwnershipCmd {
    #[must_use]
    pub fn new(
        property_id: Uuid,
        user_id: impl Into<String>,
        member_user_id: impl Into<String>,
        share_bps: i64,
        voting_power: i64,
    ) -> Self {
        Self {
            property_id,
            member_user_id: member_user_id.into(),
            share_bps,
            voting_power,
            role: OwnershipRole::Owner,
            blackout_manager: false,
            expense_approver: false,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn role(mut self, role: OwnershipRole) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn blackout_manager(mut self, enabled: bool) -> Self {
        self.blackout_manager = enabled;
        self
    }

    #[must_use]
    pub fn expense_approver(mut self, enabled: bool) -> Self {
        self.expense_approver = enabled;
        self
    }
}
