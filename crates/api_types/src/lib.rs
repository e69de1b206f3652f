use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A voter's choice on a pending booking or expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Approve,
    Reject,
}

impl VoteChoice {
    /// Returns the canonical choice string used by the engine/database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Recomputed vote state returned with every booking/expense detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct TallyView {
    pub total_power: i64,
    pub threshold: i64,
    pub approvals_power: i64,
    pub rejections_power: i64,
}

pub mod property {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PropertyNew {
        pub name: String,
        pub nightly_rate_cents: i64,
        pub cleaning_fee_cents: i64,
        /// Defaults to 1 when omitted.
        pub min_nights: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PropertyView {
        pub id: Uuid,
        pub name: String,
        pub nightly_rate_cents: i64,
        pub cleaning_fee_cents: i64,
        pub min_nights: i64,
        pub approval_policy: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PropertiesResponse {
        pub properties: Vec<PropertyView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PropertyDetailResponse {
        pub property: PropertyView,
        pub ownerships: Vec<super::ownership::OwnershipView>,
        pub total_voting_power: i64,
    }
}

pub mod ownership {
    use super::*;

    /// Role of an ownership on a property.
    ///
    /// The server treats roles as:
    /// - `primary`: manages the roster, settles expenses.
    /// - `owner`: a regular co-owner.
    /// - `caretaker`: capability-only stake, usually without voting power.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OwnershipRole {
        Primary,
        Owner,
        Caretaker,
    }

    impl OwnershipRole {
        /// Returns the canonical role string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Primary => "primary",
                Self::Owner => "owner",
                Self::Caretaker => "caretaker",
            }
        }
    }

    /// Request body for adding/updating a co-owner.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OwnershipUpsert {
        pub username: String,
        pub share_bps: i64,
        pub voting_power: i64,
        pub role: OwnershipRole,
        #[serde(default)]
        pub blackout_manager: bool,
        #[serde(default)]
        pub expense_approver: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OwnershipView {
        pub id: Uuid,
        pub username: String,
        pub share_bps: i64,
        pub voting_power: i64,
        pub role: OwnershipRole,
        pub blackout_manager: bool,
        pub expense_approver: bool,
    }
}

pub mod availability {
    use super::*;

    /// Query string for the availability calendar: `?from=...&to=...`,
    /// both ISO `YYYY-MM-DD`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AvailabilityQuery {
        pub from: String,
        pub to: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AvailabilityDayView {
        pub day: String,
        pub available: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AvailabilityResponse {
        pub days: Vec<AvailabilityDayView>,
        pub bookings: Vec<super::booking::BookingView>,
        pub blackouts: Vec<super::blackout::BlackoutView>,
    }
}

pub mod booking {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingNew {
        pub start_date: String,
        pub end_date: String,
        pub guest_name: Option<String>,
        pub guest_email: Option<String>,
        pub guest_phone: Option<String>,
        pub request_notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingView {
        pub id: Uuid,
        pub property_id: Uuid,
        pub start_date: String,
        pub end_date: String,
        pub status: String,
        pub total_cents: i64,
        pub decision_summary: Option<String>,
        pub request_notes: Option<String>,
        pub guest_name: Option<String>,
        pub created_by: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingsResponse {
        pub bookings: Vec<BookingView>,
    }

    /// Request body for casting (or replacing) a vote.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct VoteNew {
        pub ownership_id: Uuid,
        pub choice: VoteChoice,
        pub rationale: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VoteView {
        pub ownership_id: Uuid,
        pub choice: VoteChoice,
        pub rationale: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingDetailResponse {
        pub booking: BookingView,
        pub votes: Vec<VoteView>,
        pub tally: TallyView,
    }
}

pub mod blackout {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BlackoutNew {
        pub start_date: String,
        pub end_date: String,
        pub reason: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BlackoutView {
        pub id: Uuid,
        pub start_date: String,
        pub end_date: String,
        pub reason: Option<String>,
        pub created_by: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BlackoutsResponse {
        pub blackouts: Vec<BlackoutView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount_cents: i64,
        pub vendor_name: String,
        pub incurred_on: String,
        pub category: Option<String>,
        pub receipt_url: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub property_id: Uuid,
        pub amount_cents: i64,
        pub status: String,
        pub vendor_name: String,
        pub category: Option<String>,
        pub receipt_url: Option<String>,
        pub decision_summary: Option<String>,
        pub incurred_on: String,
        pub created_by: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AllocationView {
        pub ownership_id: Uuid,
        pub amount_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDetailResponse {
        pub expense: ExpenseView,
        pub approvals: Vec<super::booking::VoteView>,
        pub allocations: Vec<AllocationView>,
        pub tally: TallyView,
    }
}
