pub use blackouts::Blackout;
pub use booking_votes::BookingVote;
pub use bookings::{Booking, BookingDetail, BookingStatus, GuestInfo};
pub use commands::{
    CastBookingVoteCmd, CastExpenseApprovalCmd, CreateBlackoutCmd, CreateBookingCmd,
    CreateExpenseCmd, NewPropertyCmd, UpsertOwnershipCmd,
};
pub use dates::{DayRange, parse_day};
pub use error::EngineError;
pub use expense_allocations::ExpenseAllocation;
pub use expense_approvals::ExpenseApproval;
pub use expenses::{Expense, ExpenseDetail, ExpenseStatus};
pub use ops::{AvailabilityDay, AvailabilityReport, Engine, EngineBuilder};
pub use ownerships::{Ownership, OwnershipRole};
pub use properties::{ApprovalPolicy, Property, PropertyDetail};
pub use tally::{Decision, VoteChoice, VoteTally, tally_votes};

mod blackouts;
mod booking_votes;
mod bookings;
mod commands;
pub mod dates;
mod error;
mod expense_allocations;
mod expense_approvals;
mod expenses;
pub mod money;
mod ops;
mod ownerships;
mod properties;
mod users;

pub mod tally;

pub type ResultEngine<T> = Result<T, EngineError>;
