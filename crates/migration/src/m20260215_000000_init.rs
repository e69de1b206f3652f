//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Baita:
//!
//! - `users`: authentication
//! - `properties`: shared assets with pricing and approval policy
//! - `ownerships`: per-user stakes (share, voting power, capabilities)
//! - `bookings`: stay requests decided by weighted votes
//! - `booking_votes`: one vote per (booking, ownership)
//! - `blackouts`: owner-declared unavailable windows
//! - `expenses`: shared costs decided by weighted votes
//! - `expense_approvals`: one vote per (expense, ownership)
//! - `expense_allocations`: immutable proportional splits

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Properties {
    Table,
    Id,
    Name,
    NightlyRateCents,
    CleaningFeeCents,
    MinNights,
    ApprovalPolicy,
    CreatedBy,
}

#[derive(Iden)]
enum Ownerships {
    Table,
    Id,
    PropertyId,
    UserId,
    ShareBps,
    VotingPower,
    Role,
    BlackoutManager,
    ExpenseApprover,
    CreatedAt,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    PropertyId,
    StartDate,
    EndDate,
    Status,
    TotalCents,
    DecisionSummary,
    RequestNotes,
    GuestName,
    GuestEmail,
    GuestPhone,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum BookingVotes {
    Table,
    BookingId,
    OwnershipId,
    Choice,
    Rationale,
    VotedAt,
}

#[derive(Iden)]
enum Blackouts {
    Table,
    Id,
    PropertyId,
    StartDate,
    EndDate,
    Reason,
    CreatedBy,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    PropertyId,
    AmountCents,
    Status,
    VendorName,
    Category,
    ReceiptUrl,
    Notes,
    DecisionSummary,
    IncurredOn,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum ExpenseApprovals {
    Table,
    ExpenseId,
    OwnershipId,
    Choice,
    Rationale,
    VotedAt,
}

#[derive(Iden)]
enum ExpenseAllocations {
    Table,
    ExpenseId,
    OwnershipId,
    AmountCents,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Properties
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Properties::Name).string().not_null())
                    .col(
                        ColumnDef::new(Properties::NightlyRateCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Properties::CleaningFeeCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Properties::MinNights)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Properties::ApprovalPolicy)
                            .string()
                            .not_null()
                            .default("majority"),
                    )
                    .col(ColumnDef::new(Properties::CreatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-properties-created_by")
                            .from(Properties::Table, Properties::CreatedBy)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Ownerships
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Ownerships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ownerships::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ownerships::PropertyId).string().not_null())
                    .col(ColumnDef::new(Ownerships::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Ownerships::ShareBps)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ownerships::VotingPower)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Ownerships::Role).string().not_null())
                    .col(
                        ColumnDef::new(Ownerships::BlackoutManager)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ownerships::ExpenseApprover)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ownerships::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ownerships-property_id")
                            .from(Ownerships::Table, Ownerships::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ownerships-user_id")
                            .from(Ownerships::Table, Ownerships::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ownerships-property_id-user_id-unique")
                    .table(Ownerships::Table)
                    .col(Ownerships::PropertyId)
                    .col(Ownerships::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Bookings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::PropertyId).string().not_null())
                    .col(ColumnDef::new(Bookings::StartDate).date().not_null())
                    .col(ColumnDef::new(Bookings::EndDate).date().not_null())
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::TotalCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::DecisionSummary).string())
                    .col(ColumnDef::new(Bookings::RequestNotes).string())
                    .col(ColumnDef::new(Bookings::GuestName).string())
                    .col(ColumnDef::new(Bookings::GuestEmail).string())
                    .col(ColumnDef::new(Bookings::GuestPhone).string())
                    .col(ColumnDef::new(Bookings::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Bookings::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-property_id")
                            .from(Bookings::Table, Bookings::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-property_id-start_date")
                    .table(Bookings::Table)
                    .col(Bookings::PropertyId)
                    .col(Bookings::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-status")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Booking votes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BookingVotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BookingVotes::BookingId).string().not_null())
                    .col(
                        ColumnDef::new(BookingVotes::OwnershipId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookingVotes::Choice).string().not_null())
                    .col(ColumnDef::new(BookingVotes::Rationale).string())
                    .col(
                        ColumnDef::new(BookingVotes::VotedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(BookingVotes::BookingId)
                            .col(BookingVotes::OwnershipId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-booking_votes-booking_id")
                            .from(BookingVotes::Table, BookingVotes::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-booking_votes-ownership_id")
                            .from(BookingVotes::Table, BookingVotes::OwnershipId)
                            .to(Ownerships::Table, Ownerships::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-booking_votes-ownership_id")
                    .table(BookingVotes::Table)
                    .col(BookingVotes::OwnershipId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Blackouts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Blackouts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blackouts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Blackouts::PropertyId).string().not_null())
                    .col(ColumnDef::new(Blackouts::StartDate).date().not_null())
                    .col(ColumnDef::new(Blackouts::EndDate).date().not_null())
                    .col(ColumnDef::new(Blackouts::Reason).string())
                    .col(ColumnDef::new(Blackouts::CreatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-blackouts-property_id")
                            .from(Blackouts::Table, Blackouts::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-blackouts-property_id-start_date")
                    .table(Blackouts::Table)
                    .col(Blackouts::PropertyId)
                    .col(Blackouts::StartDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::PropertyId).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Status).string().not_null())
                    .col(ColumnDef::new(Expenses::VendorName).string().not_null())
                    .col(ColumnDef::new(Expenses::Category).string())
                    .col(ColumnDef::new(Expenses::ReceiptUrl).string())
                    .col(ColumnDef::new(Expenses::Notes).string())
                    .col(ColumnDef::new(Expenses::DecisionSummary).string())
                    .col(ColumnDef::new(Expenses::IncurredOn).date().not_null())
                    .col(ColumnDef::new(Expenses::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-property_id")
                            .from(Expenses::Table, Expenses::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-property_id-created_at")
                    .table(Expenses::Table)
                    .col(Expenses::PropertyId)
                    .col(Expenses::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Expense approvals
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExpenseApprovals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseApprovals::ExpenseId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseApprovals::OwnershipId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenseApprovals::Choice).string().not_null())
                    .col(ColumnDef::new(ExpenseApprovals::Rationale).string())
                    .col(
                        ColumnDef::new(ExpenseApprovals::VotedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ExpenseApprovals::ExpenseId)
                            .col(ExpenseApprovals::OwnershipId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_approvals-expense_id")
                            .from(ExpenseApprovals::Table, ExpenseApprovals::ExpenseId)
                            .to(Expenses::Table, Expenses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_approvals-ownership_id")
                            .from(ExpenseApprovals::Table, ExpenseApprovals::OwnershipId)
                            .to(Ownerships::Table, Ownerships::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expense_approvals-ownership_id")
                    .table(ExpenseApprovals::Table)
                    .col(ExpenseApprovals::OwnershipId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Expense allocations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExpenseAllocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseAllocations::ExpenseId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseAllocations::OwnershipId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseAllocations::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ExpenseAllocations::ExpenseId)
                            .col(ExpenseAllocations::OwnershipId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_allocations-expense_id")
                            .from(ExpenseAllocations::Table, ExpenseAllocations::ExpenseId)
                            .to(Expenses::Table, Expenses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_allocations-ownership_id")
                            .from(ExpenseAllocations::Table, ExpenseAllocations::OwnershipId)
                            .to(Ownerships::Table, Ownerships::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expense_allocations-ownership_id")
                    .table(ExpenseAllocations::Table)
                    .col(ExpenseAllocations::OwnershipId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(ExpenseAllocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseApprovals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blackouts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BookingVotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ownerships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
