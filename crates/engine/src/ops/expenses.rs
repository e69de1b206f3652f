//! Expense lifecycle: creation with proportional allocation, capability
//! gated approval voting, reimbursement.
//!
//! Allocations are written once, atomically with the expense, and never
//! touched again; only the status column moves afterwards.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    CastExpenseApprovalCmd, CreateExpenseCmd, EngineError, Expense, ExpenseAllocation,
    ExpenseApproval, ExpenseDetail, ExpenseStatus, ResultEngine, VoteTally, expense_allocations,
    expense_approvals, expenses, money::split_amount, parse_day, tally_votes,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    async fn find_expense(
        &self,
        db: &DatabaseTransaction,
        expense_id: Uuid,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(expense_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("expense".to_string()))
    }

    async fn expense_approvals(
        &self,
        db: &DatabaseTransaction,
        expense_id: Uuid,
    ) -> ResultEngine<Vec<ExpenseApproval>> {
        let models = expense_approvals::Entity::find()
            .filter(expense_approvals::Column::ExpenseId.eq(expense_id.to_string()))
            .order_by_asc(expense_approvals::Column::VotedAt)
            .all(db)
            .await?;

        let mut approvals = Vec::with_capacity(models.len());
        for model in models {
            approvals.push(ExpenseApproval::try_from(model)?);
        }
        Ok(approvals)
    }

    async fn expense_allocations(
        &self,
        db: &DatabaseTransaction,
        expense_id: Uuid,
    ) -> ResultEngine<Vec<ExpenseAllocation>> {
        let models = expense_allocations::Entity::find()
            .filter(expense_allocations::Column::ExpenseId.eq(expense_id.to_string()))
            .all(db)
            .await?;

        let mut allocations = Vec::with_capacity(models.len());
        for model in models {
            allocations.push(ExpenseAllocation::try_from(model)?);
        }
        Ok(allocations)
    }

    async fn expense_tally(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        approvals: &[ExpenseApproval],
    ) -> ResultEngine<VoteTally> {
        let ownerships = self.property_ownerships(db, property_id).await?;
        let total_power: i64 = ownerships.iter().map(|o| o.voting_power).sum();
        let power_by_id: HashMap<String, i64> = ownerships
            .into_iter()
            .map(|o| (o.id, o.voting_power))
            .collect();

        let weighted = approvals.iter().map(|approval| {
            let power = power_by_id
                .get(&approval.ownership_id.to_string())
                .copied()
                .unwrap_or(0);
            (power, approval.choice)
        });
        Ok(tally_votes(weighted, total_power))
    }

    async fn expense_detail_in(
        &self,
        db: &DatabaseTransaction,
        model: expenses::Model,
    ) -> ResultEngine<ExpenseDetail> {
        let expense = Expense::try_from(model)?;
        let approvals = self.expense_approvals(db, expense.id).await?;
        let allocations = self.expense_allocations(db, expense.id).await?;
        let tally = self
            .expense_tally(db, expense.property_id, &approvals)
            .await?;
        Ok(ExpenseDetail {
            expense,
            approvals,
            allocations,
            tally,
        })
    }

    /// Records a shared expense in `pending` state with its allocations.
    ///
    /// The split across ownerships (by `share_bps`, remainder to the last
    /// row in creation order) is computed here, stored with the expense in
    /// the same transaction, and never recomputed.
    pub async fn create_expense(&self, cmd: CreateExpenseCmd) -> ResultEngine<ExpenseDetail> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, cmd.property_id, &cmd.user_id)
                .await?;

            let vendor_name = normalize_required_name(&cmd.vendor_name, "vendor")?;
            let incurred_on = parse_day(&cmd.incurred_on)?;
            let expense = Expense::new(
                cmd.property_id,
                cmd.amount_cents,
                vendor_name,
                normalize_optional_text(cmd.category.as_deref()),
                normalize_optional_text(cmd.receipt_url.as_deref()),
                normalize_optional_text(cmd.notes.as_deref()),
                incurred_on,
                cmd.user_id.clone(),
                Utc::now(),
            )?;

            let ownerships = self.property_ownerships(&db_tx, cmd.property_id).await?;
            let shares: Vec<i64> = ownerships.iter().map(|o| o.share_bps).collect();
            let portions = split_amount(expense.amount_cents, &shares)?;

            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;

            let mut allocations = Vec::with_capacity(ownerships.len());
            for (ownership, amount_cents) in ownerships.iter().zip(portions) {
                let allocation = ExpenseAllocation {
                    expense_id: expense.id,
                    ownership_id: Uuid::parse_str(&ownership.id)
                        .map_err(|_| EngineError::NotFound("ownership".to_string()))?,
                    amount_cents,
                };
                expense_allocations::ActiveModel::from(&allocation)
                    .insert(&db_tx)
                    .await?;
                allocations.push(allocation);
            }

            let tally = self.expense_tally(&db_tx, cmd.property_id, &[]).await?;
            Ok(ExpenseDetail {
                expense,
                approvals: Vec::new(),
                allocations,
                tally,
            })
        })
    }

    /// Casts (or replaces) an approval vote on a pending expense.
    ///
    /// Same flow as booking votes, with one extra gate: the voting
    /// ownership must carry the `expense_approver` capability, voting power
    /// alone is not enough.
    pub async fn cast_expense_approval(
        &self,
        cmd: CastExpenseApprovalCmd,
    ) -> ResultEngine<ExpenseDetail> {
        with_tx!(self, |db_tx| {
            let expense_model = self.find_expense(&db_tx, cmd.expense_id).await?;
            let property_id = Uuid::parse_str(&expense_model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?;
            self.require_member(&db_tx, property_id, &cmd.user_id).await?;

            let ownership = self
                .require_ownership_in_property(&db_tx, property_id, cmd.ownership_id)
                .await?;
            if ownership.user_id != cmd.user_id {
                return Err(EngineError::Forbidden(
                    "approvals must be cast through your own ownership".to_string(),
                ));
            }
            if !ownership.expense_approver {
                return Err(EngineError::Forbidden(
                    "ownership is not an expense approver".to_string(),
                ));
            }

            let status = ExpenseStatus::try_from(expense_model.status.as_str())?;
            if status != ExpenseStatus::Pending {
                return Err(EngineError::Conflict(
                    "expense is no longer open for voting".to_string(),
                ));
            }

            let approval = ExpenseApproval {
                expense_id: cmd.expense_id,
                ownership_id: cmd.ownership_id,
                choice: cmd.choice,
                rationale: normalize_optional_text(cmd.rationale.as_deref()),
                voted_at: Utc::now(),
            };
            let active = expense_approvals::ActiveModel::from(&approval);

            match expense_approvals::Entity::find_by_id((
                cmd.expense_id.to_string(),
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

            let approvals = self.expense_approvals(&db_tx, cmd.expense_id).await?;
            let tally = self.expense_tally(&db_tx, property_id, &approvals).await?;

            let mut expense = Expense::try_from(expense_model)?;
            if let Some(summary) = tally.decision_summary() {
                let new_status = match tally.decision() {
                    Some(crate::Decision::Approved) => ExpenseStatus::Approved,
                    _ => ExpenseStatus::Rejected,
                };
                let update = expenses::ActiveModel {
                    id: ActiveValue::Set(cmd.expense_id.to_string()),
                    status: ActiveValue::Set(new_status.as_str().to_string()),
                    decision_summary: ActiveValue::Set(Some(summary.clone())),
                    ..Default::default()
                };
                update.update(&db_tx).await?;

                expense.status = new_status;
                expense.decision_summary = Some(summary);
            }

            let allocations = self.expense_allocations(&db_tx, cmd.expense_id).await?;
            Ok(ExpenseDetail {
                expense,
                approvals,
                allocations,
                tally,
            })
        })
    }

    /// Marks an approved expense as reimbursed (primary-only).
    ///
    /// This is an administrative transition outside the voting engine; the
    /// tally never produces it.
    pub async fn mark_expense_reimbursed(
        &self,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let expense_model = self.find_expense(&db_tx, expense_id).await?;
            let property_id = Uuid::parse_str(&expense_model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?;
            self.require_primary(&db_tx, property_id, user_id).await?;

            let status = ExpenseStatus::try_from(expense_model.status.as_str())?;
            if status != ExpenseStatus::Approved {
                return Err(EngineError::Conflict(format!(
                    "cannot reimburse a {} expense",
                    status.as_str()
                )));
            }

            let update = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.to_string()),
                status: ActiveValue::Set(ExpenseStatus::Reimbursed.as_str().to_string()),
                ..Default::default()
            };
            update.update(&db_tx).await?;

            let mut expense = Expense::try_from(expense_model)?;
            expense.status = ExpenseStatus::Reimbursed;
            Ok(expense)
        })
    }

    /// Returns an expense with approvals, allocations and current tally.
    pub async fn expense_detail(
        &self,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<ExpenseDetail> {
        with_tx!(self, |db_tx| {
            let expense_model = self.find_expense(&db_tx, expense_id).await?;
            let property_id = Uuid::parse_str(&expense_model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?;
            self.require_member(&db_tx, property_id, user_id).await?;
            self.expense_detail_in(&db_tx, expense_model).await
        })
    }

    /// Lists a property's expenses, newest first (member-only).
    pub async fn list_expenses(
        &self,
        property_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, property_id, user_id).await?;

            let models = expenses::Entity::find()
                .filter(expenses::Column::PropertyId.eq(property_id.to_string()))
                .order_by_desc(expenses::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Expense::try_from(model)?);
            }
            Ok(out)
        })
    }
}
