//! Property provisioning and ownership roster management.

use chrono::Utc;
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewPropertyCmd, Ownership, OwnershipRole, Property, PropertyDetail,
    ResultEngine, UpsertOwnershipCmd, booking_votes, expense_allocations, expense_approvals,
    money::BPS_SCALE, ownerships, properties,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Creates a property plus the primary ownership for its creator.
    ///
    /// The creator starts with the whole share (10000 bps), voting power 1
    /// and both capability flags; co-owners are added afterwards via
    /// [`upsert_ownership`](Engine::upsert_ownership).
    pub async fn new_property(&self, cmd: NewPropertyCmd) -> ResultEngine<Property> {
        with_tx!(self, |db_tx| {
            let name = normalize_required_name(&cmd.name, "property")?;
            self.require_user_exists(&db_tx, &cmd.user_id).await?;

            let property = Property::new(
                name,
                cmd.nightly_rate_cents,
                cmd.cleaning_fee_cents,
                cmd.min_nights,
                cmd.user_id.clone(),
            )?;
            properties::ActiveModel::from(&property).insert(&db_tx).await?;

            let primary = Ownership::new(
                property.id,
                cmd.user_id,
                BPS_SCALE,
                1,
                OwnershipRole::Primary,
                true,
                true,
                Utc::now(),
            )?;
            ownerships::ActiveModel::from(&primary).insert(&db_tx).await?;

            Ok(property)
        })
    }

    /// Adds or updates a co-owner row (primary-only).
    ///
    /// Upserts on (property, user): share, power, role and capability flags
    /// of an existing row are replaced, its id and creation order are kept.
    pub async fn upsert_ownership(&self, cmd: UpsertOwnershipCmd) -> ResultEngine<Ownership> {
        with_tx!(self, |db_tx| {
            self.require_primary(&db_tx, cmd.property_id, &cmd.user_id)
                .await?;
            self.require_user_exists(&db_tx, &cmd.member_user_id).await?;

            match self
                .membership(&db_tx, cmd.property_id, &cmd.member_user_id)
                .await?
            {
                Some(existing) => {
                    let updated = Ownership {
                        share_bps: cmd.share_bps,
                        voting_power: cmd.voting_power,
                        role: cmd.role,
                        blackout_manager: cmd.blackout_manager,
                        expense_approver: cmd.expense_approver,
                        ..Ownership::try_from(existing)?
                    };
                    if !(0..=BPS_SCALE).contains(&updated.share_bps) {
                        return Err(EngineError::Validation(format!(
                            "share_bps must be within 0..={BPS_SCALE}"
                        )));
                    }
                    if updated.voting_power < 0 {
                        return Err(EngineError::Validation(
                            "voting_power must be >= 0".to_string(),
                        ));
                    }
                    ownerships::ActiveModel::from(&updated).update(&db_tx).await?;
                    Ok(updated)
                }
                None => {
                    let ownership = Ownership::new(
                        cmd.property_id,
                        cmd.member_user_id,
                        cmd.share_bps,
                        cmd.voting_power,
                        cmd.role,
                        cmd.blackout_manager,
                        cmd.expense_approver,
                        Utc::now(),
                    )?;
                    ownerships::ActiveModel::from(&ownership).insert(&db_tx).await?;
                    Ok(ownership)
                }
            }
        })
    }

    /// Removes an ownership row (primary-only).
    ///
    /// Refused when the ownership has cast votes or holds allocations:
    /// decided tallies and expense splits must keep their audit trail.
    pub async fn remove_ownership(
        &self,
        property_id: Uuid,
        ownership_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_primary(&db_tx, property_id, user_id).await?;
            let ownership = self
                .require_ownership_in_property(&db_tx, property_id, ownership_id)
                .await?;

            let role = OwnershipRole::try_from(ownership.role.as_str())?;
            if role.can_manage() {
                return Err(EngineError::Validation(
                    "cannot remove the primary ownership".to_string(),
                ));
            }

            let has_votes = booking_votes::Entity::find()
                .filter(booking_votes::Column::OwnershipId.eq(ownership_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            let has_approvals = expense_approvals::Entity::find()
                .filter(expense_approvals::Column::OwnershipId.eq(ownership_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            let has_allocations = expense_allocations::Entity::find()
                .filter(expense_allocations::Column::OwnershipId.eq(ownership_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if has_votes || has_approvals || has_allocations {
                return Err(EngineError::Conflict(
                    "ownership has voting or allocation history".to_string(),
                ));
            }

            ownerships::Entity::delete_by_id(ownership_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Lists the properties the user holds an ownership on.
    pub async fn list_properties(&self, user_id: &str) -> ResultEngine<Vec<Property>> {
        with_tx!(self, |db_tx| {
            let memberships = ownerships::Entity::find()
                .filter(ownerships::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?;
            let property_ids: Vec<String> =
                memberships.into_iter().map(|m| m.property_id).collect();

            let models = properties::Entity::find()
                .filter(properties::Column::Id.is_in(property_ids))
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Property::try_from(model)?);
            }
            Ok(out)
        })
    }

    /// Returns a property with its ownership roster (member-only).
    pub async fn property_detail(
        &self,
        property_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<PropertyDetail> {
        with_tx!(self, |db_tx| {
            let (property_model, _) = self.require_member(&db_tx, property_id, user_id).await?;
            let property = Property::try_from(property_model)?;

            let ownership_models = self.property_ownerships(&db_tx, property_id).await?;
            let mut roster = Vec::with_capacity(ownership_models.len());
            for model in ownership_models {
                roster.push(Ownership::try_from(model)?);
            }
            let total_voting_power = roster.iter().map(|o| o.voting_power).sum();

            Ok(PropertyDetail {
                property,
                ownerships: roster,
                total_voting_power,
            })
        })
    }
}
