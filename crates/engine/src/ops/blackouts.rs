//! Blackout windows: create, list, delete.
//!
//! Gated on the `blackout_manager` capability rather than a role, so a
//! caretaker ownership can hold it without any voting power.

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Blackout, CreateBlackoutCmd, DayRange, EngineError, ResultEngine, blackouts,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Declares a blackout window on a property.
    ///
    /// Existing bookings are left untouched; the window only gates bookings
    /// created while it exists.
    pub async fn create_blackout(&self, cmd: CreateBlackoutCmd) -> ResultEngine<Blackout> {
        with_tx!(self, |db_tx| {
            let (_, membership) = self
                .require_member(&db_tx, cmd.property_id, &cmd.user_id)
                .await?;
            if !membership.blackout_manager {
                return Err(EngineError::Forbidden(
                    "ownership is not a blackout manager".to_string(),
                ));
            }

            let window = DayRange::parse(&cmd.start_date, &cmd.end_date)?;
            let blackout = Blackout::new(
                cmd.property_id,
                window,
                normalize_optional_text(cmd.reason.as_deref()),
                cmd.user_id,
            );
            blackouts::ActiveModel::from(&blackout).insert(&db_tx).await?;
            Ok(blackout)
        })
    }

    /// Deletes a blackout window (blackout managers only).
    pub async fn delete_blackout(&self, blackout_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = blackouts::Entity::find_by_id(blackout_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("blackout".to_string()))?;
            let property_id = Uuid::parse_str(&model.property_id)
                .map_err(|_| EngineError::NotFound("property".to_string()))?;

            let (_, membership) = self.require_member(&db_tx, property_id, user_id).await?;
            if !membership.blackout_manager {
                return Err(EngineError::Forbidden(
                    "ownership is not a blackout manager".to_string(),
                ));
            }

            blackouts::Entity::delete_by_id(blackout_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Lists a property's blackout windows (member-only).
    pub async fn list_blackouts(
        &self,
        property_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<Blackout>> {
        with_tx!(self, |db_tx| {
            self.require_member(&db_tx, property_id, user_id).await?;

            let models = blackouts::Entity::find()
                .filter(blackouts::Column::PropertyId.eq(property_id.to_string()))
                .order_by_asc(blackouts::Column::StartDate)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Blackout::try_from(model)?);
            }
            Ok(out)
        })
    }
}
