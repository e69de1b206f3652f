use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, ownerships, properties, users};

use super::Engine;

impl Engine {
    async fn find_property_by_id(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
    ) -> ResultEngine<Option<properties::Model>> {
        properties::Entity::find_by_id(property_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Looks up the caller's ownership row on a property.
    pub(super) async fn membership(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Option<ownerships::Model>> {
        ownerships::Entity::find()
            .filter(ownerships::Column::PropertyId.eq(property_id.to_string()))
            .filter(ownerships::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Requires the caller to hold an ownership on the property.
    ///
    /// Non-members get the same `NotFound` as a missing property, so this
    /// never leaks whether a property id exists.
    pub(super) async fn require_member(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(properties::Model, ownerships::Model)> {
        let property = self
            .find_property_by_id(db, property_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("property".to_string()))?;
        let membership = self
            .membership(db, property_id, user_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("property".to_string()))?;
        Ok((property, membership))
    }

    /// Requires the caller's ownership to be the primary one.
    pub(super) async fn require_primary(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(properties::Model, ownerships::Model)> {
        let (property, membership) = self.require_member(db, property_id, user_id).await?;
        let role = crate::OwnershipRole::try_from(membership.role.as_str())?;
        if !role.can_manage() {
            return Err(EngineError::Forbidden(
                "only the primary owner can do this".to_string(),
            ));
        }
        Ok((property, membership))
    }

    /// Resolves an ownership id and checks it belongs to the property.
    pub(super) async fn require_ownership_in_property(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        ownership_id: Uuid,
    ) -> ResultEngine<ownerships::Model> {
        ownerships::Entity::find_by_id(ownership_id.to_string())
            .filter(ownerships::Column::PropertyId.eq(property_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("ownership".to_string()))
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::NotFound("user".to_string()));
        }
        Ok(())
    }

    /// All ownerships of a property in creation order.
    ///
    /// The order matters: allocation rounding drift always lands on the last
    /// row of this listing.
    pub(super) async fn property_ownerships(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
    ) -> ResultEngine<Vec<ownerships::Model>> {
        ownerships::Entity::find()
            .filter(ownerships::Column::PropertyId.eq(property_id.to_string()))
            .order_by_asc(ownerships::Column::CreatedAt)
            .order_by_asc(ownerships::Column::Id)
            .all(db)
            .await
            .map_err(Into::into)
    }
}
