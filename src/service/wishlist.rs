use super::Marketplace;
use crate::context::Actor;
use crate::error::{EngineError, Result, abort};
use crate::model::Role;
use crate::types::ServiceId;
use crate::view::ServiceView;
use tracing::info;

impl Marketplace {
    /// Add a bookable service to the caller's wishlist. Adding it twice is a
    /// no-op.
    pub fn add_to_wishlist(&self, actor: &Actor, service_id: &ServiceId) -> Result<()> {
        actor.require(Role::User)?;

        self.store.transaction(|tx| {
            let user = tx.user(&actor.id)?;
            let service = tx.service(service_id)?;
            if !service.is_bookable() {
                return abort(EngineError::Conflict(format!(
                    "service {} cannot be wishlisted as it is not approved and available",
                    service.id
                )));
            }
            tx.add_wishlist(&user.id, &service.id)
        })?;

        info!(user = %actor.id, service = %service_id, "service wishlisted");
        Ok(())
    }

    /// Remove a service from the caller's wishlist, whether or not it is there
    pub fn remove_from_wishlist(&self, actor: &Actor, service_id: &ServiceId) -> Result<()> {
        self.store
            .transaction(|tx| tx.remove_wishlist(&actor.id, service_id))?;
        info!(user = %actor.id, service = %service_id, "service removed from wishlist");
        Ok(())
    }

    pub fn wishlist(&self, actor: &Actor) -> Result<Vec<ServiceView>> {
        self.store
            .wishlist(&actor.id)?
            .iter()
            .map(|id| self.load_service(id).map(|s| ServiceView::from(&s)))
            .collect()
    }
}
