//! Membership plans and customer subscriptions
use super::Marketplace;
use crate::context::Actor;
use crate::error::{EngineError, Result, abort};
use crate::model::{Membership, MembershipStatus, Role};
use crate::types::{MembershipId, Money, Percentage, UserId};
use crate::view::{MembershipView, UserView};
use tracing::info;

#[derive(Debug, Clone)]
pub struct NewMembership {
    pub name: String,
    pub description: String,
    pub price_per_month: Money,
    pub discount_percentage: Percentage,
}

impl Marketplace {
    /// Admin publishes a new plan. Plan names are unique.
    pub fn create_membership(
        &self,
        actor: &Actor,
        plan: NewMembership,
    ) -> Result<MembershipView> {
        actor.require(Role::Admin)?;
        if plan.price_per_month.is_negative() {
            return Err(EngineError::InvalidArgument(format!(
                "monthly price {} is negative",
                plan.price_per_month
            )));
        }

        let membership = Membership {
            id: MembershipId::generate()?,
            name: plan.name,
            description: plan.description,
            price_per_month: plan.price_per_month,
            discount_percentage: plan.discount_percentage,
        };

        self.store.transaction(|tx| {
            if !tx.claim_membership_name(&membership.name, &membership.id)? {
                return abort(EngineError::Conflict(format!(
                    "membership name {} already exists",
                    membership.name
                )));
            }
            tx.save_membership(&membership)
        })?;

        info!(membership = %membership.id, name = %membership.name, "membership plan created");
        Ok(MembershipView::from(&membership))
    }

    pub fn memberships(&self) -> Result<Vec<MembershipView>> {
        Ok(self
            .store
            .memberships()?
            .iter()
            .map(MembershipView::from)
            .collect())
    }

    /// Subscribe the caller to `membership_id`. A user holds at most one
    /// active membership at a time.
    pub fn subscribe(&self, actor: &Actor, membership_id: &MembershipId) -> Result<UserView> {
        let (user, membership) = self.store.transaction(|tx| {
            let mut user = tx.user(&actor.id)?;
            let membership = tx.membership(membership_id)?;

            if let (Some(current), MembershipStatus::Active) = (&user.membership, user.membership_status) {
                let name = tx
                    .find_membership(current)?
                    .map(|m| m.name)
                    .unwrap_or_else(|| current.to_string());
                return abort(EngineError::Conflict(format!(
                    "{} is already subscribed to a membership ({name})",
                    user.id
                )));
            }

            user.membership = Some(membership.id.clone());
            user.membership_status = MembershipStatus::Active;
            tx.save_user(&user)?;
            Ok((user, membership))
        })?;

        info!(user = %user.id, membership = %membership.id, "membership subscribed");
        Ok(UserView::new(&user, Some(&membership)))
    }

    /// Drop the caller's membership, whatever its status
    pub fn cancel_membership(&self, actor: &Actor) -> Result<UserView> {
        let user = self.store.transaction(|tx| {
            let mut user = tx.user(&actor.id)?;
            if user.membership.is_none() {
                return abort(EngineError::Conflict(format!(
                    "{} has no membership to cancel",
                    user.id
                )));
            }
            user.membership = None;
            user.membership_status = MembershipStatus::Inactive;
            tx.save_user(&user)?;
            Ok(user)
        })?;

        info!(user = %user.id, "membership cancelled");
        Ok(UserView::new(&user, None))
    }

    /// Admin lists users by membership status
    pub fn users_by_membership_status(
        &self,
        actor: &Actor,
        status: MembershipStatus,
    ) -> Result<Vec<UserView>> {
        actor.require(Role::Admin)?;
        self.store
            .users_where(|u| u.membership_status == status)?
            .iter()
            .map(|u| self.user_view(u))
            .collect()
    }

    /// Admin lists users holding `membership_id`
    pub fn users_by_membership(
        &self,
        actor: &Actor,
        membership_id: &MembershipId,
    ) -> Result<Vec<UserView>> {
        actor.require(Role::Admin)?;
        self.store
            .users_where(|u| u.membership.as_ref() == Some(membership_id))?
            .iter()
            .map(|u| self.user_view(u))
            .collect()
    }

    pub fn user(&self, id: &UserId) -> Result<UserView> {
        let user = self.load_user(id)?;
        self.user_view(&user)
    }
}
