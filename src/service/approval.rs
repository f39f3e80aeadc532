//! Admin admission of spas and services
use super::Marketplace;
use crate::context::Actor;
use crate::error::{EngineError, Result, abort};
use crate::model::{ApprovalStatus, Role};
use crate::types::{ServiceId, SpaId};
use crate::view::{ServiceView, SpaView};
use tracing::info;

impl Marketplace {
    /// Set a spa's approval status.
    ///
    /// Rejecting a spa also rejects every one of its services that is still
    /// pending, in the same transaction. Services already decided keep their
    /// status, and approving a spa leaves its services untouched.
    pub fn approve_spa(
        &self,
        actor: &Actor,
        spa_id: &SpaId,
        status: ApprovalStatus,
    ) -> Result<SpaView> {
        actor.require(Role::Admin)?;

        let (spa, cascaded) = self.store.transaction(|tx| {
            let mut spa = tx.spa(spa_id)?;
            spa.approval_status = status;

            let mut cascaded = Vec::new();
            if status == ApprovalStatus::Rejected {
                for id in tx.service_ids_of(spa_id)? {
                    let mut service = tx.service(&id)?;
                    if service.approval_status == ApprovalStatus::Pending {
                        service.approval_status = ApprovalStatus::Rejected;
                        tx.save_service(&service)?;
                        cascaded.push(id);
                    }
                }
            }

            tx.save_spa(&spa)?;
            Ok((spa, cascaded))
        })?;

        info!(
            spa = %spa.id,
            status = ?status,
            cascaded_services = cascaded.len(),
            "spa approval updated"
        );
        Ok(SpaView::from(&spa))
    }

    /// Set a service's approval status. A service can only be approved once
    /// its spa is approved.
    pub fn approve_service(
        &self,
        actor: &Actor,
        service_id: &ServiceId,
        status: ApprovalStatus,
    ) -> Result<ServiceView> {
        actor.require(Role::Admin)?;

        let service = self.store.transaction(|tx| {
            let mut service = tx.service(service_id)?;

            if status == ApprovalStatus::Approved {
                let spa = tx.spa(&service.spa)?;
                if !spa.is_approved() {
                    return abort(EngineError::Conflict(format!(
                        "cannot approve service {}: parent spa {} is {:?} and must be approved first",
                        service.id, spa.id, spa.approval_status
                    )));
                }
            }

            service.approval_status = status;
            tx.save_service(&service)?;
            Ok(service)
        })?;

        info!(service = %service.id, status = ?status, "service approval updated");
        Ok(ServiceView::from(&service))
    }

    /// All spas, or only those in `status`
    pub fn spas_for_admin(
        &self,
        actor: &Actor,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<SpaView>> {
        actor.require(Role::Admin)?;
        let spas = self
            .store
            .spas_where(|spa| status.is_none_or(|s| spa.approval_status == s))?;
        Ok(spas.iter().map(SpaView::from).collect())
    }

    /// All services, or only those in `status`
    pub fn services_for_admin(
        &self,
        actor: &Actor,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<ServiceView>> {
        actor.require(Role::Admin)?;
        let services = self
            .store
            .services_where(|service| status.is_none_or(|s| service.approval_status == s))?;
        Ok(services.iter().map(ServiceView::from).collect())
    }
}
