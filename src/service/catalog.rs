//! Registration, spa and service management, and the public listings
use super::Marketplace;
use crate::context::Actor;
use crate::error::{EngineError, Result, abort};
use crate::model::{ApprovalStatus, MembershipStatus, Role, Service, ServiceStatus, Spa, User};
use crate::types::{Money, ServiceId, SpaId, UserId};
use crate::view::{ServiceView, SpaDetailView, SpaView, UserView};
use tracing::info;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewSpa {
    pub name: String,
    pub address: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub duration_in_minutes: u32,
}

impl Marketplace {
    /// Create an account. Emails are unique; new users hold no membership.
    pub fn register_user(&self, new_user: NewUser) -> Result<UserView> {
        if new_user.password.trim().is_empty() {
            return Err(EngineError::InvalidArgument("password cannot be empty".into()));
        }

        let user = User {
            id: UserId::generate()?,
            email: new_user.email,
            password: new_user.password,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            phone: new_user.phone,
            role: new_user.role,
            membership: None,
            membership_status: MembershipStatus::Inactive,
        };

        self.store.transaction(|tx| {
            if !tx.claim_email(&user.email, &user.id)? {
                return abort(EngineError::Conflict(format!(
                    "email {} is already in use",
                    user.email
                )));
            }
            tx.save_user(&user)
        })?;

        info!(user = %user.id, role = ?user.role, "user registered");
        Ok(UserView::new(&user, None))
    }

    /// A client lists a new spa, which waits for admin approval
    pub fn add_spa(&self, actor: &Actor, new_spa: NewSpa) -> Result<SpaView> {
        actor.require(Role::Client)?;

        let spa = Spa {
            id: SpaId::generate()?,
            name: new_spa.name,
            address: new_spa.address,
            description: new_spa.description,
            approval_status: ApprovalStatus::Pending,
            owner: actor.id.clone(),
        };

        self.store.transaction(|tx| {
            tx.user(&actor.id)?;
            tx.save_spa(&spa)
        })?;

        info!(spa = %spa.id, owner = %spa.owner, "spa submitted for approval");
        Ok(SpaView::from(&spa))
    }

    /// The owner of an approved spa adds a service to it. The service starts
    /// pending approval and unavailable.
    pub fn add_service(
        &self,
        actor: &Actor,
        spa_id: &SpaId,
        new_service: NewService,
    ) -> Result<ServiceView> {
        if new_service.price.is_negative() {
            return Err(EngineError::InvalidArgument(format!(
                "price {} is negative",
                new_service.price
            )));
        }
        if new_service.duration_in_minutes == 0 {
            return Err(EngineError::InvalidArgument(
                "duration must be at least one minute".into(),
            ));
        }

        let service = Service {
            id: ServiceId::generate()?,
            name: new_service.name,
            description: new_service.description,
            price: new_service.price,
            duration_in_minutes: new_service.duration_in_minutes,
            approval_status: ApprovalStatus::Pending,
            service_status: ServiceStatus::Unavailable,
            spa: spa_id.clone(),
        };

        self.store.transaction(|tx| {
            let spa = tx.spa(spa_id)?;
            if !actor.is(&spa.owner) {
                return abort(EngineError::Forbidden(format!(
                    "{} cannot add services to spa {}",
                    actor.id, spa.id
                )));
            }
            if !spa.is_approved() {
                return abort(EngineError::Conflict(format!(
                    "cannot add service: spa {} is not yet approved",
                    spa.id
                )));
            }
            tx.insert_service(&service)
        })?;

        info!(service = %service.id, spa = %spa_id, "service submitted for approval");
        Ok(ServiceView::from(&service))
    }

    /// The spa owner switches a service on or off. Only possible while the
    /// spa is approved.
    pub fn update_service_status(
        &self,
        actor: &Actor,
        service_id: &ServiceId,
        status: ServiceStatus,
    ) -> Result<ServiceView> {
        let service = self.store.transaction(|tx| {
            let mut service = tx.service(service_id)?;
            let spa = tx.spa(&service.spa)?;
            if !actor.is(&spa.owner) {
                return abort(EngineError::Forbidden(format!(
                    "{} cannot change service {}",
                    actor.id, service.id
                )));
            }
            if !spa.is_approved() {
                return abort(EngineError::Conflict(format!(
                    "cannot change service status: parent spa {} is not approved",
                    spa.id
                )));
            }
            service.service_status = status;
            tx.save_service(&service)?;
            Ok(service)
        })?;

        info!(service = %service.id, status = ?status, "service status updated");
        Ok(ServiceView::from(&service))
    }

    pub fn client_spas(&self, actor: &Actor) -> Result<Vec<SpaView>> {
        let spas = self.store.spas_where(|spa| actor.is(&spa.owner))?;
        Ok(spas.iter().map(SpaView::from).collect())
    }

    pub fn approved_spas(&self) -> Result<Vec<SpaView>> {
        let spas = self.store.spas_where(Spa::is_approved)?;
        Ok(spas.iter().map(SpaView::from).collect())
    }

    /// Approved spas whose name contains `name`, ignoring case
    pub fn find_spas_by_name(&self, name: &str) -> Result<Vec<SpaView>> {
        let needle = name.to_lowercase();
        let spas = self
            .store
            .spas_where(|spa| spa.is_approved() && spa.name.to_lowercase().contains(&needle))?;
        Ok(spas.iter().map(SpaView::from).collect())
    }

    /// A spa with its approved services and its reviews
    pub fn spa_details(&self, spa_id: &SpaId) -> Result<SpaDetailView> {
        let spa = self.load_spa(spa_id)?;
        let services = self.store.services_where(|s| {
            s.spa == spa.id && s.approval_status == ApprovalStatus::Approved
        })?;
        let reviews = self.store.reviews_where(|r| r.spa == spa.id)?;

        Ok(SpaDetailView {
            id: spa.id.clone(),
            name: spa.name,
            address: spa.address,
            description: spa.description,
            owner_id: spa.owner,
            services: services.iter().map(ServiceView::from).collect(),
            reviews: reviews
                .iter()
                .map(|r| self.review_view(r))
                .collect::<Result<_>>()?,
        })
    }

    /// Every service of a spa regardless of status
    pub fn services_for_spa(&self, spa_id: &SpaId) -> Result<Vec<ServiceView>> {
        let services = self.store.services_where(|s| s.spa == *spa_id)?;
        Ok(services.iter().map(ServiceView::from).collect())
    }

    /// Admin lists every spa owner
    pub fn clients(&self, actor: &Actor) -> Result<Vec<UserView>> {
        actor.require(Role::Admin)?;
        self.store
            .users_where(|u| u.role == Role::Client)?
            .iter()
            .map(|u| self.user_view(u))
            .collect()
    }
}
