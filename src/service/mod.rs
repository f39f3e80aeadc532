//! Service layer API for marketplace workflow operations.
//!
//! Each public operation takes the calling [`Actor`](crate::context::Actor),
//! checks its guards and performs its read-modify-write inside one store
//! transaction, so concurrent callers acting on the same record cannot both
//! pass a guard that only one of them should.
use super::config::EngineConfig;
use super::error::{EngineError, Result};
use super::model::{Booking, Review, Service, Spa, User};
use super::store::Store;
use super::view::{BookingView, ReviewView, UserView};
use super::types::{ServiceId, SpaId, UserId};
use std::sync::Arc;

mod approval;
mod availability;
mod booking;
mod catalog;
mod membership;
mod review;
mod wishlist;

pub use catalog::{NewService, NewSpa, NewUser};
pub use membership::NewMembership;
pub use review::NewReview;

pub struct Marketplace {
    store: Store,
    config: EngineConfig,
}

impl Marketplace {
    pub fn new(instance: Arc<sled::Db>, config: EngineConfig) -> Self {
        Self {
            store: Store::new(instance),
            config,
        }
    }

    /// Open the database named by `config.db_path`
    pub fn open(config: EngineConfig) -> Result<Self> {
        let store = Store::open(&config.db_path)?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn load_user(&self, id: &UserId) -> Result<User> {
        self.store
            .user(id)?
            .ok_or_else(|| EngineError::not_found("user", id))
    }

    fn load_spa(&self, id: &SpaId) -> Result<Spa> {
        self.store
            .spa(id)?
            .ok_or_else(|| EngineError::not_found("spa", id))
    }

    fn load_service(&self, id: &ServiceId) -> Result<Service> {
        self.store
            .service(id)?
            .ok_or_else(|| EngineError::not_found("service", id))
    }

    fn user_view(&self, user: &User) -> Result<UserView> {
        let membership = match &user.membership {
            Some(id) => self.store.membership(id)?,
            None => None,
        };
        Ok(UserView::new(user, membership.as_ref()))
    }

    fn booking_view(&self, booking: &Booking) -> Result<BookingView> {
        let customer = self.load_user(&booking.customer)?;
        let spa = self.load_spa(&booking.spa)?;
        let service = self.load_service(&booking.service)?;
        Ok(BookingView::new(booking, &customer, &spa, &service))
    }

    fn review_view(&self, review: &Review) -> Result<ReviewView> {
        let author = self.load_user(&review.user)?;
        Ok(ReviewView::new(review, &author))
    }
}
