//! Booking lifecycle: creation with a locked price, customer cancellation,
//! and the spa owner's confirm/decline decision.
use super::Marketplace;
use crate::context::Actor;
use crate::error::{EngineError, Result, TxResult, abort};
use crate::model::{Booking, BookingStatus, Role};
use crate::pricing::compute_booking_price;
use crate::types::{BookingId, ServiceId, SpaId, TimeStamp};
use crate::view::BookingView;
use tracing::{debug, info};

// Move `booking` along the lifecycle graph or explain why it cannot move
fn transition(booking: &mut Booking, next: BookingStatus) -> TxResult<()> {
    if !booking.status.can_transition_to(next) {
        return abort(EngineError::Conflict(format!(
            "booking {} cannot move from {:?} to {:?}",
            booking.id, booking.status, next
        )));
    }
    booking.status = next;
    Ok(())
}

impl Marketplace {
    /// Book `service_id` at `booking_time` for the calling customer.
    ///
    /// The price is computed from the service's current list price and the
    /// customer's membership as they stand now, and is never recomputed.
    pub fn create_booking(
        &self,
        actor: &Actor,
        service_id: &ServiceId,
        booking_time: TimeStamp,
    ) -> Result<BookingView> {
        actor.require(Role::User)?;
        if !booking_time.is_future() {
            return Err(EngineError::InvalidArgument(format!(
                "booking time {:?} is not in the future",
                booking_time.to_datetime_utc()
            )));
        }
        booking_time.index_bytes()?;

        let id = BookingId::generate()?;
        let enforce_slot_uniqueness = self.config.enforce_slot_uniqueness;

        let (booking, customer, spa, service) = self.store.transaction(|tx| {
            let customer = tx.user(&actor.id)?;
            let service = tx.service(service_id)?;
            let spa = tx.spa(&service.spa)?;

            if !spa.is_approved() {
                return abort(EngineError::Conflict(format!(
                    "spa {} is not approved and cannot take bookings",
                    spa.id
                )));
            }
            if !service.is_bookable() {
                return abort(EngineError::Conflict(format!(
                    "service {} is not approved and available",
                    service.id
                )));
            }
            if enforce_slot_uniqueness
                && tx
                    .bookings_at(service_id, &booking_time)?
                    .iter()
                    .any(|b| b.status.is_live())
            {
                return abort(EngineError::Conflict(format!(
                    "service {} is already booked at {:?}",
                    service.id,
                    booking_time.to_datetime_utc()
                )));
            }

            let membership = match customer.active_membership() {
                Some(membership_id) => tx.find_membership(membership_id)?,
                None => None,
            };
            let final_price = compute_booking_price(&service, &customer, membership.as_ref());

            let booking = Booking {
                id: id.clone(),
                booking_time,
                status: BookingStatus::Pending,
                final_price,
                customer: customer.id.clone(),
                spa: spa.id.clone(),
                service: service.id.clone(),
            };
            tx.insert_booking(&booking)?;
            Ok((booking, customer, spa, service))
        })?;

        info!(
            booking = %booking.id,
            service = %service.id,
            customer = %customer.id,
            final_price = %booking.final_price,
            "booking created"
        );
        Ok(BookingView::new(&booking, &customer, &spa, &service))
    }

    /// Customer withdraws their own pending booking
    pub fn cancel_booking(&self, actor: &Actor, booking_id: &BookingId) -> Result<BookingView> {
        let booking = self.store.transaction(|tx| {
            let mut booking = tx.booking(booking_id)?;
            if !actor.is(&booking.customer) {
                return abort(EngineError::Forbidden(format!(
                    "booking {} does not belong to {}",
                    booking.id, actor.id
                )));
            }
            transition(&mut booking, BookingStatus::CancelledByUser)?;
            tx.save_booking(&booking)?;
            Ok(booking)
        })?;

        info!(booking = %booking.id, "booking cancelled by customer");
        self.booking_view(&booking)
    }

    /// Spa owner confirms or declines a pending booking at their spa
    pub fn update_booking_status(
        &self,
        actor: &Actor,
        booking_id: &BookingId,
        status: BookingStatus,
    ) -> Result<BookingView> {
        let booking = self.store.transaction(|tx| {
            let mut booking = tx.booking(booking_id)?;
            let spa = tx.spa(&booking.spa)?;

            if !actor.is(&spa.owner) {
                return abort(EngineError::Forbidden(format!(
                    "{} does not own spa {}",
                    actor.id, spa.id
                )));
            }
            if !spa.is_approved() {
                return abort(EngineError::Conflict(format!(
                    "cannot manage bookings: spa {} is not approved",
                    spa.id
                )));
            }
            if booking.status != BookingStatus::Pending {
                return abort(EngineError::Conflict(format!(
                    "booking {} is no longer pending (status: {:?})",
                    booking.id, booking.status
                )));
            }
            if !matches!(
                status,
                BookingStatus::Confirmed | BookingStatus::DeclinedByClient
            ) {
                return abort(EngineError::InvalidArgument(format!(
                    "a spa owner can only confirm or decline a booking, not set {status:?}"
                )));
            }

            transition(&mut booking, status)?;
            tx.save_booking(&booking)?;
            Ok(booking)
        })?;

        info!(booking = %booking.id, status = ?booking.status, "booking status updated");
        self.booking_view(&booking)
    }

    /// The calling customer's bookings, earliest first
    pub fn user_bookings(&self, actor: &Actor) -> Result<Vec<BookingView>> {
        let mut bookings = self.store.bookings_where(|b| actor.is(&b.customer))?;
        bookings.sort_by_key(|b| b.booking_time);
        debug!(customer = %actor.id, count = bookings.len(), "listed customer bookings");
        bookings.iter().map(|b| self.booking_view(b)).collect()
    }

    /// Bookings at a spa the caller owns, optionally narrowed to one status
    pub fn bookings_for_spa(
        &self,
        actor: &Actor,
        spa_id: &SpaId,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingView>> {
        let spa = self.load_spa(spa_id)?;
        if !actor.is(&spa.owner) {
            return Err(EngineError::Forbidden(format!(
                "{} does not own spa {}",
                actor.id, spa.id
            )));
        }

        let mut bookings = self
            .store
            .bookings_where(|b| b.spa == spa.id && status.is_none_or(|s| b.status == s))?;
        bookings.sort_by_key(|b| b.booking_time);
        bookings.iter().map(|b| self.booking_view(b)).collect()
    }
}
