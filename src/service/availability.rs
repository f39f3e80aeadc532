use super::Marketplace;
use crate::availability::compute_available_slots;
use crate::error::{EngineError, Result};
use crate::types::{ServiceId, TimeStamp};
use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

impl Marketplace {
    /// Free hourly slots for `service_id` on `date` (UTC), earliest first.
    /// Advisory only: booking creation does not consult it.
    pub fn available_slots(&self, service_id: &ServiceId, date: NaiveDate) -> Result<Vec<NaiveTime>> {
        let service = self.load_service(service_id)?;
        let next_day = date
            .succ_opt()
            .ok_or_else(|| EngineError::InvalidArgument(format!("{date} has no following day")))?;

        let bookings = self.store.bookings_for_service_between(
            &service.id,
            &TimeStamp::start_of(date),
            &TimeStamp::start_of(next_day),
        )?;
        let slots = compute_available_slots(
            &self.config.operating_hours,
            bookings.iter().map(|b| &b.booking_time),
        );

        debug!(service = %service.id, %date, free = slots.len(), "computed availability");
        Ok(slots)
    }
}
