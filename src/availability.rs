//! Hourly slot computation for a single service and day
use super::types::TimeStamp;
use chrono::{NaiveTime, Timelike};
use std::collections::HashSet;

/// Daily window of bookable hours, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingHours {
    pub opening_hour: u32,
    pub closing_hour: u32,
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self {
            opening_hour: 9,
            closing_hour: 17,
        }
    }
}

impl OperatingHours {
    /// Every whole-hour slot of the day in ascending order
    pub fn slots(&self) -> impl Iterator<Item = NaiveTime> {
        (self.opening_hour..=self.closing_hour).filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
    }
}

/// Slots of the day that no booking starts at.
///
/// A booking blocks a slot only when its time of day matches the slot to the
/// minute. Bookings off the hourly grid block nothing, and a booking never
/// blocks the slots its service duration runs into.
pub fn compute_available_slots<'a>(
    hours: &OperatingHours,
    bookings: impl IntoIterator<Item = &'a TimeStamp>,
) -> Vec<NaiveTime> {
    let booked: HashSet<(u32, u32)> = bookings
        .into_iter()
        .map(|ts| {
            let time = ts.to_datetime_utc().time();
            (time.hour(), time.minute())
        })
        .collect();

    hours
        .slots()
        .filter(|slot| !booked.contains(&(slot.hour(), slot.minute())))
        .collect()
}
