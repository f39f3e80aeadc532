//! Persistent records and their status enums.
//!
//! Records reference each other only by id. Relations that need fast
//! traversal (spa to services, customer+spa to bookings) are kept as
//! secondary index entries by the store, never as pointers inside a record.
use super::types::{
    BookingId, MembershipId, Money, Percentage, ReviewId, ServiceId, SpaId, TimeStamp, UserId,
};

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    #[n(0)]
    Admin,
    #[n(1)]
    Client,
    #[n(2)]
    User,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipStatus {
    #[n(0)]
    Active,
    #[n(1)]
    Pending,
    #[n(2)]
    Rejected,
    #[n(3)]
    Inactive,
}

/// Admission state of a spa or a service, controlled by an admin
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Approved,
    #[n(2)]
    Rejected,
}

/// Owner-controlled visibility of a service
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    #[n(0)]
    Available,
    #[n(1)]
    Unavailable,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    #[n(0)]
    Pending,
    #[n(1)]
    Confirmed,
    #[n(2)]
    CancelledByUser,
    #[n(3)]
    DeclinedByClient,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CancelledByUser,
        BookingStatus::DeclinedByClient,
    ];

    /// Every state but `Pending` is final
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }

    /// The lifecycle graph: `Pending` moves to any terminal state, nothing
    /// moves out of a terminal state.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (
                BookingStatus::Pending,
                BookingStatus::Confirmed
                    | BookingStatus::CancelledByUser
                    | BookingStatus::DeclinedByClient
            )
        )
    }

    /// Bookings that still hold their slot
    pub fn is_live(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    #[n(0)]
    pub id: MembershipId,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub description: String,
    #[n(3)]
    pub price_per_month: Money,
    #[n(4)]
    pub discount_percentage: Percentage,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct User {
    #[n(0)]
    pub id: UserId,
    #[n(1)]
    pub email: String,
    #[n(2)]
    pub password: String, // opaque credential, checked by the auth layer
    #[n(3)]
    pub first_name: String,
    #[n(4)]
    pub last_name: String,
    #[n(5)]
    pub phone: String,
    #[n(6)]
    pub role: Role,
    #[n(7)]
    pub membership: Option<MembershipId>,
    #[n(8)]
    pub membership_status: MembershipStatus,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The membership whose discount currently applies, if any
    pub fn active_membership(&self) -> Option<&MembershipId> {
        match self.membership_status {
            MembershipStatus::Active => self.membership.as_ref(),
            _ => None,
        }
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Spa {
    #[n(0)]
    pub id: SpaId,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub address: String,
    #[n(3)]
    pub description: String,
    #[n(4)]
    pub approval_status: ApprovalStatus,
    #[n(5)]
    pub owner: UserId,
}

impl Spa {
    pub fn is_approved(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Service {
    #[n(0)]
    pub id: ServiceId,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub description: String,
    #[n(3)]
    pub price: Money,
    #[n(4)]
    pub duration_in_minutes: u32,
    #[n(5)]
    pub approval_status: ApprovalStatus,
    #[n(6)]
    pub service_status: ServiceStatus,
    #[n(7)]
    pub spa: SpaId,
}

impl Service {
    /// Approved by an admin and switched on by its owner
    pub fn is_bookable(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
            && self.service_status == ServiceStatus::Available
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    #[n(0)]
    pub id: BookingId,
    #[n(1)]
    pub booking_time: TimeStamp,
    #[n(2)]
    pub status: BookingStatus,
    #[n(3)]
    pub final_price: Money, // locked at creation
    #[n(4)]
    pub customer: UserId,
    #[n(5)]
    pub spa: SpaId,
    #[n(6)]
    pub service: ServiceId,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Review {
    #[n(0)]
    pub id: ReviewId,
    #[n(1)]
    pub rating: u8,
    #[n(2)]
    pub comment: String,
    #[n(3)]
    pub review_date: TimeStamp,
    #[n(4)]
    pub user: UserId,
    #[n(5)]
    pub spa: SpaId,
}
