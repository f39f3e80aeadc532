//! Read models handed back to the calling layer
use super::model::{
    ApprovalStatus, Booking, BookingStatus, Membership, MembershipStatus, Review, Role, Service,
    ServiceStatus, Spa, User,
};
use super::types::{
    BookingId, MembershipId, Money, Percentage, ReviewId, ServiceId, SpaId, TimeStamp, UserId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipView {
    pub id: MembershipId,
    pub name: String,
    pub description: String,
    pub price_per_month: Money,
    pub discount_percentage: Percentage,
}

impl From<&Membership> for MembershipView {
    fn from(m: &Membership) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            description: m.description.clone(),
            price_per_month: m.price_per_month,
            discount_percentage: m.discount_percentage,
        }
    }
}

/// A user without their credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
    pub membership_name: Option<String>,
    pub membership_status: MembershipStatus,
}

impl UserView {
    pub fn new(user: &User, membership: Option<&Membership>) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            membership_name: membership.map(|m| m.name.clone()),
            membership_status: user.membership_status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaView {
    pub id: SpaId,
    pub name: String,
    pub address: String,
    pub description: String,
    pub approval_status: ApprovalStatus,
    pub owner_id: UserId,
}

impl From<&Spa> for SpaView {
    fn from(spa: &Spa) -> Self {
        Self {
            id: spa.id.clone(),
            name: spa.name.clone(),
            address: spa.address.clone(),
            description: spa.description.clone(),
            approval_status: spa.approval_status,
            owner_id: spa.owner.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceView {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub duration_in_minutes: u32,
    pub approval_status: ApprovalStatus,
    pub service_status: ServiceStatus,
    pub spa_id: SpaId,
}

impl From<&Service> for ServiceView {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            price: service.price,
            duration_in_minutes: service.duration_in_minutes,
            approval_status: service.approval_status,
            service_status: service.service_status,
            spa_id: service.spa.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    pub id: ReviewId,
    pub rating: u8,
    pub comment: String,
    pub review_date: TimeStamp,
    pub user_id: UserId,
    pub user_name: String, // "First L."
    pub spa_id: SpaId,
}

impl ReviewView {
    pub fn new(review: &Review, author: &User) -> Self {
        let initial = author
            .last_name
            .chars()
            .next()
            .map(|c| format!(" {c}."))
            .unwrap_or_default();

        Self {
            id: review.id.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            review_date: review.review_date,
            user_id: author.id.clone(),
            user_name: format!("{}{}", author.first_name, initial),
            spa_id: review.spa.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaDetailView {
    pub id: SpaId,
    pub name: String,
    pub address: String,
    pub description: String,
    pub owner_id: UserId,
    pub services: Vec<ServiceView>,
    pub reviews: Vec<ReviewView>,
}

/// A booking with the list price it was made against and the price that
/// was locked in for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub id: BookingId,
    pub booking_time: TimeStamp,
    pub status: BookingStatus,
    pub customer_id: UserId,
    pub customer_name: String,
    pub spa_id: SpaId,
    pub spa_name: String,
    pub service_id: ServiceId,
    pub service_name: String,
    pub original_price: Money,
    pub final_price: Money,
}

impl BookingView {
    pub fn new(booking: &Booking, customer: &User, spa: &Spa, service: &Service) -> Self {
        Self {
            id: booking.id.clone(),
            booking_time: booking.booking_time,
            status: booking.status,
            customer_id: customer.id.clone(),
            customer_name: customer.full_name(),
            spa_id: spa.id.clone(),
            spa_name: spa.name.clone(),
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            original_price: service.price,
            final_price: booking.final_price,
        }
    }
}
