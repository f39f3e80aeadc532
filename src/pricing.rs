//! Booking price calculation.
//!
//! The price computed here is written onto the booking once and never
//! recalculated, so later edits to the service price or the customer's
//! membership do not reach existing bookings.
use super::model::{Membership, Service, User};
use super::types::Money;
use rust_decimal::Decimal;

/// Price a customer pays for `service` right now.
///
/// `membership` is the plan referenced by the customer, looked up by the
/// caller. The discount applies only while the customer's membership status
/// is active and the plan's percentage is above zero.
pub fn compute_booking_price(
    service: &Service,
    customer: &User,
    membership: Option<&Membership>,
) -> Money {
    let list_price = service.price;

    let discount = match (customer.active_membership(), membership) {
        (Some(held), Some(plan)) if *held == plan.id && !plan.discount_percentage.is_zero() => {
            plan.discount_percentage.value()
        }
        _ => return list_price,
    };

    let amount = list_price.amount();
    Money::new(amount - amount * discount / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApprovalStatus, MembershipStatus, Role, ServiceStatus};
    use crate::types::{MembershipId, Percentage, ServiceId, SpaId, UserId};

    fn service(cents: i64) -> Service {
        Service {
            id: ServiceId::from("svc_1"),
            name: "Hot stone massage".into(),
            description: String::new(),
            price: Money::from_cents(cents),
            duration_in_minutes: 60,
            approval_status: ApprovalStatus::Approved,
            service_status: ServiceStatus::Available,
            spa: SpaId::from("spa_1"),
        }
    }

    fn plan(discount: i64) -> Membership {
        Membership {
            id: MembershipId::from("mbr_1"),
            name: "Gold".into(),
            description: String::new(),
            price_per_month: Money::from_cents(4_999),
            discount_percentage: Percentage::new(Decimal::new(discount, 0)).unwrap(),
        }
    }

    fn customer(status: MembershipStatus, membership: Option<&str>) -> User {
        User {
            id: UserId::from("user_1"),
            email: "john.doe@example.com".into(),
            password: "x".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            phone: String::new(),
            role: Role::User,
            membership: membership.map(MembershipId::from),
            membership_status: status,
        }
    }

    #[test]
    fn active_member_gets_discount() {
        let price = compute_booking_price(
            &service(10_000),
            &customer(MembershipStatus::Active, Some("mbr_1")),
            Some(&plan(20)),
        );
        assert_eq!(price, Money::from_cents(8_000));
    }

    #[test]
    fn non_active_statuses_pay_list_price() {
        for status in [
            MembershipStatus::Pending,
            MembershipStatus::Rejected,
            MembershipStatus::Inactive,
        ] {
            let price = compute_booking_price(
                &service(10_000),
                &customer(status, Some("mbr_1")),
                Some(&plan(20)),
            );
            assert_eq!(price, Money::from_cents(10_000));
        }
    }

    #[test]
    fn zero_discount_and_no_plan_pay_list_price() {
        let member = customer(MembershipStatus::Active, Some("mbr_1"));
        assert_eq!(
            compute_booking_price(&service(4_550), &member, Some(&plan(0))),
            Money::from_cents(4_550)
        );
        assert_eq!(
            compute_booking_price(&service(4_550), &member, None),
            Money::from_cents(4_550)
        );
    }

    #[test]
    fn discount_rounds_half_away_from_zero() {
        // 15% of 33.33 is 4.9995
        let price = compute_booking_price(
            &service(3_333),
            &customer(MembershipStatus::Active, Some("mbr_1")),
            Some(&plan(15)),
        );
        assert_eq!(price, Money::from_cents(2_833));
    }
}
