//! Smoke screen tests for the marketplace guards.
//!
//! Each test drives one operation against a fresh database and checks that
//! the caller gets the expected error kind, or that a repeated call is
//! harmless where it should be.

mod common;

use common::{Fixture, at, future_day, register};
use spa_marketplace::{
    model::{ApprovalStatus, BookingStatus, MembershipStatus, Role, ServiceStatus},
    service::{NewMembership, NewReview, NewService},
    types::{MembershipId, Money, Percentage, ServiceId, SpaId},
    utils::new_uuid_to_bech32,
};

// IDENTIFIERS
mod id_tests {
    use super::*;

    #[test]
    fn generated_ids_carry_their_prefix() {
        let spa = SpaId::generate().unwrap();
        let service = ServiceId::generate().unwrap();

        assert!(spa.as_str().starts_with("spa_1"));
        assert!(service.as_str().starts_with("svc_1"));
        assert_ne!(SpaId::generate().unwrap(), spa);
    }

    #[test]
    fn empty_prefix_is_rejected() {
        assert!(new_uuid_to_bech32("").is_err());
    }
}

// ROLE GUARDS
mod role_tests {
    use super::*;

    #[test]
    fn only_admins_approve() -> anyhow::Result<()> {
        let fx = Fixture::new("only_admins_approve")?;
        let spa = fx.pending_spa()?;

        let err = fx
            .market
            .approve_spa(&fx.owner, &spa, ApprovalStatus::Approved)
            .unwrap_err();
        assert!(err.is_forbidden());
        assert!(fx
            .market
            .spas_for_admin(&fx.customer, None)
            .unwrap_err()
            .is_forbidden());

        Ok(())
    }

    #[test]
    fn customers_cannot_list_spas() -> anyhow::Result<()> {
        let fx = Fixture::new("customers_cannot_list")?;
        let err = fx
            .market
            .add_spa(
                &fx.customer,
                spa_marketplace::service::NewSpa {
                    name: "Backyard Sauna".into(),
                    address: String::new(),
                    description: String::new(),
                },
            )
            .unwrap_err();
        assert!(err.is_forbidden());

        Ok(())
    }

    #[test]
    fn owners_cannot_book() -> anyhow::Result<()> {
        let fx = Fixture::new("owners_cannot_book")?;
        let (_, service) = fx.live_service(5_000)?;

        let err = fx
            .market
            .create_booking(&fx.owner, &service, at(future_day(), 10, 0))
            .unwrap_err();
        assert!(err.is_forbidden());

        Ok(())
    }

    #[test]
    fn strangers_cannot_touch_a_booking() -> anyhow::Result<()> {
        let fx = Fixture::new("strangers_cannot_touch")?;
        let (spa, service) = fx.live_service(5_000)?;
        let booking = fx
            .market
            .create_booking(&fx.customer, &service, at(future_day(), 10, 0))?;
        let other_customer = fx.another_customer("jane@spa.test")?;
        let other_owner = fx.another_owner("michael@spa.test")?;

        assert!(fx
            .market
            .cancel_booking(&other_customer, &booking.id)
            .unwrap_err()
            .is_forbidden());
        assert!(fx
            .market
            .update_booking_status(&other_owner, &booking.id, BookingStatus::Confirmed)
            .unwrap_err()
            .is_forbidden());
        assert!(fx
            .market
            .bookings_for_spa(&other_owner, &spa, None)
            .unwrap_err()
            .is_forbidden());

        // nothing moved
        let pending = fx
            .market
            .bookings_for_spa(&fx.owner, &spa, Some(BookingStatus::Pending))?;
        assert_eq!(pending.len(), 1);

        Ok(())
    }

    #[test]
    fn only_the_owner_adds_services() -> anyhow::Result<()> {
        let fx = Fixture::new("only_owner_adds")?;
        let spa = fx.approved_spa()?;
        let other_owner = fx.another_owner("michael@spa.test")?;

        let err = fx
            .market
            .add_service(
                &other_owner,
                &spa,
                NewService {
                    name: "Hot Stones".into(),
                    description: String::new(),
                    price: Money::from_cents(7_000),
                    duration_in_minutes: 60,
                },
            )
            .unwrap_err();
        assert!(err.is_forbidden());

        Ok(())
    }
}

// LOOKUPS
mod not_found_tests {
    use super::*;

    #[test]
    fn unknown_records() -> anyhow::Result<()> {
        let fx = Fixture::new("unknown_records")?;

        assert!(fx
            .market
            .approve_spa(&fx.admin, &SpaId::from("spa_missing"), ApprovalStatus::Approved)
            .unwrap_err()
            .is_not_found());
        assert!(fx
            .market
            .available_slots(&ServiceId::from("svc_missing"), future_day())
            .unwrap_err()
            .is_not_found());
        assert!(fx
            .market
            .subscribe(&fx.customer, &MembershipId::from("mbr_missing"))
            .unwrap_err()
            .is_not_found());
        assert!(fx
            .market
            .create_booking(&fx.customer, &ServiceId::from("svc_missing"), at(future_day(), 9, 0))
            .unwrap_err()
            .is_not_found());

        Ok(())
    }
}

// INPUT VALIDATION
mod argument_tests {
    use super::*;

    #[test]
    fn rating_must_be_one_to_five() -> anyhow::Result<()> {
        let fx = Fixture::new("rating_range")?;
        let spa = fx.approved_spa()?;

        for rating in [0, 6] {
            let err = fx
                .market
                .submit_review(
                    &fx.customer,
                    &spa,
                    NewReview {
                        rating,
                        comment: String::new(),
                    },
                )
                .unwrap_err();
            assert!(err.is_invalid_argument());
        }

        Ok(())
    }

    #[test]
    fn booking_must_be_in_the_future() -> anyhow::Result<()> {
        let fx = Fixture::new("booking_in_past")?;
        let (_, service) = fx.live_service(5_000)?;
        let yesterday = future_day() - chrono::Duration::days(60);

        let err = fx
            .market
            .create_booking(&fx.customer, &service, at(yesterday, 10, 0))
            .unwrap_err();
        assert!(err.is_invalid_argument());

        Ok(())
    }

    #[test]
    fn instants_beyond_storable_range() -> anyhow::Result<()> {
        let fx = Fixture::new("far_future")?;
        let (_, service) = fx.live_service(5_000)?;
        let far = chrono::NaiveDate::from_ymd_opt(2300, 1, 1).unwrap();

        assert!(fx
            .market
            .available_slots(&service, far)
            .unwrap_err()
            .is_invalid_argument());
        assert!(fx
            .market
            .create_booking(&fx.customer, &service, at(far, 10, 0))
            .unwrap_err()
            .is_invalid_argument());
        assert!(fx.market.user_bookings(&fx.customer)?.is_empty());

        Ok(())
    }

    #[test]
    fn owner_can_only_confirm_or_decline() -> anyhow::Result<()> {
        let fx = Fixture::new("owner_choices")?;
        let (_, service) = fx.live_service(5_000)?;
        let booking = fx
            .market
            .create_booking(&fx.customer, &service, at(future_day(), 16, 0))?;

        let err = fx
            .market
            .update_booking_status(&fx.owner, &booking.id, BookingStatus::CancelledByUser)
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let declined = fx
            .market
            .update_booking_status(&fx.owner, &booking.id, BookingStatus::DeclinedByClient)?;
        assert_eq!(declined.status, BookingStatus::DeclinedByClient);

        Ok(())
    }

    #[test]
    fn bad_service_definitions() -> anyhow::Result<()> {
        let fx = Fixture::new("bad_services")?;
        let spa = fx.approved_spa()?;
        let new_service = |cents, minutes| NewService {
            name: "Mud Wrap".into(),
            description: String::new(),
            price: Money::from_cents(cents),
            duration_in_minutes: minutes,
        };

        assert!(fx
            .market
            .add_service(&fx.owner, &spa, new_service(-100, 30))
            .unwrap_err()
            .is_invalid_argument());
        assert!(fx
            .market
            .add_service(&fx.owner, &spa, new_service(4_000, 0))
            .unwrap_err()
            .is_invalid_argument());

        Ok(())
    }
}

// STATE CONFLICTS
mod conflict_tests {
    use super::*;

    #[test]
    fn duplicate_email_and_plan_name() -> anyhow::Result<()> {
        let fx = Fixture::new("duplicates")?;

        let err = register(&fx.market, "john@spa.test", "Johnny", "Doe", Role::User).unwrap_err();
        let err = err.downcast::<spa_marketplace::EngineError>()?;
        assert!(err.is_conflict());

        fx.membership("Gold", 25)?;
        let err = fx
            .market
            .create_membership(
                &fx.admin,
                NewMembership {
                    name: "Gold".into(),
                    description: String::new(),
                    price_per_month: Money::from_cents(100),
                    discount_percentage: Percentage::new(rust_decimal::Decimal::TEN).unwrap(),
                },
            )
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(fx.market.memberships()?.len(), 1);

        Ok(())
    }

    #[test]
    fn one_membership_at_a_time() -> anyhow::Result<()> {
        let fx = Fixture::new("one_membership")?;
        let basic = fx.membership("Basic", 5)?;
        let gold = fx.membership("Gold", 25)?;

        let view = fx.market.subscribe(&fx.customer, &basic)?;
        assert_eq!(view.membership_name.as_deref(), Some("Basic"));
        assert_eq!(view.membership_status, MembershipStatus::Active);

        assert!(fx
            .market
            .subscribe(&fx.customer, &gold)
            .unwrap_err()
            .is_conflict());

        let view = fx.market.cancel_membership(&fx.customer)?;
        assert_eq!(view.membership_name, None);
        assert_eq!(view.membership_status, MembershipStatus::Inactive);
        assert!(fx
            .market
            .cancel_membership(&fx.customer)
            .unwrap_err()
            .is_conflict());

        fx.market.subscribe(&fx.customer, &gold)?;

        Ok(())
    }

    #[test]
    fn unapproved_spa_blocks_its_workflow() -> anyhow::Result<()> {
        let fx = Fixture::new("unapproved_spa")?;
        let spa = fx.pending_spa()?;

        let err = fx
            .market
            .add_service(
                &fx.owner,
                &spa,
                NewService {
                    name: "Sauna".into(),
                    description: String::new(),
                    price: Money::from_cents(3_000),
                    duration_in_minutes: 30,
                },
            )
            .unwrap_err();
        assert!(err.is_conflict());

        Ok(())
    }

    #[test]
    fn unavailable_service_cannot_be_booked() -> anyhow::Result<()> {
        let fx = Fixture::new("unavailable_service")?;
        let (_, service) = fx.live_service(5_000)?;
        fx.market
            .update_service_status(&fx.owner, &service, ServiceStatus::Unavailable)?;

        let err = fx
            .market
            .create_booking(&fx.customer, &service, at(future_day(), 10, 0))
            .unwrap_err();
        assert!(err.is_conflict());

        Ok(())
    }

    #[test]
    fn spa_losing_approval_freezes_its_bookings() -> anyhow::Result<()> {
        let fx = Fixture::new("spa_loses_approval")?;
        let (spa, service) = fx.live_service(5_000)?;
        let booking = fx
            .market
            .create_booking(&fx.customer, &service, at(future_day(), 10, 0))?;

        for status in [ApprovalStatus::Pending, ApprovalStatus::Rejected] {
            fx.market.approve_spa(&fx.admin, &spa, status)?;

            assert!(fx
                .market
                .update_booking_status(&fx.owner, &booking.id, BookingStatus::Confirmed)
                .unwrap_err()
                .is_conflict());
            assert!(fx
                .market
                .create_booking(&fx.customer, &service, at(future_day(), 11, 0))
                .unwrap_err()
                .is_conflict());
        }

        let stored = fx.market.store().booking(&booking.id)?.unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
        assert_eq!(fx.market.user_bookings(&fx.customer)?.len(), 1);

        Ok(())
    }
}
