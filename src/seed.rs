//! Demo data for development databases.
//!
//! Everything is created through the public engine operations, so the seeded
//! records pass the same guards as real traffic.
use super::context::Actor;
use super::model::{ApprovalStatus, BookingStatus, Role, ServiceStatus};
use super::service::{Marketplace, NewMembership, NewReview, NewService, NewSpa, NewUser};
use super::store::keys;
use super::types::{MembershipId, Money, Percentage, ServiceId, SpaId, TimeStamp, UserId};
use anyhow::Context;
use chrono::{Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub memberships: usize,
    pub users: usize,
    pub spas: usize,
    pub bookings: usize,
    pub reviews: usize,
}

fn ensure_user(
    market: &Marketplace,
    email: &str,
    first_name: &str,
    last_name: &str,
    phone: &str,
    role: Role,
) -> anyhow::Result<UserId> {
    if let Some(existing) = market.store().user_by_email(email)? {
        return Ok(existing.id);
    }
    let view = market.register_user(NewUser {
        email: email.into(),
        password: "password123".into(),
        first_name: first_name.into(),
        last_name: last_name.into(),
        phone: phone.into(),
        role,
    })?;
    Ok(view.id)
}

fn ensure_membership(
    market: &Marketplace,
    admin: &Actor,
    name: &str,
    description: &str,
    price_cents: i64,
    discount: i64,
) -> anyhow::Result<MembershipId> {
    if let Some(existing) = market.store().membership_by_name(name)? {
        return Ok(existing.id);
    }
    let discount_percentage =
        Percentage::new(Decimal::new(discount, 0)).context("discount outside 0..=100")?;
    let view = market.create_membership(
        admin,
        NewMembership {
            name: name.into(),
            description: description.into(),
            price_per_month: Money::from_cents(price_cents),
            discount_percentage,
        },
    )?;
    Ok(view.id)
}

fn subscribe_if_free(market: &Marketplace, user: &Actor, plan: &MembershipId) -> anyhow::Result<()> {
    if market.user(&user.id)?.membership_name.is_none() {
        market.subscribe(user, plan)?;
    }
    Ok(())
}

fn live_service(
    market: &Marketplace,
    admin: &Actor,
    owner: &Actor,
    spa: &SpaId,
    name: &str,
    price_cents: i64,
    minutes: u32,
) -> anyhow::Result<ServiceId> {
    let service = market.add_service(
        owner,
        spa,
        NewService {
            name: name.into(),
            description: format!("{name} performed by our senior therapists"),
            price: Money::from_cents(price_cents),
            duration_in_minutes: minutes,
        },
    )?;
    market.approve_service(admin, &service.id, ApprovalStatus::Approved)?;
    market.update_service_status(owner, &service.id, ServiceStatus::Available)?;
    Ok(service.id)
}

/// Reuse the owner's spa of the same name, or list and return a new one.
/// The flag is true when the spa was created by this call.
fn ensure_spa(
    market: &Marketplace,
    owner: &Actor,
    new_spa: NewSpa,
) -> anyhow::Result<(SpaId, bool)> {
    let existing = market
        .store()
        .spas_where(|spa| owner.is(&spa.owner) && spa.name == new_spa.name)?;
    if let Some(spa) = existing.into_iter().next() {
        return Ok((spa.id, false));
    }
    Ok((market.add_spa(owner, new_spa)?.id, true))
}

fn seed_activity(
    market: &Marketplace,
    admin: &Actor,
    owner: &Actor,
    spa: &SpaId,
    [john, jane, emily]: [&Actor; 3],
) -> anyhow::Result<()> {
    info!("[4/6] seeding services");
    let service =
        |name, cents, minutes| live_service(market, admin, owner, spa, name, cents, minutes);
    let swedish = service("Swedish Massage", 8_000, 60)?;
    let deep_tissue = service("Deep Tissue Massage", 9_500, 90)?;
    market.add_service(
        owner,
        spa,
        NewService {
            name: "Aromatherapy Facial".into(),
            description: "Pending admin review".into(),
            price: Money::from_cents(6_500),
            duration_in_minutes: 45,
        },
    )?;

    info!("[5/6] seeding bookings and reviews");
    let tomorrow = (Utc::now() + Duration::days(1)).date_naive();
    let at = |hour| {
        NaiveTime::from_hms_opt(hour, 0, 0)
            .map(|t| TimeStamp::from(tomorrow.and_time(t).and_utc()))
            .context("invalid seed hour")
    };
    let johns = market.create_booking(john, &swedish, at(10)?)?;
    market.create_booking(jane, &deep_tissue, at(14)?)?;
    market.update_booking_status(owner, &johns.id, BookingStatus::Confirmed)?;
    market.submit_review(
        john,
        spa,
        NewReview {
            rating: 5,
            comment: "Wonderful massage, will be back".into(),
        },
    )?;

    info!("[6/6] seeding wishlists");
    market.add_to_wishlist(emily, &swedish)?;
    market.add_to_wishlist(jane, &swedish)?;
    Ok(())
}

/// Populate the database with a small marketplace. Returns `None` when data
/// already exists and `force` is not set. A forced run reuses users, plans
/// and spas found by email or name, so repeating it adds no duplicates.
pub fn seed_demo_data(market: &Marketplace, force: bool) -> anyhow::Result<Option<SeedSummary>> {
    let store = market.store();
    let existing = store.count(keys::MEMBERSHIP);
    if existing > 0 && !force {
        warn!(existing, "database already holds memberships, skipping demo seeding");
        return Ok(None);
    }

    info!("[1/6] seeding users");
    let user = |email, first, last, phone, role| ensure_user(market, email, first, last, phone, role);
    let admin = Actor::admin(user("admin@spabooking.com", "Admin", "Manager", "555-0000", Role::Admin)?);
    let sarah = Actor::client(user("owner1@relaxspa.com", "Sarah", "Williams", "555-0001", Role::Client)?);
    let michael = Actor::client(user("owner2@zenwell.com", "Michael", "Chen", "555-0002", Role::Client)?);
    let john = Actor::customer(user("john.doe@gmail.com", "John", "Doe", "555-1001", Role::User)?);
    let jane = Actor::customer(user("jane.smith@gmail.com", "Jane", "Smith", "555-1002", Role::User)?);
    let emily = Actor::customer(user("emily.brown@gmail.com", "Emily", "Brown", "555-1004", Role::User)?);

    info!("[2/6] seeding memberships");
    let basic = ensure_membership(market, &admin, "Basic", "5% off every service", 999, 5)?;
    let premium =
        ensure_membership(market, &admin, "Premium", "15% off and priority booking", 1_999, 15)?;
    ensure_membership(market, &admin, "Gold", "25% off and exclusive services", 4_999, 25)?;
    subscribe_if_free(market, &john, &premium)?;
    subscribe_if_free(market, &jane, &basic)?;

    info!("[3/6] seeding spas");
    let (serenity, created) = ensure_spa(
        market,
        &sarah,
        NewSpa {
            name: "Serenity Day Spa".into(),
            address: "12 Harbour Road".into(),
            description: "Massages and facials by the water".into(),
        },
    )?;
    market.approve_spa(&admin, &serenity, ApprovalStatus::Approved)?;
    ensure_spa(
        market,
        &michael,
        NewSpa {
            name: "Zen Wellness Retreat".into(),
            address: "48 Cedar Lane".into(),
            description: "Awaiting approval".into(),
        },
    )?;

    // services, bookings, reviews and wishlists hang off the demo spa
    if created {
        seed_activity(market, &admin, &sarah, &serenity, [&john, &jane, &emily])?;
    } else {
        info!(spa = %serenity, "demo spa already present, keeping its services and bookings");
    }

    let summary = SeedSummary {
        memberships: store.count(keys::MEMBERSHIP),
        users: store.count(keys::USER),
        spas: store.count(keys::SPA),
        bookings: store.count(keys::BOOKING),
        reviews: store.count(keys::REVIEW),
    };
    info!(?summary, "demo seeding completed");
    Ok(Some(summary))
}
