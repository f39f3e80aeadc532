//! Shared fixtures for the integration tests.
//!
//! Sled uses file-based locking, so every test opens its own database in a
//! temporary directory that is removed when the fixture drops.
#![allow(dead_code)]

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use spa_marketplace::{
    Actor, EngineConfig, Marketplace,
    model::{ApprovalStatus, Role, ServiceStatus},
    service::{NewMembership, NewService, NewSpa, NewUser},
    types::{MembershipId, Money, Percentage, ServiceId, SpaId, TimeStamp},
};
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

pub struct Fixture {
    _dir: TempDir,
    pub market: Marketplace,
    pub admin: Actor,
    pub owner: Actor,
    pub customer: Actor,
}

impl Fixture {
    pub fn new(name: &str) -> anyhow::Result<Self> {
        Self::with_config(name, EngineConfig::default())
    }

    pub fn with_config(name: &str, config: EngineConfig) -> anyhow::Result<Self> {
        let dir = tempdir()?;
        let db = sled::open(dir.path().join(format!("{name}.db")))?;
        let market = Marketplace::new(Arc::new(db), config);

        let admin = Actor::admin(register(&market, "admin@spa.test", "Ada", "Admin", Role::Admin)?);
        let owner = Actor::client(register(&market, "owner@spa.test", "Sarah", "Williams", Role::Client)?);
        let customer = Actor::customer(register(&market, "john@spa.test", "John", "Doe", Role::User)?);

        Ok(Self {
            _dir: dir,
            market,
            admin,
            owner,
            customer,
        })
    }

    pub fn another_customer(&self, email: &str) -> anyhow::Result<Actor> {
        Ok(Actor::customer(register(&self.market, email, "Jane", "Smith", Role::User)?))
    }

    pub fn another_owner(&self, email: &str) -> anyhow::Result<Actor> {
        Ok(Actor::client(register(&self.market, email, "Michael", "Chen", Role::Client)?))
    }

    /// A spa owned by `self.owner`, still pending approval
    pub fn pending_spa(&self) -> anyhow::Result<SpaId> {
        let spa = self.market.add_spa(
            &self.owner,
            NewSpa {
                name: "Serenity Day Spa".into(),
                address: "12 Harbour Road".into(),
                description: "Massages by the water".into(),
            },
        )?;
        Ok(spa.id)
    }

    pub fn approved_spa(&self) -> anyhow::Result<SpaId> {
        let spa = self.pending_spa()?;
        self.market
            .approve_spa(&self.admin, &spa, ApprovalStatus::Approved)?;
        Ok(spa)
    }

    /// A service added to `spa`, still pending approval and unavailable
    pub fn pending_service(&self, spa: &SpaId, price_cents: i64) -> anyhow::Result<ServiceId> {
        let service = self.market.add_service(
            &self.owner,
            spa,
            NewService {
                name: "Swedish Massage".into(),
                description: "Full body".into(),
                price: Money::from_cents(price_cents),
                duration_in_minutes: 60,
            },
        )?;
        Ok(service.id)
    }

    /// An approved and available service on an approved spa
    pub fn live_service(&self, price_cents: i64) -> anyhow::Result<(SpaId, ServiceId)> {
        let spa = self.approved_spa()?;
        let service = self.live_service_at(&spa, price_cents)?;
        Ok((spa, service))
    }

    pub fn live_service_at(&self, spa: &SpaId, price_cents: i64) -> anyhow::Result<ServiceId> {
        let service = self.pending_service(spa, price_cents)?;
        self.market
            .approve_service(&self.admin, &service, ApprovalStatus::Approved)?;
        self.market
            .update_service_status(&self.owner, &service, ServiceStatus::Available)?;
        Ok(service)
    }

    pub fn membership(&self, name: &str, discount: i64) -> anyhow::Result<MembershipId> {
        let plan = self.market.create_membership(
            &self.admin,
            NewMembership {
                name: name.into(),
                description: format!("{discount}% off"),
                price_per_month: Money::from_cents(1_999),
                discount_percentage: Percentage::new(Decimal::new(discount, 0)).unwrap(),
            },
        )?;
        Ok(plan.id)
    }
}

pub fn register(
    market: &Marketplace,
    email: &str,
    first_name: &str,
    last_name: &str,
    role: Role,
) -> anyhow::Result<spa_marketplace::types::UserId> {
    let user = market.register_user(NewUser {
        email: email.into(),
        password: "password123".into(),
        first_name: first_name.into(),
        last_name: last_name.into(),
        phone: "555-0100".into(),
        role,
    })?;
    Ok(user.id)
}

/// A day safely in the future
pub fn future_day() -> NaiveDate {
    (Utc::now() + Duration::days(30)).date_naive()
}

pub fn at(day: NaiveDate, hour: u32, minute: u32) -> TimeStamp {
    TimeStamp::from(day.and_hms_opt(hour, minute, 0).unwrap().and_utc())
}
