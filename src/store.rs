//! Entity store over a single sled keyspace.
//!
//! Every record lives under `<kind>/<id>` and is CBOR encoded. Index entries
//! sit next to the records under their own prefixes:
//!
//! - `user_email/<email>` and `membership_name/<name>` hold the owning id and
//!   enforce uniqueness
//! - `spa_services/<spa>` lists the services of a spa
//! - `customer_spa/<user>/<spa>` lists the bookings a customer made at a spa
//! - `review_by/<user>/<spa>` holds the single review a user left for a spa
//! - `booking_at/<service>/<instant>` lists bookings starting at an instant,
//!   keyed so a day of bookings is one range scan
//! - `wishlist/<user>/<service>` is one member of a user's wishlist
//!
//! Writes go through [`Store::transaction`], which runs the closure as a
//! serializable sled transaction over the whole keyspace.
use super::error::{EngineError, Result, TxResult, abort};
use super::model::{Booking, BookingStatus, Membership, Review, Service, Spa, User};
use super::types::{
    BookingId, MembershipId, ReviewId, ServiceId, SpaId, TimeStamp, UserId,
};
use sled::transaction::{ConflictableTransactionError, TransactionalTree};
use std::sync::Arc;

pub mod keys {
    use crate::error::Result;
    use crate::types::{BookingId, MembershipId, ReviewId, ServiceId, SpaId, TimeStamp, UserId};

    pub const MEMBERSHIP: &str = "membership/";
    pub const USER: &str = "user/";
    pub const SPA: &str = "spa/";
    pub const SERVICE: &str = "service/";
    pub const BOOKING: &str = "booking/";
    pub const REVIEW: &str = "review/";

    pub fn membership(id: &MembershipId) -> Vec<u8> {
        format!("{MEMBERSHIP}{id}").into_bytes()
    }
    pub fn membership_name(name: &str) -> Vec<u8> {
        format!("membership_name/{name}").into_bytes()
    }
    pub fn user(id: &UserId) -> Vec<u8> {
        format!("{USER}{id}").into_bytes()
    }
    pub fn user_email(email: &str) -> Vec<u8> {
        format!("user_email/{email}").into_bytes()
    }
    pub fn spa(id: &SpaId) -> Vec<u8> {
        format!("{SPA}{id}").into_bytes()
    }
    pub fn spa_services(spa: &SpaId) -> Vec<u8> {
        format!("spa_services/{spa}").into_bytes()
    }
    pub fn service(id: &ServiceId) -> Vec<u8> {
        format!("{SERVICE}{id}").into_bytes()
    }
    pub fn booking(id: &BookingId) -> Vec<u8> {
        format!("{BOOKING}{id}").into_bytes()
    }
    pub fn customer_spa(customer: &UserId, spa: &SpaId) -> Vec<u8> {
        format!("customer_spa/{customer}/{spa}").into_bytes()
    }
    pub fn booking_at(service: &ServiceId, at: &TimeStamp) -> Result<Vec<u8>> {
        let mut key = format!("booking_at/{service}/").into_bytes();
        key.extend_from_slice(&at.index_bytes()?);
        Ok(key)
    }
    pub fn review(id: &ReviewId) -> Vec<u8> {
        format!("{REVIEW}{id}").into_bytes()
    }
    pub fn review_by(user: &UserId, spa: &SpaId) -> Vec<u8> {
        format!("review_by/{user}/{spa}").into_bytes()
    }
    pub fn wishlist(user: &UserId, service: &ServiceId) -> Vec<u8> {
        format!("wishlist/{user}/{service}").into_bytes()
    }
    pub fn wishlist_of(user: &UserId) -> Vec<u8> {
        format!("wishlist/{user}/").into_bytes()
    }
}

fn encode<T: minicbor::Encode<()>>(value: &T) -> Result<Vec<u8>> {
    Ok(minicbor::to_vec(value)?)
}

fn decode<T>(bytes: &[u8]) -> Result<T>
where
    T: for<'b> minicbor::Decode<'b, ()>,
{
    Ok(minicbor::decode(bytes)?)
}

fn tx_err(err: EngineError) -> ConflictableTransactionError<EngineError> {
    ConflictableTransactionError::Abort(err)
}

#[derive(Clone)]
pub struct Store {
    instance: Arc<sled::Db>,
}

impl Store {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    /// Open (or create) a store at `path`
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self::new(Arc::new(db)))
    }

    /// Run `f` atomically. Business errors returned by `f` abort the
    /// transaction and surface unchanged; nothing it wrote is kept.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: Fn(&StoreTx<'_>) -> TxResult<T>,
    {
        Ok(self.instance.transaction(|tx| f(&StoreTx { tx }))?)
    }

    pub fn flush(&self) -> Result<()> {
        self.instance.flush()?;
        Ok(())
    }

    fn get<T>(&self, key: &[u8]) -> Result<Option<T>>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        match self.instance.get(key)? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Decode every record under `prefix` that satisfies `keep`
    fn scan<T, P>(&self, prefix: &str, keep: P) -> Result<Vec<T>>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
        P: Fn(&T) -> bool,
    {
        let mut found = Vec::new();
        for entry in self.instance.scan_prefix(prefix) {
            let (_, bytes) = entry?;
            let record: T = decode(&bytes)?;
            if keep(&record) {
                found.push(record);
            }
        }
        Ok(found)
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.instance.scan_prefix(prefix).count()
    }

    pub fn membership(&self, id: &MembershipId) -> Result<Option<Membership>> {
        self.get(&keys::membership(id))
    }
    pub fn user(&self, id: &UserId) -> Result<Option<User>> {
        self.get(&keys::user(id))
    }
    pub fn spa(&self, id: &SpaId) -> Result<Option<Spa>> {
        self.get(&keys::spa(id))
    }
    pub fn service(&self, id: &ServiceId) -> Result<Option<Service>> {
        self.get(&keys::service(id))
    }
    pub fn booking(&self, id: &BookingId) -> Result<Option<Booking>> {
        self.get(&keys::booking(id))
    }
    pub fn review(&self, id: &ReviewId) -> Result<Option<Review>> {
        self.get(&keys::review(id))
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        match self.get::<UserId>(&keys::user_email(email))? {
            Some(id) => self.user(&id),
            None => Ok(None),
        }
    }
    pub fn membership_by_name(&self, name: &str) -> Result<Option<Membership>> {
        match self.get::<MembershipId>(&keys::membership_name(name))? {
            Some(id) => self.membership(&id),
            None => Ok(None),
        }
    }
    pub fn email_taken(&self, email: &str) -> Result<bool> {
        Ok(self.instance.contains_key(keys::user_email(email))?)
    }

    pub fn memberships(&self) -> Result<Vec<Membership>> {
        self.scan(keys::MEMBERSHIP, |_| true)
    }
    pub fn users_where(&self, keep: impl Fn(&User) -> bool) -> Result<Vec<User>> {
        self.scan(keys::USER, keep)
    }
    pub fn spas_where(&self, keep: impl Fn(&Spa) -> bool) -> Result<Vec<Spa>> {
        self.scan(keys::SPA, keep)
    }
    pub fn services_where(&self, keep: impl Fn(&Service) -> bool) -> Result<Vec<Service>> {
        self.scan(keys::SERVICE, keep)
    }
    pub fn bookings_where(&self, keep: impl Fn(&Booking) -> bool) -> Result<Vec<Booking>> {
        self.scan(keys::BOOKING, keep)
    }
    pub fn reviews_where(&self, keep: impl Fn(&Review) -> bool) -> Result<Vec<Review>> {
        self.scan(keys::REVIEW, keep)
    }

    /// Bookings of `service` starting in `[from, until)`
    pub fn bookings_for_service_between(
        &self,
        service: &ServiceId,
        from: &TimeStamp,
        until: &TimeStamp,
    ) -> Result<Vec<Booking>> {
        let start = keys::booking_at(service, from)?;
        let end = keys::booking_at(service, until)?;

        let mut found = Vec::new();
        for entry in self.instance.range(start..end) {
            let (_, bytes) = entry?;
            let ids: Vec<BookingId> = decode(&bytes)?;
            for id in ids {
                if let Some(booking) = self.booking(&id)? {
                    found.push(booking);
                }
            }
        }
        Ok(found)
    }

    pub fn wishlist(&self, user: &UserId) -> Result<Vec<ServiceId>> {
        let mut found = Vec::new();
        for entry in self.instance.scan_prefix(keys::wishlist_of(user)) {
            let (_, bytes) = entry?;
            found.push(decode(&bytes)?);
        }
        Ok(found)
    }
}

/// Typed view of the keyspace inside a running transaction
pub struct StoreTx<'a> {
    tx: &'a TransactionalTree,
}

impl StoreTx<'_> {
    fn get<T>(&self, key: &[u8]) -> TxResult<Option<T>>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        match self.tx.get(key)? {
            Some(bytes) => decode(&bytes).map(Some).map_err(tx_err),
            None => Ok(None),
        }
    }

    fn put<T: minicbor::Encode<()>>(&self, key: Vec<u8>, value: &T) -> TxResult<()> {
        let bytes = encode(value).map_err(tx_err)?;
        self.tx.insert(key, bytes)?;
        Ok(())
    }

    fn require<T>(&self, key: &[u8], what: &str, id: &dyn std::fmt::Display) -> TxResult<T>
    where
        T: for<'b> minicbor::Decode<'b, ()>,
    {
        match self.get(key)? {
            Some(record) => Ok(record),
            None => abort(EngineError::not_found(what, id)),
        }
    }

    pub fn membership(&self, id: &MembershipId) -> TxResult<Membership> {
        self.require(&keys::membership(id), "membership", id)
    }
    pub fn user(&self, id: &UserId) -> TxResult<User> {
        self.require(&keys::user(id), "user", id)
    }
    pub fn spa(&self, id: &SpaId) -> TxResult<Spa> {
        self.require(&keys::spa(id), "spa", id)
    }
    pub fn service(&self, id: &ServiceId) -> TxResult<Service> {
        self.require(&keys::service(id), "service", id)
    }
    pub fn booking(&self, id: &BookingId) -> TxResult<Booking> {
        self.require(&keys::booking(id), "booking", id)
    }
    pub fn find_membership(&self, id: &MembershipId) -> TxResult<Option<Membership>> {
        self.get(&keys::membership(id))
    }

    pub fn save_membership(&self, membership: &Membership) -> TxResult<()> {
        self.put(keys::membership(&membership.id), membership)
    }
    pub fn save_user(&self, user: &User) -> TxResult<()> {
        self.put(keys::user(&user.id), user)
    }
    pub fn save_spa(&self, spa: &Spa) -> TxResult<()> {
        self.put(keys::spa(&spa.id), spa)
    }
    pub fn save_service(&self, service: &Service) -> TxResult<()> {
        self.put(keys::service(&service.id), service)
    }
    pub fn save_booking(&self, booking: &Booking) -> TxResult<()> {
        self.put(keys::booking(&booking.id), booking)
    }

    /// Reserve `email` for `user`. `false` when it already belongs to someone.
    pub fn claim_email(&self, email: &str, user: &UserId) -> TxResult<bool> {
        let key = keys::user_email(email);
        if self.tx.get(&key)?.is_some() {
            return Ok(false);
        }
        self.put(key, user)?;
        Ok(true)
    }

    /// Reserve a membership plan name. `false` when already in use.
    pub fn claim_membership_name(&self, name: &str, id: &MembershipId) -> TxResult<bool> {
        let key = keys::membership_name(name);
        if self.tx.get(&key)?.is_some() {
            return Ok(false);
        }
        self.put(key, id)?;
        Ok(true)
    }

    pub fn service_ids_of(&self, spa: &SpaId) -> TxResult<Vec<ServiceId>> {
        Ok(self.get(&keys::spa_services(spa))?.unwrap_or_default())
    }

    /// Save a new service and link it to its spa
    pub fn insert_service(&self, service: &Service) -> TxResult<()> {
        let mut ids = self.service_ids_of(&service.spa)?;
        ids.push(service.id.clone());
        self.put(keys::spa_services(&service.spa), &ids)?;
        self.save_service(service)
    }

    pub fn bookings_at(&self, service: &ServiceId, at: &TimeStamp) -> TxResult<Vec<Booking>> {
        let key = keys::booking_at(service, at).map_err(tx_err)?;
        let ids: Vec<BookingId> = self.get(&key)?.unwrap_or_default();
        ids.iter().map(|id| self.booking(id)).collect()
    }

    /// Save a new booking together with its index entries
    pub fn insert_booking(&self, booking: &Booking) -> TxResult<()> {
        let at_key = keys::booking_at(&booking.service, &booking.booking_time)
            .map_err(tx_err)?;
        let mut at: Vec<BookingId> = self.get(&at_key)?.unwrap_or_default();
        at.push(booking.id.clone());
        self.put(at_key, &at)?;

        let by_key = keys::customer_spa(&booking.customer, &booking.spa);
        let mut by: Vec<BookingId> = self.get(&by_key)?.unwrap_or_default();
        by.push(booking.id.clone());
        self.put(by_key, &by)?;

        self.save_booking(booking)
    }

    /// Bookings `customer` has made at `spa`
    pub fn bookings_of_customer_at(&self, customer: &UserId, spa: &SpaId) -> TxResult<Vec<Booking>> {
        let ids: Vec<BookingId> = self
            .get(&keys::customer_spa(customer, spa))?
            .unwrap_or_default();
        ids.iter().map(|id| self.booking(id)).collect()
    }

    pub fn has_booking_with_status(
        &self,
        customer: &UserId,
        spa: &SpaId,
        status: BookingStatus,
    ) -> TxResult<bool> {
        Ok(self
            .bookings_of_customer_at(customer, spa)?
            .iter()
            .any(|b| b.status == status))
    }

    pub fn has_reviewed(&self, user: &UserId, spa: &SpaId) -> TxResult<bool> {
        Ok(self.tx.get(keys::review_by(user, spa))?.is_some())
    }

    /// Save a new review and mark its (user, spa) pair as used
    pub fn insert_review(&self, review: &Review) -> TxResult<()> {
        self.put(keys::review_by(&review.user, &review.spa), &review.id)?;
        self.put(keys::review(&review.id), review)
    }

    pub fn add_wishlist(&self, user: &UserId, service: &ServiceId) -> TxResult<()> {
        self.put(keys::wishlist(user, service), service)
    }

    pub fn remove_wishlist(&self, user: &UserId, service: &ServiceId) -> TxResult<()> {
        self.tx.remove(keys::wishlist(user, service))?;
        Ok(())
    }
}
