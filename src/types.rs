//! Identifiers, instants and monetary values shared by every record
use super::error::{EngineError, Result};
use super::utils::{new_uuid_to_bech32, ordered_nanos};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::prelude::*;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $hrp:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $hrp;

            /// Mint a fresh time-ordered id
            pub fn generate() -> Result<Self> {
                new_uuid_to_bech32($hrp)
                    .map(Self)
                    .map_err(|e| EngineError::IdGeneration(e.to_string()))
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl<C> minicbor::Encode<C> for $name {
            fn encode<W: minicbor::encode::Write>(
                &self,
                e: &mut minicbor::Encoder<W>,
                _: &mut C,
            ) -> std::result::Result<(), minicbor::encode::Error<W::Error>> {
                e.str(&self.0)?.ok()
            }
        }

        impl<'b, C> minicbor::Decode<'b, C> for $name {
            fn decode(
                d: &mut minicbor::Decoder<'b>,
                _: &mut C,
            ) -> std::result::Result<Self, minicbor::decode::Error> {
                Ok(Self(d.str()?.to_owned()))
            }
        }
    };
}

entity_id!(UserId, "user_");
entity_id!(MembershipId, "mbr_");
entity_id!(SpaId, "spa_");
entity_id!(
    /// Id of a treatment offered by a spa
    ServiceId,
    "svc_"
);
entity_id!(BookingId, "bkg_");
entity_id!(ReviewId, "rev_");

/// An instant in UTC, stored as nanoseconds since the epoch
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct TimeStamp(DateTime<Utc>);

impl TimeStamp {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    /// `None` when the calendar values do not name a real instant
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
    }
    /// Midnight UTC at the start of `date`
    pub fn start_of(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
    pub fn is_future(&self) -> bool {
        self.0 > Utc::now()
    }
    /// Sortable encoding used as part of storage index keys. Fails for
    /// instants outside the nanosecond range (before 1677 or after 2262).
    pub fn index_bytes(&self) -> Result<[u8; 8]> {
        self.0
            .timestamp_nanos_opt()
            .map(ordered_nanos)
            .ok_or_else(|| {
                EngineError::InvalidArgument(format!("instant {} is out of range", self.0))
            })
    }
}

impl Default for TimeStamp {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DateTime<Utc>> for TimeStamp {
    fn from(value: DateTime<Utc>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> std::result::Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> std::result::Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

const DECIMAL_PLACES: u32 = 2;

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

// Decimal values are persisted as integer hundredths
fn encode_hundredths<W: minicbor::encode::Write>(
    value: Decimal,
    e: &mut minicbor::Encoder<W>,
) -> std::result::Result<(), minicbor::encode::Error<W::Error>> {
    match (round_money(value) * Decimal::ONE_HUNDRED).to_i64() {
        Some(hundredths) => e.i64(hundredths)?.ok(),
        None => Err(minicbor::encode::Error::message(
            "decimal value does not fit in i64 hundredths",
        )),
    }
}

fn decode_hundredths(d: &mut minicbor::Decoder<'_>) -> std::result::Result<Decimal, minicbor::decode::Error> {
    Ok(Decimal::new(d.i64()?, DECIMAL_PLACES))
}

/// A monetary amount with two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(round_money(amount))
    }
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, DECIMAL_PLACES))
    }
    pub fn amount(&self) -> Decimal {
        self.0
    }
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut value = self.0;
        value.rescale(DECIMAL_PLACES);
        write!(f, "{value}")
    }
}

impl<C> minicbor::Encode<C> for Money {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> std::result::Result<(), minicbor::encode::Error<W::Error>> {
        encode_hundredths(self.0, e)
    }
}

impl<'b, C> minicbor::Decode<'b, C> for Money {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> std::result::Result<Self, minicbor::decode::Error> {
        decode_hundredths(d).map(Money)
    }
}

/// A percentage in the closed range 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage(Decimal);

impl Percentage {
    pub fn new(value: Decimal) -> Option<Self> {
        let value = round_money(value);
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return None;
        }
        Some(Self(value))
    }
    pub fn value(&self) -> Decimal {
        self.0
    }
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl<C> minicbor::Encode<C> for Percentage {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> std::result::Result<(), minicbor::encode::Error<W::Error>> {
        encode_hundredths(self.0, e)
    }
}

impl<'b, C> minicbor::Decode<'b, C> for Percentage {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> std::result::Result<Self, minicbor::decode::Error> {
        let value = decode_hundredths(d)?;
        Percentage::new(value).ok_or(minicbor::decode::Error::message(
            "stored percentage outside 0..=100",
        ))
    }
}
