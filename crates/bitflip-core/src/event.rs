use core::fmt::Display;

use chrono::{DateTime, Local};
use num_bigint::{BigInt, BigUint};
use serde::{Serialize, Serializer};

pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y-%H:%M:%S%.9f";

fn as_decimal<T: Display, S: Serializer>(v: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(v)
}

fn as_hex<S: Serializer>(b: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode(b))
}

fn as_timestamp<S: Serializer>(t: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&t.format(TIMESTAMP_FORMAT))
}

/// One injection call against an active bucket.
///
/// `before` is the canonical value; `before_bytes` its serialization.
/// `after_bytes` is the mutated candidate buffer exactly as flipped, so it can
/// carry leading zero bytes that `after` no longer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlipEvent {
    /// Running flip count after this call.
    pub iteration: u64,

    #[serde(serialize_with = "as_decimal")]
    pub before: BigUint,

    #[serde(serialize_with = "as_hex")]
    pub before_bytes: Vec<u8>,

    pub flipped_bits: Vec<usize>,

    #[serde(serialize_with = "as_decimal")]
    pub after: BigUint,

    #[serde(serialize_with = "as_hex")]
    pub after_bytes: Vec<u8>,

    /// `after - before`.
    #[serde(serialize_with = "as_decimal")]
    pub delta: BigInt,

    #[serde(serialize_with = "as_timestamp")]
    pub timestamp: DateTime<Local>,
}

impl FlipEvent {
    pub fn flip_count(&self) -> usize {
        self.flipped_bits.len()
    }

    pub fn before_hex(&self) -> String {
        hex::encode(&self.before_bytes)
    }

    pub fn after_hex(&self) -> String {
        hex::encode(&self.after_bytes)
    }

    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Events recorded while one error rate was active. Append-only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorRateBucket {
    rate: f64,
    events: Vec<FlipEvent>,
}

impl ErrorRateBucket {
    pub(crate) fn new(rate: f64) -> Self {
        Self {
            rate,
            events: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, event: FlipEvent) {
        self.events.push(event);
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn events(&self) -> &[FlipEvent] {
        &self.events
    }

    pub fn total_flips(&self) -> usize {
        self.events.iter().map(FlipEvent::flip_count).sum()
    }
}
