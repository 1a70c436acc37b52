use std::time::Instant;

use chrono::Local;
use num_bigint::{BigInt, BigUint};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::canonical::{canonicalize, fixed_bytes, from_bytes, minimal_bytes};
use crate::config::{ByteWidth, InjectorConfig, StopPolicy};
use crate::cursor::Cursor;
use crate::error::FlipError;
use crate::event::{ErrorRateBucket, FlipEvent};
use crate::flip::flip_bits;
use crate::observer::FlipObserver;
use crate::report::Report;

/// Outcome of a single [`FaultInjector::inject`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum Injection {
    /// The active bucket ran its trials. The event may list zero flipped bits.
    Injected { value: BigUint, event: FlipEvent },
    /// The stopping policy fired; the value is returned untouched and the
    /// cursor moved on. `next_bucket` is `None` when that was the last bucket.
    Stopped {
        value: BigUint,
        next_bucket: Option<usize>,
    },
    /// Every bucket is done; the value is returned untouched.
    Exhausted { value: BigUint },
}

impl Injection {
    pub fn value(&self) -> &BigUint {
        match self {
            Injection::Injected { value, .. }
            | Injection::Stopped { value, .. }
            | Injection::Exhausted { value } => value,
        }
    }

    pub fn into_value(self) -> BigUint {
        match self {
            Injection::Injected { value, .. }
            | Injection::Stopped { value, .. }
            | Injection::Exhausted { value } => value,
        }
    }

    pub fn event(&self) -> Option<&FlipEvent> {
        match self {
            Injection::Injected { event, .. } => Some(event),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Injection::Injected { .. } => "injected",
            Injection::Stopped { .. } => "stopped",
            Injection::Exhausted { .. } => "exhausted",
        }
    }
}

struct Run {
    policy: StopPolicy,
    width_bits: u32,
    byte_width: ByteWidth,
    seed: u64,
    rng: ChaCha8Rng,
    buckets: Vec<ErrorRateBucket>,
    cursor: Cursor,
    window_start: Instant,
    variables: u64,
}

impl Run {
    fn should_stop(&self, flips: u64) -> bool {
        match self.policy {
            StopPolicy::IterationLimit(limit) => flips >= limit,
            StopPolicy::VariableLimit(limit) => self.variables >= limit,
            StopPolicy::TimeLimit(limit) => self.window_start.elapsed() >= limit,
        }
    }

    fn advance(&mut self) -> Cursor {
        self.cursor = self.cursor.advance(self.buckets.len());
        self.window_start = Instant::now();
        self.variables = 0;
        self.cursor
    }

    /// Returns the (mutable candidate buffer, before snapshot) pair.
    fn snapshot(&self, value: &BigUint, before: &BigUint) -> (Vec<u8>, Vec<u8>) {
        match self.byte_width {
            ByteWidth::Minimal => (minimal_bytes(value), minimal_bytes(before)),
            ByteWidth::Fixed => {
                let b = fixed_bytes(value, self.width_bits);
                (b.clone(), b)
            }
        }
    }
}

/// Probabilistic single-bit fault generator over arbitrary-precision integers.
///
/// One configured run owns a bucket per error rate and a cursor over them.
/// Each [`inject`](Self::inject) call either runs the active bucket's
/// per-bit trials on the value, or, once the stopping policy fires, passes
/// the value through and moves to the next bucket.
///
/// ```
/// use bitflip_core::{FaultInjector, InjectorConfig, Injection, StopPolicy};
/// use num_bigint::BigUint;
///
/// let mut inj = FaultInjector::new();
/// inj.configure(InjectorConfig::new(StopPolicy::IterationLimit(4), vec![1.0]).with_seed(1))
///     .unwrap();
///
/// let mut flips = 0;
/// let out = inj.inject(&BigUint::from(0x0fu8), &mut flips).unwrap();
/// assert_eq!(out.value(), &BigUint::from(0xf0u8));
/// assert_eq!(flips, 8);
///
/// let out = inj.inject(out.value(), &mut flips).unwrap();
/// assert!(matches!(out, Injection::Stopped { next_bucket: None, .. }));
/// ```
#[derive(Default)]
pub struct FaultInjector {
    run: Option<Run>,
    observer: Option<Box<dyn FlipObserver>>,
}

impl FaultInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InjectorConfig) -> Result<Self, FlipError> {
        let mut inj = Self::new();
        inj.configure(config)?;
        Ok(inj)
    }

    /// Starts a fresh run, discarding any previous buckets.
    ///
    /// The random source is seeded exactly once here, from `config.seed` when
    /// given. On error the previous run (if any) is left untouched.
    pub fn configure(&mut self, config: InjectorConfig) -> Result<(), FlipError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let buckets: Vec<ErrorRateBucket> =
            config.rates.iter().copied().map(ErrorRateBucket::new).collect();

        tracing::info!(
            mode = config.policy.as_str(),
            policy = ?config.policy,
            rates = ?config.rates,
            width_bits = config.width_bits,
            byte_width = ?config.byte_width,
            seed,
            "fault injector configured"
        );

        self.run = Some(Run {
            policy: config.policy,
            width_bits: config.width_bits,
            byte_width: config.byte_width,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            cursor: Cursor::start(buckets.len()),
            buckets,
            window_start: Instant::now(),
            variables: 0,
        });
        Ok(())
    }

    pub fn set_observer<O: FlipObserver + 'static>(&mut self, observer: O) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Runs one injection call.
    ///
    /// `flips` is the caller's running flip count for the active bucket: it
    /// feeds the iteration policy and is incremented by the number of bits
    /// flipped. Resetting it after a [`Injection::Stopped`] is up to the
    /// caller.
    pub fn inject(&mut self, value: &BigUint, flips: &mut u64) -> Result<Injection, FlipError> {
        let run = self.run.as_mut().ok_or(FlipError::NotConfigured)?;

        let Some(idx) = run.cursor.active() else {
            return Ok(Injection::Exhausted {
                value: value.clone(),
            });
        };

        if run.should_stop(*flips) {
            let next = run.advance();
            match next {
                Cursor::Active(n) => {
                    tracing::debug!(from = idx, to = n, flips = *flips, "error rate bucket done")
                }
                Cursor::Exhausted => {
                    tracing::debug!(from = idx, flips = *flips, "all error rate buckets done")
                }
            }
            return Ok(Injection::Stopped {
                value: value.clone(),
                next_bucket: next.active(),
            });
        }

        let rate = run.buckets[idx].rate();
        let before = canonicalize(value, run.width_bits);
        let (mut bytes, before_bytes) = run.snapshot(value, &before);

        let flipped = flip_bits(&mut bytes, rate, &mut run.rng);

        // Reassembled from the flipped buffer as-is; no re-canonicalization.
        let after = from_bytes(&bytes);

        *flips = flips.saturating_add(flipped.len() as u64);
        run.variables = run.variables.saturating_add(1);

        let delta = BigInt::from(after.clone()) - BigInt::from(before.clone());
        let event = FlipEvent {
            iteration: *flips,
            before,
            before_bytes,
            flipped_bits: flipped,
            after: after.clone(),
            after_bytes: bytes,
            delta,
            timestamp: Local::now(),
        };

        run.buckets[idx].push(event.clone());
        if let Some(obs) = self.observer.as_mut() {
            obs.on_flip(idx, rate, &event);
        }

        Ok(Injection::Injected {
            value: after,
            event,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.run.is_some()
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.run.as_ref().map(|r| r.cursor)
    }

    pub fn policy(&self) -> Option<StopPolicy> {
        self.run.as_ref().map(|r| r.policy)
    }

    pub fn seed(&self) -> Option<u64> {
        self.run.as_ref().map(|r| r.seed)
    }

    pub fn active_rate(&self) -> Option<f64> {
        let run = self.run.as_ref()?;
        run.cursor.active().map(|i| run.buckets[i].rate())
    }

    pub fn buckets(&self) -> &[ErrorRateBucket] {
        match &self.run {
            Some(r) => &r.buckets,
            None => &[],
        }
    }

    pub fn report(&self) -> Result<Report<'_>, FlipError> {
        let run = self.run.as_ref().ok_or(FlipError::NotConfigured)?;
        Ok(Report {
            mode: run.policy.as_str(),
            seed: run.seed,
            width_bits: run.width_bits,
            cursor: run.cursor,
            buckets: &run.buckets,
        })
    }

    pub fn render(&self) -> Result<String, FlipError> {
        self.report()?.render()
    }
}
