use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::canonical::{check_width, DEFAULT_WIDTH_BITS};
use crate::error::FlipError;

/// When the active error-rate bucket stops accepting injections.
///
/// Every limit is measured per bucket: the running flip count is threaded by
/// the caller and reset by it after each stop, while the variable counter and
/// the time window restart whenever the cursor advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopPolicy {
    /// Stop once the running flip count reaches the limit.
    IterationLimit(u64),
    /// Stop once this many values have been processed.
    VariableLimit(u64),
    /// Stop once the bucket's window has been open for this long.
    TimeLimit(Duration),
}

impl StopPolicy {
    /// Maps the loosely-typed `(mode, count)` pair onto a policy.
    ///
    /// `"iteration"` and `"variable"` take a whole count. Everything else,
    /// including unknown mode strings, selects the time policy; an integer
    /// count is then read as whole seconds.
    pub fn from_mode(mode: &str, count: TestCount) -> Result<Self, FlipError> {
        match mode {
            "iteration" => Ok(StopPolicy::IterationLimit(whole_count(mode, count)?)),
            "variable" => Ok(StopPolicy::VariableLimit(whole_count(mode, count)?)),
            other => {
                if other != "time" {
                    tracing::warn!(mode = other, "unrecognized stopping mode, using time limit");
                }
                let secs = match count {
                    TestCount::Count(n) => n as f64,
                    TestCount::Seconds(s) => s,
                };
                Duration::try_from_secs_f64(secs)
                    .map(StopPolicy::TimeLimit)
                    .map_err(|_| FlipError::DurationInvalid(secs))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StopPolicy::IterationLimit(_) => "iteration",
            StopPolicy::VariableLimit(_) => "variable",
            StopPolicy::TimeLimit(_) => "time",
        }
    }
}

fn whole_count(mode: &str, count: TestCount) -> Result<u64, FlipError> {
    match count {
        TestCount::Count(n) => Ok(n),
        TestCount::Seconds(_) => Err(FlipError::CountType {
            mode: mode.to_string(),
            expected: "a whole-number",
        }),
    }
}

/// Test count as it arrives from outside: an integer for the count-based
/// modes, seconds for the time mode.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TestCount {
    Count(u64),
    Seconds(f64),
}

/// Which byte serialization supplies the candidate bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteWidth {
    /// Minimal big-endian bytes of the current value. The after value is
    /// reassembled as-is, so leading bytes cleared by a flip drop out of the
    /// candidate set on the next call.
    #[default]
    Minimal,
    /// Canonical value zero-padded to the full width. Every bit of the width
    /// is a candidate on every call and the after value always fits it.
    Fixed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InjectorConfig {
    pub policy: StopPolicy,
    pub rates: Vec<f64>,
    pub width_bits: u32,
    pub byte_width: ByteWidth,
    pub seed: Option<u64>,
}

impl InjectorConfig {
    pub fn new(policy: StopPolicy, rates: Vec<f64>) -> Self {
        Self {
            policy,
            rates,
            width_bits: DEFAULT_WIDTH_BITS,
            byte_width: ByteWidth::default(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_width_bits(mut self, width_bits: u32) -> Self {
        self.width_bits = width_bits;
        self
    }

    pub fn with_byte_width(mut self, byte_width: ByteWidth) -> Self {
        self.byte_width = byte_width;
        self
    }

    pub fn validate(&self) -> Result<(), FlipError> {
        if self.rates.is_empty() {
            return Err(FlipError::NoRates);
        }
        for (index, &rate) in self.rates.iter().enumerate() {
            if !(0.0..=1.0).contains(&rate) {
                return Err(FlipError::RateOutOfRange { index, rate });
            }
        }
        check_width(self.width_bits)
    }
}

fn default_width_bits() -> u32 {
    DEFAULT_WIDTH_BITS
}

/// Serialized run configuration, as accepted by the CLI driver.
#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    pub mode: String,
    pub test_count: TestCount,
    pub rates: Vec<f64>,

    #[serde(default = "default_width_bits")]
    pub width_bits: u32,

    #[serde(default)]
    pub byte_width: ByteWidth,

    #[serde(default)]
    pub seed: Option<u64>,
}

impl TryFrom<RunConfig> for InjectorConfig {
    type Error = FlipError;

    fn try_from(rc: RunConfig) -> Result<Self, Self::Error> {
        let cfg = InjectorConfig {
            policy: StopPolicy::from_mode(&rc.mode, rc.test_count)?,
            rates: rc.rates,
            width_bits: rc.width_bits,
            byte_width: rc.byte_width,
            seed: rc.seed,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
