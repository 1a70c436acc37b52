#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    NoRates,
    RateOutOfRange,
    CountType,
    DurationInvalid,
    WidthInvalid,
    NotConfigured,
    ValueParse,
    Render,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NoRates => "FLIP_ERR_NO_RATES",
            ErrorCode::RateOutOfRange => "FLIP_ERR_RATE_OUT_OF_RANGE",
            ErrorCode::CountType => "FLIP_ERR_COUNT_TYPE",
            ErrorCode::DurationInvalid => "FLIP_ERR_DURATION_INVALID",
            ErrorCode::WidthInvalid => "FLIP_ERR_WIDTH_INVALID",
            ErrorCode::NotConfigured => "FLIP_ERR_NOT_CONFIGURED",
            ErrorCode::ValueParse => "FLIP_ERR_VALUE_PARSE",
            ErrorCode::Render => "FLIP_ERR_RENDER",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlipError {
    #[error("at least one error rate is required")]
    NoRates,
    #[error("error rate #{index} is {rate}, expected a value in [0, 1]")]
    RateOutOfRange { index: usize, rate: f64 },
    #[error("mode {mode:?} needs {expected} test count")]
    CountType {
        mode: String,
        expected: &'static str,
    },
    #[error("time limit must be a finite, non-negative number of seconds (got {0})")]
    DurationInvalid(f64),
    #[error("canonical width must be a non-zero multiple of 8 bits, at most 4096 (got {0})")]
    WidthInvalid(u32),
    #[error("injector used before configure")]
    NotConfigured,
    #[error("cannot parse integer value {0:?}")]
    ValueParse(String),
    #[error("render report: {0}")]
    Render(#[from] serde_json::Error),
}

impl FlipError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FlipError::NoRates => ErrorCode::NoRates,
            FlipError::RateOutOfRange { .. } => ErrorCode::RateOutOfRange,
            FlipError::CountType { .. } => ErrorCode::CountType,
            FlipError::DurationInvalid(_) => ErrorCode::DurationInvalid,
            FlipError::WidthInvalid(_) => ErrorCode::WidthInvalid,
            FlipError::NotConfigured => ErrorCode::NotConfigured,
            FlipError::ValueParse(_) => ErrorCode::ValueParse,
            FlipError::Render(_) => ErrorCode::Render,
        }
    }
}
