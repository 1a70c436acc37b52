use bitflip_core::{ErrorCode, FlipError};

#[test]
fn error_code_as_str_covers_all_variants() {
    let cases: &[(ErrorCode, &str)] = &[
        (ErrorCode::NoRates, "FLIP_ERR_NO_RATES"),
        (ErrorCode::RateOutOfRange, "FLIP_ERR_RATE_OUT_OF_RANGE"),
        (ErrorCode::CountType, "FLIP_ERR_COUNT_TYPE"),
        (ErrorCode::DurationInvalid, "FLIP_ERR_DURATION_INVALID"),
        (ErrorCode::WidthInvalid, "FLIP_ERR_WIDTH_INVALID"),
        (ErrorCode::NotConfigured, "FLIP_ERR_NOT_CONFIGURED"),
        (ErrorCode::ValueParse, "FLIP_ERR_VALUE_PARSE"),
        (ErrorCode::Render, "FLIP_ERR_RENDER"),
    ];
    for (code, want) in cases {
        assert_eq!(code.as_str(), *want);
    }
}

#[test]
fn flip_error_maps_to_code() {
    let cases: Vec<(FlipError, ErrorCode)> = vec![
        (FlipError::NoRates, ErrorCode::NoRates),
        (
            FlipError::RateOutOfRange {
                index: 1,
                rate: 1.5,
            },
            ErrorCode::RateOutOfRange,
        ),
        (
            FlipError::CountType {
                mode: "iteration".into(),
                expected: "a whole-number",
            },
            ErrorCode::CountType,
        ),
        (FlipError::DurationInvalid(-1.0), ErrorCode::DurationInvalid),
        (FlipError::WidthInvalid(12), ErrorCode::WidthInvalid),
        (FlipError::NotConfigured, ErrorCode::NotConfigured),
        (FlipError::ValueParse("0xzz".into()), ErrorCode::ValueParse),
    ];
    for (err, want) in cases {
        assert_eq!(err.code(), want, "{err}");
    }
}

#[test]
fn flip_error_display() {
    assert_eq!(
        FlipError::RateOutOfRange {
            index: 2,
            rate: 1.5
        }
        .to_string(),
        "error rate #2 is 1.5, expected a value in [0, 1]"
    );
    assert_eq!(
        FlipError::ValueParse("abc".into()).to_string(),
        "cannot parse integer value \"abc\""
    );
}

#[test]
fn render_error_wraps_serde_json() {
    let json_err = serde_json::from_str::<u8>("not json").unwrap_err();
    let err = FlipError::from(json_err);
    assert_eq!(err.code(), ErrorCode::Render);
    assert!(err.to_string().starts_with("render report: "));
}
