use bitflip_core::canonical::{check_width, fixed_bytes};
use bitflip_core::{
    parse_value, ByteWidth, FaultInjector, FlipError, InjectorConfig, Injection, RunConfig,
    TestCount, TracingObserver, DEFAULT_WIDTH_BITS,
};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Deserialize)]
struct Request {
    op: String,

    #[serde(default)]
    mode: String,

    #[serde(default)]
    test_count: Option<TestCount>,

    #[serde(default)]
    rates: Vec<f64>,

    #[serde(default)]
    values: Vec<String>,

    #[serde(default)]
    width_bits: Option<u32>,

    #[serde(default)]
    byte_width: ByteWidth,

    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Serialize, Default, Debug)]
struct Response {
    ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    err: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    outcomes: Option<Vec<&'static str>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<serde_json::Value>,
}

impl Response {
    fn fail(err: impl Into<String>) -> Self {
        Response {
            ok: false,
            err: Some(err.into()),
            ..Default::default()
        }
    }
}

fn err_code(e: &FlipError) -> String {
    tracing::warn!(code = e.code().as_str(), "{e}");
    e.code().as_str().to_string()
}

fn hex_value(v: &BigUint) -> String {
    format!("0x{}", v.to_str_radix(16))
}

fn parse_values(values: &[String]) -> Result<Vec<BigUint>, FlipError> {
    values.iter().map(|s| parse_value(s)).collect()
}

fn inject(req: Request) -> Result<Response, FlipError> {
    let Some(test_count) = req.test_count else {
        return Ok(Response::fail("bad request: missing test_count"));
    };
    let values = parse_values(&req.values)?;
    let cfg = InjectorConfig::try_from(RunConfig {
        mode: req.mode,
        test_count,
        rates: req.rates,
        width_bits: req.width_bits.unwrap_or(DEFAULT_WIDTH_BITS),
        byte_width: req.byte_width,
        seed: req.seed,
    })?;

    let mut inj = FaultInjector::new();
    inj.set_observer(TracingObserver);
    inj.configure(cfg)?;

    let mut flips = 0u64;
    let mut out_values = Vec::with_capacity(values.len());
    let mut outcomes = Vec::with_capacity(values.len());
    for v in &values {
        let out = inj.inject(v, &mut flips)?;
        if matches!(out, Injection::Stopped { .. }) {
            flips = 0;
        }
        outcomes.push(out.as_str());
        out_values.push(hex_value(out.value()));
    }

    Ok(Response {
        ok: true,
        values: Some(out_values),
        outcomes: Some(outcomes),
        report: Some(inj.report()?.to_value()?),
        ..Default::default()
    })
}

fn canonicalize(req: Request) -> Result<Response, FlipError> {
    let width_bits = req.width_bits.unwrap_or(DEFAULT_WIDTH_BITS);
    check_width(width_bits)?;
    let values = parse_values(&req.values)?;
    Ok(Response {
        ok: true,
        values: Some(
            values
                .iter()
                .map(|v| hex::encode(fixed_bytes(v, width_bits)))
                .collect(),
        ),
        ..Default::default()
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let req: Request = match serde_json::from_reader(std::io::stdin()) {
        Ok(v) => v,
        Err(e) => {
            let resp = Response::fail(format!("bad request: {e}"));
            let _ = serde_json::to_writer(std::io::stdout(), &resp);
            return;
        }
    };

    let result = match req.op.as_str() {
        "inject" => inject(req),
        "canonicalize" => canonicalize(req),
        _ => Ok(Response::fail("unknown op")),
    };
    let resp = match result {
        Ok(r) => r,
        Err(e) => Response::fail(err_code(&e)),
    };
    let _ = serde_json::to_writer(std::io::stdout(), &resp);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> Request {
        serde_json::from_str(json).expect("request")
    }

    #[test]
    fn inject_resets_flip_count_between_buckets() {
        let req = request(
            r#"{"op":"inject","mode":"iteration","test_count":8,"rates":[1.0,1.0],
                "seed":3,"values":["0xab","0xab","0xab","0xab","0xab"]}"#,
        );
        let resp = inject(req).unwrap();

        assert!(resp.ok);
        assert_eq!(
            resp.outcomes.unwrap(),
            vec!["injected", "stopped", "injected", "stopped", "exhausted"]
        );
        assert_eq!(
            resp.values.unwrap(),
            vec!["0x54", "0xab", "0x54", "0xab", "0xab"]
        );
        let report = resp.report.unwrap();
        assert_eq!(report["seed"], 3);
    }

    #[test]
    fn inject_without_test_count_is_a_bad_request() {
        let resp = inject(request(r#"{"op":"inject","mode":"time","rates":[0.5]}"#)).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.err.as_deref(), Some("bad request: missing test_count"));
    }

    #[test]
    fn inject_rejects_unparsable_value() {
        let req = request(
            r#"{"op":"inject","mode":"iteration","test_count":1,"rates":[0.5],"values":["0xzz"]}"#,
        );
        let err = inject(req).unwrap_err();
        assert_eq!(err_code(&err), "FLIP_ERR_VALUE_PARSE");
    }

    #[test]
    fn canonicalize_rejects_oversized_width() {
        let req = request(r#"{"op":"canonicalize","width_bits":8192,"values":["1"]}"#);
        let err = canonicalize(req).unwrap_err();
        assert_eq!(err_code(&err), "FLIP_ERR_WIDTH_INVALID");
    }
}
