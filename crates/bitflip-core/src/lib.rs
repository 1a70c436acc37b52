pub mod canonical;
pub mod config;
pub mod cursor;
pub mod error;
pub mod event;
pub mod flip;
mod injector;
pub mod observer;
mod report;

pub use canonical::{canonicalize, parse_value, DEFAULT_WIDTH_BITS, MAX_WIDTH_BITS};
pub use config::{ByteWidth, InjectorConfig, RunConfig, StopPolicy, TestCount};
pub use cursor::Cursor;
pub use error::{ErrorCode, FlipError};
pub use event::{ErrorRateBucket, FlipEvent, TIMESTAMP_FORMAT};
pub use injector::{FaultInjector, Injection};
pub use observer::{FlipObserver, TracingObserver};
pub use report::Report;
