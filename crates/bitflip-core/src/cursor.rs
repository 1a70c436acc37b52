use serde::Serialize;

/// Position of the injector within its error-rate buckets.
///
/// Moves forward one bucket per stop signal and never rewinds; once past the
/// last bucket it stays `Exhausted` until the injector is reconfigured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "bucket", rename_all = "snake_case")]
pub enum Cursor {
    Active(usize),
    Exhausted,
}

impl Cursor {
    pub fn start(bucket_count: usize) -> Self {
        if bucket_count == 0 {
            Cursor::Exhausted
        } else {
            Cursor::Active(0)
        }
    }

    pub fn advance(self, bucket_count: usize) -> Self {
        match self {
            Cursor::Active(i) if i + 1 < bucket_count => Cursor::Active(i + 1),
            _ => Cursor::Exhausted,
        }
    }

    pub fn active(self) -> Option<usize> {
        match self {
            Cursor::Active(i) => Some(i),
            Cursor::Exhausted => None,
        }
    }

    pub fn is_exhausted(self) -> bool {
        self == Cursor::Exhausted
    }
}
