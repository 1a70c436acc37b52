use crate::event::FlipEvent;

/// Receives every event right after it is appended to its bucket.
pub trait FlipObserver {
    fn on_flip(&mut self, bucket: usize, rate: f64, event: &FlipEvent);
}

impl<F> FlipObserver for F
where
    F: FnMut(usize, f64, &FlipEvent),
{
    fn on_flip(&mut self, bucket: usize, rate: f64, event: &FlipEvent) {
        self(bucket, rate, event)
    }
}

/// Emits each event as a structured `tracing` record at INFO.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl FlipObserver for TracingObserver {
    fn on_flip(&mut self, bucket: usize, rate: f64, event: &FlipEvent) {
        tracing::info!(
            bucket,
            rate,
            iteration = event.iteration,
            flipped = ?event.flipped_bits,
            before = %event.before_hex(),
            after = %event.after_hex(),
            delta = %event.delta,
            when = %event.timestamp_string(),
            "bit flip"
        );
    }
}
