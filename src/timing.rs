//! Wall-clock timing for pipeline steps
//!
//! Measures how long a step takes and logs it in human-readable form
//! alongside the raw seconds. Timing is recorded only on the normal-return
//! path; panics unwind through without a record.

use std::time::{Duration, Instant};

use tracing::info;

/// Format an elapsed duration in human-readable form.
///
/// Picks the coarsest unit that fits: hours (`1h01m01s`), minutes (`1m05s`),
/// seconds with two decimals (`1.00s`), or whole milliseconds (`400ms`).
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();

    if total_secs >= 3600 {
        let hours = total_secs / 3600;
        let mins = (total_secs % 3600) / 60;
        let secs = total_secs % 60;
        format!("{hours}h{mins:02}m{secs:02}s")
    } else if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{mins}m{secs:02}s")
    } else if elapsed.as_secs_f64() >= 1.0 {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else {
        format!("{:.0}ms", elapsed.as_secs_f64() * 1000.0)
    }
}

/// Run `f`, logging the wall-clock time it took under `name`.
///
/// Returns `f`'s value unchanged. No exception handling is performed: if `f`
/// panics the panic propagates and nothing is logged.
pub fn time_fn<T, F: FnOnce() -> T>(name: &str, f: F) -> T {
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    info!(
        "Running {name:?} took {} [{:.3}s]",
        format_elapsed(elapsed),
        elapsed.as_secs_f64()
    );
    result
}

/// Wrap `f` so that every call is timed and logged under `name`.
///
/// The returned closure has the same signature and return value as `f`;
/// multi-argument functions are wrapped by taking their arguments as a tuple.
pub fn with_timing<A, T, F>(name: impl Into<String>, f: F) -> impl Fn(A) -> T
where
    F: Fn(A) -> T,
{
    let name = name.into();
    move |input| time_fn(&name, || f(input))
}
