//! # Stepwrap
//!
//! Function wrappers for instrumenting data-pipeline steps. Each wrapper
//! takes a callable and returns its value unchanged while adding one
//! side concern:
//!
//! - [`timing`] - logs wall-clock execution time in human-readable form
//! - [`memory`] - logs peak resident memory of the call, children included
//!   (capability-gated; check [`memory_profiling_available`] first)
//! - [`columns`] - adapts a per-scalar function to aligned column-oriented
//!   inputs, with an optional transpose to row-oriented output
//!
//! The wrappers are independent and carry no shared state. None of them
//! intercept failures: a panic or an `Err` from the wrapped function reaches
//! the caller untouched, and nothing is logged for a failed call.
//!
//! ## Example
//!
//! ```
//! use indexmap::IndexMap;
//! use stepwrap::{map_columns, with_timing};
//!
//! let prices = IndexMap::from([("books", 12.5f64), ("games", 40.0)]);
//! let with_tax = with_timing("apply_tax", |columns: IndexMap<&str, f64>| {
//!     map_columns(&[columns], |row| row[0].copied().unwrap_or(0.0) * 1.2)
//! });
//! let taxed = with_tax(prices);
//! assert_eq!(taxed["books"], 15.0);
//! ```

pub mod columns;
pub mod error;
pub mod memory;
pub mod timing;

pub use columns::{
    map_columns, map_columns_wide, rows_from_columns, try_map_columns, try_map_columns_wide,
};
pub use error::{Error, Result};
pub use memory::{memory_profiling_available, MemoryProfiler, SamplerConfig};
pub use timing::{format_elapsed, time_fn, with_timing};
