//! Integration tests for composing the step wrappers
//!
//! Exercises the wrappers the way a pipeline would use them: timing around a
//! column-adapted function, memory profiling around real work, and the
//! wrappers stacked on one another.

use std::sync::Once;
use std::time::Duration;

use indexmap::IndexMap;
use stepwrap::{
    map_columns, map_columns_wide, memory_profiling_available, time_fn, try_map_columns,
    with_timing, MemoryProfiler, SamplerConfig,
};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

#[test]
fn test_timed_column_adapter_pipeline_step() {
    init_tracing();

    let step = with_timing("normalize", |columns: IndexMap<String, i64>| {
        map_columns(&[columns], |row| row[0].copied().unwrap_or(0) * 2)
    });

    let input = IndexMap::from([("a".to_string(), 1i64), ("b".to_string(), 2)]);
    let output = step(input);
    assert_eq!(
        output,
        IndexMap::from([("a".to_string(), 2i64), ("b".to_string(), 4)])
    );
}

#[test]
fn test_wide_adapter_splits_into_aligned_outputs() {
    init_tracing();

    let input = IndexMap::from([("a".to_string(), 1i64), ("b".to_string(), 2)]);
    let [original, doubled] = time_fn("split", || {
        map_columns_wide(&[input], |row| {
            let x = row[0].copied().unwrap_or(0);
            [x, x * 2]
        })
    });

    assert_eq!(
        original,
        IndexMap::from([("a".to_string(), 1i64), ("b".to_string(), 2)])
    );
    assert_eq!(
        doubled,
        IndexMap::from([("a".to_string(), 2i64), ("b".to_string(), 4)])
    );
}

#[test]
fn test_failing_step_leaves_no_partial_output() {
    init_tracing();

    let input = IndexMap::from([("a".to_string(), -1i64), ("b".to_string(), 2)]);
    let result: Result<IndexMap<String, i64>, String> = time_fn("validate", || {
        try_map_columns(&[input], |row| {
            let x = row[0].copied().unwrap_or(0);
            if x < 0 {
                Err(format!("negative value {x}"))
            } else {
                Ok(x)
            }
        })
    });

    assert_eq!(result, Err("negative value -1".to_string()));
}

#[test]
fn test_memory_profiled_step_returns_result() {
    init_tracing();
    if !memory_profiling_available() {
        return;
    }

    let profiler = MemoryProfiler::with_config(SamplerConfig {
        interval: Duration::from_millis(10),
        ..SamplerConfig::default()
    })
    .expect("profiling available");

    let columns = IndexMap::from([("x".to_string(), 3i64), ("y".to_string(), 4)]);
    let squared = profiler.measure("square", || {
        map_columns(&[columns], |row| {
            let v = row[0].copied().unwrap_or(0);
            v * v
        })
    });

    assert_eq!(
        squared,
        IndexMap::from([("x".to_string(), 9i64), ("y".to_string(), 16)])
    );
}
