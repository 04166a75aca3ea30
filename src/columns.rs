//! Row/column shape adaptation for per-scalar functions
//!
//! Column-oriented data is a mapping whose values line up by key across
//! parallel inputs; row-oriented data is one mapping per record. The adapters
//! here lift a function over single values into one applied once per key
//! across a set of aligned column inputs, reassembling the per-key results
//! either as a single mapping or, for fixed-width results, as one mapping per
//! result slot.
//!
//! The key set and its order come from the first input mapping. Later inputs
//! are not required to cover every key: a missing key surfaces to the wrapped
//! function as `None` rather than an error, and the function decides what an
//! absent value means.

use std::convert::Infallible;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use indexmap::IndexMap;
use tracing::info;

/// Apply `f` once per key across aligned column `inputs`, collecting scalar
/// results into a mapping that preserves the first input's key order.
///
/// `f` receives one `Option<&V>` per input mapping, in input order.
pub fn map_columns<K, V, R, F>(inputs: &[IndexMap<K, V>], mut f: F) -> IndexMap<K, R>
where
    K: Hash + Eq + Clone + Display,
    R: Debug,
    F: FnMut(&[Option<&V>]) -> R,
{
    match try_map_columns(inputs, |row| Ok::<_, Infallible>(f(row))) {
        Ok(out) => out,
        Err(never) => match never {},
    }
}

/// Fallible form of [`map_columns`]: the first `Err` from `f` aborts the
/// iteration and is returned unchanged, with no partial output.
pub fn try_map_columns<K, V, R, E, F>(
    inputs: &[IndexMap<K, V>],
    mut f: F,
) -> Result<IndexMap<K, R>, E>
where
    K: Hash + Eq + Clone + Display,
    R: Debug,
    F: FnMut(&[Option<&V>]) -> Result<R, E>,
{
    let mut out = IndexMap::new();
    let Some(first) = inputs.first() else {
        return Ok(out);
    };

    let mut row = Vec::with_capacity(inputs.len());
    for key in first.keys() {
        row.clear();
        row.extend(inputs.iter().map(|input| input.get(key)));
        let result = f(&row)?;
        info!("{key}: {result:?}");
        out.insert(key.clone(), result);
    }
    Ok(out)
}

/// Apply `f` once per key across aligned column `inputs`, transposing the
/// fixed-width per-key results into one mapping per result slot.
///
/// The width `N` is declared by the caller through the result array type, so
/// every key contributes exactly `N` values by construction. Output position
/// `i` maps each key to slot `i` of that key's result; every output mapping
/// keeps the first input's key order.
pub fn map_columns_wide<const N: usize, K, V, R, F>(
    inputs: &[IndexMap<K, V>],
    mut f: F,
) -> [IndexMap<K, R>; N]
where
    K: Hash + Eq + Clone + Display,
    R: Debug,
    F: FnMut(&[Option<&V>]) -> [R; N],
{
    match try_map_columns_wide(inputs, |row| Ok::<_, Infallible>(f(row))) {
        Ok(out) => out,
        Err(never) => match never {},
    }
}

/// Fallible form of [`map_columns_wide`], with the same abort semantics as
/// [`try_map_columns`].
pub fn try_map_columns_wide<const N: usize, K, V, R, E, F>(
    inputs: &[IndexMap<K, V>],
    mut f: F,
) -> Result<[IndexMap<K, R>; N], E>
where
    K: Hash + Eq + Clone + Display,
    R: Debug,
    F: FnMut(&[Option<&V>]) -> Result<[R; N], E>,
{
    let mut out: [IndexMap<K, R>; N] = std::array::from_fn(|_| IndexMap::new());
    let Some(first) = inputs.first() else {
        return Ok(out);
    };

    let mut row = Vec::with_capacity(inputs.len());
    for key in first.keys() {
        row.clear();
        row.extend(inputs.iter().map(|input| input.get(key)));
        let result = f(&row)?;
        info!("{key}: {result:?}");
        for (slot, value) in out.iter_mut().zip(result) {
            slot.insert(key.clone(), value);
        }
    }
    Ok(out)
}

/// Transpose column-oriented data (key to parallel values) into row-oriented
/// data (one mapping per record).
///
/// The row count is the shortest column's length; longer columns are
/// truncated, mirroring a zip.
pub fn rows_from_columns<K, V>(columns: IndexMap<K, Vec<V>>) -> Vec<IndexMap<K, V>>
where
    K: Hash + Eq + Clone,
{
    let row_count = columns.values().map(Vec::len).min().unwrap_or(0);
    let mut rows: Vec<IndexMap<K, V>> = (0..row_count)
        .map(|_| IndexMap::with_capacity(columns.len()))
        .collect();

    for (key, values) in columns {
        for (row, value) in rows.iter_mut().zip(values) {
            row.insert(key.clone(), value);
        }
    }
    rows
}
