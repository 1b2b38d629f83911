//! Seeded stratified holdout splitting over row positions.
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::{OracleError, Result};

use std::collections::BTreeMap;


/// Split the row positions `0..labels.len()` into a train part
/// and a test part that hold each class in the same proportion.
///
/// The test part gets `ceil(test_size * n)` rows, which are
/// distributed over the classes by the largest-remainder rule.
/// `test_size` must lie in `(0, 1)`.
/// The same `labels`, `test_size` and `seed`
/// always produce the same partition.
pub fn stratified_split<T>(labels: &[T], test_size: f64, seed: u64)
    -> Result<(Vec<usize>, Vec<usize>)>
    where T: Ord,
{
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(OracleError::invalid(format!(
            "test size must lie in (0, 1) for a stratified split, got {test_size}"
        )));
    }

    let size = labels.len();
    if size == 0 {
        return Err(OracleError::invalid("cannot split an empty dataset"));
    }


    let mut classes: BTreeMap<&T, Vec<usize>> = BTreeMap::new();
    for (i, label) in labels.iter().enumerate() {
        classes.entry(label).or_default().push(i);
    }


    let n_test = (test_size * size as f64).ceil() as usize;
    let n_train = size - n_test;
    let n_classes = classes.len();

    if let Some(smallest) = classes.values().map(Vec::len).min() {
        if smallest < 2 {
            return Err(OracleError::invalid(
                "the least populated class has only 1 member, \
                 which is too few to stratify"
            ));
        }
    }
    if n_train < n_classes || n_test < n_classes {
        return Err(OracleError::invalid(format!(
            "{n_train} train and {n_test} test rows cannot hold \
             all {n_classes} classes"
        )));
    }


    let counts = classes.values()
        .map(Vec::len)
        .collect::<Vec<_>>();
    let test_counts = allocate(&counts, n_test);


    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);
    for (mut rows, k) in classes.into_values().zip(test_counts) {
        rows.shuffle(&mut rng);
        test.extend_from_slice(&rows[..k]);
        train.extend_from_slice(&rows[k..]);
    }

    // Interleave the classes.
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    Ok((train, test))
}


/// Distribute `total` draws over classes of the given sizes,
/// proportional to class size.
/// Leftover draws go to the largest fractional parts,
/// ties to the earlier class.
fn allocate(counts: &[usize], total: usize) -> Vec<usize> {
    let size = counts.iter().sum::<usize>() as f64;

    let quotas = counts.iter()
        .map(|&c| c as f64 * total as f64 / size)
        .collect::<Vec<_>>();

    let mut alloc = quotas.iter()
        .map(|q| q.floor() as usize)
        .collect::<Vec<_>>();

    let assigned = alloc.iter().sum::<usize>();
    let mut order = (0..counts.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        let fa = quotas[a] - quotas[a].floor();
        let fb = quotas[b] - quotas[b].floor();
        fb.total_cmp(&fa)
    });

    for &k in order.iter().take(total.saturating_sub(assigned)) {
        alloc[k] += 1;
    }

    alloc
}
