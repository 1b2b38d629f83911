#![allow(dead_code)]

use polars::prelude::*;


pub const KISSAT: &str = "runtimes.Kissat_MAB_ESA";
pub const CADICAL: &str = "runtimes.CaDiCaL";


pub const KISSAT_RUNTIMES: [f64; 12] = [
    5.0, 7000.0, 12.5, 300.0, 4999.0, 1.0,
    80.0, 2500.0, 60.0, 910.0, 10000.0, 10000.0,
];

pub const CADICAL_RUNTIMES: [f64; 12] = [
    10000.0, 40.0, 10000.0, 3.0, 10000.0, 8.0,
    10000.0, 700.0, 9.0, 10000.0, 10000.0, 25.0,
];


/// Twelve instances: the first ten alternate `sat`/`unsat`,
/// Kissat times out on the last two (one of them `unknown`).
pub fn sat_dataset() -> DataFrame {
    let hashes = (0..12).map(|i| format!("h{i}")).collect::<Vec<_>>();
    let hashes = hashes.iter().map(String::as_str).collect::<Vec<_>>();
    let vars = (0..12).map(|i| i as f64).collect::<Vec<_>>();
    let depth = (0..12).map(|i| (2 * i) as f64).collect::<Vec<_>>();
    let mut results = (0..10)
        .map(|i| if i % 2 == 0 { "sat" } else { "unsat" })
        .collect::<Vec<_>>();
    results.extend(["sat", "unknown"]);

    df!(
        "hash"        => hashes,
        "base.vars"   => vars,
        "gate.depth"  => depth,
        "meta.family" => vec!["fam"; 12],
        "result"      => results,
        KISSAT        => KISSAT_RUNTIMES.to_vec(),
        CADICAL       => CADICAL_RUNTIMES.to_vec()
    )
    .unwrap()
}


/// Satisfiability label of row `i` of [`sat_dataset`].
pub fn result_label(i: usize) -> u8 {
    (i % 2) as u8
}


/// Timeout label of row `i` of [`sat_dataset`] for CaDiCaL.
pub fn cadical_label(i: usize) -> u8 {
    (CADICAL_RUNTIMES[i] == 10000.0) as u8
}


/// A dataset of `size` rows whose `result` labels follow `labels`
/// and whose Kissat runtimes follow `runtimes`.
pub fn dataset_from(labels: &[u8], runtimes: &[f64]) -> DataFrame {
    assert_eq!(labels.len(), runtimes.len());
    let size = labels.len();
    let results = labels.iter()
        .map(|&l| if l == 0 { "sat" } else { "unsat" })
        .collect::<Vec<_>>();
    let hashes = (0..size).map(|i| format!("h{i}")).collect::<Vec<_>>();
    let hashes = hashes.iter().map(String::as_str).collect::<Vec<_>>();
    let vars = (0..size).map(|i| i as f64).collect::<Vec<_>>();

    df!(
        "hash"      => hashes,
        "base.vars" => vars,
        "result"    => results,
        KISSAT      => runtimes.to_vec()
    )
    .unwrap()
}
