mod common;

use aloracle::prelude::*;
use common::*;
use polars::prelude::NamedFrom;


fn oracle() -> ALOracle {
    ALOracle::init()
}


// ── Split preconditions ─────────────────────────────────────────────────

#[test]
fn unknown_target_is_rejected() {
    let err = oracle().split_data(&sat_dataset(), "runtimes.Nope", 0.2, 25).unwrap_err();
    assert!(err.is_invalid_argument());
}


#[test]
fn non_target_column_is_rejected() {
    let err = oracle().split_data(&sat_dataset(), "base.vars", 0.2, 25).unwrap_err();
    assert!(err.is_invalid_argument());

    let err = oracle().split_data(&sat_dataset(), "meta.family", 0.2, 25).unwrap_err();
    assert!(err.is_invalid_argument());
}


#[test]
fn test_size_must_lie_in_unit_interval() {
    let df = sat_dataset();
    for test_size in [-0.1, 1.0, 1.5, f64::NAN] {
        let err = oracle().split_data(&df, "result", test_size, 25).unwrap_err();
        assert!(err.is_invalid_argument(), "test size {test_size} accepted");
    }
}


#[test]
fn dataset_without_features_is_rejected() {
    let df = sat_dataset().drop_many(&["base.vars", "gate.depth"]);
    let err = oracle().split_data(&df, "result", 0.0, 25).unwrap_err();
    assert!(err.is_invalid_argument());
}


#[test]
fn unencodable_result_is_rejected() {
    // Row 1 carries an outcome that is neither sat nor unsat.
    let mut df = dataset_from(&[0, 1, 0, 1], &[1.0, 2.0, 3.0, 4.0]);
    df.with_column(polars::prelude::Series::new(
        "result", &["sat", "maybe", "sat", "unsat"]
    ))
    .unwrap();

    let err = oracle().split_data(&df, "result", 0.0, 25).unwrap_err();
    assert!(err.is_invalid_argument());
}


// ── Target resolution ───────────────────────────────────────────────────

#[test]
fn result_target_drops_default_solver_timeouts() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.0, 25).unwrap();

    assert_eq!(split.train_size(), 10);
    assert_eq!(split.train_rows(), (0..10).collect::<Vec<_>>().as_slice());
    assert!(split.x_test().is_none());
    assert!(split.test_rows().is_none());
    assert_eq!(split.test_size(), 0);
    assert_eq!(split.target(), &Target::Result);
}


#[test]
fn runtime_target_keeps_every_row() {
    let split = oracle().split_data(&sat_dataset(), CADICAL, 0.0, 25).unwrap();
    assert_eq!(split.train_size(), 12);
    assert_eq!(split.target(), &Target::Runtime(CADICAL.to_string()));

    let indices = (0..12).collect::<Vec<_>>();
    let labels = split.query_labels(&indices, None).unwrap()
        .into_iter()
        .map(|r| r.label.unwrap().value())
        .collect::<Vec<_>>();
    let expected = (0..12).map(cadical_label).collect::<Vec<_>>();
    assert_eq!(labels, expected);
}


#[test]
fn only_base_and_gate_columns_are_features() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.2, 25).unwrap();

    let expected = vec!["base.vars", "gate.depth"];
    assert_eq!(split.x_train().get_column_names(), expected);
    assert_eq!(split.x_test().unwrap().get_column_names(), expected);
}


#[test]
fn feature_rows_follow_split_order() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.2, 25).unwrap();

    let vars = split.x_train()
        .column("base.vars").unwrap()
        .f64().unwrap()
        .into_no_null_iter()
        .map(|v| v as usize)
        .collect::<Vec<_>>();
    assert_eq!(vars, split.train_rows());
}


// ── Splitting ───────────────────────────────────────────────────────────

#[test]
fn ten_rows_split_eight_to_two_stratified() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.2, 25).unwrap();

    assert_eq!(split.train_size(), 8);
    assert_eq!(split.test_size(), 2);
    assert_eq!(split.x_train().height(), 8);
    assert_eq!(split.x_test().unwrap().height(), 2);

    let mut test_labels = split.test_rows().unwrap()
        .iter()
        .map(|&i| result_label(i))
        .collect::<Vec<_>>();
    test_labels.sort();
    assert_eq!(test_labels, vec![0, 1]);

    let mut rows = split.train_rows().to_vec();
    rows.extend_from_slice(split.test_rows().unwrap());
    rows.sort();
    assert_eq!(rows, (0..10).collect::<Vec<_>>());
}


#[test]
fn split_is_deterministic() {
    let df = sat_dataset();
    let a = oracle().split_data(&df, CADICAL, 0.25, 7).unwrap();
    let b = oracle().split_data(&df, CADICAL, 0.25, 7).unwrap();

    assert_eq!(a.train_rows(), b.train_rows());
    assert_eq!(a.test_rows(), b.test_rows());
}


#[test]
fn resplitting_leaves_earlier_split_intact() {
    let df = sat_dataset();
    let oracle = oracle();
    let first = oracle.split_data(&df, "result", 0.2, 25).unwrap();
    let rows = first.train_rows().to_vec();

    let second = oracle.split_data(&df, CADICAL, 0.0, 25).unwrap();

    assert_eq!(first.train_rows(), rows.as_slice());
    assert_eq!(first.train_size(), 8);
    assert_eq!(second.train_size(), 12);
}


#[test]
fn unsplittable_class_counts_are_rejected() {
    // A single unsat instance cannot be stratified.
    let df = dataset_from(&[0, 0, 0, 1], &[1.0, 2.0, 3.0, 4.0]);
    let err = oracle().split_data(&df, "result", 0.5, 25).unwrap_err();
    assert!(err.is_invalid_argument());
}


// ── Label queries ───────────────────────────────────────────────────────

#[test]
fn full_budget_reveals_labels_at_actual_cost() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.0, 25).unwrap();
    assert_eq!(split.full_budget(), 10000.0);

    let results = split.query_labels(&[0, 1], None).unwrap();

    assert_eq!(results, vec![
        QueryResult { query_index: 0, label: Some(Label::SAT), cost: 5.0 },
        QueryResult { query_index: 1, label: Some(Label::UNSAT), cost: 7000.0 },
    ]);
}


#[test]
fn short_timeout_hides_label_and_costs_timeout() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.0, 25).unwrap();

    let results = split.query_labels(&[0, 1], Some(&[3.0, 7000.0])).unwrap();

    assert_eq!(results, vec![
        QueryResult { query_index: 0, label: None, cost: 3.0 },
        QueryResult { query_index: 1, label: Some(Label::UNSAT), cost: 7000.0 },
    ]);
}


#[test]
fn generous_timeout_costs_only_the_runtime() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.0, 25).unwrap();

    let results = split.query_labels(&[3], Some(&[4000.0])).unwrap();
    assert_eq!(results[0].label, Some(Label::UNSAT));
    assert_eq!(results[0].cost, 300.0);
}


#[test]
fn timed_out_solver_with_full_budget_reveals_timeout_label() {
    let split = oracle().split_data(&sat_dataset(), CADICAL, 0.0, 25).unwrap();

    let results = split.query_labels(&[0], None).unwrap();
    assert_eq!(results[0].label, Some(Label::TIMEOUT));
    assert_eq!(results[0].cost, 10000.0);

    let results = split.query_labels(&[0], Some(&[5000.0])).unwrap();
    assert_eq!(results[0].label, None);
    assert_eq!(results[0].cost, 5000.0);
}


#[test]
fn repeated_indices_are_answered_in_order() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.0, 25).unwrap();

    let results = split.query_labels(&[2, 0, 2], Some(&[1.0, 10.0, 20.0])).unwrap();

    let indices = results.iter().map(|r| r.query_index).collect::<Vec<_>>();
    assert_eq!(indices, vec![2, 0, 2]);
    assert_eq!(results[0].label, None);
    assert_eq!(results[0].cost, 1.0);
    assert_eq!(results[1].label, Some(Label::SAT));
    assert_eq!(results[2].label, Some(Label::SAT));
    assert_eq!(results[2].cost, 12.5);
}


#[test]
fn query_argument_errors() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.0, 25).unwrap();

    let err = split.query_labels(&[0, 1], Some(&[1.0])).unwrap_err();
    assert!(err.is_invalid_argument());

    let err = split.query_labels(&[10], None).unwrap_err();
    assert!(err.is_invalid_argument());

    let err = split.query_labels(&[0], Some(&[-1.0])).unwrap_err();
    assert!(err.is_invalid_argument());

    let err = split.query_labels(&[0], Some(&[f64::NAN])).unwrap_err();
    assert!(err.is_invalid_argument());
}


#[test]
fn empty_query_returns_nothing() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.0, 25).unwrap();
    assert!(split.query_labels(&[], None).unwrap().is_empty());
}


// ── Scoring ─────────────────────────────────────────────────────────────

#[test]
fn scoring_ground_truth_gives_one() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.2, 25).unwrap();

    let y_train = split.train_rows().iter()
        .map(|&i| result_label(i))
        .collect::<Vec<_>>();
    assert_eq!(split.score(&y_train).unwrap(), 1.0);

    let y_test = split.test_rows().unwrap().iter()
        .map(|&i| result_label(i))
        .collect::<Vec<_>>();
    assert_eq!(split.score(&y_test).unwrap(), 1.0);
    assert_eq!(split.score_partition(Partition::Test, &y_test).unwrap(), 1.0);
}


#[test]
fn scoring_inverted_labels_gives_minus_one() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.2, 25).unwrap();

    let y_train = split.train_rows().iter()
        .map(|&i| 1 - result_label(i))
        .collect::<Vec<_>>();
    assert_eq!(split.score(&y_train).unwrap(), -1.0);
}


#[test]
fn queried_labels_score_perfectly() {
    let split = oracle().split_data(&sat_dataset(), CADICAL, 0.0, 25).unwrap();

    let indices = (0..split.train_size()).collect::<Vec<_>>();
    let y_pred = split.query_labels(&indices, None).unwrap()
        .into_iter()
        .map(|r| r.label.unwrap().value())
        .collect::<Vec<_>>();
    assert_eq!(split.score(&y_pred).unwrap(), 1.0);
}


#[test]
fn score_rejects_mismatched_length() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.2, 25).unwrap();

    let err = split.score(&[0, 1, 0]).unwrap_err();
    assert!(err.is_invalid_argument());

    let err = split.score_partition(Partition::Train, &[0, 1]).unwrap_err();
    assert!(err.is_invalid_argument());
}


#[test]
fn score_rejects_non_binary_predictions() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.2, 25).unwrap();

    let err = split.score(&[0, 2]).unwrap_err();
    assert!(err.is_invalid_argument());
}


#[test]
fn score_without_test_partition() {
    let split = oracle().split_data(&sat_dataset(), "result", 0.0, 25).unwrap();

    let err = split.score(&[0, 1]).unwrap_err();
    assert!(err.is_invalid_argument());

    let err = split.score_partition(Partition::Test, &[0, 1]).unwrap_err();
    assert!(err.is_invalid_argument());
}


#[test]
fn equal_partition_sizes_prefer_train() {
    // Eight rows at test size 0.5 give four rows on each side.
    let labels = [0, 1, 0, 1, 0, 1, 0, 1];
    let df = dataset_from(&labels, &[1.0; 8]);
    let split = oracle().split_data(&df, "result", 0.5, 3).unwrap();
    assert_eq!(split.train_size(), split.test_size());

    let y_train = split.train_rows().iter()
        .map(|&i| labels[i])
        .collect::<Vec<_>>();
    assert_eq!(split.score(&y_train).unwrap(), 1.0);
    assert_eq!(
        split.score(&y_train).unwrap(),
        split.score_partition(Partition::Train, &y_train).unwrap()
    );
}


// ── Config ──────────────────────────────────────────────────────────────

#[test]
fn custom_timeout_changes_the_timeout_runtime() {
    let config = OracleConfig {
        competition_timeout: 3500.0,
        ..OracleConfig::default()
    };
    let oracle = ALOracle::init().config(config);

    // With a 7000 timeout runtime, Kissat's second row now did not finish.
    let split = oracle.split_data(&sat_dataset(), KISSAT, 0.0, 25).unwrap();
    let results = split.query_labels(&[0, 1], None).unwrap();
    assert_eq!(results[0].label, Some(Label::NO_TIMEOUT));
    assert_eq!(results[1].label, Some(Label::TIMEOUT));
}
