//! Course tooling for the SAT-solving task.
//!
//! ```text
//! coursework prepare  --dir data/
//! coursework holdout  --data data/dataset.csv --out data/
//! coursework majority --dir data/
//! coursework score    --dir data/scoring/
//! coursework baseline --data data/dataset.csv --target result
//! coursework earthquake holdout --input data/ --out data/scoring/
//! ```
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polars::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aloracle::earthquake::{self, EarthquakeHoldout};
use aloracle::holdout::{read_csv, write_csv, Holdout};
use aloracle::prepare::{merge_databases, DATABASES};
use aloracle::submission::{score_directory, ScoringTask};
use aloracle::{ALOracle, MajorityClassifier, OracleConfig, Partition};

use std::path::{Path, PathBuf};


/// Seed of the course-internal holdout split.
const SEED: u64 = 25;

const TEST_SIZE: f64 = 0.2;


#[derive(Parser)]
#[command(name = "coursework", about = "Holdout, baseline and scoring tools for the SAT-solving task")]
struct Args {
    /// JSON file overriding the oracle config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}


#[derive(Subcommand)]
enum Command {
    /// Merge `meta.csv`, `base.csv`, `gate.csv` and `runtimes.csv`
    /// into `dataset.csv`.
    Prepare {
        #[arg(long, default_value = "data")]
        dir: PathBuf,
    },

    /// Write a stratified train/test split for every target.
    Holdout {
        #[arg(long, default_value = "data/dataset.csv")]
        data: PathBuf,

        #[arg(long, default_value = "data")]
        out: PathBuf,

        #[arg(long, default_value_t = SEED)]
        seed: u64,

        #[arg(long, default_value_t = TEST_SIZE)]
        test_size: f64,
    },

    /// Predict the majority class of the training labels for every target.
    Majority {
        #[arg(long, default_value = "data")]
        dir: PathBuf,
    },

    /// Validate and score all prediction files against the ground truth.
    Score {
        #[arg(long, default_value = "data/scoring")]
        dir: PathBuf,
    },

    /// Split with the oracle, buy every training label,
    /// and score a majority baseline fitted on them.
    Baseline {
        #[arg(long, default_value = "data/dataset.csv")]
        data: PathBuf,

        #[arg(long, default_value = "result")]
        target: String,

        #[arg(long, default_value_t = SEED)]
        seed: u64,

        #[arg(long, default_value_t = TEST_SIZE)]
        test_size: f64,
    },

    /// Tools for the earthquake damage task.
    #[command(subcommand)]
    Earthquake(Earthquake),
}


#[derive(Subcommand)]
enum Earthquake {
    /// Split `train_values.csv`/`train_labels.csv` for scoring.
    Holdout {
        #[arg(long, default_value = "data")]
        input: PathBuf,

        #[arg(long, default_value = "data/scoring")]
        out: PathBuf,

        #[arg(long, default_value_t = SEED)]
        seed: u64,

        #[arg(long, default_value_t = TEST_SIZE)]
        test_size: f64,
    },

    /// Predict the majority damage grade.
    Majority {
        #[arg(long, default_value = "data/scoring")]
        dir: PathBuf,
    },

    /// Validate and score all prediction files.
    Score {
        #[arg(long, default_value = "data/scoring")]
        dir: PathBuf,
    },
}


fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => OracleConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => OracleConfig::default(),
    };

    match args.command {
        Command::Prepare { dir } =>
            prepare(&config, &dir),
        Command::Holdout { data, out, seed, test_size } =>
            holdout(&config, &data, &out, seed, test_size),
        Command::Majority { dir } =>
            majority(&config, &dir),
        Command::Score { dir } =>
            score(&config, &dir),
        Command::Baseline { data, target, seed, test_size } =>
            baseline(&config, &data, &target, seed, test_size),
        Command::Earthquake(Earthquake::Holdout { input, out, seed, test_size }) =>
            earthquake_holdout(&input, &out, seed, test_size),
        Command::Earthquake(Earthquake::Majority { dir }) =>
            earthquake_majority(&dir),
        Command::Earthquake(Earthquake::Score { dir }) =>
            print_scores(&dir, &earthquake::scoring_task()),
    }
}


fn load(path: &Path) -> Result<DataFrame> {
    read_csv(path).with_context(|| format!("reading {}", path.display()))
}


fn prepare(config: &OracleConfig, dir: &Path) -> Result<()> {
    let meta = load(&dir.join("meta.csv"))?;
    let databases = DATABASES.iter()
        .map(|&name| Ok((name, load(&dir.join(format!("{name}.csv")))?)))
        .collect::<Result<Vec<_>>>()?;

    let mut dataset = merge_databases(&meta, &databases, config)?;
    let path = dir.join("dataset.csv");
    write_csv(&mut dataset, &path)?;
    info!(path = %path.display(), "wrote");

    Ok(())
}


fn holdout(config: &OracleConfig,
           data: &Path,
           out: &Path,
           seed: u64,
           test_size: f64)
    -> Result<()>
{
    let dataset = load(data)?;
    for target in config.holdout_targets() {
        let mut split = Holdout::create(&dataset, &target, test_size, seed, config)
            .with_context(|| format!("splitting for target {target}"))?;
        for path in split.write_csv(out)? {
            info!(path = %path.display(), "wrote");
        }
    }

    Ok(())
}


fn majority(config: &OracleConfig, dir: &Path) -> Result<()> {
    for target in config.holdout_targets() {
        let x_test = load(&dir.join(format!("{target}_X_test.csv")))?;
        let y_train = load(&dir.join(format!("{target}_y_train.csv")))?;

        let labels = y_train.column(&target)?
            .cast(&DataType::String)?;
        let labels = labels.str()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let model = MajorityClassifier::fit(&labels)?;
        let predictions = model.predict_all(x_test.height());

        let mut output = DataFrame::new(vec![
            x_test.column(&config.id_column)?.clone(),
            Series::new(&target, predictions),
        ])?;

        let path = dir.join(format!("{target}_majority_prediction.csv"));
        write_csv(&mut output, &path)?;
        info!(column = %target, majority = *model.majority(), path = %path.display(), "wrote");
    }

    Ok(())
}


fn score(config: &OracleConfig, dir: &Path) -> Result<()> {
    for target in config.holdout_targets() {
        print_scores(dir, &ScoringTask::sat(&target, config))?;
    }

    Ok(())
}


fn print_scores(dir: &Path, task: &ScoringTask) -> Result<()> {
    let results = score_directory(dir, task)
        .with_context(|| format!("scoring target {}", task.target))?;

    println!("Target: {}", task.target);
    println!("{:<24} {:>6}  Validity", "Team", "Score");
    for r in results {
        println!("{:<24} {:>6.2}  {}", r.team, r.score, r.validity);
    }
    println!();

    Ok(())
}


fn earthquake_holdout(input: &Path, out: &Path, seed: u64, test_size: f64) -> Result<()> {
    let values = load(&input.join("train_values.csv"))?;
    let labels = load(&input.join("train_labels.csv"))?;

    let mut split = EarthquakeHoldout::create(&values, &labels, test_size, seed)?;
    for path in split.write_csv(out)? {
        info!(path = %path.display(), "wrote");
    }

    Ok(())
}


fn earthquake_majority(dir: &Path) -> Result<()> {
    let test_values = load(&dir.join("test_values.csv"))?;
    let train_labels = load(&dir.join("train_labels.csv"))?;

    let mut output = earthquake::majority_prediction(&test_values, &train_labels)?;
    let path = dir.join(earthquake::MAJORITY_PREDICTION);
    write_csv(&mut output, &path)?;
    info!(path = %path.display(), "wrote");

    Ok(())
}


fn baseline(config: &OracleConfig,
            data: &Path,
            target: &str,
            seed: u64,
            test_size: f64)
    -> Result<()>
{
    let dataset = load(data)?;
    let oracle = ALOracle::init().config(config.clone());
    let split = oracle.split_data(&dataset, target, test_size, seed)?;


    let indices = (0..split.train_size()).collect::<Vec<_>>();
    let answers = split.query_labels(&indices, None)?;

    let cost = answers.iter().map(|a| a.cost).sum::<f64>();
    let labels = answers.iter()
        .filter_map(|a| a.label)
        .map(|label| label.value())
        .collect::<Vec<_>>();

    let model = MajorityClassifier::fit(&labels)?;
    let train_mcc = split.score_partition(
        Partition::Train, &model.predict_all(split.train_size())
    )?;

    println!("target:      {target}");
    println!("train rows:  {}", split.train_size());
    println!("query cost:  {cost:.1}");
    println!("majority:    {}", model.majority());
    println!("train MCC:   {train_mcc:.4}");

    if split.x_test().is_some() {
        let test_mcc = split.score_partition(
            Partition::Test, &model.predict_all(split.test_size())
        )?;
        println!("test rows:   {}", split.test_size());
        println!("test MCC:    {test_mcc:.4}");
    }

    Ok(())
}
