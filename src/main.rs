use anyhow::Result;
use log::LevelFilter;

use liverdx::config::{GbdtParams, RunConfig};
use liverdx::data::{train_test_split, Dataset};
use liverdx::evaluation::evaluate_on_test;
use liverdx::pipeline::PipelineSpec;
use liverdx::preprocessing::PreprocessorConfig;
use liverdx::search::{ParamSpace, RandomizedSearch, SequentialSearch};
use liverdx::validation::cross_validate;

/// Linear orchestration: baseline fit/evaluate, then randomized search, then
/// the sequential optimizer, each followed by cross-validation and held-out
/// evaluation of its best pipeline. No flags; configuration is fixed.
fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("LIVERDX_LOG", "warn"))
        .init();

    let cfg = RunConfig::default();
    let preprocessor = PreprocessorConfig {
        ratio_column: cfg.ratio_column.clone(),
        categorical_column: cfg.gender_column.clone(),
    };

    let dataset = Dataset::from_csv(&cfg.data_path, &cfg.label_column)?;
    let split = train_test_split(&dataset, cfg.test_fraction, cfg.seed)?;
    println!(
        "Train set size: {}, Test set size: {}",
        split.x_train.nrows(),
        split.x_test.nrows()
    );

    // Unoptimized model for baseline
    let baseline = PipelineSpec::new(preprocessor.clone(), GbdtParams::default());
    let _cv_scores = cross_validate(
        &baseline,
        &split.x_train,
        &split.y_train,
        cfg.cv_folds,
        cfg.seed,
    )?;
    let mut pipeline = baseline.build();
    pipeline.fit(&split.x_train, &split.y_train)?;
    let _test_scores = evaluate_on_test(&pipeline, &split.x_test, &split.y_test)?;

    // Hyperparameter tuning, randomized search
    let space = ParamSpace::default();
    let randomized = RandomizedSearch {
        n_iter: cfg.n_trials,
        n_splits: cfg.cv_folds,
        seed: cfg.seed + 1,
    };
    let outcome = randomized.fit(&space, &preprocessor, &split.x_train, &split.y_train)?;
    let tuned = outcome.best_pipeline.spec().clone();
    let _cv_scores = cross_validate(
        &tuned,
        &split.x_train,
        &split.y_train,
        cfg.cv_folds,
        cfg.seed,
    )?;
    println!("{:?}", outcome.best_params);
    let _test_scores = evaluate_on_test(&outcome.best_pipeline, &split.x_test, &split.y_test)?;

    // Hyperparameter tuning, sequential optimizer
    let sequential = SequentialSearch {
        n_trials: cfg.n_trials,
        n_startup: 10,
        n_splits: cfg.cv_folds,
        seed: cfg.seed + 1,
    };
    let outcome = sequential.optimize(&space, &preprocessor, &split.x_train, &split.y_train)?;
    let tuned = PipelineSpec::new(preprocessor.clone(), outcome.best_params.clone());
    let _cv_scores = cross_validate(
        &tuned,
        &split.x_train,
        &split.y_train,
        cfg.cv_folds,
        cfg.seed,
    )?;
    let mut best_pipeline = tuned.build();
    best_pipeline.fit(&split.x_train, &split.y_train)?;
    let _test_scores = evaluate_on_test(&best_pipeline, &split.x_test, &split.y_test)?;

    Ok(())
}
