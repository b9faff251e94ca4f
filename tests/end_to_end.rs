//! End-to-end run over a synthetic, trivially separable dataset: load, split,
//! cross-validate, fit, and score on the held-out partition.

use std::io::Write;

use assert_float_eq::assert_float_absolute_eq;
use liverdx::config::GbdtParams;
use liverdx::data::{train_test_split, Dataset};
use liverdx::evaluation::evaluate_on_test;
use liverdx::pipeline::PipelineSpec;
use liverdx::preprocessing::PreprocessorConfig;
use liverdx::validation::cross_validate;
use tempfile::NamedTempFile;

/// Two clearly separated clusters per label in the Sgot column; a sprinkle
/// of missing ratio values; {1,2} label coding.
fn separable_csv(n: usize) -> NamedTempFile {
    let mut content = String::from("A/G Ratio,Gender,Sgot,Selector\n");
    for i in 0..n {
        let positive = i % 2 == 0;
        let ratio = if i % 7 == 0 {
            String::new()
        } else {
            format!("{:.2}", 0.8 + (i % 5) as f64 * 0.1)
        };
        content.push_str(&format!(
            "{},{},{:.1},{}\n",
            ratio,
            if i % 3 == 0 { "Male" } else { "Female" },
            if positive {
                100.0 + (i % 10) as f64
            } else {
                -100.0 - (i % 10) as f64
            },
            if positive { 1 } else { 2 },
        ));
    }
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(content.as_bytes()).expect("failed to write csv");
    file
}

#[test]
fn baseline_pipeline_separates_the_clusters_perfectly() {
    let file = separable_csv(80);
    let dataset = Dataset::from_csv(file.path(), "Selector").unwrap();
    let split = train_test_split(&dataset, 0.4, 42).unwrap();

    let spec = PipelineSpec::new(
        PreprocessorConfig::default(),
        GbdtParams {
            iterations: 30,
            ..GbdtParams::default()
        },
    );

    let cv = cross_validate(&spec, &split.x_train, &split.y_train, 5, 42).unwrap();
    assert!(cv.mean_test_auc() > 0.95, "cv AUC = {}", cv.mean_test_auc());
    assert_eq!(cv.test_roc_auc.len(), 5);
    assert_eq!(cv.train_accuracy.len(), 5);

    let mut pipeline = spec.build();
    pipeline.fit(&split.x_train, &split.y_train).unwrap();
    let scores = evaluate_on_test(&pipeline, &split.x_test, &split.y_test).unwrap();

    assert_float_absolute_eq!(scores.roc_auc, 1.0, 1e-9);
    assert!((0.0..=1.0).contains(&scores.accuracy));
    assert!((0.0..=1.0).contains(&scores.f1));
}

#[test]
fn evaluating_an_unfitted_pipeline_fails() {
    let file = separable_csv(40);
    let dataset = Dataset::from_csv(file.path(), "Selector").unwrap();
    let split = train_test_split(&dataset, 0.4, 42).unwrap();

    let pipeline = PipelineSpec::new(PreprocessorConfig::default(), GbdtParams::default()).build();
    assert!(evaluate_on_test(&pipeline, &split.x_test, &split.y_test).is_err());
}
