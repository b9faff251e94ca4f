//! Integration tests for CSV loading, deduplication, and splitting.

use std::io::Write;

use liverdx::data::{train_test_split, Column, Dataset};
use tempfile::NamedTempFile;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(content.as_bytes()).expect("failed to write csv");
    file
}

#[test]
fn loader_deduplicates_and_recodes_labels() {
    let file = write_csv(
        "Age,Gender,A/G Ratio,Selector\n\
         65,Female,0.9,1\n\
         62,Male,1.1,2\n\
         65,Female,0.9,1\n\
         40,Male,,2\n",
    );

    let dataset = Dataset::from_csv(file.path(), "Selector").unwrap();
    assert_eq!(dataset.nrows(), 3, "duplicate row should be dropped");
    // Selector 1 -> positive class 1, Selector 2 -> 0.
    assert_eq!(dataset.labels.to_vec(), vec![1, 0, 0]);

    match dataset.features.column("A/G Ratio").unwrap() {
        Column::Numeric(values) => {
            assert!(values[2].is_nan(), "empty cell should load as NaN");
            assert_eq!(values[0], 0.9);
        }
        _ => panic!("A/G Ratio should be numeric"),
    }
    match dataset.features.column("Gender").unwrap() {
        Column::Categorical(values) => assert_eq!(values[0], "Female"),
        _ => panic!("Gender should be categorical"),
    }
}

#[test]
fn loader_rejects_missing_file_and_missing_label() {
    assert!(Dataset::from_csv("no/such/file.csv", "Selector").is_err());

    let file = write_csv("Age,Gender\n65,Female\n");
    assert!(Dataset::from_csv(file.path(), "Selector").is_err());
}

#[test]
fn loader_rejects_non_binary_label() {
    let file = write_csv("Age,Selector\n1,1\n2,2\n3,3\n");
    assert!(Dataset::from_csv(file.path(), "Selector").is_err());
}

#[test]
fn split_is_reproducible_and_stratified_on_loaded_data() {
    let mut content = String::from("Age,Gender,A/G Ratio,Selector\n");
    for i in 0..60 {
        let selector = if i % 3 == 0 { 1 } else { 2 };
        content.push_str(&format!(
            "{},{},{:.2},{}\n",
            20 + i,
            if i % 2 == 0 { "Male" } else { "Female" },
            0.5 + i as f64 * 0.01,
            selector
        ));
    }
    let file = write_csv(&content);
    let dataset = Dataset::from_csv(file.path(), "Selector").unwrap();

    let a = train_test_split(&dataset, 0.4, 42).unwrap();
    let b = train_test_split(&dataset, 0.4, 42).unwrap();
    assert_eq!(a.y_train, b.y_train);
    assert_eq!(a.x_test, b.x_test);

    // 20 positives, 40% test fraction: 8 positives expected in test.
    let test_pos = a.y_test.iter().filter(|&&y| y == 1).count();
    assert!((test_pos as i64 - 8).abs() <= 1, "test positives = {}", test_pos);
    assert_eq!(a.y_train.len() + a.y_test.len(), 60);
}
