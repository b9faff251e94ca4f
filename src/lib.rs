//! liverdx: training and tuning helpers for a liver-disorder classifier.
//!
//! This crate loads a small tabular medical dataset, builds a
//! preprocessing+model pipeline (median imputation and one-hot encoding in
//! front of a probabilistic tree-ensemble classifier), estimates
//! generalization via stratified cross-validation, scores a held-out test
//! set, and searches the hyperparameter space with both a randomized sampler
//! and a sequential history-guided optimizer.
//!
//! The design favors small, testable modules; the classifier sits behind a
//! trait so any estimator with fit/predict/predict_proba can be substituted
//! without touching the orchestration code.
pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod search;
pub mod validation;
