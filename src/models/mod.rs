pub mod classifier;
pub mod factory;
pub mod gbdt;

pub use classifier::Classifier;
