//! Hyperparameter search: a randomized sampler over the space and a
//! sequential optimizer that adapts its proposals from trial history.
pub mod random;
pub mod sequential;
pub mod space;

pub use random::{RandomizedSearch, SearchOutcome, TrialResult};
pub use sequential::{SequentialOutcome, SequentialSearch};
pub use space::ParamSpace;
