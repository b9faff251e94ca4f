use crate::config::GbdtParams;
use crate::models::classifier::Classifier;
use crate::models::gbdt::GbdtClassifier;

/// Build a boxed classifier from its hyper-parameters.
/// Currently this is a thin factory implemented as a single function.
pub fn build_classifier(params: GbdtParams) -> Box<dyn Classifier> {
    Box::new(GbdtClassifier::new(params))
}
