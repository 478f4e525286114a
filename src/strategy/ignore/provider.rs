use crate::{
    classify::Classifier,
    ignore::{IgnoreStatus, TestIgnore},
    tag::Tags,
    test::TestMeta,
};

/// A [`TestIgnore`] implementation that skips tests not fitting the run.
///
/// The first matching [`SkipRule`](crate::classify::SkipRule) provides the
/// reason. Tests that pass all rules keep whatever ignore status the harness
/// discovered them with, so a statically ignored test stays ignored.
#[derive(Debug, Clone, Copy)]
pub struct ProviderIgnore<'c> {
    classifier: Classifier<'c>,
}

impl<'c> ProviderIgnore<'c> {
    pub fn new(classifier: Classifier<'c>) -> Self {
        Self { classifier }
    }
}

impl<Extra: AsRef<Tags>> TestIgnore<Extra> for ProviderIgnore<'_> {
    fn ignore(&self, meta: &TestMeta<Extra>) -> IgnoreStatus {
        match self.classifier.classify(meta.tags()).ignore_status() {
            IgnoreStatus::Run => meta.ignore.clone(),
            status => status,
        }
    }
}
