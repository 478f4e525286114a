use std::{collections::BTreeMap, time::Duration};

use crate::{
    classify::{Classifier, SerialGroup},
    group::TestGrouper,
    provider::Provider,
    tag::Tags,
    test::TestMeta,
};

/// Context shared by all tests of a [`SerialGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialGroupCtx {
    /// The scheduler must wait at least this long between two launches.
    pub min_launch_interval: Duration,
}

/// Groups tests that exercise a rate limited provider.
///
/// The key is `None` for tests without any serialization constraint, those can
/// run in parallel freely. Every test that hits a rate limited provider, either
/// through its tags or by being a generic test while that provider is the
/// generic one, gets the same `Some` key.
#[derive(Debug, Clone)]
pub struct SerialGrouper<'c> {
    classifier: Classifier<'c>,
    ctx: BTreeMap<SerialGroup, SerialGroupCtx>,
}

impl<'c> SerialGrouper<'c> {
    pub fn new(classifier: Classifier<'c>) -> Self {
        let ctx = Provider::ALL
            .into_iter()
            .filter_map(SerialGroup::for_provider)
            .map(|group| {
                let ctx = SerialGroupCtx {
                    min_launch_interval: group.min_launch_interval(),
                };
                (group, ctx)
            })
            .collect();
        Self { classifier, ctx }
    }
}

impl<Extra: AsRef<Tags>> TestGrouper<Extra, Option<SerialGroup>, SerialGroupCtx>
    for SerialGrouper<'_>
{
    fn group(&mut self, meta: &TestMeta<Extra>) -> Option<SerialGroup> {
        self.classifier.serial_group(meta.tags())
    }

    fn group_ctx(&self, key: &Option<SerialGroup>) -> Option<&SerialGroupCtx> {
        key.as_ref().and_then(|group| self.ctx.get(group))
    }
}
