use crate::test::TestMeta;

/// A strategy for assigning tests to groups.
///
/// The grouper maps each test to a `GroupKey`. Tests with equal keys end up in
/// the same group. Keys should be small and cheap to clone, like an enum or an
/// `Option` of one; tests that need no grouping can share a "no group" key.
///
/// In addition to the key, a grouper can optionally provide group context via
/// [`Self::group_ctx`], for data that belongs to the whole group (for example
/// the minimum time between two launches) instead of every single test.
///
/// For simple setups where no context is needed, `TestGrouper` is implemented
/// for `Fn(&TestMeta<Extra>) -> GroupKey`, so a closure can act as a grouper.
pub trait TestGrouper<Extra, GroupKey, GroupCtx = ()> {
    /// Return the group key for a test.
    fn group(&mut self, meta: &TestMeta<Extra>) -> GroupKey;

    /// Optionally return group context for a group key.
    ///
    /// The default implementation returns `None`.
    fn group_ctx(&self, key: &GroupKey) -> Option<&GroupCtx> {
        let _ = key;
        None
    }
}

impl<F, Extra, GroupKey> TestGrouper<Extra, GroupKey> for F
where
    F: Fn(&TestMeta<Extra>) -> GroupKey,
{
    fn group(&mut self, meta: &TestMeta<Extra>) -> GroupKey {
        self(meta)
    }
}
