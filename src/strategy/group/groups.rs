use std::collections::BTreeMap;

use crate::test::TestMeta;

/// Storage for grouped tests.
pub trait TestGroups<'t, Extra: 't, GroupKey> {
    fn add(&mut self, key: GroupKey, test: &'t TestMeta<Extra>);

    /// Number of tests over all groups.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups ordered by key, tests within a group keep their insertion order.
pub type TestGroupBTreeMap<'t, Extra, GroupKey> = BTreeMap<GroupKey, Vec<&'t TestMeta<Extra>>>;

impl<'t, Extra: 't, GroupKey> TestGroups<'t, Extra, GroupKey>
    for TestGroupBTreeMap<'t, Extra, GroupKey>
where
    GroupKey: Ord,
{
    fn add(&mut self, key: GroupKey, test: &'t TestMeta<Extra>) {
        self.entry(key).or_default().push(test);
    }

    fn len(&self) -> usize {
        self.values().map(|g| g.len()).sum()
    }
}
