use std::fmt;

use crate::{
    classify::{Classification, SerialGroup, SkipReason},
    group::{TestGroupBTreeMap, TestGroups},
    tag::Tags,
    test::TestMeta,
};

/// The classification of every discovered test of a session.
///
/// Entries keep the order of the discovered tests.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SessionPlan<'t, Extra = Tags> {
    pub entries: Vec<(&'t TestMeta<Extra>, Classification)>,
}

impl<'t, Extra> SessionPlan<'t, Extra> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The classification of the test with the given name.
    pub fn get(&self, name: &str) -> Option<&Classification> {
        self.entries
            .iter()
            .find(|(meta, _)| meta.name == name)
            .map(|(_, classification)| classification)
    }

    /// Tests that are not skipped.
    pub fn running(&self) -> impl Iterator<Item = &'t TestMeta<Extra>> {
        self.entries
            .iter()
            .filter(|(_, classification)| !classification.is_skipped())
            .map(|(meta, _)| *meta)
    }

    /// Skipped tests with the first reason they were skipped for.
    pub fn skipped(&self) -> impl Iterator<Item = (&'t TestMeta<Extra>, &SkipReason)> {
        self.entries
            .iter()
            .filter_map(|(meta, classification)| Some((*meta, classification.first_skip()?)))
    }

    /// Tests in the given serialization group, skipped ones included.
    pub fn serialized(&self, group: SerialGroup) -> impl Iterator<Item = &'t TestMeta<Extra>> {
        self.entries
            .iter()
            .filter(move |(_, classification)| classification.serial_group() == Some(group))
            .map(|(meta, _)| *meta)
    }

    /// All tests keyed by their serialization group.
    pub fn groups(&self) -> TestGroupBTreeMap<'t, Extra, Option<SerialGroup>> {
        let mut groups = TestGroupBTreeMap::new();
        for (meta, classification) in &self.entries {
            groups.add(classification.serial_group(), *meta);
        }
        groups
    }
}

impl<Extra> fmt::Display for SessionPlan<'_, Extra> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut skipped = 0;
        for (meta, classification) in &self.entries {
            write!(f, "{}: test", meta.name)?;
            if let Some(group) = classification.serial_group() {
                write!(f, " [{group}]")?;
            }
            if let Some(reason) = classification.first_skip() {
                skipped += 1;
                write!(f, ", skipped: {reason}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "\n{} tests, {} to run, {} skipped",
            self.entries.len(),
            self.entries.len() - skipped,
            skipped
        )
    }
}
