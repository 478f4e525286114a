use std::borrow::Cow;

use crate::{ignore::IgnoreStatus, tag::Tags, test::TestMeta};

#[derive(Default)]
pub struct BuildTest {
    pub name: Cow<'static, str>,
    pub ignore: IgnoreStatus,
    pub tags: Tags,
}

impl From<BuildTest> for TestMeta {
    fn from(value: BuildTest) -> Self {
        TestMeta {
            name: value.name,
            ignore: value.ignore,
            extra: value.tags,
        }
    }
}

macro_rules! test {
    {$($field:ident: $value:expr),* $(,)?} => {
        $crate::test::TestMeta::from($crate::test_support::BuildTest {
            $($field: From::from($value),)*
            ..($crate::test_support::BuildTest {
                name: concat!(module_path!(), "::", file!(), ":", line!(), ":", column!()).into(),
                ..Default::default()
            })
        })
    };
}

pub(crate) use test;
