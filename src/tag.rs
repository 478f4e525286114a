//! Capability tags attached to discovered tests.
//!
//! Tags are flat keywords. A test can carry any number of them, their order does
//! not matter. Only a handful of keywords mean something to the planner:
//!
//! | keyword              | meaning                                             |
//! |----------------------|-----------------------------------------------------|
//! | `slow`               | only run with `--runslow`                           |
//! | `managed_spot`       | exercises managed spot jobs                         |
//! | `<provider tag>`     | specific to that provider (e.g. `aws`, `lambda_cloud`) |
//! | `no_<provider tag>`  | generic test that must not run on that provider     |
//!
//! Everything else is kept as [`Tag::Other`] and ignored during classification.

use std::{borrow::Cow, collections::BTreeSet, fmt};

use crate::provider::{Provider, ProviderSet};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Provider(Provider),
    Excluded(Provider),
    Slow,
    ManagedSpot,
    Other(Cow<'static, str>),
}

impl Tag {
    pub const SLOW: &'static str = "slow";
    pub const MANAGED_SPOT: &'static str = "managed_spot";

    pub fn parse(keyword: impl Into<Cow<'static, str>>) -> Tag {
        let keyword = keyword.into();
        match &*keyword {
            Self::SLOW => Tag::Slow,
            Self::MANAGED_SPOT => Tag::ManagedSpot,
            other => {
                if let Some(provider) = Provider::from_tag(other) {
                    Tag::Provider(provider)
                } else if let Some(provider) = Provider::from_excluded_tag(other) {
                    Tag::Excluded(provider)
                } else {
                    Tag::Other(keyword)
                }
            }
        }
    }

    pub fn keyword(&self) -> &str {
        match self {
            Tag::Provider(provider) => provider.tag(),
            Tag::Excluded(provider) => provider.excluded_tag(),
            Tag::Slow => Self::SLOW,
            Tag::ManagedSpot => Self::MANAGED_SPOT,
            Tag::Other(keyword) => &**keyword,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl From<&'static str> for Tag {
    fn from(value: &'static str) -> Self {
        Tag::parse(value)
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::parse(value)
    }
}

impl From<Provider> for Tag {
    fn from(value: Provider) -> Self {
        Tag::Provider(value)
    }
}

/// The capability tags of a single test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tags(BTreeSet<Tag>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<Tag>) -> bool {
        self.0.insert(tag.into())
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The providers this test is specific to.
    pub fn providers(&self) -> ProviderSet {
        self.0
            .iter()
            .filter_map(|tag| match tag {
                Tag::Provider(provider) => Some(*provider),
                _ => None,
            })
            .collect()
    }

    /// A test is generic if it is not specific to any provider.
    pub fn is_generic(&self) -> bool {
        self.providers().is_empty()
    }

    pub fn is_slow(&self) -> bool {
        self.contains(&Tag::Slow)
    }

    pub fn is_managed_spot(&self) -> bool {
        self.contains(&Tag::ManagedSpot)
    }

    pub fn excludes(&self, provider: Provider) -> bool {
        self.contains(&Tag::Excluded(provider))
    }

    /// Keywords that are not part of [`registered_markers`].
    pub fn unregistered(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|tag| match tag {
            Tag::Other(keyword) => Some(&**keyword),
            _ => None,
        })
    }
}

impl AsRef<Tags> for Tags {
    fn as_ref(&self) -> &Tags {
        self
    }
}

impl<T: Into<Tag>> FromIterator<T> for Tags {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Tag>> Extend<T> for Tags {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl<T: Into<Tag>, const N: usize> From<[T; N]> for Tags {
    fn from(value: [T; N]) -> Self {
        value.into_iter().collect()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, tag) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{tag}")?;
        }
        Ok(())
    }
}

/// A keyword the planner understands, with a human readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub keyword: &'static str,
    pub description: String,
}

/// Every keyword with a meaning for the planner.
pub fn registered_markers() -> Vec<Marker> {
    let mut markers = vec![
        Marker {
            keyword: Tag::SLOW,
            description: "mark test as slow to run".into(),
        },
        Marker {
            keyword: Tag::MANAGED_SPOT,
            description: "mark test as a managed spot test".into(),
        },
    ];
    markers.extend(Provider::ALL.into_iter().map(|provider| Marker {
        keyword: provider.tag(),
        description: format!("mark test as {provider} specific"),
    }));
    markers.extend(Provider::ALL.into_iter().map(|provider| Marker {
        keyword: provider.excluded_tag(),
        description: format!("do not run this generic test on {provider}"),
    }));
    markers
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("slow", Tag::Slow)]
    #[case("managed_spot", Tag::ManagedSpot)]
    #[case("aws", Tag::Provider(Provider::Aws))]
    #[case("lambda_cloud", Tag::Provider(Provider::Lambda))]
    #[case("no_lambda_cloud", Tag::Excluded(Provider::Lambda))]
    #[case("no_gcp", Tag::Excluded(Provider::Gcp))]
    #[case("lambda", Tag::Other(Cow::Borrowed("lambda")))]
    #[case("autostop", Tag::Other(Cow::Borrowed("autostop")))]
    fn parsing_keywords_works(#[case] keyword: &'static str, #[case] expected: Tag) {
        let tag = Tag::parse(keyword);
        assert_eq!(tag, expected);
        assert_eq!(tag.keyword(), keyword);
    }

    #[test]
    fn tags_ignore_insertion_order() {
        let a = Tags::from(["slow", "aws", "no_gcp"]);
        let b = Tags::from(["no_gcp", "slow", "aws", "aws"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn generic_means_no_provider_tag() {
        assert!(Tags::from(["slow", "no_lambda_cloud"]).is_generic());
        assert!(Tags::new().is_generic());
        assert!(!Tags::from(["ibm"]).is_generic());
        assert_eq!(
            Tags::from(["scp", "aws", "slow"]).providers(),
            ProviderSet::from([Provider::Aws, Provider::Scp])
        );
    }

    #[test]
    fn negative_tags_do_not_make_a_test_specific() {
        let tags = Tags::from(["no_azure"]);
        assert!(tags.is_generic());
        assert!(tags.excludes(Provider::Azure));
        assert!(!tags.excludes(Provider::Gcp));
    }

    #[test]
    fn registered_markers_cover_every_meaningful_keyword() {
        let markers = registered_markers();
        assert_eq!(markers.len(), 2 + 2 * Provider::ALL.len());
        for marker in &markers {
            assert!(
                !matches!(Tag::parse(marker.keyword), Tag::Other(_)),
                "{} should be meaningful",
                marker.keyword
            );
        }
        assert!(
            markers
                .iter()
                .any(|m| m.keyword == "lambda_cloud" && m.description == "mark test as lambda specific")
        );
    }

    #[test]
    fn unregistered_keywords_are_reported() {
        let tags = Tags::from(["slow", "autostop", "gcp", "docker"]);
        assert_eq!(tags.unregistered().collect::<Vec<_>>(), vec!["autostop", "docker"]);
    }
}
