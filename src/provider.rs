//! The closed set of backend providers a smoke test can exercise.
//!
//! Every provider has three spellings:
//! - its canonical [name](Provider::name), used for `--generic-cloud`,
//! - its [selection flag](Provider::flag), the command line switch that activates it,
//! - its [capability tag](Provider::tag), the keyword a test carries to say it is
//!   specific to that provider.
//!
//! Flag and tag usually match the name, but not always. `lambda` is a reserved
//! word in a lot of tag syntaxes, so tests for it are tagged `lambda_cloud`.

use std::{fmt, iter::FusedIterator, str::FromStr, time::Duration};

use crate::error::Error;

/// A backend provider.
///
/// The declaration order is significant: it is the iteration order of every
/// [`ProviderSet`] and therefore the tie-break when a default has to be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Provider {
    Aws,
    Gcp,
    Azure,
    Lambda,
    Cloudflare,
    Ibm,
    Scp,
}

impl Provider {
    /// All providers in declaration order.
    pub const ALL: [Provider; 7] = [
        Provider::Aws,
        Provider::Gcp,
        Provider::Azure,
        Provider::Lambda,
        Provider::Cloudflare,
        Provider::Ibm,
        Provider::Scp,
    ];

    /// The providers a run uses when no selection flag is given.
    pub const DEFAULT_PAIR: [Provider; 2] = [Provider::Gcp, Provider::Azure];

    /// The provider that only gives indirect access to another one.
    pub const AGGREGATOR: Provider = Provider::Cloudflare;

    /// The provider whose launch API is rate limited.
    pub const RATE_LIMITED: Provider = Provider::Lambda;

    pub const fn name(self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Gcp => "gcp",
            Provider::Azure => "azure",
            Provider::Lambda => "lambda",
            Provider::Cloudflare => "cloudflare",
            Provider::Ibm => "ibm",
            Provider::Scp => "scp",
        }
    }

    pub const fn flag(self) -> &'static str {
        match self {
            Provider::Aws => "--aws",
            Provider::Gcp => "--gcp",
            Provider::Azure => "--azure",
            Provider::Lambda => "--lambda",
            Provider::Cloudflare => "--cloudflare",
            Provider::Ibm => "--ibm",
            Provider::Scp => "--scp",
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Provider::Lambda => "lambda_cloud",
            other => other.name(),
        }
    }

    /// The negative tag that keeps a generic test away from this provider.
    pub const fn excluded_tag(self) -> &'static str {
        match self {
            Provider::Aws => "no_aws",
            Provider::Gcp => "no_gcp",
            Provider::Azure => "no_azure",
            Provider::Lambda => "no_lambda_cloud",
            Provider::Cloudflare => "no_cloudflare",
            Provider::Ibm => "no_ibm",
            Provider::Scp => "no_scp",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Provider> {
        Provider::ALL.into_iter().find(|p| p.tag() == tag)
    }

    pub fn from_excluded_tag(tag: &str) -> Option<Provider> {
        Provider::ALL.into_iter().find(|p| p.excluded_tag() == tag)
    }

    pub const fn is_aggregator(self) -> bool {
        matches!(self, Provider::Cloudflare)
    }

    /// The provider that actually gets activated when this one is selected.
    ///
    /// The aggregator is not schedulable on its own, selecting it activates
    /// the first provider of the default pair.
    pub const fn selection_target(self) -> Provider {
        match self.is_aggregator() {
            true => Provider::DEFAULT_PAIR[0],
            false => self,
        }
    }

    /// Minimum time between two launches against this provider, if enforced.
    pub const fn launch_interval(self) -> Option<Duration> {
        match self {
            Provider::Lambda => Some(Duration::from_secs(10)),
            _ => None,
        }
    }

    pub const fn is_rate_limited(self) -> bool {
        self.launch_interval().is_some()
    }

    /// Comma separated list of all provider names, used in messages.
    pub fn names() -> String {
        Provider::ALL.map(Provider::name).join(", ")
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::UnknownProvider(s.to_string()))
    }
}

/// A set of providers.
///
/// Iteration always follows the declaration order of [`Provider`], no matter
/// in which order providers were inserted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProviderSet(u8);

impl ProviderSet {
    pub const EMPTY: ProviderSet = ProviderSet(0);

    pub const fn new() -> Self {
        Self::EMPTY
    }

    pub const fn all() -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < Provider::ALL.len() {
            set = set.with(Provider::ALL[i]);
            i += 1;
        }
        set
    }

    pub const fn default_pair() -> Self {
        Self::EMPTY
            .with(Provider::DEFAULT_PAIR[0])
            .with(Provider::DEFAULT_PAIR[1])
    }

    #[must_use]
    pub const fn with(self, provider: Provider) -> Self {
        Self(self.0 | provider.bit())
    }

    /// Insert a provider, returns whether it was newly added.
    pub fn insert(&mut self, provider: Provider) -> bool {
        let added = !self.contains(provider);
        self.0 |= provider.bit();
        added
    }

    pub const fn contains(self, provider: Provider) -> bool {
        self.0 & provider.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// The first member in declaration order.
    pub fn first(self) -> Option<Provider> {
        self.iter().next()
    }

    pub fn iter(self) -> Iter {
        Iter {
            set: self,
            index: 0,
        }
    }
}

impl fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ProviderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, provider) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(provider.name())?;
        }
        Ok(())
    }
}

impl FromIterator<Provider> for ProviderSet {
    fn from_iter<T: IntoIterator<Item = Provider>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        set.extend(iter);
        set
    }
}

impl Extend<Provider> for ProviderSet {
    fn extend<T: IntoIterator<Item = Provider>>(&mut self, iter: T) {
        for provider in iter {
            self.insert(provider);
        }
    }
}

impl<const N: usize> From<[Provider; N]> for ProviderSet {
    fn from(value: [Provider; N]) -> Self {
        value.into_iter().collect()
    }
}

impl IntoIterator for ProviderSet {
    type Item = Provider;
    type IntoIter = Iter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`ProviderSet`] in declaration order.
#[derive(Debug, Clone)]
pub struct Iter {
    set: ProviderSet,
    index: usize,
}

impl Iterator for Iter {
    type Item = Provider;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&provider) = Provider::ALL.get(self.index) {
            self.index += 1;
            if self.set.contains(provider) {
                return Some(provider);
            }
        }
        None
    }
}

impl FusedIterator for Iter {}
