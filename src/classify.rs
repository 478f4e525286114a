//! Classification of single tests against a [`RunConfiguration`].
//!
//! A test is classified purely from its [`Tags`] and the configuration. Nothing
//! is carried over from one test to the next, so classifying a list twice, or in
//! a different order, gives the same result for every test.
//!
//! Classification has two independent outputs:
//! - the set of [`SkipReason`]s, produced by the [`SkipRule`]s,
//! - an optional [`SerialGroup`], for tests that hit a rate limited provider.
//!
//! A test can be skipped and grouped at the same time; grouping is only a hint
//! for the scheduler and says nothing about whether the test runs.

use std::{collections::BTreeSet, fmt, time::Duration};

use tracing::trace;

use crate::{
    config::RunConfiguration,
    ignore::IgnoreStatus,
    provider::{Provider, ProviderSet},
    tag::Tags,
};

/// Why a test is skipped.
///
/// The ordering follows [`SkipRule::ALL`], so the first reason of a
/// [`Classification`] comes from the first rule that matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    Slow,
    ExcludedForGeneric(Provider),
    ProviderInactive(Provider),
    ManagedSpotOnly,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Slow => f.write_str("need --runslow option to run"),
            SkipReason::ExcludedForGeneric(provider) => write!(
                f,
                "generic test excluded under current default provider {provider}, \
                 try setting --generic-cloud"
            ),
            SkipReason::ProviderInactive(provider) => write!(
                f,
                "tests for {provider} are skipped, try setting {}",
                provider.flag()
            ),
            SkipReason::ManagedSpotOnly => {
                f.write_str("skipped, because --managed-spot option is set")
            }
        }
    }
}

/// A single skip rule.
///
/// Every rule is a predicate over the configuration and the tags of a test,
/// plus the reasons it adds when the predicate holds. Rules never remove
/// reasons, so their results simply stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipRule {
    /// Slow tests need `--runslow`.
    Slow,

    /// Generic tests tagged `no_<provider>` do not run when that provider is the
    /// generic one.
    GenericExcluded,

    /// Provider specific tests need their provider to be part of the run.
    ProviderMismatch,

    /// With `--managed-spot` only managed spot tests run.
    ManagedSpotOnly,
}

impl SkipRule {
    /// All rules in evaluation order.
    pub const ALL: [SkipRule; 4] = [
        SkipRule::Slow,
        SkipRule::GenericExcluded,
        SkipRule::ProviderMismatch,
        SkipRule::ManagedSpotOnly,
    ];

    pub fn apply(self, config: &RunConfiguration, tags: &Tags, skips: &mut BTreeSet<SkipReason>) {
        match self {
            SkipRule::Slow => {
                if tags.is_slow() && !config.run_slow() {
                    skips.insert(SkipReason::Slow);
                }
            }
            SkipRule::GenericExcluded => {
                let generic = config.generic();
                if tags.is_generic() && tags.excludes(generic) {
                    skips.insert(SkipReason::ExcludedForGeneric(generic));
                }
            }
            SkipRule::ProviderMismatch => skips.extend(
                tags.providers()
                    .iter()
                    .filter(|provider| !config.is_reachable(*provider))
                    .map(SkipReason::ProviderInactive),
            ),
            SkipRule::ManagedSpotOnly => {
                if config.managed_spot_only() && !tags.is_managed_spot() {
                    skips.insert(SkipReason::ManagedSpotOnly);
                }
            }
        }
    }
}

/// A group of tests that must not run concurrently.
///
/// The group only labels the constraint. Mutual exclusion is up to the
/// scheduler that honors the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SerialGroup {
    provider: Provider,
}

impl SerialGroup {
    /// The group for a provider, if that provider is rate limited.
    pub fn for_provider(provider: Provider) -> Option<Self> {
        provider.is_rate_limited().then_some(Self { provider })
    }

    pub fn provider(self) -> Provider {
        self.provider
    }

    pub fn min_launch_interval(self) -> Duration {
        self.provider.launch_interval().unwrap_or_default()
    }
}

impl fmt::Display for SerialGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "serial_{}", self.provider.tag())
    }
}

/// The annotation of a single test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    skips: BTreeSet<SkipReason>,
    serial_group: Option<SerialGroup>,
}

impl Classification {
    pub fn is_skipped(&self) -> bool {
        !self.skips.is_empty()
    }

    pub fn skips(&self) -> impl ExactSizeIterator<Item = &SkipReason> {
        self.skips.iter()
    }

    pub fn first_skip(&self) -> Option<&SkipReason> {
        self.skips.first()
    }

    pub fn serial_group(&self) -> Option<SerialGroup> {
        self.serial_group
    }

    /// Add the annotations of `other` to this one.
    ///
    /// Merging is a set union: merging the same classification again changes
    /// nothing.
    pub fn merge(&mut self, other: &Classification) {
        self.skips.extend(other.skips.iter().copied());
        self.serial_group = self.serial_group.or(other.serial_group);
    }

    /// The skip decision in the form the harness expects.
    pub fn ignore_status(&self) -> IgnoreStatus {
        match self.first_skip() {
            Some(reason) => IgnoreStatus::IgnoreWithReason(reason.to_string().into()),
            None => IgnoreStatus::Run,
        }
    }
}

/// Classifies tests against a resolved configuration.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'c> {
    config: &'c RunConfiguration,
}

impl<'c> Classifier<'c> {
    pub fn new(config: &'c RunConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'c RunConfiguration {
        self.config
    }

    pub fn classify(&self, tags: &Tags) -> Classification {
        let mut skips = BTreeSet::new();
        for rule in SkipRule::ALL {
            rule.apply(self.config, tags, &mut skips);
        }
        let serial_group = self.serial_group(tags);

        trace!(
            %tags,
            skipped = !skips.is_empty(),
            serial_group = ?serial_group.map(|group| group.to_string()),
            "classified test"
        );
        Classification {
            skips,
            serial_group,
        }
    }

    /// The providers a test actually exercises.
    ///
    /// For provider specific tests these are its tagged providers, generic tests
    /// run against the generic provider of the run.
    pub fn effective_providers(&self, tags: &Tags) -> ProviderSet {
        match tags.is_generic() {
            true => ProviderSet::from([self.config.generic()]),
            false => tags.providers(),
        }
    }

    pub fn serial_group(&self, tags: &Tags) -> Option<SerialGroup> {
        self.effective_providers(tags)
            .iter()
            .find_map(SerialGroup::for_provider)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::config::RunFlags;

    fn config(selected: impl Into<ProviderSet>, generic: Provider) -> RunConfiguration {
        RunFlags {
            selected: selected.into(),
            generic,
            ..RunFlags::default()
        }
        .resolve()
    }

    fn skips(config: &RunConfiguration, tags: impl Into<Tags>) -> Vec<SkipReason> {
        Classifier::new(config)
            .classify(&tags.into())
            .skips()
            .copied()
            .collect()
    }

    #[test]
    fn slow_tests_need_runslow() {
        let default = RunConfiguration::default();
        assert_eq!(skips(&default, ["slow"]), vec![SkipReason::Slow]);

        let slow = RunFlags {
            run_slow: true,
            ..RunFlags::default()
        }
        .resolve();
        assert_eq!(skips(&slow, ["slow"]), vec![]);
    }

    #[test]
    fn slow_reason_mentions_the_flag() {
        assert!(SkipReason::Slow.to_string().contains("--runslow"));
    }

    #[test]
    fn generic_tests_check_only_the_generic_provider() {
        let config = RunConfiguration::default();
        assert_eq!(
            skips(&config, ["no_gcp"]),
            vec![SkipReason::ExcludedForGeneric(Provider::Gcp)]
        );
        // azure is active, but generic tests only run on gcp
        assert_eq!(skips(&config, ["no_azure"]), vec![]);
    }

    #[test]
    fn negative_tags_are_ignored_on_provider_specific_tests() {
        let config = RunConfiguration::default();
        assert_eq!(skips(&config, ["gcp", "no_gcp"]), vec![]);
    }

    #[test]
    fn inactive_providers_are_skipped() {
        let config = RunConfiguration::default();
        assert_eq!(
            skips(&config, ["aws"]),
            vec![SkipReason::ProviderInactive(Provider::Aws)]
        );
        assert_eq!(skips(&config, ["azure"]), vec![]);
        assert_eq!(
            skips(&config, ["azure", "aws", "lambda_cloud"]),
            vec![
                SkipReason::ProviderInactive(Provider::Aws),
                SkipReason::ProviderInactive(Provider::Lambda),
            ]
        );
    }

    #[rstest]
    #[case(["cloudflare"], vec![])]
    #[case(["gcp"], vec![])]
    #[case(["azure"], vec![SkipReason::ProviderInactive(Provider::Azure)])]
    fn aggregator_flag_keeps_its_own_tests(
        #[case] tags: [&'static str; 1],
        #[case] expected: Vec<SkipReason>,
    ) {
        let config = config([Provider::Cloudflare], Provider::Gcp);
        assert_eq!(skips(&config, tags), expected);
    }

    #[test]
    fn aggregator_tests_skip_without_the_flag() {
        let config = config([Provider::Gcp], Provider::Gcp);
        assert_eq!(
            skips(&config, ["cloudflare"]),
            vec![SkipReason::ProviderInactive(Provider::Cloudflare)]
        );
    }

    #[test]
    fn managed_spot_only_runs_managed_spot_tests() {
        let config = RunFlags {
            managed_spot: true,
            ..RunFlags::default()
        }
        .resolve();
        assert_eq!(skips(&config, ["gcp"]), vec![SkipReason::ManagedSpotOnly]);
        assert_eq!(skips(&config, ["gcp", "managed_spot"]), vec![]);
    }

    #[test]
    fn reasons_stack_in_rule_order() {
        let config = RunFlags {
            managed_spot: true,
            ..RunFlags::default()
        }
        .resolve();
        let classification = Classifier::new(&config).classify(&Tags::from(["slow", "ibm"]));
        assert_eq!(
            classification.skips().copied().collect::<Vec<_>>(),
            vec![
                SkipReason::Slow,
                SkipReason::ProviderInactive(Provider::Ibm),
                SkipReason::ManagedSpotOnly,
            ]
        );
        assert_eq!(
            classification.ignore_status(),
            IgnoreStatus::IgnoreWithReason("need --runslow option to run".into())
        );
    }

    #[test]
    fn lambda_tests_are_grouped() {
        let config = config([Provider::Lambda, Provider::Aws], Provider::Aws);
        let classifier = Classifier::new(&config);

        let group = classifier.serial_group(&Tags::from(["lambda_cloud"]));
        assert_eq!(group, SerialGroup::for_provider(Provider::Lambda));
        assert_eq!(group.map(|g| g.to_string()).as_deref(), Some("serial_lambda_cloud"));

        assert_eq!(classifier.serial_group(&Tags::from(["aws"])), None);
        // generic tests run on aws here
        assert_eq!(classifier.serial_group(&Tags::new()), None);
    }

    #[test]
    fn generic_tests_are_grouped_when_lambda_is_generic() {
        let config = config([Provider::Lambda], Provider::Lambda);
        let classifier = Classifier::new(&config);
        assert_eq!(
            classifier.serial_group(&Tags::from(["slow"])),
            SerialGroup::for_provider(Provider::Lambda)
        );
        assert_eq!(
            classifier.effective_providers(&Tags::new()),
            ProviderSet::from([Provider::Lambda])
        );
    }

    #[test]
    fn grouped_tests_can_still_be_skipped() {
        let config = RunConfiguration::default();
        let classification = Classifier::new(&config).classify(&Tags::from(["lambda_cloud"]));
        assert!(classification.is_skipped());
        assert_eq!(
            classification.serial_group(),
            SerialGroup::for_provider(Provider::Lambda)
        );
    }

    #[test]
    fn only_rate_limited_providers_get_a_group() {
        for provider in Provider::ALL {
            assert_eq!(
                SerialGroup::for_provider(provider).is_some(),
                provider == Provider::RATE_LIMITED
            );
        }
        let group = SerialGroup::for_provider(Provider::Lambda).expect("lambda is rate limited");
        assert_eq!(group.min_launch_interval(), Duration::from_secs(10));
    }

    #[test]
    fn merging_is_idempotent() {
        let config = RunFlags {
            managed_spot: true,
            ..RunFlags::default()
        }
        .resolve();
        let classification = Classifier::new(&config).classify(&Tags::from(["slow", "lambda_cloud"]));

        let mut merged = Classification::default();
        merged.merge(&classification);
        let once = merged.clone();
        merged.merge(&classification);

        assert_eq!(merged, once);
        assert_eq!(merged, classification);
    }
}
