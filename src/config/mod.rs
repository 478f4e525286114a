//! Run configuration for a smoke test session.
//!
//! The configuration is resolved exactly once per session from the raw flags
//! ([`RunFlags`], usually produced by [`RunArgs`]) and is read-only afterwards.
//! Resolving never fails: every flag combination is valid input, and a
//! requested default provider that is not part of the run is replaced by a
//! deterministic substitute instead of being rejected.

use tracing::{debug, warn};

use crate::provider::{Provider, ProviderSet};

mod args;
pub use args::*;

/// The raw flag set of a run, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFlags {
    /// Providers whose selection flag was set, may include the aggregator.
    pub selected: ProviderSet,

    /// The requested provider for generic tests.
    pub generic: Provider,

    pub run_slow: bool,
    pub managed_spot: bool,
    pub terminate_on_failure: bool,
}

impl Default for RunFlags {
    fn default() -> Self {
        Self {
            selected: ProviderSet::EMPTY,
            generic: Provider::DEFAULT_PAIR[0],
            run_slow: false,
            managed_spot: false,
            terminate_on_failure: false,
        }
    }
}

impl RunFlags {
    pub fn resolve(&self) -> RunConfiguration {
        RunConfiguration::resolve(self)
    }
}

/// The normalized, immutable configuration of a run.
///
/// Fields are private to keep the invariants intact:
/// the active set is never empty and always contains the generic provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    active: ProviderSet,
    generic: Provider,
    aggregator_selected: bool,
    run_slow: bool,
    managed_spot_only: bool,
    terminate_on_failure: bool,
}

impl RunConfiguration {
    pub fn resolve(flags: &RunFlags) -> Self {
        let active = match flags.selected.is_empty() {
            true => ProviderSet::default_pair(),
            false => flags
                .selected
                .iter()
                .map(Provider::selection_target)
                .collect(),
        };

        let generic = match active.contains(flags.generic) {
            true => flags.generic,
            false => {
                let fallback = active.first().unwrap_or(Provider::DEFAULT_PAIR[0]);
                warn!(
                    requested = %flags.generic,
                    %fallback,
                    "generic provider is not part of this run, falling back"
                );
                fallback
            }
        };

        let config = Self {
            active,
            generic,
            aggregator_selected: flags.selected.contains(Provider::AGGREGATOR),
            run_slow: flags.run_slow,
            managed_spot_only: flags.managed_spot,
            terminate_on_failure: flags.terminate_on_failure,
        };
        debug!(
            active = %config.active,
            generic = %config.generic,
            run_slow = config.run_slow,
            managed_spot_only = config.managed_spot_only,
            "resolved run configuration"
        );
        config
    }

    /// Providers tests may run against in this session.
    pub fn active(&self) -> ProviderSet {
        self.active
    }

    /// The provider generic tests run against.
    pub fn generic(&self) -> Provider {
        self.generic
    }

    /// Whether the aggregator flag was given.
    ///
    /// The aggregator never shows up in [`Self::active`], this keeps track of
    /// the request itself.
    pub fn aggregator_selected(&self) -> bool {
        self.aggregator_selected
    }

    pub fn run_slow(&self) -> bool {
        self.run_slow
    }

    pub fn managed_spot_only(&self) -> bool {
        self.managed_spot_only
    }

    /// Not evaluated by the planner, only passed along to test bodies.
    pub fn terminate_on_failure(&self) -> bool {
        self.terminate_on_failure
    }

    /// Whether tests tagged for `provider` can run in this session.
    pub fn is_reachable(&self, provider: Provider) -> bool {
        self.active.contains(provider) || (provider.is_aggregator() && self.aggregator_selected)
    }
}

impl Default for RunConfiguration {
    fn default() -> Self {
        RunFlags::default().resolve()
    }
}
