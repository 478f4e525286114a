//! Where a session learns which providers are usable.
//!
//! Which providers actually have working credentials is decided by the
//! provider implementations, not by the planner. A [`Session`](crate::Session)
//! gets a [`ProviderRegistry`] injected instead of reaching for global state,
//! so test setups can swap in [`AllProvidersEnabled`] or a plain
//! [`ProviderSet`].

use crate::{
    error::{Error, Result},
    provider::ProviderSet,
};

/// A source of enabled providers.
///
/// `ProviderRegistry` is implemented for `Fn() -> ProviderSet`, so a closure can
/// act as a registry.
pub trait ProviderRegistry {
    /// Providers that are set up and usable.
    fn enabled_providers(&self) -> ProviderSet;

    /// Validate the registry before a session starts.
    ///
    /// The default implementation fails if no provider is enabled.
    fn check(&self) -> Result<()> {
        match self.enabled_providers().is_empty() {
            true => Err(Error::NoProvidersEnabled),
            false => Ok(()),
        }
    }
}

/// A registry that reports every provider as enabled and never fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllProvidersEnabled;

impl ProviderRegistry for AllProvidersEnabled {
    fn enabled_providers(&self) -> ProviderSet {
        ProviderSet::all()
    }

    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// A fixed set of enabled providers.
impl ProviderRegistry for ProviderSet {
    fn enabled_providers(&self) -> ProviderSet {
        *self
    }
}

impl<F> ProviderRegistry for F
where
    F: Fn() -> ProviderSet,
{
    fn enabled_providers(&self) -> ProviderSet {
        self()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::provider::Provider;

    #[test]
    fn all_providers_enabled_works() {
        assert_eq!(AllProvidersEnabled.enabled_providers(), ProviderSet::all());
        assert_eq!(AllProvidersEnabled.check(), Ok(()));
    }

    #[test]
    fn empty_set_fails_check() {
        assert_eq!(ProviderSet::EMPTY.check(), Err(Error::NoProvidersEnabled));
        assert_eq!(ProviderSet::from([Provider::Ibm]).check(), Ok(()));
    }

    #[test]
    fn closures_are_registries() {
        let registry = || ProviderSet::from([Provider::Aws, Provider::Azure]);
        assert_eq!(
            registry.enabled_providers(),
            ProviderSet::from([Provider::Aws, Provider::Azure])
        );
    }
}
