//! Skip decisions for smoke tests.
//!
//! Ignoring is decided per test. An ignored test still exists in the run: the
//! harness reports it as ignored together with the reason, it just never
//! executes the test body.
//!
//! Implement [`TestIgnore`] to plug a skip strategy into a harness. The crate
//! ships [`ProviderIgnore`], which skips tests that do not fit the resolved
//! [`RunConfiguration`](crate::config::RunConfiguration).

use std::borrow::Cow;

use crate::test::TestMeta;

mod provider;
pub use provider::*;

/// Whether a test runs, and if not, why.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum IgnoreStatus {
    #[default]
    Run,
    Ignore,
    IgnoreWithReason(Cow<'static, str>),
}

impl IgnoreStatus {
    pub fn is_ignored(&self) -> bool {
        !matches!(self, IgnoreStatus::Run)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            IgnoreStatus::IgnoreWithReason(reason) => Some(&**reason),
            _ => None,
        }
    }
}

impl From<bool> for IgnoreStatus {
    fn from(value: bool) -> Self {
        match value {
            true => Self::Ignore,
            false => Self::Run,
        }
    }
}

impl From<&'static str> for IgnoreStatus {
    fn from(value: &'static str) -> Self {
        Self::IgnoreWithReason(value.into())
    }
}

impl From<String> for IgnoreStatus {
    fn from(value: String) -> Self {
        Self::IgnoreWithReason(value.into())
    }
}

/// A strategy deciding whether a test is skipped.
///
/// Strategies are called from whatever thread the harness decides on, so they
/// only get shared access to themselves.
///
/// For one-off rules, `TestIgnore` is implemented for
/// `Fn(&TestMeta<Extra>) -> IgnoreStatus`, so a closure can act as a strategy.
pub trait TestIgnore<Extra> {
    fn ignore(&self, meta: &TestMeta<Extra>) -> IgnoreStatus;
}

impl<Extra, F> TestIgnore<Extra> for F
where
    F: Fn(&TestMeta<Extra>) -> IgnoreStatus,
{
    fn ignore(&self, meta: &TestMeta<Extra>) -> IgnoreStatus {
        self(meta)
    }
}
