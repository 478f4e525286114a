//! Test selection and serialization planning for cloud smoke test suites.
//!
//! A smoke test suite exercises many backend providers, but a single run only
//! targets a few of them. This crate decides, for every discovered test, whether
//! it runs in the current session and whether it has to be serialized against
//! other tests because its provider rate limits launches.
//!
//! The pipeline has two steps:
//! 1. [`config`] resolves the command line flags into a [`RunConfiguration`]
//!    once per session.
//! 2. [`classify`] classifies every test from its capability [`tag`]s.
//!
//! The results are handed to a harness through its usual extension points:
//! an [`ignore`] strategy, a [`group`] strategy and a per test [`scope`].
//! [`Session`] ties everything together.
//!
//! [`RunConfiguration`]: config::RunConfiguration

pub mod classify;
pub mod config;
pub mod error;
pub mod plan;
pub mod provider;
pub mod registry;
pub mod tag;

mod strategy;
pub use strategy::*;

mod session;
pub use session::*;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod test_support;

pub mod prelude {
    pub use std::borrow::Cow;

    pub use crate::{
        Session,
        classify::{Classification, Classifier, SerialGroup, SkipReason},
        config::{RunArgs, RunConfiguration, RunFlags},
        group::{SerialGrouper, TestGrouper},
        ignore::{IgnoreStatus, ProviderIgnore, TestIgnore},
        provider::{Provider, ProviderSet},
        scope::{TestScope, TestScopeFactory},
        tag::{Tag, Tags},
        test::TestMeta,
    };
}
