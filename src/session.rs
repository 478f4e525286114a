use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::{
    classify::Classifier,
    config::{RunArgs, RunConfiguration},
    error::Result,
    group::SerialGrouper,
    ignore::ProviderIgnore,
    plan::SessionPlan,
    provider::Provider,
    registry::{AllProvidersEnabled, ProviderRegistry},
    scope::{SessionContext, SessionScopeFactory},
    tag::Tags,
    test::TestMeta,
};

/// A smoke test session.
///
/// The session owns the resolved [`RunConfiguration`] and the injected
/// [`ProviderRegistry`], and hands out the strategies a harness plugs in:
///
/// ```
/// use smokeplan::{Session, config::RunArgs, ignore::TestIgnore, tag::Tags, test::TestMeta};
///
/// let args = RunArgs::try_parse_from(["harness", "--aws"]).unwrap();
/// let session = Session::from_args(&args);
///
/// let test = TestMeta::new("launch_on_azure", Tags::from(["azure"]));
/// assert!(session.ignore().ignore(&test).is_ignored());
/// ```
#[derive(Debug, Clone)]
pub struct Session<Registry = AllProvidersEnabled> {
    config: RunConfiguration,
    registry: Registry,
}

impl Session {
    pub fn new(config: RunConfiguration) -> Self {
        Self {
            config,
            registry: AllProvidersEnabled,
        }
    }

    pub fn from_args(args: &RunArgs) -> Self {
        Self::new(args.resolve())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RunConfiguration::default())
    }
}

impl<Registry> Session<Registry> {
    pub fn with_registry<WithRegistry: ProviderRegistry>(
        self,
        registry: WithRegistry,
    ) -> Session<WithRegistry> {
        Session {
            config: self.config,
            registry,
        }
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// The provider generic tests run against in this session.
    pub fn generic_provider(&self) -> Provider {
        self.config.generic()
    }

    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(&self.config)
    }

    pub fn ignore(&self) -> ProviderIgnore<'_> {
        ProviderIgnore::new(self.classifier())
    }

    pub fn grouper(&self) -> SerialGrouper<'_> {
        SerialGrouper::new(self.classifier())
    }

    /// Classify all discovered tests.
    pub fn plan<'t, Extra: AsRef<Tags>>(
        &self,
        tests: &'t [TestMeta<Extra>],
    ) -> SessionPlan<'t, Extra> {
        let classifier = self.classifier();
        let mut unregistered = BTreeSet::new();
        let entries: Vec<_> = tests
            .iter()
            .map(|meta| {
                unregistered.extend(meta.tags().unregistered());
                (meta, classifier.classify(meta.tags()))
            })
            .collect();

        for keyword in unregistered {
            warn!(keyword, "unregistered tag, it has no effect on test selection");
        }

        let plan = SessionPlan { entries };
        info!(
            tests = plan.len(),
            running = plan.running().count(),
            skipped = plan.skipped().count(),
            generic = %self.config.generic(),
            active = %self.config.active(),
            "planned session"
        );
        plan
    }
}

impl<Registry: ProviderRegistry> Session<Registry> {
    /// The context test bodies can query while they run.
    ///
    /// Fails if the registry does not pass its check.
    pub fn context(&self) -> Result<SessionContext> {
        self.registry.check()?;
        Ok(SessionContext {
            generic: self.config.generic(),
            active: self.config.active(),
            enabled: self.registry.enabled_providers(),
            terminate_on_failure: self.config.terminate_on_failure(),
        })
    }

    pub fn scope_factory(&self) -> Result<SessionScopeFactory> {
        self.context().map(SessionScopeFactory::new)
    }
}
