use std::ffi::OsString;

use clap::{Args, Command, FromArgMatches};

use crate::{
    config::{RunConfiguration, RunFlags},
    provider::{Provider, ProviderSet},
};

/// Command line flags of a smoke test run.
///
/// Meant to be flattened into the parser of the harness binary:
///
/// ```
/// use clap::Parser;
/// use smokeplan::config::RunArgs;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     run: RunArgs,
/// }
///
/// let cli = Cli::parse_from(["harness", "--aws", "--generic-cloud", "aws"]);
/// assert_eq!(cli.run.resolve().generic().name(), "aws");
/// ```
///
/// Without any provider flag only the default pair (GCP and Azure) is tested.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct RunArgs {
    /// Run slow tests.
    #[arg(long)]
    pub runslow: bool,

    /// Only run AWS tests.
    #[arg(long)]
    pub aws: bool,

    /// Only run GCP tests.
    #[arg(long)]
    pub gcp: bool,

    /// Only run AZURE tests.
    #[arg(long)]
    pub azure: bool,

    /// Only run LAMBDA tests.
    #[arg(long)]
    pub lambda: bool,

    /// Only run CLOUDFLARE tests.
    #[arg(long)]
    pub cloudflare: bool,

    /// Only run IBM tests.
    #[arg(long)]
    pub ibm: bool,

    /// Only run SCP tests.
    #[arg(long)]
    pub scp: bool,

    /// Only run tests for managed spot.
    #[arg(long)]
    pub managed_spot: bool,

    /// Cloud to use for generic tests. If the generic cloud is not within the
    /// clouds to be run, it will be reset to the first cloud in the list of the
    /// clouds to be run.
    #[arg(long, value_enum, default_value_t = Provider::DEFAULT_PAIR[0])]
    pub generic_cloud: Provider,

    /// Terminate test VMs on failure.
    #[arg(long)]
    pub terminate_on_failure: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            runslow: false,
            aws: false,
            gcp: false,
            azure: false,
            lambda: false,
            cloudflare: false,
            ibm: false,
            scp: false,
            managed_spot: false,
            generic_cloud: Provider::DEFAULT_PAIR[0],
            terminate_on_failure: false,
        }
    }
}

impl RunArgs {
    /// Parse only the run flags, rejecting anything else.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let command = RunArgs::augment_args(Command::new(env!("CARGO_PKG_NAME")));
        let matches = command.try_get_matches_from(args)?;
        RunArgs::from_arg_matches(&matches)
    }

    pub fn is_selected(&self, provider: Provider) -> bool {
        match provider {
            Provider::Aws => self.aws,
            Provider::Gcp => self.gcp,
            Provider::Azure => self.azure,
            Provider::Lambda => self.lambda,
            Provider::Cloudflare => self.cloudflare,
            Provider::Ibm => self.ibm,
            Provider::Scp => self.scp,
        }
    }

    /// Providers whose selection flag is set, as given.
    pub fn selected(&self) -> ProviderSet {
        Provider::ALL
            .into_iter()
            .filter(|provider| self.is_selected(*provider))
            .collect()
    }

    pub fn flags(&self) -> RunFlags {
        RunFlags::from(self)
    }

    pub fn resolve(&self) -> RunConfiguration {
        self.flags().resolve()
    }
}

impl From<&RunArgs> for RunFlags {
    fn from(value: &RunArgs) -> Self {
        RunFlags {
            selected: value.selected(),
            generic: value.generic_cloud,
            run_slow: value.runslow,
            managed_spot: value.managed_spot,
            terminate_on_failure: value.terminate_on_failure,
        }
    }
}
