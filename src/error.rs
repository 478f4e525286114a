use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("unknown provider {0:?}, expected one of: {expected}", expected = crate::provider::Provider::names())]
    UnknownProvider(String),

    #[error("no provider is enabled in the provider registry")]
    NoProvidersEnabled,
}
