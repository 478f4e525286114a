//! Serialization groups for smoke tests.
//!
//! Some providers rate limit their launch API. Tests against such a provider
//! must not run at the same time, so they are put into a shared group that the
//! scheduling harness runs one test at a time.
//!
//! Grouping is built around two traits:
//! - [`TestGrouper`] decides which group a test belongs to
//! - [`TestGroups`] stores the grouped tests
//!
//! [`SerialGrouper`] is the grouper for rate limited providers.

mod grouper;
pub use grouper::*;

mod groups;
pub use groups::*;

mod serial;
pub use serial::*;
