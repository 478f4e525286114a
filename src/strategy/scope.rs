//! Per test access to the session.
//!
//! Test bodies sometimes need to know what the session decided, most of all
//! which provider generic tests run against, so they can adapt instead of
//! hard coding one. The harness calls the hooks of a [`TestScope`] right before
//! and after every test; [`SessionScope`] uses them to make the
//! [`SessionContext`] available through [`current`] and [`generic_provider`].
//!
//! The context lives in a thread local. Every worker thread of a parallel
//! harness only sees the context of the test it is currently running.

use std::{cell::Cell, marker::PhantomData};

use crate::{
    provider::{Provider, ProviderSet},
    test::TestMeta,
};

/// Per test lifecycle hooks.
///
/// A scope instance is created for a single test and is used for both the
/// [`before_test`](Self::before_test) and [`after_test`](Self::after_test) call
/// of that test.
pub trait TestScope<'t, Extra> {
    /// Called right before the test is executed.
    fn before_test(&mut self, meta: &'t TestMeta<Extra>) {
        let _ = meta;
    }

    /// Called right after the test finished executing.
    fn after_test(&mut self, meta: &'t TestMeta<Extra>) {
        let _ = meta;
    }
}

/// Factory for creating [`TestScope`] instances, one per test.
pub trait TestScopeFactory<'t, Extra> {
    /// The scope type produced by this factory.
    ///
    /// The returned scope may borrow from the factory.
    type Scope<'f>: TestScope<'t, Extra> + 'f
    where
        't: 'f,
        Self: 'f;

    /// Create a new scope instance for a single test.
    fn make_scope<'f>(&'f self) -> Self::Scope<'f>
    where
        't: 'f;
}

/// What a running test can learn about its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    /// The provider generic tests run against.
    pub generic: Provider,

    /// Providers selected for this run.
    pub active: ProviderSet,

    /// Providers the injected registry reports as usable.
    pub enabled: ProviderSet,

    /// Whether tests should tear down their resources when they fail.
    pub terminate_on_failure: bool,
}

impl SessionContext {
    /// Make this context current on this thread until the guard is dropped.
    pub fn enter(&self) -> SessionContextGuard {
        let previous = CURRENT.replace(Some(*self));
        SessionContextGuard {
            previous,
            _not_send: PhantomData,
        }
    }
}

thread_local! {
    static CURRENT: Cell<Option<SessionContext>> = const { Cell::new(None) };
}

/// Restores the previously current context when dropped.
#[derive(Debug)]
pub struct SessionContextGuard {
    previous: Option<SessionContext>,
    // the guard is bound to the thread whose thread local it changed
    _not_send: PhantomData<*const ()>,
}

impl Drop for SessionContextGuard {
    fn drop(&mut self) {
        CURRENT.set(self.previous.take());
    }
}

/// The context of the session the current test runs in.
///
/// Returns `None` outside of a [`SessionScope`] or [`SessionContext::enter`].
pub fn current() -> Option<SessionContext> {
    CURRENT.get()
}

/// The provider generic tests of the current session run against.
pub fn generic_provider() -> Option<Provider> {
    current().map(|context| context.generic)
}

/// A [`TestScope`] that makes the session context current during a test.
#[derive(Debug)]
pub struct SessionScope<'f> {
    context: &'f SessionContext,
    guard: Option<SessionContextGuard>,
}

impl<'t, Extra> TestScope<'t, Extra> for SessionScope<'_> {
    fn before_test(&mut self, _: &'t TestMeta<Extra>) {
        self.guard = Some(self.context.enter());
    }

    fn after_test(&mut self, _: &'t TestMeta<Extra>) {
        self.guard = None;
    }
}

/// A [`TestScopeFactory`] producing [`SessionScope`]s for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionScopeFactory {
    context: SessionContext,
}

impl SessionScopeFactory {
    pub fn new(context: SessionContext) -> Self {
        Self { context }
    }
}

impl<'t, Extra> TestScopeFactory<'t, Extra> for SessionScopeFactory {
    type Scope<'f>
        = SessionScope<'f>
    where
        't: 'f,
        Self: 'f;

    fn make_scope<'f>(&'f self) -> Self::Scope<'f>
    where
        't: 'f,
    {
        SessionScope {
            context: &self.context,
            guard: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{tag::Tags, test_support::*};

    fn context(generic: Provider) -> SessionContext {
        SessionContext {
            generic,
            active: ProviderSet::from([generic]),
            enabled: ProviderSet::all(),
            terminate_on_failure: false,
        }
    }

    #[test]
    fn scope_exposes_generic_provider_during_test() {
        let meta = test! {name: "adapts_to_generic"};
        let factory = SessionScopeFactory::new(context(Provider::Azure));

        assert_eq!(generic_provider(), None);
        let mut scope = TestScopeFactory::<Tags>::make_scope(&factory);
        scope.before_test(&meta);
        assert_eq!(generic_provider(), Some(Provider::Azure));
        scope.after_test(&meta);
        assert_eq!(generic_provider(), None);
    }

    #[test]
    fn guards_nest() {
        let outer = context(Provider::Gcp).enter();
        {
            let _inner = context(Provider::Lambda).enter();
            assert_eq!(generic_provider(), Some(Provider::Lambda));
        }
        assert_eq!(generic_provider(), Some(Provider::Gcp));
        drop(outer);
        assert_eq!(current(), None);
    }

    #[test]
    fn context_is_thread_local() {
        let _guard = context(Provider::Scp).enter();
        let other = thread::spawn(generic_provider).join().expect("thread should not panic");
        assert_eq!(other, None);
        assert_eq!(generic_provider(), Some(Provider::Scp));
    }
}
