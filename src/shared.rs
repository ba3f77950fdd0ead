/*!
An environment that can be used from several threads at once.

Registration may recompile any number of fragments, so it holds an exclusive
lock for the whole cascade. Resolving a fragment that is already compiled
only needs a shared lock, so cache hits run side by side. A miss releases the
shared lock and compiles under the exclusive one.
*/

use std::{collections::BTreeSet, sync::Arc};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;

use crate::{env::Environment, fragment::Fragment, matcher, Result};

static GLOBAL: Lazy<SharedEnvironment> = Lazy::new(SharedEnvironment::default);

/// A cloneable handle to an environment guarded by a read-write lock.
///
/// Clones share the same environment.
#[derive(Debug, Clone, Default)]
pub struct SharedEnvironment {
    inner: Arc<RwLock<Environment>>,
}

impl SharedEnvironment {
    /// Share `env`.
    pub fn new(env: Environment) -> SharedEnvironment {
        SharedEnvironment { inner: Arc::new(RwLock::new(env)) }
    }

    /// Returns the process-wide default environment. It is eager and is
    /// created on first use.
    pub fn global() -> &'static SharedEnvironment {
        &GLOBAL
    }

    /// Register `raw` under `name`. See [`Environment::register`].
    pub fn register(&self, name: &str, raw: &str) -> Result<Fragment> {
        self.inner.write().register(name, raw).map(Fragment::clone)
    }

    /// Returns the expanded pattern of `name`. See [`Environment::resolve`].
    pub fn resolve(&self, name: &str) -> Result<String> {
        if let Some(pattern) = self.inner.read().get(name).and_then(Fragment::pattern) {
            return Ok(pattern.to_string());
        }
        // Another writer may have compiled it in between; resolve re-checks.
        self.inner.write().resolve(name).map(str::to_string)
    }

    /// Returns the full dependency set of `name`. See
    /// [`Environment::dependencies`].
    pub fn dependencies(&self, name: &str) -> Result<BTreeSet<String>> {
        if let Some(deps) = self.inner.read().get(name).and_then(Fragment::dependencies) {
            return Ok(deps.clone());
        }
        self.inner.write().dependencies(name).map(BTreeSet::clone)
    }

    /// Compile the expanded pattern of `name` into a [`Regex`]. The lock is
    /// released before the regex is built.
    pub fn regex(&self, name: &str) -> Result<Regex> {
        Ok(Regex::new(&self.resolve(name)?)?)
    }

    /// Like [`regex`](Self::regex), but only matches entire haystacks.
    pub fn anchored_regex(&self, name: &str) -> Result<Regex> {
        Ok(Regex::new(&matcher::anchored(&self.resolve(name)?))?)
    }

    /// Run `f` with shared access to the environment.
    pub fn read<R>(&self, f: impl FnOnce(&Environment) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access, e.g. to register several fragments
    /// without other threads observing the intermediate states.
    pub fn write<R>(&self, f: impl FnOnce(&mut Environment) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl From<Environment> for SharedEnvironment {
    fn from(env: Environment) -> SharedEnvironment {
        SharedEnvironment::new(env)
    }
}
