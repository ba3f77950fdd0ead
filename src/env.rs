/*!
The namespace that owns fragments and keeps their expansions current.
*/

use std::collections::{BTreeSet, HashMap};

use crate::{
    builder::{Builder, Config, Mode},
    compiler::Compiler,
    fragment::{Compiled, Fragment},
    placeholder, Error, Result,
};

/// A namespace of fragments.
///
/// An environment owns every fragment registered in it. Fragments refer to
/// each other by name, and a name always resolves to the fragment most
/// recently registered under it.
///
/// Whether fragments are compiled on registration or on first use is fixed
/// by the environment's [`Mode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    fragments: HashMap<String, Fragment>,
    config: Config,
}

impl Environment {
    /// Create an empty eager environment.
    pub fn new() -> Environment {
        Environment::default()
    }

    /// Create an empty lazy environment.
    pub fn lazy() -> Environment {
        Builder::new().lazy(true).build()
    }

    /// Returns a builder for a custom configuration.
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn with_config(config: Config) -> Environment {
        Environment { fragments: HashMap::new(), config }
    }

    /// Returns this environment's configuration.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Returns this environment's evaluation mode.
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Register `raw` under `name`, replacing any fragment of that name.
    ///
    /// In an eager environment the new fragment is compiled immediately and
    /// every fragment that depends on `name` is recompiled. If any of that
    /// fails, the previous fragment is restored and no cached pattern
    /// changes.
    ///
    /// In a lazy environment nothing is compiled. The cached patterns of
    /// fragments that depend on `name` are dropped and recomputed the next
    /// time they are resolved.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidName`] if `name` does not match `[A-Za-z0-9_.-]+`.
    /// In an eager environment, [`Error::UnknownFragment`] if `raw` refers
    /// to a fragment that is not registered, and [`Error::CycleDetected`]
    /// if the new definition would make `name` depend on itself.
    pub fn register(&mut self, name: &str, raw: &str) -> Result<&Fragment> {
        if !placeholder::is_valid_name(name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        let previous = self.fragments.insert(name.to_string(), Fragment::new(name, raw));
        debug!(
            "{} fragment '{}' as {:?}",
            if previous.is_some() { "redefining" } else { "registering" },
            name,
            raw
        );
        match self.config.mode {
            Mode::Lazy => {
                let dropped = self.invalidate_dependents(name);
                if dropped > 0 {
                    debug!("dropped {} cached dependent(s) of '{}'", dropped, name);
                }
            }
            Mode::Eager => {
                if let Err(err) = self.recompile(name) {
                    debug!("rejected '{}': {}", name, err);
                    match previous {
                        Some(fragment) => self.fragments.insert(name.to_string(), fragment),
                        None => self.fragments.remove(name),
                    };
                    return Err(err);
                }
            }
        }
        self.get(name).ok_or_else(|| Error::UnknownFragment(name.to_string()))
    }

    /// Returns the expanded pattern of `name`, compiling it first if needed.
    ///
    /// Repeated calls without an intervening [`register`](Self::register)
    /// return the same string.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFragment`] if `name`, or a fragment it refers to, is
    /// not registered. [`Error::CycleDetected`] if compiling `name` runs
    /// into a cycle, which can only happen in a lazy environment. Nothing
    /// is cached when compilation fails.
    pub fn resolve(&mut self, name: &str) -> Result<&str> {
        Ok(&self.ensure_compiled(name)?.pattern)
    }

    /// Returns every fragment `name` depends on, directly or transitively,
    /// compiling it first if needed.
    ///
    /// # Errors
    ///
    /// The same as [`resolve`](Self::resolve).
    pub fn dependencies(&mut self, name: &str) -> Result<&BTreeSet<String>> {
        Ok(&self.ensure_compiled(name)?.dependencies)
    }

    /// Returns the names of the compiled fragments that depend on `name`,
    /// sorted.
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fragments
            .values()
            .filter(|f| f.depends_on(name))
            .map(Fragment::name)
            .collect();
        names.sort_unstable();
        names
    }

    /// Returns the fragment registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.fragments.get(name)
    }

    /// Returns true if a fragment is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fragments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns an iterator over the registered fragments in no particular
    /// order.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> + '_ {
        self.fragments.values()
    }

    /// Returns the number of registered fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn ensure_compiled(&mut self, name: &str) -> Result<&Compiled> {
        let fragment = self.get(name).ok_or_else(|| Error::UnknownFragment(name.to_string()))?;
        if !fragment.is_compiled() {
            let staged = {
                let mut compiler = Compiler::new(&self.fragments, self.config.group);
                compiler.compile(name)?;
                compiler.finish()
            };
            self.commit(staged);
        }
        self.get(name)
            .and_then(Fragment::compiled)
            .ok_or_else(|| Error::UnknownFragment(name.to_string()))
    }

    /// Compile `name` and everything that depends on it, ignoring cached
    /// patterns, and commit the results only if all of them succeed.
    fn recompile(&mut self, name: &str) -> Result<()> {
        let dependents: Vec<String> =
            self.dependents(name).into_iter().map(String::from).collect();
        let staged = {
            let mut compiler = Compiler::new(&self.fragments, self.config.group);
            compiler.force(name);
            for dependent in &dependents {
                compiler.force(dependent);
            }
            compiler.compile(name)?;
            for dependent in &dependents {
                compiler.compile(dependent)?;
            }
            compiler.finish()
        };
        if !dependents.is_empty() {
            debug!("propagated '{}' to {:?}", name, dependents);
        }
        self.commit(staged);
        Ok(())
    }

    fn commit(&mut self, staged: HashMap<String, Compiled>) {
        for (name, compiled) in staged {
            if let Some(fragment) = self.fragments.get_mut(&name) {
                fragment.set_compiled(compiled);
            }
        }
    }

    fn invalidate_dependents(&mut self, name: &str) -> usize {
        let mut dropped = 0;
        for fragment in self.fragments.values_mut() {
            if fragment.depends_on(name) {
                fragment.invalidate();
                dropped += 1;
            }
        }
        dropped
    }
}
