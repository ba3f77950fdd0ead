/*!
The resolution engine: expands placeholders into a self-contained pattern.

A [`Compiler`] borrows the fragment map of an environment and never mutates
it. Every pattern it computes is kept in a staging area that the environment
commits only once the whole operation has succeeded. A registration that
fails half way through propagation therefore leaves nothing behind.
*/

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{
    builder::Grouping,
    fragment::{Compiled, Fragment},
    placeholder::{Piece, Pieces},
    Error, Result,
};

/// Compiles fragments against a read-only view of an environment.
#[derive(Debug)]
pub(crate) struct Compiler<'e> {
    fragments: &'e HashMap<String, Fragment>,
    group: Grouping,
    /// Names whose cached pattern must not be trusted.
    stale: HashSet<String>,
    staged: HashMap<String, Compiled>,
    /// Fragments currently being expanded, outermost first.
    stack: Vec<String>,
}

impl<'e> Compiler<'e> {
    /// Create a compiler over `fragments`, wrapping expanded placeholders
    /// according to `group`.
    pub(crate) fn new(fragments: &'e HashMap<String, Fragment>, group: Grouping) -> Compiler<'e> {
        Compiler {
            fragments,
            group,
            stale: HashSet::new(),
            staged: HashMap::new(),
            stack: vec![],
        }
    }

    /// Recompile `name` even if it has a cached pattern.
    pub(crate) fn force(&mut self, name: &str) -> &mut Compiler<'e> {
        self.stale.insert(name.to_string());
        self
    }

    /// Compile `name`, reusing cached and staged results where they are
    /// still valid.
    ///
    /// Fails with [`Error::UnknownFragment`] if `name` or anything it
    /// refers to is not registered, and with [`Error::CycleDetected`] if
    /// the expansion reaches a fragment that is already being expanded.
    /// The error names the fragment that closes the cycle.
    pub(crate) fn compile(&mut self, name: &str) -> Result<&Compiled> {
        if self.staged.contains_key(name) {
            return Ok(&self.staged[name]);
        }
        let fragments = self.fragments;
        let fragment = fragments
            .get(name)
            .ok_or_else(|| Error::UnknownFragment(name.to_string()))?;
        if !self.stale.contains(name) {
            if let Some(compiled) = fragment.compiled() {
                return Ok(compiled);
            }
        }
        if self.stack.iter().any(|n| n == name) {
            debug!("cycle through '{}' (expanding {:?})", name, self.stack);
            return Err(Error::CycleDetected(name.to_string()));
        }

        self.stack.push(name.to_string());
        let result = self.expand(fragment);
        self.stack.pop();
        let compiled = result?;
        if compiled.dependencies.contains(name) {
            return Err(Error::CycleDetected(name.to_string()));
        }
        trace!("compiled '{}' to {:?}", name, compiled.pattern);
        self.staged.insert(name.to_string(), compiled);
        Ok(&self.staged[name])
    }

    /// Consume the compiler, returning every pattern it computed.
    pub(crate) fn finish(self) -> HashMap<String, Compiled> {
        self.staged
    }

    fn expand(&mut self, fragment: &Fragment) -> Result<Compiled> {
        let open = self.group.open();
        let mut pattern = String::with_capacity(fragment.raw().len());
        let mut dependencies = BTreeSet::new();
        for piece in Pieces::new(fragment.raw()) {
            match piece {
                Piece::Literal(text) => pattern.push_str(text),
                Piece::Reference(reference) => {
                    let sub = self.compile(reference)?;
                    pattern.push_str(open);
                    pattern.push_str(&sub.pattern);
                    pattern.push(')');
                    dependencies.extend(sub.dependencies.iter().cloned());
                    dependencies.insert(reference.to_string());
                }
            }
        }
        Ok(Compiled { pattern, dependencies })
    }
}
