//! Fragments and their cached expansions.

use std::collections::BTreeSet;

use crate::placeholder;

/// The cached result of compiling a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    /// The fully expanded pattern.
    pub pattern: String,
    /// Every fragment reachable through placeholders, directly or
    /// transitively. Never contains the fragment's own name.
    pub dependencies: BTreeSet<String>,
}

/// A named fragment registered in an environment.
///
/// Fragments refer to each other by name only. A lookup always goes through
/// the owning environment's current mapping, so replacing a fragment never
/// leaves a stale reference behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    name: String,
    raw: String,
    compiled: Option<Compiled>,
}

impl Fragment {
    pub(crate) fn new(name: &str, raw: &str) -> Fragment {
        Fragment { name: name.to_string(), raw: raw.to_string(), compiled: None }
    }

    /// Returns the fragment's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the pattern exactly as it was registered.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the names this fragment's raw pattern refers to directly,
    /// in order of first appearance.
    pub fn references(&self) -> Vec<&str> {
        let mut names: Vec<&str> = vec![];
        for name in placeholder::references(&self.raw) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Returns the expanded pattern, or `None` if the fragment has not been
    /// compiled since it (or one of its dependencies) was last registered.
    pub fn pattern(&self) -> Option<&str> {
        self.compiled.as_ref().map(|c| c.pattern.as_str())
    }

    /// Returns the full dependency set, if the fragment is compiled.
    pub fn dependencies(&self) -> Option<&BTreeSet<String>> {
        self.compiled.as_ref().map(|c| &c.dependencies)
    }

    /// Returns true if the fragment's cached pattern is current.
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// Returns true if the cached dependency set contains `name`.
    pub fn depends_on(&self, name: &str) -> bool {
        self.compiled.as_ref().map_or(false, |c| c.dependencies.contains(name))
    }

    pub(crate) fn compiled(&self) -> Option<&Compiled> {
        self.compiled.as_ref()
    }

    pub(crate) fn set_compiled(&mut self, compiled: Compiled) {
        self.compiled = Some(compiled);
    }

    pub(crate) fn invalidate(&mut self) {
        self.compiled = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncompiled() {
        let frag = Fragment::new("rational", r"~<integer>\.~<natural>");
        assert_eq!(frag.name(), "rational");
        assert_eq!(frag.raw(), r"~<integer>\.~<natural>");
        assert!(!frag.is_compiled());
        assert_eq!(frag.pattern(), None);
        assert_eq!(frag.dependencies(), None);
    }

    #[test]
    fn direct_references_are_deduplicated() {
        let frag = Fragment::new("expr", r"~<number>\s?~<operator>\s?~<number>");
        assert_eq!(frag.references(), vec!["number", "operator"]);
    }

    #[test]
    fn invalidation_drops_pattern_and_dependencies() {
        let mut frag = Fragment::new("expr", "~<number>");
        frag.set_compiled(Compiled {
            pattern: r"(?:\d+)".to_string(),
            dependencies: ["number".to_string()].into_iter().collect(),
        });
        assert!(frag.depends_on("number"));
        assert_eq!(frag.pattern(), Some(r"(?:\d+)"));

        frag.invalidate();
        assert!(!frag.depends_on("number"));
        assert!(!frag.is_compiled());
    }
}
