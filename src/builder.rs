/*!
Configuration of an [`Environment`].
*/

use crate::env::Environment;

/// When fragments of an environment are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Compile on registration. Every placeholder must name a fragment
    /// that is already registered.
    Eager,
    /// Compile on the first [`Environment::resolve`]. Placeholders may name
    /// fragments that are registered later.
    Lazy,
}

/// How an expanded fragment is wrapped where its placeholder stood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// `(?:...)`, leaving the capture group numbering of the raw pattern
    /// intact.
    NonCapturing,
    /// `(...)`, so that each expanded fragment can be extracted from a match.
    Capturing,
}

impl Grouping {
    pub(crate) fn open(&self) -> &'static str {
        match self {
            Grouping::NonCapturing => "(?:",
            Grouping::Capturing => "(",
        }
    }
}

/// The configuration of an environment. It is fixed once the environment
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub(crate) mode: Mode,
    pub(crate) group: Grouping,
}

impl Config {
    /// Returns the evaluation mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns how expanded placeholders are grouped.
    pub fn grouping(&self) -> Grouping {
        self.group
    }
}

impl Default for Config {
    fn default() -> Config {
        Config { mode: Mode::Eager, group: Grouping::NonCapturing }
    }
}

/// A builder for configuring an [`Environment`].
///
/// ```
/// use modexp::{Builder, Mode};
///
/// let env = Builder::new().lazy(true).build();
/// assert_eq!(env.mode(), Mode::Lazy);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a builder with the default configuration: eager compilation
    /// and non-capturing groups.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Defer compilation until a fragment is first resolved.
    pub fn lazy(&mut self, yes: bool) -> &mut Builder {
        self.config.mode = if yes { Mode::Lazy } else { Mode::Eager };
        self
    }

    /// Set the evaluation mode directly.
    pub fn mode(&mut self, mode: Mode) -> &mut Builder {
        self.config.mode = mode;
        self
    }

    /// Wrap expanded placeholders in capturing groups instead of
    /// non-capturing ones.
    pub fn capture_groups(&mut self, yes: bool) -> &mut Builder {
        self.config.group = if yes { Grouping::Capturing } else { Grouping::NonCapturing };
        self
    }

    /// Returns the configuration built so far.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Create an empty environment with this configuration.
    pub fn build(&self) -> Environment {
        Environment::with_config(self.config)
    }
}
