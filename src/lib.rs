/*!
Modular regular expressions.

This crate composes regular expressions out of named, reusable fragments. A
fragment's raw pattern may refer to another fragment of the same
[`Environment`] with a placeholder of the form `~<name>`. Placeholders are
expanded recursively into one self-contained pattern string that can be handed
to any ordinary regex engine.

The crate does not parse regex syntax. Everything outside of placeholders is
passed through untouched, and malformed patterns are only noticed once the
expanded string reaches a matcher (see [`Environment::regex`]).

# Example

```
use modexp::Environment;

let mut env = Environment::new();
env.register("natural", r"\d+")?;
env.register("positive_rational", r"~<natural>\.~<natural>")?;

assert_eq!(env.resolve("positive_rational")?, r"(?:\d+)\.(?:\d+)");
assert!(env.is_full_match("positive_rational", "34.23")?);
assert!(!env.is_full_match("positive_rational", ".23")?);
# Ok::<(), modexp::Error>(())
```

# Redefinition

Registering a name again replaces the fragment and recompiles everything that
depends on it, directly or transitively:

```
use modexp::Environment;

let mut env = Environment::new();
env.register("number", r"-?\d+(\.\d+)?")?;
env.register("operator", r"\+|-|/|\*")?;
env.register("expr", r"~<number>\s?~<operator>\s?~<number>")?;
env.register("number", r"\d+")?;

assert!(env.is_full_match("expr", "34*23")?);
assert!(!env.is_full_match("expr", "34.2 * 234")?);
# Ok::<(), modexp::Error>(())
```

A registration that would make a fragment depend on itself is rejected with
[`Error::CycleDetected`] and leaves the environment exactly as it was.

# Eager and lazy environments

An eager environment ([`Environment::new`]) compiles every fragment as soon as
it is registered, so every placeholder must refer to a fragment that already
exists. A lazy environment ([`Environment::lazy`]) defers compilation until
[`Environment::resolve`] is called, which permits forward references.

Compilation and cycle checks are only reachable through an environment:

```compile_fail
use modexp::compiler::Compiler;
```

# Crate features

* **std** - Always required.
* **logging** - Emits registration, compilation and propagation events via
  the [`log`](https://docs.rs/log) crate.
*/

#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[macro_use]
mod macros;

pub mod builder;
mod compiler;
pub mod env;
pub mod fragment;
pub mod matcher;
pub mod placeholder;
pub mod shared;

pub use builder::{Builder, Config, Grouping, Mode};
pub use env::Environment;
pub use fragment::{Compiled, Fragment};
pub use shared::SharedEnvironment;

/// The result of any fallible operation on an environment.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while registering or resolving fragments.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A placeholder or a direct lookup named a fragment that is not
    /// registered in the environment.
    UnknownFragment(String),
    /// Committing the fragment would make it depend on itself.
    CycleDetected(String),
    /// The name does not match `[A-Za-z0-9_.-]+`.
    InvalidName(String),
    /// The expanded pattern was rejected by the regex engine.
    Regex(regex::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownFragment(name) => write!(f, "unknown fragment '{}'", name),
            Error::CycleDetected(name) => {
                write!(f, "fragment '{}' depends on itself", name)
            }
            Error::InvalidName(name) => write!(f, "invalid fragment name '{}'", name),
            Error::Regex(err) => write!(f, "expanded pattern failed to compile: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Regex(err) => Some(err),
            _ => None,
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Error {
        Error::Regex(err)
    }
}
