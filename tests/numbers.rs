use anyhow::Result;
use modexp::Environment;

use crate::{define, init, names};

#[test]
fn positive_rationals() -> Result<()> {
    init();
    let mut env = Environment::new();
    define(&mut env, &[("natural", r"\d+"), ("positive_rational", r"~<natural>\.~<natural>")])?;

    assert!(env.dependencies("natural")?.is_empty());
    assert_eq!(env.dependencies("positive_rational")?, &names(&["natural"]));

    assert!(env.is_full_match("positive_rational", "34.23")?);
    assert!(!env.is_full_match("positive_rational", "34d.23")?);
    assert!(!env.is_full_match("positive_rational", ".23")?);
    Ok(())
}

#[test]
fn rationals() -> Result<()> {
    init();
    let mut env = Environment::new();
    define(
        &mut env,
        &[("natural", r"\d+"), ("integer", r"-?\d+"), ("rational", r"~<integer>\.~<natural>")],
    )?;

    assert!(env.dependencies("integer")?.is_empty());
    assert_eq!(env.dependencies("rational")?, &names(&["natural", "integer"]));

    let rational = env.anchored_regex("rational")?;
    assert!(rational.is_match("34.23"));
    assert!(rational.is_match("-34.23"));
    assert!(!rational.is_match("34d.23"));
    assert!(!rational.is_match(".23"));
    assert!(!rational.is_match("-.23"));
    assert!(!rational.is_match("34.-23"));
    Ok(())
}

#[test]
fn arithmetic_expressions() -> Result<()> {
    init();
    let mut env = Environment::new();
    define(
        &mut env,
        &[
            ("natural", r"\d+"),
            ("operator", r"(\+|-|\/|\*)"),
            ("expr", r"~<natural>\s?~<operator>\s?~<natural>"),
            ("complex_expr", r"\(~<expr>\)\s?~<operator>\s?\(~<expr>\)"),
        ],
    )?;

    assert_eq!(env.dependencies("expr")?, &names(&["natural", "operator"]));
    assert_eq!(env.dependencies("complex_expr")?, &names(&["expr", "operator", "natural"]));

    let expr = env.anchored_regex("expr")?;
    assert!(expr.is_match("34 + 43"));
    assert!(expr.is_match("34+43"));
    assert!(expr.is_match("34*23"));
    assert!(!expr.is_match("34.2 * 234"));

    let complex = env.anchored_regex("complex_expr")?;
    assert!(complex.is_match("(23+43) / (23+2)"));
    assert!(complex.is_match("(23+43)/(23+2)"));
    assert!(!complex.is_match("23 / (23+2)"));
    assert!(!complex.is_match("(23) / (23+2)"));
    assert!(!complex.is_match("(23+2)/(23)"));
    Ok(())
}

#[test]
fn alternation_does_not_leak() -> Result<()> {
    init();
    let mut env = Environment::new();
    define(&mut env, &[("x", "a|b"), ("xc", "~<x>c")])?;

    assert!(env.is_full_match("xc", "ac")?);
    assert!(env.is_full_match("xc", "bc")?);
    assert!(!env.is_full_match("xc", "a")?);
    Ok(())
}

#[test]
fn capturing_groups_expose_fragments() -> Result<()> {
    init();
    let mut env = Environment::builder().capture_groups(true).build();
    define(&mut env, &[("natural", r"\d+"), ("pair", "~<natural>,~<natural>")])?;

    let caps = env.anchored_regex("pair")?.captures("12,345").expect("pair matches");
    assert_eq!(&caps[1], "12");
    assert_eq!(&caps[2], "345");
    Ok(())
}
