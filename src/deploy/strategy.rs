// ABOUTME: Activation strategies and archive layout policies.
// ABOUTME: Chooses how `current` is repointed and how strictly archives are checked.

use serde::Deserialize;
use std::fmt;

/// How the `current` pointer is moved to a new release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// Build the new link beside `current`, then rename it over `current`.
    /// `current` always resolves to a complete release.
    #[default]
    Swap,

    /// Remove `current`, then link it again. `current` is briefly missing.
    Replace,
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Swap => write!(f, "swap"),
            Activation::Replace => write!(f, "replace"),
        }
    }
}

/// How the archive's internal layout is checked before flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPolicy {
    /// Read the archive locally before any remote step and require a single
    /// top-level directory; flatten that directory.
    #[default]
    Strict,

    /// Assume the archive holds one directory named after the content source.
    Compat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        activation: Activation,
        layout: LayoutPolicy,
    }

    #[test]
    fn defaults_are_the_safe_choices() {
        assert_eq!(Activation::default(), Activation::Swap);
        assert_eq!(LayoutPolicy::default(), LayoutPolicy::Strict);
    }

    #[test]
    fn parses_lowercase_names() {
        let holder: Holder = serde_yaml::from_str("activation: replace\nlayout: compat\n").unwrap();
        assert_eq!(holder.activation, Activation::Replace);
        assert_eq!(holder.layout, LayoutPolicy::Compat);
    }

    #[test]
    fn rejects_unknown_strategy() {
        assert!(serde_yaml::from_str::<Holder>("activation: atomic\nlayout: strict\n").is_err());
    }
}
