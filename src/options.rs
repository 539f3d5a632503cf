//! Population options and their validation.
//!
//! This module provides [`Options`] (the validated, typed option set),
//! [`OnDuplicate`] for handling top-level name collisions, and the untyped
//! [`Overlay`] that declaration groups carry until validation.
//!
//! # Example
//!
//! ```
//! use datafiles::{OnDuplicate, OptionValue, Options, Overlay};
//!
//! let mut overlay = Overlay::default();
//! overlay.set("on_duplicate", "ignore");
//! overlay.set("keep_top_dir", true);
//!
//! let options = Options::validate(&overlay)?;
//! assert!(options.keep_top_dir);
//! assert_eq!(options.on_duplicate, OnDuplicate::Ignore);
//!
//! overlay.set("on_duplicate", OptionValue::from("replace"));
//! assert!(Options::validate(&overlay).is_err());
//! # Ok::<(), datafiles::Error>(())
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Name of the option controlling directory expansion.
pub const KEEP_TOP_DIR: &str = "keep_top_dir";

/// Name of the option controlling top-level name collisions.
pub const ON_DUPLICATE: &str = "on_duplicate";

/// Behavior when a flattened entry's name already exists at the top level
/// of the destination.
///
/// # Default
///
/// The default is [`OnDuplicate::Exception`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OnDuplicate {
    /// Fail the population with [`Error::DuplicateEntry`] (default).
    ///
    /// Entries copied before the collision are left in place.
    #[default]
    Exception,
    /// Keep the existing entry and skip the new one (first declared wins).
    Ignore,
    /// Remove the existing entry and copy the new one (last declared wins).
    Overwrite,
}

impl OnDuplicate {
    /// All accepted policies, in their canonical order.
    pub const ALL: [OnDuplicate; 3] = [Self::Exception, Self::Ignore, Self::Overwrite];

    /// The literal name used in declarations.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exception => "exception",
            Self::Ignore => "ignore",
            Self::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for OnDuplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnDuplicate {
    type Err = Error;

    /// Parse one of the three literal names. Matching is exact: no case
    /// folding, no surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| Error::invalid_option(ON_DUPLICATE, format!("{s:?}"), ON_DUPLICATE_EXPECTED))
    }
}

const KEEP_TOP_DIR_EXPECTED: &str = "true or false";
const ON_DUPLICATE_EXPECTED: &str = "'exception', 'ignore' or 'overwrite'";
const KNOWN_OPTION_EXPECTED: &str = "a known option ('keep_top_dir' or 'on_duplicate')";

/// An untyped option value as declared on a group.
///
/// Declarations may come from loosely typed sources, so values are kept
/// untyped until [`Options::validate`] checks them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum OptionValue {
    /// A boolean value
    Bool(bool),
    /// A string value
    Str(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<OnDuplicate> for OptionValue {
    fn from(value: OnDuplicate) -> Self {
        Self::Str(value.as_str().to_owned())
    }
}

/// Ordered set of option assignments carried by a declaration group.
///
/// Setting a name that is already present replaces its value in place, so
/// the first assignment fixes the position and the last one fixes the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Overlay {
    values: Vec<(String, OptionValue)>,
}

impl Overlay {
    /// Assign `value` to option `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    /// Look up the current value of option `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Apply every assignment of `other` on top of `self`, later wins per key.
    pub fn extend(&mut self, other: &Overlay) {
        for (name, value) in &other.values {
            self.set(name.clone(), value.clone());
        }
    }

    /// Iterate over `(name, value)` assignments in first-assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns `true` if no option was assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validated options for one population.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `keep_top_dir` | `false` | Expand directory sources into their children |
/// | `on_duplicate` | `Exception` | Fail on top-level name collisions |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Copy a directory source as `dest/<name>/...` instead of copying its
    /// immediate children into the destination root.
    pub keep_top_dir: bool,

    /// What to do when a top-level name is already taken
    pub on_duplicate: OnDuplicate,
}

impl Options {
    /// Set whether directory sources keep their top-level directory
    #[must_use]
    pub fn with_keep_top_dir(mut self, keep: bool) -> Self {
        self.keep_top_dir = keep;
        self
    }

    /// Set the duplicate policy
    #[must_use]
    pub fn with_on_duplicate(mut self, on_duplicate: OnDuplicate) -> Self {
        self.on_duplicate = on_duplicate;
        self
    }

    /// Check a merged overlay and turn it into typed options.
    ///
    /// Options missing from the overlay take their default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] if `keep_top_dir` is not a boolean,
    /// if `on_duplicate` is not one of `"exception"`, `"ignore"`,
    /// `"overwrite"`, or if the overlay names any other option.
    pub fn validate(overlay: &Overlay) -> Result<Self> {
        let mut options = Self::default();

        for (name, value) in overlay.iter() {
            match name {
                KEEP_TOP_DIR => match value {
                    OptionValue::Bool(b) => options.keep_top_dir = *b,
                    OptionValue::Str(_) => {
                        return Err(Error::invalid_option(name, value, KEEP_TOP_DIR_EXPECTED));
                    }
                },
                ON_DUPLICATE => match value {
                    OptionValue::Str(s) => options.on_duplicate = s.parse()?,
                    OptionValue::Bool(_) => {
                        return Err(Error::invalid_option(name, value, ON_DUPLICATE_EXPECTED));
                    }
                },
                _ => {
                    return Err(Error::invalid_option(name, value, KNOWN_OPTION_EXPECTED));
                }
            }
        }

        Ok(options)
    }
}

impl From<Options> for Overlay {
    fn from(options: Options) -> Self {
        let mut overlay = Overlay::default();
        overlay.set(KEEP_TOP_DIR, options.keep_top_dir);
        overlay.set(ON_DUPLICATE, options.on_duplicate);
        overlay
    }
}
