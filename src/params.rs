//! Layout parameters: declarations, introspection, and string arguments.
//!
//! DESIGN
//! ======
//! A lazy layout declares its formal parameters up front ([`Param`]). The
//! introspector turns a declaration into the transport-facing
//! [`ParameterInfo`] list, dropping catch-all collectors. A producer whose
//! parameters cannot be determined reports `None` and introspects to an empty
//! list; that is a degraded answer, not an error.
//!
//! Argument values always travel as strings ([`Args`]) since they originate
//! from free-text input or preset selections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

// =============================================================================
// DECLARATIONS
// =============================================================================

/// How a declared parameter binds arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Named parameter that may also be passed by position.
    Positional,
    /// Named parameter that can only be passed by name.
    Keyword,
    /// Catch-all for extra positional arguments.
    VarPositional,
    /// Catch-all for extra named arguments.
    VarKeyword,
}

impl ParamKind {
    #[must_use]
    pub fn is_catch_all(self) -> bool {
        matches!(self, Self::VarPositional | Self::VarKeyword)
    }
}

/// One declared formal parameter of a layout producer.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<Value>,
    pub annotation: Option<String>,
}

impl Param {
    /// A parameter without a default.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ParamKind::Positional, default: None, annotation: None }
    }

    /// A parameter with a default value.
    #[must_use]
    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self { default: Some(default.into()), ..Self::required(name) }
    }

    #[must_use]
    pub fn var_positional(name: impl Into<String>) -> Self {
        Self { kind: ParamKind::VarPositional, ..Self::required(name) }
    }

    #[must_use]
    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self { kind: ParamKind::VarKeyword, ..Self::required(name) }
    }

    /// Make the parameter keyword-only.
    #[must_use]
    pub fn keyword(mut self) -> Self {
        self.kind = ParamKind::Keyword;
        self
    }

    /// Attach a free-form type hint.
    #[must_use]
    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }
}

// =============================================================================
// INTROSPECTION
// =============================================================================

/// Introspected parameter, as exposed in layout metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub name: String,
    pub has_default: bool,
    pub default: Option<Value>,
    pub annotation: Option<String>,
}

impl ParameterInfo {
    #[must_use]
    pub fn is_required(&self) -> bool {
        !self.has_default
    }
}

/// Anything that can report its formal parameters.
pub trait Introspect {
    /// Declared parameters in declaration order, or `None` if unknown.
    fn signature(&self) -> Option<&[Param]>;
}

/// Extract the parameter list of `callable`, skipping catch-all collectors.
///
/// Never fails: an unintrospectable callable yields an empty list.
pub fn extract<T: Introspect + ?Sized>(callable: &T) -> Vec<ParameterInfo> {
    let Some(signature) = callable.signature() else {
        warn!("layout parameters could not be introspected; assuming none");
        return Vec::new();
    };

    signature
        .iter()
        .filter(|param| !param.kind.is_catch_all())
        .map(|param| ParameterInfo {
            name: param.name.clone(),
            has_default: param.default.is_some(),
            default: param.default.clone(),
            annotation: param.annotation.clone(),
        })
        .collect()
}

/// Transport string form of a JSON value: strings bare, everything else as
/// JSON text (`10`, `true`, `null`).
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required argument `{0}`")]
pub struct MissingArgument(pub String);

/// Named string arguments for a lazy layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(BTreeMap<String, String>);

impl Args {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Fetch an argument a producer cannot do without.
    ///
    /// # Errors
    ///
    /// Returns [`MissingArgument`] if `name` was not supplied.
    pub fn require(&self, name: &str) -> Result<&str, MissingArgument> {
        self.get(name).ok_or_else(|| MissingArgument(name.to_owned()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy of `self` with declared defaults filled in for absent names.
    ///
    /// A `null` default is left absent so the producer sees "not supplied".
    #[must_use]
    pub fn with_defaults(&self, parameters: &[ParameterInfo]) -> Self {
        let mut filled = self.clone();
        for param in parameters {
            if let Some(default) = param.default.as_ref().filter(|v| !v.is_null()) {
                filled
                    .0
                    .entry(param.name.clone())
                    .or_insert_with(|| stringify(default));
            }
        }
        filled
    }

    /// Names of required parameters that have no argument.
    #[must_use]
    pub fn missing<'a>(&self, parameters: &'a [ParameterInfo]) -> Vec<&'a str> {
        parameters
            .iter()
            .filter(|param| param.is_required() && !self.contains(&param.name))
            .map(|param| param.name.as_str())
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Args
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
#[path = "params_test.rs"]
mod tests;
