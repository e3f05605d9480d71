// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document→native call envelopes and their validation errors.

use alloc::string::String;
use hashbrown::HashMap;

/// A single argument carried by an [`RpcCall`].
#[derive(Clone, Debug, PartialEq)]
pub enum RpcValue {
    /// Boolean argument.
    Bool(bool),
    /// Numeric argument.
    Number(f64),
    /// String argument.
    Text(String),
}

/// Argument envelope for a call arriving from the hosted document.
///
/// Script code passes loosely-typed dictionaries; this mirrors that: every
/// parameter may be absent, and the typed getters answer `None` for both
/// missing and mis-typed entries. Operations validate what they need and
/// reject with an error naming the first missing parameter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RpcCall {
    values: HashMap<String, RpcValue>,
}

impl RpcCall {
    /// Create an empty call envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a numeric parameter.
    pub fn with_number(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), RpcValue::Number(value));
        self
    }

    /// Attach a string parameter.
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values
            .insert(name.into(), RpcValue::Text(value.into()));
        self
    }

    /// Attach a boolean parameter.
    pub fn with_bool(mut self, name: impl Into<String>, value: bool) -> Self {
        self.values.insert(name.into(), RpcValue::Bool(value));
        self
    }

    /// Read a numeric parameter.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(RpcValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Read a string parameter.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(RpcValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Read a boolean parameter.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(RpcValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

/// Rejection returned to document script code for a malformed call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayError {
    /// A required parameter was absent (or not of the expected type).
    MissingParameter {
        /// The operation that rejected the call.
        call: &'static str,
        /// The first missing parameter, in the operation's declared order.
        param: &'static str,
    },
}

impl core::fmt::Display for RelayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingParameter { call, param } => {
                write!(f, "{call}: missing parameter: {param}")
            }
        }
    }
}

impl core::error::Error for RelayError {}
