//! # Shared Value Types
//!
//! Small value types used across the routing tree.
//!
//! ## Design Principles
//!
//! - **S**: Each type models one concept (verb, payload, parameter map)
//! - **O**: `Action` stores any host payload without the router knowing its shape
//! - **D**: Routes depend on `Method`/`Action`, never on a host framework type

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Parameter name to value mapping used for defaults, overrides and extraction
pub type ParamsMap = HashMap<String, String>;

/// Merge two parameter maps; values from `overrides` win on conflict
#[must_use]
pub fn merge_params(base: &ParamsMap, overrides: &ParamsMap) -> ParamsMap {
    let mut result = base.clone();
    for (key, value) in overrides {
        result.insert(key.clone(), value.clone());
    }
    result
}

/// HTTP methods a route can be restricted to
///
/// Standard verbs parse case-insensitively; any other valid token (e.g.
/// `PROPFIND`) becomes an [`Extension`](Self::Extension) kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP DELETE
    Delete,
    /// HTTP PATCH
    Patch,
    /// HTTP HEAD
    Head,
    /// HTTP OPTIONS
    Options,
    /// HTTP CONNECT
    Connect,
    /// HTTP TRACE
    Trace,
    /// Non-standard method token, compared case-sensitively
    Extension(String),
}

impl Method {
    /// Canonical upper-case token as it appears on the wire
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Connect => "CONNECT",
            Self::Trace => "TRACE",
            Self::Extension(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an invalid method token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid HTTP method: {:?}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "CONNECT" => Ok(Self::Connect),
            "TRACE" => Ok(Self::Trace),
            _ if is_token(s) => Ok(Self::Extension(s.to_string())),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// RFC 9110 `token`: one or more visible ASCII chars, no delimiters
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// Opaque payload attached to a route
///
/// The router stores and hands it back but never inspects or invokes it.
/// Cloning is cheap (shared ownership); an `Action::default()` carries nothing.
#[derive(Clone, Default)]
pub struct Action(Option<Arc<dyn Any + Send + Sync>>);

impl Action {
    /// Wrap any thread-safe value as a route action
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// Borrow the payload as `T`
    ///
    /// Returns `None` if the action is empty or holds a different type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_ref().and_then(|value| value.downcast_ref::<T>())
    }

    /// Check whether no payload was attached
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Action(<empty>)")
        } else {
            f.write_str("Action(<opaque>)")
        }
    }
}
