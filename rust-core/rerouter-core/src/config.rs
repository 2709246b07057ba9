//! # Configuration
//!
//! Router-wide settings and per-registration options.
//!
//! `RouterConfig` is read once when a [`Router`](crate::Router) is built;
//! nothing about the compiler can change afterwards. Both structs deserialize
//! with `serde`, so a routing setup can come from a JSON document.

use crate::error::Result;
use crate::types::ParamsMap;
use serde::Deserialize;

/// Placeholder matcher: one capture group yielding `name` or `name:expr`
pub const DEFAULT_PARAM_MATCHER: &str = r"\{([a-z]+[\:]{0,1}[^\}]*)\}";

/// Requirement applied to parameters without an override
pub const DEFAULT_PARAM_REQUIREMENT: &str = r"[^/]+";

/// Router-wide settings
///
/// # Example
///
/// ```
/// use rerouter_core::RouterConfig;
///
/// let config = RouterConfig::from_json_str(r#"{"secure": true, "host": "example.com"}"#).unwrap();
/// assert!(config.secure);
/// assert_eq!(config.param_requirement, "[^/]+");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Build `https` URLs for every route (inherited by the whole tree)
    pub secure: bool,
    /// Host every route is bound to; empty matches any host
    pub host: String,
    /// Expression locating `{...}` placeholders in templates
    pub param_matcher: String,
    /// Default requirement for parameters without an override
    pub param_requirement: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            secure: false,
            host: String::new(),
            param_matcher: DEFAULT_PARAM_MATCHER.to_string(),
            param_requirement: DEFAULT_PARAM_REQUIREMENT.to_string(),
        }
    }
}

impl RouterConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a JSON document; missing keys keep defaults
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serve and build URLs over `https`
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Bind every route to `host`
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Replace the placeholder matcher
    #[must_use]
    pub fn with_param_matcher(mut self, expr: impl Into<String>) -> Self {
        self.param_matcher = expr.into();
        self
    }

    /// Replace the default parameter requirement
    #[must_use]
    pub fn with_param_requirement(mut self, expr: impl Into<String>) -> Self {
        self.param_requirement = expr.into();
        self
    }

    /// Check both expressions without building a router
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if an expression does not compile, the
    /// placeholder matcher lacks exactly one capture group, or the default
    /// requirement contains capture groups.
    pub fn validate(&self) -> Result<()> {
        crate::compiler::PatternCompiler::from_config(self).map(|_| ())
    }
}

/// Options accepted by `add_route` / `add_route_group`
///
/// Values given here are merged with the ones inherited from the parent
/// group: `secure` can only be switched on, `host` falls back to the
/// parent's, and both maps are merged with the child's entries winning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Tie-break among routes matching the same request; higher wins
    pub priority: i32,
    /// Build `https` URLs
    pub secure: bool,
    /// Host constraint; empty matches any host
    pub host: String,
    /// Values used when a URL is built without them
    pub default_params: ParamsMap,
    /// Requirement overrides keyed by parameter name
    pub requirements: ParamsMap,
}

impl Options {
    /// Create empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the route priority
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Require `https`
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Restrict to a host
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Add a default parameter value
    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_params.insert(name.into(), value.into());
        self
    }

    /// Add a requirement override for one parameter
    #[must_use]
    pub fn with_requirement(mut self, name: impl Into<String>, expr: impl Into<String>) -> Self {
        self.requirements.insert(name.into(), expr.into());
        self
    }

    /// Resolve the options a child ends up with under a parent
    ///
    /// `self` holds what the parent group carries; `child` what the caller
    /// passed. Priority is never inherited.
    pub(crate) fn inherit(&self, child: Self) -> Self {
        Self {
            priority: child.priority,
            secure: self.secure || child.secure,
            host: if child.host.is_empty() {
                self.host.clone()
            } else {
                child.host
            },
            default_params: crate::types::merge_params(&self.default_params, &child.default_params),
            requirements: crate::types::merge_params(&self.requirements, &child.requirements),
        }
    }
}
