//! # Route
//!
//! A single named endpoint: one compiled pattern plus method, host, priority
//! and an opaque action. Immutable once registered.
//!
//! ## Design Principles
//!
//! - **S**: Route only matches requests and builds URLs for itself
//! - **O**: The action payload is opaque, hosts attach whatever they dispatch on
//! - **D**: Matching depends on `RouteRequest`, not on a concrete request type

use crate::compiler::{CompiledPattern, Requirement};
use crate::config::Options;
use crate::error::{Error, Result};
use crate::request::RouteRequest;
use crate::types::{merge_params, Action, Method, ParamsMap};
use std::fmt;
use std::sync::Arc;

/// URL produced by [`Route::url`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteUrl {
    /// `http` or `https`
    pub scheme: &'static str,
    /// Host, empty for host-less routes
    pub host: String,
    /// Path with every parameter substituted
    pub path: String,
}

impl fmt::Display for RouteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.host, self.path)
    }
}

/// A registered endpoint
#[derive(Debug)]
pub struct Route {
    name: String,
    action: Action,
    priority: i32,
    method: Option<Method>,
    secure: bool,
    host: String,
    pattern: CompiledPattern,
    default_params: ParamsMap,
    default_requirement: Arc<Requirement>,
}

impl Route {
    /// Assemble a route from a compiled pattern and merged options
    pub(crate) fn new(
        name: String,
        method: Option<Method>,
        action: Action,
        options: Options,
        pattern: CompiledPattern,
        default_requirement: Arc<Requirement>,
    ) -> Self {
        Self {
            name,
            action,
            priority: options.priority,
            method,
            secure: options.secure,
            host: options.host,
            pattern,
            default_params: options.default_params,
            default_requirement,
        }
    }

    /// Fully qualified dotted name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tie-break priority; higher wins
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Original path template, placeholders included
    #[must_use]
    pub fn path(&self) -> &str {
        &self.pattern.template
    }

    /// Payload attached at registration
    #[must_use]
    pub const fn action(&self) -> &Action {
        &self.action
    }

    /// Method constraint; `None` matches any method
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Host constraint; empty matches any host
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether built URLs use `https`
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.secure
    }

    /// Parameter names in template order
    #[must_use]
    pub fn required_params(&self) -> &[String] {
        &self.pattern.required
    }

    /// Values used when a URL is built without them
    #[must_use]
    pub const fn default_params(&self) -> &ParamsMap {
        &self.default_params
    }

    /// Build a URL from the default params overridden by `params`
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingParameter` for the first required parameter
    /// absent from both maps, or `Error::InvalidParameterFormat` if a value
    /// does not fully match its requirement.
    pub fn url(&self, params: &ParamsMap) -> Result<RouteUrl> {
        let merged = merge_params(&self.default_params, params);
        let path = self.build_path(&merged)?;

        Ok(RouteUrl {
            scheme: if self.secure { "https" } else { "http" },
            host: self.host.clone(),
            path,
        })
    }

    /// Extract parameter values from a request this route owns
    ///
    /// # Errors
    ///
    /// Returns `Error::UrlMissing` if the request has no URL and
    /// `Error::RouteMismatch` if its path does not belong to the route.
    pub fn extract_params<R: RouteRequest + ?Sized>(&self, request: &R) -> Result<ParamsMap> {
        let path = request.path().ok_or(Error::UrlMissing)?;

        let mismatch = || Error::RouteMismatch {
            route: self.name.clone(),
            path: path.to_string(),
        };

        let captures = self.pattern.forward.captures(path).ok_or_else(mismatch)?;
        if captures.len() != self.pattern.required.len() + 1 {
            return Err(mismatch());
        }

        Ok(self
            .pattern
            .required
            .iter()
            .enumerate()
            .map(|(index, key)| {
                let value = captures.get(index + 1).map_or("", |m| m.as_str());
                (key.clone(), value.to_string())
            })
            .collect())
    }

    /// Whether this route accepts the request
    pub fn matches<R: RouteRequest + ?Sized>(&self, request: &R) -> bool {
        let Some(path) = request.path() else {
            return false;
        };

        self.matches_host(request.host())
            && self.matches_method(request.method())
            && self.matches_path(path)
    }

    /// `Some(self)` if this route accepts the request
    pub fn try_match<R: RouteRequest + ?Sized>(&self, request: &R) -> Option<&Self> {
        self.matches(request).then_some(self)
    }

    /// `Some(self)` if `name` is exactly this route's name
    #[must_use]
    pub fn try_match_by_name(&self, name: &str) -> Option<&Self> {
        (!name.is_empty() && self.name == name).then_some(self)
    }

    fn matches_host(&self, host: &str) -> bool {
        self.host.is_empty() || self.host == host
    }

    fn matches_method(&self, method: &str) -> bool {
        self.method.as_ref().map_or(true, |m| m.as_str() == method)
    }

    fn matches_path(&self, path: &str) -> bool {
        self.pattern
            .forward
            .captures(path)
            .is_some_and(|captures| captures.len() == self.pattern.required.len() + 1)
    }

    fn requirement_for(&self, name: &str) -> &Requirement {
        self.pattern
            .requirements
            .get(name)
            .unwrap_or(&self.default_requirement)
    }

    /// Validate and substitute each value, required params first in template order
    fn build_path(&self, params: &ParamsMap) -> Result<String> {
        if let Some(missing) = self
            .pattern
            .required
            .iter()
            .find(|key| !params.contains_key(key.as_str()))
        {
            return Err(Error::MissingParameter {
                name: missing.clone(),
            });
        }

        let mut extra: Vec<&String> = params
            .keys()
            .filter(|key| !self.pattern.required.contains(*key))
            .collect();
        extra.sort();

        let ordered = self.pattern.required.iter().chain(extra);
        let mut path = self.pattern.reverse.clone();

        for key in ordered {
            let value = &params[key];
            if !self.requirement_for(key).is_full_match(value) {
                return Err(Error::InvalidParameterFormat { name: key.clone() });
            }
            path = path.replacen(&format!("{{{key}}}"), value, 1);
        }

        Ok(path)
    }
}
