//! # Route Groups
//!
//! A group is a named namespace sharing a path prefix, host, scheme, default
//! params and requirement overrides with everything registered under it.
//! Groups nest; the dotted name and the path of a child are always derived
//! from its parent.
//!
//! Lookups walk the tree top-down. A group whose prefix regex does not match
//! the request path is skipped without visiting its children; a name lookup
//! skips groups whose dotted prefix the name does not start with.
//!
//! ## Design Principles
//!
//! - **S**: Groups only merge options and fan out lookups
//! - **L**: Routes and groups are searched uniformly through `Matchable`
//! - **D**: Compilation is delegated to the shared `PatternCompiler`

use crate::compiler::PatternCompiler;
use crate::config::Options;
use crate::error::{Error, Result};
use crate::request::RouteRequest;
use crate::route::Route;
use crate::types::{Action, Method, ParamsMap};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Something the tree can search: a route or a group of routes
pub trait Matchable {
    /// Fully qualified dotted name
    fn name(&self) -> &str;

    /// Best route accepting the request, if any
    fn find_by_request<R: RouteRequest + ?Sized>(&self, request: &R) -> Option<&Route>;

    /// Route registered under `name`, if any
    fn find_by_name(&self, name: &str) -> Option<&Route>;
}

impl Matchable for Route {
    fn name(&self) -> &str {
        Self::name(self)
    }

    fn find_by_request<R: RouteRequest + ?Sized>(&self, request: &R) -> Option<&Route> {
        self.try_match(request)
    }

    fn find_by_name(&self, name: &str) -> Option<&Route> {
        self.try_match_by_name(name)
    }
}

impl Matchable for RouteGroup {
    fn name(&self) -> &str {
        Self::name(self)
    }

    fn find_by_request<R: RouteRequest + ?Sized>(&self, request: &R) -> Option<&Route> {
        self.try_match_by_request(request)
    }

    fn find_by_name(&self, name: &str) -> Option<&Route> {
        self.try_match_by_name(name)
    }
}

/// Child of a group, in registration order
///
/// Indexes into the group's `routes` or `groups`.
#[derive(Debug, Clone, Copy)]
enum Node {
    Route(usize),
    Group(usize),
}

/// A namespace of routes and nested groups
#[derive(Debug)]
pub struct RouteGroup {
    name: String,
    prefix: String,
    path: String,
    forward: Regex,
    options: Options,
    routes: Vec<Route>,
    groups: Vec<RouteGroup>,
    children: Vec<Node>,
    compiler: Arc<PatternCompiler>,
}

impl RouteGroup {
    /// Create the unnamed root group mounted at `/`
    ///
    /// # Errors
    ///
    /// Returns an error if the root options carry an unusable requirement.
    pub(crate) fn root(compiler: Arc<PatternCompiler>, options: Options) -> Result<Self> {
        Self::new(String::new(), "/".to_string(), options, compiler)
    }

    fn new(
        name: String,
        path: String,
        options: Options,
        compiler: Arc<PatternCompiler>,
    ) -> Result<Self> {
        let pattern = compiler.compile(&name, &path, &options.requirements, false)?;
        let prefix = if name.is_empty() {
            String::new()
        } else {
            format!("{name}.")
        };

        Ok(Self {
            name,
            prefix,
            path: pattern.template,
            forward: pattern.forward,
            options,
            routes: Vec::new(),
            groups: Vec::new(),
            children: Vec::new(),
            compiler,
        })
    }

    /// Fully qualified dotted name; empty for the root
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path template every child path is joined onto
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Host handed down to children without one of their own
    #[must_use]
    pub fn host(&self) -> &str {
        &self.options.host
    }

    /// Whether children are forced onto `https`
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.options.secure
    }

    /// Defaults merged into every child's defaults
    #[must_use]
    pub const fn default_params(&self) -> &ParamsMap {
        &self.options.default_params
    }

    /// Register a route under this group
    ///
    /// The final name is `<group>.<name>` and the final path the group path
    /// joined with `path`. `method` accepts a [`Method`] or `None` for any.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateName` if the name is taken in this subtree,
    /// or the compiler's error if the template or a requirement is invalid.
    /// Nothing is registered on error.
    pub fn add_route(
        &mut self,
        name: &str,
        path: &str,
        method: impl Into<Option<Method>>,
        action: Action,
        options: Options,
    ) -> Result<&Route> {
        let final_name = format!("{}{name}", self.prefix);
        self.ensure_unique(&final_name)?;

        let final_path = join_paths(&self.path, path);
        let options = self.options.inherit(options);

        let pattern = self
            .compiler
            .compile(&final_name, &final_path, &options.requirements, true)
            .map_err(|e| rejected(&final_name, e))?;

        let route = Route::new(
            final_name,
            method.into(),
            action,
            options,
            pattern,
            Arc::clone(self.compiler.default_requirement()),
        );
        debug!(
            route = %route.name(),
            path = %route.path(),
            method = ?route.method(),
            priority = route.priority(),
            "Route registered"
        );

        let index = self.routes.len();
        self.routes.push(route);
        self.children.push(Node::Route(index));
        Ok(&self.routes[index])
    }

    /// Register a nested group
    ///
    /// Same naming, path and option rules as [`add_route`](Self::add_route).
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateName` or a compiler error; nothing is
    /// registered on error.
    pub fn add_route_group(
        &mut self,
        name: &str,
        path: &str,
        options: Options,
    ) -> Result<&mut Self> {
        let final_name = format!("{}{name}", self.prefix);
        self.ensure_unique(&final_name)?;

        let final_path = join_paths(&self.path, path);
        let options = self.options.inherit(options);

        let group = Self::new(
            final_name.clone(),
            final_path,
            options,
            Arc::clone(&self.compiler),
        )
        .map_err(|e| rejected(&final_name, e))?;
        debug!(group = %group.name, path = %group.path, "Route group registered");

        let index = self.groups.len();
        self.groups.push(group);
        self.children.push(Node::Group(index));
        Ok(&mut self.groups[index])
    }

    /// Register a `GET` route with default options
    ///
    /// # Errors
    ///
    /// See [`add_route`](Self::add_route).
    pub fn add_get_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.add_route(name, path, Method::Get, action, Options::default())
    }

    /// Register a `POST` route with default options
    ///
    /// # Errors
    ///
    /// See [`add_route`](Self::add_route).
    pub fn add_post_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.add_route(name, path, Method::Post, action, Options::default())
    }

    /// Register a `PUT` route with default options
    ///
    /// # Errors
    ///
    /// See [`add_route`](Self::add_route).
    pub fn add_put_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.add_route(name, path, Method::Put, action, Options::default())
    }

    /// Register a `PATCH` route with default options
    ///
    /// # Errors
    ///
    /// See [`add_route`](Self::add_route).
    pub fn add_patch_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.add_route(name, path, Method::Patch, action, Options::default())
    }

    /// Register a `DELETE` route with default options
    ///
    /// # Errors
    ///
    /// See [`add_route`](Self::add_route).
    pub fn add_delete_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.add_route(name, path, Method::Delete, action, Options::default())
    }

    /// Register a `HEAD` route with default options
    ///
    /// # Errors
    ///
    /// See [`add_route`](Self::add_route).
    pub fn add_head_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.add_route(name, path, Method::Head, action, Options::default())
    }

    /// Register an `OPTIONS` route with default options
    ///
    /// # Errors
    ///
    /// See [`add_route`](Self::add_route).
    pub fn add_options_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.add_route(name, path, Method::Options, action, Options::default())
    }

    /// Highest-priority route accepting the request
    ///
    /// Equal priorities resolve to the first one registered.
    pub fn try_match_by_request<R: RouteRequest + ?Sized>(&self, request: &R) -> Option<&Route> {
        let path = request.path()?;
        if !self.forward.is_match(path) {
            return None;
        }

        let mut result: Option<&Route> = None;
        for &child in &self.children {
            let Some(route) = self.child_by_request(child, request) else {
                continue;
            };
            if result.map_or(true, |best| best.priority() < route.priority()) {
                result = Some(route);
            }
        }

        result
    }

    /// Route registered under `name` in this subtree
    ///
    /// First match in registration order wins.
    #[must_use]
    pub fn try_match_by_name(&self, name: &str) -> Option<&Route> {
        if name.is_empty() || !name.starts_with(&self.prefix) {
            return None;
        }

        self.children
            .iter()
            .find_map(|&child| self.child_by_name(child, name))
    }

    /// All routes of the subtree, depth-first in registration order
    #[must_use]
    pub fn routes(&self) -> Vec<&Route> {
        let mut routes = Vec::new();
        self.collect_routes(&mut routes);
        routes
    }

    fn collect_routes<'a>(&'a self, out: &mut Vec<&'a Route>) {
        for &child in &self.children {
            match child {
                Node::Route(index) => out.extend(self.routes.get(index)),
                Node::Group(index) => {
                    if let Some(group) = self.groups.get(index) {
                        group.collect_routes(out);
                    }
                }
            }
        }
    }

    fn child_by_request<R: RouteRequest + ?Sized>(
        &self,
        child: Node,
        request: &R,
    ) -> Option<&Route> {
        match child {
            Node::Route(index) => self.routes.get(index)?.find_by_request(request),
            Node::Group(index) => self.groups.get(index)?.find_by_request(request),
        }
    }

    fn child_by_name(&self, child: Node, name: &str) -> Option<&Route> {
        match child {
            Node::Route(index) => self.routes.get(index)?.find_by_name(name),
            Node::Group(index) => self.groups.get(index)?.find_by_name(name),
        }
    }

    /// Whether a route or group anywhere below already carries `name`
    fn is_taken(&self, name: &str) -> bool {
        self.routes.iter().any(|route| route.name() == name)
            || self.groups.iter().any(|group| {
                group.name == name || (name.starts_with(&group.prefix) && group.is_taken(name))
            })
    }

    fn ensure_unique(&self, final_name: &str) -> Result<()> {
        if self.is_taken(final_name) {
            warn!(name = %final_name, "Duplicate route name rejected");
            return Err(Error::DuplicateName {
                name: final_name.to_string(),
            });
        }

        Ok(())
    }
}

fn rejected(name: &str, err: Error) -> Error {
    warn!(name = %name, error = %err, "Route registration rejected");
    err
}

/// Join `base` and `relative` and clean the result like POSIX `path.Join`
///
/// Repeated slashes collapse, `.` segments drop, `..` removes the previous
/// segment and a trailing slash is stripped (except for `/` itself).
/// Text inside `{...}` placeholders is kept verbatim.
#[must_use]
pub fn join_paths(base: &str, relative: &str) -> String {
    let joined = match (base.is_empty(), relative.is_empty()) {
        (true, true) => return String::new(),
        (true, false) => relative.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}/{relative}"),
    };
    clean_path(&joined)
}

fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in split_segments(path) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Split on `/` outside of `{...}` placeholders
fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;

    for (index, c) in path.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                segments.push(&path[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    segments.push(&path[start..]);
    segments
}
