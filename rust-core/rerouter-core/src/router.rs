//! # Router
//!
//! Entry point of the crate. Owns the root group (unnamed, mounted at `/`)
//! and the single `PatternCompiler` every node of the tree shares.
//!
//! Registration is expected to finish before lookups start. Once built, a
//! `Router` is `Send + Sync` and can be shared behind an `Arc` for concurrent
//! read-only matching; interleaving registration with lookups needs external
//! synchronization (e.g. an `RwLock<Router>`).

use crate::compiler::PatternCompiler;
use crate::config::{Options, RouterConfig};
use crate::error::Result;
use crate::group::RouteGroup;
use crate::request::RouteRequest;
use crate::route::Route;
use crate::types::{Action, Method};
use std::sync::Arc;
use tracing::trace;

/// Hierarchical named router
#[derive(Debug)]
pub struct Router {
    root: RouteGroup,
    config: RouterConfig,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a router with the default configuration
    ///
    /// # Panics
    ///
    /// Never with the built-in defaults; see [`from_config`](Self::from_config)
    /// for fallible construction.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(RouterConfig::default()).expect("default router configuration is valid")
    }

    /// Create a router bound to `host`, optionally building `https` URLs
    ///
    /// # Panics
    ///
    /// Never; only the host and scheme differ from the defaults.
    #[must_use]
    pub fn with_host(secure: bool, host: impl Into<String>) -> Self {
        Self::from_config(RouterConfig::default().with_secure(secure).with_host(host))
            .expect("default router configuration is valid")
    }

    /// Create a router from explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the placeholder matcher or default
    /// requirement is unusable.
    pub fn from_config(config: RouterConfig) -> Result<Self> {
        let compiler = Arc::new(PatternCompiler::from_config(&config)?);
        let root = RouteGroup::root(
            compiler,
            Options::new()
                .with_secure(config.secure)
                .with_host(config.host.clone()),
        )?;

        Ok(Self { root, config })
    }

    /// Configuration the router was built from
    #[must_use]
    pub const fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The root group
    #[must_use]
    pub const fn root(&self) -> &RouteGroup {
        &self.root
    }

    /// Register a route at the root
    ///
    /// # Errors
    ///
    /// See [`RouteGroup::add_route`].
    pub fn add_route(
        &mut self,
        name: &str,
        path: &str,
        method: impl Into<Option<Method>>,
        action: Action,
        options: Options,
    ) -> Result<&Route> {
        self.root.add_route(name, path, method, action, options)
    }

    /// Register a group at the root
    ///
    /// # Errors
    ///
    /// See [`RouteGroup::add_route_group`].
    pub fn add_route_group(
        &mut self,
        name: &str,
        path: &str,
        options: Options,
    ) -> Result<&mut RouteGroup> {
        self.root.add_route_group(name, path, options)
    }

    /// Register a `GET` route at the root
    ///
    /// # Errors
    ///
    /// See [`RouteGroup::add_route`].
    pub fn add_get_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.root.add_get_route(name, path, action)
    }

    /// Register a `POST` route at the root
    ///
    /// # Errors
    ///
    /// See [`RouteGroup::add_route`].
    pub fn add_post_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.root.add_post_route(name, path, action)
    }

    /// Register a `PUT` route at the root
    ///
    /// # Errors
    ///
    /// See [`RouteGroup::add_route`].
    pub fn add_put_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.root.add_put_route(name, path, action)
    }

    /// Register a `PATCH` route at the root
    ///
    /// # Errors
    ///
    /// See [`RouteGroup::add_route`].
    pub fn add_patch_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.root.add_patch_route(name, path, action)
    }

    /// Register a `DELETE` route at the root
    ///
    /// # Errors
    ///
    /// See [`RouteGroup::add_route`].
    pub fn add_delete_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.root.add_delete_route(name, path, action)
    }

    /// Register a `HEAD` route at the root
    ///
    /// # Errors
    ///
    /// See [`RouteGroup::add_route`].
    pub fn add_head_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.root.add_head_route(name, path, action)
    }

    /// Register an `OPTIONS` route at the root
    ///
    /// # Errors
    ///
    /// See [`RouteGroup::add_route`].
    pub fn add_options_route(&mut self, name: &str, path: &str, action: Action) -> Result<&Route> {
        self.root.add_options_route(name, path, action)
    }

    /// Resolve a request to the highest-priority matching route
    pub fn find_route_by_request<R: RouteRequest + ?Sized>(&self, request: &R) -> Option<&Route> {
        let found = self.root.try_match_by_request(request);
        trace!(
            method = %request.method(),
            path = ?request.path(),
            route = ?found.map(Route::name),
            "Request resolved"
        );
        found
    }

    /// Resolve a dotted route name
    #[must_use]
    pub fn find_route_by_name(&self, name: &str) -> Option<&Route> {
        self.root.try_match_by_name(name)
    }

    /// Every registered route, depth-first in registration order
    #[must_use]
    pub fn routes(&self) -> Vec<&Route> {
        self.root.routes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::request::Request;
    use crate::types::ParamsMap;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn params(pairs: &[(&str, &str)]) -> ParamsMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_basic_routing() {
        init_tracing();
        let mut router = Router::new();

        router.add_get_route("home", "/", Action::new("home")).unwrap();
        router.add_get_route("users", "/users", Action::new("list")).unwrap();
        router.add_post_route("create", "/users", Action::new("create")).unwrap();

        let r = router
            .find_route_by_request(&Request::with_path("GET", "/"))
            .unwrap();
        assert_eq!(r.name(), "home");

        let r = router
            .find_route_by_request(&Request::with_path("GET", "/users"))
            .unwrap();
        assert_eq!(r.action().downcast_ref::<&str>(), Some(&"list"));

        let r = router
            .find_route_by_request(&Request::with_path("POST", "/users"))
            .unwrap();
        assert_eq!(r.name(), "create");
    }

    #[test]
    fn test_route_not_found() {
        let router = Router::new();
        assert!(router
            .find_route_by_request(&Request::with_path("GET", "/nonexistent"))
            .is_none());
        assert!(router.find_route_by_name("nonexistent").is_none());
    }

    #[test]
    fn test_method_not_allowed() {
        let mut router = Router::new();
        router.add_get_route("users", "/users", Action::default()).unwrap();

        assert!(router
            .find_route_by_request(&Request::with_path("POST", "/users"))
            .is_none());
    }

    #[test]
    fn test_users_group_example() {
        init_tracing();
        let mut router = Router::new();
        router
            .add_route_group("users", "/users", Options::new())
            .unwrap()
            .add_route("get", "/{id}", Method::Get, Action::default(), Options::new())
            .unwrap();

        let route = router.find_route_by_name("users.get").unwrap();
        assert_eq!(route.path(), "/users/{id}");

        let req = Request::with_path("GET", "/users/42");
        let found = router.find_route_by_request(&req).unwrap();
        assert_eq!(found.name(), "users.get");
        assert_eq!(found.extract_params(&req).unwrap(), params(&[("id", "42")]));

        assert!(router
            .find_route_by_request(&Request::with_path("POST", "/users/42"))
            .is_none());
    }

    #[test]
    fn test_build_url_by_name() {
        let mut router = Router::new();
        router
            .add_get_route("item", "/{param1}/{param2:[0-9]+}", Action::default())
            .unwrap();

        let route = router.find_route_by_name("item").unwrap();
        assert!(matches!(
            route.url(&params(&[("param1", "abc"), ("param2", "12a")])),
            Err(Error::InvalidParameterFormat { name }) if name == "param2"
        ));
        assert_eq!(
            route
                .url(&params(&[("param1", "abc"), ("param2", "12")]))
                .unwrap()
                .path,
            "/abc/12"
        );
    }

    #[test]
    fn test_router_host_applies_to_all_routes() {
        let mut router = Router::with_host(true, "domain.com");
        router
            .add_route_group("api", "/api", Options::new())
            .unwrap()
            .add_get_route("status", "/status", Action::default())
            .unwrap();

        let route = router.find_route_by_name("api.status").unwrap();
        assert_eq!(
            route.url(&ParamsMap::new()).unwrap().to_string(),
            "https://domain.com/api/status"
        );
        assert!(router
            .find_route_by_request(&Request::new("GET", "domain.com", "/api/status"))
            .is_some());
        assert!(router
            .find_route_by_request(&Request::new("GET", "other.com", "/api/status"))
            .is_none());
    }

    #[test]
    fn test_from_json_config() {
        let config = RouterConfig::from_json_str(r#"{"param_requirement": "[a-z0-9-]+"}"#).unwrap();
        let mut router = Router::from_config(config).unwrap();
        router.add_get_route("post", "/posts/{slug}", Action::default()).unwrap();

        assert!(router
            .find_route_by_request(&Request::with_path("GET", "/posts/hello-world"))
            .is_some());
        assert!(router
            .find_route_by_request(&Request::with_path("GET", "/posts/Hello"))
            .is_none());
        assert_eq!(router.config().param_requirement, "[a-z0-9-]+");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let config = RouterConfig::default().with_param_requirement("[a-z");
        assert!(matches!(
            Router::from_config(config),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_hyper_request_resolution() {
        let mut router = Router::new();
        router
            .add_route_group("users", "/users", Options::new())
            .unwrap()
            .add_get_route("get", "/{id:[0-9]+}", Action::default())
            .unwrap();

        let req = hyper::Request::builder()
            .method("GET")
            .uri("http://domain.de/users/7")
            .body(())
            .unwrap();
        let route = router.find_route_by_request(&req).unwrap();
        assert_eq!(route.extract_params(&req).unwrap(), params(&[("id", "7")]));
    }

    #[test]
    fn test_round_trip_three_params() {
        let mut router = Router::new();
        router
            .add_route_group("archive", "/archive/{a:[0-9]+}", Options::new())
            .unwrap()
            .add_get_route("entry", "/{b:[0-9]+}/{c}", Action::default())
            .unwrap();

        let values = params(&[("a", "2024"), ("b", "05"), ("c", "launch-notes")]);
        let route = router.find_route_by_name("archive.entry").unwrap();
        let url = route.url(&values).unwrap();
        assert_eq!(url.path, "/archive/2024/05/launch-notes");

        let req = Request::with_path("GET", url.path);
        let found = router.find_route_by_request(&req).unwrap();
        assert_eq!(found.name(), "archive.entry");
        assert_eq!(found.extract_params(&req).unwrap(), values);
    }

    #[test]
    fn test_concurrent_lookups_after_build() {
        let mut router = Router::new();
        for i in 0..8 {
            router
                .add_get_route(&format!("r{i}"), &format!("/r{i}/{{id}}"), Action::new(i))
                .unwrap();
        }
        let router = Arc::new(router);

        std::thread::scope(|scope| {
            for i in 0..8 {
                let router = Arc::clone(&router);
                scope.spawn(move || {
                    let req = Request::with_path("GET", format!("/r{i}/x"));
                    let route = router.find_route_by_request(&req).unwrap();
                    assert_eq!(route.action().downcast_ref::<i32>(), Some(&i));
                });
            }
        });
    }

    #[test]
    fn test_routes_listing() {
        let mut router = Router::new();
        router.add_get_route("a", "/a", Action::default()).unwrap();
        router.add_delete_route("b", "/b", Action::default()).unwrap();

        let routes = router.routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[1].method(), Some(&Method::Delete));
        assert_eq!(router.root().name(), "");
        assert_eq!(router.root().path(), "/");
    }
}
