//! # Rerouter Core
//!
//! Hierarchical named URL router.
//! Matches requests (method, host, path) against named route patterns and
//! builds concrete URLs back from a route name and parameter values.
//!
//! ## Architecture
//!
//! Routes live in a tree of groups. A group contributes a dotted name prefix,
//! a path prefix, a host, a scheme, default params and requirement overrides
//! to everything registered beneath it. Templates are compiled to regexes
//! once, at registration; lookups never compile anything.
//!
//! ```
//! use rerouter_core::{Action, Method, Options, ParamsMap, Request, Router};
//!
//! let mut router = Router::new();
//! router
//!     .add_route_group("users", "/users", Options::new())?
//!     .add_route("get", "/{id:[0-9]+}", Method::Get, Action::new("show_user"), Options::new())?;
//!
//! let route = router.find_route_by_request(&Request::with_path("GET", "/users/42")).unwrap();
//! assert_eq!(route.name(), "users.get");
//!
//! let mut params = ParamsMap::new();
//! params.insert("id".to_string(), "7".to_string());
//! assert_eq!(router.find_route_by_name("users.get").unwrap().url(&params)?.path, "/users/7");
//! # Ok::<(), rerouter_core::Error>(())
//! ```
//!
//! ## Modules
//!
//! - `router` - Entry point owning the root group
//! - `group` - Route groups, option inheritance and tree lookups
//! - `route` - Single routes: matching, parameter extraction, URL building
//! - `compiler` - Template to regex compilation
//! - `request` - Request view consumed by matching (plain and hyper requests)
//! - `config` - Router configuration and registration options
//! - `types` - Method, opaque action payload, parameter maps
//! - `error` - Error types and handling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compiler;
pub mod config;
pub mod error;
pub mod group;
pub mod request;
pub mod route;
pub mod router;
pub mod types;

pub use compiler::{PatternCompiler, Placeholder, Requirement};
pub use config::{Options, RouterConfig, DEFAULT_PARAM_MATCHER, DEFAULT_PARAM_REQUIREMENT};
pub use error::{Error, Result};
pub use group::{join_paths, Matchable, RouteGroup};
pub use request::{Request, RequestUrl, RouteRequest};
pub use route::{Route, RouteUrl};
pub use router::Router;
pub use types::{merge_params, Action, Method, ParamsMap, UnknownMethod};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
