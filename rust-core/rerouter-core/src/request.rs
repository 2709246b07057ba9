//! # Request Adapter
//!
//! The router reads three things from an incoming request: the method, the
//! host and the path. `RouteRequest` is that view. It is implemented for the
//! plain [`Request`] value and for `hyper::Request<B>`, so a hyper service can
//! resolve routes without copying anything.

/// Read-only view of a request as seen by the router
pub trait RouteRequest {
    /// Method token, e.g. `GET`
    fn method(&self) -> &str;

    /// Host (with port, if any); empty when unknown
    fn host(&self) -> &str;

    /// Request path, or `None` if the request carries no URL
    fn path(&self) -> Option<&str>;
}

/// Host and path part of a request URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestUrl {
    /// Host, e.g. `domain.com`
    pub host: String,
    /// Path, e.g. `/users/42`
    pub path: String,
}

/// Minimal owned request value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Method token
    pub method: String,
    /// URL, absent for requests that never had one
    pub url: Option<RequestUrl>,
}

impl Request {
    /// Create a request for `host` + `path`
    pub fn new(method: impl Into<String>, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: Some(RequestUrl {
                host: host.into(),
                path: path.into(),
            }),
        }
    }

    /// Create a request without a host
    pub fn with_path(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(method, "", path)
    }

    /// Create a request that carries no URL at all
    pub fn without_url(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: None,
        }
    }
}

impl RouteRequest for Request {
    fn method(&self) -> &str {
        &self.method
    }

    fn host(&self) -> &str {
        self.url.as_ref().map_or("", |url| url.host.as_str())
    }

    fn path(&self) -> Option<&str> {
        self.url.as_ref().map(|url| url.path.as_str())
    }
}

impl<B> RouteRequest for hyper::Request<B> {
    fn method(&self) -> &str {
        hyper::Request::method(self).as_str()
    }

    /// Authority of an absolute-form URI, otherwise the `Host` header
    fn host(&self) -> &str {
        self.uri()
            .authority()
            .map(|authority| authority.as_str())
            .or_else(|| {
                self.headers()
                    .get(hyper::header::HOST)
                    .and_then(|value| value.to_str().ok())
            })
            .unwrap_or("")
    }

    fn path(&self) -> Option<&str> {
        Some(self.uri().path())
    }
}
