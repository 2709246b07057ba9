//! # Error Handling
//!
//! Centralized error types for the rerouter core.
//! Uses `thiserror` for ergonomic error definitions.
//!
//! Every failure in this crate is a returned value. Registration errors
//! leave the routing tree untouched; query-time "no match" is reported as
//! `None`, not as an error.

use thiserror::Error;

/// Result type alias for rerouter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for route registration, matching and URL building
#[derive(Error, Debug)]
pub enum Error {
    /// Path template has a malformed, empty or repeated placeholder
    #[error("invalid path template \"{template}\" in \"{owner}\": {reason}")]
    InvalidTemplate {
        /// Route or group the template belongs to
        owner: String,
        /// The offending template
        template: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A parameter requirement expression is not usable
    #[error(
        "error while compiling requirement \"{expression}\" for param \"{param}\" in \"{owner}\": {reason}"
    )]
    InvalidRequirement {
        /// Route or group the requirement belongs to
        owner: String,
        /// Parameter the requirement constrains
        param: String,
        /// The offending expression
        expression: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A route or group with the same dotted name is already registered
    #[error("route with name \"{name}\" already exists")]
    DuplicateName {
        /// The fully qualified name that collided
        name: String,
    },

    /// A required parameter was not supplied while building a URL
    #[error("param \"{name}\" is not provided")]
    MissingParameter {
        /// The missing parameter
        name: String,
    },

    /// A parameter value does not fully match its requirement
    #[error("invalid format provided for param \"{name}\"")]
    InvalidParameterFormat {
        /// The rejected parameter
        name: String,
    },

    /// Request carries no URL to extract parameters from
    #[error("url is not provided")]
    UrlMissing,

    /// Request path is not owned by the route
    #[error("url does not belong to route")]
    RouteMismatch {
        /// Route the extraction was attempted on
        route: String,
        /// Path that failed to match
        path: String,
    },

    /// Router configuration contains an unusable expression
    #[error("invalid router configuration for {setting} \"{expression}\": {reason}")]
    InvalidConfig {
        /// Setting name (e.g. `param_matcher`)
        setting: &'static str,
        /// The offending expression
        expression: String,
        /// Reason for invalidity
        reason: String,
    },

    /// JSON configuration document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_message() {
        let err = Error::MissingParameter {
            name: "param3".to_string(),
        };
        assert_eq!(err.to_string(), "param \"param3\" is not provided");
    }

    #[test]
    fn test_invalid_format_message() {
        let err = Error::InvalidParameterFormat {
            name: "param2".to_string(),
        };
        assert_eq!(err.to_string(), "invalid format provided for param \"param2\"");
    }

    #[test]
    fn test_route_mismatch_message() {
        let err = Error::RouteMismatch {
            route: "users.get".to_string(),
            path: "/nope".to_string(),
        };
        assert_eq!(err.to_string(), "url does not belong to route");
    }

    #[test]
    fn test_invalid_requirement_names_owner() {
        let err = Error::InvalidRequirement {
            owner: "users.get".to_string(),
            param: "id".to_string(),
            expression: "[0-9".to_string(),
            reason: "unclosed class".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("users.get"));
        assert!(msg.contains("[0-9"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
