//! # Pattern Compiler
//!
//! Turns a path template such as `/users/{id:[0-9]+}/{slug}` into the pieces
//! routes and groups need:
//!
//! - the ordered list of required parameter names
//! - a requirement per parameter (inline, explicit override or default)
//! - the forward regex used for request matching
//! - the reverse template (`/users/{id}/{slug}`) used for URL building
//!
//! One compiler is built per router and shared by every node of the tree.
//!
//! ## Design Principles
//!
//! - **S**: Only compiles and validates templates; matching lives in `route`/`group`
//! - **D**: Routes receive compiled values, never raw configuration

use crate::config::RouterConfig;
use crate::error::{Error, Result};
use crate::types::ParamsMap;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

/// A constraint on the legal values of one parameter
#[derive(Debug)]
pub struct Requirement {
    expression: String,
    validator: Regex,
}

impl Requirement {
    /// Compile a requirement expression for `param` of `owner`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRequirement` if the expression does not compile
    /// or contains capturing groups (use `(?:...)` instead).
    pub fn compile(owner: &str, param: &str, expression: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidRequirement {
            owner: owner.to_string(),
            param: param.to_string(),
            expression: expression.to_string(),
            reason,
        };

        let compiled = Regex::new(expression).map_err(|e| invalid(e.to_string()))?;
        if compiled.captures_len() > 1 {
            return Err(invalid(
                "capturing groups are not allowed, use (?:...) instead".to_string(),
            ));
        }

        let validator =
            Regex::new(&format!("^(?:{expression})$")).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            expression: expression.to_string(),
            validator,
        })
    }

    /// The requirement as written
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether `value` matches the requirement as a whole
    #[must_use]
    pub fn is_full_match(&self, value: &str) -> bool {
        self.validator.is_match(value)
    }

    /// Text substituted into a forward regex: the expression as one capture group
    fn forward_pattern(&self) -> String {
        format!("({})", self.expression)
    }
}

/// One `{...}` occurrence in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Parameter name
    pub name: String,
    /// Inline requirement from `{name:expr}`
    pub inline: Option<String>,
    span: Range<usize>,
}

/// Everything a route or group needs from its template
#[derive(Debug)]
pub(crate) struct CompiledPattern {
    pub template: String,
    pub reverse: String,
    pub required: Vec<String>,
    pub requirements: HashMap<String, Arc<Requirement>>,
    pub forward: Regex,
}

/// Shared compiler holding the placeholder matcher and default requirement
#[derive(Debug)]
pub struct PatternCompiler {
    param_matcher: Regex,
    requirement: Arc<Requirement>,
}

impl PatternCompiler {
    /// Build a compiler from router configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if an expression does not compile, the
    /// placeholder matcher does not have exactly one capture group, or the
    /// default requirement has any.
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        let param_matcher =
            Regex::new(&config.param_matcher).map_err(|e| Error::InvalidConfig {
                setting: "param_matcher",
                expression: config.param_matcher.clone(),
                reason: e.to_string(),
            })?;
        if param_matcher.captures_len() != 2 {
            return Err(Error::InvalidConfig {
                setting: "param_matcher",
                expression: config.param_matcher.clone(),
                reason: "exactly one capture group is required".to_string(),
            });
        }

        let requirement = Requirement::compile("", "", &config.param_requirement).map_err(|e| {
            Error::InvalidConfig {
                setting: "param_requirement",
                expression: config.param_requirement.clone(),
                reason: match e {
                    Error::InvalidRequirement { reason, .. } => reason,
                    other => other.to_string(),
                },
            }
        })?;

        Ok(Self {
            param_matcher,
            requirement: Arc::new(requirement),
        })
    }

    /// The process-wide default requirement
    #[must_use]
    pub fn default_requirement(&self) -> &Arc<Requirement> {
        &self.requirement
    }

    /// Scan `template` for placeholders, left to right
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTemplate` for an empty or repeated name.
    pub fn extract_parameters(&self, owner: &str, template: &str) -> Result<Vec<Placeholder>> {
        let invalid = |reason: String| Error::InvalidTemplate {
            owner: owner.to_string(),
            template: template.to_string(),
            reason,
        };

        let mut placeholders: Vec<Placeholder> = Vec::new();
        for caps in self.param_matcher.captures_iter(template) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                return Err(invalid("placeholder without a name".to_string()));
            };

            let (name, inline) = match body.as_str().split_once(':') {
                Some((name, expr)) if !expr.is_empty() => (name, Some(expr.to_string())),
                Some((name, _)) => (name, None),
                None => (body.as_str(), None),
            };

            if name.is_empty() {
                return Err(invalid("empty param name".to_string()));
            }
            if placeholders.iter().any(|p| p.name == name) {
                return Err(invalid(format!("param \"{name}\" is provided multiple times")));
            }

            placeholders.push(Placeholder {
                name: name.to_string(),
                inline,
                span: whole.range(),
            });
        }

        Ok(placeholders)
    }

    /// Resolve the requirement of every placeholder and of every override
    ///
    /// Inline expressions win over `overrides`; anything left falls back to
    /// the default requirement.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRequirement` if an expression is unusable.
    pub fn compile_requirements(
        &self,
        owner: &str,
        placeholders: &[Placeholder],
        overrides: &ParamsMap,
    ) -> Result<HashMap<String, Arc<Requirement>>> {
        let mut result = HashMap::new();

        for placeholder in placeholders {
            let expression = placeholder
                .inline
                .as_deref()
                .or_else(|| overrides.get(&placeholder.name).map(String::as_str));
            let requirement = match expression {
                Some(expr) => Arc::new(Requirement::compile(owner, &placeholder.name, expr)?),
                None => Arc::clone(&self.requirement),
            };
            result.insert(placeholder.name.clone(), requirement);
        }

        for (name, expr) in overrides {
            if !result.contains_key(name) {
                result.insert(name.clone(), Arc::new(Requirement::compile(owner, name, expr)?));
            }
        }

        Ok(result)
    }

    /// Build the forward regex for `template`
    ///
    /// Literal text is escaped, each placeholder becomes its requirement as a
    /// single capture group. `anchor_end` is set for routes only; a group
    /// matcher has to accept any path continuing past its own segment.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTemplate` if the assembled expression does not
    /// compile.
    pub fn compile_forward_matcher(
        &self,
        owner: &str,
        template: &str,
        placeholders: &[Placeholder],
        requirements: &HashMap<String, Arc<Requirement>>,
        anchor_end: bool,
    ) -> Result<Regex> {
        let mut forward = String::from("^");
        let mut cursor = 0;

        for placeholder in placeholders {
            forward.push_str(&regex::escape(&template[cursor..placeholder.span.start]));
            let requirement = requirements
                .get(&placeholder.name)
                .unwrap_or(&self.requirement);
            forward.push_str(&requirement.forward_pattern());
            cursor = placeholder.span.end;
        }
        forward.push_str(&regex::escape(&template[cursor..]));
        if anchor_end {
            forward.push('$');
        }

        let compiled = Regex::new(&forward).map_err(|e| Error::InvalidTemplate {
            owner: owner.to_string(),
            template: template.to_string(),
            reason: e.to_string(),
        })?;

        if compiled.captures_len() - 1 != placeholders.len() {
            return Err(Error::InvalidTemplate {
                owner: owner.to_string(),
                template: template.to_string(),
                reason: "capture groups do not line up with params".to_string(),
            });
        }

        Ok(compiled)
    }

    /// Run the whole pipeline for one route or group
    pub(crate) fn compile(
        &self,
        owner: &str,
        template: &str,
        overrides: &ParamsMap,
        anchor_end: bool,
    ) -> Result<CompiledPattern> {
        let placeholders = self.extract_parameters(owner, template)?;
        let requirements = self.compile_requirements(owner, &placeholders, overrides)?;
        let forward =
            self.compile_forward_matcher(owner, template, &placeholders, &requirements, anchor_end)?;

        Ok(CompiledPattern {
            template: template.to_string(),
            reverse: reverse_template(template, &placeholders),
            required: placeholders.into_iter().map(|p| p.name).collect(),
            requirements,
            forward,
        })
    }
}

/// Rewrite every placeholder to the bare `{name}` token
fn reverse_template(template: &str, placeholders: &[Placeholder]) -> String {
    let mut reverse = String::with_capacity(template.len());
    let mut cursor = 0;

    for placeholder in placeholders {
        reverse.push_str(&template[cursor..placeholder.span.start]);
        reverse.push('{');
        reverse.push_str(&placeholder.name);
        reverse.push('}');
        cursor = placeholder.span.end;
    }
    reverse.push_str(&template[cursor..]);

    reverse
}
