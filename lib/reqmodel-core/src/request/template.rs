use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use regex::{Captures, Regex};
use tracing::debug;

use crate::{BuildError, ConfigurationError};

/// Regular expression for matching placeholders in the format `{name}`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>\w+)}").expect("a valid regex"));

/// A URL template with named `{placeholder}`s, e.g. `https://broker.example/{page}/`.
///
/// The same placeholder can appear several times, every occurrence gets the same value.
///
/// ```rust
/// use indexmap::IndexMap;
/// use reqmodel_core::UrlTemplate;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let template = UrlTemplate::parse("https://api.example.com/users/{id}/posts/{id}")?;
/// let values = IndexMap::from([("id".to_string(), "42".to_string())]);
///
/// assert_eq!(template.resolve(&values)?, "https://api.example.com/users/42/posts/42");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{template}")]
pub struct UrlTemplate {
    template: String,
    placeholders: IndexSet<String>,
}

impl UrlTemplate {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// Fails if a brace is not part of a valid `{name}` placeholder,
    /// names are made of alphanumeric characters and underscores.
    pub fn parse(template: impl Into<String>) -> Result<Self, ConfigurationError> {
        let template = template.into();

        let remaining = RE.replace_all(&template, "");
        if remaining.contains(['{', '}']) {
            return Err(ConfigurationError::InvalidTemplate {
                template,
                reason: "unbalanced brace or invalid placeholder name".to_string(),
            });
        }

        let placeholders = RE
            .captures_iter(&template)
            .filter_map(|caps| caps.name("name"))
            .map(|name| name.as_str().to_string())
            .collect();

        Ok(Self {
            template,
            placeholders,
        })
    }

    /// The raw template.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// The distinct placeholder names, in order of first appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.placeholders.iter().map(String::as_str)
    }

    /// Checks whether the template has a placeholder with that name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.placeholders.contains(name)
    }

    /// Substitutes every placeholder with its value.
    ///
    /// Values are inserted verbatim, so they must already be encoded for the URL path.
    ///
    /// # Errors
    ///
    /// - [`BuildError::TemplateUnresolved`] if a placeholder has no value,
    /// - [`BuildError::UnusedPathValue`] if a value has no placeholder.
    pub fn resolve(&self, values: &IndexMap<String, String>) -> Result<String, BuildError> {
        let missings: Vec<String> = self
            .placeholders
            .iter()
            .filter(|name| !values.contains_key(*name))
            .cloned()
            .collect();
        if !missings.is_empty() {
            return Err(BuildError::TemplateUnresolved {
                template: self.template.clone(),
                missings,
            });
        }

        let unused: Vec<String> = values
            .keys()
            .filter(|name| !self.placeholders.contains(*name))
            .cloned()
            .collect();
        if !unused.is_empty() {
            return Err(BuildError::UnusedPathValue {
                template: self.template.clone(),
                names: unused,
            });
        }

        let resolved = RE.replace_all(&self.template, |caps: &Captures| {
            caps.name("name")
                .and_then(|name| values.get(name.as_str()))
                .cloned()
                .unwrap_or_default()
        });
        debug!(template = %self.template, %resolved, "template resolved");

        Ok(resolved.into_owned())
    }
}
