//! Pattern-based template routing.
//!
//! A rules file lists `(glob pattern, template name)` pairs, two lines per
//! rule. Blank lines and lines starting with `#` are ignored:
//!
//! ```text
//! # home page
//! index
//! home.html
//!
//! blog/*
//! post.html
//!
//! **
//! page.html
//! ```
//!
//! Rules are evaluated top to bottom and the first match wins, so specific
//! patterns go before catch-alls.
//!
//! # Glob Dialect
//!
//! Patterns use [`glob::Pattern`] with a literal separator: `*` and `?`
//! never cross a `/`, `**` spans any number of segments (including none),
//! `[...]` matches character classes. Matching is case-sensitive.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern, PatternError};

/// Routing rules file name inside a theme.
pub const ROUTES_FILE: &str = "routes.conf";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Routing error.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Rules file is absent.
    #[error("Routing rules not found: {}", .0.display())]
    MissingRules(PathBuf),
    /// Rules file can't be read.
    #[error("Failed to read routing rules {}: {source}", path.display())]
    Io {
        /// Rules file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A pattern failed to compile.
    #[error("Invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Glob compile error.
        #[source]
        source: PatternError,
    },
    /// No rule matches the page path.
    #[error("No route matches page '{0}'")]
    NoMatch(String),
    /// The matching rule has no template line.
    #[error("Route '{pattern}' matching page '{path}' has no template")]
    MissingTemplate {
        /// Pattern of the matching rule.
        pattern: String,
        /// Page path being resolved.
        path: String,
    },
}

/// One routing rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Glob pattern matched against page paths.
    pub pattern: String,
    /// Template used on match. `None` when the rules file has an unpaired
    /// trailing pattern.
    pub template: Option<String>,
}

/// Ordered routing rules with compiled matchers.
#[derive(Debug, Default)]
pub struct Router {
    rules: Vec<Rule>,
    compiled: HashMap<String, Pattern>,
}

impl Router {
    /// Create a router with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse rules from the line-oriented rules format.
    ///
    /// The result is not compiled yet; call [`Router::compile`] before
    /// resolving.
    #[must_use]
    pub fn load_rules(source: &str) -> Self {
        let mut lines = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        let mut rules = Vec::new();
        while let Some(pattern) = lines.next() {
            rules.push(Rule {
                pattern: pattern.to_owned(),
                template: lines.next().map(str::to_owned),
            });
        }

        Self {
            rules,
            compiled: HashMap::new(),
        }
    }

    /// Read, parse and compile a rules file.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::MissingRules`] if the file doesn't exist,
    /// [`RouteError::Io`] if it can't be read, or
    /// [`RouteError::InvalidPattern`] if a pattern doesn't compile.
    pub fn from_file(path: &Path) -> Result<Self, RouteError> {
        if !path.is_file() {
            return Err(RouteError::MissingRules(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path).map_err(|source| RouteError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut router = Self::load_rules(&source);
        router.compile()?;
        tracing::debug!(path = %path.display(), rules = router.rules.len(), "Loaded routing rules");
        Ok(router)
    }

    /// Loaded rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Compile every rule's pattern into the matcher cache.
    ///
    /// The cache is keyed by the literal pattern string; compiling again
    /// replaces existing entries.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] for the first pattern that
    /// doesn't compile.
    pub fn compile(&mut self) -> Result<(), RouteError> {
        for rule in &self.rules {
            let pattern = Pattern::new(&rule.pattern).map_err(|source| RouteError::InvalidPattern {
                pattern: rule.pattern.clone(),
                source,
            })?;
            self.compiled.insert(rule.pattern.clone(), pattern);
        }
        Ok(())
    }

    /// First rule whose compiled pattern matches `path`.
    #[must_use]
    pub fn matching_rule(&self, path: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| {
            self.compiled
                .get(&rule.pattern)
                .is_some_and(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
        })
    }

    /// Template for `path`, or `None` when nothing matches or the first
    /// matching rule has no template.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.matching_rule(path)?.template.as_deref()
    }

    /// Template for `path`, reporting why resolution failed.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NoMatch`] when no rule matches, or
    /// [`RouteError::MissingTemplate`] when the first match has no template.
    pub fn require(&self, path: &str) -> Result<&str, RouteError> {
        let rule = self
            .matching_rule(path)
            .ok_or_else(|| RouteError::NoMatch(path.to_owned()))?;
        rule.template
            .as_deref()
            .ok_or_else(|| RouteError::MissingTemplate {
                pattern: rule.pattern.clone(),
                path: path.to_owned(),
            })
    }
}
