//! Directory exclusion patterns
//!
//! Paths are relative to the scanned root, `/`-separated, with the root
//! itself written as `.`.
//!
//! - `/tools` or `./tools`: only `tools` directly below the root
//! - `tools`: every directory named `tools`, at any depth
//! - anything with `/` or glob metacharacters: glob against the relative path

use globset::{GlobBuilder, GlobMatcher};

use crate::domain::{DomainError, DomainResult};

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// A single exclusion rule.
#[derive(Debug, Clone)]
pub enum ExcludePattern {
    /// Exact path relative to the root
    Root(String),
    /// Any path component with this name
    Name(String),
    /// Glob over the relative path
    Glob(GlobMatcher),
}

impl ExcludePattern {
    pub fn parse(pattern: &str) -> DomainResult<Self> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "empty pattern".to_string(),
            });
        }

        if matches!(trimmed, "." | "/" | "./") {
            return Ok(Self::Root(".".to_string()));
        }

        let rooted = trimmed
            .strip_prefix("./")
            .or_else(|| trimmed.strip_prefix('/'));
        if let Some(rest) = rooted {
            let rest = rest.trim_end_matches('/');
            if !rest.contains(GLOB_META) {
                return Ok(Self::Root(rest.to_string()));
            }
            return Self::glob(pattern, rest);
        }

        let bare = trimmed.trim_end_matches('/');
        if !bare.contains('/') && !bare.contains(GLOB_META) {
            return Ok(Self::Name(bare.to_string()));
        }
        Self::glob(pattern, bare)
    }

    fn glob(original: &str, glob: &str) -> DomainResult<Self> {
        let matcher = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()
            .map_err(|e| DomainError::InvalidPattern {
                pattern: original.to_string(),
                reason: e.to_string(),
            })?
            .compile_matcher();
        Ok(Self::Glob(matcher))
    }

    pub fn matches(&self, rel: &str) -> bool {
        match self {
            Self::Root(path) => rel == path,
            Self::Name(name) => rel != "." && rel.split('/').any(|c| c == name),
            Self::Glob(matcher) => matcher.is_match(rel),
        }
    }
}

/// Ordered collection of exclusion rules; a path is excluded if any rule matches.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<ExcludePattern>,
}

impl ExcludeSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> DomainResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| ExcludePattern::parse(p.as_ref()))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, rel: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(rel))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
