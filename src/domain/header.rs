//! Managed / unmanaged file headers added during template sync

use std::path::Path;

use regex::{NoExpand, Regex};

use crate::domain::{DomainError, DomainResult};

/// Extensions whose files accept `#` comments.
const HEADER_COMPATIBLE_EXTENSIONS: &[&str] = &[
    "yml", "yaml", "toml", "py", "sh", "bash", "zsh", "fish", "conf", "gitignore", "cfg",
];

/// Whether a header may be inserted into this file.
///
/// Dotfiles named after a compatible extension (`.gitignore`) qualify too.
pub fn supports_header(path: &Path) -> bool {
    let compatible = |s: &str| {
        HEADER_COMPATIBLE_EXTENSIONS
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(s))
    };
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        return compatible(ext);
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix('.'))
        .is_some_and(compatible)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// Overwritten on every sync
    Managed,
    /// Copied once, then owned by the repository
    Unmanaged,
}

impl HeaderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderKind::Managed => "managed",
            HeaderKind::Unmanaged => "unmanaged",
        }
    }
}

/// Header block for one sync source.
#[derive(Debug, Clone)]
pub struct Header {
    kind: HeaderKind,
    text: String,
    managed_block: Regex,
}

impl Header {
    pub fn new(kind: HeaderKind, source: &str) -> DomainResult<Self> {
        let text = match kind {
            HeaderKind::Managed => format!(
                "# MANAGED BY {source} - DO NOT EDIT\n\
                 # This file is automatically updated during sync operations\n\
                 # Source: {source}\n\n"
            ),
            HeaderKind::Unmanaged => format!(
                "# SAFE TO CUSTOMIZE - This file is copied once and not overwritten during sync\n\
                 # Source: {source}\n\n"
            ),
        };
        // marker line plus every directly following comment line
        let managed_block = Regex::new(&format!(
            r"(?m)^# MANAGED BY {}.*(?:\n#.*)*",
            regex::escape(source)
        ))
        .map_err(|e| DomainError::InvalidHeaderSource {
            source_name: source.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            kind,
            text,
            managed_block,
        })
    }

    pub fn kind(&self) -> HeaderKind {
        self.kind
    }

    /// Insert this header into file content.
    ///
    /// An existing managed block is replaced in place; otherwise the header
    /// goes after a shebang line, or at the top.
    pub fn apply(&self, content: &str) -> String {
        if self.managed_block.is_match(content) {
            return self
                .managed_block
                .replace(content, NoExpand(self.text.trim_end()))
                .into_owned();
        }

        if content.starts_with("#!") {
            return match content.split_once('\n') {
                Some((shebang, rest)) => format!("{shebang}\n{}{rest}", self.text),
                None => format!("{content}\n{}", self.text),
            };
        }

        format!("{}{content}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn managed() -> Header {
        Header::new(HeaderKind::Managed, "reposync").unwrap()
    }

    #[test]
    fn given_plain_content_when_apply_then_header_prepended() {
        let out = managed().apply("name: ci\n");
        assert!(out.starts_with("# MANAGED BY reposync - DO NOT EDIT\n"));
        assert!(out.ends_with("# Source: reposync\n\nname: ci\n"));
    }

    #[test]
    fn given_shebang_when_apply_then_header_after_shebang() {
        let out = managed().apply("#!/bin/sh\necho hi\n");
        assert!(out.starts_with("#!/bin/sh\n# MANAGED BY reposync"));
        assert!(out.ends_with("\n\necho hi\n"));
    }

    #[test]
    fn given_existing_managed_header_when_apply_then_replaced_not_duplicated() {
        let existing = "# MANAGED BY reposync - old wording\n# Last synced: 2020-01-01\nname: ci\n";
        let out = managed().apply(existing);
        assert_eq!(out.matches("# MANAGED BY reposync").count(), 1);
        assert!(!out.contains("Last synced"));
        assert!(out.ends_with("# Source: reposync\nname: ci\n"));
    }

    #[test]
    fn given_reapplied_header_when_apply_then_stable() {
        let header = managed();
        let once = header.apply("name: ci\n");
        let twice = header.apply(&once);
        assert_eq!(twice.matches("# MANAGED BY").count(), 1);
        assert!(twice.ends_with("name: ci\n"));
    }

    #[test]
    fn given_unmanaged_header_when_apply_then_safe_to_customize() {
        let header = Header::new(HeaderKind::Unmanaged, "reposync").unwrap();
        let out = header.apply("x = 1\n");
        assert!(out.starts_with("# SAFE TO CUSTOMIZE"));
        assert_eq!(header.kind(), HeaderKind::Unmanaged);
    }

    #[test]
    fn given_source_with_regex_metachars_when_new_then_escaped() {
        let header = Header::new(HeaderKind::Managed, "org/repo (v1.*)").unwrap();
        let once = header.apply("a: 1\n");
        assert_eq!(header.apply(&once).matches("# MANAGED BY").count(), 1);
    }

    #[test]
    fn given_paths_when_supports_header_then_by_extension() {
        assert!(supports_header(Path::new("ci.yml")));
        assert!(supports_header(Path::new("pyproject.TOML")));
        assert!(supports_header(Path::new(".gitignore")));
        assert!(!supports_header(Path::new("README.md")));
        assert!(!supports_header(Path::new("Makefile")));
    }
}
