//! Project types that select workflow templates

use std::collections::BTreeSet;
use std::fmt;

/// Something whose presence in a directory marks a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// A file with this exact name
    File(&'static str),
    /// A subdirectory with this exact name
    Dir(&'static str),
}

/// Project type, named after its template directory (`project/<type>/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProjectType {
    Go,
    Python,
    Lua,
}

impl ProjectType {
    pub const ALL: [ProjectType; 3] = [ProjectType::Go, ProjectType::Python, ProjectType::Lua];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Go => "go",
            ProjectType::Python => "python",
            ProjectType::Lua => "lua",
        }
    }

    pub fn indicators(&self) -> &'static [Indicator] {
        match self {
            ProjectType::Go => &[Indicator::File("go.mod")],
            ProjectType::Python => &[
                Indicator::File("pyproject.toml"),
                Indicator::File("uv.lock"),
                Indicator::File("requirements.txt"),
            ],
            ProjectType::Lua => &[Indicator::Dir("lua"), Indicator::File("stylua.toml")],
        }
    }

    /// Whether a directory with these entries is a project of this type.
    pub fn matches(&self, files: &BTreeSet<String>, dirs: &BTreeSet<String>) -> bool {
        self.indicators().iter().any(|indicator| match indicator {
            Indicator::File(name) => files.contains(*name),
            Indicator::Dir(name) => dirs.contains(*name),
        })
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
