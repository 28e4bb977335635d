//! Dependabot package ecosystems and the files that reveal them

use std::fmt;

/// A dependabot `package-ecosystem` value.
///
/// Variant order is the order in which ecosystems appear in generated
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ecosystem {
    GithubActions,
    Uv,
    Gomod,
    Npm,
    Docker,
    DockerCompose,
    Bundler,
    Composer,
    Cargo,
    Nuget,
    DotnetSdk,
    Mix,
    Elm,
    Gradle,
    Maven,
    Pub,
    Swift,
    Terraform,
    Devcontainers,
    Gitsubmodule,
}

/// Indicator file name -> ecosystem.
///
/// Only the primary manifest is listed where a lock file would be redundant
/// (`go.mod` not `go.sum`, `Cargo.toml` not `Cargo.lock`).
const INDICATORS: &[(&str, Ecosystem)] = &[
    ("uv.lock", Ecosystem::Uv),
    ("go.mod", Ecosystem::Gomod),
    ("package.json", Ecosystem::Npm),
    ("Dockerfile", Ecosystem::Docker),
    ("docker-compose.yml", Ecosystem::DockerCompose),
    ("docker-compose.yaml", Ecosystem::DockerCompose),
    ("Gemfile", Ecosystem::Bundler),
    ("composer.json", Ecosystem::Composer),
    ("Cargo.toml", Ecosystem::Cargo),
    ("packages.config", Ecosystem::Nuget),
    ("Directory.Packages.props", Ecosystem::Nuget),
    ("global.json", Ecosystem::DotnetSdk),
    ("mix.exs", Ecosystem::Mix),
    ("elm.json", Ecosystem::Elm),
    ("build.gradle", Ecosystem::Gradle),
    ("build.gradle.kts", Ecosystem::Gradle),
    ("pom.xml", Ecosystem::Maven),
    ("pubspec.yaml", Ecosystem::Pub),
    ("Package.swift", Ecosystem::Swift),
    ("main.tf", Ecosystem::Terraform),
    ("devcontainer.json", Ecosystem::Devcontainers),
    (".devcontainer.json", Ecosystem::Devcontainers),
    (".gitmodules", Ecosystem::Gitsubmodule),
];

impl Ecosystem {
    /// Name as written in `dependabot.yml`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::GithubActions => "github-actions",
            Ecosystem::Uv => "uv",
            Ecosystem::Gomod => "gomod",
            Ecosystem::Npm => "npm",
            Ecosystem::Docker => "docker",
            Ecosystem::DockerCompose => "docker-compose",
            Ecosystem::Bundler => "bundler",
            Ecosystem::Composer => "composer",
            Ecosystem::Cargo => "cargo",
            Ecosystem::Nuget => "nuget",
            Ecosystem::DotnetSdk => "dotnet-sdk",
            Ecosystem::Mix => "mix",
            Ecosystem::Elm => "elm",
            Ecosystem::Gradle => "gradle",
            Ecosystem::Maven => "maven",
            Ecosystem::Pub => "pub",
            Ecosystem::Swift => "swift",
            Ecosystem::Terraform => "terraform",
            Ecosystem::Devcontainers => "devcontainers",
            Ecosystem::Gitsubmodule => "gitsubmodule",
        }
    }

    /// Ecosystem revealed by a file with this exact name, if any.
    pub fn from_indicator(file_name: &str) -> Option<Self> {
        INDICATORS
            .iter()
            .find(|(name, _)| *name == file_name)
            .map(|(_, ecosystem)| *ecosystem)
    }

    /// All indicator file names.
    pub fn indicator_files() -> impl Iterator<Item = &'static str> {
        INDICATORS.iter().map(|(name, _)| *name)
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
