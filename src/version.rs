//! Version information with embedded git metadata.

use std::sync::LazyLock;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true"))
}

/// Abbreviated commit SHA (at most 7 characters).
pub fn git_short_sha() -> &'static str {
    GIT_SHA.get(..7).unwrap_or(GIT_SHA)
}

/// Version string reported by `sentimentd --version` and at startup.
///
/// Formatted as `{version}+{branch}.{sha}`, with `.dirty` appended for
/// builds from a modified tree, e.g. `0.1.0+main.abc1234.dirty`.
pub fn version_string() -> String {
    let mut version = format!("{PKG_VERSION}+{GIT_BRANCH}.{}", git_short_sha());
    if git_dirty() {
        version.push_str(".dirty");
    }
    version
}

static FULL_VERSION: LazyLock<String> = LazyLock::new(version_string);

/// [`version_string`] computed once, for APIs that want a `&'static str`.
pub fn full_version() -> &'static str {
    FULL_VERSION.as_str()
}
