//! Version information injected at build time.

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git commit, or `unknown` outside a checkout
pub const GIT_COMMIT: &str = env!("TASKNORM_GIT_COMMIT");

/// Build date (UTC, `YYYY-MM-DD`)
pub const BUILD_DATE: &str = env!("TASKNORM_BUILD_DATE");

/// `tasknorm v0.1.0 (commit abc1234, built 2025-01-15)`
pub fn full_version() -> String {
    format!("tasknorm v{} (commit {}, built {})", VERSION, GIT_COMMIT, BUILD_DATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_version() {
        let version = full_version();
        assert!(version.starts_with("tasknorm v"));
        assert!(version.contains(VERSION));
        assert!(!GIT_COMMIT.is_empty());
    }
}
