//! Version and source-tree identification for reporting layers.

use std::sync::OnceLock;

const GIT_BRANCH: &str = env!("OSDP_GIT_BRANCH");
const GIT_TAG: &str = env!("OSDP_GIT_TAG");
const GIT_REV: &str = env!("OSDP_GIT_REV");
const GIT_DIFF: &str = env!("OSDP_GIT_DIFF");

/// `"<crate>-<version>"`, e.g. `osdp-core-0.1.0`.
pub const fn version() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"))
}

/// Branch plus the tag, or failing that the revision, the build came from.
pub fn source_info() -> &'static str {
    static INFO: OnceLock<String> = OnceLock::new();
    INFO.get_or_init(|| describe(GIT_BRANCH, GIT_TAG, GIT_REV, GIT_DIFF))
}

fn describe(branch: &str, tag: &str, rev: &str, diff: &str) -> String {
    if !tag.is_empty() {
        format!("{branch} ({tag})")
    } else if !rev.is_empty() {
        format!("{branch} ({rev}{diff})")
    } else {
        branch.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_has_name_and_semver() {
        assert_eq!(
            version(),
            format!("osdp-core-{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn describe_prefers_tag() {
        assert_eq!(describe("main", "v2.1.0", "abc1234", "+"), "main (v2.1.0)");
        assert_eq!(describe("main", "", "abc1234", "+"), "main (abc1234+)");
        assert_eq!(describe("main", "", "abc1234", ""), "main (abc1234)");
        assert_eq!(describe("unknown", "", "", ""), "unknown");
    }

    #[test]
    fn source_info_starts_with_branch() {
        assert!(source_info().starts_with(GIT_BRANCH));
    }
}
