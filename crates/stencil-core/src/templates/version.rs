//! Version tag selection for template repositories

use anyhow::Result;
use semver::Version;

/// Parse version string, handling various formats
pub fn parse_version(version_str: &str) -> Result<Version> {
    // Remove leading 'v' if present
    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Pick the highest semver tag, returning it as originally spelled
///
/// Tags that are not semver (e.g. `nightly`) are ignored.
pub fn latest_tag<'a, I>(tags: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .filter_map(|tag| parse_version(tag).ok().map(|v| (v, tag)))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, tag)| tag.to_string())
}

/// Extract tag names from `git ls-remote --tags` output
pub fn tags_from_ls_remote(output: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for line in output.lines() {
        let Some(reference) = line.split_whitespace().nth(1) else {
            continue;
        };
        let Some(tag) = reference.strip_prefix("refs/tags/") else {
            continue;
        };
        // Annotated tags show up twice, once peeled with a ^{} suffix
        let tag = tag.trim_end_matches("^{}");
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
