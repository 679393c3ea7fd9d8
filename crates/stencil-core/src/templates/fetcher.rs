//! Template retrieval into the local cache
//!
//! A template reference `{url, tag}` maps to one directory under the cache
//! root. Retrieval fills that directory:
//! - Remote: downloads the repository archive for the tag and extracts it
//! - Local: copies a template directory (used for development and tests)
//!
//! Extraction goes to a staging directory that is renamed into place once
//! complete.

use super::version;
use crate::config::Settings;
use crate::manifest::TemplateRef;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Cache folder used when a reference has no tag
const UNTAGGED_DIR: &str = "latest";

/// Template source - either remote URL or local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Classify a template URL: existing directories and `file://` URLs are local
    pub fn parse(raw: &str) -> Result<Self> {
        if Path::new(raw).is_dir() {
            return Ok(Self::Local(PathBuf::from(raw)));
        }
        let url = Url::parse(raw).with_context(|| format!("Invalid template URL: {}", raw))?;
        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|_| anyhow::anyhow!("Invalid file URL: {}", raw))?;
            return Ok(Self::Local(path));
        }
        Ok(Self::Remote(url))
    }
}

/// Template fetcher - retrieves template sources into the local cache
pub struct TemplateFetcher {
    cache_root: PathBuf,
    client: reqwest::Client,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(cache_root: impl Into<PathBuf>, user_agent: &str) -> Self {
        Self {
            cache_root: cache_root.into(),
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a fetcher from a product config and project settings
    pub fn from_config<C: ProductConfig>(config: &C, settings: &Settings) -> Self {
        Self::new(settings.cache_root(config), config.user_agent())
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Cache directory for a template reference
    pub fn template_dir(&self, reference: &TemplateRef) -> Result<PathBuf> {
        let mut dir = match TemplateSource::parse(&reference.url)? {
            TemplateSource::Remote(url) => {
                let mut dir = self
                    .cache_root
                    .join(url.host_str().unwrap_or("unknown-host"));
                for segment in url.path_segments().into_iter().flatten() {
                    let segment = segment.trim_end_matches(".git");
                    if !segment.is_empty() {
                        dir.push(segment);
                    }
                }
                dir
            }
            TemplateSource::Local(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "template".to_string());
                self.cache_root.join("local").join(name)
            }
        };
        dir.push(if reference.tag.is_empty() {
            UNTAGGED_DIR
        } else {
            &reference.tag
        });
        Ok(dir)
    }

    /// Build the archive URL for a tag, preserving query parameters
    fn archive_url(base: &Url, tag: &str) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?;
            segments.pop_if_empty();
            if tag.is_empty() {
                segments.extend(["archive", "HEAD.zip"]);
            } else {
                segments.extend(["archive", "refs", "tags"]);
                segments.push(&format!("{}.zip", tag));
            }
        }
        // `owner/repo.git` and `owner/repo` serve the same archive
        let path = url.path().replacen(".git/archive/", "/archive/", 1);
        url.set_path(&path);
        Ok(url)
    }

    /// Retrieve the template for `reference` into its cache directory
    pub async fn retrieve(&self, reference: &TemplateRef) -> Result<PathBuf> {
        let target = self.template_dir(reference)?;
        let staging = staging_dir(&target);
        if staging.exists() {
            std::fs::remove_dir_all(&staging)
                .with_context(|| format!("Failed to clear {}", staging.display()))?;
        }
        std::fs::create_dir_all(&staging)
            .with_context(|| format!("Failed to create {}", staging.display()))?;

        let count = match TemplateSource::parse(&reference.url)? {
            TemplateSource::Remote(base) => {
                let url = Self::archive_url(&base, &reference.tag)?;
                info!(%url, "downloading template archive");
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("Failed to fetch template archive from {}", url))?;

                if !response.status().is_success() {
                    anyhow::bail!(
                        "Failed to fetch template archive from {}: HTTP {}",
                        url,
                        response.status()
                    );
                }

                let bytes = response.bytes().await?;
                Self::extract_archive(&bytes, &staging)?
            }
            TemplateSource::Local(path) => Self::copy_local(&path, &staging)?,
        };

        if target.exists() {
            std::fs::remove_dir_all(&target)
                .with_context(|| format!("Failed to replace {}", target.display()))?;
        }
        std::fs::rename(&staging, &target)
            .with_context(|| format!("Failed to move template into {}", target.display()))?;

        info!(files = count, dir = %target.display(), "template retrieved");
        Ok(target)
    }

    /// Extract a repository archive, dropping its single top-level folder
    fn extract_archive(zip_bytes: &[u8], dest: &Path) -> Result<usize> {
        let mut archive =
            ZipArchive::new(Cursor::new(zip_bytes)).context("Failed to read template archive")?;

        let mut count = 0;
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            // Skip directories
            if file.is_dir() {
                continue;
            }
            let Some(enclosed) = file.enclosed_name() else {
                continue;
            };
            let relative: PathBuf = enclosed.components().skip(1).collect();
            if relative.as_os_str().is_empty() {
                continue;
            }

            let target = dest.join(&relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            std::fs::write(&target, &contents)
                .with_context(|| format!("Failed to write file: {}", target.display()))?;
            count += 1;
        }
        Ok(count)
    }

    /// Copy a local template tree, skipping VCS metadata
    fn copy_local(source: &Path, dest: &Path) -> Result<usize> {
        let mut count = 0;
        for entry in WalkDir::new(source)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git")
        {
            let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
            let relative = entry.path().strip_prefix(source)?;
            let target = dest.join(relative);
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target)
                    .with_context(|| format!("Failed to create directory: {}", target.display()))?;
            } else {
                std::fs::copy(entry.path(), &target)
                    .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
                count += 1;
            }
        }
        debug!(files = count, from = %source.display(), "copied local template");
        Ok(count)
    }

    /// Highest semver tag published by the template source
    ///
    /// Local sources are untagged and resolve to an empty tag.
    pub async fn latest_tag(&self, template_url: &str) -> Result<String> {
        let url = match TemplateSource::parse(template_url)? {
            TemplateSource::Local(_) => return Ok(String::new()),
            TemplateSource::Remote(url) => url,
        };

        let output = tokio::process::Command::new("git")
            .args(["ls-remote", "--tags", url.as_str()])
            .output()
            .await
            .context("Failed to run git ls-remote")?;
        if !output.status.success() {
            anyhow::bail!(
                "git ls-remote failed for {}: {}",
                url,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let listing = String::from_utf8_lossy(&output.stdout);
        let tags = version::tags_from_ls_remote(&listing);
        Ok(version::latest_tag(tags.iter().map(String::as_str)).unwrap_or_default())
    }
}

/// Sibling directory a retrieval is staged in
fn staging_dir(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!("{}.partial", name))
}
