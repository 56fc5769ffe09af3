//! Markdown rendering of the bumped-dependencies note

use crate::aggregate::DependencyBuckets;
use crate::domain::VersionSet;
use crate::error::ConfigError;
use indexmap::IndexMap;
use url::Url;

/// Default package page base
pub const DEFAULT_REGISTRY_URL: &str = "https://npmjs.com/package/";

/// Renders change notes with links to the registry and the pull request
#[derive(Debug, Clone)]
pub struct ChangeRenderer {
    registry_url: Url,
}

impl ChangeRenderer {
    /// Create a renderer linking packages under `registry_url`
    ///
    /// A missing trailing slash is added so package paths are appended
    /// rather than replacing the last segment.
    pub fn new(registry_url: &str) -> Result<Self, ConfigError> {
        let mut base = registry_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let registry_url = Url::parse(&base).map_err(|e| ConfigError::invalid_url(registry_url, e))?;
        Ok(Self { registry_url })
    }

    /// Markdown link to one package version
    pub fn package_link(&self, name: &str, version: &str) -> Result<String, ConfigError> {
        let relative = format!("{}/v/{}", name, version);
        let url = self
            .registry_url
            .join(&relative)
            .map_err(|e| ConfigError::invalid_url(relative.as_str(), e))?;
        Ok(format!("[`{}@{}`]({})", name, version, url))
    }

    /// Render the change note
    ///
    /// Empty buckets are left out. `since` names the baseline in the header.
    pub fn render(
        &self,
        buckets: &DependencyBuckets,
        pull_request: &str,
        project_url: &str,
        since: Option<&str>,
    ) -> Result<String, ConfigError> {
        let pr_url = pull_request_url(project_url, pull_request)?;
        let mut text = format!("Bumped dependencies, in PR [#{}]({})", pull_request, pr_url);
        if let Some(base_ref) = since {
            text.push_str(&format!(", since {}", base_ref));
        }
        text.push('\n');

        self.render_bucket(&mut text, "Production dependencies", &buckets.production)?;
        self.render_bucket(&mut text, "Development dependencies", &buckets.development)?;

        Ok(text)
    }

    fn render_bucket(
        &self,
        text: &mut String,
        title: &str,
        bucket: &IndexMap<String, VersionSet>,
    ) -> Result<(), ConfigError> {
        if bucket.is_empty() {
            return Ok(());
        }

        text.push_str(&format!("- {}\n", title));
        for (name, versions) in bucket {
            for version in versions {
                text.push_str(&format!("  - {}\n", self.package_link(name, version)?));
            }
        }
        Ok(())
    }
}

/// Pull request URL: the project URL joined with `pull/` then the number
pub fn pull_request_url(project_url: &str, pull_request: &str) -> Result<Url, ConfigError> {
    let invalid = |e: url::ParseError| ConfigError::invalid_url(project_url, e);
    Url::parse(project_url)
        .and_then(|url| url.join("pull/"))
        .and_then(|url| url.join(pull_request))
        .map_err(invalid)
}

/// Format text as a markdown list item
///
/// The first line gets `- `, the following lines are indented two spaces.
pub fn as_list_item(text: &str) -> String {
    text.trim_end()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let prefix = if i == 0 { "- " } else { "  " };
            format!("{}{}", prefix, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
