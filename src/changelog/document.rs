//! keep-a-changelog document model
//!
//! Parses a CHANGELOG.md into title, preamble, releases (each with
//! change-type sections) and trailing link definitions, and serializes it
//! back in markdownlint-friendly form: one blank line around headings and
//! a single trailing newline.

use crate::error::ChangelogError;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Change types in keep-a-changelog order
pub const SECTION_ORDER: [&str; 6] = ["Added", "Changed", "Deprecated", "Removed", "Fixed", "Security"];

/// Heading text of the pending release
pub const UNRELEASED: &str = "Unreleased";

/// Release heading: `## [version](link) - date` or `## version date`
static RELEASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##\s+(?:\[([^\]]+)\](?:\([^)]*\))?|(\S+))(?:\s+(?:-\s+)?(.+?))?\s*$").unwrap()
});

/// Opening or closing line of a fenced code block
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s{0,3}(`{3,}|~{3,})").unwrap());

/// Link reference definition: `[label]: url`
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[[^\]]+\]:\s*\S+").unwrap());

/// A `### Type` block inside a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Change type, e.g. `Changed`
    pub title: String,
    /// Body lines
    pub lines: Vec<String>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    fn rank(&self) -> usize {
        SECTION_ORDER
            .iter()
            .position(|t| t.eq_ignore_ascii_case(&self.title))
            .unwrap_or(SECTION_ORDER.len())
    }
}

/// A `## [version] - date` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Version, `None` for the Unreleased release
    pub version: Option<String>,
    /// Release date or other heading suffix
    pub date: Option<String>,
    /// Lines between the heading and the first section
    pub description: Vec<String>,
    /// Change-type sections in document order
    pub sections: Vec<Section>,
    /// Heading line as read, written back unchanged
    pub raw_heading: Option<String>,
}

impl Release {
    /// Create an empty Unreleased release
    pub fn unreleased() -> Self {
        Self {
            version: None,
            date: None,
            description: Vec::new(),
            sections: Vec::new(),
            raw_heading: None,
        }
    }

    /// Returns true for the Unreleased release
    pub fn is_unreleased(&self) -> bool {
        self.version.is_none()
    }

    /// Section with the given title, created in keep-a-changelog order if missing
    pub fn section_mut(&mut self, title: &str) -> &mut Section {
        if let Some(index) = self
            .sections
            .iter()
            .position(|s| s.title.eq_ignore_ascii_case(title))
        {
            return &mut self.sections[index];
        }

        let section = Section::new(title);
        let rank = section.rank();
        let index = self
            .sections
            .iter()
            .position(|s| s.rank() > rank)
            .unwrap_or(self.sections.len());
        self.sections.insert(index, section);
        &mut self.sections[index]
    }

    /// Append a list item to the `Changed` section
    ///
    /// `item` is already formatted as a markdown list item.
    pub fn changed(&mut self, item: &str) {
        let section = self.section_mut("Changed");
        trim_trailing_blank(&mut section.lines);
        section.lines.extend(item.lines().map(str::to_string));
    }

    fn heading(&self) -> String {
        if let Some(raw) = &self.raw_heading {
            return raw.clone();
        }
        let version = self.version.as_deref().unwrap_or(UNRELEASED);
        match &self.date {
            Some(date) => format!("## [{}] - {}", version, date),
            None => format!("## [{}]", version),
        }
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading())?;

        let description = trimmed(&self.description);
        if !description.is_empty() {
            writeln!(f)?;
            for line in description {
                writeln!(f, "{}", line)?;
            }
        }

        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "### {}", section.title)?;
            let body = trimmed(&section.lines);
            if !body.is_empty() {
                writeln!(f)?;
                for line in body {
                    writeln!(f, "{}", line)?;
                }
            }
        }

        Ok(())
    }
}

/// A parsed CHANGELOG.md
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    /// Title text after `# `
    pub title: String,
    /// Lines between the title and the first release
    pub preamble: Vec<String>,
    /// Releases, newest first
    pub releases: Vec<Release>,
    /// Link reference definitions at the end of the document
    pub links: Vec<String>,
}

enum Container {
    Preamble,
    Description,
    Section,
}

impl Changelog {
    /// Parse a keep-a-changelog document
    pub fn parse(content: &str) -> Result<Self, ChangelogError> {
        let mut lines = content.lines().enumerate().skip_while(|(_, l)| l.trim().is_empty());

        let title = match lines.next() {
            Some((_, line)) => line
                .strip_prefix("# ")
                .map(|t| t.trim().to_string())
                .ok_or(ChangelogError::MissingTitle)?,
            None => return Err(ChangelogError::MissingTitle),
        };

        let mut changelog = Changelog {
            title,
            preamble: Vec::new(),
            releases: Vec::new(),
            links: Vec::new(),
        };
        let mut seen = HashSet::new();
        let mut container = Container::Preamble;
        let mut fence: Option<String> = None;

        for (index, line) in lines {
            let line_number = index + 1;

            let marker = FENCE_RE.captures(line).map(|caps| caps[1].to_string());
            let in_fence = fence.is_some() || marker.is_some();
            if let Some(marker) = marker {
                let closes = fence.as_deref().is_some_and(|open| {
                    marker.starts_with(&open[..1]) && marker.len() >= open.len()
                });
                if fence.is_none() {
                    fence = Some(marker);
                } else if closes {
                    fence = None;
                }
            }

            if !in_fence && line.starts_with("## ") {
                let release = parse_release_heading(line);
                let key = release
                    .version
                    .as_deref()
                    .unwrap_or(UNRELEASED)
                    .to_ascii_lowercase();
                if !seen.insert(key) {
                    return Err(ChangelogError::DuplicateRelease {
                        line: line_number,
                        version: release.version.unwrap_or_else(|| UNRELEASED.to_string()),
                    });
                }
                changelog.releases.push(release);
                container = Container::Description;
                continue;
            }

            if let Some(heading) = line.strip_prefix("### ").filter(|_| !in_fence) {
                let Some(release) = changelog.releases.last_mut() else {
                    return Err(ChangelogError::OrphanSection {
                        line: line_number,
                        heading: heading.trim().to_string(),
                    });
                };
                release.sections.push(Section::new(heading.trim()));
                container = Container::Section;
                continue;
            }

            let target = match container {
                Container::Preamble => &mut changelog.preamble,
                Container::Description => match changelog.releases.last_mut() {
                    Some(release) => &mut release.description,
                    None => &mut changelog.preamble,
                },
                Container::Section => match changelog
                    .releases
                    .last_mut()
                    .and_then(|r| r.sections.last_mut())
                {
                    Some(section) => &mut section.lines,
                    None => &mut changelog.preamble,
                },
            };
            target.push(line.to_string());
        }

        changelog.extract_links();
        Ok(changelog)
    }

    /// Read and parse a changelog file
    pub async fn read(path: &Path) -> Result<Self, ChangelogError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ChangelogError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::parse(&content)
    }

    /// Move trailing link definitions out of the last body into `links`
    fn extract_links(&mut self) {
        let body = match self.releases.last_mut() {
            Some(release) => match release.sections.last_mut() {
                Some(section) => &mut section.lines,
                None => &mut release.description,
            },
            None => &mut self.preamble,
        };

        let mut links = Vec::new();
        trim_trailing_blank(body);
        while body.last().is_some_and(|line| LINK_RE.is_match(line)) {
            links.extend(body.pop());
            trim_trailing_blank(body);
        }
        links.reverse();
        self.links = links;
    }

    /// The Unreleased release, if present
    pub fn unreleased(&self) -> Option<&Release> {
        self.releases.iter().find(|r| r.is_unreleased())
    }

    /// The Unreleased release, created above the newest release if missing
    pub fn unreleased_mut(&mut self) -> &mut Release {
        let index = match self.releases.iter().position(Release::is_unreleased) {
            Some(index) => index,
            None => {
                self.releases.insert(0, Release::unreleased());
                0
            }
        };
        &mut self.releases[index]
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;

        let preamble = trimmed(&self.preamble);
        if !preamble.is_empty() {
            writeln!(f)?;
            for line in preamble {
                writeln!(f, "{}", line)?;
            }
        }

        for release in &self.releases {
            writeln!(f)?;
            write!(f, "{}", release)?;
        }

        if !self.links.is_empty() {
            writeln!(f)?;
            for link in &self.links {
                writeln!(f, "{}", link)?;
            }
        }

        Ok(())
    }
}

fn parse_release_heading(line: &str) -> Release {
    let (version, date) = match RELEASE_RE.captures(line) {
        Some(caps) => (
            caps.get(1)
                .or_else(|| caps.get(2))
                .map_or_else(String::new, |m| m.as_str().trim().to_string()),
            caps.get(3).map(|m| m.as_str().trim().to_string()),
        ),
        None => (line.trim_start_matches('#').trim().to_string(), None),
    };

    Release {
        version: (!version.eq_ignore_ascii_case(UNRELEASED)).then_some(version),
        date,
        description: Vec::new(),
        sections: Vec::new(),
        raw_heading: Some(line.trim_end().to_string()),
    }
}

fn trim_trailing_blank(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
}

fn trimmed(lines: &[String]) -> &[String] {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    &lines[start..end]
}
