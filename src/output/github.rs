//! GitHub Actions step outputs
//!
//! Appends `changelog`, `release` and `change` to the file named by
//! `GITHUB_OUTPUT` using the multi-line `name<<DELIMITER` syntax.

use crate::changelog::ChangelogOutputs;
use crate::error::OutputError;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Environment variable naming the step output file
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

const DELIMITER: &str = "BUMPLOG_EOF";

/// Format one output entry, picking a delimiter that does not occur in `value`
pub fn format_github_output(name: &str, value: &str) -> String {
    let mut delimiter = DELIMITER.to_string();
    let mut attempt = 0;
    while value.lines().any(|line| line == delimiter) {
        attempt += 1;
        delimiter = format!("{}_{}", DELIMITER, attempt);
    }

    format!("{}<<{}\n{}\n{}\n", name, delimiter, value.trim_end_matches('\n'), delimiter)
}

/// Append all step outputs to `path`
pub async fn write_github_outputs(path: &Path, outputs: &ChangelogOutputs) -> Result<(), OutputError> {
    let content = [
        format_github_output("changelog", &outputs.changelog),
        format_github_output("release", &outputs.release),
        format_github_output("change", &outputs.change),
    ]
    .concat();

    let write_error = |e| OutputError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(write_error)?;
    file.write_all(content.as_bytes()).await.map_err(write_error)?;
    file.flush().await.map_err(write_error)?;

    debug!(path = %path.display(), "step outputs written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_github_output() {
        let entry = format_github_output("change", "- Bumped\n  - Production dependencies");
        assert_eq!(
            entry,
            "change<<BUMPLOG_EOF\n- Bumped\n  - Production dependencies\nBUMPLOG_EOF\n"
        );
    }

    #[test]
    fn test_format_github_output_trailing_newline() {
        let entry = format_github_output("changelog", "# Changelog\n");
        assert_eq!(entry, "changelog<<BUMPLOG_EOF\n# Changelog\nBUMPLOG_EOF\n");
    }

    #[test]
    fn test_delimiter_avoids_collision() {
        let entry = format_github_output("release", "a\nBUMPLOG_EOF\nb");
        assert!(entry.starts_with("release<<BUMPLOG_EOF_1\n"));
        assert!(entry.ends_with("\nBUMPLOG_EOF_1\n"));
    }

    #[tokio::test]
    async fn test_write_github_outputs_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "existing=1\n").unwrap();

        let outputs = ChangelogOutputs {
            changelog: "# Changelog\n".to_string(),
            release: "## [Unreleased]\n".to_string(),
            change: "- Bumped".to_string(),
        };
        write_github_outputs(&path, &outputs).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "existing=1\n\
             changelog<<BUMPLOG_EOF\n# Changelog\nBUMPLOG_EOF\n\
             release<<BUMPLOG_EOF\n## [Unreleased]\nBUMPLOG_EOF\n\
             change<<BUMPLOG_EOF\n- Bumped\nBUMPLOG_EOF\n"
        );
    }

    #[tokio::test]
    async fn test_write_github_outputs_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing/output");
        let outputs = ChangelogOutputs {
            changelog: String::new(),
            release: String::new(),
            change: String::new(),
        };
        let result = write_github_outputs(&path, &outputs).await;
        assert!(matches!(result, Err(OutputError::WriteError { .. })));
    }
}
