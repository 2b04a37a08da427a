use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::{Result, SonarEvidenceError};

const CE_TASK_URL_KEY: &str = "ceTaskUrl";

/// Extract the compute-engine task URL from a scanner report-task file.
///
/// The file is line-oriented `key=value` text. Blank lines and lines starting
/// with `#` are skipped; keys and values are trimmed. Scanning stops at the
/// first `ceTaskUrl` line. A missing key, an empty value, or any read failure
/// is a configuration error.
pub fn ce_task_url(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| {
        SonarEvidenceError::Config(format!(
            "cannot open report task file {}: {e}",
            path.display()
        ))
    })?;

    let mut task_url = String::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| {
            SonarEvidenceError::Config(format!(
                "error reading report task file {}: {e}",
                path.display()
            ))
        })?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == CE_TASK_URL_KEY {
                task_url = value.trim().to_owned();
                break;
            }
        }
    }

    if task_url.is_empty() {
        return Err(SonarEvidenceError::Config(format!(
            "{CE_TASK_URL_KEY} key not found in {}",
            path.display()
        )));
    }

    debug!("{CE_TASK_URL_KEY}: {task_url}");
    Ok(task_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn report_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_extracts_task_url() {
        let file = report_file(
            "projectKey=my-project\nserverUrl=https://sonarcloud.io\n\
             ceTaskUrl=https://sonarcloud.io/api/ce/task?id=AYx1\n",
        );
        let url = ce_task_url(file.path()).unwrap();
        assert_eq!(url, "https://sonarcloud.io/api/ce/task?id=AYx1");
    }

    #[test]
    fn test_skips_comments_and_blank_lines_and_trims() {
        let file = report_file(
            "# generated by sonar-scanner\n\n  ceTaskUrl =  https://x/task?id=1  \n",
        );
        let url = ce_task_url(file.path()).unwrap();
        assert_eq!(url, "https://x/task?id=1");
    }

    #[test]
    fn test_stops_at_first_match() {
        let file = report_file("ceTaskUrl=https://first/task\nceTaskUrl=https://second/task\n");
        let url = ce_task_url(file.path()).unwrap();
        assert_eq!(url, "https://first/task");
    }

    #[test]
    fn test_value_keeps_embedded_equals() {
        let file = report_file("ceTaskUrl=https://x/api/ce/task?id=abc=def\n");
        let url = ce_task_url(file.path()).unwrap();
        assert_eq!(url, "https://x/api/ce/task?id=abc=def");
    }

    #[test]
    fn test_missing_key_fails() {
        let file = report_file("projectKey=my-project\nserverUrl=https://sonarcloud.io\n");
        let err = ce_task_url(file.path()).unwrap_err();
        assert!(matches!(err, SonarEvidenceError::Config(_)));
        assert!(err.to_string().contains("ceTaskUrl"));
    }

    #[test]
    fn test_empty_value_fails() {
        let file = report_file("ceTaskUrl=   \n");
        assert!(ce_task_url(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_fails() {
        let err = ce_task_url(Path::new("does-not-exist/report-task.txt")).unwrap_err();
        assert!(matches!(err, SonarEvidenceError::Config(_)));
    }
}
