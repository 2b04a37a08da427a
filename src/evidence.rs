use serde::Serialize;

use crate::error::{Result, SonarEvidenceError};
use crate::sonar::types::{QualityGateStatus, SonarTask};

/// The aggregated evidence document written to stdout.
///
/// Pairs the task descriptor with the quality gate verdict exactly as the
/// server returned them; no field is transformed or cross-checked. The calling
/// build process must check the exit code before parsing stdout as JSON.
#[derive(Debug, Serialize)]
pub struct ScanEvidence {
    pub task: SonarTask,
    pub analysis: QualityGateStatus,
}

impl ScanEvidence {
    pub fn new(task: SonarTask, analysis: QualityGateStatus) -> Self {
        Self { task, analysis }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(SonarEvidenceError::Serialize)
    }
}
