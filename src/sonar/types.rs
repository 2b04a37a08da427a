use serde::{Deserialize, Serialize};

/// Metadata for a completed compute-engine task.
///
/// Every field is an opaque string passed through from the server; only
/// `analysis_id` is consulted by the pipeline. Fields absent from the response
/// default to empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SonarTask {
    pub id: String,
    pub status: String,
    pub analysis_id: String,
    pub component_id: String,
    pub component_key: String,
    pub component_name: String,
    pub organization: String,
    pub submitted_at: String,
    pub submitter_login: String,
    pub started_at: String,
    pub executed_at: String,
}

/// One evaluated quality gate rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Condition {
    pub status: String,
    pub metric_key: String,
    pub comparator: String,
    pub period_index: u32,
    pub error_threshold: String,
    pub actual_value: String,
}

/// One comparison period of the quality gate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Period {
    pub index: u32,
    pub mode: String,
    pub date: String,
}

/// The overall quality gate verdict for one analysis.
///
/// Condition and period order is preserved as returned by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityGateStatus {
    pub status: String,
    pub conditions: Vec<Condition>,
    pub periods: Vec<Period>,
    pub ignored_conditions: bool,
}

/// Wrapper object around the task returned by `api/ce/task`.
#[derive(Debug, Deserialize)]
pub struct TaskResponse {
    pub task: SonarTask,
}

/// Wrapper object around the quality gate returned by
/// `api/qualitygates/project_status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub project_status: QualityGateStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_missing_fields_default_to_empty() {
        let json = r#"{"task":{"id":"1","status":"SUCCESS","analysisId":"A1"}}"#;
        let response: TaskResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.task.analysis_id, "A1");
        assert_eq!(response.task.component_key, "");
        assert_eq!(response.task.executed_at, "");
    }

    #[test]
    fn test_quality_gate_field_names_match_wire_format() {
        let json = r#"{
            "projectStatus": {
                "status": "ERROR",
                "conditions": [
                    {
                        "status": "ERROR",
                        "metricKey": "new_coverage",
                        "comparator": "LT",
                        "periodIndex": 1,
                        "errorThreshold": "85",
                        "actualValue": "82.5"
                    }
                ],
                "periods": [{"index": 1, "mode": "previous_version", "date": "2016-02-04T13:44:34+0100"}],
                "ignoredConditions": false
            }
        }"#;
        let response: AnalysisResponse = serde_json::from_str(json).unwrap();
        let gate = response.project_status;
        assert_eq!(gate.status, "ERROR");
        assert_eq!(gate.conditions[0].metric_key, "new_coverage");
        assert_eq!(gate.conditions[0].period_index, 1);
        assert_eq!(gate.periods[0].mode, "previous_version");
        assert!(!gate.ignored_conditions);
    }

    #[test]
    fn test_condition_order_preserved() {
        let json = r#"{"projectStatus":{"status":"OK","conditions":[
            {"metricKey":"z_metric"},{"metricKey":"a_metric"},{"metricKey":"m_metric"}
        ],"periods":[],"ignoredConditions":false}}"#;
        let response: AnalysisResponse = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = response
            .project_status
            .conditions
            .iter()
            .map(|c| c.metric_key.as_str())
            .collect();
        assert_eq!(keys, ["z_metric", "a_metric", "m_metric"]);
    }
}
