use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque token binding duplicate exchanges and the terminal result to one import
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh id for a new session
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CorrelationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conflict-resolution strategy chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Decision {
    /// No decision yet. Never sent back to the worker.
    #[default]
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "replace")]
    Replace,
    #[serde(rename = "skip")]
    Skip,
    #[serde(rename = "cancel")]
    Cancel,
}

impl Decision {
    /// Whether this decision may be sent as a final answer
    pub fn is_final(self) -> bool {
        !matches!(self, Decision::None)
    }
}

/// One conflict notification from the worker (`exists_duplicate_data`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateInfo {
    #[serde(rename = "messageId", alias = "id")]
    pub id: CorrelationId,
    pub message: String,
    /// Conflicting record, passed through untouched
    #[serde(rename = "data", alias = "payload", default)]
    pub payload: Value,
    /// Spreadsheet row the record came from
    #[serde(
        rename = "excelRow",
        alias = "row",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub row: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Reply to exactly one conflict (`confirm_duplicate_data`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionReply {
    #[serde(rename = "messageId", alias = "id")]
    pub id: CorrelationId,
    #[serde(rename = "strategy", alias = "decision")]
    pub decision: Decision,
}

/// Terminal report from the worker (`import_result`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResultEvent {
    #[serde(rename = "messageId", alias = "id")]
    pub id: CorrelationId,
    pub ok: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub replace_count: u64,
    #[serde(default)]
    pub skip_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final outcome handed to the caller of `start`.
///
/// Carries the worker's fields plus the last decision the coordinator
/// recorded for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    #[serde(rename = "messageId")]
    pub id: CorrelationId,
    pub ok: bool,
    pub message: String,
    pub success_count: u64,
    pub replace_count: u64,
    pub skip_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub strategy: Decision,
}

impl ImportOutcome {
    pub fn from_result(result: ImportResultEvent, last_decision: Decision) -> Self {
        Self {
            id: result.id,
            ok: result.ok,
            message: result.message,
            success_count: result.success_count,
            replace_count: result.replace_count,
            skip_count: result.skip_count,
            error: result.error,
            strategy: last_decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decision_wire_names() {
        assert_eq!(serde_json::to_value(Decision::None).unwrap(), json!("NONE"));
        assert_eq!(serde_json::to_value(Decision::Replace).unwrap(), json!("replace"));
        assert_eq!(serde_json::to_value(Decision::Skip).unwrap(), json!("skip"));
        assert_eq!(serde_json::to_value(Decision::Cancel).unwrap(), json!("cancel"));
        assert!(!Decision::None.is_final());
        assert!(Decision::Cancel.is_final());
    }

    #[test]
    fn test_duplicate_info_accepts_worker_payload() {
        let info: DuplicateInfo = serde_json::from_value(json!({
            "messageId": "abc",
            "message": "dup",
            "data": {"code": "X1"},
            "excelRow": 12,
            "fileName": "table1.xlsx"
        }))
        .unwrap();

        assert_eq!(info.id.as_str(), "abc");
        assert_eq!(info.payload, json!({"code": "X1"}));
        assert_eq!(info.row, Some(12));
        assert_eq!(info.file_name.as_deref(), Some("table1.xlsx"));
    }

    #[test]
    fn test_duplicate_info_locators_optional() {
        let info: DuplicateInfo =
            serde_json::from_value(json!({"id": "abc", "message": "dup"})).unwrap();
        assert_eq!(info.payload, Value::Null);
        assert!(info.row.is_none());
        assert!(info.file_name.is_none());
    }

    #[test]
    fn test_import_result_counters_default_to_zero() {
        let result: ImportResultEvent =
            serde_json::from_value(json!({"messageId": "abc", "ok": false, "error": "boom"}))
                .unwrap();
        assert_eq!(result.success_count, 0);
        assert_eq!(result.replace_count, 0);
        assert_eq!(result.skip_count, 0);
        assert_eq!(result.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_outcome_carries_last_decision() {
        let result = ImportResultEvent {
            id: "abc".into(),
            ok: true,
            message: "done".to_string(),
            success_count: 3,
            replace_count: 1,
            skip_count: 0,
            error: None,
        };
        let outcome = ImportOutcome::from_result(result, Decision::Replace);
        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(value["strategy"], json!("replace"));
        assert_eq!(value["successCount"], json!(3));
        assert_eq!(value["messageId"], json!("abc"));
        assert!(value.get("error").is_none());
    }
}
