//! Risk findings returned by a document analysis.

use serde::{Deserialize, Deserializer, Serialize};

use crate::block::RiskLevel;

/// One finding of a risk analysis.
///
/// `block_ref` is the short block reference the analysis was given
/// (see `BlockId::to_ref`). Findings without a resolvable reference are
/// still shown as general findings but annotate no block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFinding {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_severity")]
    pub severity: RiskLevel,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        rename = "blockIdRef",
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub block_ref: Option<String>,
}

impl RiskFinding {
    pub fn new(severity: RiskLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            severity,
            title: title.into(),
            description: description.into(),
            block_ref: None,
        }
    }

    /// Attach a block reference.
    pub fn with_block_ref(mut self, reference: impl Into<String>) -> Self {
        self.block_ref = Some(reference.into());
        self
    }
}

/// Severity in any letter case (`"High"`, `"LOW"`).
fn lenient_severity<'de, D>(deserializer: D) -> Result<RiskLevel, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    RiskLevel::from_str(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown severity `{raw}`")))
}

/// Models return ids as `"3"` or `3` interchangeably.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_finding_with_string_ref() {
        let finding: RiskFinding = serde_json::from_str(
            r#"{"id":"1","severity":"high","title":"Term","description":"Too long","blockIdRef":"8"}"#,
        )
        .unwrap();
        assert_eq!(finding.severity, RiskLevel::High);
        assert_eq!(finding.block_ref.as_deref(), Some("8"));
        assert_eq!(finding.id.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_finding_with_numeric_ref() {
        let finding: RiskFinding =
            serde_json::from_str(r#"{"id":2,"severity":"low","title":"t","description":"d","blockIdRef":3}"#)
                .unwrap();
        assert_eq!(finding.block_ref.as_deref(), Some("3"));
        assert_eq!(finding.id.as_deref(), Some("2"));
    }

    #[test]
    fn test_parse_finding_without_ref() {
        let finding: RiskFinding =
            serde_json::from_str(r#"{"severity":"medium","title":"General","description":"d"}"#).unwrap();
        assert_eq!(finding.block_ref, None);
        assert_eq!(finding.id, None);

        let blank: RiskFinding =
            serde_json::from_str(r#"{"severity":"medium","title":"t","blockIdRef":""}"#).unwrap();
        assert_eq!(blank.block_ref, None);
    }

    #[test]
    fn test_parse_finding_severity_any_case() {
        let finding: RiskFinding =
            serde_json::from_str(r#"{"severity":"High","title":"t","blockIdRef":"1"}"#).unwrap();
        assert_eq!(finding.severity, RiskLevel::High);

        let finding: RiskFinding = serde_json::from_str(r#"{"severity":" LOW ","title":"t"}"#).unwrap();
        assert_eq!(finding.severity, RiskLevel::Low);

        assert!(serde_json::from_str::<RiskFinding>(r#"{"severity":"critical","title":"t"}"#).is_err());
    }
}
