use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::non_empty;

/// A problem reported for a package, e.g. a dead homepage link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Problem type, e.g. `homepage_dead`.
    #[serde(rename = "type", deserialize_with = "non_empty")]
    pub kind: String,
    /// Free-form details; the keys depend on the problem type.
    pub data: Map<String, Value>,
    /// Repology project the problem concerns.
    #[serde(deserialize_with = "non_empty")]
    pub project_name: String,
    /// Package version.
    #[serde(deserialize_with = "non_empty")]
    pub version: String,
    /// Source package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srcname: Option<String>,
    /// Binary package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binname: Option<String>,
    /// Raw package version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rawversion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_problem_with_type_rename() {
        let problem: Problem = serde_json::from_value(json!({
            "type": "homepage_dead",
            "data": {"url": "http://example.com", "code": 500},
            "project_name": "test-project",
            "version": "1.0",
            "binname": "test-bin",
            "srcname": "test/test-src",
            "rawversion": "1.0_1"
        }))
        .unwrap();

        assert_eq!(problem.kind, "homepage_dead");
        assert_eq!(problem.data["code"], json!(500));
        assert_eq!(problem.rawversion.as_deref(), Some("1.0_1"));

        let back = serde_json::to_value(&problem).unwrap();
        assert_eq!(back["type"], json!("homepage_dead"));
    }

    #[test]
    fn data_must_be_an_object() {
        let raw = json!({
            "type": "homepage_dead",
            "data": "http://example.com",
            "project_name": "test-project",
            "version": "1.0"
        });
        assert!(serde_json::from_value::<Problem>(raw).is_err());
    }

    #[test]
    fn required_fields_must_be_present_and_non_empty() {
        let missing_project = json!({"type": "t", "data": {}, "version": "1"});
        assert!(serde_json::from_value::<Problem>(missing_project).is_err());

        let empty_type = json!({"type": "", "data": {}, "project_name": "p", "version": "1"});
        assert!(serde_json::from_value::<Problem>(empty_type).is_err());
    }
}
