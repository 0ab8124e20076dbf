use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 課題タイプ名 -> フィールド名 -> フィールド情報
pub type IssueTypeFields = HashMap<String, HashMap<String, FieldInfo>>;

/// プロジェクトキー -> 課題タイプ別フィールド
pub type ProjectFieldSchemas = HashMap<String, IssueTypeFields>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
    #[serde(rename = "customId")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<u64>,
}

/// createmeta が返すフィールド情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<FieldSchema>,
    #[serde(rename = "allowedValues")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<serde_json::Value>>,
    #[serde(rename = "hasDefaultValue")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_default_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<String>>,
}

impl FieldInfo {
    /// 値が許可リストに制約されているかどうか
    pub fn is_constrained(&self) -> bool {
        self.allowed_values.is_some()
    }

    /// 許可値のうちカスタムフィールドオプションとして解釈できるもの
    pub fn custom_field_options(&self) -> Vec<CustomFieldOption> {
        self.allowed_values
            .iter()
            .flatten()
            .filter_map(|value| serde_json::from_value(value.clone()).ok())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldOption {
    pub id: String,
    pub value: String,
    #[serde(rename = "self")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssueMetadata {
    #[serde(default)]
    pub projects: Vec<CimProject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CimProject {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub issuetypes: Vec<CimIssueType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CimIssueType {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, FieldInfo>,
}

impl CimProject {
    /// 課題タイプ名をキーにしたフィールド表へ変換
    pub fn into_issue_type_fields(self) -> IssueTypeFields {
        self.issuetypes
            .into_iter()
            .map(|issue_type| (issue_type.name, issue_type.fields))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_metadata() -> serde_json::Value {
        json!({
            "expand": "projects",
            "projects": [{
                "id": "10000",
                "key": "TEST",
                "name": "Test Project",
                "issuetypes": [{
                    "id": "1",
                    "name": "Bug",
                    "fields": {
                        "summary": {
                            "required": true,
                            "name": "Summary",
                            "schema": { "type": "string", "system": "summary" },
                            "hasDefaultValue": false,
                            "operations": ["set"]
                        },
                        "customfield_10010": {
                            "required": false,
                            "name": "Severity",
                            "schema": {
                                "type": "option",
                                "custom": "com.atlassian.jira.plugin.system.customfieldtypes:select",
                                "customId": 10010
                            },
                            "allowedValues": [
                                { "self": "https://jira.example.com/rest/api/2/customFieldOption/1", "value": "High", "id": "1" },
                                { "self": "https://jira.example.com/rest/api/2/customFieldOption/2", "value": "Low", "id": "2" }
                            ]
                        }
                    }
                }]
            }]
        })
    }

    #[test]
    fn test_create_issue_metadata_deserialization() {
        let metadata: CreateIssueMetadata = serde_json::from_value(sample_metadata()).unwrap();

        assert_eq!(metadata.projects.len(), 1);
        let project = &metadata.projects[0];
        assert_eq!(project.key, "TEST");
        assert_eq!(project.issuetypes[0].name, "Bug");
        assert_eq!(project.issuetypes[0].fields.len(), 2);
    }

    #[test]
    fn test_constrained_field_detection() {
        let metadata: CreateIssueMetadata = serde_json::from_value(sample_metadata()).unwrap();
        let fields = metadata.projects.into_iter().next().unwrap().into_issue_type_fields();
        let bug = &fields["Bug"];

        assert!(!bug["summary"].is_constrained());
        assert!(bug["customfield_10010"].is_constrained());
        assert_eq!(
            bug["customfield_10010"].schema.as_ref().map(|s| s.field_type.as_str()),
            Some("option")
        );
    }

    #[test]
    fn test_custom_field_options() {
        let field: FieldInfo = serde_json::from_value(json!({
            "required": false,
            "allowedValues": [
                { "value": "High", "id": "1" },
                { "name": "Not an option", "id": "9" }
            ]
        }))
        .unwrap();

        let options = field.custom_field_options();

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "High");
        assert_eq!(options[0].id, "1");
    }
}
