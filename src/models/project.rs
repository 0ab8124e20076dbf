use serde::{Deserialize, Serialize};

use super::IssueType;

/// `GET /project` が返すプロジェクトの概要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(default)]
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(rename = "self")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
    #[serde(rename = "projectTypeKey")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type_key: Option<String>,
}

/// `GET /project/{key}` が返すプロジェクトの詳細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(rename = "self")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "issueTypes")]
    #[serde(default)]
    pub issue_types: Vec<IssueType>,
}

impl Project {
    /// 名前が完全一致する課題タイプを探す
    pub fn issue_type_by_name(&self, name: &str) -> Option<&IssueType> {
        self.issue_types.iter().find(|issue_type| issue_type.name == name)
    }
}
