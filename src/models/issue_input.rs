use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// 汎用フィールドの値
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    /// `{"key": ...}` や `{"value": ...}` のような構造化参照
    Complex(BTreeMap<String, String>),
}

impl FieldValue {
    pub fn complex(key: &str, value: impl Into<String>) -> Self {
        FieldValue::Complex(BTreeMap::from([(key.to_string(), value.into())]))
    }
}

/// 課題作成リクエスト
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IssueInput {
    pub project_key: String,
    pub issue_type_id: String,
    pub summary: String,
    pub description: String,
    pub priority_id: Option<String>,
    pub components: Option<Vec<String>>,
    pub affected_versions: Option<Vec<String>>,
    pub fix_versions: Option<Vec<String>>,
    pub assignee: Option<String>,
    pub fields: BTreeMap<String, FieldValue>,
}

impl IssueInput {
    pub fn new(project_key: impl Into<String>, issue_type_id: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            issue_type_id: issue_type_id.into(),
            ..Self::default()
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// REST API に送るリクエストボディ
    pub fn to_body(&self) -> Value {
        let mut fields = json!({
            "project": { "key": self.project_key },
            "issuetype": { "id": self.issue_type_id },
            "summary": self.summary,
            "description": self.description,
        });

        if let Some(priority_id) = &self.priority_id {
            fields["priority"] = json!({ "id": priority_id });
        }
        if let Some(components) = &self.components {
            fields["components"] = named_list(components);
        }
        if let Some(versions) = &self.affected_versions {
            fields["versions"] = named_list(versions);
        }
        if let Some(versions) = &self.fix_versions {
            fields["fixVersions"] = named_list(versions);
        }
        if let Some(assignee) = &self.assignee {
            fields["assignee"] = json!({ "name": assignee });
        }
        for (name, value) in &self.fields {
            fields[name.as_str()] = json!(value);
        }

        json!({ "fields": fields })
    }
}

fn named_list(names: &[String]) -> Value {
    Value::Array(names.iter().map(|name| json!({ "name": name })).collect())
}
