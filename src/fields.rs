//! 汎用の追加フィールド（文字列マップ）を課題作成リクエストへ写像する

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::api::TrackerApi;
use crate::cache::MetadataCache;
use crate::error::{Error, Result};
use crate::models::{FieldValue, IssueInput};

/// 特別扱いするフィールドの種類。判定順は `from_key` の並びどおり
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Priority,
    Components,
    Versions,
    FixVersions,
    Assignee,
    Parent,
    Resolution,
    /// スキーマを参照して決める
    Schema,
}

impl FieldKind {
    pub fn from_key(key: &str) -> Self {
        match key {
            "priority" => FieldKind::Priority,
            "components" => FieldKind::Components,
            "versions" => FieldKind::Versions,
            "fixVersions" => FieldKind::FixVersions,
            "assignee" => FieldKind::Assignee,
            "parent" => FieldKind::Parent,
            "resolution" => FieldKind::Resolution,
            _ => FieldKind::Schema,
        }
    }
}

/// 課題作成リクエストを組み立てる
///
/// 課題タイプの解決はフィールド処理より先に行う（リクエストに ID が必要なため）。
pub async fn build_issue_input<A: TrackerApi + ?Sized>(
    cache: &mut MetadataCache,
    api: &A,
    project_key: &str,
    issue_type_name: &str,
    summary: &str,
    description: &str,
    extra_fields: &HashMap<String, String>,
) -> Result<IssueInput> {
    let issue_type_id = cache
        .get_issue_types(api, project_key)
        .await?
        .iter()
        .find(|issue_type| issue_type.name == issue_type_name)
        .map(|issue_type| issue_type.id.clone())
        .ok_or_else(|| Error::UnknownIssueType {
            project: project_key.to_string(),
            issue_type: issue_type_name.to_string(),
        })?;

    let mut input = IssueInput::new(project_key, issue_type_id)
        .summary(summary)
        .description(description);

    for (key, value) in extra_fields {
        match FieldKind::from_key(key) {
            FieldKind::Priority => match cache.priority_by_name(api, value).await {
                Some(priority) => input.priority_id = Some(priority.id),
                None => warn!("Priority '{}' not found; creating issue without priority", value),
            },
            FieldKind::Components => input.components = Some(vec![value.clone()]),
            FieldKind::Versions => input.affected_versions = Some(vec![value.clone()]),
            FieldKind::FixVersions => input.fix_versions = Some(vec![value.clone()]),
            FieldKind::Assignee => input.assignee = Some(value.clone()),
            FieldKind::Parent => input.set_field(key.as_str(), FieldValue::complex("key", value.as_str())),
            FieldKind::Resolution => input.set_field(key.as_str(), FieldValue::complex("name", value.as_str())),
            FieldKind::Schema => {
                let constrained = cache
                    .is_constrained_field(api, project_key, issue_type_name, key)
                    .await?;
                debug!("Field {} constrained: {}", key, constrained);
                let field_value = if constrained {
                    FieldValue::complex("value", value.as_str())
                } else {
                    FieldValue::Text(value.clone())
                };
                input.set_field(key.as_str(), field_value);
            }
        }
    }

    Ok(input)
}
