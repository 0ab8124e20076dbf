//! リモートのメタデータ API の呼び出しを減らすためのキャッシュ
//!
//! 一度埋まったエントリはプロバイダーの寿命の間は更新も破棄もしない。
//! 失敗した取得は何もキャッシュしないので、次の呼び出しで再試行される。

use std::collections::HashMap;
use tracing::{debug, error};

use crate::api::TrackerApi;
use crate::error::{Error, Result};
use crate::models::{IssueType, Priority, Project, ProjectFieldSchemas, ProjectSummary};

#[derive(Debug, Default)]
pub struct MetadataCache {
    all_projects: Option<Vec<ProjectSummary>>,
    projects: HashMap<String, Project>,
    priorities: Option<Vec<Priority>>,
    project_fields: ProjectFieldSchemas,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list_all_projects<A: TrackerApi + ?Sized>(&mut self, api: &A) -> Result<&[ProjectSummary]> {
        if self.all_projects.is_none() {
            let projects = api.get_all_projects().await.map_err(|e| {
                error!("Failed to list JIRA projects: {}", e);
                e.into_remote()
            })?;
            debug!("Cached {} JIRA projects", projects.len());
            self.all_projects = Some(projects);
        }
        Ok(self.all_projects.as_deref().unwrap_or_default())
    }

    pub async fn get_project<A: TrackerApi + ?Sized>(&mut self, api: &A, key: &str) -> Result<&Project> {
        if !self.projects.contains_key(key) {
            let project = api.get_project(key).await.map_err(|e| {
                error!("Failed to fetch JIRA project {}: {}", key, e);
                e.into_remote()
            })?;
            self.projects.insert(key.to_string(), project);
        }
        self.projects
            .get(key)
            .ok_or_else(|| Error::Unexpected(format!("project {} missing from cache", key)))
    }

    pub async fn get_issue_types<A: TrackerApi + ?Sized>(&mut self, api: &A, project_key: &str) -> Result<&[IssueType]> {
        Ok(self.get_project(api, project_key).await?.issue_types.as_slice())
    }

    pub async fn get_all_priorities<A: TrackerApi + ?Sized>(&mut self, api: &A) -> Result<&[Priority]> {
        if self.priorities.is_none() {
            let priorities = api.get_priorities().await.map_err(|e| {
                error!("Failed to list JIRA priorities: {}", e);
                e.into_remote()
            })?;
            self.priorities = Some(priorities);
        }
        Ok(self.priorities.as_deref().unwrap_or_default())
    }

    /// 名前が完全一致する優先度。取得に失敗した場合も `None`
    pub async fn priority_by_name<A: TrackerApi + ?Sized>(&mut self, api: &A, name: &str) -> Option<Priority> {
        self.get_all_priorities(api)
            .await
            .ok()?
            .iter()
            .find(|priority| priority.name == name)
            .cloned()
    }

    /// 未キャッシュのプロジェクトだけを 1 回の createmeta 呼び出しでまとめて取得する。
    ///
    /// 返すのは要求したキーだけでなく、これまでに蓄積したキャッシュ全体。
    pub async fn get_field_schema<A: TrackerApi + ?Sized>(
        &mut self,
        api: &A,
        project_keys: &[&str],
    ) -> Result<&ProjectFieldSchemas> {
        let mut uncached: Vec<String> = Vec::new();
        for key in project_keys {
            if !self.project_fields.contains_key(*key) && !uncached.iter().any(|k| k.as_str() == *key) {
                uncached.push(key.to_string());
            }
        }

        if !uncached.is_empty() {
            let metadata = api.get_create_issue_metadata(&uncached).await.map_err(|e| {
                error!("Failed to fetch create-issue metadata for {:?}: {}", uncached, e);
                e.into_remote()
            })?;
            for project in metadata.projects {
                let key = project.key.clone();
                self.project_fields.insert(key, project.into_issue_type_fields());
            }
            debug!("Cached field schema for {:?}", uncached);
        }

        Ok(&self.project_fields)
    }

    /// スキーマ上、値が許可リストに制約されているフィールドかどうか。
    /// プロジェクト・課題タイプ・フィールドのいずれかが見つからなければ false
    pub async fn is_constrained_field<A: TrackerApi + ?Sized>(
        &mut self,
        api: &A,
        project_key: &str,
        issue_type_name: &str,
        field_name: &str,
    ) -> Result<bool> {
        let schemas = self.get_field_schema(api, &[project_key]).await?;
        Ok(schemas
            .get(project_key)
            .and_then(|issue_types| issue_types.get(issue_type_name))
            .and_then(|fields| fields.get(field_name))
            .is_some_and(|field| field.is_constrained()))
    }
}
