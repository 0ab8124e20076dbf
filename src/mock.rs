//! テスト用の TrackerApi 実装。呼び出し回数と送信内容を記録する

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

use crate::api::TrackerApi;
use crate::error::{Error, Result};
use crate::models::{
    BasicIssue, CimIssueType, CimProject, CreateIssueMetadata, FieldInfo, Issue, IssueInput,
    IssueType, Priority, Project, ProjectSummary,
};

pub(crate) const GET_ALL_PROJECTS: &str = "get_all_projects";
pub(crate) const GET_PROJECT: &str = "get_project";
pub(crate) const GET_PRIORITIES: &str = "get_priorities";
pub(crate) const GET_CREATE_META: &str = "get_create_issue_metadata";
pub(crate) const CREATE_ISSUE: &str = "create_issue";
pub(crate) const GET_ISSUE: &str = "get_issue";
pub(crate) const ADD_ATTACHMENT: &str = "add_attachment";
pub(crate) const CLOSE: &str = "close";

/// 呼び出しの記録
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    calls: Mutex<HashMap<&'static str, usize>>,
    metadata_requests: Mutex<Vec<Vec<String>>>,
    created: Mutex<Vec<IssueInput>>,
    attachments: Mutex<Vec<(String, String, Vec<u8>)>>,
}

impl Recorder {
    fn hit(&self, op: &'static str) {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
    }

    pub(crate) fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    pub(crate) fn close(&self) -> usize {
        self.calls(CLOSE)
    }

    pub(crate) fn metadata_requests(&self) -> Vec<Vec<String>> {
        self.metadata_requests.lock().unwrap().clone()
    }

    pub(crate) fn created(&self) -> Vec<IssueInput> {
        self.created.lock().unwrap().clone()
    }

    pub(crate) fn attachments(&self) -> Vec<(String, String, Vec<u8>)> {
        self.attachments.lock().unwrap().clone()
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockTracker {
    projects: Vec<Project>,
    priorities: Vec<Priority>,
    schemas: HashMap<String, HashMap<String, HashMap<String, FieldInfo>>>,
    failures: Mutex<HashMap<&'static str, (usize, u16, String)>>,
    fail_close: bool,
    recorder: Arc<Recorder>,
}

impl MockTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn counters(&self) -> Arc<Recorder> {
        Arc::clone(&self.recorder)
    }

    pub(crate) fn with_project(mut self, key: &str, issue_types: &[(&str, &str)]) -> Self {
        self.projects.push(project(key, issue_types));
        self
    }

    pub(crate) fn with_priority(mut self, id: &str, name: &str) -> Self {
        self.priorities.push(Priority {
            id: id.to_string(),
            name: name.to_string(),
            self_url: None,
            description: None,
            icon_url: None,
            status_color: None,
        });
        self
    }

    pub(crate) fn with_field(mut self, project_key: &str, issue_type: &str, field: &str, info: FieldInfo) -> Self {
        self.schemas
            .entry(project_key.to_string())
            .or_default()
            .entry(issue_type.to_string())
            .or_default()
            .insert(field.to_string(), info);
        self
    }

    /// 次の `times` 回の `op` 呼び出しを失敗させる
    pub(crate) fn failing(self, op: &'static str, times: usize) -> Self {
        self.failing_with(op, times, 500, "Internal Server Error")
    }

    pub(crate) fn failing_with(self, op: &'static str, times: usize, status: u16, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(op, (times, status, message.to_string()));
        self
    }

    pub(crate) fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    fn call(&self, op: &'static str) -> Result<()> {
        self.recorder.hit(op);
        let mut failures = self.failures.lock().unwrap();
        if let Some((remaining, status, message)) = failures.get_mut(op) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::ApiError { status: *status, message: message.clone() });
            }
        }
        Ok(())
    }
}

pub(crate) fn project(key: &str, issue_types: &[(&str, &str)]) -> Project {
    Project {
        id: format!("id-{}", key),
        key: key.to_string(),
        name: format!("{} project", key),
        self_url: None,
        description: None,
        issue_types: issue_types
            .iter()
            .map(|(id, name)| IssueType {
                id: id.to_string(),
                name: name.to_string(),
                self_url: None,
                description: None,
                subtask: Some(false),
                icon_url: None,
            })
            .collect(),
    }
}

pub(crate) fn free_field() -> FieldInfo {
    serde_json::from_value(json!({ "required": false, "schema": { "type": "string" } })).unwrap()
}

pub(crate) fn option_field(values: &[&str]) -> FieldInfo {
    let allowed = values
        .iter()
        .enumerate()
        .map(|(i, v)| json!({ "id": i.to_string(), "value": v }))
        .collect::<Vec<_>>();
    serde_json::from_value(json!({
        "required": false,
        "schema": { "type": "option" },
        "allowedValues": allowed
    }))
    .unwrap()
}

#[async_trait]
impl TrackerApi for MockTracker {
    async fn get_all_projects(&self) -> Result<Vec<ProjectSummary>> {
        self.call(GET_ALL_PROJECTS)?;
        Ok(self
            .projects
            .iter()
            .map(|p| ProjectSummary {
                id: p.id.clone(),
                key: p.key.clone(),
                name: p.name.clone(),
                self_url: None,
                project_type_key: None,
            })
            .collect())
    }

    async fn get_project(&self, key: &str) -> Result<Project> {
        self.call(GET_PROJECT)?;
        self.projects
            .iter()
            .find(|p| p.key == key)
            .cloned()
            .ok_or_else(|| Error::ApiError {
                status: 404,
                message: format!("No project could be found with key '{}'.", key),
            })
    }

    async fn get_priorities(&self) -> Result<Vec<Priority>> {
        self.call(GET_PRIORITIES)?;
        Ok(self.priorities.clone())
    }

    async fn get_create_issue_metadata(&self, project_keys: &[String]) -> Result<CreateIssueMetadata> {
        self.call(GET_CREATE_META)?;
        self.recorder
            .metadata_requests
            .lock()
            .unwrap()
            .push(project_keys.to_vec());

        let projects = project_keys
            .iter()
            .filter(|key| self.projects.iter().any(|p| &p.key == *key))
            .map(|key| CimProject {
                key: key.clone(),
                name: None,
                issuetypes: self
                    .schemas
                    .get(key)
                    .into_iter()
                    .flatten()
                    .map(|(name, fields)| CimIssueType {
                        id: String::new(),
                        name: name.clone(),
                        fields: fields.clone(),
                    })
                    .collect(),
            })
            .collect();
        Ok(CreateIssueMetadata { projects })
    }

    async fn create_issue(&self, input: &IssueInput) -> Result<BasicIssue> {
        self.call(CREATE_ISSUE)?;
        let mut created = self.recorder.created.lock().unwrap();
        created.push(input.clone());
        let number = created.len();
        Ok(BasicIssue {
            id: (10000 + number).to_string(),
            key: format!("{}-{}", input.project_key, number),
            self_url: format!("https://jira.example.com/rest/api/2/issue/{}", 10000 + number),
        })
    }

    async fn get_issue(&self, key: &str) -> Result<Issue> {
        self.call(GET_ISSUE)?;
        Ok(Issue {
            id: "10001".to_string(),
            key: key.to_string(),
            self_url: "https://jira.example.com/rest/api/2/issue/10001".to_string(),
            fields: serde_json::Map::new(),
        })
    }

    async fn add_attachment(&self, attachments_uri: &Url, file_name: &str, content: Vec<u8>) -> Result<()> {
        self.call(ADD_ATTACHMENT)?;
        self.recorder.attachments.lock().unwrap().push((
            attachments_uri.to_string(),
            file_name.to_string(),
            content,
        ));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.recorder.hit(CLOSE);
        if self.fail_close {
            return Err(Error::Unexpected("connection already closed".to_string()));
        }
        Ok(())
    }
}
