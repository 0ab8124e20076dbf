//! 同期呼び出し用のラッパー
//!
//! ホストは非同期ランタイムを持たない前提。各操作は内部のランタイムで
//! リモート呼び出しの完了まで待つ。tokio ランタイムの中から呼んではいけない。

use std::collections::HashMap;
use std::io::Read;
use tokio::runtime::{Builder, Runtime};
use url::Url;

use crate::api::TrackerApi;
use crate::client::JiraClient;
use crate::error::{Error, Result};
use crate::models::{
    AttachmentAddingResult, Issue, IssueCreationResult, Priority, ProjectFieldSchemas,
};
use crate::provider::JiraProvider;
use crate::settings::{SettingsEditor, SettingsStore};

pub struct BlockingJiraProvider<A: TrackerApi = JiraClient> {
    inner: JiraProvider<A>,
    runtime: Runtime,
}

impl BlockingJiraProvider<JiraClient> {
    pub fn open(store: &dyn SettingsStore, editor: &dyn SettingsEditor) -> Result<Self> {
        Self::new(JiraProvider::open(store, editor))
    }
}

impl<A: TrackerApi> BlockingJiraProvider<A> {
    pub fn new(inner: JiraProvider<A>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to build runtime: {}", e)))?;
        Ok(Self { inner, runtime })
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }

    pub fn list_project_keys(&mut self) -> Vec<String> {
        self.runtime.block_on(self.inner.list_project_keys())
    }

    pub fn list_issue_type_names(&mut self, project_key: &str) -> Vec<String> {
        self.runtime.block_on(self.inner.list_issue_type_names(project_key))
    }

    pub fn get_all_priorities(&mut self) -> Result<Vec<Priority>> {
        self.runtime
            .block_on(self.inner.get_all_priorities())
            .map(|priorities| priorities.to_vec())
    }

    pub fn get_field_schema(&mut self, project_keys: &[&str]) -> Result<ProjectFieldSchemas> {
        self.runtime
            .block_on(self.inner.get_field_schema(project_keys))
            .cloned()
    }

    pub fn get_issue(&mut self, key: &str) -> Result<Issue> {
        self.runtime.block_on(self.inner.get_issue(key))
    }

    pub fn create_issue(
        &mut self,
        project_key: &str,
        issue_type: &str,
        summary: &str,
        description: &str,
        extra_fields: &HashMap<String, String>,
    ) -> IssueCreationResult {
        self.runtime.block_on(self.inner.create_issue(
            project_key,
            issue_type,
            summary,
            description,
            extra_fields,
        ))
    }

    /// ストリームの内容を読み切ってから添付する
    pub fn attach_stream<R: Read>(
        &mut self,
        issue_uri: Option<&Url>,
        file_name: &str,
        mut content: R,
    ) -> AttachmentAddingResult {
        if issue_uri.is_none() {
            return Error::MissingIssueReference.into();
        }
        if file_name.is_empty() {
            return Error::MissingFileName.into();
        }
        let mut buffer = Vec::new();
        if let Err(e) = content.read_to_end(&mut buffer) {
            return Error::IoError(e).into();
        }
        self.runtime
            .block_on(self.inner.attach_stream(issue_uri, file_name, buffer))
    }

    pub fn attach_path(&mut self, issue_uri: Option<&Url>, file_path: &str) -> AttachmentAddingResult {
        self.runtime.block_on(self.inner.attach_path(issue_uri, file_path))
    }
}

impl<A: TrackerApi> Drop for BlockingJiraProvider<A> {
    fn drop(&mut self) {
        self.runtime.block_on(self.inner.close());
    }
}
