//! 課題の作成と添付ファイルの追加
//!
//! 公開メソッドはエラーを伝播させず、結果オブジェクトにメッセージとして載せる。
//! メタデータの取得だけは `Result` を返す。

use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};
use url::Url;

use crate::api::TrackerApi;
use crate::cache::MetadataCache;
use crate::client::JiraClient;
use crate::error::{Error, Result, SETTINGS_ARE_NOT_COMPLETELY_SPECIFIED, with_protocol_hint};
use crate::fields::build_issue_input;
use crate::models::{
    AttachmentAddingResult, Issue, IssueCreationResult, IssueType, Priority, Project,
    ProjectFieldSchemas, ProjectSummary,
};
use crate::session::Session;
use crate::settings::{SettingsEditor, SettingsStore, TrackerSettings};

/// パス指定の添付で使う検証方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentChecks {
    /// 存在しない・通常ファイルでないパスを拒否し、アップロードの失敗も返す
    #[default]
    Strict,
    /// 旧実装互換: 存在チェックが反転しており事実上通過し、
    /// アップロードの成否にかかわらず成功を返す
    Legacy,
}

pub struct JiraProvider<A: TrackerApi = JiraClient> {
    session: Option<Session<A>>,
    cache: MetadataCache,
    attachment_checks: AttachmentChecks,
}

impl JiraProvider<JiraClient> {
    /// ストアから設定を読み込んでプロバイダーを作る。
    ///
    /// 設定が不完全なら設定エディタを一度開き、それでも不完全なら
    /// 無効状態のプロバイダーを返す（全操作が `NotConfigured` になる）。
    pub fn open(store: &dyn SettingsStore, editor: &dyn SettingsEditor) -> Self {
        let mut settings = TrackerSettings::resolve(store);
        if !settings.is_complete() {
            error!("JIRA settings are incomplete");
            editor.edit_settings(SETTINGS_ARE_NOT_COMPLETELY_SPECIFIED);
            settings = TrackerSettings::resolve(store);
            if !settings.is_complete() {
                warn!("JIRA settings are still incomplete; provider is disabled");
                return Self::disabled();
            }
        }

        match Session::open(&settings) {
            Ok(session) => Self::with_session(session),
            Err(e) => {
                error!("{}", e);
                editor.show_error(&e.to_string());
                Self::disabled()
            }
        }
    }
}

impl<A: TrackerApi> JiraProvider<A> {
    pub fn with_session(session: Session<A>) -> Self {
        Self {
            session: Some(session),
            cache: MetadataCache::new(),
            attachment_checks: AttachmentChecks::default(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            session: None,
            cache: MetadataCache::new(),
            attachment_checks: AttachmentChecks::default(),
        }
    }

    pub fn attachment_checks(mut self, checks: AttachmentChecks) -> Self {
        self.attachment_checks = checks;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.session.is_some()
    }

    fn parts(&mut self) -> Result<(&A, &mut MetadataCache)> {
        let session = self.session.as_ref().ok_or(Error::NotConfigured)?;
        Ok((session.api(), &mut self.cache))
    }

    pub async fn list_all_projects(&mut self) -> Result<&[ProjectSummary]> {
        let (api, cache) = self.parts()?;
        cache.list_all_projects(api).await
    }

    /// 選択 UI 向けのプロジェクトキー一覧。失敗時は空
    pub async fn list_project_keys(&mut self) -> Vec<String> {
        match self.list_all_projects().await {
            Ok(projects) => projects.iter().map(|p| p.key.clone()).collect(),
            Err(e) => {
                warn!("Returning no projects: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_project(&mut self, key: &str) -> Result<&Project> {
        let (api, cache) = self.parts()?;
        cache.get_project(api, key).await
    }

    pub async fn get_issue_types(&mut self, project_key: &str) -> Result<&[IssueType]> {
        let (api, cache) = self.parts()?;
        cache.get_issue_types(api, project_key).await
    }

    /// 選択 UI 向けの課題タイプ名一覧。失敗時は空
    pub async fn list_issue_type_names(&mut self, project_key: &str) -> Vec<String> {
        match self.get_issue_types(project_key).await {
            Ok(issue_types) => issue_types.iter().map(|t| t.name.clone()).collect(),
            Err(e) => {
                warn!("Returning no issue types for {}: {}", project_key, e);
                Vec::new()
            }
        }
    }

    pub async fn get_all_priorities(&mut self) -> Result<&[Priority]> {
        let (api, cache) = self.parts()?;
        cache.get_all_priorities(api).await
    }

    pub async fn get_field_schema(&mut self, project_keys: &[&str]) -> Result<&ProjectFieldSchemas> {
        let (api, cache) = self.parts()?;
        cache.get_field_schema(api, project_keys).await
    }

    /// `get_field_schema` の失敗を `None` にしたもの
    pub async fn project_fields(&mut self, project_keys: &[&str]) -> Option<&ProjectFieldSchemas> {
        self.get_field_schema(project_keys).await.ok()
    }

    /// 課題を 1 件取得する（キャッシュしない）
    pub async fn get_issue(&mut self, key: &str) -> Result<Issue> {
        let (api, _) = self.parts()?;
        api.get_issue(key).await.map_err(|e| {
            error!("Failed to fetch JIRA issue {}: {}", key, e);
            e.into_remote()
        })
    }

    pub async fn create_issue(
        &mut self,
        project_key: &str,
        issue_type: &str,
        summary: &str,
        description: &str,
        extra_fields: &HashMap<String, String>,
    ) -> IssueCreationResult {
        let (api, cache) = match self.parts() {
            Ok(parts) => parts,
            Err(e) => return e.into(),
        };

        let input = match build_issue_input(cache, api, project_key, issue_type, summary, description, extra_fields).await {
            Ok(input) => input,
            Err(e) => {
                error!("Failed to build issue for {}: {}", project_key, e);
                return e.into();
            }
        };

        match api.create_issue(&input).await {
            Ok(issue) => {
                info!("Created JIRA issue {}", issue.key);
                IssueCreationResult::Created(issue)
            }
            Err(e) => {
                error!("Failed to create JIRA issue in {}: {}", project_key, e);
                IssueCreationResult::Failed(with_protocol_hint(e.to_string()))
            }
        }
    }

    /// 読み込み済みの内容を `file_name` として添付する
    pub async fn attach_stream(
        &mut self,
        issue_uri: Option<&Url>,
        file_name: &str,
        content: Vec<u8>,
    ) -> AttachmentAddingResult {
        let Some(issue_uri) = issue_uri else {
            return Error::MissingIssueReference.into();
        };
        if file_name.is_empty() {
            return Error::MissingFileName.into();
        }
        let (api, _) = match self.parts() {
            Ok(parts) => parts,
            Err(e) => return e.into(),
        };

        match api.add_attachment(issue_uri, file_name, content).await {
            Ok(()) => AttachmentAddingResult::Added,
            Err(e) => {
                error!("Failed to attach {} to {}: {}", file_name, issue_uri, e);
                AttachmentAddingResult::Failed(e.to_string())
            }
        }
    }

    /// ローカルファイルを添付する
    pub async fn attach_path(&mut self, issue_uri: Option<&Url>, file_path: &str) -> AttachmentAddingResult {
        let Some(issue_uri) = issue_uri else {
            return Error::MissingIssueReference.into();
        };
        if file_path.is_empty() {
            return Error::InvalidFilePath.into();
        }

        let path = Path::new(file_path);
        let legacy = self.attachment_checks == AttachmentChecks::Legacy;
        let rejected = if legacy {
            !path.exists() && path.is_file()
        } else {
            !path.is_file()
        };
        if rejected {
            return Error::InvalidFilePath.into();
        }

        let Some(file_name) = path.file_name().map(|name| name.to_string_lossy().into_owned()) else {
            return Error::InvalidFilePath.into();
        };
        let (api, _) = match self.parts() {
            Ok(parts) => parts,
            Err(e) => return e.into(),
        };

        let upload = match tokio::fs::read(path).await {
            Ok(content) => api.add_attachment(issue_uri, &file_name, content).await,
            Err(e) => Err(Error::IoError(e)),
        };

        match upload {
            Ok(()) => AttachmentAddingResult::Added,
            Err(e) if legacy => {
                warn!("Ignoring failed upload of {}: {}", file_path, e);
                AttachmentAddingResult::Added
            }
            Err(e) => {
                error!("Failed to attach {} to {}: {}", file_path, issue_uri, e);
                AttachmentAddingResult::Failed(e.to_string())
            }
        }
    }

    /// セッションを解放する。2 回目以降は何もしない
    pub async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
    }
}
