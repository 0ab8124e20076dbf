use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::models::{BasicIssue, CreateIssueMetadata, Issue, IssueInput, Priority, Project, ProjectSummary};

/// 課題管理サーバーへのリモート呼び出しの抽象化トレイト
///
/// プロバイダーとキャッシュはこのトレイトだけに依存する。
/// 実装は `JiraClient`（REST）を参照。
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// 全プロジェクトの一覧
    async fn get_all_projects(&self) -> Result<Vec<ProjectSummary>>;

    /// プロジェクトの詳細（課題タイプを含む）
    async fn get_project(&self, key: &str) -> Result<Project>;

    /// 全優先度の一覧
    async fn get_priorities(&self) -> Result<Vec<Priority>>;

    /// 指定プロジェクト群の課題作成メタデータ（フィールド情報を展開済み）
    async fn get_create_issue_metadata(&self, project_keys: &[String]) -> Result<CreateIssueMetadata>;

    async fn create_issue(&self, input: &IssueInput) -> Result<BasicIssue>;

    async fn get_issue(&self, key: &str) -> Result<Issue>;

    /// `attachments_uri` にファイルをアップロード
    async fn add_attachment(&self, attachments_uri: &Url, file_name: &str, content: Vec<u8>) -> Result<()>;

    /// 接続を解放する
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
