use crate::api::TrackerApi;
use crate::error::{Error, Result};
use crate::models::{
    BasicIssue, CreateIssueMetadata, Issue, IssueInput, Priority, Project, ProjectSummary,
};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, header, redirect};
use std::sync::Arc;
use url::Url;

const API_PREFIX: &str = "/rest/api/2";

#[derive(Debug, Clone)]
pub enum Auth {
    Basic { username: String, password: String },
    Bearer { token: String },
}

#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub auth: Auth,
}

impl JiraConfig {
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Result<Self> {
        let base_url = base_url.into();

        // Validate URL
        Url::parse(&base_url).map_err(|_| Error::InvalidUrl)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }
}

#[derive(Debug, Clone)]
pub struct JiraClient {
    pub(crate) client: Client,
    pub(crate) config: Arc<JiraConfig>,
}

impl JiraClient {
    /// ネットワークへの接続は行わない（認証は最初の呼び出し時）
    pub fn new(config: JiraConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        // 添付ファイルのアップロードに必要（XSRF チェックの回避）
        headers.insert(
            header::HeaderName::from_static("x-atlassian-token"),
            header::HeaderValue::from_static("no-check"),
        );

        // 認証ヘッダーを追加
        let auth_value = match &config.auth {
            Auth::Basic { username, password } => {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password).as_bytes());
                format!("Basic {}", encoded)
            }
            Auth::Bearer { token } => format!("Bearer {}", token),
        };
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_value)
                .map_err(|_| Error::InvalidConfiguration("Invalid auth header".to_string()))?,
        );

        // リダイレクトは追わない。http -> https の 301 をエラーとして返すため
        let client = Client::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    /// 課題キーから添付ファイルのアップロード先を組み立てる
    pub fn attachments_uri(&self, issue_key: &str) -> Result<Url> {
        let url = format!(
            "{}{}/issue/{}/attachments",
            self.config.base_url,
            API_PREFIX,
            urlencoding::encode(issue_key)
        );
        Url::parse(&url).map_err(|_| Error::InvalidUrl)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.config.base_url, API_PREFIX, endpoint)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(Error::ApiError { status, message })
    }

    pub(crate) async fn get<T>(&self, endpoint: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(self.url(endpoint)).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        let response = self.client.post(self.url(endpoint)).json(body).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TrackerApi for JiraClient {
    async fn get_all_projects(&self) -> Result<Vec<ProjectSummary>> {
        self.get("/project").await
    }

    async fn get_project(&self, key: &str) -> Result<Project> {
        self.get(&format!("/project/{}", urlencoding::encode(key))).await
    }

    async fn get_priorities(&self) -> Result<Vec<Priority>> {
        self.get("/priority").await
    }

    async fn get_create_issue_metadata(&self, project_keys: &[String]) -> Result<CreateIssueMetadata> {
        let keys = project_keys
            .iter()
            .map(|key| urlencoding::encode(key).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        self.get(&format!(
            "/issue/createmeta?projectKeys={}&expand=projects.issuetypes.fields",
            keys
        ))
        .await
    }

    async fn create_issue(&self, input: &IssueInput) -> Result<BasicIssue> {
        self.post("/issue", &input.to_body()).await
    }

    async fn get_issue(&self, key: &str) -> Result<Issue> {
        self.get(&format!("/issue/{}", urlencoding::encode(key))).await
    }

    async fn add_attachment(&self, attachments_uri: &Url, file_name: &str, content: Vec<u8>) -> Result<()> {
        let part = reqwest::multipart::Part::bytes(content).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(attachments_uri.clone())
            .multipart(form)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
