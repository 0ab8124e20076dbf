use tracing::{debug, error};

use crate::api::TrackerApi;
use crate::client::{Auth, JiraClient, JiraConfig};
use crate::error::Result;
use crate::settings::TrackerSettings;

/// 認証済みクライアントを 1 つ保持するセッション
///
/// `open` はネットワークに接続しない。認証は最初のリモート呼び出しで行われる。
#[derive(Debug)]
pub struct Session<A: TrackerApi> {
    api: A,
}

impl Session<JiraClient> {
    pub fn open(settings: &TrackerSettings) -> Result<Self> {
        let config = JiraConfig::new(
            settings.url.clone(),
            Auth::Basic {
                username: settings.login.clone(),
                password: settings.password.clone(),
            },
        )?;
        debug!("Opening JIRA session for {}", config.base_url);
        Ok(Self::with_api(JiraClient::new(config)?))
    }
}

impl<A: TrackerApi> Session<A> {
    pub fn with_api(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// 接続を解放する。エラーはログに残して握りつぶす
    pub async fn close(self) {
        if let Err(e) = self.api.close().await {
            error!("Failed to close JIRA session: {}", e);
        }
    }
}

impl<A: TrackerApi> From<A> for Session<A> {
    fn from(api: A) -> Self {
        Self::with_api(api)
    }
}
