use serde::{Deserialize, Serialize};
use url::Url;

/// 課題作成の応答（作成された課題の識別子）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

impl BasicIssue {
    /// 添付ファイルのアップロード先
    pub fn attachments_uri(&self) -> Option<Url> {
        attachments_uri(&self.self_url)
    }
}

/// `GET /issue/{key}` の応答
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Issue {
    pub fn attachments_uri(&self) -> Option<Url> {
        attachments_uri(&self.self_url)
    }

    pub fn summary(&self) -> Option<&str> {
        self.fields.get("summary").and_then(|v| v.as_str())
    }
}

fn attachments_uri(self_url: &str) -> Option<Url> {
    Url::parse(&format!("{}/attachments", self_url.trim_end_matches('/'))).ok()
}
