use thiserror::Error;

/// ユーザーに表示されるメッセージ
pub const ISSUE_KEY_NOT_SPECIFIED: &str = "No issue key is specified.";
pub const FILE_NAME_NOT_SPECIFIED: &str = "No file name is specified.";
pub const INCORRECT_FILE_PATH: &str = "Incorrect file path.";
pub const URL_IS_INCORRECT: &str = "The JIRA URL format is incorrect.";
pub const SETTINGS_ARE_NOT_COMPLETELY_SPECIFIED: &str = "Unable to create a JIRA item.\nThe JIRA Integration plugin's settings are not configured or invalid.";

/// 301 応答時に付け加えるヒント
pub const INCORRECT_PROTOCOL_HINT: &str =
    "\nPerhaps,  you specified the HTTP protocol in the JIRA URL instead of HTTPS.";
pub const INCORRECT_PROTOCOL_ERROR_CODE: &str = "301";

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", SETTINGS_ARE_NOT_COMPLETELY_SPECIFIED)]
    NotConfigured,

    #[error("{}", URL_IS_INCORRECT)]
    InvalidUrl,

    #[error("{0}")]
    RemoteCallFailed(String),

    #[error("Issue type '{issue_type}' was not found in project '{project}'.")]
    UnknownIssueType { project: String, issue_type: String },

    #[error("{}", ISSUE_KEY_NOT_SPECIFIED)]
    MissingIssueReference,

    #[error("{}", FILE_NAME_NOT_SPECIFIED)]
    MissingFileName,

    #[error("{}", INCORRECT_FILE_PATH)]
    InvalidFilePath,

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// リモート呼び出しの失敗を `RemoteCallFailed` に包み直す
    pub fn into_remote(self) -> Self {
        match self {
            Error::RemoteCallFailed(_) => self,
            other => Error::RemoteCallFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// エラーメッセージに 301 が含まれていればプロトコルのヒントを付け加える
pub fn with_protocol_hint(message: String) -> String {
    if message.contains(INCORRECT_PROTOCOL_ERROR_CODE) {
        message + INCORRECT_PROTOCOL_HINT
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(Error::MissingIssueReference.to_string(), "No issue key is specified.");
        assert_eq!(Error::MissingFileName.to_string(), "No file name is specified.");
        assert_eq!(Error::InvalidFilePath.to_string(), "Incorrect file path.");
        assert_eq!(Error::InvalidUrl.to_string(), "The JIRA URL format is incorrect.");
        assert!(Error::NotConfigured.to_string().starts_with("Unable to create a JIRA item."));
    }

    #[test]
    fn test_into_remote_keeps_message() {
        // Given: API エラー
        let error = Error::ApiError { status: 500, message: "boom".to_string() };

        // When: RemoteCallFailed に変換
        let remote = error.into_remote();

        // Then: 元のメッセージがそのまま残る
        match remote {
            Error::RemoteCallFailed(msg) => assert_eq!(msg, "API error: 500 - boom"),
            other => panic!("Expected RemoteCallFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_protocol_hint_appended_only_for_301() {
        let hinted = with_protocol_hint("API error: 301 - Moved Permanently".to_string());
        assert!(hinted.starts_with("API error: 301 - Moved Permanently"));
        assert!(hinted.ends_with(INCORRECT_PROTOCOL_HINT));

        let plain = with_protocol_hint("API error: 500 - boom".to_string());
        assert_eq!(plain, "API error: 500 - boom");
    }
}
