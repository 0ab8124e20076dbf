use super::BasicIssue;
use crate::error::Error;

/// 課題作成の結果。部分的な成功はない
#[derive(Debug, Clone, PartialEq)]
pub enum IssueCreationResult {
    Created(BasicIssue),
    Failed(String),
}

impl IssueCreationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, IssueCreationResult::Created(_))
    }

    pub fn issue(&self) -> Option<&BasicIssue> {
        match self {
            IssueCreationResult::Created(issue) => Some(issue),
            IssueCreationResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            IssueCreationResult::Created(_) => None,
            IssueCreationResult::Failed(message) => Some(message),
        }
    }
}

impl From<Error> for IssueCreationResult {
    fn from(error: Error) -> Self {
        IssueCreationResult::Failed(error.to_string())
    }
}

/// 添付ファイル追加の結果
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentAddingResult {
    Added,
    Failed(String),
}

impl AttachmentAddingResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AttachmentAddingResult::Added)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AttachmentAddingResult::Added => None,
            AttachmentAddingResult::Failed(message) => Some(message),
        }
    }
}

impl From<Error> for AttachmentAddingResult {
    fn from(error: Error) -> Self {
        AttachmentAddingResult::Failed(error.to_string())
    }
}
