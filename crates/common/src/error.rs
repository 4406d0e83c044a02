use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("folder already exists: {0}")]
    FolderExists(String),

    #[error("file already exists: {0}")]
    FileExists(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// 远端拒绝，body 原样保留给界面展示
    #[error("Remote error ({status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AttachmentError {
    /// 本地校验失败（不会触达远端）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::FolderExists(_) | Self::FileExists(_) | Self::InvalidName(_) | Self::InvalidTarget(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { status: 404, .. })
    }

    /// 面向用户的错误文本；远端错误直接返回其 body
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { body, .. } if !body.trim().is_empty() => body.clone(),
            Self::Remote { status, .. } => format!("Error {}", status),
            Self::Transport(_) => "Ha ocurrido un error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_classified() {
        assert!(AttachmentError::FolderExists("A/".into()).is_validation());
        assert!(AttachmentError::InvalidName(String::new()).is_validation());
        assert!(!AttachmentError::Transport("timeout".into()).is_validation());
        assert!(!AttachmentError::Remote { status: 409, body: "conflict".into() }.is_validation());
    }

    #[test]
    fn test_not_found_only_matches_remote_404() {
        assert!(AttachmentError::Remote { status: 404, body: String::new() }.is_not_found());
        assert!(!AttachmentError::Remote { status: 500, body: String::new() }.is_not_found());
        assert!(!AttachmentError::Decode("bad json".into()).is_not_found());
    }

    #[test]
    fn test_user_message_passes_remote_body_verbatim() {
        let err = AttachmentError::Remote {
            status: 403,
            body: "{\"Ruta\":[\"sin permiso\"]}".into(),
        };
        assert_eq!(err.user_message(), "{\"Ruta\":[\"sin permiso\"]}");

        let empty = AttachmentError::Remote { status: 500, body: "  ".into() };
        assert_eq!(empty.user_message(), "Error 500");

        let transport = AttachmentError::Transport("connection refused".into());
        assert_eq!(transport.user_message(), "Ha ocurrido un error");
    }
}
