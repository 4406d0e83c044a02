use serde::{Deserialize, Serialize};

/// 对远端 Folder Service 发起的结构变更
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    CreateFolder { key: String },
    UploadFile { key: String, size: u64 },
    RenameFolder { from: String, to: String },
    DeleteFolder { key: String },
    DeleteFile { key: String },
}
