use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// 条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Folder,
}

impl FileKind {
    pub fn is_folder(self) -> bool {
        matches!(self, Self::Folder)
    }
}

/// 远端返回的扁平记录，key 即完整路径（文件夹以 `/` 结尾）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// 小写并带前导点，如 `.pdf`；文件夹为空串
    #[serde(default)]
    pub extension: String,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

impl FileRecord {
    pub fn folder(key: impl Into<String>, modified: Option<String>) -> Self {
        Self {
            key: key.into(),
            kind: FileKind::Folder,
            extension: String::new(),
            modified,
            size: None,
        }
    }

    pub fn file(
        key: impl Into<String>,
        extension: impl Into<String>,
        modified: Option<String>,
        size: Option<String>,
    ) -> Self {
        Self {
            key: key.into(),
            kind: FileKind::File,
            extension: extension.into(),
            modified,
            size,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }
}

/// 同级排序规则：文件夹在前，同类按完整 key 升序
pub fn entry_order(a_kind: FileKind, a_key: &str, b_kind: FileKind, b_key: &str) -> Ordering {
    match (a_kind.is_folder(), b_kind.is_folder()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a_key.cmp(b_key),
    }
}

/// 按 [`entry_order`] 对扁平列表排序
pub fn sort_records(records: &mut [FileRecord]) {
    records.sort_by(|a, b| entry_order(a.kind, &a.key, b.kind, &b.key));
}
