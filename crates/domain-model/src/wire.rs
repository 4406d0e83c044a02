//! Folder Service 请求体

use serde::{Deserialize, Serialize};

/// 创建/删除文件夹、删除文件共用：`{ruta, materiales}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRequest {
    pub ruta: String,
    pub materiales: bool,
}

/// 重命名文件夹：`{ruta, rutaNueva, materiales}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub ruta: String,
    pub ruta_nueva: String,
    pub materiales: bool,
}

/// 待上传的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// 文件内容获取方式：下载保存或直接查看
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    Download,
    View,
}
