use std::path::{Path, PathBuf};

use attach_common::AttachmentError;
use attach_domain::{ContentMode, FileUpload, KeyPath};
use attach_explorer::{Explorer, FolderService};

pub async fn upload<S: FolderService>(
    explorer: &mut Explorer<S>,
    parent: &str,
    file: &Path,
) -> Result<String, AttachmentError> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AttachmentError::InvalidName(format!("cannot determine file name: {}", file.display())))?
        .to_string();
    let bytes = std::fs::read(file)?;
    let key = explorer.upload_file(parent, FileUpload::new(name, bytes)).await?;
    Ok(format!("Archivo subido: {}\n", key))
}

/// 下载到 `out`，缺省为当前目录下的同名文件
pub async fn download<S: FolderService>(
    explorer: &Explorer<S>,
    key: &str,
    out: Option<PathBuf>,
) -> Result<String, AttachmentError> {
    let bytes = explorer.fetch_content(key, ContentMode::Download).await?;
    let target = match out {
        Some(path) => path,
        None => PathBuf::from(file_name(key)?),
    };
    std::fs::write(&target, &bytes)?;
    Ok(format!("Descargado {} -> {} ({} bytes)\n", key, target.display(), bytes.len()))
}

/// 写入临时目录后用系统默认程序打开
pub async fn view<S: FolderService>(explorer: &Explorer<S>, key: &str) -> Result<String, AttachmentError> {
    let bytes = explorer.fetch_content(key, ContentMode::View).await?;
    let target = std::env::temp_dir().join(file_name(key)?);
    std::fs::write(&target, &bytes)?;
    open::that(&target)?;
    Ok(format!("Abierto: {}\n", target.display()))
}

fn file_name(key: &str) -> Result<String, AttachmentError> {
    KeyPath::parse(key)
        .name()
        .map(str::to_string)
        .ok_or_else(|| AttachmentError::InvalidTarget(format!("not a file: {:?}", key)))
}
