//! Folder Service 契约：扁平列表是唯一可信来源，层级逻辑全部在客户端

use attach_common::AttachmentError;
use attach_domain::{ContentMode, FileRecord, FileUpload, Scope};
use futures::future::BoxFuture;

/// [`FolderService`] 异步方法统一使用的 boxed future
pub type FolderFuture<'a, T> = BoxFuture<'a, Result<T, AttachmentError>>;

pub trait FolderService: Send + Sync {
    /// 列出实体下的全部文件与文件夹
    fn list<'a>(&'a self, scope: &'a Scope) -> FolderFuture<'a, Vec<FileRecord>>;

    /// 创建空文件夹，`key` 以 `/` 结尾
    fn create_folder<'a>(&'a self, scope: &'a Scope, key: &'a str) -> FolderFuture<'a, ()>;

    /// 重命名文件夹，远端负责把整个子树迁移到新前缀
    fn rename_folder<'a>(
        &'a self,
        scope: &'a Scope,
        from: &'a str,
        to: &'a str,
    ) -> FolderFuture<'a, ()>;

    /// 删除文件夹，远端级联删除所有以其为前缀的记录
    fn delete_folder<'a>(&'a self, scope: &'a Scope, key: &'a str) -> FolderFuture<'a, ()>;

    fn delete_file<'a>(&'a self, scope: &'a Scope, key: &'a str) -> FolderFuture<'a, ()>;

    /// 上传文件到 `parent` 文件夹（根为空串）
    fn upload_file<'a>(
        &'a self,
        scope: &'a Scope,
        parent: &'a str,
        upload: &'a FileUpload,
    ) -> FolderFuture<'a, ()>;

    /// 读取文件内容
    fn fetch_content<'a>(
        &'a self,
        scope: &'a Scope,
        key: &'a str,
        mode: ContentMode,
    ) -> FolderFuture<'a, Vec<u8>>;
}
