//! 基于 reqwest 的 Folder Service 客户端
//!
//! 路由：`api/{gestor}/{id}/documentacion|crear-carpeta|rename-carpeta|eliminar-carpeta|eliminar-archivo|subir-archivo`，
//! 文件内容走 `descargar-archivo/{key}` 与 `ver-archivo/{key}`（key 需 URL 编码）。

use std::time::Duration;

use attach_common::{AppConfig, AttachmentError};
use attach_domain::{ContentMode, FileRecord, FileUpload, PathRequest, RenameRequest, Scope};
use attach_explorer::{FolderFuture, FolderService};
use reqwest::{Client, RequestBuilder, Response};

pub struct HttpFolderService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpFolderService {
    pub fn new(config: &AppConfig) -> Result<Self, AttachmentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AttachmentError::Config(format!("无法创建 HTTP 客户端: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, scope: &Scope, action: &str) -> String {
        format!(
            "{}/api/{}/{}/{}",
            self.base_url,
            urlencoding::encode(&scope.gestor),
            urlencoding::encode(&scope.id),
            action
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn path_body(scope: &Scope, key: &str) -> PathRequest {
        PathRequest {
            ruta: key.to_string(),
            materiales: scope.partition.is_materials(),
        }
    }

    async fn send(&self, builder: RequestBuilder, op: &str) -> Result<Response, AttachmentError> {
        let response = self.authorized(builder).send().await.map_err(|e| {
            log::error!("{} request failed: {}", op, e);
            AttachmentError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::warn!("{} rejected ({}): {}", op, status, body);
        Err(AttachmentError::Remote {
            status: status.as_u16(),
            body,
        })
    }

    async fn list_records(&self, scope: &Scope) -> Result<Vec<FileRecord>, AttachmentError> {
        let url = self.endpoint(scope, "documentacion");
        let request = self
            .client
            .get(url)
            .query(&[("materiales", scope.partition.is_materials())]);
        let response = self.send(request, "documentacion").await?;
        response
            .json::<Vec<FileRecord>>()
            .await
            .map_err(|e| AttachmentError::Decode(format!("解析文件列表失败: {}", e)))
    }

    async fn put_path(&self, scope: &Scope, action: &str, key: &str) -> Result<(), AttachmentError> {
        let request = self
            .client
            .put(self.endpoint(scope, action))
            .json(&Self::path_body(scope, key));
        self.send(request, action).await.map(drop)
    }

    async fn post_folder(&self, scope: &Scope, key: &str) -> Result<(), AttachmentError> {
        let request = self
            .client
            .post(self.endpoint(scope, "crear-carpeta"))
            .json(&Self::path_body(scope, key));
        self.send(request, "crear-carpeta").await.map(drop)
    }

    async fn put_rename(&self, scope: &Scope, from: &str, to: &str) -> Result<(), AttachmentError> {
        let body = RenameRequest {
            ruta: from.to_string(),
            ruta_nueva: to.to_string(),
            materiales: scope.partition.is_materials(),
        };
        let request = self.client.put(self.endpoint(scope, "rename-carpeta")).json(&body);
        self.send(request, "rename-carpeta").await.map(drop)
    }

    async fn post_upload(
        &self,
        scope: &Scope,
        parent: &str,
        upload: &FileUpload,
    ) -> Result<(), AttachmentError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes.clone()).file_name(upload.name.clone());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("Ruta", parent.to_string())
            .text("materiales", scope.partition.is_materials().to_string());
        let request = self.client.post(self.endpoint(scope, "subir-archivo")).multipart(form);
        self.send(request, "subir-archivo").await.map(drop)
    }

    async fn get_content(
        &self,
        scope: &Scope,
        key: &str,
        mode: ContentMode,
    ) -> Result<Vec<u8>, AttachmentError> {
        let action = match mode {
            ContentMode::Download => "descargar-archivo",
            ContentMode::View => "ver-archivo",
        };
        let url = format!("{}/{}", self.endpoint(scope, action), urlencoding::encode(key));
        let request = self
            .client
            .get(url)
            .query(&[("materiales", scope.partition.is_materials())]);
        let response = self.send(request, action).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AttachmentError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl FolderService for HttpFolderService {
    fn list<'a>(&'a self, scope: &'a Scope) -> FolderFuture<'a, Vec<FileRecord>> {
        Box::pin(self.list_records(scope))
    }

    fn create_folder<'a>(&'a self, scope: &'a Scope, key: &'a str) -> FolderFuture<'a, ()> {
        Box::pin(self.post_folder(scope, key))
    }

    fn rename_folder<'a>(
        &'a self,
        scope: &'a Scope,
        from: &'a str,
        to: &'a str,
    ) -> FolderFuture<'a, ()> {
        Box::pin(self.put_rename(scope, from, to))
    }

    fn delete_folder<'a>(&'a self, scope: &'a Scope, key: &'a str) -> FolderFuture<'a, ()> {
        Box::pin(self.put_path(scope, "eliminar-carpeta", key))
    }

    fn delete_file<'a>(&'a self, scope: &'a Scope, key: &'a str) -> FolderFuture<'a, ()> {
        Box::pin(self.put_path(scope, "eliminar-archivo", key))
    }

    fn upload_file<'a>(
        &'a self,
        scope: &'a Scope,
        parent: &'a str,
        upload: &'a FileUpload,
    ) -> FolderFuture<'a, ()> {
        Box::pin(self.post_upload(scope, parent, upload))
    }

    fn fetch_content<'a>(
        &'a self,
        scope: &'a Scope,
        key: &'a str,
        mode: ContentMode,
    ) -> FolderFuture<'a, Vec<u8>> {
        Box::pin(self.get_content(scope, key, mode))
    }
}
