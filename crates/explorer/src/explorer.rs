//! 文件浏览器状态：扁平列表 → 过滤 → 建树 → 渲染，以及结构变更的协调
//!
//! 所有变更先在本地校验（重复 key 直接拒绝，不触达远端），远端确认后才修改本地列表。
//! 创建类操作在本地追加记录；重命名与删除之后重新拉取完整列表。
//! 变更方法都借用 `&mut self`，同一实例同一时刻最多只有一个变更在途。

use attach_common::{AttachmentError, DEFAULT_RENDER_DEPTH};
use attach_domain::{
    extension_of, format_file_size, now_modified, sort_records, ContentMode, FileKind, FileRecord,
    FileUpload, KeyPath, Scope, TreeNode,
};
use attach_tree::{
    build_tree, forced_expansion, node_actions, visible_rows, ExpansionState, NodeAction,
    RenderRow, SearchFilter,
};

use crate::service::FolderService;

pub struct Explorer<S> {
    service: S,
    scope: Scope,
    records: Vec<FileRecord>,
    search: SearchFilter,
    expansion: ExpansionState,
    editable: bool,
    stale: bool,
    render_depth: usize,
}

impl<S: FolderService> Explorer<S> {
    pub fn new(service: S, scope: Scope) -> Self {
        Self {
            service,
            scope,
            records: Vec::new(),
            search: SearchFilter::default(),
            expansion: ExpansionState::new(),
            editable: true,
            stale: false,
            render_depth: DEFAULT_RENDER_DEPTH,
        }
    }

    pub fn with_render_depth(mut self, depth: usize) -> Self {
        self.render_depth = depth;
        self
    }

    /// 只读模式：隐藏并拒绝所有结构变更
    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// 变更已被远端确认但随后的刷新失败，本地列表可能过期
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// 拉取完整列表；404 表示实体尚无附件。失败时保留原列表
    pub async fn refresh(&mut self) -> Result<(), AttachmentError> {
        match self.service.list(&self.scope).await {
            Ok(records) => {
                log::debug!("{}: fetched {} records", self.scope, records.len());
                self.replace_records(records);
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                log::debug!("{}: no attachments yet", self.scope);
                self.replace_records(Vec::new());
                Ok(())
            }
            Err(err) => {
                log_failure("refresh", &self.scope, &err);
                Err(err)
            }
        }
    }

    /// 替换本地列表（保持排序并重新应用搜索）
    pub fn replace_records(&mut self, mut records: Vec<FileRecord>) {
        sort_records(&mut records);
        self.records = records;
        self.stale = false;
        self.sync_forced_expansion();
    }

    pub fn search_term(&self) -> &str {
        self.search.term()
    }

    /// 设置搜索词；启用时强制展开所有命中项的祖先文件夹
    pub fn set_search(&mut self, term: &str) {
        self.search = SearchFilter::new(term);
        self.sync_forced_expansion();
    }

    fn sync_forced_expansion(&mut self) {
        if self.search.is_active() {
            let matches = self.search.apply(&self.records);
            self.expansion.set_forced(forced_expansion(&matches));
        } else {
            self.expansion.clear_forced();
        }
    }

    pub fn toggle(&mut self, key: &str) -> bool {
        self.expansion.toggle(key)
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expansion.is_expanded(key)
    }

    /// 手动展开当前列表中的全部文件夹
    pub fn expand_all(&mut self) {
        for record in &self.records {
            for prefix in KeyPath::from_record(record).folder_prefixes() {
                self.expansion.expand(&prefix.to_key());
            }
        }
    }

    pub fn filtered_records(&self) -> Vec<FileRecord> {
        self.search.apply(&self.records)
    }

    /// 当前过滤结果对应的森林
    pub fn tree(&self) -> Vec<TreeNode> {
        build_tree(&self.filtered_records())
    }

    pub fn visible_rows(&self) -> Vec<RenderRow> {
        visible_rows(&self.tree(), &self.expansion, self.render_depth)
    }

    pub fn actions_for(&self, kind: FileKind) -> Vec<NodeAction> {
        node_actions(kind, self.editable)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.records.iter().any(|record| record.key == key)
    }

    fn ensure_editable(&self) -> Result<(), AttachmentError> {
        if self.editable {
            Ok(())
        } else {
            Err(AttachmentError::InvalidTarget("explorer is read-only".to_string()))
        }
    }

    /// 在 `parent`（根为空串）下创建文件夹，返回新 key
    pub async fn create_folder(&mut self, parent: &str, name: &str) -> Result<String, AttachmentError> {
        self.ensure_editable()?;
        let parent = parse_parent(parent)?;
        let name = validate_name(name)?;
        let key = parent.child_folder(name).to_key();
        if self.contains_key(&key) {
            return Err(AttachmentError::FolderExists(key));
        }

        if let Err(err) = self.service.create_folder(&self.scope, &key).await {
            log_failure("create folder", &self.scope, &err);
            return Err(err);
        }
        log::info!("{}: created folder {}", self.scope, key);

        self.records.push(FileRecord::folder(key.clone(), Some(now_modified())));
        self.after_local_insert(&parent);
        Ok(key)
    }

    /// 上传文件到 `parent`，返回新 key
    pub async fn upload_file(
        &mut self,
        parent: &str,
        upload: FileUpload,
    ) -> Result<String, AttachmentError> {
        self.ensure_editable()?;
        let parent = parse_parent(parent)?;
        let name = validate_file_name(&upload.name)?;
        let key = parent.child_file(name).to_key();
        if self.contains_key(&key) {
            return Err(AttachmentError::FileExists(key));
        }

        let parent_key = parent.to_key();
        if let Err(err) = self.service.upload_file(&self.scope, &parent_key, &upload).await {
            log_failure("upload", &self.scope, &err);
            return Err(err);
        }
        log::info!("{}: uploaded {} ({} bytes)", self.scope, key, upload.size());

        self.records.push(FileRecord::file(
            key.clone(),
            extension_of(name),
            Some(now_modified()),
            Some(format_file_size(upload.size())),
        ));
        self.after_local_insert(&parent);
        Ok(key)
    }

    fn after_local_insert(&mut self, parent: &KeyPath) {
        sort_records(&mut self.records);
        if !parent.is_root() {
            self.expansion.expand(&parent.to_key());
        }
        self.sync_forced_expansion();
    }

    /// 重命名文件夹，成功后重新拉取列表。返回新 key
    pub async fn rename_folder(&mut self, key: &str, new_name: &str) -> Result<String, AttachmentError> {
        self.ensure_editable()?;
        let path = KeyPath::parse(key);
        if path.is_root() || !path.is_folder() {
            return Err(AttachmentError::InvalidTarget(format!(
                "only folders can be renamed: {:?}",
                key
            )));
        }
        let old_key = path.to_key();
        let new_name = validate_name(new_name)?;
        let new_key = path.with_name(new_name).to_key();
        if new_key == old_key {
            return Ok(new_key);
        }
        // 显式记录或隐式文件夹（已有以其为前缀的记录）都算冲突
        if self.records.iter().any(|record| record.key.starts_with(&new_key)) {
            return Err(AttachmentError::FolderExists(new_key));
        }

        if let Err(err) = self.service.rename_folder(&self.scope, &old_key, &new_key).await {
            log_failure("rename folder", &self.scope, &err);
            return Err(err);
        }
        log::info!("{}: renamed {} -> {}", self.scope, old_key, new_key);

        self.expansion.rename_prefix(&old_key, &new_key);
        self.refetch_after_mutation().await;
        Ok(new_key)
    }

    /// 删除文件或文件夹（文件夹由远端级联删除）
    pub async fn delete(&mut self, key: &str) -> Result<(), AttachmentError> {
        self.ensure_editable()?;
        let path = KeyPath::parse(key);
        if path.is_root() {
            return Err(AttachmentError::InvalidTarget("cannot delete the root".to_string()));
        }
        let key = path.to_key();

        let result = if path.is_folder() {
            self.service.delete_folder(&self.scope, &key).await
        } else {
            self.service.delete_file(&self.scope, &key).await
        };
        if let Err(err) = result {
            log_failure("delete", &self.scope, &err);
            return Err(err);
        }
        log::info!("{}: deleted {}", self.scope, key);

        // 远端已确认，先本地剪枝，再以刷新结果为准
        if path.is_folder() {
            self.records.retain(|record| !record.key.starts_with(&key));
            self.expansion.retain_keys(|k| !k.starts_with(&key));
        } else {
            self.records.retain(|record| record.key != key);
        }
        self.sync_forced_expansion();
        self.refetch_after_mutation().await;
        Ok(())
    }

    async fn refetch_after_mutation(&mut self) {
        if let Err(err) = self.refresh().await {
            log::warn!("{}: listing is stale after mutation: {}", self.scope, err);
            self.stale = true;
        }
    }

    /// 下载或查看文件内容
    pub async fn fetch_content(&self, key: &str, mode: ContentMode) -> Result<Vec<u8>, AttachmentError> {
        let path = KeyPath::parse(key);
        if path.is_folder() {
            return Err(AttachmentError::InvalidTarget(format!("not a file: {:?}", key)));
        }
        self.service
            .fetch_content(&self.scope, &path.to_key(), mode)
            .await
            .map_err(|err| {
                log_failure("fetch content", &self.scope, &err);
                err
            })
    }
}

fn parse_parent(parent: &str) -> Result<KeyPath, AttachmentError> {
    let path = KeyPath::parse(parent);
    if path.is_folder() {
        Ok(path)
    } else {
        Err(AttachmentError::InvalidTarget(format!("not a folder: {:?}", parent)))
    }
}

/// 名称去掉首尾空白，不能为空、不能包含分隔符
fn validate_name(name: &str) -> Result<&str, AttachmentError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(AttachmentError::InvalidName(format!("{:?}", name)));
    }
    if trimmed.contains(attach_domain::SEPARATOR) {
        return Err(AttachmentError::InvalidName(format!("{:?} contains '/'", name)));
    }
    Ok(trimmed)
}

/// 文件名按原样使用（与上传表单中的文件名一致），只拒绝空名与分隔符
fn validate_file_name(name: &str) -> Result<&str, AttachmentError> {
    if name.trim().is_empty() || name == "." || name == ".." {
        return Err(AttachmentError::InvalidName(format!("{:?}", name)));
    }
    if name.contains(attach_domain::SEPARATOR) {
        return Err(AttachmentError::InvalidName(format!("{:?} contains '/'", name)));
    }
    Ok(name)
}

fn log_failure(op: &str, scope: &Scope, err: &AttachmentError) {
    match err {
        AttachmentError::Remote { status, body } => {
            log::warn!("{}: {} rejected ({}): {}", scope, op, status, body)
        }
        other => log::error!("{}: {} failed: {}", scope, op, other),
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::MemoryFolderService;
    use attach_domain::{Action, Partition};

    fn scope() -> Scope {
        Scope::new("ordenes", "42", Partition::General)
    }

    fn sample() -> Vec<FileRecord> {
        vec![
            FileRecord::folder("A/", None),
            FileRecord::file("A/b.txt", ".txt", None, Some("5.00 B".into())),
            FileRecord::file("C.pdf", ".pdf", None, None),
        ]
    }

    fn explorer_with(records: Vec<FileRecord>) -> Explorer<MemoryFolderService> {
        let service = MemoryFolderService::new();
        service.seed(&scope(), records);
        let mut explorer = Explorer::new(service, scope());
        block_on(explorer.refresh()).unwrap();
        explorer
    }

    fn keys(explorer: &Explorer<MemoryFolderService>) -> Vec<&str> {
        explorer.records().iter().map(|r| r.key.as_str()).collect()
    }

    #[test]
    fn test_refresh_sorts_records() {
        let explorer = explorer_with(sample());
        assert_eq!(keys(&explorer), vec!["A/", "A/b.txt", "C.pdf"]);
        let tree = explorer.tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children[0].name, "b.txt");
    }

    #[test]
    fn test_refresh_empty_scope_is_not_an_error() {
        let mut explorer = Explorer::new(MemoryFolderService::new(), scope());
        block_on(explorer.refresh()).unwrap();
        assert!(explorer.records().is_empty());
        assert!(explorer.tree().is_empty());
    }

    #[test]
    fn test_refresh_failure_keeps_previous_list() {
        let mut explorer = explorer_with(sample());
        explorer.service().fail_next(500, "Error al obtener la documentación");
        let err = block_on(explorer.refresh()).unwrap_err();
        assert!(matches!(err, AttachmentError::Remote { status: 500, .. }));
        assert_eq!(explorer.records().len(), 3);
    }

    #[test]
    fn test_create_folder_duplicate_rejected_locally() {
        let mut explorer = explorer_with(vec![
            FileRecord::folder("A/", None),
            FileRecord::folder("A/B/", None),
        ]);
        let err = block_on(explorer.create_folder("A/", "B")).unwrap_err();
        assert!(matches!(err, AttachmentError::FolderExists(ref key) if key == "A/B/"));
        assert!(err.is_validation());
        assert!(explorer.service().journal().is_empty());
        assert_eq!(keys(&explorer), vec!["A/", "A/B/"]);
    }

    #[test]
    fn test_create_folder_trims_name_and_expands_parent() {
        let mut explorer = explorer_with(sample());
        let key = block_on(explorer.create_folder("A/", "  Fotos  ")).unwrap();
        assert_eq!(key, "A/Fotos/");
        assert!(explorer.is_expanded("A/"));
        assert_eq!(keys(&explorer), vec!["A/", "A/Fotos/", "A/b.txt", "C.pdf"]);
        assert_eq!(
            explorer.service().journal(),
            vec![Action::CreateFolder { key: "A/Fotos/".into() }]
        );
        // 本地追加，不重新拉取
        assert_eq!(explorer.service().list_calls(), 1);
    }

    #[test]
    fn test_create_folder_at_root() {
        let mut explorer = explorer_with(sample());
        let key = block_on(explorer.create_folder("", "Nueva")).unwrap();
        assert_eq!(key, "Nueva/");
        assert_eq!(explorer.tree()[1].key, "Nueva/");
    }

    #[test]
    fn test_create_folder_invalid_names() {
        let mut explorer = explorer_with(sample());
        for name in ["", "   ", "a/b", ".."] {
            let err = block_on(explorer.create_folder("", name)).unwrap_err();
            assert!(matches!(err, AttachmentError::InvalidName(_)), "name {name:?}");
        }
        let err = block_on(explorer.create_folder("C.pdf", "x")).unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidTarget(_)));
        assert!(explorer.service().journal().is_empty());
    }

    #[test]
    fn test_remote_rejection_leaves_state_intact() {
        let mut explorer = explorer_with(sample());
        explorer.service().fail_next(403, "{\"Error\":\"sin permiso\"}");
        let err = block_on(explorer.create_folder("A/", "Fotos")).unwrap_err();
        assert_eq!(err.user_message(), "{\"Error\":\"sin permiso\"}");
        assert_eq!(explorer.records().len(), 3);
        assert!(!explorer.is_expanded("A/"));
    }

    #[test]
    fn test_upload_file() {
        let mut explorer = explorer_with(sample());
        let upload = FileUpload::new("Parte.DOCX", vec![0; 2048]);
        let key = block_on(explorer.upload_file("A/", upload)).unwrap();
        assert_eq!(key, "A/Parte.DOCX");
        let record = explorer.records().iter().find(|r| r.key == key).unwrap();
        assert_eq!(record.extension, ".docx");
        assert_eq!(record.size.as_deref(), Some("2.00 KB"));
        assert!(record.modified.is_some());
        assert!(explorer.is_expanded("A/"));

        let dup = FileUpload::new("Parte.DOCX", vec![1]);
        let err = block_on(explorer.upload_file("A/", dup)).unwrap_err();
        assert!(matches!(err, AttachmentError::FileExists(_)));
        assert_eq!(explorer.service().journal().len(), 1);
    }

    #[test]
    fn test_upload_key_matches_service_key() {
        let mut explorer = explorer_with(sample());
        let upload = FileUpload::new(" informe.pdf ", vec![1, 2, 3]);
        let key = block_on(explorer.upload_file("A/", upload)).unwrap();
        assert_eq!(key, "A/ informe.pdf ");
        let local: Vec<String> = keys(&explorer).into_iter().map(String::from).collect();

        block_on(explorer.refresh()).unwrap();
        let refreshed: Vec<String> = keys(&explorer).into_iter().map(String::from).collect();
        assert_eq!(local, refreshed);
        assert_eq!(refreshed, explorer.service().keys(&scope()));

        let again = FileUpload::new(" informe.pdf ", vec![4]);
        let err = block_on(explorer.upload_file("A/", again)).unwrap_err();
        assert!(matches!(err, AttachmentError::FileExists(ref k) if k == "A/ informe.pdf "));
        assert_eq!(explorer.service().journal().len(), 1);
    }

    #[test]
    fn test_upload_invalid_file_names() {
        let mut explorer = explorer_with(sample());
        for name in ["", "  ", "a/b.txt", ".."] {
            let err = block_on(explorer.upload_file("A/", FileUpload::new(name, vec![]))).unwrap_err();
            assert!(matches!(err, AttachmentError::InvalidName(_)), "name {name:?}");
        }
        assert!(explorer.service().journal().is_empty());
    }

    #[test]
    fn test_rename_folder_refetches() {
        let mut explorer = explorer_with(sample());
        explorer.toggle("A/");
        let new_key = block_on(explorer.rename_folder("A/", "Z")).unwrap();
        assert_eq!(new_key, "Z/");
        assert_eq!(
            explorer.service().journal(),
            vec![Action::RenameFolder { from: "A/".into(), to: "Z/".into() }]
        );
        assert_eq!(explorer.service().list_calls(), 2);
        assert_eq!(keys(&explorer), vec!["Z/", "C.pdf", "Z/b.txt"]);
        assert!(explorer.is_expanded("Z/"));
        assert!(!explorer.is_expanded("A/"));
    }

    #[test]
    fn test_rename_nested_folder() {
        let mut explorer = explorer_with(vec![
            FileRecord::folder("A/", None),
            FileRecord::folder("A/B/", None),
            FileRecord::file("A/B/c.pdf", ".pdf", None, None),
        ]);
        let new_key = block_on(explorer.rename_folder("A/B/", "Fotos ")).unwrap();
        assert_eq!(new_key, "A/Fotos/");
        assert_eq!(keys(&explorer), vec!["A/", "A/Fotos/", "A/Fotos/c.pdf"]);
    }

    #[test]
    fn test_rename_collision_rejected() {
        let mut explorer = explorer_with(vec![
            FileRecord::folder("A/", None),
            FileRecord::file("Z/x.txt", ".txt", None, None),
        ]);
        let err = block_on(explorer.rename_folder("A/", "Z")).unwrap_err();
        assert!(matches!(err, AttachmentError::FolderExists(ref key) if key == "Z/"));
        assert!(explorer.service().journal().is_empty());
    }

    #[test]
    fn test_rename_same_name_is_noop_and_files_rejected() {
        let mut explorer = explorer_with(sample());
        assert_eq!(block_on(explorer.rename_folder("A/", "A")).unwrap(), "A/");
        let err = block_on(explorer.rename_folder("C.pdf", "D.pdf")).unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidTarget(_)));
        assert!(explorer.service().journal().is_empty());
    }

    #[test]
    fn test_delete_folder_cascades_and_refetches() {
        let mut explorer = explorer_with(sample());
        block_on(explorer.delete("A/")).unwrap();
        assert_eq!(keys(&explorer), vec!["C.pdf"]);
        assert_eq!(
            explorer.service().journal(),
            vec![Action::DeleteFolder { key: "A/".into() }]
        );
        assert_eq!(explorer.service().list_calls(), 2);
    }

    #[test]
    fn test_delete_last_file_leaves_empty_listing() {
        let mut explorer = explorer_with(vec![FileRecord::file("C.pdf", ".pdf", None, None)]);
        block_on(explorer.delete("C.pdf")).unwrap();
        assert!(explorer.records().is_empty());
        assert!(!explorer.is_stale());
    }

    #[test]
    fn test_rename_moves_nested_expansion() {
        let mut explorer = explorer_with(vec![
            FileRecord::folder("A/", None),
            FileRecord::folder("A/X/", None),
            FileRecord::file("A/X/y.txt", ".txt", None, None),
        ]);
        explorer.toggle("A/");
        explorer.toggle("A/X/");
        block_on(explorer.rename_folder("A/", "Z")).unwrap();
        assert!(explorer.is_expanded("Z/"));
        assert!(explorer.is_expanded("Z/X/"));
        assert!(!explorer.is_expanded("A/X/"));
    }

    #[test]
    fn test_failed_refetch_after_delete_marks_stale() {
        let mut explorer = explorer_with(sample());
        explorer.service().fail_next_list(500, "Error al obtener la documentación");
        block_on(explorer.delete("A/")).unwrap();
        assert!(explorer.is_stale());
        // 本地剪枝结果保留
        assert_eq!(keys(&explorer), vec!["C.pdf"]);

        block_on(explorer.refresh()).unwrap();
        assert!(!explorer.is_stale());
        assert_eq!(keys(&explorer), vec!["C.pdf"]);
    }

    #[test]
    fn test_failed_refetch_after_rename_marks_stale() {
        let mut explorer = explorer_with(sample());
        explorer.service().fail_next_list(503, "");
        let new_key = block_on(explorer.rename_folder("A/", "Z")).unwrap();
        assert_eq!(new_key, "Z/");
        assert!(explorer.is_stale());
        assert_eq!(keys(&explorer), vec!["A/", "A/b.txt", "C.pdf"]);

        block_on(explorer.refresh()).unwrap();
        assert!(!explorer.is_stale());
        assert_eq!(keys(&explorer), vec!["Z/", "C.pdf", "Z/b.txt"]);
    }

    #[test]
    fn test_delete_remote_failure_keeps_records() {
        let mut explorer = explorer_with(sample());
        explorer.service().fail_next(404, "No existe");
        assert!(block_on(explorer.delete("A/b.txt")).is_err());
        assert_eq!(explorer.records().len(), 3);
    }

    #[test]
    fn test_search_forces_ancestors_open() {
        let mut explorer = explorer_with(sample());
        explorer.set_search("b.txt");
        assert_eq!(explorer.filtered_records().len(), 1);
        assert!(explorer.is_expanded("A/"));
        let rows = explorer.visible_rows();
        let row_keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(row_keys, vec!["A/", "A/b.txt"]);

        explorer.set_search("");
        assert!(!explorer.is_expanded("A/"));
        assert_eq!(explorer.visible_rows().len(), 2);
    }

    #[test]
    fn test_clearing_search_keeps_manual_expansion() {
        let mut explorer = explorer_with(sample());
        explorer.toggle("A/");
        explorer.set_search("pdf");
        explorer.set_search("");
        assert!(explorer.is_expanded("A/"));
    }

    #[test]
    fn test_read_only_rejects_mutations() {
        let service = MemoryFolderService::new();
        service.seed(&scope(), sample());
        let mut explorer = Explorer::new(service, scope()).read_only();
        block_on(explorer.refresh()).unwrap();
        assert!(block_on(explorer.delete("C.pdf")).is_err());
        assert!(explorer.service().journal().is_empty());
        assert_eq!(
            explorer.actions_for(FileKind::File),
            vec![NodeAction::Open, NodeAction::Download]
        );
    }

    #[test]
    fn test_fetch_content_rejects_folders() {
        let explorer = explorer_with(sample());
        let err = block_on(explorer.fetch_content("A/", ContentMode::Download)).unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidTarget(_)));
    }
}
