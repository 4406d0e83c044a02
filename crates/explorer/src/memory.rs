use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use attach_common::AttachmentError;
use attach_domain::{
    extension_of, format_file_size, now_modified, Action, ContentMode, FileRecord, FileUpload,
    KeyPath, Partition, Scope,
};

use crate::service::{FolderFuture, FolderService};

type StoreKey = (String, String, Partition);

#[derive(Debug, Clone)]
struct StoredEntry {
    record: FileRecord,
    content: Vec<u8>,
}

#[derive(Debug, Default)]
struct MemoryState {
    trees: HashMap<StoreKey, BTreeMap<String, StoredEntry>>,
    journal: Vec<Action>,
    list_calls: usize,
    fail_next: Option<(u16, String)>,
    fail_list: Option<(u16, String)>,
}

/// 内存版 Folder Service，行为与远端一致：空实体返回 404，重命名/删除按前缀级联
#[derive(Debug, Default)]
pub struct MemoryFolderService {
    state: Mutex<MemoryState>,
}

impl MemoryFolderService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置记录（不计入 journal）
    pub fn seed(&self, scope: &Scope, records: impl IntoIterator<Item = FileRecord>) {
        let mut state = self.lock();
        let tree = state.trees.entry(store_key(scope)).or_default();
        for record in records {
            tree.insert(
                record.key.clone(),
                StoredEntry {
                    record,
                    content: Vec::new(),
                },
            );
        }
    }

    /// 下一次调用返回指定的远端错误
    pub fn fail_next(&self, status: u16, body: impl Into<String>) {
        self.lock().fail_next = Some((status, body.into()));
    }

    /// 仅让下一次 `list` 失败，变更请求不受影响
    pub fn fail_next_list(&self, status: u16, body: impl Into<String>) {
        self.lock().fail_list = Some((status, body.into()));
    }

    /// 收到的全部变更请求
    pub fn journal(&self) -> Vec<Action> {
        self.lock().journal.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    pub fn keys(&self, scope: &Scope) -> Vec<String> {
        self.lock()
            .trees
            .get(&store_key(scope))
            .map(|tree| tree.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<F>(&self, scope: &Scope, action: Action, apply: F) -> Result<(), AttachmentError>
    where
        F: FnOnce(&mut BTreeMap<String, StoredEntry>) -> Result<(), AttachmentError>,
    {
        let mut state = self.lock();
        state.journal.push(action);
        if let Some((status, body)) = state.fail_next.take() {
            return Err(AttachmentError::Remote { status, body });
        }
        let tree = state.trees.entry(store_key(scope)).or_default();
        apply(tree)
    }
}

fn store_key(scope: &Scope) -> StoreKey {
    (scope.gestor.clone(), scope.id.clone(), scope.partition)
}

fn not_found(message: String) -> AttachmentError {
    AttachmentError::Remote {
        status: 404,
        body: message,
    }
}

fn conflict(message: String) -> AttachmentError {
    AttachmentError::Remote {
        status: 409,
        body: message,
    }
}

impl FolderService for MemoryFolderService {
    fn list<'a>(&'a self, scope: &'a Scope) -> FolderFuture<'a, Vec<FileRecord>> {
        Box::pin(async move {
            let mut state = self.lock();
            state.list_calls += 1;
            if let Some((status, body)) = state.fail_next.take().or_else(|| state.fail_list.take()) {
                return Err(AttachmentError::Remote { status, body });
            }
            match state.trees.get(&store_key(scope)) {
                Some(tree) if !tree.is_empty() => {
                    Ok(tree.values().map(|entry| entry.record.clone()).collect())
                }
                _ => Err(not_found(
                    "El explorador de archivos de esta entidad está vacío.".to_string(),
                )),
            }
        })
    }

    fn create_folder<'a>(&'a self, scope: &'a Scope, key: &'a str) -> FolderFuture<'a, ()> {
        Box::pin(async move {
            let action = Action::CreateFolder { key: key.to_string() };
            self.mutate(scope, action, |tree| {
                if tree.contains_key(key) {
                    return Err(conflict(format!("La carpeta {} ya existe.", key)));
                }
                tree.insert(
                    key.to_string(),
                    StoredEntry {
                        record: FileRecord::folder(key, Some(now_modified())),
                        content: Vec::new(),
                    },
                );
                Ok(())
            })
        })
    }

    fn rename_folder<'a>(
        &'a self,
        scope: &'a Scope,
        from: &'a str,
        to: &'a str,
    ) -> FolderFuture<'a, ()> {
        Box::pin(async move {
            let action = Action::RenameFolder {
                from: from.to_string(),
                to: to.to_string(),
            };
            self.mutate(scope, action, |tree| {
                let moved: Vec<String> = tree.keys().filter(|k| k.starts_with(from)).cloned().collect();
                if moved.is_empty() {
                    return Err(not_found(format!("No existe la carpeta {}.", from)));
                }
                if tree.keys().any(|k| k.starts_with(to)) {
                    return Err(conflict(format!("La carpeta {} ya existe.", to)));
                }
                for old_key in moved {
                    if let Some(mut entry) = tree.remove(&old_key) {
                        let new_key = format!("{}{}", to, &old_key[from.len()..]);
                        entry.record.key = new_key.clone();
                        tree.insert(new_key, entry);
                    }
                }
                Ok(())
            })
        })
    }

    fn delete_folder<'a>(&'a self, scope: &'a Scope, key: &'a str) -> FolderFuture<'a, ()> {
        Box::pin(async move {
            let action = Action::DeleteFolder { key: key.to_string() };
            self.mutate(scope, action, |tree| {
                let before = tree.len();
                tree.retain(|k, _| !k.starts_with(key));
                if tree.len() == before {
                    return Err(not_found(format!("No existe la carpeta {}.", key)));
                }
                Ok(())
            })
        })
    }

    fn delete_file<'a>(&'a self, scope: &'a Scope, key: &'a str) -> FolderFuture<'a, ()> {
        Box::pin(async move {
            let action = Action::DeleteFile { key: key.to_string() };
            self.mutate(scope, action, |tree| match tree.remove(key) {
                Some(_) => Ok(()),
                None => Err(not_found(format!("No existe el fichero {}.", key))),
            })
        })
    }

    fn upload_file<'a>(
        &'a self,
        scope: &'a Scope,
        parent: &'a str,
        upload: &'a FileUpload,
    ) -> FolderFuture<'a, ()> {
        Box::pin(async move {
            let key = KeyPath::parse(parent).child_file(&upload.name).to_key();
            let action = Action::UploadFile {
                key: key.clone(),
                size: upload.size(),
            };
            self.mutate(scope, action, |tree| {
                let record = FileRecord::file(
                    key.clone(),
                    extension_of(&upload.name),
                    Some(now_modified()),
                    Some(format_file_size(upload.size())),
                );
                tree.insert(
                    key,
                    StoredEntry {
                        record,
                        content: upload.bytes.clone(),
                    },
                );
                Ok(())
            })
        })
    }

    fn fetch_content<'a>(
        &'a self,
        scope: &'a Scope,
        key: &'a str,
        _mode: ContentMode,
    ) -> FolderFuture<'a, Vec<u8>> {
        Box::pin(async move {
            let state = self.lock();
            state
                .trees
                .get(&store_key(scope))
                .and_then(|tree| tree.get(key))
                .filter(|entry| !entry.record.is_folder())
                .map(|entry| entry.content.clone())
                .ok_or_else(|| not_found(format!("No existe el fichero {}.", key)))
        })
    }
}
