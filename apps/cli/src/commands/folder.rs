use attach_common::AttachmentError;
use attach_explorer::{Explorer, FolderService};
use attach_tree::render_text;

pub async fn mkdir<S: FolderService>(
    explorer: &mut Explorer<S>,
    parent: &str,
    name: &str,
) -> Result<String, AttachmentError> {
    let key = explorer.create_folder(parent, name).await?;
    Ok(format!("Carpeta creada: {}\n{}", key, render_text(&explorer.visible_rows())))
}

pub async fn rename<S: FolderService>(
    explorer: &mut Explorer<S>,
    key: &str,
    new_name: &str,
) -> Result<String, AttachmentError> {
    let new_key = explorer.rename_folder(key, new_name).await?;
    Ok(format!("{}{} -> {}\n", stale_note(explorer), key, new_key))
}

pub async fn remove<S: FolderService>(explorer: &mut Explorer<S>, key: &str) -> Result<String, AttachmentError> {
    explorer.delete(key).await?;
    Ok(format!("{}Eliminado: {}\n", stale_note(explorer), key))
}

fn stale_note<S: FolderService>(explorer: &Explorer<S>) -> &'static str {
    if explorer.is_stale() {
        "(listado no actualizado) "
    } else {
        ""
    }
}
