use attach_common::AttachmentError;
use attach_explorer::{Explorer, FolderService};
use attach_tree::render_text;

/// 打印树：文本表格或 JSON
pub fn show_tree<S: FolderService>(
    explorer: &mut Explorer<S>,
    search: Option<&str>,
    expand_all: bool,
    json: bool,
) -> Result<String, AttachmentError> {
    if let Some(term) = search {
        explorer.set_search(term);
    }
    if expand_all {
        explorer.expand_all();
    }

    if json {
        let mut out = serde_json::to_string_pretty(&explorer.tree())
            .map_err(|e| AttachmentError::Decode(e.to_string()))?;
        out.push('\n');
        return Ok(out);
    }

    let rows = explorer.visible_rows();
    if rows.is_empty() {
        return Ok("(sin archivos)\n".to_string());
    }
    Ok(render_text(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::explorer;

    #[test]
    fn test_show_tree_collapsed() {
        let mut explorer = explorer();
        let out = show_tree(&mut explorer, None, false, false).unwrap();
        assert!(out.contains("▸ A/"));
        assert!(!out.contains("b.txt"));
        assert!(out.contains("C.pdf"));
    }

    #[test]
    fn test_show_tree_search_expands_matches() {
        let mut explorer = explorer();
        let out = show_tree(&mut explorer, Some("B.TXT"), false, false).unwrap();
        assert!(out.contains("▾ A/"));
        assert!(out.contains("b.txt"));
        assert!(!out.contains("C.pdf"));
    }

    #[test]
    fn test_show_tree_json() {
        let mut explorer = explorer();
        let out = show_tree(&mut explorer, None, false, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["key"], "A/");
        assert_eq!(value[0]["type"], "folder");
        assert_eq!(value[0]["children"][0]["name"], "b.txt");
        assert_eq!(value[1]["key"], "C.pdf");
    }

    #[test]
    fn test_show_tree_no_matches() {
        let mut explorer = explorer();
        let out = show_tree(&mut explorer, Some("zzz"), true, false).unwrap();
        assert_eq!(out, "(sin archivos)\n");
    }
}
