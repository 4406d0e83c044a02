//! 展示层适配：把森林展开成按行渲染的表格

use std::fmt::Write;

use attach_domain::{FileKind, TreeNode};

use crate::ExpansionState;

/// 最多渲染的层级数（0..6），更深的节点仍在树中但不显示
pub const MAX_RENDER_DEPTH: usize = 6;

const EMPTY_CELL: &str = "--";

/// 根据扩展名选择图标类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Word,
    Spreadsheet,
    Pdf,
    Image,
    Generic,
}

impl FileCategory {
    pub fn from_extension(extension: &str) -> Self {
        let ext = extension.to_lowercase();
        if ext.contains("doc") {
            Self::Word
        } else if ext.contains("csv") || ext.contains("xls") {
            Self::Spreadsheet
        } else if ext.contains("pdf") {
            Self::Pdf
        } else if ["jpg", "jpeg", "png", "ico"].iter().any(|e| ext.contains(e)) {
            Self::Image
        } else {
            Self::Generic
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Word => "doc",
            Self::Spreadsheet => "xls",
            Self::Pdf => "pdf",
            Self::Image => "img",
            Self::Generic => "   ",
        }
    }
}

/// 行菜单中的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAction {
    CreateFolder,
    UploadFile,
    Rename,
    DeleteFolder,
    Open,
    Download,
    DeleteFile,
}

impl NodeAction {
    /// 是否会修改文件树
    pub fn is_mutation(self) -> bool {
        !matches!(self, Self::Open | Self::Download)
    }
}

/// 节点可用的操作；只读模式下仅保留打开与下载。返回空表示“无可用操作”
pub fn node_actions(kind: FileKind, editable: bool) -> Vec<NodeAction> {
    let all: &[NodeAction] = match kind {
        FileKind::Folder => &[
            NodeAction::CreateFolder,
            NodeAction::UploadFile,
            NodeAction::Rename,
            NodeAction::DeleteFolder,
        ],
        FileKind::File => &[NodeAction::Open, NodeAction::Download, NodeAction::DeleteFile],
    };
    all.iter()
        .copied()
        .filter(|action| editable || !action.is_mutation())
        .collect()
}

/// 一行可见节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    pub key: String,
    pub name: String,
    pub kind: FileKind,
    pub depth: usize,
    pub expanded: bool,
    pub category: Option<FileCategory>,
    pub size: Option<String>,
    pub modified: Option<String>,
}

/// 按展开状态收集可见行；`max_depth` 以下的层级不再下钻
pub fn visible_rows(forest: &[TreeNode], state: &ExpansionState, max_depth: usize) -> Vec<RenderRow> {
    let mut rows = Vec::new();
    collect_rows(forest, state, 0, max_depth, &mut rows);
    rows
}

fn collect_rows(
    nodes: &[TreeNode],
    state: &ExpansionState,
    depth: usize,
    max_depth: usize,
    rows: &mut Vec<RenderRow>,
) {
    if depth >= max_depth {
        return;
    }
    for node in nodes {
        let expanded = node.is_folder() && state.is_expanded(&node.key);
        rows.push(RenderRow {
            key: node.key.clone(),
            name: node.name.clone(),
            kind: node.kind,
            depth,
            expanded,
            category: node.extension.as_deref().map(FileCategory::from_extension),
            size: node.size.clone(),
            modified: node.modified.clone(),
        });
        if expanded && !node.children.is_empty() {
            collect_rows(&node.children, state, depth + 1, max_depth, rows);
        }
    }
}

/// 纯文本表格：名称（按层级缩进）/ 大小 / 最后修改
pub fn render_text(rows: &[RenderRow]) -> String {
    let labels: Vec<String> = rows.iter().map(row_label).collect();
    let name_width = labels
        .iter()
        .map(|label| label.chars().count())
        .chain(std::iter::once("Nombre".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{:<name_width$}  {:>10}  {}", "Nombre", "Tamaño", "Última Modificación");
    for (row, label) in rows.iter().zip(&labels) {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>10}  {}",
            label,
            row.size.as_deref().unwrap_or(EMPTY_CELL),
            row.modified.as_deref().unwrap_or(EMPTY_CELL),
        );
    }
    out
}

fn row_label(row: &RenderRow) -> String {
    let indent = "  ".repeat(row.depth);
    match row.kind {
        FileKind::Folder => {
            let marker = if row.expanded { "▾" } else { "▸" };
            format!("{}{} {}/", indent, marker, row.name)
        }
        FileKind::File => {
            let tag = row.category.unwrap_or(FileCategory::Generic).tag();
            format!("{}[{}] {}", indent, tag, row.name)
        }
    }
}
