use std::collections::HashMap;

use attach_domain::{entry_order, FileKind, FileRecord, KeyPath, TreeNode};

/// 构建过程中的节点，子节点以下标引用
struct Slot {
    node: TreeNode,
    children: Vec<usize>,
}

/// 由扁平记录构建有序森林
///
/// 同一 key 只会生成一个节点：多个记录共享的中间文件夹通过查找表复用。
/// 没有显式记录的祖先文件夹按路径段隐式生成。每层排序为文件夹在前、同类按 key 升序，
/// 因此输出与输入顺序无关。
pub fn build_tree(records: &[FileRecord]) -> Vec<TreeNode> {
    let mut arena: Vec<Slot> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for record in records {
        let path = KeyPath::from_record(record);
        if path.is_root() {
            log::debug!("跳过空 key 记录: {:?}", record.key);
            continue;
        }

        let mut parent: Option<usize> = None;
        for depth in 1..=path.len() {
            let prefix = path.prefix(depth);
            let key = prefix.to_key();
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    let name = prefix.name().unwrap_or_default();
                    arena.push(Slot {
                        node: TreeNode::new(key.clone(), name, prefix.kind()),
                        children: Vec::new(),
                    });
                    let slot = arena.len() - 1;
                    index.insert(key, slot);
                    match parent {
                        Some(p) => arena[p].children.push(slot),
                        None => roots.push(slot),
                    }
                    slot
                }
            };

            if depth == path.len() && record.kind == FileKind::File {
                let node = &mut arena[slot].node;
                node.extension = Some(record.extension.clone());
                node.modified = record.modified.clone();
                node.size = record.size.clone();
            }
            parent = Some(slot);
        }
    }

    log::debug!("build_tree: {} records -> {} nodes", records.len(), arena.len());
    assemble(&mut arena, &roots)
}

fn assemble(arena: &mut [Slot], slots: &[usize]) -> Vec<TreeNode> {
    let mut nodes: Vec<TreeNode> = slots
        .iter()
        .map(|&slot| {
            let children = std::mem::take(&mut arena[slot].children);
            let mut node = std::mem::replace(
                &mut arena[slot].node,
                TreeNode::new(String::new(), String::new(), FileKind::File),
            );
            node.children = assemble(arena, &children);
            node
        })
        .collect();
    nodes.sort_by(|a, b| entry_order(a.kind, &a.key, b.kind, &b.key));
    nodes
}
