pub mod file_record;
pub mod file_tree;
pub mod key_path;
pub mod scope;
pub mod action;
pub mod wire;
pub mod format;

pub use file_record::*;
pub use file_tree::*;
pub use key_path::*;
pub use scope::*;
pub use action::*;
pub use wire::*;
pub use format::*;
