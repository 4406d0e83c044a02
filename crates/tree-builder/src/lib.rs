pub mod builder;
pub mod filters;
pub mod expansion;
pub mod render;

pub use builder::build_tree;
pub use filters::*;
pub use expansion::*;
pub use render::*;
pub use attach_domain::TreeNode;
