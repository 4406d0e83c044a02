pub mod tree;
pub mod folder;
pub mod file;
