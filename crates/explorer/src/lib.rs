pub mod service;
pub mod memory;
pub mod explorer;

pub use service::*;
pub use memory::*;
pub use explorer::*;
