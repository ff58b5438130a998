pub mod builder;
pub mod doc;

pub use builder::{build, FileModel};
