pub mod differ;

pub use differ::{added_file_script, diff, removed_file_script};
