pub mod environment;
pub mod terminal;

pub use environment::get_workspace_dir;
pub use terminal::{format_table, strip_ansi_codes, truncate};
