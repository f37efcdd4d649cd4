//! File system utilities for the pipeline data directory
//!
//! Provides path resolution and JSON file operations.

mod json;
mod paths;

pub use json::{
    list_json_files, read_config, read_investor, read_json, read_prospect, write_investor,
    write_json, write_prospect,
};
pub use paths::{
    find_data_root, get_config_path, get_data_dir, get_investor_path, get_investors_dir,
    get_outbox_dir, get_prospect_path, get_prospects_dir, resolve_cwd,
};
