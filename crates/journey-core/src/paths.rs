use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const JOURNEY_DIR: &str = ".journey";
pub const DATA_DIR: &str = ".journey/data";
pub const CONFIG_FILE: &str = ".journey/config.yaml";
pub const DEFAULT_REDB_FILE: &str = "journey.redb";

/// Key-value keys, one file per collection under `DATA_DIR`.
pub const PROJECTS_KEY: &str = "projects";
pub const SKILLS_KEY: &str = "skills";
pub const IDEAS_KEY: &str = "ideas";
pub const NOTES_KEY: &str = "notes";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn journey_dir(root: &Path) -> PathBuf {
    root.join(JOURNEY_DIR)
}

pub fn data_dir(root: &Path) -> PathBuf {
    root.join(DATA_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn kv_entry(root: &Path, key: &str) -> PathBuf {
    data_dir(root).join(format!("{key}.json"))
}

/// Resolve a redb file name relative to `.journey/` unless it is absolute.
pub fn redb_path(root: &Path, file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        journey_dir(root).join(p)
    }
}
