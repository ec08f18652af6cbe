use journey_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the journey root directory.
///
/// Priority:
/// 1. `--root` flag / `JOURNEY_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `start` looking for `.journey/`
/// 3. Fall back to `start`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_journey_root(&cwd).unwrap_or(cwd)
}

fn find_journey_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(paths::JOURNEY_DIR).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_journey_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".journey")).unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_journey_root(&subdir).unwrap(), dir.path());
    }

    #[test]
    fn no_journey_dir_finds_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(find_journey_root(dir.path()).is_none());
    }
}
