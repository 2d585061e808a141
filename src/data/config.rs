use std::env;
use std::path::{Path, PathBuf};

use super::prototype::PrototypeKind;

/// Environment variable that overrides the content root.
pub const DATA_DIR_ENV: &str = "GAME_DATA_DIR";

const DEFAULT_ROOT: &str = "GameData";
const DEFAULT_EXTENSION: &str = "toml";

/// Where content files live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
    pub location_dir: String,
    pub item_dir: String,
    pub npc_dir: String,
    pub extension: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataPaths {
            root: root.into(),
            location_dir: PrototypeKind::Location.dir_name().to_string(),
            item_dir: PrototypeKind::Item.dir_name().to_string(),
            npc_dir: PrototypeKind::Npc.dir_name().to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Default layout, rooted at `$GAME_DATA_DIR` when it is set.
    pub fn from_env() -> Self {
        match env::var(DATA_DIR_ENV) {
            Ok(root) if !root.trim().is_empty() => Self::new(root.trim()),
            _ => Self::default(),
        }
    }

    pub fn kind_dir(&self, kind: PrototypeKind) -> PathBuf {
        let sub = match kind {
            PrototypeKind::Location => &self.location_dir,
            PrototypeKind::Item => &self.item_dir,
            PrototypeKind::Npc => &self.npc_dir,
        };
        self.root.join(sub)
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_dirs_hang_off_the_root() {
        let paths = DataPaths::new("content");
        assert_eq!(
            paths.kind_dir(PrototypeKind::Location),
            Path::new("content").join("location")
        );
        assert_eq!(paths.kind_dir(PrototypeKind::Npc), Path::new("content").join("npc"));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let paths = DataPaths::default();
        assert!(paths.matches_extension(Path::new("a/b.TOML")));
        assert!(!paths.matches_extension(Path::new("a/b.json")));
        assert!(!paths.matches_extension(Path::new("a/toml")));
    }
}
