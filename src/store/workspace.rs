use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LifeQuestError, Result};
use crate::store::db::Store;

#[derive(Debug, Serialize, Deserialize)]
struct Config {
    version: u32,
    #[serde(default)]
    owner_id: Option<Uuid>,
}

/// A `.lifequest/` directory: config with the owner context plus the SQLite
/// record store. Stands in for the managed backend; everything in it is
/// scoped to the owner id minted at `init`.
pub struct Workspace {
    root: PathBuf,
    owner_id: Uuid,
}

impl Workspace {
    /// Open an existing workspace rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        let root = dir.join(".lifequest");
        let config_path = root.join("config.json");
        if !config_path.exists() {
            return Err(LifeQuestError::NotInitialized);
        }
        let config: Config = serde_json::from_str(&fs::read_to_string(config_path)?)?;
        let owner_id = config.owner_id.ok_or(LifeQuestError::NotSignedIn)?;
        Ok(Self { root, owner_id })
    }

    /// Initialize a new workspace under `dir`, minting a fresh owner id.
    pub fn init(dir: &Path) -> Result<Self> {
        let root = dir.join(".lifequest");
        if root.join("config.json").exists() {
            return Err(LifeQuestError::AlreadyInitialized);
        }
        fs::create_dir_all(&root)?;

        let owner_id = Uuid::new_v4();
        let config = Config {
            version: 1,
            owner_id: Some(owner_id),
        };
        fs::write(
            root.join("config.json"),
            serde_json::to_string_pretty(&config)?,
        )?;

        let ws = Self { root, owner_id };
        // Create the database eagerly so a fresh workspace is fully usable.
        ws.store()?;
        Ok(ws)
    }

    /// Walk up from `start` looking for a `.lifequest/` directory.
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut dir = start;
        loop {
            if dir.join(".lifequest").join("config.json").exists() {
                return Self::open(dir);
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => return Err(LifeQuestError::NotInitialized),
            }
        }
    }

    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd)
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join("lifequest.db")
    }

    pub fn store(&self) -> Result<Store> {
        Store::open(&self.db_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_creates_config_and_db() {
        let dir = tempdir().unwrap();
        let ws = Workspace::init(dir.path()).unwrap();
        assert!(ws.root().join("config.json").exists());
        assert!(ws.db_path().exists());
    }

    #[test]
    fn init_twice_fails() {
        let dir = tempdir().unwrap();
        Workspace::init(dir.path()).unwrap();
        assert!(matches!(
            Workspace::init(dir.path()),
            Err(LifeQuestError::AlreadyInitialized)
        ));
    }

    #[test]
    fn open_keeps_the_minted_owner() {
        let dir = tempdir().unwrap();
        let ws = Workspace::init(dir.path()).unwrap();
        let reopened = Workspace::open(dir.path()).unwrap();
        assert_eq!(ws.owner_id(), reopened.owner_id());
    }

    #[test]
    fn open_uninitialized_fails() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Workspace::open(dir.path()),
            Err(LifeQuestError::NotInitialized)
        ));
    }

    #[test]
    fn discover_walks_up_to_the_root() {
        let dir = tempdir().unwrap();
        Workspace::init(dir.path()).unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        let ws = Workspace::discover_from(&nested).unwrap();
        assert_eq!(ws.root(), dir.path().join(".lifequest"));
    }

    #[test]
    fn config_without_owner_is_not_signed_in() {
        let dir = tempdir().unwrap();
        let root = dir.path().join(".lifequest");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("config.json"), r#"{"version": 1}"#).unwrap();
        assert!(matches!(
            Workspace::open(dir.path()),
            Err(LifeQuestError::NotSignedIn)
        ));
    }
}
