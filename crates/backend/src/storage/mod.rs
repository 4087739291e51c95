use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use skirmish_shared::models::LobbySetup;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{db, LobbyError};

const SETUPS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("setups");

/// Saved lobby setups, keyed by UUID, stored as JSON blobs.
pub struct Storage {
    db: Database,
    path: PathBuf,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Arc<Self>, LobbyError> {
        let database = Database::create(path).map_err(db)?;

        // Ensure table exists
        let write_txn = database.begin_write().map_err(db)?;
        {
            write_txn.open_table(SETUPS_TABLE).map_err(db)?;
        }
        write_txn.commit().map_err(db)?;

        tracing::info!(path = %path.display(), "Opened setup storage");
        Ok(Arc::new(Storage {
            db: database,
            path: path.to_path_buf(),
        }))
    }

    pub fn save_setup(&self, setup: &LobbySetup) -> Result<(), LobbyError> {
        let json = serde_json::to_vec(setup)?;
        let id_str = setup.id.to_string();

        let write_txn = self.db.begin_write().map_err(db)?;
        {
            let mut table = write_txn.open_table(SETUPS_TABLE).map_err(db)?;
            table
                .insert(id_str.as_str(), json.as_slice())
                .map_err(db)?;
        }
        write_txn.commit().map_err(db)?;
        Ok(())
    }

    pub fn get_setup(&self, id: &str) -> Result<Option<LobbySetup>, LobbyError> {
        let read_txn = self.db.begin_read().map_err(db)?;
        let table = read_txn.open_table(SETUPS_TABLE).map_err(db)?;

        match table.get(id).map_err(db)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All saved setups, oldest first.
    pub fn list_setups(&self) -> Result<Vec<LobbySetup>, LobbyError> {
        let read_txn = self.db.begin_read().map_err(db)?;
        let table = read_txn.open_table(SETUPS_TABLE).map_err(db)?;

        let mut setups = Vec::new();
        for entry in table.iter().map_err(db)? {
            let (_, value) = entry.map_err(db)?;
            let setup: LobbySetup = serde_json::from_slice(value.value())?;
            setups.push(setup);
        }
        setups.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(setups)
    }

    pub fn count_setups(&self) -> Result<u64, LobbyError> {
        let read_txn = self.db.begin_read().map_err(db)?;
        let table = read_txn.open_table(SETUPS_TABLE).map_err(db)?;
        table.len().map_err(db)
    }

    pub fn db_size_bytes(&self) -> Result<u64, LobbyError> {
        std::fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|source| LobbyError::Io {
                path: self.path.clone(),
                source,
            })
    }

    pub fn delete_setup(&self, id: &str) -> Result<bool, LobbyError> {
        let write_txn = self.db.begin_write().map_err(db)?;
        let removed = {
            let mut table = write_txn.open_table(SETUPS_TABLE).map_err(db)?;
            let result = table.remove(id).map_err(db)?;
            result.is_some()
        };
        write_txn.commit().map_err(db)?;
        Ok(removed)
    }
}
