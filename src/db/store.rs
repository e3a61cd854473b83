//! Persistence collaborator: accepts finished analyses and stamps them.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use uuid::Uuid;

use super::{count_analyses, get_analysis, insert_analysis, open_database, open_memory_database};
use super::DatabaseError;
use crate::models::{AnalysisRecord, NewAnalysis};

/// Write-only sink for analysis records.
pub trait AnalysisStore: Send + Sync {
    /// Persist an analysis, assigning its id and creation timestamp.
    fn save(&self, analysis: NewAnalysis) -> Result<AnalysisRecord, DatabaseError>;
}

/// SQLite-backed store. One connection, serialized behind a mutex.
pub struct SqliteAnalysisStore {
    conn: Mutex<Connection>,
}

impl SqliteAnalysisStore {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = open_database(path)?;
        tracing::info!(path = %path.display(), "Analysis database ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: Mutex::new(open_memory_database()?),
        })
    }

    pub fn get(&self, id: &Uuid) -> Result<Option<AnalysisRecord>, DatabaseError> {
        let conn = self.lock()?;
        get_analysis(&conn, id)
    }

    pub fn count(&self) -> Result<i64, DatabaseError> {
        let conn = self.lock()?;
        count_analyses(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

impl AnalysisStore for SqliteAnalysisStore {
    fn save(&self, analysis: NewAnalysis) -> Result<AnalysisRecord, DatabaseError> {
        let record = AnalysisRecord {
            id: Uuid::new_v4(),
            description: analysis.description,
            boolean_query: analysis.boolean_query,
            ai_analysis: analysis.ai_analysis,
            image_analysis: serde_json::to_value(&analysis.image_analysis)?,
            created_at: chrono::Utc::now().naive_utc(),
        };
        let conn = self.lock()?;
        insert_analysis(&conn, &record)?;
        drop(conn);
        tracing::debug!(id = %record.id, "Analysis persisted");
        Ok(record)
    }
}
