use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::AnalysisRecord;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ═══════════════════════════════════════════
// Analysis Repository
// ═══════════════════════════════════════════

pub fn insert_analysis(conn: &Connection, record: &AnalysisRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medical_analyses (id, description, boolean_query, ai_analysis, image_analysis, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.id.to_string(),
            record.description,
            record.boolean_query,
            record.ai_analysis,
            serde_json::to_string(&record.image_analysis)?,
            record.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_analysis(conn: &Connection, id: &Uuid) -> Result<Option<AnalysisRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, description, boolean_query, ai_analysis, image_analysis, created_at
         FROM medical_analyses WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(params![id.to_string()], row_to_analysis)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn count_analyses(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM medical_analyses", [], |row| row.get(0))?;
    Ok(count)
}

fn row_to_analysis(row: &rusqlite::Row) -> Result<AnalysisRecord, rusqlite::Error> {
    let id_str: String = row.get(0)?;
    let panel_str: String = row.get(4)?;
    let created_str: String = row.get(5)?;

    Ok(AnalysisRecord {
        id: Uuid::parse_str(&id_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        description: row.get(1)?,
        boolean_query: row.get(2)?,
        ai_analysis: row.get(3)?,
        image_analysis: serde_json::from_str(&panel_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?,
        created_at: NaiveDateTime::parse_from_str(&created_str, TIMESTAMP_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?,
    })
}
