//! Row decoding shared by the query modules.

use jiff::{civil::Date, Timestamp};
use rusqlite::{types::Type, Row};

use crate::models::{Level, Node, NodeStatus};

/// Column list matching [`node_from_row`].
pub(crate) const NODE_COLUMNS: &str = "id, project_id, parent_id, code, name, description, level, status, progress, node_order, weight, start_date, end_date, created_at, updated_at";

fn conversion_error(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
}

pub(crate) fn timestamp_at(row: &Row, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

fn date_at(row: &Row, index: usize) -> rusqlite::Result<Option<Date>> {
    row.get::<_, Option<String>>(index)?
        .map(|s| {
            s.parse::<Date>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

/// Builds a [`Node`] from a row selected with [`NODE_COLUMNS`].
pub(crate) fn node_from_row(row: &Row) -> rusqlite::Result<Node> {
    let depth: i64 = row.get(6)?;
    let level = u8::try_from(depth)
        .ok()
        .and_then(Level::from_depth)
        .ok_or_else(|| conversion_error(6, format!("Invalid level: {depth}")))?;

    let status_str: String = row.get(7)?;
    let status = status_str
        .parse::<NodeStatus>()
        .map_err(|_| conversion_error(7, format!("Invalid status: {status_str}")))?;

    Ok(Node {
        id: row.get::<_, i64>(0)? as u64,
        project_id: row.get::<_, i64>(1)? as u64,
        parent_id: row.get::<_, Option<i64>>(2)?.map(|id| id as u64),
        code: row.get(3)?,
        name: row.get(4)?,
        description: row.get(5)?,
        level,
        status,
        progress: row.get::<_, i64>(8)?.clamp(0, 100) as u8,
        order: row.get::<_, i64>(9)? as u32,
        weight: row.get::<_, i64>(10)? as u32,
        start_date: date_at(row, 11)?,
        end_date: date_at(row, 12)?,
        created_at: timestamp_at(row, 13)?,
        updated_at: timestamp_at(row, 14)?,
    })
}
