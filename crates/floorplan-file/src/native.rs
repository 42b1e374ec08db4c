//! 项目列表的 SQLite 持久化
//!
//! 单文件存储，`position` 列保存列表顺序（0 为最新）。

use crate::error::FileError;
use crate::project::{Project, PropertyType};
use crate::store::ProjectStore;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use uuid::Uuid;

/// 当前文件格式版本
const FORMAT_VERSION: u32 = 1;

/// 创建数据库架构
fn create_schema(conn: &Connection) -> Result<(), FileError> {
    conn.execute_batch(
        r#"
        -- 元数据表
        CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- 项目表
        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            property_type TEXT NOT NULL,
            address TEXT NOT NULL,
            payload BLOB NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_projects_position ON projects(position);
        "#,
    )?;

    Ok(())
}

/// 保存项目列表到文件
pub fn save(store: &ProjectStore, path: &Path) -> Result<(), FileError> {
    let conn = Connection::open(path)?;

    create_schema(&conn)?;

    conn.execute("BEGIN TRANSACTION", [])?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('format_version', ?)",
        params![FORMAT_VERSION.to_string()],
    )?;

    // 清空并按顺序写入
    conn.execute("DELETE FROM projects", [])?;
    for (position, project) in store.projects().iter().enumerate() {
        save_project(&conn, position, project)?;
    }

    conn.execute("COMMIT", [])?;

    tracing::info!(projects = store.len(), "saved project store to {}", path.display());
    Ok(())
}

fn save_project(conn: &Connection, position: usize, project: &Project) -> Result<(), FileError> {
    conn.execute(
        "INSERT INTO projects (id, position, created_at, property_type, address, payload)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            project.id.to_string(),
            position as i64,
            project.created_at.to_rfc3339(),
            project.property_type.as_str(),
            &project.address,
            project.payload(),
        ],
    )?;
    Ok(())
}

/// 从文件加载项目列表
pub fn load(path: &Path) -> Result<ProjectStore, FileError> {
    let conn = Connection::open(path)?;

    // 检查格式版本
    let version: String = conn.query_row(
        "SELECT value FROM metadata WHERE key = 'format_version'",
        [],
        |row| row.get(0),
    )?;

    let version: u32 = version
        .parse()
        .map_err(|_| FileError::InvalidFormat("Invalid version".to_string()))?;

    if version > FORMAT_VERSION {
        return Err(FileError::UnsupportedVersion(format!(
            "File version {} is newer than supported version {}",
            version, FORMAT_VERSION
        )));
    }

    let mut stmt = conn.prepare(
        "SELECT id, created_at, property_type, address, payload FROM projects ORDER BY position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Vec<u8>>(4)?,
        ))
    })?;

    let mut store = ProjectStore::new();
    for row in rows {
        let (id, created_at, property_type, address, payload) = row?;
        match parse_project(&id, &created_at, &property_type, address, payload) {
            Ok(project) => store.push_loaded(project),
            Err(e) => tracing::warn!("skipping unreadable project row {}: {}", id, e),
        }
    }

    tracing::info!(projects = store.len(), "loaded project store from {}", path.display());
    Ok(store)
}

fn parse_project(
    id: &str,
    created_at: &str,
    property_type: &str,
    address: String,
    payload: Vec<u8>,
) -> Result<Project, FileError> {
    let id = Uuid::parse_str(id).map_err(|e| FileError::InvalidFormat(e.to_string()))?;
    let created_at = DateTime::parse_from_rfc3339(created_at)
        .map_err(|e| FileError::InvalidFormat(e.to_string()))?
        .with_timezone(&Utc);
    let property_type: PropertyType = property_type.parse()?;

    Ok(Project::from_parts(id, created_at, property_type, address, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::math::Point3;
    use floorplan_core::scan::{RoomScan, Wall};

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("projects.fpp");

        let room = RoomScan::new(vec![Wall::from_pose(Point3::new(1.0, 1.2, -1.0), 0.4, 3.2, 2.4)]);
        let mut store = ProjectStore::new();
        store.add_project(PropertyType::House, "12 Harbour Rd", &room).unwrap();
        store.add_project(PropertyType::Commercial, "Level 3, 80 Pitt St", &RoomScan::default()).unwrap();

        save(&store, &file_path).expect("Failed to save");
        let loaded = load(&file_path).expect("Failed to load");

        assert_eq!(loaded.len(), 2);
        for (a, b) in loaded.projects().iter().zip(store.projects()) {
            assert_eq!(a, b);
        }
        assert_eq!(loaded.get(1).unwrap().decode().unwrap().wall_count(), 1);
    }

    #[test]
    fn test_resave_replaces_rows() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("projects.fpp");

        let mut store = ProjectStore::new();
        store.add_project(PropertyType::House, "a", &RoomScan::default()).unwrap();
        store.add_project(PropertyType::House, "b", &RoomScan::default()).unwrap();
        save(&store, &file_path).unwrap();

        store.remove_projects([0]);
        save(&store, &file_path).unwrap();

        let loaded = load(&file_path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(0).unwrap().address, "a");
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("projects.fpp");
        save(&ProjectStore::new(), &file_path).unwrap();

        let conn = Connection::open(&file_path).unwrap();
        conn.execute(
            "UPDATE metadata SET value = '9' WHERE key = 'format_version'",
            [],
        )
        .unwrap();
        drop(conn);

        assert!(matches!(load(&file_path), Err(FileError::UnsupportedVersion(_))));
    }
}
