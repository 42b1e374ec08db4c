//! 项目列表
//!
//! 按创建时间倒序（最新在前）保存的扫描项目。

use crate::error::FileError;
use crate::project::{Project, PropertyType};
use floorplan_core::scan::RoomScan;
use std::collections::BTreeSet;
use std::path::Path;
use uuid::Uuid;

/// 项目列表
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 SQLite 文件加载
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
        crate::native::load(path.as_ref())
    }

    /// 保存到 SQLite 文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FileError> {
        crate::native::save(self, path.as_ref())
    }

    /// 编码扫描结果并插入到最前；编码失败时列表保持不变
    pub fn add_project(
        &mut self,
        property_type: PropertyType,
        address: impl Into<String>,
        room: &RoomScan,
    ) -> Result<&Project, FileError> {
        let project = Project::create(property_type, address, room).map_err(|e| {
            tracing::error!("Failed to encode captured room for project: {}", e);
            e
        })?;

        tracing::info!(project = %project.id, walls = room.wall_count(), "added project");
        self.insert(project);
        Ok(&self.projects[0])
    }

    /// 插入到最前
    pub fn insert(&mut self, project: Project) {
        self.projects.insert(0, project);
    }

    /// 按索引集合删除，越界索引被忽略；返回实际删除的数量
    pub fn remove_projects(&mut self, offsets: impl IntoIterator<Item = usize>) -> usize {
        let offsets: BTreeSet<usize> = offsets.into_iter().collect();
        let mut removed = 0;

        for &index in offsets.iter().rev() {
            if index < self.projects.len() {
                self.projects.remove(index);
                removed += 1;
            }
        }

        removed
    }

    /// 所有项目（最新在前）
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }

    pub fn find(&self, id: &Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// 按存储顺序追加（用于文件加载）
    pub(crate) fn push_loaded(&mut self, project: Project) {
        self.projects.push(project);
    }
}
