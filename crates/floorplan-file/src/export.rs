//! 导出服务
//!
//! 把项目导出为 PDF/SVG 文档或 3D 模型文件。输出路径由项目 ID 决定，
//! 同一项目重复导出会覆盖上一次的文件。

use crate::error::FileError;
use crate::layout::{layout_page, PageSetup};
use crate::model::ModelExporter;
use crate::pdf;
use crate::project::Project;
use crate::svg::write_svg;
use floorplan_core::projector::project;
use floorplan_renderer::PlanStyle;
use std::path::{Path, PathBuf};

/// 导出设置
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// 输出目录
    pub output_dir: PathBuf,
    /// 应用名称（标题和文件名前缀）
    pub app_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: std::env::temp_dir(),
            app_name: "FloorPlanPro".to_string(),
        }
    }
}

impl ExportSettings {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// 项目的输出文件路径：`<app_name>-<project id>.<ext>`
    pub fn output_path(&self, project: &Project, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}-{}.{}", self.app_name, project.id, extension))
    }
}

/// 文档格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Svg => "svg",
        }
    }
}

/// 导出服务
#[derive(Debug, Clone, Default)]
pub struct ExportService {
    pub settings: ExportSettings,
    pub page: PageSetup,
    pub style: PlanStyle,
}

impl ExportService {
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// 渲染文档字节（不落盘）
    pub fn render(&self, project_record: &Project, format: ExportFormat) -> Result<Vec<u8>, FileError> {
        let room = project_record.decode().map_err(|e| {
            tracing::error!(project = %project_record.id, "cannot export document: {}", e);
            FileError::MissingGeometry
        })?;
        let projection = project(&room);

        match format {
            ExportFormat::Pdf => pdf::render_document(
                project_record,
                &projection,
                &self.page,
                &self.style,
                &self.settings.app_name,
            ),
            ExportFormat::Svg => {
                let layout = layout_page(project_record, &projection, &self.page, &self.settings.app_name);
                Ok(write_svg(&layout, &self.style).into_bytes())
            }
        }
    }

    /// 导出文档到输出目录，返回文件路径
    pub fn export_document(&self, project_record: &Project, format: ExportFormat) -> Result<PathBuf, FileError> {
        let bytes = self.render(project_record, format)?;
        let path = self.settings.output_path(project_record, format.extension());
        write_atomically(&path, &bytes)?;
        tracing::info!(project = %project_record.id, path = %path.display(), "exported {:?}", format);
        Ok(path)
    }

    pub fn export_pdf(&self, project_record: &Project) -> Result<PathBuf, FileError> {
        self.export_document(project_record, ExportFormat::Pdf)
    }

    pub fn export_svg(&self, project_record: &Project) -> Result<PathBuf, FileError> {
        self.export_document(project_record, ExportFormat::Svg)
    }

    /// 导出 3D 模型，返回模型文件路径
    ///
    /// 先删除上一次导出的模型和元数据文件；导出失败时清理写了一半的文件。
    pub fn export_model(
        &self,
        project_record: &Project,
        exporter: &dyn ModelExporter,
    ) -> Result<PathBuf, FileError> {
        let room = project_record.decode().map_err(|e| {
            tracing::error!(project = %project_record.id, "cannot export model: {}", e);
            FileError::MissingGeometry
        })?;

        let model_path = self.settings.output_path(project_record, exporter.extension());
        let metadata_path = self.settings.output_path(project_record, "json");
        remove_if_exists(&model_path)?;
        remove_if_exists(&metadata_path)?;

        if let Err(e) = exporter.export(&room, &model_path, &metadata_path) {
            tracing::error!(project = %project_record.id, "model export failed: {}", e);
            let _ = remove_if_exists(&model_path);
            let _ = remove_if_exists(&metadata_path);
            return Err(match e {
                FileError::Io(_) | FileError::ModelExport(_) => e,
                other => FileError::ModelExport(other.to_string()),
            });
        }

        tracing::info!(project = %project_record.id, path = %model_path.display(), "exported model");
        Ok(model_path)
    }
}

/// 先写 `.partial` 临时文件再改名，失败时不留下残缺文件
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), FileError> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let result = std::fs::write(&partial, bytes).and_then(|_| std::fs::rename(&partial, path));
    if let Err(e) = result {
        let _ = std::fs::remove_file(&partial);
        return Err(e.into());
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<(), FileError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
