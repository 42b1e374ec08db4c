//! FloorPlanPro 项目存储与文档输出
//!
//! 支持：
//! - 项目记录（房间扫描载荷 + 元数据）
//! - `.fpp` 项目库文件（基于SQLite）
//! - PDF / SVG 平面图文档
//! - 3D 模型导出

pub mod error;
pub mod export;
pub mod layout;
pub mod model;
pub mod native;
pub mod pdf;
pub mod project;
pub mod store;
pub mod svg;
pub mod typography;

pub use error::FileError;
pub use export::{ExportFormat, ExportService, ExportSettings};
pub use layout::PageSetup;
pub use model::{ModelExporter, ObjWallExporter};
pub use project::{Project, PropertyType};
pub use store::ProjectStore;
