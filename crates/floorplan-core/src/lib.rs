//! FloorPlanPro 核心
//!
//! 提供房间扫描数据模型、俯视平面投影和扫描结果通道。
//!
//! # 数据流
//!
//! ```text
//! 扫描源 → RoomScan → project() → ProjectionResult → 渲染 / 导出
//! ```
//!
//! # 示例
//!
//! ```rust
//! use floorplan_core::prelude::*;
//!
//! let room = RoomScan::new(vec![Wall::new(3.0, 2.4, Matrix4::identity())]);
//! let plan = project(&room);
//!
//! assert_eq!(plan.walls.len(), 1);
//! assert_eq!(format_meters(plan.walls[0].length_meters), "3.00 m");
//! ```

pub mod capture;
pub mod math;
pub mod projector;
pub mod scan;
pub mod units;

pub use capture::CaptureError;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::capture::{
        begin_capture, capture_channel, CaptureError, CaptureOutcome, CaptureReceiver,
        CaptureSender, CaptureSource, RecordedScan,
    };
    pub use crate::math::{BoundingBox2, Matrix4, Point2, Point3, Vector2, Vector3};
    pub use crate::projector::{project, ProjectedWall, ProjectionResult};
    pub use crate::scan::{RoomScan, Wall};
    pub use crate::units::format_meters;
}
