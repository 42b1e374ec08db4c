//! 3D 模型导出
//!
//! 模型导出器是外部能力：给定房间和输出路径写出模型文件，本库不解析其内容。
//! 内置的 [`ObjWallExporter`] 把每面墙写成一个竖直四边形（Wavefront OBJ）。

use crate::error::FileError;
use floorplan_core::math::Point3;
use floorplan_core::scan::RoomScan;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// 3D 模型导出器
pub trait ModelExporter {
    /// 模型文件扩展名
    fn extension(&self) -> &str;

    /// 写出模型文件和元数据文件
    fn export(&self, room: &RoomScan, model_path: &Path, metadata_path: &Path) -> Result<(), FileError>;
}

/// 墙面 OBJ 导出器
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjWallExporter;

#[derive(Serialize)]
struct ObjMetadata<'a> {
    format: &'a str,
    units: &'a str,
    walls: Vec<WallMetadata>,
}

#[derive(Serialize)]
struct WallMetadata {
    identifier: String,
    width: f64,
    height: f64,
}

impl ObjWallExporter {
    /// 生成 OBJ 文本
    pub fn to_obj(room: &RoomScan) -> String {
        let mut obj = String::from("# FloorPlanPro wall model\n");

        for (index, wall) in room.walls.iter().enumerate() {
            let half_w = wall.width() / 2.0;
            let half_h = wall.dimensions.y / 2.0;
            let _ = writeln!(obj, "o wall_{}", index);

            // 局部坐标系以墙体中心为原点
            for (x, y) in [(-half_w, -half_h), (half_w, -half_h), (half_w, half_h), (-half_w, half_h)] {
                let p = wall.transform.transform_point(&Point3::new(x, y, 0.0));
                let _ = writeln!(obj, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z);
            }

            let base = index * 4 + 1;
            let _ = writeln!(obj, "f {} {} {} {}", base, base + 1, base + 2, base + 3);
        }

        obj
    }
}

impl ModelExporter for ObjWallExporter {
    fn extension(&self) -> &str {
        "obj"
    }

    fn export(&self, room: &RoomScan, model_path: &Path, metadata_path: &Path) -> Result<(), FileError> {
        let metadata = ObjMetadata {
            format: "obj",
            units: "m",
            walls: room
                .walls
                .iter()
                .map(|w| WallMetadata {
                    identifier: w.identifier.to_string(),
                    width: w.width(),
                    height: w.dimensions.y,
                })
                .collect(),
        };

        std::fs::write(model_path, Self::to_obj(room))?;
        std::fs::write(metadata_path, serde_json::to_vec_pretty(&metadata)?)?;
        Ok(())
    }
}
