//! 平面 → 绘制表面的视图变换
//!
//! 均匀缩放加平移：`surface = plan * scale + translation`，
//! 等价于 `(plan - 平面中心) * scale + 表面中心 + 平移量`。

use floorplan_core::math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 视图变换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// 均匀缩放（表面单位/米）
    pub scale: f64,
    /// 平移（表面单位）
    pub translation: Vector2,
}

impl ViewTransform {
    /// 单位变换
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            translation: Vector2::zeros(),
        }
    }

    /// 将平面中心 `plan_center` 映射到 `surface_center + pan`
    pub fn centered(scale: f64, plan_center: Point2, surface_center: Point2, pan: Vector2) -> Self {
        Self {
            scale,
            translation: surface_center.coords + pan - plan_center.coords * scale,
        }
    }

    /// 平面坐标转表面坐标
    pub fn apply(&self, point: &Point2) -> Point2 {
        Point2::from(point.coords * self.scale + self.translation)
    }

    /// 表面坐标转平面坐标
    pub fn invert(&self, point: &Point2) -> Point2 {
        Point2::from((point.coords - self.translation) / self.scale)
    }

    /// 平面长度转表面长度
    pub fn apply_length(&self, meters: f64) -> f64 {
        meters * self.scale
    }

    /// 在表面坐标系中追加平移
    pub fn then_translate(&self, offset: Vector2) -> Self {
        Self {
            scale: self.scale,
            translation: self.translation + offset,
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}
