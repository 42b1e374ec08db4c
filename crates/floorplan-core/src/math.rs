//! 数学基础类型
//!
//! 基于 nalgebra 提供的向量和点类型的别名。

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// 2D点类型
pub type Point2 = na::Point2<f64>;

/// 3D点类型
pub type Point3 = na::Point3<f64>;

/// 2D向量类型
pub type Vector2 = na::Vector2<f64>;

/// 3D向量类型
pub type Vector3 = na::Vector3<f64>;

/// 3D刚体变换矩阵（列主序，第4列为平移）
pub type Matrix4 = na::Matrix4<f64>;

/// 数值容差，用于几何比较
pub const EPSILON: f64 = 1e-10;

/// 长度一致性容差（米）
pub const LENGTH_TOLERANCE: f64 = 1e-4;

/// 判断两个浮点数是否近似相等
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 判断两个2D点是否近似相等
#[inline]
pub fn points_approx_eq(a: &Point2, b: &Point2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// 2D轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    /// 创建新的包围盒
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// 从点集创建包围盒，点集为空时返回 `None`
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first, first);
        for p in iter {
            bbox.expand_to_include(&p);
        }
        Some(bbox)
    }

    /// 扩展包围盒以包含指定点
    pub fn expand_to_include(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// 向四周各扩展 `margin`（负值为收缩）
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// 检查是否包含指定点（含边界）
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// 获取中心点
    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// 获取宽度
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// 获取高度
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
