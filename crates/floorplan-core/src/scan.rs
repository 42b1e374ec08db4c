//! 房间扫描数据模型
//!
//! 由外部扫描会话产出、本库只读使用的墙体几何。
//! 单位为米，右手坐标系，Y 轴竖直向上。

use crate::math::{Matrix4, Point3, Vector3};
use nalgebra as na;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 扫描得到的单面墙
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// 墙体标识（由扫描源分配）
    pub identifier: Uuid,

    /// 局部尺寸：x 为沿墙宽度，y 为高度，z 为厚度
    pub dimensions: Vector3,

    /// 局部坐标系到房间坐标系的刚体变换
    pub transform: Matrix4,
}

impl Wall {
    /// 使用指定变换创建墙体
    pub fn new(width: f64, height: f64, transform: Matrix4) -> Self {
        Self {
            identifier: Uuid::new_v4(),
            dimensions: Vector3::new(width, height, 0.0),
            transform,
        }
    }

    /// 由中心点和绕竖直轴的偏航角创建墙体
    ///
    /// 偏航角为 0 时墙体沿房间 X 轴方向延伸。
    pub fn from_pose(center: Point3, yaw: f64, width: f64, height: f64) -> Self {
        let isometry = na::Isometry3::new(center.coords, Vector3::y() * yaw);
        Self::new(width, height, isometry.to_homogeneous())
    }

    /// 指定标识
    pub fn with_identifier(mut self, identifier: Uuid) -> Self {
        self.identifier = identifier;
        self
    }

    /// 沿墙宽度（即平面图中的线段长度）
    pub fn width(&self) -> f64 {
        self.dimensions.x
    }

    /// 墙体中心（变换的平移分量）
    pub fn center(&self) -> Point3 {
        Point3::new(
            self.transform[(0, 3)],
            self.transform[(1, 3)],
            self.transform[(2, 3)],
        )
    }

    /// 墙体局部 X 轴在房间坐标系中的方向（变换第一列）
    pub fn right_axis(&self) -> Vector3 {
        Vector3::new(
            self.transform[(0, 0)],
            self.transform[(1, 0)],
            self.transform[(2, 0)],
        )
    }

    /// 所有数值是否有限
    pub fn is_finite(&self) -> bool {
        self.dimensions.iter().all(|v| v.is_finite()) && self.transform.iter().all(|v| v.is_finite())
    }
}

/// 一次完整扫描的结果，墙体按扫描源给出的顺序排列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomScan {
    pub walls: Vec<Wall>,
}

impl RoomScan {
    pub fn new(walls: Vec<Wall>) -> Self {
        Self { walls }
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// 第一个含非有限数值的墙体索引
    pub fn first_non_finite_wall(&self) -> Option<usize> {
        self.walls.iter().position(|w| !w.is_finite())
    }
}
