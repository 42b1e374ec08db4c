//! 平面投影
//!
//! 将房间坐标系中的墙体压平为俯视 2D 线段：
//! 丢弃竖直轴，平面 `x = world_x`，平面 `y = -world_z`（北向上）。
//!
//! 投影是纯函数，每次绘制都从原始墙体重新计算，不做缓存。

use crate::math::{BoundingBox2, Point2, Point3};
use crate::scan::{RoomScan, Wall};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 投影后的墙体线段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedWall {
    /// 来源墙体的标识
    pub id: Uuid,
    pub start: Point2,
    pub end: Point2,
    /// 墙体长度（米），等于两端点距离
    pub length_meters: f64,
}

impl ProjectedWall {
    /// 线段中点
    pub fn midpoint(&self) -> Point2 {
        Point2::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// 由端点重新计算的长度
    pub fn endpoint_distance(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 是否退化为一个点
    pub fn is_degenerate(&self) -> bool {
        self.length_meters == 0.0
    }
}

/// 投影结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// 与输入墙体同序
    pub walls: Vec<ProjectedWall>,
    /// 所有端点的紧包围盒；没有墙体时为 `None`
    pub bounding_rect: Option<BoundingBox2>,
}

impl ProjectionResult {
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}

/// 房间坐标 → 平面坐标
#[inline]
pub fn flatten(point: &Point3) -> Point2 {
    Point2::new(point.x, -point.z)
}

/// 投影单面墙
pub fn project_wall(wall: &Wall) -> ProjectedWall {
    let width = wall.width();
    let center = wall.center();
    let half = wall.right_axis() * (width / 2.0);
    let start = flatten(&(center - half));
    let end = flatten(&(center + half));

    // 负宽度或带缩放的变换下，局部宽度不等于平面长度
    ProjectedWall {
        id: wall.identifier,
        start,
        end,
        length_meters: (end - start).norm(),
    }
}

/// 投影整个房间
pub fn project(room: &RoomScan) -> ProjectionResult {
    let walls: Vec<ProjectedWall> = room.walls.iter().map(project_wall).collect();
    let bounding_rect = BoundingBox2::from_points(walls.iter().flat_map(|w| [w.start, w.end]));

    tracing::debug!(walls = walls.len(), "projected room scan");

    ProjectionResult {
        walls,
        bounding_rect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, points_approx_eq, Matrix4, Vector3, LENGTH_TOLERANCE};
    use crate::units::format_meters;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    /// 4m x 3m 的矩形房间，中心在 (2, 0, -1.5)
    fn rectangular_room() -> RoomScan {
        RoomScan::new(vec![
            Wall::from_pose(Point3::new(2.0, 1.2, 0.0), 0.0, 4.0, 2.4),
            Wall::from_pose(Point3::new(4.0, 1.2, -1.5), FRAC_PI_2, 3.0, 2.4),
            Wall::from_pose(Point3::new(2.0, 1.2, -3.0), 0.0, 4.0, 2.4),
            Wall::from_pose(Point3::new(0.0, 1.2, -1.5), FRAC_PI_2, 3.0, 2.4),
        ])
    }

    #[test]
    fn test_single_identity_wall() {
        let room = RoomScan::new(vec![Wall::new(3.0, 2.5, Matrix4::identity())]);
        let result = project(&room);

        assert_eq!(result.walls.len(), 1);
        let wall = &result.walls[0];
        assert!(points_approx_eq(&wall.start, &Point2::new(-1.5, 0.0)));
        assert!(points_approx_eq(&wall.end, &Point2::new(1.5, 0.0)));
        assert!(approx_eq(wall.length_meters, 3.0));

        let bbox = result.bounding_rect.unwrap();
        assert!(approx_eq(bbox.width(), 3.0));
        assert!(approx_eq(bbox.height(), 0.0));
    }

    #[test]
    fn test_empty_room() {
        let result = project(&RoomScan::default());
        assert!(result.is_empty());
        assert!(result.bounding_rect.is_none());
    }

    #[test]
    fn test_depth_axis_is_negated() {
        let room = RoomScan::new(vec![Wall::from_pose(Point3::new(0.0, 0.0, -2.0), 0.0, 1.0, 2.0)]);
        let wall = project(&room).walls[0];
        assert!(approx_eq(wall.start.y, 2.0));
        assert!(approx_eq(wall.end.y, 2.0));
    }

    #[test]
    fn test_length_matches_endpoint_distance() {
        let mut room = rectangular_room();
        room.walls
            .push(Wall::from_pose(Point3::new(1.0, 1.0, -1.0), FRAC_PI_4, 1.7, 2.4));
        room.walls.push(Wall::from_pose(Point3::new(3.0, 1.0, -2.0), 1.1, 0.0, 2.4));

        for wall in project(&room).walls {
            assert!(wall.length_meters >= 0.0);
            assert!((wall.length_meters - wall.endpoint_distance()).abs() < LENGTH_TOLERANCE);
        }
    }

    #[test]
    fn test_negative_width_and_scaled_axis() {
        let stretched = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        let room = RoomScan::new(vec![
            Wall::new(-3.0, 2.4, Matrix4::identity()),
            Wall::new(1.5, 2.4, stretched),
        ]);
        let result = project(&room);

        for wall in &result.walls {
            assert!(wall.length_meters >= 0.0);
            assert!((wall.length_meters - wall.endpoint_distance()).abs() < LENGTH_TOLERANCE);
            assert_eq!(format_meters(wall.length_meters), "3.00 m");
        }
    }

    #[test]
    fn test_bounding_rect_is_tight() {
        let result = project(&rectangular_room());
        let bbox = result.bounding_rect.unwrap();
        let endpoints: Vec<Point2> = result.walls.iter().flat_map(|w| [w.start, w.end]).collect();

        for p in &endpoints {
            assert!(bbox.expanded(1e-9).contains(p));
        }
        assert!(endpoints.iter().any(|p| (p.x - bbox.min.x).abs() < 1e-9));
        assert!(endpoints.iter().any(|p| (p.x - bbox.max.x).abs() < 1e-9));
        assert!(endpoints.iter().any(|p| (p.y - bbox.min.y).abs() < 1e-9));
        assert!(endpoints.iter().any(|p| (p.y - bbox.max.y).abs() < 1e-9));

        assert!((bbox.width() - 4.0).abs() < 1e-9);
        assert!((bbox.height() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_order_and_ids_preserved() {
        let room = rectangular_room();
        let result = project(&room);
        let ids: Vec<Uuid> = result.walls.iter().map(|w| w.id).collect();
        let expected: Vec<Uuid> = room.walls.iter().map(|w| w.identifier).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let room = rectangular_room();
        let first = project(&room);
        let second = project(&room);

        assert_eq!(first.walls.len(), second.walls.len());
        for (a, b) in first.walls.iter().zip(&second.walls) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.start.x.to_bits(), b.start.x.to_bits());
            assert_eq!(a.start.y.to_bits(), b.start.y.to_bits());
            assert_eq!(a.end.x.to_bits(), b.end.x.to_bits());
            assert_eq!(a.end.y.to_bits(), b.end.y.to_bits());
            assert_eq!(a.length_meters.to_bits(), b.length_meters.to_bits());
        }
    }

    #[test]
    fn test_degenerate_wall_is_a_point() {
        let room = RoomScan::new(vec![Wall::from_pose(Point3::new(1.0, 0.0, -1.0), 0.0, 0.0, 2.0)]);
        let wall = project(&room).walls[0];
        assert!(wall.is_degenerate());
        assert!(points_approx_eq(&wall.start, &wall.end));
    }
}
