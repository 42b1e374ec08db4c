//! 比例适配
//!
//! 交互画布和固定页面文档共用同一套适配算法：
//!
//! 1. 按 [`Inset`] 处理包围盒留白；
//! 2. `scale = min(表面宽 / 包围盒宽, 表面高 / 包围盒高)`，两轴同一比例，
//!    无论表面长宽比如何都不拉伸几何；
//! 3. 乘以交互缩放，包围盒中心对齐表面中心后再加平移量。
//!
//! 非有限输入（如退化变换产生的 NaN）原样传播，不做清洗。

use crate::transform::ViewTransform;
use floorplan_core::math::{BoundingBox2, Point2, Vector2};
use floorplan_core::projector::ProjectionResult;
use floorplan_core::units::format_meters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 墙线宽度（平面空间，米），随缩放一起变粗变细
pub const WALL_STROKE_METERS: f64 = 0.02;

/// 参与除法的包围盒最小边长（米）
pub const MIN_EXTENT_METERS: f64 = 0.1;

/// 留白策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Inset {
    /// 包围盒四周各外扩固定米数（文档导出）
    Margin(f64),
    /// 基础比例乘以收缩系数（交互画布）
    Proportional(f64),
}

impl Default for Inset {
    fn default() -> Self {
        Inset::Margin(0.0)
    }
}

/// 适配参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitRequest {
    pub surface_width: f64,
    pub surface_height: f64,
    pub inset: Inset,
    /// 交互缩放（> 0），文档导出恒为 1
    pub zoom: f64,
    /// 交互平移（表面单位），文档导出恒为 0
    pub pan: Vector2,
}

impl FitRequest {
    pub fn new(surface_width: f64, surface_height: f64) -> Self {
        Self {
            surface_width,
            surface_height,
            inset: Inset::default(),
            zoom: 1.0,
            pan: Vector2::zeros(),
        }
    }

    pub fn with_inset(mut self, inset: Inset) -> Self {
        self.inset = inset;
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_pan(mut self, pan: Vector2) -> Self {
        self.pan = pan;
        self
    }

    fn surface_center(&self) -> Point2 {
        Point2::new(self.surface_width / 2.0, self.surface_height / 2.0)
    }
}

/// 绘制指令（表面坐标）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// 墙线；起止点重合时画成一个点
    Line {
        wall: Uuid,
        start: Point2,
        end: Point2,
        stroke_width: f64,
    },
    /// 居中于墙线中点的长度标注
    Label {
        wall: Uuid,
        position: Point2,
        text: String,
    },
}

/// 一次适配的输出
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanFrame {
    pub transform: ViewTransform,
    pub commands: Vec<DrawCommand>,
}

impl PlanFrame {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// 整体平移到另一块表面上的位置（如页面内容区原点）
    pub fn translated(&self, offset: Vector2) -> Self {
        let commands = self
            .commands
            .iter()
            .map(|command| match command {
                DrawCommand::Line {
                    wall,
                    start,
                    end,
                    stroke_width,
                } => DrawCommand::Line {
                    wall: *wall,
                    start: start + offset,
                    end: end + offset,
                    stroke_width: *stroke_width,
                },
                DrawCommand::Label {
                    wall,
                    position,
                    text,
                } => DrawCommand::Label {
                    wall: *wall,
                    position: position + offset,
                    text: text.clone(),
                },
            })
            .collect();

        Self {
            transform: self.transform.then_translate(offset),
            commands,
        }
    }

    /// 墙线指令
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// 标注指令
    pub fn labels(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Label { .. }))
    }
}

/// 留白后参与适配的包围盒
pub fn fitted_bounds(bounds: &BoundingBox2, inset: Inset) -> BoundingBox2 {
    match inset {
        Inset::Margin(margin) => bounds.expanded(margin),
        Inset::Proportional(_) => *bounds,
    }
}

/// 两轴各自的朴素比例 `(scale_x, scale_y)`
pub fn axis_ratios(bounds: &BoundingBox2, request: &FitRequest) -> (f64, f64) {
    let fitted = fitted_bounds(bounds, request.inset);
    (
        request.surface_width / fitted.width().max(MIN_EXTENT_METERS),
        request.surface_height / fitted.height().max(MIN_EXTENT_METERS),
    )
}

/// 基础比例（未乘交互缩放）
pub fn base_scale(bounds: &BoundingBox2, request: &FitRequest) -> f64 {
    let (scale_x, scale_y) = axis_ratios(bounds, request);
    let scale = scale_x.min(scale_y);
    match request.inset {
        Inset::Margin(_) => scale,
        Inset::Proportional(factor) => scale * factor,
    }
}

/// 计算视图变换并生成绘制指令
///
/// 没有墙体时返回单位变换和空指令列表。
pub fn fit(projection: &ProjectionResult, request: &FitRequest) -> PlanFrame {
    let Some(bounds) = projection.bounding_rect.filter(|_| !projection.walls.is_empty()) else {
        return PlanFrame::default();
    };

    let scale = base_scale(&bounds, request) * request.zoom;
    let transform = ViewTransform::centered(
        scale,
        fitted_bounds(&bounds, request.inset).center(),
        request.surface_center(),
        request.pan,
    );

    tracing::trace!(scale, walls = projection.walls.len(), "fitted plan to surface");

    let stroke_width = transform.apply_length(WALL_STROKE_METERS);
    let mut commands = Vec::with_capacity(projection.walls.len() * 2);

    for wall in &projection.walls {
        commands.push(DrawCommand::Line {
            wall: wall.id,
            start: transform.apply(&wall.start),
            end: transform.apply(&wall.end),
            stroke_width,
        });
    }

    for wall in &projection.walls {
        commands.push(DrawCommand::Label {
            wall: wall.id,
            position: transform.apply(&wall.midpoint()),
            text: format_meters(wall.length_meters),
        });
    }

    PlanFrame {
        transform,
        commands,
    }
}
