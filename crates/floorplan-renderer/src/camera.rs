//! 交互平面相机
//!
//! 记录画布的缩放和平移：已提交的值加上正在进行的手势值。
//! 每次重绘都用当前状态重新跑一遍投影和适配，不缓存变换。

use crate::fit::{fit, FitRequest, Inset, PlanFrame};
use floorplan_core::math::Vector2;
use floorplan_core::projector::ProjectionResult;

/// 画布留白系数，避免平面图贴边
pub const CANVAS_INSET: f64 = 0.8;

/// 最小累计缩放
pub const MIN_ZOOM: f64 = 0.5;

/// 最大累计缩放
pub const MAX_ZOOM: f64 = 5.0;

/// 平面图相机
#[derive(Debug, Clone, PartialEq)]
pub struct PlanCamera {
    /// 已提交的缩放
    zoom: f64,
    /// 进行中的缩放手势
    gesture_zoom: f64,
    /// 已提交的平移（表面单位）
    pan: Vector2,
    /// 进行中的平移手势
    gesture_pan: Vector2,
}

impl PlanCamera {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            gesture_zoom: 1.0,
            pan: Vector2::zeros(),
            gesture_pan: Vector2::zeros(),
        }
    }

    /// 缩放手势进行中
    pub fn update_zoom_gesture(&mut self, magnification: f64) {
        self.gesture_zoom = magnification;
    }

    /// 缩放手势结束，提交并限制累计缩放
    pub fn end_zoom_gesture(&mut self, magnification: f64) {
        self.zoom = (self.zoom * magnification).clamp(MIN_ZOOM, MAX_ZOOM);
        self.gesture_zoom = 1.0;
    }

    /// 一次性缩放（滚轮）
    pub fn zoom_by(&mut self, factor: f64) {
        self.end_zoom_gesture(factor);
    }

    /// 平移手势进行中
    pub fn update_pan_gesture(&mut self, translation: Vector2) {
        self.gesture_pan = translation;
    }

    /// 平移手势结束，累加到已提交平移
    pub fn end_pan_gesture(&mut self, translation: Vector2) {
        self.pan += translation;
        self.gesture_pan = Vector2::zeros();
    }

    /// 一次性平移
    pub fn pan_by(&mut self, delta: Vector2) {
        self.end_pan_gesture(delta);
    }

    /// 当前总缩放
    pub fn total_zoom(&self) -> f64 {
        self.zoom * self.gesture_zoom
    }

    /// 当前总平移
    pub fn current_pan(&self) -> Vector2 {
        self.pan + self.gesture_pan
    }

    /// 画布适配参数
    pub fn fit_request(&self, width: f64, height: f64) -> FitRequest {
        FitRequest::new(width, height)
            .with_inset(Inset::Proportional(CANVAS_INSET))
            .with_zoom(self.total_zoom())
            .with_pan(self.current_pan())
    }

    /// 计算一帧画布内容
    pub fn frame(&self, projection: &ProjectionResult, width: f64, height: f64) -> PlanFrame {
        fit(projection, &self.fit_request(width, height))
    }

    /// 重置到初始视图
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for PlanCamera {
    fn default() -> Self {
        Self::new()
    }
}
