//! 平面图画布
//!
//! 把 [`PlanFrame`] 的绘制指令画到 egui 画布上。画布坐标原点在左上角，
//! 与适配输出的表面坐标一致，只需加上画布矩形的偏移。

use eframe::egui;
use floorplan_core::math::{BoundingBox2, Point2, Vector2};
use floorplan_core::projector::ProjectionResult;
use floorplan_renderer::{Color, DrawCommand, PlanCamera, PlanFrame, PlanStyle};

/// 滚轮每格缩放倍数
const SCROLL_ZOOM_STEP: f64 = 1.1;

/// 长度标注字号
const LABEL_FONT_SIZE: f32 = 12.0;

/// 画布交互状态
#[derive(Debug, Default)]
pub struct PlanCanvas {
    pub camera: PlanCamera,
    /// 当前拖拽累计位移
    drag_translation: Vector2,
}

impl PlanCanvas {
    pub fn reset(&mut self) {
        self.camera.reset();
        self.drag_translation = Vector2::zeros();
    }

    /// 绘制一帧；`projection` 为 `None` 时显示缺失占位
    pub fn show(&mut self, ui: &mut egui::Ui, projection: Option<&ProjectionResult>, style: &PlanStyle) {
        let size = ui.available_size_before_wrap();
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let rect = response.rect;

        painter.rect_filled(rect, 0.0, to_color32(Color::WHITE));

        let Some(projection) = projection else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Missing scan",
                egui::FontId::proportional(16.0),
                to_color32(style.secondary_text),
            );
            return;
        };

        self.handle_input(ui, &response);

        let frame = self
            .camera
            .frame(projection, rect.width() as f64, rect.height() as f64);
        paint_frame(&painter, rect, &frame, style);

        // 指针坐标读数
        let hovered = response
            .hover_pos()
            .and_then(|pointer| hovered_plan_point(rect, pointer, &frame, projection.bounding_rect.as_ref()));
        if let Some(point) = hovered {
            painter.text(
                rect.left_bottom() + egui::vec2(8.0, -8.0),
                egui::Align2::LEFT_BOTTOM,
                format!("{:.2}, {:.2} m", point.x, point.y),
                egui::FontId::proportional(11.0),
                to_color32(style.secondary_text),
            );
        }
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response) {
        // 拖拽平移
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.drag_translation += Vector2::new(delta.x as f64, delta.y as f64);
            self.camera.update_pan_gesture(self.drag_translation);
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.camera.end_pan_gesture(self.drag_translation);
            self.drag_translation = Vector2::zeros();
        }

        if !response.hovered() {
            return;
        }

        // 滚轮缩放
        let scroll_delta = ui.input(|i| i.raw_scroll_delta);
        if scroll_delta.y.abs() > 0.0 {
            let factor = if scroll_delta.y > 0.0 {
                SCROLL_ZOOM_STEP
            } else {
                1.0 / SCROLL_ZOOM_STEP
            };
            self.camera.zoom_by(factor);
        }

        // 触控板捏合
        let pinch = ui.input(|i| i.zoom_delta()) as f64;
        if (pinch - 1.0).abs() > f64::EPSILON {
            self.camera.zoom_by(pinch);
        }

        if response.double_clicked() {
            self.reset();
        }
    }
}

/// 按顺序执行绘制指令
pub fn paint_frame(painter: &egui::Painter, rect: egui::Rect, frame: &PlanFrame, style: &PlanStyle) {
    let wall_color = to_color32(style.wall);
    let label_color = to_color32(style.label);

    for command in &frame.commands {
        match command {
            DrawCommand::Line {
                start,
                end,
                stroke_width,
                ..
            } => {
                let a = to_screen(rect, start);
                let b = to_screen(rect, end);
                let width = *stroke_width as f32;
                if a == b {
                    painter.circle_filled(a, width / 2.0, wall_color);
                } else {
                    painter.line_segment([a, b], egui::Stroke::new(width, wall_color));
                }
            }
            DrawCommand::Label { position, text, .. } => {
                painter.text(
                    to_screen(rect, position),
                    egui::Align2::CENTER_CENTER,
                    text,
                    egui::FontId::proportional(LABEL_FONT_SIZE),
                    label_color,
                );
            }
        }
    }
}

/// 指针下的平面坐标；指针不在房间范围内时为 `None`
pub fn hovered_plan_point(
    rect: egui::Rect,
    pointer: egui::Pos2,
    frame: &PlanFrame,
    bounds: Option<&BoundingBox2>,
) -> Option<Point2> {
    let bounds = bounds?;
    let surface = Point2::new((pointer.x - rect.min.x) as f64, (pointer.y - rect.min.y) as f64);
    let plan = frame.transform.invert(&surface);
    bounds.contains(&plan).then_some(plan)
}

/// 表面坐标转屏幕坐标
pub fn to_screen(rect: egui::Rect, point: &Point2) -> egui::Pos2 {
    egui::Pos2::new(rect.min.x + point.x as f32, rect.min.y + point.y as f32)
}

pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}
