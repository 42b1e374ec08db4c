//! 导出页面布局
//!
//! 单页横向 A4：标题区、平面图、页脚免责声明。
//! 坐标原点在页面左上角，Y 轴向下；各输出后端自行转换。

use crate::project::Project;
use crate::typography::{format_timestamp, text_width};
use chrono::Local;
use floorplan_core::math::{BoundingBox2, Point2, Vector2};
use floorplan_core::projector::ProjectionResult;
use floorplan_renderer::{fit, DrawCommand, FitRequest, Inset, PlanFrame};

/// 页脚免责声明
pub const DISCLAIMER: &str = "Not to scale; approximate only; buyers to make independent enquiries.";

/// 页面设置（单位：pt，72 pt = 1 英寸）
#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    pub page_width: f64,
    pub page_height: f64,
    /// 四边统一边距
    pub margin: f64,
    /// 平面图包围盒四周外扩（米）
    pub plan_inset_meters: f64,
    /// 标题、地址、时间戳相对标题区原点的纵向偏移
    pub header_offsets: [f64; 3],
    pub title_size: f64,
    pub subtitle_size: f64,
    pub timestamp_size: f64,
    pub label_size: f64,
    pub footer_size: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            page_width: 842.0,
            page_height: 595.0,
            margin: 36.0,
            plan_inset_meters: 0.5,
            header_offsets: [0.0, 28.0, 52.0],
            title_size: 20.0,
            subtitle_size: 15.0,
            timestamp_size: 12.0,
            label_size: 10.0,
            footer_size: 9.0,
        }
    }
}

impl PageSetup {
    /// 内容区（去掉边距）
    pub fn content_rect(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.margin, self.margin),
            Point2::new(self.page_width - self.margin, self.page_height - self.margin),
        )
    }

    /// 平面图适配参数：固定外扩，不缩放不平移
    pub fn plan_request(&self) -> FitRequest {
        let content = self.content_rect();
        FitRequest::new(content.width(), content.height())
            .with_inset(Inset::Margin(self.plan_inset_meters))
    }
}

/// 文字用途，决定字体和颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Subtitle,
    Timestamp,
    Label,
    Footer,
}

/// 已定位的文字（`origin` 为文字框左上角）
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub role: TextRole,
    pub text: String,
    pub origin: Point2,
    pub size: f64,
}

/// 排好的一页
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    /// 页面坐标下的平面图；没有墙体时为空
    pub plan: PlanFrame,
    /// 按绘制顺序排列的文字（标注在平面图之后绘制）
    pub texts: Vec<TextItem>,
}

impl PageLayout {
    pub fn texts_with_role(&self, role: TextRole) -> impl Iterator<Item = &TextItem> {
        self.texts.iter().filter(move |t| t.role == role)
    }
}

/// 排版导出页面
pub fn layout_page(
    project: &Project,
    projection: &ProjectionResult,
    setup: &PageSetup,
    app_name: &str,
) -> PageLayout {
    let content = setup.content_rect();
    let mut texts = Vec::new();

    // 标题区
    let header = [
        (
            TextRole::Title,
            format!("{} \u{2014} {}", app_name, project.property_type.display_name()),
            setup.title_size,
        ),
        (TextRole::Subtitle, project.address.clone(), setup.subtitle_size),
        (
            TextRole::Timestamp,
            format_timestamp(&project.created_at.with_timezone(&Local)),
            setup.timestamp_size,
        ),
    ];
    for ((role, text, size), offset) in header.into_iter().zip(setup.header_offsets) {
        texts.push(TextItem {
            role,
            text,
            origin: Point2::new(content.min.x, content.min.y + offset),
            size,
        });
    }

    // 平面图
    let plan = fit(projection, &setup.plan_request()).translated(content.min.coords);
    for command in &plan.commands {
        if let DrawCommand::Label { position, text, .. } = command {
            let half = Vector2::new(text_width(text, setup.label_size), setup.label_size) / 2.0;
            texts.push(TextItem {
                role: TextRole::Label,
                text: text.clone(),
                origin: position - half,
                size: setup.label_size,
            });
        }
    }

    // 页脚
    let footer_width = text_width(DISCLAIMER, setup.footer_size);
    texts.push(TextItem {
        role: TextRole::Footer,
        text: DISCLAIMER.to_string(),
        origin: Point2::new(
            content.center().x - footer_width / 2.0,
            content.max.y - setup.footer_size,
        ),
        size: setup.footer_size,
    });

    PageLayout {
        width: setup.page_width,
        height: setup.page_height,
        plan,
        texts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::PropertyType;
    use floorplan_core::math::{approx_eq, Point3};
    use floorplan_core::projector;
    use floorplan_core::scan::{RoomScan, Wall};

    fn room() -> RoomScan {
        let half_pi = std::f64::consts::FRAC_PI_2;
        RoomScan::new(vec![
            Wall::from_pose(Point3::new(1.5, 1.2, 0.0), 0.0, 3.0, 2.4),
            Wall::from_pose(Point3::new(3.0, 1.2, -2.0), half_pi, 4.0, 2.4),
            Wall::from_pose(Point3::new(1.5, 1.2, -4.0), 0.0, 3.0, 2.4),
            Wall::from_pose(Point3::new(0.0, 1.2, -2.0), half_pi, 4.0, 2.4),
        ])
    }

    #[test]
    fn test_content_rect() {
        let content = PageSetup::default().content_rect();
        assert!(approx_eq(content.width(), 770.0));
        assert!(approx_eq(content.height(), 523.0));
    }

    #[test]
    fn test_header_and_footer_positions() {
        let room = room();
        let project = Project::create(PropertyType::Townhouse, "7 Elm Row", &room).unwrap();
        let layout = layout_page(&project, &projector::project(&room), &PageSetup::default(), "FloorPlanPro");

        let title = layout.texts_with_role(TextRole::Title).next().unwrap();
        assert_eq!(title.text, "FloorPlanPro \u{2014} Townhouse");
        assert_eq!(title.origin, Point2::new(36.0, 36.0));

        let subtitle = layout.texts_with_role(TextRole::Subtitle).next().unwrap();
        assert_eq!(subtitle.text, "7 Elm Row");
        assert_eq!(subtitle.origin, Point2::new(36.0, 64.0));

        let timestamp = layout.texts_with_role(TextRole::Timestamp).next().unwrap();
        assert_eq!(timestamp.origin, Point2::new(36.0, 88.0));

        let footer = layout.texts_with_role(TextRole::Footer).next().unwrap();
        assert_eq!(footer.text, DISCLAIMER);
        assert!(approx_eq(footer.origin.y, 595.0 - 36.0 - 9.0));
        let footer_center = footer.origin.x + text_width(DISCLAIMER, 9.0) / 2.0;
        assert!((footer_center - 421.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_uses_document_scale() {
        let room = room();
        let project = Project::create(PropertyType::House, "1 Main St", &room).unwrap();
        let layout = layout_page(&project, &projector::project(&room), &PageSetup::default(), "FloorPlanPro");

        // 3x4 m 外扩后 4x5 m：min(770/4, 523/5)
        assert!((layout.plan.transform.scale - 104.6).abs() < 1e-6);
        assert_eq!(layout.plan.lines().count(), 4);
        assert_eq!(layout.texts_with_role(TextRole::Label).count(), 4);
    }

    #[test]
    fn test_labels_centered_on_midpoints() {
        let room = room();
        let project = Project::create(PropertyType::House, "1 Main St", &room).unwrap();
        let layout = layout_page(&project, &projector::project(&room), &PageSetup::default(), "FloorPlanPro");

        let positions: Vec<Point2> = layout
            .plan
            .labels()
            .filter_map(|c| match c {
                DrawCommand::Label { position, .. } => Some(*position),
                _ => None,
            })
            .collect();

        for (label, position) in layout.texts_with_role(TextRole::Label).zip(positions) {
            let center_x = label.origin.x + text_width(&label.text, label.size) / 2.0;
            let center_y = label.origin.y + label.size / 2.0;
            assert!((center_x - position.x).abs() < 1e-9);
            assert!((center_y - position.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_plan_keeps_header_and_footer() {
        let project = Project::create(PropertyType::Other, "Empty", &RoomScan::default()).unwrap();
        let layout = layout_page(&project, &ProjectionResult::default(), &PageSetup::default(), "FloorPlanPro");

        assert!(layout.plan.is_empty());
        assert_eq!(layout.texts.len(), 4);
        assert_eq!(layout.texts_with_role(TextRole::Label).count(), 0);
    }
}
