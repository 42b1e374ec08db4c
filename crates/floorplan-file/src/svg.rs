//! SVG 输出
//!
//! 与 PDF 使用同一份页面布局，SVG 本身即 Y 轴向下，无需翻转。

use crate::layout::{PageLayout, TextRole};
use floorplan_renderer::{DrawCommand, PlanStyle};
use std::fmt::Write;

/// 将页面布局写为 SVG 字符串
pub fn write_svg(layout: &PageLayout, style: &PlanStyle) -> String {
    let mut svg = String::new();

    // SVG 头部
    let _ = writeln!(
        svg,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}pt" height="{h:.0}pt" viewBox="0 0 {w:.2} {h:.2}">
  <rect x="0" y="0" width="{w:.2}" height="{h:.2}" fill="white"/>"#,
        w = layout.width,
        h = layout.height,
    );

    if !layout.plan.is_empty() {
        let _ = writeln!(
            svg,
            r#"  <g stroke="{}" stroke-linecap="round" fill="none">"#,
            style.wall.to_css()
        );
        for command in layout.plan.lines() {
            if let DrawCommand::Line {
                start,
                end,
                stroke_width,
                ..
            } = command
            {
                let _ = writeln!(
                    svg,
                    r#"    <line x1="{:.4}" y1="{:.4}" x2="{:.4}" y2="{:.4}" stroke-width="{:.4}"/>"#,
                    start.x, start.y, end.x, end.y, stroke_width
                );
            }
        }
        svg.push_str("  </g>\n");
    }

    for item in &layout.texts {
        let (weight, color) = match item.role {
            TextRole::Title => ("bold", style.text),
            TextRole::Subtitle => ("normal", style.text),
            TextRole::Timestamp | TextRole::Footer => ("normal", style.secondary_text),
            TextRole::Label => ("bold", style.label),
        };
        let _ = writeln!(
            svg,
            r#"  <text x="{:.2}" y="{:.2}" font-family="Helvetica, Arial, sans-serif" font-size="{:.1}" font-weight="{}" fill="{}" dominant-baseline="hanging">{}</text>"#,
            item.origin.x,
            item.origin.y,
            item.size,
            weight,
            color.to_css(),
            escape_xml(&item.text)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout_page, PageSetup};
    use crate::project::{Project, PropertyType};
    use floorplan_core::math::Matrix4;
    use floorplan_core::projector::project;
    use floorplan_core::scan::{RoomScan, Wall};

    #[test]
    fn test_svg_contains_plan_and_text() {
        let room = RoomScan::new(vec![Wall::new(3.0, 2.4, Matrix4::identity())]);
        let record = Project::create(PropertyType::House, "Lot 9 <rear>", &room).unwrap();
        let layout = layout_page(&record, &project(&room), &PageSetup::default(), "FloorPlanPro");
        let svg = write_svg(&layout, &PlanStyle::default());

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 842.00 595.00""#));
        assert_eq!(svg.matches("<line ").count(), 1);
        assert!(svg.contains(">3.00 m</text>"));
        assert!(svg.contains("Lot 9 &lt;rear&gt;"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"a & "b""#), "a &amp; &quot;b&quot;");
    }
}
