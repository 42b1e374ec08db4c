//! PDF 文档输出
//!
//! 把排好的页面写成单页矢量 PDF。文字使用 Helvetica（正文）和
//! Helvetica-Bold（标题、长度标注），WinAnsi 编码。

use crate::error::FileError;
use crate::layout::{layout_page, PageLayout, PageSetup, TextRole};
use crate::project::Project;
use crate::typography::encode_win_ansi;
use chrono::Utc;
use floorplan_core::math::Point2;
use floorplan_core::projector::ProjectionResult;
use floorplan_renderer::{Color, DrawCommand, PlanStyle};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

/// Helvetica 上升部高度（em）
const ASCENT: f64 = 0.718;

/// 渲染项目的导出文档
///
/// 载荷无法解码时返回 [`FileError::MissingGeometry`]，不会生成空白文档；
/// 解码成功但没有墙体时照常输出标题区和页脚。
pub fn render_document(
    project: &Project,
    projection: &ProjectionResult,
    setup: &PageSetup,
    style: &PlanStyle,
    app_name: &str,
) -> Result<Vec<u8>, FileError> {
    if let Err(e) = project.decode() {
        tracing::error!(project = %project.id, "cannot export document: {}", e);
        return Err(FileError::MissingGeometry);
    }

    let layout = layout_page(project, projection, setup, app_name);
    let title = format!("{} \u{2014} {}", app_name, project.property_type.display_name());
    write_pdf(&layout, style, &title, app_name)
}

/// 将页面布局写为 PDF 字节
pub fn write_pdf(
    layout: &PageLayout,
    style: &PlanStyle,
    title: &str,
    creator: &str,
) -> Result<Vec<u8>, FileError> {
    let mut doc = Document::with_version("1.5");

    let id_pages = doc.new_object_id();

    let id_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let id_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let content = Content {
        operations: page_operations(layout, style),
    };
    let id_content = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let id_resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => id_regular,
            "F2" => id_bold,
        },
    });

    let id_page = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => id_pages,
        "Contents" => id_content,
        "Resources" => id_resources,
    });

    doc.set_object(
        id_pages,
        dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(id_page)],
            "Count" => 1,
            "MediaBox" => Object::Array(vec![
                0.into(),
                0.into(),
                (layout.width as f32).into(),
                (layout.height as f32).into(),
            ]),
        },
    );

    let id_catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => id_pages,
    });
    doc.trailer.set("Root", id_catalog);

    let date = Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
    let id_info = doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
        "Creator" => Object::string_literal(creator),
        "CreationDate" => Object::string_literal(date.clone()),
        "ModDate" => Object::string_literal(date),
    });
    doc.trailer.set("Info", id_info);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn rgb(operator: &str, color: Color) -> Operation {
    let [r, g, b] = color.to_unit_rgb();
    Operation::new(
        operator,
        vec![(r as f32).into(), (g as f32).into(), (b as f32).into()],
    )
}

/// 生成页面内容流
fn page_operations(layout: &PageLayout, style: &PlanStyle) -> Vec<Operation> {
    // PDF 的 Y 轴从页面底部向上
    let to_pdf = |p: &Point2| ((p.x) as f32, (layout.height - p.y) as f32);

    let mut ops = Vec::new();

    if !layout.plan.is_empty() {
        ops.push(Operation::new("q", vec![]));
        ops.push(rgb("RG", style.wall));
        // 圆头线帽，零长度墙体画成一个点
        ops.push(Operation::new("J", vec![1.into()]));
        ops.push(Operation::new("j", vec![1.into()]));

        for command in layout.plan.lines() {
            if let DrawCommand::Line {
                start,
                end,
                stroke_width,
                ..
            } = command
            {
                let (x0, y0) = to_pdf(start);
                let (x1, y1) = to_pdf(end);
                ops.push(Operation::new("w", vec![(*stroke_width as f32).into()]));
                ops.push(Operation::new("m", vec![x0.into(), y0.into()]));
                ops.push(Operation::new("l", vec![x1.into(), y1.into()]));
                ops.push(Operation::new("S", vec![]));
            }
        }

        ops.push(Operation::new("Q", vec![]));
    }

    for item in &layout.texts {
        let (font, color) = match item.role {
            TextRole::Title => ("F2", style.text),
            TextRole::Subtitle => ("F1", style.text),
            TextRole::Timestamp | TextRole::Footer => ("F1", style.secondary_text),
            TextRole::Label => ("F2", style.label),
        };

        let baseline = Point2::new(item.origin.x, item.origin.y + item.size * ASCENT);
        let (x, y) = to_pdf(&baseline);

        ops.push(Operation::new("BT", vec![]));
        ops.push(rgb("rg", color));
        ops.push(Operation::new("Tf", vec![font.into(), (item.size as f32).into()]));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&item.text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    ops
}
