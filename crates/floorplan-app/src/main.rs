//! FloorPlanPro 桌面查看器入口
//! 使用 eframe 作为应用框架

mod app;
mod canvas;

use anyhow::Result;
use eframe::egui;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(Level::INFO).finish(),
    )?;

    info!("Starting FloorPlanPro...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("FloorPlanPro"),
        ..Default::default()
    };

    eframe::run_native(
        "FloorPlanPro",
        native_options,
        Box::new(|_cc| Ok(Box::new(app::FloorPlanApp::default()))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
