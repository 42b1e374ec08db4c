//! 查看器主界面

use crate::canvas::PlanCanvas;
use eframe::egui;
use floorplan_core::capture::{begin_capture, CaptureOutcome, CaptureReceiver, RecordedScan};
use floorplan_core::scan::RoomScan;
use floorplan_file::typography::format_timestamp;
use floorplan_file::{ExportService, ExportSettings, ObjWallExporter, ProjectStore, PropertyType};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

/// 文件操作类型
#[derive(Debug, Clone)]
enum FileOperation {
    Open(PathBuf),
    Save(PathBuf),
    ImportScan(PathBuf),
}

/// 导出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportTarget {
    Pdf,
    Svg,
    Model,
}

/// 等待结果的扫描会话
struct PendingCapture {
    property_type: PropertyType,
    address: String,
    receiver: CaptureReceiver,
}

/// FloorPlanPro 查看器
pub struct FloorPlanApp {
    store: ProjectStore,
    store_path: Option<PathBuf>,
    selected: Option<usize>,
    marked: BTreeSet<usize>,
    canvas: PlanCanvas,
    exporter: ExportService,

    // 新项目表单
    new_property_type: PropertyType,
    new_address: String,

    pending_file_op: Option<FileOperation>,
    pending_capture: Option<PendingCapture>,
    status_message: String,
}

impl Default for FloorPlanApp {
    fn default() -> Self {
        Self {
            store: ProjectStore::new(),
            store_path: None,
            selected: None,
            marked: BTreeSet::new(),
            canvas: PlanCanvas::default(),
            exporter: ExportService::new(ExportSettings::default()),
            new_property_type: PropertyType::default(),
            new_address: String::new(),
            pending_file_op: None,
            pending_capture: None,
            status_message: "Ready".to_string(),
        }
    }
}

impl FloorPlanApp {
    fn select(&mut self, index: usize) {
        if self.selected != Some(index) {
            self.selected = Some(index);
            self.canvas.reset();
        }
    }

    fn show_open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("FloorPlanPro Projects", &["fpp"])
            .set_title("Open Projects")
            .pick_file()
        {
            self.pending_file_op = Some(FileOperation::Open(path));
        }
    }

    fn show_save_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .add_filter("FloorPlanPro Projects", &["fpp"])
            .set_title("Save Projects");

        if let Some(file_name) = self.store_path.as_ref().and_then(|p| p.file_name()) {
            dialog = dialog.set_file_name(file_name.to_string_lossy().as_ref());
        }

        if let Some(path) = dialog.save_file() {
            self.pending_file_op = Some(FileOperation::Save(path));
        }
    }

    fn show_import_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Room Scan", &["json"])
            .set_title("Import Room Scan")
            .pick_file()
        {
            self.pending_file_op = Some(FileOperation::ImportScan(path));
        }
    }

    fn quick_save(&mut self) {
        match self.store_path.clone() {
            Some(path) => self.pending_file_op = Some(FileOperation::Save(path)),
            None => self.show_save_dialog(),
        }
    }

    /// 处理文件操作
    fn process_file_operations(&mut self) {
        let Some(op) = self.pending_file_op.take() else {
            return;
        };

        match op {
            FileOperation::Open(path) => match ProjectStore::open(&path) {
                Ok(store) => {
                    info!("Opened {} projects from {}", store.len(), path.display());
                    self.status_message = format!("Opened {}", path.display());
                    self.store = store;
                    self.store_path = Some(path);
                    self.selected = None;
                    self.marked.clear();
                    self.canvas.reset();
                }
                Err(e) => {
                    self.status_message = format!("Open failed: {}", e);
                    tracing::error!("Failed to open project file: {}", e);
                }
            },
            FileOperation::Save(path) => match self.store.save(&path) {
                Ok(()) => {
                    info!("Saved {} projects to {}", self.store.len(), path.display());
                    self.status_message = format!("Saved {}", path.display());
                    self.store_path = Some(path);
                }
                Err(e) => {
                    self.status_message = format!("Save failed: {}", e);
                    tracing::error!("Failed to save project file: {}", e);
                }
            },
            FileOperation::ImportScan(path) => self.start_import(path),
        }
    }

    /// 读取录制的扫描结果并作为一次扫描会话回放
    fn start_import(&mut self, path: PathBuf) {
        let room = match std::fs::read(&path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| serde_json::from_slice::<RoomScan>(&bytes).map_err(|e| e.to_string()))
        {
            Ok(room) => room,
            Err(e) => {
                self.status_message = format!("Import failed: {}", e);
                tracing::error!("Failed to read room scan {}: {}", path.display(), e);
                return;
            }
        };

        let mut source = RecordedScan::new(room);
        match begin_capture(&mut source) {
            Ok(receiver) => {
                self.pending_capture = Some(PendingCapture {
                    property_type: self.new_property_type,
                    address: self.new_address.trim().to_string(),
                    receiver,
                });
            }
            Err(e) => self.status_message = e.to_string(),
        }
    }

    /// 轮询扫描会话结果
    fn poll_capture(&mut self) {
        let Some(pending) = self.pending_capture.as_mut() else {
            return;
        };
        let Some(outcome) = pending.receiver.try_recv() else {
            return;
        };
        let Some(pending) = self.pending_capture.take() else {
            return;
        };

        match outcome {
            CaptureOutcome::Completed(room) => {
                match self
                    .store
                    .add_project(pending.property_type, pending.address, &room)
                {
                    Ok(project) => {
                        self.status_message = format!("Added {} ({} walls)", project.address, room.wall_count());
                        // 新项目位于最前，原有下标整体后移
                        self.marked = self.marked.iter().map(|i| i + 1).collect();
                        self.selected = None;
                        self.select(0);
                        self.new_address.clear();
                    }
                    Err(e) => self.status_message = format!("Could not save scan: {}", e),
                }
            }
            CaptureOutcome::Failed(e) => self.status_message = format!("Scan failed: {}", e),
            CaptureOutcome::Cancelled => self.status_message = "Scan cancelled".to_string(),
        }
    }

    fn export_selected(&mut self, target: ExportTarget) {
        let Some(project) = self.selected.and_then(|i| self.store.get(i)) else {
            return;
        };

        let result = match target {
            ExportTarget::Pdf => self.exporter.export_pdf(project),
            ExportTarget::Svg => self.exporter.export_svg(project),
            ExportTarget::Model => self.exporter.export_model(project, &ObjWallExporter),
        };

        self.status_message = match result {
            Ok(path) => format!("Exported {}", path.display()),
            Err(e) => format!("Export failed: {}", e),
        };
    }

    fn remove_marked(&mut self) {
        let removed = self.store.remove_projects(std::mem::take(&mut self.marked));
        self.selected = None;
        self.canvas.reset();
        self.status_message = format!("Removed {} projects", removed);
    }

    fn choose_export_dir(&mut self) {
        if let Some(dir) = rfd::FileDialog::new()
            .set_title("Export Folder")
            .set_directory(&self.exporter.settings.output_dir)
            .pick_folder()
        {
            self.exporter.settings.output_dir = dir;
        }
    }

    fn project_list(&mut self, ui: &mut egui::Ui) {
        ui.heading("Projects");
        ui.separator();

        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("property_type")
                .selected_text(self.new_property_type.display_name())
                .show_ui(ui, |ui| {
                    for property_type in PropertyType::ALL {
                        ui.selectable_value(&mut self.new_property_type, property_type, property_type.display_name());
                    }
                });
        });
        ui.add(egui::TextEdit::singleline(&mut self.new_address).hint_text("Address"));
        let scanning = self.pending_capture.is_some();
        if ui.add_enabled(!scanning, egui::Button::new("Import Scan…")).clicked() {
            self.show_import_dialog();
        }
        if scanning {
            ui.spinner();
        }

        ui.separator();

        let mut clicked = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, project) in self.store.projects().iter().enumerate() {
                ui.horizontal(|ui| {
                    let mut marked = self.marked.contains(&index);
                    if ui.checkbox(&mut marked, "").changed() {
                        if marked {
                            self.marked.insert(index);
                        } else {
                            self.marked.remove(&index);
                        }
                    }
                    let title = if project.address.is_empty() {
                        project.property_type.display_name().to_string()
                    } else {
                        project.address.clone()
                    };
                    let response = ui.selectable_label(self.selected == Some(index), title);
                    if response.clicked() {
                        clicked = Some(index);
                    }
                    response.on_hover_text(format!(
                        "{}\n{}",
                        project.property_type.display_name(),
                        format_timestamp(&project.created_at.with_timezone(&chrono::Local))
                    ));
                });
            }
        });
        if let Some(index) = clicked {
            self.select(index);
        }

        if !self.marked.is_empty() && ui.button(format!("Delete {} Selected", self.marked.len())).clicked() {
            self.remove_marked();
        }
    }
}

impl eframe::App for FloorPlanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_file_operations();
        self.poll_capture();

        // 快捷键
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            self.quick_save();
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::O)) {
            self.show_open_dialog();
        }

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open…").clicked() {
                        self.show_open_dialog();
                        ui.close();
                    }
                    if ui.button("Save").clicked() {
                        self.quick_save();
                        ui.close();
                    }
                    if ui.button("Save As…").clicked() {
                        self.show_save_dialog();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Export Folder…").clicked() {
                        self.choose_export_dir();
                        ui.close();
                    }
                });

                let has_selection = self.selected.is_some();
                ui.menu_button("Export", |ui| {
                    for (label, target) in [
                        ("PDF Document", ExportTarget::Pdf),
                        ("SVG Drawing", ExportTarget::Svg),
                        ("3D Model (OBJ)", ExportTarget::Model),
                    ] {
                        if ui.add_enabled(has_selection, egui::Button::new(label)).clicked() {
                            self.export_selected(target);
                            ui.close();
                        }
                    }
                });

                if ui.button("Reset View").clicked() {
                    self.canvas.reset();
                }
            });
        });

        let zoom = self.canvas.camera.total_zoom();
        let status = self.status_message.clone();
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Zoom {:.0}%", zoom * 100.0));
                    ui.separator();
                    ui.label(format!("Projects: {}", self.store.len()));
                });
            });
        });

        egui::SidePanel::left("projects")
            .default_width(220.0)
            .show(ctx, |ui| self.project_list(ui));

        // 每帧重新解码和投影
        let projection = self.selected.and_then(|i| self.store.get(i)).map(|p| p.projection());
        let style = self.exporter.style;

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| match projection {
                None => {
                    ui.centered_and_justified(|ui| ui.label("Select a project"));
                }
                Some(projection) => self.canvas.show(ui, projection.as_ref(), &style),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::math::Matrix4;
    use floorplan_core::scan::Wall;

    fn write_scan(dir: &std::path::Path) -> PathBuf {
        let room = RoomScan::new(vec![Wall::new(2.0, 2.4, Matrix4::identity())]);
        let path = dir.join("scan.json");
        std::fs::write(&path, serde_json::to_vec(&room).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_import_adds_project_and_selects_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = FloorPlanApp::default();
        app.new_property_type = PropertyType::Townhouse;
        app.new_address = " 5 Oak Ave ".to_string();

        app.start_import(write_scan(dir.path()));
        assert!(app.pending_capture.is_some());
        app.poll_capture();

        assert!(app.pending_capture.is_none());
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.selected, Some(0));
        let project = app.store.get(0).unwrap();
        assert_eq!(project.address, "5 Oak Ave");
        assert_eq!(project.property_type, PropertyType::Townhouse);
        assert!(app.new_address.is_empty());
    }

    #[test]
    fn test_import_of_invalid_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        std::fs::write(&path, b"{").unwrap();

        let mut app = FloorPlanApp::default();
        app.start_import(path);

        assert!(app.pending_capture.is_none());
        assert!(app.status_message.starts_with("Import failed"));
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_remove_marked_projects() {
        let room = RoomScan::default();
        let mut app = FloorPlanApp::default();
        for address in ["a", "b", "c"] {
            app.store.add_project(PropertyType::House, address, &room).unwrap();
        }
        app.marked = [0, 2].into_iter().collect();

        app.remove_marked();

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.get(0).unwrap().address, "b");
        assert!(app.marked.is_empty());
    }
}
