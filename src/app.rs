use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::config::ChartConfig;
use crate::data::loader;
use crate::data::record::{Axis, Dataset};
use crate::error::LoadError;
use crate::processing::statistics::{self, AttributeStats};
use crate::render::scene::build_scene;
use crate::render::svg;
use crate::render::transition::Easing;
use crate::state::chart_state::ChartState;
use crate::state::interaction::{handle_label_click, LabelClick};
use crate::state::theme::Theme;
use crate::ui::chart_panel::{self, ChartAction};
use crate::ui::export;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What to do when a screenshot arrives.
enum PendingScreenshot {
    SaveFile,
    Clipboard,
}

/// Dataset load running on a background thread.
struct PendingLoad {
    path: PathBuf,
    result: Arc<Mutex<Option<Result<Dataset, LoadError>>>>,
}

/// The scatter-plot application.
pub struct ScatterApp {
    config: ChartConfig,
    dataset: Option<Dataset>,
    chart: Option<ChartState>,
    theme: Theme,
    /// An error message shown in the footer until dismissed.
    error_message: Option<String>,
    show_stats: bool,
    pending_load: Option<PendingLoad>,
    pending_screenshot: Option<PendingScreenshot>,
    /// Screen rect of the chart from the last frame, for screenshot cropping.
    last_chart_rect: Option<egui::Rect>,
}

impl ScatterApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ChartConfig) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.5));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(22.0));
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        ctx.set_style(style);
        ctx.set_visuals(config.theme.visuals());

        let mut app = Self {
            theme: config.theme,
            config,
            dataset: None,
            chart: None,
            error_message: None,
            show_stats: true,
            pending_load: None,
            pending_screenshot: None,
            last_chart_rect: None,
        };
        let path = app.config.data_path.clone();
        app.load_file(&path);
        app
    }

    /// Read a dataset on a background thread so the window stays responsive.
    fn load_file(&mut self, path: &Path) {
        let path_buf = path.to_path_buf();
        let result: Arc<Mutex<Option<Result<Dataset, LoadError>>>> = Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        let thread_path = path_buf.clone();
        std::thread::spawn(move || {
            let loaded = loader::load_csv(&thread_path);
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(loaded);
            }
        });

        tracing::info!("Loading dataset from {:?}", path_buf);
        self.pending_load = Some(PendingLoad { path: path_buf, result });
    }

    /// Install a finished load, if one is ready.
    fn poll_pending_load(&mut self) {
        let Some(pending) = &self.pending_load else {
            return;
        };
        let finished = pending.result.lock().ok().and_then(|mut slot| slot.take());
        let Some(result) = finished else {
            return;
        };
        let path = pending.path.clone();
        self.pending_load = None;

        match result {
            Ok(dataset) => {
                let chart = match &self.chart {
                    Some(previous) => {
                        ChartState::with_selection(&dataset, &self.config, previous.selection)
                    }
                    None => ChartState::new(&dataset, &self.config),
                };
                match chart {
                    Ok(chart) => {
                        self.chart = Some(chart);
                        self.dataset = Some(dataset);
                        self.error_message = None;
                    }
                    Err(e) => {
                        tracing::error!("Cannot chart {:?}: {e}", path);
                        self.error_message = Some(format!("Cannot chart dataset: {e}"));
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to load {:?}: {e}", path);
                self.error_message = Some(format!("Failed to load {}: {e}", path.display()));
            }
        }
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    /// Export the settled chart as SVG or HTML via a save dialog.
    fn export_document(&mut self) {
        let (Some(dataset), Some(chart)) = (&self.dataset, &self.chart) else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("scatter.svg")
            .add_filter("SVG Image", &["svg"])
            .add_filter("HTML Page", &["html"])
            .save_file()
        else {
            return;
        };

        let mut settled = chart.clone();
        settled.finish_transitions();
        let scene = build_scene(dataset, &settled, 0.0);
        if let Err(e) = svg::write_document(
            &path,
            &scene,
            &settled.layout,
            self.theme,
            &self.config.container_id,
        ) {
            tracing::error!("Export failed: {e}");
            self.error_message = Some(format!("Failed to export chart: {e}"));
        }
    }

    /// Handle a screenshot delivered by the viewport this frame.
    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        if self.pending_screenshot.is_none() {
            return;
        }
        let mut screenshot_image: Option<Arc<egui::ColorImage>> = None;
        ctx.input(|i| {
            for event in &i.raw.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    screenshot_image = Some(image.clone());
                }
            }
        });
        let Some(color_image) = screenshot_image else {
            return;
        };
        let Some(action) = self.pending_screenshot.take() else {
            return;
        };

        let captured =
            export::crop_screenshot(&color_image, self.last_chart_rect, ctx.pixels_per_point());
        let result = match action {
            PendingScreenshot::SaveFile => match rfd::FileDialog::new()
                .set_file_name("scatter.png")
                .add_filter("PNG Image", &["png"])
                .save_file()
            {
                Some(path) => export::save_png(&path, captured),
                None => Ok(()),
            },
            PendingScreenshot::Clipboard => export::copy_to_clipboard(captured),
        };
        if let Err(msg) = result {
            tracing::error!("{msg}");
            self.error_message = Some(msg);
        }
    }

    fn request_screenshot(&mut self, ctx: &egui::Context, action: PendingScreenshot) {
        self.pending_screenshot = Some(action);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }

    fn show_stats_panel(&self, ui: &mut egui::Ui) {
        let (Some(dataset), Some(chart)) = (&self.dataset, &self.chart) else {
            return;
        };
        ui.heading("Summary");
        ui.add_space(6.0);

        for axis in [Axis::X, Axis::Y] {
            let attribute = chart.selection.get(axis);
            match AttributeStats::compute(dataset, attribute) {
                Some(stats) => {
                    ui.label(egui::RichText::new(format!("{axis}: {}", stats.title())).strong());
                    egui::Grid::new(("stats", stats.attribute.column()))
                        .num_columns(2)
                        .striped(true)
                        .show(ui, |ui| {
                            for (name, value) in stats.rows() {
                                ui.label(name);
                                ui.label(value);
                                ui.end_row();
                            }
                        });
                }
                None => {
                    ui.label(egui::RichText::new(format!("{axis}: {}", attribute.axis_label())).strong());
                    ui.label(egui::RichText::new("No numeric values").weak());
                }
            }
            ui.add_space(8.0);
        }

        ui.separator();
        let r = statistics::pearson(dataset, chart.selection.x(), chart.selection.y());
        match r {
            Some(r) => ui.label(format!("Correlation (r): {r:.3}")),
            None => ui.label(egui::RichText::new("Correlation undefined").weak()),
        };
    }
}

impl eframe::App for ScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.theme.visuals());
        let now = ctx.input(|i| i.time);

        self.handle_screenshot(ctx);

        // Dropped CSV files replace the dataset.
        let dropped: Option<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .find(|p| {
                    p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
                })
        });
        if let Some(path) = dropped {
            self.load_file(&path);
        }

        self.poll_pending_load();
        if self.pending_load.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        // --- Header panel ---
        let mut open_file = false;
        let mut export_doc = false;
        let mut screenshot: Option<PendingScreenshot> = None;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Health Scatter");
                    ui.separator();

                    if ui.button("Open CSV").clicked() {
                        open_file = true;
                    }
                    let has_chart = self.chart.is_some();
                    if ui.add_enabled(has_chart, egui::Button::new("Export SVG")).clicked() {
                        export_doc = true;
                    }
                    if ui.add_enabled(has_chart, egui::Button::new("Save Image")).clicked() {
                        screenshot = Some(PendingScreenshot::SaveFile);
                    }
                    if ui.add_enabled(has_chart, egui::Button::new("Copy Image")).clicked() {
                        screenshot = Some(PendingScreenshot::Clipboard);
                    }

                    ui.separator();
                    if let Some(chart) = &mut self.chart {
                        egui::ComboBox::from_label("Easing")
                            .selected_text(chart.transition.easing.label())
                            .show_ui(ui, |ui| {
                                for easing in [Easing::Linear, Easing::QuadInOut, Easing::CubicInOut] {
                                    ui.selectable_value(
                                        &mut chart.transition.easing,
                                        easing,
                                        easing.label(),
                                    );
                                }
                            });
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme_label = format!("{} Mode", self.theme.toggle().label());
                        if ui.button(theme_label).clicked() {
                            self.theme = self.theme.toggle();
                        }
                        ui.toggle_value(&mut self.show_stats, "Summary");
                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        if open_file {
            self.open_file_dialog();
        }
        if export_doc {
            self.export_document();
        }
        if let Some(action) = screenshot {
            self.request_screenshot(ctx, action);
        }

        // --- Footer panel ---
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    match &self.dataset {
                        Some(ds) => {
                            ui.label(egui::RichText::new(format!("{} records", ds.len())).weak());
                            if let Some(source) = &ds.source {
                                ui.separator();
                                ui.label(egui::RichText::new(source.display().to_string()).weak());
                            }
                        }
                        None => {
                            ui.label(egui::RichText::new("No dataset").weak());
                        }
                    }

                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        if self.show_stats {
            egui::SidePanel::right("stats")
                .resizable(false)
                .default_width(220.0)
                .show(ctx, |ui| self.show_stats_panel(ui));
        }

        // --- Chart ---
        let mut clicked = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let (Some(dataset), Some(chart)) = (&self.dataset, &self.chart) else {
                ui.add_space(80.0);
                ui.vertical_centered(|ui| {
                    if self.pending_load.is_some() {
                        ui.spinner();
                        ui.label("Loading dataset...");
                    } else {
                        ui.heading("No dataset loaded");
                        ui.add_space(12.0);
                        ui.label(
                            egui::RichText::new("Click \"Open CSV\" or drop a CSV file here.").weak(),
                        );
                    }
                });
                return;
            };

            let scene = build_scene(dataset, chart, now);
            egui::ScrollArea::both().show(ui, |ui| {
                let (action, rect) = chart_panel::show_chart_panel(
                    ui,
                    &scene,
                    dataset,
                    &chart.selection,
                    &chart.layout,
                    self.theme,
                );
                self.last_chart_rect = Some(rect);
                if let ChartAction::SelectAttribute(attribute) = action {
                    clicked = Some(attribute);
                }
            });
            if !scene.settled {
                ctx.request_repaint();
            }
        });

        if let (Some(attribute), Some(dataset), Some(chart)) =
            (clicked, &self.dataset, &mut self.chart)
        {
            match handle_label_click(chart, dataset, attribute, now) {
                Ok(LabelClick::Changed { .. }) => ctx.request_repaint(),
                Ok(LabelClick::Unchanged) => {}
                Err(e) => {
                    tracing::warn!("Cannot switch axis: {e}");
                    self.error_message = Some(e.to_string());
                }
            }
        }

        if let Some(chart) = &mut self.chart {
            chart.tick(now);
        }
    }
}
