//! The KPI board window

use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui::{self, Context, Pos2, Rect};
use parking_lot::Mutex;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use kb_core::events::events::{DatasetLoaded, KpiDeleted, KpiSaved, TileManipulated};
use kb_core::{Dashboard, Dataset, JsonFileStore, KpiId, RegistryError};
use kb_data::DataError;
use kb_ui::{sidebar_form, Notice, Notices, SidebarAction};
use kb_views::{project_dashboard, CanvasEvent, KpiCanvas, TileDescription};

use crate::config::AppConfig;

/// Result of a background file read
type LoadResult = (String, Result<Dataset, DataError>);

/// Cache key for projected tiles
type TilesKey = ((u64, u64), Option<KpiId>);

pub struct KpiBoardApp {
    dashboard: Dashboard,
    config: AppConfig,

    /// Tokio runtime used for file reads
    runtime: tokio::runtime::Runtime,
    load_tx: UnboundedSender<LoadResult>,
    load_rx: UnboundedReceiver<LoadResult>,
    loading: bool,

    notices: Notices,
    canvas: KpiCanvas,
    tiles: Vec<TileDescription>,
    tiles_key: Option<TilesKey>,

    /// Last dashboard event, fed by the event bus
    status: Arc<Mutex<String>>,
}

impl KpiBoardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, runtime: tokio::runtime::Runtime) -> Self {
        kb_ui::apply_theme(&cc.egui_ctx, &config.theme);

        let store = JsonFileStore::new(config.storage_path.clone());
        info!("Using KPI storage at {:?}", config.storage_path);
        let dashboard = Dashboard::new(Box::new(store));

        let status = Arc::new(Mutex::new(format!("{} KPIs loaded", dashboard.registry().len())));
        subscribe_status(&dashboard, &status);

        let (load_tx, load_rx) = unbounded_channel();
        let palette = config.theme.palette();
        let canvas = KpiCanvas::new("kpi_canvas").with_colors(palette.canvas, palette.tile, palette.accent);

        Self {
            dashboard,
            config,
            runtime,
            load_tx,
            load_rx,
            loading: false,
            notices: Notices::new(),
            canvas,
            tiles: Vec::new(),
            tiles_key: None,
            status,
        }
    }

    /// Read and parse a file off the UI thread
    fn open_path(&mut self, ctx: &Context, path: PathBuf) {
        info!("Opening file: {:?}", path);
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let loader = self.config.loader.clone();
        self.spawn_load(ctx, label, move || kb_data::read_file(&path, &loader));
    }

    /// Parse the contents of a dropped file off the UI thread
    fn open_bytes(&mut self, ctx: &Context, name: String, bytes: Arc<[u8]>) {
        info!("Opening dropped file: {}", name);
        let loader = self.config.loader.clone();
        let file_name = name.clone();
        self.spawn_load(ctx, name, move || kb_data::load_file(&file_name, &bytes, &loader));
    }

    fn spawn_load<F>(&mut self, ctx: &Context, label: String, load: F)
    where
        F: FnOnce() -> Result<Dataset, DataError> + Send + 'static,
    {
        let tx = self.load_tx.clone();
        let ctx = ctx.clone();
        self.loading = true;

        self.runtime.spawn_blocking(move || {
            let result = load();
            if tx.send((label, result)).is_err() {
                warn!("Dropped a file load result; the window is closing");
            }
            ctx.request_repaint();
        });
    }

    /// Apply finished file loads
    fn poll_loads(&mut self) {
        while let Ok((label, result)) = self.load_rx.try_recv() {
            self.loading = false;
            match result {
                Ok(dataset) => {
                    let name = dataset.source_name().to_string();
                    let rows = dataset.row_count();
                    self.dashboard.load_dataset(dataset);
                    self.notices
                        .push(Notice::info("File loaded", format!("Loaded file: {} ({} rows)", name, rows)));
                }
                Err(e) => {
                    error!("Failed to load {}: {}", label, e);
                    self.notices
                        .push(Notice::error("Could not read file", format!("{}: {}", label, e)));
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let mut files = dropped.into_iter();
        let Some(file) = files.next() else {
            return;
        };
        if files.next().is_some() {
            warn!("Several files dropped; only {} is loaded", file.name);
        }

        if let Some(path) = file.path {
            self.open_path(ctx, path);
        } else if let Some(bytes) = file.bytes {
            self.open_bytes(ctx, file.name, bytes);
        } else {
            warn!("Dropped file {} has neither a path nor contents", file.name);
        }
    }

    fn handle_menu(&mut self, ctx: &Context) -> Rect {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open data file...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Data files", &["csv", "xlsx", "xls", "xlsb", "ods"])
                            .pick_file()
                        {
                            self.open_path(ctx, path);
                        }
                        ui.close_menu();
                    }

                    ui.separator();

                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                if self.loading {
                    ui.separator();
                    ui.spinner();
                    ui.label("Loading...");
                }
            });
        })
        .response
        .rect
    }

    fn handle_status_bar(&self, ctx: &Context) -> Rect {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status.lock().as_str());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let dataset = self.dashboard.dataset();
                    if dataset.is_empty() {
                        ui.weak("No data loaded");
                    } else {
                        ui.weak(format!("{} ({} rows)", dataset.source_name(), dataset.row_count()));
                    }
                });
            });
        })
        .response
        .rect
    }

    fn handle_sidebar(&mut self, ctx: &Context, modal_open: bool) {
        let title = self.dashboard.editor().title();
        let delete_visible = self.dashboard.editor().delete_visible();
        let columns = self.dashboard.columns();

        let action = egui::SidePanel::left("kpi_form")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                sidebar_form(ui, title, self.dashboard.form_mut(), &columns, delete_visible)
            })
            .inner;

        if modal_open {
            return;
        }
        match action {
            Some(SidebarAction::Save) => {
                if let Err(e) = self.dashboard.save() {
                    let title = match e {
                        RegistryError::NameRequired => "Invalid KPI",
                        _ => "Could not save KPI",
                    };
                    self.notices.push(Notice::error(title, e.to_string()));
                }
            }
            Some(SidebarAction::Delete) => {
                if let Err(e) = self.dashboard.delete() {
                    self.notices.push(Notice::error("Could not delete KPI", e.to_string()));
                }
            }
            None => {}
        }
    }

    /// Re-project tiles when KPIs, data or the selection changed
    fn refresh_tiles(&mut self) {
        let key = (self.dashboard.render_key(), self.dashboard.selection().cloned());
        if self.tiles_key.as_ref() == Some(&key) {
            return;
        }

        let dataset = self.dashboard.dataset();
        self.tiles = project_dashboard(self.dashboard.registry().iter(), &dataset, self.dashboard.selection());
        self.tiles_key = Some(key);
    }

    fn handle_canvas(&mut self, ctx: &Context, modal_open: bool) {
        self.refresh_tiles();

        let (bounds, events) = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas.show(ui, &self.tiles))
            .inner;
        self.dashboard.set_canvas_bounds(bounds);

        if modal_open || events.is_empty() {
            return;
        }

        for event in events {
            match event {
                CanvasEvent::Clicked(id) => {
                    self.dashboard.activate_tile(&id);
                }
                CanvasEvent::Manipulated(id, manipulation) => {
                    debug!("Tile {} manipulated: {:?}", id, manipulation);
                    if let Err(e) = self.dashboard.manipulate(&id, manipulation) {
                        self.notices.push(Notice::error("Could not move KPI", e.to_string()));
                    }
                }
                CanvasEvent::BackgroundClicked => self.dashboard.dismiss_selection(),
            }
        }
        ctx.request_repaint();
    }
}

impl eframe::App for KpiBoardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_loads();
        self.handle_dropped_files(ctx);

        let chrome = [self.handle_menu(ctx), self.handle_status_bar(ctx)];

        let modal_open = self.notices.show(ctx);
        self.handle_sidebar(ctx, modal_open);
        self.handle_canvas(ctx, modal_open);

        let click = ctx.input(|i| i.pointer.primary_clicked().then(|| i.pointer.interact_pos()).flatten());
        if !modal_open && click_in_chrome(click, &chrome) {
            self.dashboard.dismiss_selection();
        }
    }
}

/// A primary click on the menu or status bar counts as a click outside the
/// tiles and the form
fn click_in_chrome(click: Option<Pos2>, chrome: &[Rect]) -> bool {
    click.map_or(false, |pos| chrome.iter().any(|rect| rect.contains(pos)))
}

/// Mirror dashboard events into the status line
fn subscribe_status(dashboard: &Dashboard, status: &Arc<Mutex<String>>) {
    let bus = dashboard.event_bus();

    let line = status.clone();
    bus.subscribe_fn::<DatasetLoaded, _>(move |e| {
        *line.lock() = format!("Loaded {}: {} rows, {} columns", e.source_name, e.row_count, e.column_count);
    });

    let line = status.clone();
    bus.subscribe_fn::<KpiSaved, _>(move |e| {
        let verb = if e.created { "Created" } else { "Updated" };
        *line.lock() = format!("{} KPI {}", verb, e.id);
    });

    let line = status.clone();
    bus.subscribe_fn::<KpiDeleted, _>(move |e| {
        *line.lock() = format!("Deleted KPI {}", e.id);
    });

    let line = status.clone();
    bus.subscribe_fn::<TileManipulated, _>(move |e| {
        *line.lock() = format!("Moved KPI {}", e.id);
    });
}
