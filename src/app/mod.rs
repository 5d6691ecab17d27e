use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use impact_graph::entity::{DataFile, Entity, parse_data_file, read_data_file};
use impact_graph::layout::{
    CancelToken, FixedStepClock, ForceConfig, FrameScheduler, GraphController, GraphKind,
    TuningOverrides,
};

mod graph;
mod render_utils;
mod ui;

const BUNDLED_DATA: &str = include_str!("../../demos/impact.json");

#[derive(Clone, Debug)]
pub enum DataSource {
    Bundled,
    File(PathBuf),
}

impl DataSource {
    fn describe(&self) -> String {
        match self {
            Self::Bundled => "bundled demo data".to_owned(),
            Self::File(path) => path.display().to_string(),
        }
    }

    fn load(&self) -> anyhow::Result<DataFile> {
        match self {
            Self::Bundled => parse_data_file(BUNDLED_DATA),
            Self::File(path) => read_data_file(path),
        }
    }
}

pub struct ImpactGraphApp {
    source: DataSource,
    initial_kind: GraphKind,
    tuning: TuningOverrides,
    state: AppState,
    reload_rx: Option<Receiver<Result<DataFile, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<DataFile, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    data: DataFile,
    kind: GraphKind,
    tuning: TuningOverrides,
    controller: GraphController,
    /// Slider state; pushed into the controller when changed.
    forces: ForceConfig,
    /// Written by the controller's click handler, read by the details panel.
    selected: Rc<RefCell<Option<Entity>>>,
    clock: FixedStepClock,
    last_container: Vec2,
    show_zones: bool,
    show_labels: bool,
}

/// Frames requested by the layout loop become egui repaints.
struct RepaintScheduler<'a> {
    ctx: &'a Context,
}

impl FrameScheduler for RepaintScheduler<'_> {
    fn request_step(&mut self, token: &CancelToken) {
        if !token.is_cancelled() {
            self.ctx.request_repaint();
        }
    }
}

impl ImpactGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: DataSource,
        initial_kind: GraphKind,
        tuning: TuningOverrides,
    ) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            initial_kind,
            tuning,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: DataSource) -> Receiver<Result<DataFile, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source.load().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: DataSource) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(&self, ctx: &Context, data: DataFile, kind: GraphKind) -> AppState {
        let mut scheduler = RepaintScheduler { ctx };
        AppState::Ready(Box::new(ViewModel::new(
            data,
            kind,
            self.tuning,
            &mut scheduler,
        )))
    }
}

impl eframe::App for ImpactGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(data)) => transition = Some(Ok(data)),
                    Ok(Err(error)) => transition = Some(Err(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Loading {}...", self.source.describe()));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load network data");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = Self::start_load(self.source.clone());
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                let source = self.source.describe();
                model.show(ctx, &source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            ctx.request_repaint();
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            let kind = match &self.state {
                AppState::Ready(model) => model.kind,
                _ => self.initial_kind,
            };
            self.reload_rx = None;
            self.state = match result {
                Ok(data) => self.ready(ctx, data, kind),
                Err(error) => AppState::Error(error),
            };
        }
    }
}
