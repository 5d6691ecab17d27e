mod app;

use std::path::PathBuf;

use clap::Parser;
use impact_graph::layout::{GraphKind, TuningOverrides};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use app::{DataSource, ImpactGraphApp};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with `organisations`, `team` and/or `entities` arrays.
    /// The bundled demo data is used when omitted.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Graph shown first.
    #[arg(long, value_enum, default_value_t = GraphKind::Organisations)]
    graph: GraphKind,

    /// JSON file overriding force constants per graph kind.
    #[arg(long)]
    tuning: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let tuning = match args.tuning.as_deref().map(TuningOverrides::read) {
        Some(Ok(tuning)) => tuning,
        Some(Err(error)) => {
            warn!("{error:#}; using built-in tuning");
            TuningOverrides::default()
        }
        None => TuningOverrides::default(),
    };
    let source = args.data.map_or(DataSource::Bundled, DataSource::File);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "impact-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ImpactGraphApp::new(
                cc,
                source.clone(),
                args.graph,
                tuning,
            )))
        }),
    )
}
