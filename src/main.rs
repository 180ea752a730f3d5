mod app;
mod config;
mod data;
mod error;
mod processing;
mod render;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use app::ScatterApp;
use config::ChartConfig;
use data::record::Attribute;

/// Interactive scatter plot of state health and demographic data.
#[derive(Parser, Debug)]
#[command(name = "healthscatter", version)]
struct Args {
    /// CSV file to plot
    #[arg(short, long)]
    data: Option<PathBuf>,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Initial X attribute (poverty, age, income)
    #[arg(long)]
    x_axis: Option<Attribute>,
    /// Initial Y attribute (obesity, smokes, healthcare)
    #[arg(long)]
    y_axis: Option<Attribute>,
    /// Render the chart to an SVG or HTML file and exit without opening a window
    #[arg(long, value_name = "FILE")]
    export_svg: Option<PathBuf>,
}

impl Args {
    fn chart_config(&self) -> anyhow::Result<ChartConfig> {
        let mut config = match &self.config {
            Some(path) => ChartConfig::load(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => ChartConfig::default(),
        };
        if let Some(path) = &self.data {
            config.data_path = path.clone();
        }
        if let Some(x) = self.x_axis {
            config.initial_x = x;
        }
        if let Some(y) = self.y_axis {
            config.initial_y = y;
        }
        config.validate()?;
        Ok(config)
    }
}

fn export_headless(config: &ChartConfig, out: &std::path::Path) -> anyhow::Result<()> {
    let dataset = data::loader::load_csv(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    let chart = state::chart_state::ChartState::new(&dataset, config)?;
    let scene = render::scene::build_scene(&dataset, &chart, 0.0);
    render::svg::write_document(out, &scene, &chart.layout, config.theme, &config.container_id)
        .with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = args.chart_config()?;

    if let Some(out) = &args.export_svg {
        return export_headless(&config, out);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Health Scatter")
            .with_app_id(config.container_id.clone())
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Health Scatter",
        options,
        Box::new(|cc| Ok(Box::new(ScatterApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
