use anyhow::Context;
use civic_atoms::capability::{Capability, PermissionPlatform};
use civic_atoms::location::LocationFix;
use civic_atoms::reports::Priority;
use civic_shared::adapters::{FileCamera, FileGallery, FixedPosition, StaticGeocoder, StaticPermissions};
use civic_shared::{telemetry, FsImageStore, JsonFileSubmission, StdoutSubmission, WorkflowConfig};
use clap::{Parser, ValueEnum};
use report_block::{Collaborators, ReportSubmission, ReportWorkflow, WorkflowSignal};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    Camera,
    Gallery,
}

/// Compose one complaint report from local inputs and print its payload
#[derive(Debug, Parser)]
#[command(name = "civic-report", version)]
struct Cli {
    /// Photo to attach
    #[arg(long)]
    image: PathBuf,

    /// Attach the photo as a camera capture or a gallery pick
    #[arg(long, value_enum, default_value_t = Source::Gallery)]
    source: Source,

    #[arg(long)]
    title: String,

    #[arg(long)]
    description: String,

    /// high, medium or low
    #[arg(long, default_value = "high")]
    priority: Priority,

    /// Overrides the generated timestamp
    #[arg(long)]
    timestamp: Option<String>,

    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Address lines the geocoder should answer with (best match first)
    #[arg(long = "address-line")]
    address_lines: Vec<String>,

    /// Manual address; skips the geocoded one
    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    deny_location: bool,

    #[arg(long)]
    deny_camera: bool,

    /// Append the payload to this file instead of printing it
    #[arg(long)]
    out: Option<PathBuf>,

    /// Where camera captures are written (overrides REPORT_CAPTURE_DIR)
    #[arg(long)]
    capture_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing("info");

    let cli = Cli::parse();
    let mut config = WorkflowConfig::from_env();
    if let Some(dir) = &cli.capture_dir {
        config.capture_dir = dir.clone();
    }

    let workflow = ReportWorkflow::new(collaborators(&cli, &config), config.workflow_options());
    let mut signals = workflow.subscribe();
    tokio::spawn(async move {
        while let Ok(signal) = signals.recv().await {
            log_signal(&signal);
        }
    });

    workflow.start().await?.finished().await;

    let attached = match cli.source {
        Source::Camera => workflow.capture_photo().await,
        Source::Gallery => workflow.pick_photo().await,
    }
    .with_context(|| format!("could not attach {}", cli.image.display()))?;
    if !attached {
        anyhow::bail!("no photo was attached from {}", cli.image.display());
    }

    workflow.set_title(cli.title.as_str()).await?;
    workflow.set_description(cli.description.as_str()).await?;
    workflow.set_priority(cli.priority).await?;
    if let Some(timestamp) = &cli.timestamp {
        workflow.set_timestamp(timestamp.as_str()).await?;
    }
    if let Some(address) = &cli.address {
        workflow.set_address(address.as_str()).await?;
    }

    let payload = workflow
        .submit()
        .await
        .context("report could not be submitted")?;
    tracing::info!("✅ Report '{}' ready ({} chars of image data)", payload.title(), payload.image_data().len());

    workflow.close().await;
    Ok(())
}

fn collaborators(cli: &Cli, config: &WorkflowConfig) -> Collaborators {
    let permissions: Arc<dyn PermissionPlatform> = Arc::new(StaticPermissions::new(HashMap::from([
        (Capability::Camera, !cli.deny_camera),
        (Capability::Location, !cli.deny_location),
    ])));

    let fix = cli.lat.zip(cli.lon).map(|(latitude, longitude)| LocationFix {
        latitude,
        longitude,
    });
    let geocoder = if cli.address_lines.is_empty() {
        StaticGeocoder(None)
    } else {
        StaticGeocoder(Some(cli.address_lines.clone()))
    };

    let (camera_source, gallery_selection) = match cli.source {
        Source::Camera => (Some(cli.image.clone()), None),
        Source::Gallery => (None, Some(cli.image.clone())),
    };

    let submission: Arc<dyn ReportSubmission> = match &cli.out {
        Some(path) => Arc::new(JsonFileSubmission::new(path)),
        None => Arc::new(StdoutSubmission),
    };

    Collaborators {
        permissions,
        camera: Arc::new(FileCamera::new(camera_source)),
        gallery: Arc::new(FileGallery::new(gallery_selection)),
        store: Arc::new(FsImageStore::new(&config.capture_dir)),
        position: Arc::new(FixedPosition(fix)),
        geocoder: Arc::new(geocoder),
        submission,
    }
}

fn log_signal(signal: &WorkflowSignal) {
    match signal {
        WorkflowSignal::AddressUpdated { text } => tracing::info!("📍 Address: {}", text),
        WorkflowSignal::SubmitFailed { reason } => tracing::error!("❌ {}", reason),
        other => tracing::debug!("signal: {:?}", other),
    }
}
