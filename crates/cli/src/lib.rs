mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doc_annotator_core::{
    Annotation, AnnotationId, AnnotationStats, DocumentId, LayerConfig, PaletteColor, Scale,
};
use doc_annotator_store::{
    AnnotationService, AnnotationStore, GraphqlService, MemoryService, StoreConfig,
};
use doc_annotator_ui::{
    AnnotationLayer, Effect, LayerProps, OverlayRenderer, OverlayTheme, RenderView, Scene,
    ToolSelection,
};
use script::{parse_tool, Script, Step};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "doc-annotator")]
#[command(about = "Document annotation overlay tools")]
pub struct Cli {
    /// Overlay settings file (defaults to the user config, then env overrides)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render one page of annotations to a JSON draw-command scene.
    Render {
        #[arg(value_name = "ANNOTATIONS")]
        annotations: PathBuf,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
        #[arg(long, default_value_t = 612.0)]
        page_width: f32,
        #[arg(long, default_value_t = 792.0)]
        page_height: f32,
        #[arg(long)]
        selected: Option<String>,
        #[arg(long)]
        hovered: Option<String>,
    },
    /// Run an event script against an in-memory store and print the outcome.
    Replay {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
        /// Annotations already stored before the script starts
        #[arg(long, value_name = "FILE")]
        annotations: Option<PathBuf>,
    },
    /// Fetch a document's annotations from the GraphQL service.
    List {
        #[arg(value_name = "DOCUMENT_ID")]
        document: String,
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    effects: Vec<Effect>,
    failures: Vec<String>,
    annotations: Vec<Annotation>,
    stats: AnnotationStats,
    scene: Scene,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    document_id: DocumentId,
    annotations: Vec<Annotation>,
    stats: AnnotationStats,
}

/// Log to stderr; stdout carries command output only
pub fn init_tracing() {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,doc_annotator=debug"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    // A second init (tests calling run repeatedly) is harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Render {
            annotations,
            page,
            scale,
            page_width,
            page_height,
            selected,
            hovered,
        } => {
            let config = load_layer_config(cli.config.as_deref())?;
            let scale = Scale::new(scale).context("invalid --scale")?;
            let annotations = read_annotations(&annotations)?;
            let selected = selected.map(AnnotationId::new);
            let hovered = hovered.map(AnnotationId::new);

            let page_annotations: Vec<&Annotation> =
                annotations.iter().filter(|a| a.page_number == page).collect();
            let tool = ToolSelection::default();
            let view = RenderView {
                annotations: &page_annotations,
                scale,
                surface: doc_annotator_core::page_surface_size(page_width, page_height, scale),
                hovered: hovered.as_ref(),
                selected: selected.as_ref(),
                draft: None,
                tool: &tool,
            };
            let scene = OverlayRenderer::new(config, OverlayTheme::default()).render(&view);
            print_json(&scene)
        }
        Commands::Replay {
            script,
            annotations,
        } => {
            let config = load_layer_config(cli.config.as_deref())?;
            let seed = match annotations {
                Some(path) => read_annotations(&path)?,
                None => Vec::new(),
            };
            let script = read_script(&script)?;
            let output = runtime()?.block_on(replay(script, seed, config))?;
            print_json(&output)
        }
        Commands::List {
            document,
            endpoint,
            page,
        } => {
            let mut store_config = StoreConfig::load().context("failed to load store config")?;
            if let Some(endpoint) = endpoint {
                store_config = store_config.with_endpoint(endpoint);
            }
            let service = GraphqlService::new(&store_config);
            let output = runtime()?.block_on(list(service, DocumentId::new(document), page))?;
            print_json(&output)
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn replay(
    script: Script,
    seed: Vec<Annotation>,
    config: LayerConfig,
) -> Result<ReplayOutput> {
    let document_id = DocumentId::new(script.document_id.clone());
    let store = AnnotationStore::new(MemoryService::with_annotations(seed), document_id.clone());
    store.refresh().await?;

    let color = script
        .color
        .clone()
        .unwrap_or_else(|| PaletteColor::default().hex().to_string());
    let mut props = LayerProps::new(document_id, script.page_width, script.page_height);
    props.page_number = script.page;
    props.scale = Scale::new(script.scale).context("invalid script scale")?;
    props.tool = ToolSelection::new(parse_tool(script.tool.as_deref())?, color);

    let mut layer = AnnotationLayer::new(props, config);
    layer.set_annotations(store.annotations());

    let mut effects = Vec::new();
    let mut failures = Vec::new();
    tracing::debug!(steps = script.events.len(), "replaying script");

    for (index, step) in script.events.iter().enumerate() {
        let produced = match step {
            Step::Tool { tool, color } => {
                let mut selection = layer.props().tool.clone();
                if tool.is_some() {
                    selection = selection.with_tool(parse_tool(tool.as_deref())?);
                }
                if let Some(color) = color {
                    selection = selection.with_color(color.clone());
                }
                layer.set_tool(selection)
            }
            Step::Page { number } => layer.set_page(*number),
            Step::Zoom { scale } => {
                let scale = Scale::new(*scale)
                    .with_context(|| format!("invalid zoom at step {index}"))?;
                layer.set_scale(scale);
                Vec::new()
            }
            other => match other.to_event()? {
                Some(event) => layer.handle(&event),
                None => Vec::new(),
            },
        };

        for effect in produced {
            if let Err(error) = apply_effect(&store, &mut layer, &effect).await {
                tracing::warn!(step = index, %error, "effect failed");
                failures.push(format!("step {index}: {error}"));
            }
            effects.push(effect);
        }
        layer.set_annotations(store.annotations());
    }

    Ok(ReplayOutput {
        effects,
        failures,
        annotations: store.annotations(),
        stats: store.stats(),
        scene: layer.scene().clone(),
    })
}

/// Carry out one controller effect the way a host page would
async fn apply_effect<S: AnnotationService>(
    store: &AnnotationStore<S>,
    layer: &mut AnnotationLayer,
    effect: &Effect,
) -> doc_annotator_store::Result<()> {
    match effect {
        Effect::Create { input } => store.create(input.clone()).await.map(|_| ()),
        Effect::Update { id, patch } => store.update(id, patch.clone()).await.map(|_| ()),
        Effect::Delete { id } => store.delete(id).await,
        Effect::SetTool { tool } => {
            let selection = layer.props().tool.clone().with_tool(*tool);
            layer.set_tool(selection);
            Ok(())
        }
        Effect::Select { .. } | Effect::SetCursor { .. } | Effect::Discarded { .. } => Ok(()),
    }
}

async fn list<S: AnnotationService>(
    service: S,
    document_id: DocumentId,
    page: Option<u32>,
) -> Result<ListOutput> {
    let store = AnnotationStore::new(service, document_id.clone());
    store
        .refresh()
        .await
        .with_context(|| format!("failed to list annotations for {document_id}"))?;

    let annotations = match page {
        Some(page) => store.page(page),
        None => store.annotations(),
    };
    Ok(ListOutput {
        document_id,
        annotations,
        stats: store.stats(),
    })
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn load_layer_config(path: Option<&Path>) -> Result<LayerConfig> {
    match path {
        Some(path) => LayerConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => LayerConfig::load().context("failed to load layer config"),
    }
}

fn read_annotations(path: &Path) -> Result<Vec<Annotation>> {
    let text = read_file(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid annotations file {}", path.display()))
}

fn read_script(path: &Path) -> Result<Script> {
    let text = read_file(path)?;
    serde_json::from_str(&text).with_context(|| format!("invalid script {}", path.display()))
}

fn read_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        anyhow::bail!("file does not exist: {}", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
