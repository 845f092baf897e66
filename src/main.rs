use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use labelpress::fonts::NoFontSignal;
use labelpress::surface::{BrowserSurfaceHost, RecordingHost};
use labelpress::{Capturer, JsonFileStore, LabelPrinter, LabelScene, MemoryStore, PipelineConfig, SceneRegion};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "labelpress", version, about = "Render label scenes and print them at physical size")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Capture a scene and write the raster as PNG
    Render {
        #[command(flatten)]
        common: Common,
        /// Output PNG path
        #[arg(long)]
        out: PathBuf,
    },
    /// Capture a scene and write its print document without opening it
    Document {
        #[command(flatten)]
        common: Common,
        /// Output HTML path
        #[arg(long)]
        out: PathBuf,
    },
    /// Capture a scene and open it for printing in the default browser
    Print {
        #[command(flatten)]
        common: Common,
        /// Directory print documents are spooled to
        #[arg(long)]
        spool_dir: Option<PathBuf>,
        /// Command used to open the document (path is appended)
        #[arg(long)]
        opener: Option<String>,
    },
}

#[derive(Args)]
struct Common {
    /// Scene description (JSON)
    #[arg(long)]
    scene: PathBuf,
    /// Settings file holding labelWidth / labelHeight
    #[arg(long)]
    store: Option<PathBuf>,
    /// Raster pixels per logical pixel
    #[arg(long, default_value_t = 4)]
    supersample: u32,
    /// Delay between image load and the print call
    #[arg(long = "settle-ms", default_value_t = 250)]
    settle_ms: u64,
}

impl Common {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            supersample: self.supersample,
            settle_delay_ms: self.settle_ms,
            ..Default::default()
        }
    }

    fn store(&self) -> anyhow::Result<Arc<dyn labelpress::ConfigStore>> {
        let store: Arc<dyn labelpress::ConfigStore> = match &self.store {
            Some(path) => Arc::new(
                JsonFileStore::open(path).with_context(|| format!("reading settings {}", path.display()))?,
            ),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(store)
    }

    fn region(&self) -> anyhow::Result<SceneRegion> {
        let scene = LabelScene::from_json_file(&self.scene)
            .with_context(|| format!("loading scene {}", self.scene.display()))?;
        Ok(SceneRegion::new(scene))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Cmd::Render { common, out } => {
            let capturer = Capturer::new(&common.pipeline_config(), Arc::new(NoFontSignal))?;
            let mut region = common.region()?;
            let artifact = capturer.capture(&mut region).await?;
            std::fs::write(&out, &artifact.png_data).with_context(|| format!("writing {}", out.display()))?;
            println!("{} ({}x{})", out.display(), artifact.width, artifact.height);
        }
        Cmd::Document { common, out } => {
            let mut printer = LabelPrinter::new(
                common.pipeline_config(),
                Arc::new(NoFontSignal),
                common.store()?,
                RecordingHost::new(),
            )?;
            let mut region = common.region()?;
            let document = printer.render_document(&mut region).await?;
            std::fs::write(&out, document.html()).with_context(|| format!("writing {}", out.display()))?;
            let size = document.size();
            println!("{} ({}mm x {}mm)", out.display(), size.width_mm, size.height_mm);
        }
        Cmd::Print { common, spool_dir, opener } => {
            let mut host = match spool_dir {
                Some(dir) => BrowserSurfaceHost::new(dir),
                None => BrowserSurfaceHost::default(),
            };
            if let Some(cmd) = opener.as_deref() {
                host = host.with_opener(cmd);
            }
            let mut printer =
                LabelPrinter::new(common.pipeline_config(), Arc::new(NoFontSignal), common.store()?, host)?;
            let mut region = common.region()?;
            printer.print(&mut region).await.context("printing label")?;
        }
    }
    Ok(())
}
