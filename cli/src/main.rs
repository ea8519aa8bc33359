use clap::Parser;
use clap_derive::{Parser, Subcommand};
use config::{Settings, load_env_file};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use anyhow::Context;
use mediakit::api::{format_duration, format_size};
use mediakit::descriptor::VideoDescriptor;
use mediakit::download::{IMAGE_EXTENSION, VIDEO_EXTENSION, download};
use mediakit::{
    AssetId, FilePayload, HostedBackend, MediaBackend, MediaPipeline, ProfileCatalog,
    RenderOutcome, VideoMetadata,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Derive social-ready assets from uploaded media", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(long, short)]
    tracing: bool,

    /// Base URL of the ingestion API
    #[arg(long, env = "MEDIAKIT_API_URL")]
    api_url: Option<String>,

    /// Base URL for derived-asset delivery
    #[arg(long, env = "MEDIAKIT_DELIVERY_URL")]
    delivery_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available output profiles
    Profiles,

    /// Upload an image and download it reshaped for a profile
    Image {
        file: PathBuf,

        /// Output profile; defaults to the first catalog entry
        #[arg(long)]
        profile: Option<String>,

        /// Directory the derived file is saved into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    #[command(subcommand)]
    Video(VideoCommand),
}

#[derive(Subcommand, Debug)]
enum VideoCommand {
    /// Upload a video for compression (70 MiB limit)
    Upload {
        file: PathBuf,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List uploaded videos with their compression results
    List {
        /// Also print thumbnail, preview and full delivery URLs
        #[arg(long)]
        urls: bool,
    },

    /// Download the full-resolution rendition of an uploaded video
    Download {
        public_id: String,

        /// Directory the file is saved into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env_file();
    let args = Args::parse();

    if args.tracing {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let mut settings = Settings::load();
    if let Some(url) = args.api_url {
        settings.api_base_url = url;
    }
    if let Some(url) = args.delivery_url {
        settings.delivery_base_url = url;
    }

    let backend = HostedBackend::new(&settings.api_base_url, &settings.delivery_base_url);
    let catalog = ProfileCatalog::social_formats();

    match args.command {
        Command::Profiles => {
            for (index, name) in catalog.names().enumerate() {
                if index == 0 {
                    println!("{} (default)", name);
                } else {
                    println!("{}", name);
                }
            }
        }
        Command::Image { file, profile, out } => {
            run_image_flow(backend, catalog, &file, profile, &out).await?;
        }
        Command::Video(command) => match command {
            VideoCommand::Upload {
                file,
                title,
                description,
            } => run_video_upload(backend, catalog, &file, title, description).await?,
            VideoCommand::List { urls } => run_video_list(&backend, urls).await?,
            VideoCommand::Download { public_id, out } => {
                run_video_download(&backend, public_id, &out).await?
            }
        },
    }

    Ok(())
}

/// Upload, derive for one profile, download: the whole image flow.
async fn run_image_flow(
    backend: HostedBackend,
    catalog: ProfileCatalog,
    file: &PathBuf,
    profile: Option<String>,
    out: &PathBuf,
) -> anyhow::Result<()> {
    let profile_name = match profile {
        Some(name) => name,
        None => {
            catalog
                .default_profile()
                .context("profile catalog is empty")?
                .name
                .clone()
        }
    };

    let payload = FilePayload::from_path(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut pipeline = MediaPipeline::new(backend, catalog);

    println!(
        "Uploading {} ({})...",
        payload.file_name(),
        format_size(payload.size_bytes())
    );
    let asset_id = pipeline.submit_image(&payload).await?;
    println!("Uploaded as {}", asset_id);

    println!("Deriving \"{}\"...", profile_name);
    let pending = pipeline.select_profile(&profile_name)?;
    match pipeline.resolve(&pending).await {
        RenderOutcome::Ready(derived) => {
            let path = download(
                pipeline.backend(),
                &derived.url,
                &derived.profile_name,
                IMAGE_EXTENSION,
                out,
            )
            .await?;
            println!("Saved {}", path.display());
        }
        RenderOutcome::Failed(err) => {
            // Scoped to this preview; rerun with another profile.
            eprintln!("Preview not available: {}", err);
        }
        RenderOutcome::Superseded => {}
    }

    Ok(())
}

async fn run_video_upload(
    backend: HostedBackend,
    catalog: ProfileCatalog,
    file: &PathBuf,
    title: String,
    description: String,
) -> anyhow::Result<()> {
    let payload = FilePayload::from_path(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let meta = VideoMetadata {
        title,
        description,
        original_size: payload.size_bytes(),
    };

    let mut pipeline = MediaPipeline::new(backend, catalog);
    println!(
        "Uploading {} ({})...",
        payload.file_name(),
        format_size(payload.size_bytes())
    );
    let asset_id = pipeline.submit_video(&payload, meta).await?;
    println!("Uploaded as {}", asset_id);
    println!("Compression runs in the background; check `video list` for results.");

    Ok(())
}

async fn run_video_list(backend: &HostedBackend, urls: bool) -> anyhow::Result<()> {
    let videos = backend.list_videos().await?;
    if videos.is_empty() {
        println!("No videos uploaded yet.");
        return Ok(());
    }

    for video in videos {
        println!("{}  [{}]", video.title, video.public_id);
        if !video.description.is_empty() {
            println!("  {}", video.description);
        }
        println!(
            "  original {}  compressed {}  saved {}%",
            format_size(video.original_size),
            format_size(video.compressed_size),
            video.compression_percentage()
        );
        println!("  duration {}", format_duration(video.duration));
        if urls {
            let id = AssetId::new(video.public_id.clone());
            let delivery = backend.delivery();
            println!("  thumbnail {}", VideoDescriptor::thumbnail(&id).url(delivery));
            println!("  preview   {}", VideoDescriptor::preview(&id).url(delivery));
            println!("  full      {}", VideoDescriptor::full(&id).url(delivery));
        }
    }

    Ok(())
}

async fn run_video_download(
    backend: &HostedBackend,
    public_id: String,
    out: &PathBuf,
) -> anyhow::Result<()> {
    let id = AssetId::new(public_id.clone());
    let url = VideoDescriptor::full(&id).url(backend.delivery());

    // Name the file from the uploaded title when the read path knows it.
    let title = backend
        .list_videos()
        .await
        .ok()
        .and_then(|videos| videos.into_iter().find(|v| v.public_id == public_id))
        .map(|v| v.title)
        .unwrap_or(public_id);

    let path = download(backend, &url, &title, VIDEO_EXTENSION, out).await?;
    println!("Saved {}", path.display());

    Ok(())
}
