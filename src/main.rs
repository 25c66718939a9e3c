//! CLI entry point for lectern

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern::commands::list::ListOptions;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(version)]
#[command(about = "Course, lecture and slide pages from a directory of documents", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site with a sample course
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new lecture, assignment, practice or course
    New {
        /// Course directory name
        course: String,

        /// Title of the new document (lecture name for assignment/practice)
        title: String,

        /// Kind of document (lecture, assignment, practice, course)
        #[arg(short, long, default_value = "lecture")]
        kind: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the public folder
    Clean,

    /// List courses, lectures or slides
    List {
        /// Type of content to list (courses, lectures, slides)
        #[arg(default_value = "courses")]
        r#type: String,

        /// Course to list lectures or slides of
        #[arg(long)]
        course: Option<String>,

        /// Lecture to list slides of
        #[arg(long)]
        lecture: Option<String>,

        /// Include hidden courses and lectures
        #[arg(short, long)]
        all: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "lectern=debug,tower_http=debug,info"
    } else {
        "lectern=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            lectern::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New {
            course,
            title,
            kind,
        } => {
            let site = lectern::Site::new(&base_dir)?;
            tracing::info!("Creating new {} in {}: {}", kind, course, title);
            lectern::commands::new::run(&site, &course, &title, Some(&kind))?;
        }

        Commands::Generate => {
            let site = lectern::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate().await?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip, open } => {
            let site = lectern::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            lectern::server::start(&site, &ip, port, open).await?;
        }

        Commands::Clean => {
            let site = lectern::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List {
            r#type,
            course,
            lecture,
            all,
        } => {
            let site = lectern::Site::new(&base_dir)?;
            let options = ListOptions {
                course,
                lecture,
                all,
            };
            lectern::commands::list::run(&site, &r#type, &options)?;
        }

        Commands::Version => {
            println!("lectern version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
