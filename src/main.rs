use clap::Parser;
use std::{
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use docview::{
    access_log::{AccessLog, RejectReason},
    files::FileRoot,
    launch::{bind_with_recovery, open_browser, validate_target, viewer_url},
    server,
};

// --- Configuration ---
#[derive(Parser, Debug)]
#[command(author, version, about = "Browse and preview text documents in the browser", long_about = None)]
struct Args {
    /// A text file to open right away; its directory becomes the root
    /// unless --root-dir is given
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// The root directory to serve files from [default: .]
    #[arg(short, long, value_name = "DIR")]
    root_dir: Option<PathBuf>,

    /// The TCP port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The address to bind to
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Do not open a browser window
    #[arg(long)]
    no_open: bool,

    /// Do not stop another process already holding the port
    #[arg(long)]
    no_reclaim: bool,

    /// Where to append the JSON-lines access log [default: ~/.sdv/access.jsonl]
    #[arg(long, value_name = "PATH")]
    access_log: Option<PathBuf>,
}

// --- Main Application ---
#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("docview=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let access_log = args
        .access_log
        .clone()
        .or_else(AccessLog::default_path)
        .map(AccessLog::new);

    let target = args
        .file
        .as_deref()
        .map(|file| check_target(file, access_log.as_ref()));

    let root_dir = args
        .root_dir
        .clone()
        .or_else(|| target.as_ref().and_then(|t| t.parent().map(Path::to_path_buf)))
        .unwrap_or_else(|| PathBuf::from("."));

    let files = match FileRoot::open(&root_dir).await {
        Ok(files) => files,
        Err(e) => fail(&format!(
            "Failed to open root directory '{}': {}",
            root_dir.display(),
            e
        )),
    };

    let open_path = target.as_ref().and_then(|t| match t.strip_prefix(files.path()) {
        Ok(rel) => Some(rel.to_string_lossy().replace('\\', "/")),
        Err(_) => {
            warn!(
                "'{}' is outside the root '{}', not opening it",
                t.display(),
                files.path().display()
            );
            None
        }
    });

    let bind_addr = SocketAddr::new(args.host, args.port);
    let listener = match bind_with_recovery(bind_addr, !args.no_reclaim).await {
        Ok(l) => l,
        Err(e) => fail(&format!("Failed to bind to address {}: {}", bind_addr, e)),
    };
    let port = listener.local_addr().map(|a| a.port()).unwrap_or(args.port);
    let url = viewer_url(port, open_path.as_deref());

    info!("Serving files from: {}", files.path().display());
    info!("Doc Viewer running at {}", url);

    if !args.no_open {
        open_browser(&url);
    }

    if let Err(e) = axum::serve(listener, server::router(files)).await {
        fail(&format!("Server error: {}", e));
    }
}

/// Validates the FILE argument, recording the outcome in the access log.
/// Exits when the file is missing or not previewable.
fn check_target(file: &Path, access_log: Option<&AccessLog>) -> PathBuf {
    match validate_target(file) {
        Ok(path) => {
            if let Some(log) = access_log {
                log.open(&path);
            }
            path
        }
        Err(reason) => {
            let shown = std::path::absolute(file).unwrap_or_else(|_| file.to_path_buf());
            if let Some(log) = access_log {
                log.reject(&shown, reason);
            }
            match reason {
                RejectReason::NotFound => fail(&format!("File not found: {}", shown.display())),
                RejectReason::Unsupported => {
                    fail(&format!("Unsupported file type: {}", shown.display()))
                }
            }
        }
    }
}

fn fail(message: &str) -> ! {
    error!("{}. Exiting.", message);
    eprintln!("Error: {}", message);
    std::process::exit(1);
}
