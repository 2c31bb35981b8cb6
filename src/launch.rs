//! Startup glue: validating a file given on the command line, reclaiming
//! a busy port and opening the browser.

use std::{
    io,
    net::SocketAddr,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::Duration,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::access_log::RejectReason;
use crate::classify::is_text_file;

/// Checks that `file` exists and is previewable text, returning its
/// absolute path.
pub fn validate_target(file: &Path) -> Result<PathBuf, RejectReason> {
    let absolute = file.canonicalize().map_err(|_| RejectReason::NotFound)?;
    let name = absolute
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if absolute.is_file() && is_text_file(&name) {
        Ok(absolute)
    } else {
        Err(RejectReason::Unsupported)
    }
}

/// The viewer address, optionally asking it to open `file` (relative to
/// the served root).
pub fn viewer_url(port: u16, file: Option<&str>) -> String {
    match file {
        Some(rel) => format!("http://localhost:{}/?open={}", port, urlencoding::encode(rel)),
        None => format!("http://localhost:{}/", port),
    }
}

/// Binds `addr`. When the port is taken and `reclaim` is set, whatever
/// holds it is stopped and the bind retried once after a second.
pub async fn bind_with_recovery(addr: SocketAddr, reclaim: bool) -> io::Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Err(e) if e.kind() == io::ErrorKind::AddrInUse && reclaim => {
            warn!("Port {} is already in use, stopping the existing process", addr.port());
            if !stop_port_holder(addr.port()).await {
                return Err(io::Error::new(
                    io::ErrorKind::AddrInUse,
                    format!(
                        "could not find the process holding port {}; free it manually",
                        addr.port()
                    ),
                ));
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
            info!("Retrying bind on {}", addr);
            TcpListener::bind(addr).await
        }
        other => other,
    }
}

/// Launches the platform browser on `url`. Failures are only logged.
pub fn open_browser(url: &str) {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };
    let spawned = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(e) = spawned {
        warn!("Failed to open browser for {}: {}", url, e);
    }
}

/// Stops every process listening on `port`; false when none was found.
async fn stop_port_holder(port: u16) -> bool {
    let pids = find_port_holders(port).await;
    if pids.is_empty() {
        return false;
    }
    for pid in pids {
        info!("Stopping existing process (PID: {})", pid);
        let status = if cfg!(target_os = "windows") {
            tokio::process::Command::new("taskkill")
                .args(["/F", "/PID"])
                .arg(pid.to_string())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
        } else {
            tokio::process::Command::new("kill")
                .arg("-9")
                .arg(pid.to_string())
                .status()
                .await
        };
        if let Err(e) = status {
            warn!("Failed to stop process {}: {}", pid, e);
        }
    }
    true
}

async fn find_port_holders(port: u16) -> Vec<u32> {
    let output = if cfg!(target_os = "windows") {
        tokio::process::Command::new("netstat").arg("-ano").output().await
    } else {
        tokio::process::Command::new("lsof")
            .arg("-ti")
            .arg(format!(":{}", port))
            .output()
            .await
    };
    match output {
        Ok(out) => {
            let stdout = String::from_utf8_lossy(&out.stdout);
            if cfg!(target_os = "windows") {
                parse_netstat_pids(&stdout, port)
            } else {
                parse_lsof_pids(&stdout)
            }
        }
        Err(e) => {
            warn!("Failed to look up the holder of port {}: {}", port, e);
            Vec::new()
        }
    }
}

fn parse_lsof_pids(stdout: &str) -> Vec<u32> {
    stdout
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect()
}

/// PIDs of `LISTENING` rows whose local address ends in `:port`.
fn parse_netstat_pids(stdout: &str, port: u16) -> Vec<u32> {
    let suffix = port.to_string();
    let mut pids: Vec<u32> = stdout
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 5 || parts[3] != "LISTENING" {
                return None;
            }
            if parts[1].rsplit(':').next() != Some(suffix.as_str()) {
                return None;
            }
            parts[4].parse().ok().filter(|&pid| pid != 0)
        })
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}
