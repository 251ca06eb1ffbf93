use std::env;
use std::path::Path;
use std::process::Command;

fn main() {
    // Track git HEAD only when it exists; a missing path would rerun on every build
    if Path::new(".git/HEAD").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
    }
    println!("cargo:rerun-if-env-changed=LATENCY_REPORT_BUILD_VERSION");

    let version = env::var("LATENCY_REPORT_BUILD_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap_or_default());

    let git_commit = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| {
        println!("cargo:warning=Unable to determine git commit");
        "unknown".to_string()
    });

    let git_tree_state = match git(&["status", "--porcelain"]) {
        Some(status) if status.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };

    let now = chrono::Utc::now();

    println!("cargo:rustc-env=LATENCY_REPORT_VERSION={}", version);
    println!("cargo:rustc-env=LATENCY_REPORT_GIT_COMMIT={}", git_commit);
    println!("cargo:rustc-env=LATENCY_REPORT_GIT_TREE_STATE={}", git_tree_state);
    println!(
        "cargo:rustc-env=LATENCY_REPORT_BUILD_DATE={}",
        now.format("%Y-%m-%d")
    );
    println!(
        "cargo:rustc-env=LATENCY_REPORT_BUILD_TIME={}",
        now.format("%H:%M:%S")
    );
}

/// Run a git command and return its trimmed stdout, or None when git is unavailable
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
