use chrono::Utc;
use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    // Short commit hash; "-dirty" plus build time when tracked files changed
    let build_hash = match git(&["describe", "--always", "--dirty=-dirty"]) {
        Some(desc) if desc.ends_with("-dirty") => {
            format!("{desc}-{}", Utc::now().format("%Y%m%d-%H%M%S"))
        }
        Some(desc) if !desc.is_empty() => desc,
        _ => "unknown".to_string(),
    };

    println!("cargo:rustc-env=BANDPORT_BUILD={build_hash}");

    // .git lives at the workspace root, two levels up
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}
