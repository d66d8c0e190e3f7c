use std::process::Command;

/// Capture the `rustc` release this crate is compiled with so the runtime
/// snapshot can report it (e.g. `1.85.0` or `1.87.0-nightly`).
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RUSTC");

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| {
            // "rustc 1.85.0 (4d91de4e4 2025-02-17)" → "1.85.0"
            String::from_utf8_lossy(&output.stdout)
                .split_whitespace()
                .nth(1)
                .map(str::to_string)
        })
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=ERS_RUSTC_VERSION={version}");
}
