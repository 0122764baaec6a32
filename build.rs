use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // Askama reads templates at compile time; without explicit cargo hints a
    // template edit leaves a stale binary behind during dev.
    emit_rerun_for_templates(Path::new("templates"));

    // Dev marker so the startup log shows which binary is actually running.
    let build_id = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rustc-env=SCANSTATION_BUILD_ID={}", build_id);
}

fn emit_rerun_for_templates(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            emit_rerun_for_templates(&path);
        } else if path.extension().and_then(|s| s.to_str()) == Some("html") {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}
