//! Build script
//!
//! Embeds the build timestamp so the status tool can report which binary is
//! actually running.

fn main() {
    println!("cargo:rerun-if-changed=src");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    println!("cargo:rustc-env=TDEE_TRACKER_BUILD_TIMESTAMP={}", timestamp);
}
