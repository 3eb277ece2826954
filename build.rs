//! Build script for fileprog
//!
//! Embeds build-time information (git commit, build timestamp) shown by
//! `fileprog --version`.

fn main() {
    shadow_rs::ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build info");
}
