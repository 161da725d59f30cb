//! # Voxel World Entry Point
//!
//! Runs the engine headless for a fixed number of frames and logs what it built.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- config.json
//! ```

fn main() {
    voxel_world::run();
}
