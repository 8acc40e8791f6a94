//! # Voxel Sandbox Entry Point
//!
//! Calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- --frames 600 --seed 7
//! ```

fn main() {
    if let Err(error) = voxel_sandbox::run() {
        eprintln!("voxel-sandbox: {error}");
        std::process::exit(1);
    }
}
