#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), winit::error::EventLoopError> {
    tetra_demo::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
