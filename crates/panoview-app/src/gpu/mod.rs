pub mod camera;
pub mod context;
pub mod panorama;
pub mod sphere;

pub use context::GpuContext;
pub use panorama::PanoramaRenderer;
