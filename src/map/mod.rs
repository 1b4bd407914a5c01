mod camera;
mod geometry;
mod lod;
mod renderer;
mod scene;
mod texture;

pub use camera::{CameraConstraint, OrbitCamera};
pub use lod::{FrameUpdate, LodController};
pub use renderer::{render_scene, GlobeLayers};
pub use scene::{BoundaryGroup, BoundaryLine, Earth, Scene, TierSlot};
pub use texture::EarthTexture;
