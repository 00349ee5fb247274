pub mod compositor;
pub mod types;

pub use compositor::VideoCompositor;
pub use types::{EncodedVideo, Still, VideoParams};
