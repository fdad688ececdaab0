pub mod generation;
pub mod image;
pub mod options;

pub use generation::*;
pub use image::*;
pub use options::*;
