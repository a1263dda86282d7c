pub mod design;
pub mod history;
pub mod image;

pub use design::*;
pub use history::*;
pub use image::*;
