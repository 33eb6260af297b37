pub mod chapter;
pub mod image;

pub use chapter::ChapterDownloader;
pub use image::download_image;
