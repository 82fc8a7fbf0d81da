pub mod ffmpeg;
pub mod uploads;

pub use ffmpeg::Ffmpeg;
pub use uploads::UploadCache;
