//! I/O layer: line-oriented text reading and the pretrained model fetcher.
pub mod models;
pub mod text;

pub use models::{
    Downloader, HttpDownloader, ModelArtifact, ModelFetcher, download_model_if_doesnt_exist,
    file_matches_md5,
};
pub use text::read_lines;
