//! Pretrained model registry and fetcher: download an archive, verify its
//! MD5 checksum and unpack it into a per-model directory.
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use tracing::{debug, error, info};
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::types::ModelName;

/// File whose presence marks a model directory as already unpacked.
pub const DECODED_MARKER: &str = "encoder.pth";

const MODEL_BASE_URL: &str = "https://storage.googleapis.com/niantic-lon-static/research/monodepth2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifact {
    pub name: String,
    pub url: String,
    /// Lowercase hex MD5 of the archive
    pub md5: String,
}

impl ModelName {
    pub fn artifact(&self) -> ModelArtifact {
        let (file, md5) = match self {
            ModelName::Mono640x192 => ("mono_640x192.zip", "a964b8356e08a02d009609d9e3928f7c"),
            ModelName::Stereo640x192 => ("stereo_640x192.zip", "3dfb76bcff0786e4ec07ac00f658dd07"),
            ModelName::MonoStereo640x192 => {
                ("mono%2Bstereo_640x192.zip", "c024d69012485ed05d7eaa9617a96b81")
            }
            ModelName::MonoNoPt640x192 => {
                ("mono_no_pt_640x192.zip", "9c2f071e35027c895a4728358ffc913a")
            }
            ModelName::StereoNoPt640x192 => {
                ("stereo_no_pt_640x192.zip", "41ec2de112905f85541ac33a854742d1")
            }
            ModelName::MonoStereoNoPt640x192 => {
                ("mono%2Bstereo_no_pt_640x192.zip", "46c3b824f541d143a45c37df65fbab0a")
            }
            ModelName::Mono1024x320 => ("mono_1024x320.zip", "0ab0766efdfeea89a0d9ea8ba90e1e63"),
            ModelName::Stereo1024x320 => {
                ("stereo_1024x320.zip", "afc2f2126d70cf3fdf26b550898b501a")
            }
            ModelName::MonoStereo1024x320 => {
                ("mono%2Bstereo_1024x320.zip", "cdc5fc9b23513c07d5b19235d9ef08f7")
            }
        };
        ModelArtifact {
            name: self.as_str().to_string(),
            url: format!("{}/{}", MODEL_BASE_URL, file),
            md5: md5.to_string(),
        }
    }
}

/// Source of archive bytes.
pub trait Downloader {
    /// Stream the resource at `url` into `dest`, returning the byte count.
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// Blocking HTTP downloader.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    http: reqwest::blocking::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("depthprep/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        let mut response = self.http.get(url).send()?.error_for_status()?;
        Ok(response.copy_to(dest)?)
    }
}

fn md5_hex(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// True if `path` exists and its MD5 equals `expected`. A missing file is not an error.
pub fn file_matches_md5(path: &Path, expected: &str) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    Ok(md5_hex(path)?.eq_ignore_ascii_case(expected))
}

pub struct ModelFetcher<D = HttpDownloader> {
    models_dir: PathBuf,
    downloader: D,
}

impl ModelFetcher<HttpDownloader> {
    pub fn new<P: Into<PathBuf>>(models_dir: P) -> Result<Self> {
        Ok(Self::with_downloader(models_dir, HttpDownloader::new()?))
    }
}

impl<D: Downloader> ModelFetcher<D> {
    pub fn with_downloader<P: Into<PathBuf>>(models_dir: P, downloader: D) -> Self {
        Self {
            models_dir: models_dir.into(),
            downloader,
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn model_path(&self, artifact: &ModelArtifact) -> PathBuf {
        self.models_dir.join(&artifact.name)
    }

    pub fn archive_path(&self, artifact: &ModelArtifact) -> PathBuf {
        self.models_dir.join(format!("{}.zip", artifact.name))
    }

    pub fn ensure_model(&self, model: ModelName) -> Result<PathBuf> {
        self.ensure(&model.artifact())
    }

    /// Make sure the unpacked model exists locally and return its directory.
    ///
    /// The archive is downloaded only when it is missing or fails the
    /// checksum, and is verified again before unpacking.
    pub fn ensure(&self, artifact: &ModelArtifact) -> Result<PathBuf> {
        fs::create_dir_all(&self.models_dir)?;

        let model_path = self.model_path(artifact);
        if model_path.join(DECODED_MARKER).exists() {
            debug!("Model {} already present at {:?}", artifact.name, model_path);
            return Ok(model_path);
        }

        let archive_path = self.archive_path(artifact);
        if !file_matches_md5(&archive_path, &artifact.md5)? {
            info!("-> Downloading pretrained model to {:?}", archive_path);
            self.fetch_archive(&artifact.url, &archive_path)?;
        }

        let actual = md5_hex(&archive_path)?;
        if !actual.eq_ignore_ascii_case(&artifact.md5) {
            return Err(Error::ChecksumMismatch {
                path: archive_path,
                expected: artifact.md5.clone(),
                actual,
            });
        }

        info!("   Unzipping model...");
        let mut archive = ZipArchive::new(BufReader::new(File::open(&archive_path)?))?;
        archive.extract(&model_path)?;
        info!("   Model unzipped to {:?}", model_path);

        Ok(model_path)
    }

    // Staged next to the destination so the final rename stays on one filesystem
    fn fetch_archive(&self, url: &str, archive_path: &Path) -> Result<()> {
        let mut staged = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".zip")
            .tempfile_in(&self.models_dir)?;
        {
            let mut writer = BufWriter::new(staged.as_file_mut());
            let bytes = self.downloader.download(url, &mut writer)?;
            writer.flush()?;
            debug!("Downloaded {} bytes from {}", bytes, url);
        }
        staged.persist(archive_path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

/// Fetch `model` into `models_dir`, terminating the process if the archive
/// never matches its checksum. Other failures are returned to the caller.
pub fn download_model_if_doesnt_exist(model: ModelName, models_dir: &Path) -> Result<PathBuf> {
    let fetcher = ModelFetcher::new(models_dir)?;
    debug!("Ensuring model {} under {:?}", model, fetcher.models_dir());
    match fetcher.ensure_model(model) {
        Err(err @ Error::ChecksumMismatch { .. }) => {
            error!("   Failed to download a file which matches the checksum - quitting: {}", err);
            std::process::exit(1);
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::Cursor;

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    struct StubDownloader {
        payload: Vec<u8>,
        calls: Cell<usize>,
    }

    impl StubDownloader {
        fn new(payload: Vec<u8>) -> Self {
            Self {
                payload,
                calls: Cell::new(0),
            }
        }
    }

    impl Downloader for StubDownloader {
        fn download(&self, _url: &str, dest: &mut dyn Write) -> Result<u64> {
            self.calls.set(self.calls.get() + 1);
            dest.write_all(&self.payload)?;
            Ok(self.payload.len() as u64)
        }
    }

    fn model_zip() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("encoder.pth", options).expect("start encoder");
        writer.write_all(b"encoder weights").expect("write encoder");
        writer.start_file("depth.pth", options).expect("start depth");
        writer.write_all(b"depth weights").expect("write depth");
        writer.finish().expect("finish zip").into_inner()
    }

    fn artifact_for(payload: &[u8]) -> ModelArtifact {
        ModelArtifact {
            name: "mono_640x192".to_string(),
            url: "https://example.invalid/mono_640x192.zip".to_string(),
            md5: format!("{:x}", Md5::digest(payload)),
        }
    }

    #[test]
    fn downloads_verifies_and_unpacks() {
        let dir = tempfile::tempdir().expect("temp dir");
        let payload = model_zip();
        let artifact = artifact_for(&payload);
        let fetcher = ModelFetcher::with_downloader(dir.path().join("models"), StubDownloader::new(payload));

        let model_path = fetcher.ensure(&artifact).expect("ensure model");
        assert_eq!(fetcher.models_dir(), dir.path().join("models"));
        assert_eq!(model_path, dir.path().join("models").join("mono_640x192"));
        assert_eq!(
            fs::read(model_path.join("encoder.pth")).expect("read encoder"),
            b"encoder weights"
        );
        assert!(model_path.join("depth.pth").exists());
        assert!(fetcher.archive_path(&artifact).exists());
        assert_eq!(fetcher.downloader.calls.get(), 1);
    }

    #[test]
    fn unpacked_model_skips_everything() {
        let dir = tempfile::tempdir().expect("temp dir");
        let model_dir = dir.path().join("mono_640x192");
        fs::create_dir_all(&model_dir).expect("model dir");
        fs::write(model_dir.join(DECODED_MARKER), b"x").expect("marker");

        let artifact = artifact_for(b"unused");
        let fetcher = ModelFetcher::with_downloader(dir.path(), StubDownloader::new(Vec::new()));
        assert_eq!(fetcher.ensure(&artifact).expect("ensure"), model_dir);
        assert_eq!(fetcher.downloader.calls.get(), 0);
    }

    #[test]
    fn valid_archive_on_disk_is_not_downloaded_again() {
        let dir = tempfile::tempdir().expect("temp dir");
        let payload = model_zip();
        let artifact = artifact_for(&payload);
        fs::write(dir.path().join("mono_640x192.zip"), &payload).expect("archive");

        let fetcher = ModelFetcher::with_downloader(dir.path(), StubDownloader::new(Vec::new()));
        let model_path = fetcher.ensure(&artifact).expect("ensure");
        assert!(model_path.join(DECODED_MARKER).exists());
        assert_eq!(fetcher.downloader.calls.get(), 0);
    }

    #[test]
    fn corrupt_archive_is_replaced() {
        let dir = tempfile::tempdir().expect("temp dir");
        let payload = model_zip();
        let artifact = artifact_for(&payload);
        fs::write(dir.path().join("mono_640x192.zip"), b"truncated").expect("archive");

        let fetcher = ModelFetcher::with_downloader(dir.path(), StubDownloader::new(payload));
        let model_path = fetcher.ensure(&artifact).expect("ensure");
        assert!(model_path.join(DECODED_MARKER).exists());
        assert_eq!(fetcher.downloader.calls.get(), 1);
    }

    #[test]
    fn checksum_mismatch_after_download_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let artifact = artifact_for(b"the real archive");
        let fetcher =
            ModelFetcher::with_downloader(dir.path(), StubDownloader::new(b"something else".to_vec()));

        let err = fetcher.ensure(&artifact).unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
        assert_eq!(fetcher.downloader.calls.get(), 1);
        assert!(!fetcher.model_path(&artifact).exists());
    }

    #[test]
    fn missing_file_does_not_match() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(!file_matches_md5(&dir.path().join("none.zip"), "d41d8cd98f00b204e9800998ecf8427e").unwrap());

        let empty = dir.path().join("empty.zip");
        fs::write(&empty, b"").expect("empty file");
        assert!(file_matches_md5(&empty, "D41D8CD98F00B204E9800998ECF8427E").unwrap());
    }

    #[test]
    fn registry_covers_all_models() {
        for model in ModelName::ALL {
            let artifact = model.artifact();
            assert_eq!(artifact.name, model.as_str());
            assert!(artifact.url.starts_with("https://storage.googleapis.com/"));
            assert!(artifact.url.ends_with(".zip"));
            assert_eq!(artifact.md5.len(), 32);
            assert_eq!(model.as_str().parse::<ModelName>().unwrap(), model);
        }
        assert_eq!(
            ModelName::MonoStereo640x192.artifact().url,
            "https://storage.googleapis.com/niantic-lon-static/research/monodepth2/mono%2Bstereo_640x192.zip"
        );
        assert!("mono_9999x1".parse::<ModelName>().is_err());
    }
}
