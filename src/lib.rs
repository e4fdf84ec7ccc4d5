#![doc = r#"
depthprep — preprocessing utilities for monocular depth-estimation pipelines.

The crate bundles the small pieces a depth training or evaluation script needs
around the model itself: a letterbox resize-and-crop that reports the exact
scale and offsets used (so camera intrinsics can follow the image), a
day/night/rain scene filter for dataset curation, min-max normalization for
visualizing depth maps, elapsed-time formatting, and a fetcher that downloads,
verifies and unpacks pretrained model archives.

Letterbox an image
------------------
```rust
use ndarray::Array3;
use depthprep::{Interpolation, resize_and_crop};

fn main() -> depthprep::Result<()> {
    let frame = Array3::<u8>::zeros((375, 1242, 3));
    let out = resize_and_crop(&frame, 192, 640, 0.0, 0.0, Interpolation::Area)?;

    assert_eq!(out.image.dim(), (192, 640, 3));
    // Source pixel (x, y) lands at (x * r - delta_u, y * r - delta_v)
    let (u, v) = out.map_point(621.0, 187.5);
    println!("center -> ({u:.1}, {v:.1})");
    Ok(())
}
```

Filter scenes
-------------
```rust
use depthprep::passes_filter;

fn main() -> depthprep::Result<()> {
    assert!(passes_filter("Night, heavy rain", ["night", "rain"])?);
    assert!(!passes_filter("rainy day", ["day"])?);
    Ok(())
}
```

Fetch a pretrained model
------------------------
```rust,no_run
use depthprep::{ModelFetcher, ModelName};

fn main() -> depthprep::Result<()> {
    let fetcher = ModelFetcher::new("models")?;
    let dir = fetcher.ensure_model(ModelName::Mono640x192)?;
    println!("model unpacked in {}", dir.display());
    Ok(())
}
```

Error handling
--------------
All public functions return `depthprep::Result<T>`; match on `depthprep::Error`
to tell geometry preconditions (`Upscale`, `CropOutOfBounds`) apart from I/O,
HTTP, archive and checksum failures.

Useful modules
--------------
- [`api`] — file-based entry points.
- [`core`] — pure processing primitives and parameter presets.
- [`io`] — line reader and model fetcher.
- [`types`] — shared enums (`Interpolation`, `SceneCondition`, `ModelName`).
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use crate::core::params::{FetchParams, LetterboxParams};
pub use error::{Error, Result};
pub use types::{Interpolation, ModelName, SceneCondition};

pub use crate::core::processing::normalize::{normalize_image, to_u8_preview};
pub use crate::core::processing::resize::{
    DrivenAxis, Intrinsics, LetterboxImage, LetterboxPlan, LetterboxResult, PixelBuffer,
    plan_letterbox, resize_and_crop, resize_and_crop_with_params,
};
pub use crate::core::processing::scene_filter::{PassFilter, filter_scenes, passes_filter};
pub use crate::core::timing::{duration_to_hm_str, sec_to_hm, sec_to_hm_str};

pub use io::models::{
    Downloader, HttpDownloader, ModelArtifact, ModelFetcher, download_model_if_doesnt_exist,
    file_matches_md5,
};
pub use io::text::read_lines;

pub use api::{ResizeReport, filter_scene_file, letterbox_file, save_depth_preview};
