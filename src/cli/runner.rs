use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use tracing::info;
use tracing_subscriber::EnvFilter;

use depthprep::{
    FetchParams, LetterboxParams, ModelName, PassFilter, download_model_if_doesnt_exist, duration_to_hm_str,
    filter_scene_file, letterbox_file,
};

use super::args::{CliArgs, Command, DownloadArgs, FilterArgs, ResizeArgs};
use super::errors::AppError;

fn resize_params(args: &ResizeArgs) -> Result<LetterboxParams, AppError> {
    let mut params = match &args.params {
        Some(path) => LetterboxParams::from_json_file(path)?,
        None => LetterboxParams::default(),
    };
    if let Some(h) = args.height {
        params.target_h = h;
    }
    if let Some(w) = args.width {
        params.target_w = w;
    }
    if let Some(s) = args.shift_h {
        params.shift_h = s;
    }
    if let Some(s) = args.shift_w {
        params.shift_w = s;
    }
    if let Some(interp) = args.interpolation {
        params.interpolation = interp;
    }

    for size in [params.target_h, params.target_w] {
        if size == 0 {
            return Err(AppError::ZeroSize { size });
        }
    }
    for shift in [params.shift_h, params.shift_w] {
        if !(0.0..=1.0).contains(&shift) {
            return Err(AppError::InvalidShift { shift });
        }
    }
    Ok(params)
}

fn run_resize(args: &ResizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let params = resize_params(args)?;
    info!(
        "Letterboxing {:?} -> {:?} at {}x{} ({})",
        args.input, args.output, params.target_w, params.target_h, params.interpolation
    );
    let report = letterbox_file(&args.input, &args.output, &params).map_err(AppError::from)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_filter(args: &FilterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let filter = PassFilter::from_tokens(&args.pass).map_err(AppError::from)?;
    let kept = filter_scene_file(&args.scenes, &filter).map_err(AppError::from)?;

    match &args.output {
        Some(path) => {
            let mut text = kept.join("\n");
            if !text.is_empty() {
                text.push('\n');
            }
            fs::write(path, text).map_err(AppError::from)?;
            info!("Wrote {} scenes to {:?}", kept.len(), path);
        }
        None => {
            for line in &kept {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn fetch_models_dir(args: &DownloadArgs) -> Result<PathBuf, AppError> {
    let params = match &args.params {
        Some(path) => FetchParams::from_json_file(path)?,
        None => FetchParams::default(),
    };
    Ok(args.models_dir.clone().unwrap_or(params.models_dir))
}

fn run_download(args: &DownloadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let models_dir = fetch_models_dir(args)?;
    let model_path =
        download_model_if_doesnt_exist(args.model, &models_dir).map_err(AppError::from)?;
    println!("{}", model_path.display());
    Ok(())
}

fn run_models() {
    for model in ModelName::ALL {
        let artifact = model.artifact();
        println!("{}\t{}\t{}", artifact.name, artifact.md5, artifact.url);
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = if args.log {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    match &args.command {
        Command::Resize(resize) => run_resize(resize)?,
        Command::Filter(filter) => run_filter(filter)?,
        Command::Download(download) => run_download(download)?,
        Command::Models => run_models(),
    }
    info!("Finished in {}", duration_to_hm_str(start.elapsed()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use depthprep::{Interpolation, ModelName};

    use super::*;

    fn resize_args() -> ResizeArgs {
        ResizeArgs {
            input: PathBuf::from("in.png"),
            output: PathBuf::from("out.png"),
            params: None,
            height: None,
            width: None,
            shift_h: None,
            shift_w: None,
            interpolation: None,
        }
    }

    #[test]
    fn flags_override_defaults() {
        let args = ResizeArgs {
            height: Some(320),
            shift_w: Some(0.25),
            interpolation: Some(Interpolation::Cubic),
            ..resize_args()
        };
        let params = resize_params(&args).expect("valid params");
        assert_eq!(params.target_h, 320);
        assert_eq!(params.target_w, 640);
        assert_eq!(params.shift_w, 0.25);
        assert_eq!(params.interpolation, Interpolation::Cubic);
    }

    #[test]
    fn rejects_zero_size_and_out_of_range_shift() {
        let args = ResizeArgs {
            width: Some(0),
            ..resize_args()
        };
        assert!(matches!(resize_params(&args), Err(AppError::ZeroSize { size: 0 })));

        let args = ResizeArgs {
            shift_h: Some(1.5),
            ..resize_args()
        };
        assert!(matches!(resize_params(&args), Err(AppError::InvalidShift { .. })));
    }

    #[test]
    fn models_dir_flag_beats_params_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"models_dir": "from_file"}}"#).expect("write params");

        let args = DownloadArgs {
            model: ModelName::Mono640x192,
            params: Some(file.path().to_path_buf()),
            models_dir: None,
        };
        assert_eq!(fetch_models_dir(&args).expect("dir"), PathBuf::from("from_file"));

        let args = DownloadArgs {
            models_dir: Some(PathBuf::from("from_flag")),
            ..args
        };
        assert_eq!(fetch_models_dir(&args).expect("dir"), PathBuf::from("from_flag"));

        let args = DownloadArgs {
            model: ModelName::Mono640x192,
            params: None,
            models_dir: None,
        };
        assert_eq!(fetch_models_dir(&args).expect("dir"), PathBuf::from("models"));
    }
}
