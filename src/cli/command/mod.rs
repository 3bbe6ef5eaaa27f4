pub mod export;
pub mod fetch;
pub mod frames;
pub mod path;

use std::path::{Path, PathBuf};

pub use export::export;
pub use fetch::{fetch, FetchOptions};
pub use frames::frames;
pub use path::path;

/// File locations inside a project directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub figs_dir: PathBuf,
}

impl Settings {
    pub fn new(project_dir: &Path) -> Self {
        Settings {
            data_dir: project_dir.join("data"),
            figs_dir: project_dir.join("figs"),
        }
    }

    /// Path definitions.
    pub fn path_points(&self) -> PathBuf {
        self.data_dir.join("conveyor.csv")
    }

    /// Cached annual mean SST per point.
    pub fn sst_table(&self) -> PathBuf {
        self.data_dir.join("conveyor_sst.csv")
    }

    pub fn api_key(&self) -> PathBuf {
        self.data_dir.join("api_key.csv")
    }

    pub fn anomalies_parquet(&self) -> PathBuf {
        self.data_dir.join("conveyor_sst.parquet")
    }

    pub fn trace_figure(&self) -> PathBuf {
        self.figs_dir.join("conveyor_path.png")
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.figs_dir.join("sst_frames")
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_lay_out_project_directory() {
        let settings = Settings::new(Path::new("/work"));

        assert_eq!(settings.path_points(), PathBuf::from("/work/data/conveyor.csv"));
        assert_eq!(settings.sst_table(), PathBuf::from("/work/data/conveyor_sst.csv"));
        assert_eq!(settings.api_key(), PathBuf::from("/work/data/api_key.csv"));
        assert_eq!(settings.trace_figure(), PathBuf::from("/work/figs/conveyor_path.png"));
        assert_eq!(settings.frames_dir(), PathBuf::from("/work/figs/sst_frames"));
    }
}
