//! Render one anomaly map per year.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Settings;
use crate::{
    cli::create_progress_bar,
    colormap::{ColorScale, Colormap},
    render::{FrameRenderer, FrameStyle, Typeface},
    table::{AnomalyTable, SstTable},
};

pub fn frames(settings: &Settings, baseline_year: Option<i32>, font: Option<&Path>) -> Result<PathBuf> {
    let sst_path = settings.sst_table();
    let sst = SstTable::read_csv(&sst_path)
        .with_context(|| format!("reading SST table from `{}`", sst_path.display()))?;
    let anomalies = AnomalyTable::from_sst(&sst, baseline_year)?;

    let scale = ColorScale::symmetric(anomalies.max_abs(), Colormap::rdbu_r());
    let typeface = Typeface::resolve(font)?;
    let renderer = FrameRenderer::new(&anomalies, scale, FrameStyle::default(), &typeface);
    log::info!(
        "{} points, baseline {}, colour scale ±{:.2}",
        anomalies.points().count(),
        anomalies.baseline(),
        renderer.scale().vmax()
    );

    let out_dir = settings.frames_dir();
    let bar = create_progress_bar(anomalies.years().len() as u64, "Rendering frames...".to_string());
    for &year in anomalies.years() {
        let file_path = renderer
            .save(year, &out_dir)
            .with_context(|| format!("rendering frame for {year}"))?;
        log::debug!("saved `{}`", file_path.display());
        bar.inc(1);
    }
    bar.finish_with_message("Frames rendered");

    Ok(out_dir)
}

// -- Tests -------------------------------------------------------------------
