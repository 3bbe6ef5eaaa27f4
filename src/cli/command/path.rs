//! Draw the conveyor's route.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::Settings;
use crate::{
    cli::create_spinner,
    render::{save_trace, FrameStyle},
    table,
};

pub fn path(settings: &Settings) -> Result<PathBuf> {
    let points_path = settings.path_points();
    let points = table::read_path_points(&points_path)
        .with_context(|| format!("reading path points from `{}`", points_path.display()))?;

    let file_path = settings.trace_figure();
    let bar = create_spinner("Drawing conveyor path...".to_string());
    save_trace(&points, &FrameStyle::default(), &file_path)?;
    bar.finish_with_message("Conveyor path drawn");

    Ok(file_path)
}
