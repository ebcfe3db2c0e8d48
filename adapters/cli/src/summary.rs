//! Headless report of the derived fill state.

use std::fmt;

use pledge_lungs_core::{ProgressState, Tier};
use pledge_lungs_rendering::{compose_overlay, SceneHandle};
use serde::Serialize;

/// Everything the visualiser would show, without opening a window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct Summary {
    pub(crate) title: &'static str,
    pub(crate) caption: String,
    pub(crate) count: u32,
    pub(crate) ratio: f32,
    pub(crate) percentage: u8,
    pub(crate) tier: Tier,
    pub(crate) message: &'static str,
    pub(crate) scene_markers: u32,
    pub(crate) overlay_markers: u32,
    pub(crate) model: String,
    pub(crate) model_triangles: usize,
}

impl Summary {
    pub(crate) fn new(progress: &ProgressState, model_path: &str, model: &SceneHandle) -> Self {
        let overlay = compose_overlay(progress);

        Self {
            title: overlay.title,
            caption: overlay.caption,
            count: progress.count(),
            ratio: progress.ratio(),
            percentage: progress.percentage(),
            tier: progress.tier(),
            message: overlay.message.text,
            scene_markers: progress.asset_marker_count(),
            overlay_markers: progress.overlay_marker_count(),
            model: model_path.to_owned(),
            model_triangles: model.model().triangle_count(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.caption)?;
        writeln!(f, "{}", self.message)?;
        writeln!(
            f,
            "markers: {} scene, {} overlay",
            self.scene_markers, self.overlay_markers
        )?;
        write!(f, "model: {} ({} triangles)", self.model, self.model_triangles)
    }
}
