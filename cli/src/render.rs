use std::path::Path;

use sketches::raster::Raster;
use sketches::{SketchConfig, SketchKind, SurfaceError, Vector2};

use crate::CliError;

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

/// What to render.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub kind: SketchKind,
    pub width: u32,
    pub height: u32,
    pub frames: usize,
    /// Applied in order after setup, before the first frame.
    pub clicks: Vec<Vector2>,
    pub pointer: Option<Vector2>,
}

/// Parse `X,Y` into a point.
pub fn parse_point(raw: &str) -> Result<Vector2, String> {
    let invalid = || format!("invalid point `{raw}`; expected X,Y");
    let (x, y) = raw.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<f64>().map_err(|_| invalid())?;
    let y = y.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok(Vector2::new(x, y))
}

/// Set up the sketch on a fresh raster and run it for `plan.frames` frames.
pub fn render(config: &SketchConfig, seed: u64, plan: &RenderPlan) -> Result<Raster, SurfaceError> {
    let mut surface = Raster::new(plan.width, plan.height)?;
    let mut sketch = plan.kind.build(config, seed, plan.width, plan.height);
    sketch.setup(&mut surface)?;
    for click in &plan.clicks {
        let reacted = sketch.pointer_click(&mut surface, click.x, click.y)?;
        tracing::debug!(x = click.x, y = click.y, reacted, "click");
    }
    sketch.pointer_moved(plan.pointer);
    for _ in 0..plan.frames {
        sketch.frame(&mut surface)?;
    }
    Ok(surface)
}

pub fn save_png(raster: &Raster, width: u32, height: u32, path: &Path) -> Result<(), CliError> {
    let image = image::RgbaImage::from_raw(width, height, raster.to_rgba8()).ok_or(CliError::Buffer { width, height })?;
    image.save(path)?;
    Ok(())
}
