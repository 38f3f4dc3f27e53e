use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{RevealError, RevealResult};

const MAX_DIM: u32 = 8_192;

/// Rasterisation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOptions {
    /// Device pixels per SVG user unit.
    pub scale: f32,
    /// Load system fonts so counter, labels and tooltip text are drawn.
    pub load_system_fonts: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            load_system_fonts: true,
        }
    }
}

/// Straight-alpha RGBA8 pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

impl Raster {
    /// `[r, g, b, a]` at `(x, y)`, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba8.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Parse `svg` and draw it into a fresh transparent pixmap.
pub fn rasterize_svg(svg: &str, opts: RasterOptions) -> RevealResult<Raster> {
    if !opts.scale.is_finite() || opts.scale <= 0.0 {
        return Err(RevealError::validation("raster scale must be finite and > 0"));
    }

    let mut usvg_opts = usvg::Options::default();
    if opts.load_system_fonts {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        usvg_opts.fontdb = Arc::new(db);
    }
    let tree = usvg::Tree::from_str(svg, &usvg_opts).context("parse svg tree")?;

    let size = tree.size();
    let width = to_px(size.width() * opts.scale)?;
    let height = to_px(size.height() * opts.scale)?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RevealError::render("failed to allocate svg pixmap"))?;

    let xform = resvg::tiny_skia::Transform::from_scale(opts.scale, opts.scale);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    let rgba8 = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    tracing::debug!(width, height, "svg rasterised");

    Ok(Raster {
        width,
        height,
        rgba8,
    })
}

fn to_px(v: f32) -> RevealResult<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(RevealError::render("svg has invalid width/height"));
    }
    let px = (v.ceil() as u32).max(1);
    if px > MAX_DIM {
        return Err(RevealError::render(format!(
            "svg raster size too large: {px} (max {MAX_DIM})"
        )));
    }
    Ok(px)
}

/// Write `raster` as a PNG file, creating parent directories as needed.
pub fn write_png(path: &Path, raster: &Raster) -> RevealResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &raster.rgba8,
        raster.width,
        raster.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
