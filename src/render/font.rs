use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale, PxScaleFont, ScaleFont};
use tracing::{debug, info};

use crate::error::{RenderError, Result};

/// Places where CJK-capable fonts usually live, most preferred first
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// A loaded font face
#[derive(Clone)]
pub struct FontFace {
    font: FontArc,
    path: PathBuf,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace").field("path", &self.path).finish()
    }
}

impl FontFace {
    /// Load a TTF, OTF or TTC file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let load_failed = || RenderError::FontLoadFailed {
            path: path.display().to_string(),
        };

        let data = std::fs::read(path).map_err(|_| load_failed())?;
        let font = FontArc::try_from_vec(data).map_err(|_| load_failed())?;

        debug!("Loaded font {:?}", path);
        Ok(Self {
            font,
            path: path.to_path_buf(),
        })
    }

    /// Use `path` when given, otherwise search the usual system locations
    pub fn load_or_discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::discover(),
        }
    }

    /// First loadable font among the usual system locations
    pub fn discover() -> Result<Self> {
        for candidate in SYSTEM_FONT_PATHS {
            let path = Path::new(candidate);
            if !path.exists() {
                continue;
            }
            if let Ok(face) = Self::from_file(path) {
                info!("Using system font {:?}", path);
                return Ok(face);
            }
        }
        Err(RenderError::NoFontFound.into())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    /// Font metrics at `size` pixels
    pub fn scaled(&self, size: f32) -> PxScaleFont<&FontArc> {
        PxScaleFont {
            font: &self.font,
            scale: PxScale::from(size),
        }
    }

    /// Advance width of a single line at `size` pixels
    pub fn line_width(&self, text: &str, size: f32) -> f32 {
        let scaled = self.scaled(size);
        let mut width = 0.0;
        let mut prev = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }

        width
    }

    /// Ascent above the baseline at `size` pixels
    pub fn ascent(&self, size: f32) -> f32 {
        self.scaled(size).ascent()
    }

    /// Baseline-to-baseline distance at `size` pixels
    pub fn line_height(&self, size: f32) -> f32 {
        let scaled = self.scaled(size);
        scaled.ascent() - scaled.descent() + scaled.line_gap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_font_file() {
        let result = FontFace::from_file("/nonexistent/font.ttf");
        assert!(matches!(
            result,
            Err(crate::error::ReelError::Render(RenderError::FontLoadFailed { .. }))
        ));
    }

    #[test]
    fn test_garbage_font_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();

        assert!(FontFace::from_file(&path).is_err());
    }

    #[test]
    fn test_discovered_font_metrics_scale() {
        // Font availability depends on the host
        let Ok(face) = FontFace::discover() else {
            return;
        };

        let small = face.line_width("Hello", 20.0);
        let large = face.line_width("Hello", 40.0);
        assert!(small > 0.0);
        assert!((large / small - 2.0).abs() < 0.05);
        assert!(face.line_height(40.0) > face.ascent(40.0));
    }
}
