//! Output backends for the card layout.
//!
//! [`RasterBackend`] produces the PNG served by the card endpoint and written
//! by the CLI. [`SvgBackend`] returns the same document for the browser to
//! draw inline on the profile page. Both go through [`compose_svg`], so the
//! two surfaces cannot drift apart.

use std::path::Path;
use std::sync::Arc;

use resvg::usvg::{self, fontdb};
use tiny_skia::{Pixmap, Transform};

use crate::error::RenderError;
use crate::layout::compose_svg;
use crate::model::{CardModel, CARD_HEIGHT, CARD_WIDTH};

/// Encoded card plus the content type to serve it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns a resolved [`CardModel`] into bytes.
///
/// Implementations must be deterministic: equal models yield equal bytes.
pub trait CardBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RenderError`] when the card cannot be produced.
    fn render(&self, model: &CardModel) -> Result<RenderedCard, RenderError>;
}

/// Returns the SVG document as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgBackend;

impl CardBackend for SvgBackend {
    fn render(&self, model: &CardModel) -> Result<RenderedCard, RenderError> {
        Ok(RenderedCard {
            content_type: "image/svg+xml",
            bytes: compose_svg(model).into_bytes(),
        })
    }
}

/// Rasterises the SVG document with resvg and encodes it as PNG.
///
/// The font database is loaded once at construction and shared by every
/// render.
#[derive(Clone)]
pub struct RasterBackend {
    fontdb: Arc<fontdb::Database>,
}

impl std::fmt::Debug for RasterBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBackend")
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl RasterBackend {
    /// Loads system fonts, plus `font_path` when given. A custom font also
    /// becomes the `sans-serif` fallback family.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Font`] if `font_path` cannot be read.
    pub fn new(font_path: Option<&Path>) -> Result<Self, RenderError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        if let Some(path) = font_path {
            db.load_font_file(path).map_err(|source| RenderError::Font {
                path: path.to_path_buf(),
                source,
            })?;
            let family = db
                .faces()
                .last()
                .and_then(|face| face.families.first())
                .map(|(name, _)| name.clone());
            if let Some(family) = family {
                tracing::info!(font = %path.display(), %family, "loaded card font");
                db.set_sans_serif_family(family);
            }
        }

        if db.is_empty() {
            tracing::warn!("no fonts available; card text will not be drawn");
        }

        Ok(Self {
            fontdb: Arc::new(db),
        })
    }
}

impl CardBackend for RasterBackend {
    fn render(&self, model: &CardModel) -> Result<RenderedCard, RenderError> {
        let svg = compose_svg(model);

        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&svg, &options)?;

        let mut pixmap = Pixmap::new(CARD_WIDTH, CARD_HEIGHT).ok_or(RenderError::Pixmap {
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
        })?;
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        let bytes = pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        Ok(RenderedCard {
            content_type: "image/png",
            bytes,
        })
    }
}
