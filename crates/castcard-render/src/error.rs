use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("card SVG could not be parsed: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("could not allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("failed to load font {path}: {source}")]
    Font {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
