//! Activity card renderer.
//!
//! A [`CardInput`] is resolved into a [`CardModel`] by the [`AvatarLoader`]
//! (the only step that performs I/O), laid out once as SVG, and encoded by a
//! [`CardBackend`].

pub mod avatar;
pub mod backend;
pub mod error;
pub mod layout;
pub mod model;

pub use avatar::AvatarLoader;
pub use backend::{CardBackend, RasterBackend, RenderedCard, SvgBackend};
pub use error::RenderError;
pub use layout::compose_svg;
pub use model::{
    AvatarSource, CardInput, CardModel, EngagerRow, CARD_HEIGHT, CARD_WIDTH, MAX_ENGAGER_ROWS,
};
