//! Link-preview metadata and share flows for activity cards.

pub mod compose;
pub mod error;
pub mod metadata;
pub mod session;
pub mod urls;

pub use compose::{
    compose_intent_url, detect_context, share, Clipboard, DetectedContext, HostCapabilities,
    HostSignals, NativeSharePayload, ShareContext, ShareOutcome, SharePayload,
    CLIPBOARD_CONFIRMATION,
};
pub use error::ShareError;
pub use metadata::{
    compose_frame_metadata, compose_miniapp_embed, compose_profile_page_meta, FrameMetadata,
    MiniAppEmbed, ProfilePageMeta,
};
pub use session::{ShareSession, ShareState};
pub use urls::{encode_component, SiteUrls};
