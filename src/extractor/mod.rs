//! Page state parsing and media address extraction.
//!
//! The platform embeds its server-rendered state as a JSON blob inside the
//! page. This module locates that blob, validates it into a typed
//! [`NotePage`] with optional fields, builds the structured [`Record`],
//! and derives media download addresses per work kind.

mod explore;
mod image;
mod page;
mod video;

pub use explore::build_record;
pub use image::{ImageFormat, image_urls};
pub use page::{NotePage, NoteUser, NoteVideo, parse_page};
pub use video::video_urls;
