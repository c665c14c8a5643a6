//! User-facing texts and keyboard layouts

pub mod keyboard;
pub mod text;
