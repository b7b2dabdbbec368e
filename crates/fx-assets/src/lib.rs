//! Frontend assets for fxsite.
//!
//! The stylesheet and script under `assets/` are compiled into the binary
//! with `rust-embed`. Debug builds read them from disk so edits show up
//! without a rebuild.

use std::borrow::Cow;

#[derive(rust_embed::RustEmbed)]
#[folder = "assets"]
struct Assets;

/// Get an asset by path (relative to `assets/`).
///
/// Returns the file contents if the asset exists, `None` otherwise.
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    Assets::get(path).map(|f| f.data)
}

/// Iterate all asset paths.
pub fn iter() -> impl Iterator<Item = Cow<'static, str>> {
    Assets::iter()
}

/// MIME type for the given file path.
#[must_use]
pub fn mime_for(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_owned()
}
