//! HTTP request handlers.

mod assets;
mod pages;

pub(crate) use assets::serve_asset;
pub(crate) use pages::{decode_path, get_page, html_response, is_page_path};
