//! # Social Preview
//!
//! Link-preview images for the reader, independent of any reading session.
//!
//! - [`card`]: title wrapping and SVG composition
//! - [`server`]: the `GET /opengraph-image` endpoint (tiny_http)

pub mod card;
pub mod server;

pub use card::{CardText, PreviewError, compose, wrap_title};
pub use server::{PreviewHandle, PreviewServer, route};
