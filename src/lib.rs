#![crate_name = "hyper_static_assets"]
#![deny(missing_docs)]

//! Sandboxed static asset serving for [Hyper 1.0](https://github.com/hyperium/hyper).
//!
//! This library exports a high-level interface `StaticAssets` for serving a directory of
//! assets, and lower-level interfaces for more control over responses.
//!
//! ## Basic usage
//!
//! The `StaticAssets` type holds the canonicalized root and some settings, and a `serve`
//! method to handle the request. It follows the builder pattern, and also implements the
//! `hyper::service::Service` trait. It can be used as:
//!
//! ```rust,no_run
//! # fn main() -> Result<(), hyper_static_assets::Error> {
//! // Instance of `StaticAssets` containing configuration.
//! let mut assets = hyper_static_assets::StaticAssets::new("public/static/")?;
//! assets.prefix("/static");
//!
//! // A dummy request, but normally obtained from Hyper.
//! let request = http::Request::get("/static/css/site.css")
//!     .body(())
//!     .unwrap();
//!
//! // Serve the request. Returns a future for a `hyper::Response`.
//! let response_future = assets.serve(&request);
//! # Ok(())
//! # }
//! ```
//!
//! ## Advanced usage
//!
//! `StaticAssets` is a thin wrapper around three steps, which can also be used directly:
//!
//! - `PathResolver` maps a relative path onto the root, and rejects anything that resolves
//!   outside of it, comparing canonical paths on whole components.
//! - `negotiate::decide` checks `If-Modified-Since` and `If-None-Match` against the file's
//!   modification time and content hash.
//! - `AssetResponder` combines both: it resolves, stats and reads the file, and produces an
//!   `AssetDecision`. `ResponseBuilder` then turns that into a response.
//!
//! ```rust,no_run
//! use hyper_static_assets::{AssetRequest, AssetResponder, ResponseBuilder};
//!
//! # fn main() -> Result<(), hyper_static_assets::Error> {
//! let responder = AssetResponder::new("public/static/")?;
//!
//! // Conditionals are read from anything implementing `HeaderSource`.
//! let headers = http::HeaderMap::new();
//! let request = AssetRequest::from_headers("css/site.css", &headers);
//!
//! // Blocks on the filesystem. Use `serve_async` from within a tokio runtime.
//! let decision = responder.serve(&request)?;
//! let response = ResponseBuilder::new().build(decision)?;
//! # Ok(())
//! # }
//! ```
//!
//! Sitting between these steps is useful for custom error pages, for example: match on the
//! `AssetDecision`, and fall back to `ResponseBuilder` for the cases you don't override.

mod error;
pub mod negotiate;
mod resolve;
mod responder;
mod response_builder;
mod service;
mod util;

pub use crate::error::Error;
pub use crate::negotiate::{Conditionals, Negotiation};
pub use crate::resolve::*;
pub use crate::responder::*;
pub use crate::response_builder::*;
pub use crate::service::*;
pub use crate::util::{content_type, HeaderSource};
