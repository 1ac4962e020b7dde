//! URL handling module for Statute-Harvester
//!
//! Links on statute pages are resolved with a fixed base and prefix rather
//! than by general URL joining; see [`UrlResolver`].

mod resolve;

pub use resolve::UrlResolver;
