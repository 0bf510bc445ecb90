//! Static site generation for pagewright.
//!
//! [`StaticSiteBuilder`] renders every page of a loaded
//! [`Site`](pw_site::Site) through the theme's routing rules and minijinja
//! templates, copies page assets and the theme's static files, and writes a
//! `data.json` dump of the whole tree.

mod builder;
mod copy;
mod template;

pub use builder::{BuildConfig, BuildError, BuildReport, StaticSiteBuilder};
