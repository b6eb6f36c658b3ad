//! Static site generation for holadoc.
//!
//! [`StaticSiteBuilder`] drives a whole build: it clears the output
//! directory, loads the source tree, copies assets, then renders one page
//! per `(node, version, language)` combination that resolves to content.
//!
//! # Example
//!
//! ```no_run
//! use holadoc_build::StaticSiteBuilder;
//! use holadoc_config::Config;
//!
//! let config = Config::load(None, None).unwrap();
//! let report = StaticSiteBuilder::new(config).build().unwrap();
//! println!("{} pages", report.pages.len());
//! ```

mod assets;
mod builder;
mod error;
mod template;

pub use assets::copy_asset;
pub use builder::{BuildReport, BuiltPage, StaticSiteBuilder, unchanged_banner};
pub use error::BuildError;
pub use template::{DEFAULT_TEMPLATE, PageTemplates};
