#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

//! Resolution of package.json `exports` maps.
//!
//! Given an already-parsed package descriptor, an entry specifier (`"."`,
//! `"./utils"`) and a set of active conditions, produces the ordered list of
//! candidate paths the entry maps to. Nothing here touches the filesystem
//! except the [`Package::from_path`] convenience loader.

pub mod config;
pub mod error;
pub mod resolver;
pub mod version;

pub use config::ResolveOptions;
pub use error::{Error, Result};
pub use resolver::{
    resolve, CacheStats, ConditionSet, ExportMapping, ExportsResolver, Package, PackageExports,
    PackageId, PatternCache, ResolveTrace,
};
pub use version::VERSION;
