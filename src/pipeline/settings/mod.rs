//! Configuration structures for a release run.
//!
//! [`ReleaseConfig`] holds the platform, filesystem layout, tool names,
//! product metadata and version source. It is built once by
//! [`ReleaseConfigBuilder`] and passed by reference to every stage.

mod builder;
mod core;
mod layout;
mod product;
mod tools;
mod versioning;

pub use builder::ReleaseConfigBuilder;
pub use self::core::ReleaseConfig;
pub use layout::Layout;
pub use product::ProductSettings;
pub use tools::ToolSettings;
pub use versioning::{DEFAULT_VERSION, DEFAULT_VERSION_ENV, VersionSettings};
