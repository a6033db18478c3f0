//! Target platform lookup table.

/// One supported target platform.
///
/// The selector is what the user types on the command line. The packager
/// arch is the name the desktop packager uses in its output directory
/// (`<product>-linux-<arch>`), and the Debian arch is the tag written into
/// the `.deb` control file.
///
/// # Examples
///
/// ```no_run
/// use hydrangea_bundler_deb::pipeline::Platform;
///
/// let platform = Platform::lookup("arm64").unwrap();
/// assert_eq!(platform.output_dir_name("hydrangea-blockchain"), "hydrangea-blockchain-linux-arm64");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Platform {
    /// Command-line selector
    pub selector: &'static str,
    /// Architecture naming used by the desktop packager
    pub packager_arch: &'static str,
    /// Architecture tag passed to the Debian package builder
    pub deb_arch: &'static str,
}

/// Supported platforms. Add a row here to support a new architecture.
pub const PLATFORMS: &[Platform] = &[
    Platform {
        selector: "amd64",
        packager_arch: "x64",
        deb_arch: "amd64",
    },
    Platform {
        selector: "arm64",
        packager_arch: "arm64",
        deb_arch: "arm64",
    },
];

impl Platform {
    /// Finds the platform for a command-line selector.
    pub fn lookup(selector: &str) -> Option<&'static Platform> {
        PLATFORMS.iter().find(|p| p.selector == selector)
    }

    /// All recognized selectors, in table order.
    pub fn selectors() -> Vec<&'static str> {
        PLATFORMS.iter().map(|p| p.selector).collect()
    }

    /// Directory the desktop packager creates for this platform.
    pub fn output_dir_name(&self, product_name: &str) -> String {
        format!("{}-linux-{}", product_name, self.packager_arch)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.selector)
    }
}
