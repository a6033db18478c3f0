//! Product metadata handed to the desktop packager.

/// Product metadata.
///
/// Values end up on the desktop packager's command line and decide the name
/// of the directory it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSettings {
    /// Application name. Also the prefix of the packaged app directory.
    pub name: String,

    /// Application bundle identifier.
    pub app_bundle_id: String,

    /// Icon path, relative to the GUI package directory.
    pub icon: String,

    /// Name of the launcher executable inside the packaged app.
    pub executable_name: String,

    /// Glob of archive entries the packager must leave unpacked.
    ///
    /// The frozen daemon has to stay outside the asar archive so it can be
    /// executed.
    pub asar_unpack: String,
}

impl Default for ProductSettings {
    fn default() -> Self {
        Self {
            name: "hydrangea-blockchain".into(),
            app_bundle_id: "net.hydrangea.blockchain".into(),
            icon: "src/assets/img/Hydrangea.icns".into(),
            executable_name: "hydrangea-blockchain".into(),
            asar_unpack: "**/daemon/**".into(),
        }
    }
}
