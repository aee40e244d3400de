//! Project manifest (`composer.json`) loading.
//!
//! The manifest is the one required configuration source: it names the
//! package, and both the zip filename and the upload URL path are derived
//! from that name. The optional `extra."nexus-upload"` object carries the
//! same keys as the command-line flags and participates in option layering.

use std::path::Path;

use serde::Deserialize;

use crate::config::OptionLayer;
use crate::error::{PublishError, Result};

/// Manifest filename expected at the project root.
pub const MANIFEST_FILE: &str = "composer.json";

/// The parts of `composer.json` this tool reads.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Package identifier, e.g. `acme/widget`.
    pub name: String,
    /// The `extra."nexus-upload"` option layer; empty when absent.
    pub upload: OptionLayer,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    // Held as a raw value: Composer serializes an empty extra map as [],
    // and a non-object extra simply has no "nexus-upload" key.
    #[serde(default)]
    extra: serde_json::Value,
}

impl Manifest {
    /// Load `<project_dir>/composer.json`.
    ///
    /// A missing or unparsable manifest, or one without a usable `name`, is
    /// a configuration failure raised before any archive or network I/O.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(MANIFEST_FILE);
        let content =
            std::fs::read_to_string(&path).map_err(|source| PublishError::ManifestRead {
                path: path.clone(),
                source,
            })?;

        let raw: RawManifest =
            serde_json::from_str(&content).map_err(|source| PublishError::ManifestParse {
                path: path.clone(),
                source,
            })?;

        let name = match raw.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(PublishError::MissingPackageName { path }),
        };

        let upload = match raw.extra.get("nexus-upload") {
            Some(options) if !options.is_null() => OptionLayer::deserialize(options)
                .map_err(|source| PublishError::ManifestParse { path, source })?,
            _ => OptionLayer::default(),
        };

        Ok(Self { name, upload })
    }
}
