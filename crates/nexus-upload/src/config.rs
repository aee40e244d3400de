//! Option layering and the resolved upload plan.
//!
//! Configuration merges three sources, highest precedence first: command-line
//! flags, the manifest's `extra."nexus-upload"` object, and the `.nexus`
//! properties file in the project directory. Each source fills an
//! [`OptionLayer`]; a key one source leaves out defers to the next layer
//! down. The merged result is validated once and frozen into an
//! [`UploadPlan`] that every later stage reads from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{PublishError, Result};
use crate::manifest::Manifest;

/// Properties filename expected at the project root.
pub const PROPERTIES_FILE: &str = ".nexus";

/// Connection timeout applied when no source configures one.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One configuration source's contribution.
///
/// `None` means "this source says nothing about the key"; merging picks the
/// highest-precedence `Some` per key, so an explicit empty value shadows a
/// populated one below it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OptionLayer {
    /// Repository base URL, e.g. `https://nexus.example.com`.
    pub repository: Option<String>,
    /// Basic-auth username.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Release version to publish.
    pub version: Option<String>,
    /// Ignore patterns; a bare string is normalized to a one-element list.
    #[serde(deserialize_with = "string_or_list")]
    pub ignore: Option<Vec<String>>,
    /// Connection timeout in `humantime` form, e.g. `10s` or `500ms`.
    pub timeout: Option<String>,
}

impl OptionLayer {
    /// Merge with a lower-precedence layer; `self` wins key-wise.
    pub fn over(self, lower: OptionLayer) -> OptionLayer {
        OptionLayer {
            repository: self.repository.or(lower.repository),
            username: self.username.or(lower.username),
            password: self.password.or(lower.password),
            version: self.version.or(lower.version),
            ignore: self.ignore.or(lower.ignore),
            timeout: self.timeout.or(lower.timeout),
        }
    }
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Patterns {
        One(String),
        Many(Vec<String>),
    }

    let value = Option::<Patterns>::deserialize(deserializer)?;
    Ok(value.map(|patterns| match patterns {
        Patterns::One(pattern) => vec![pattern],
        Patterns::Many(list) => list,
    }))
}

/// Parse `.nexus` properties content.
///
/// Line-oriented `key = value`: blank lines and `#` comments are skipped,
/// the split is on the first `=` so values may contain `=`, keys and values
/// are trimmed, a later duplicate key overwrites an earlier one, and lines
/// without `=` or with unknown keys are skipped.
pub fn parse_properties(content: &str) -> OptionLayer {
    let mut layer = OptionLayer::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().to_string();
        match key.trim() {
            "repository" => layer.repository = Some(value),
            "username" => layer.username = Some(value),
            "password" => layer.password = Some(value),
            "version" => layer.version = Some(value),
            "ignore" => layer.ignore = Some(vec![value]),
            "timeout" => layer.timeout = Some(value),
            _ => {}
        }
    }
    layer
}

/// Load the properties layer from `path`. A missing file is an empty layer.
pub fn load_properties(path: &Path) -> Result<OptionLayer> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(parse_properties(&content)),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(OptionLayer::default())
        }
        Err(source) => Err(PublishError::PropertiesRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// The resolved, immutable configuration for one publish run.
#[derive(Debug, Clone)]
pub struct UploadPlan {
    /// Directory holding the manifest, the properties file, and the tree to
    /// archive.
    pub project_dir: PathBuf,
    /// Package identifier from the manifest, e.g. `acme/widget`.
    pub package_name: String,
    /// Release version; guaranteed non-empty.
    pub version: String,
    /// Repository base URL; empty when no source set one, in which case the
    /// failure surfaces at the transport.
    pub repository: String,
    /// Basic-auth username; empty when unset.
    pub username: String,
    /// Basic-auth password; empty when unset.
    pub password: String,
    /// User-supplied ignore patterns. The built-in exclusions are appended
    /// when the set is compiled, not here.
    pub ignore: Vec<String>,
    /// Connection-establishment timeout for the upload request.
    pub connect_timeout: Duration,
}

impl UploadPlan {
    /// Zip filename: the package name with `/` flattened to `-`, plus the
    /// version, e.g. `acme-widget-1.2.3.zip`.
    pub fn archive_file_name(&self) -> String {
        format!("{}-{}.zip", self.package_name.replace('/', "-"), self.version)
    }

    /// Where the archive is written: inside the project directory itself.
    pub fn archive_path(&self) -> PathBuf {
        self.project_dir.join(self.archive_file_name())
    }

    /// Upload endpoint. The package name keeps its slashes as URL path
    /// segments; a trailing `/` on the repository base is dropped first.
    pub fn upload_url(&self) -> String {
        format!(
            "{}/packages/upload/{}/{}",
            self.repository.trim_end_matches('/'),
            self.package_name,
            self.version
        )
    }
}

/// Merge CLI flags over the manifest layer over the properties layer, then
/// validate the result into an [`UploadPlan`].
///
/// The only hard requirements are a package name (checked by the manifest
/// loader) and a non-empty version; everything else defaults to empty and
/// fails later, at the stage that needs it.
pub fn resolve(project_dir: &Path, cli: OptionLayer) -> Result<UploadPlan> {
    let manifest = Manifest::load(project_dir)?;
    let properties = load_properties(&project_dir.join(PROPERTIES_FILE))?;
    let merged = cli.over(manifest.upload).over(properties);

    let version = match merged.version.as_deref().map(str::trim) {
        Some(version) if !version.is_empty() => version.to_string(),
        _ => return Err(PublishError::MissingVersion),
    };

    let connect_timeout = match merged.timeout {
        Some(raw) => humantime::parse_duration(raw.trim())
            .map_err(|source| PublishError::InvalidTimeout { value: raw, source })?,
        None => DEFAULT_CONNECT_TIMEOUT,
    };

    Ok(UploadPlan {
        project_dir: project_dir.to_path_buf(),
        package_name: manifest.name,
        version,
        repository: merged.repository.unwrap_or_default(),
        username: merged.username.unwrap_or_default(),
        password: merged.password.unwrap_or_default(),
        ignore: merged.ignore.unwrap_or_default(),
        connect_timeout,
    })
}
