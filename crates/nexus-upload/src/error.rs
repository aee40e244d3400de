//! Error taxonomy for the publish pipeline.
//!
//! Every failure the pipeline can hit maps into one of five classes, and
//! each class owns a distinct process exit code so CI scripts can tell a
//! bad manifest apart from a rejected upload.

use std::path::PathBuf;

/// Failure classes with stable process exit codes.
///
/// The classes mirror the pipeline stages: configuration resolution,
/// archive construction, the empty-archive guard, the network transport,
/// and the repository's HTTP verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Missing/invalid manifest, option, pattern, or timeout.
    Configuration,
    /// Filesystem failure while walking or writing the archive.
    Archive,
    /// The archive was built but contains zero entries.
    EmptyArchive,
    /// Connection-level failure: DNS, refused, timeout, bad URL.
    Transport,
    /// The repository answered with a non-200 status.
    Rejected,
}

impl FailureKind {
    /// Process exit code for this class. Zero is reserved for success.
    pub fn exit_code(self) -> i32 {
        match self {
            FailureKind::Configuration => 2,
            FailureKind::Archive => 3,
            FailureKind::EmptyArchive => 4,
            FailureKind::Transport => 5,
            FailureKind::Rejected => 6,
        }
    }
}

/// Errors raised by the publish pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The project manifest could not be read.
    #[error("failed to read manifest at {path}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project manifest is not valid JSON.
    #[error("failed to parse manifest at {path}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The manifest parsed but carries no usable package name.
    #[error("manifest at {path} has no package name")]
    MissingPackageName { path: PathBuf },

    /// The properties file exists but could not be read.
    #[error("failed to read properties file at {path}")]
    PropertiesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No release version in any configuration source.
    #[error("version is required (pass --version, or set it in the manifest extra or the properties file)")]
    MissingVersion,

    /// A user-supplied ignore pattern did not compile.
    #[error("invalid ignore pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The configured connect timeout is not a parsable duration.
    #[error("invalid timeout {value:?}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    /// Directory traversal failed.
    #[error("failed to walk project directory {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A file could not be opened or read.
    #[error("failed to read {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the zip archive failed.
    #[error("failed to write archive {path}")]
    ArchiveWrite {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The archive was produced but holds no entries; nothing to upload.
    #[error("archive {path} contains no entries; aborting before upload")]
    EmptyArchive { path: PathBuf },

    /// The request never produced an HTTP response.
    #[error("PUT {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The repository responded, but not with 200.
    #[error("upload rejected: HTTP {status} (only 200 counts as success)")]
    Rejected { status: u16 },
}

impl PublishError {
    /// Classify this error into its failure class.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ManifestRead { .. }
            | Self::ManifestParse { .. }
            | Self::MissingPackageName { .. }
            | Self::PropertiesRead { .. }
            | Self::MissingVersion
            | Self::InvalidPattern { .. }
            | Self::InvalidTimeout { .. } => FailureKind::Configuration,
            Self::Walk { .. } | Self::FileRead { .. } | Self::ArchiveWrite { .. } => {
                FailureKind::Archive
            }
            Self::EmptyArchive { .. } => FailureKind::EmptyArchive,
            Self::Transport { .. } => FailureKind::Transport,
            Self::Rejected { .. } => FailureKind::Rejected,
        }
    }

    /// Shorthand for `kind().exit_code()`.
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

/// A specialized Result type for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(FailureKind::Configuration.exit_code(), 2);
        assert_eq!(FailureKind::Archive.exit_code(), 3);
        assert_eq!(FailureKind::EmptyArchive.exit_code(), 4);
        assert_eq!(FailureKind::Transport.exit_code(), 5);
        assert_eq!(FailureKind::Rejected.exit_code(), 6);
    }

    #[test]
    fn variants_classify_into_their_stage() {
        assert_eq!(
            PublishError::MissingVersion.kind(),
            FailureKind::Configuration
        );
        assert_eq!(
            PublishError::EmptyArchive {
                path: PathBuf::from("out.zip")
            }
            .kind(),
            FailureKind::EmptyArchive
        );
        assert_eq!(
            PublishError::Rejected { status: 201 }.kind(),
            FailureKind::Rejected
        );
        assert_eq!(
            PublishError::FileRead {
                path: PathBuf::from("a.txt"),
                source: std::io::Error::other("boom"),
            }
            .kind(),
            FailureKind::Archive
        );
    }

    #[test]
    fn rejected_display_names_the_status() {
        let err = PublishError::Rejected { status: 201 };
        assert!(err.to_string().contains("HTTP 201"));
    }
}
