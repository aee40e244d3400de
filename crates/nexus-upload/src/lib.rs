//! # nexus-upload
//!
//! Single-shot release publishing for Composer projects against a
//! Nexus-style package repository.
//!
//! The crate archives a project directory into a deflate-compressed zip,
//! honoring glob-like and raw-regex ignore patterns plus a fixed set of
//! built-in exclusions, then uploads the zip with a single HTTP `PUT` and
//! basic authentication. There is no retry, no partial publish, and no
//! cleanup on failure: every run either ends with the repository answering
//! `200 OK` or aborts with a failure class that maps to a stable exit code.
//!
//! ## Pipeline
//!
//! The flow is **resolve → archive → upload**:
//!
//! 1. [`config::resolve`] merges command-line flags over the manifest's
//!    `extra."nexus-upload"` object over the `.nexus` properties file, and
//!    validates the result into an [`config::UploadPlan`].
//! 2. [`ignore::IgnoreSet::compile`] turns the merged patterns plus the
//!    built-in exclusions into matchers, and [`archive::zip_directory`]
//!    streams every included file into the zip. An archive with no entries
//!    aborts the run.
//! 3. [`upload::put_file`] PUTs the zip to
//!    `<repository>/packages/upload/<name>/<version>` and the pipeline
//!    accepts exactly `200 OK`, rejecting everything else.
//!
//! ## Example
//!
//! ```ignore
//! use std::path::Path;
//! use nexus_upload::{config, publish};
//!
//! let cli = config::OptionLayer {
//!     version: Some("1.2.3".to_string()),
//!     ..config::OptionLayer::default()
//! };
//! let plan = config::resolve(Path::new("."), cli)?;
//! let outcome = publish::run(&plan, &mut reporter, false)?;
//! println!("shipped {} entries", outcome.entries);
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Option layering (`CLI > manifest > properties`) and the
//!   resolved upload plan
//! - [`manifest`] — `composer.json` loading
//! - [`ignore`] — Ignore-pattern compilation and matching
//! - [`archive`] — Directory walking and zip writing
//! - [`upload`] — The HTTP `PUT` transport
//! - [`publish`] — Pipeline orchestration and the [`publish::Reporter`] seam
//! - [`error`] — Failure taxonomy with per-class exit codes
//!
//! ## CLI Usage
//!
//! For command-line usage, see the `nexus-upload-cli` crate.

/// Directory walking and zip writing.
pub mod archive;

/// Option layering and the resolved upload plan.
pub mod config;

/// Failure taxonomy with per-class exit codes.
pub mod error;

/// Ignore-pattern compilation and matching.
pub mod ignore;

/// `composer.json` loading.
pub mod manifest;

/// Pipeline orchestration.
pub mod publish;

/// HTTP `PUT` transport.
pub mod upload;
