//! The publish pipeline.
//!
//! Strictly sequential: compile the ignore set, archive the project
//! directory, refuse to ship an empty archive, then PUT the zip to the
//! repository and judge the answer. Each stage either succeeds or aborts
//! the run; nothing is retried and a failed run leaves the archive on disk
//! for inspection.

use std::path::PathBuf;

use crate::archive;
use crate::config::UploadPlan;
use crate::error::{PublishError, Result};
use crate::ignore::IgnoreSet;
use crate::upload;

/// Sink for pipeline narration. Implementations decide presentation;
/// the pipeline only picks the level.
pub trait Reporter {
    fn info(&mut self, msg: &str);
    fn success(&mut self, msg: &str);
    fn warn(&mut self, msg: &str);
    fn error(&mut self, msg: &str);
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Where the archive was written.
    pub archive_path: PathBuf,
    /// Container size in bytes.
    pub archive_bytes: u64,
    /// Number of file entries in the archive.
    pub entries: usize,
    /// Status the repository answered with; `None` on a dry run.
    pub status: Option<u16>,
}

/// Execute one publish run.
///
/// With `dry_run` set the pipeline stops after the archive is written and
/// checked, before any request leaves the machine.
pub fn run(plan: &UploadPlan, reporter: &mut dyn Reporter, dry_run: bool) -> Result<PublishOutcome> {
    let ignores = IgnoreSet::compile(&plan.ignore)?;
    let destination = plan.archive_path();

    reporter.info("Zipping project directory...");
    let summary = archive::zip_directory(&plan.project_dir, &destination, &ignores, reporter)?;
    reporter.success(&format!(
        "Created: {} ({} bytes)",
        destination.display(),
        summary.bytes
    ));

    if summary.entries == 0 {
        return Err(PublishError::EmptyArchive { path: destination });
    }

    if dry_run {
        reporter.warn("Dry run: skipping upload.");
        return Ok(PublishOutcome {
            archive_path: destination,
            archive_bytes: summary.bytes,
            entries: summary.entries,
            status: None,
        });
    }

    let url = plan.upload_url();
    reporter.info(&format!("Uploading to: {url}"));
    reporter.info("Preparing HTTP PUT request...");
    reporter.info(&format!("\tURL:      {url}"));
    reporter.info(&format!("\tFile:     {}", destination.display()));
    reporter.info(&format!("\tSize:     {} bytes", summary.bytes));
    reporter.info(&format!("\tUsername: {}", plan.username));

    let response = upload::put_file(
        &url,
        &destination,
        &plan.username,
        &plan.password,
        plan.connect_timeout,
    )?;

    reporter.info(&format!("Response Status: HTTP {}", response.status));
    reporter.info("Response Headers:");
    for (name, value) in &response.headers {
        reporter.info(&format!("\t{name}: {value}"));
    }
    if response.body_excerpt.is_empty() {
        reporter.info("Response Body: (empty)");
    } else {
        reporter.info(&format!(
            "Response Body (first {} chars):",
            upload::BODY_EXCERPT_LIMIT
        ));
        let suffix = if response.body_truncated { "..." } else { "" };
        reporter.info(&format!("{}{suffix}", response.body_excerpt));
    }

    if !response.is_success() {
        return Err(PublishError::Rejected {
            status: response.status,
        });
    }

    reporter.success(&format!("Upload succeeded with HTTP {}", response.status));
    Ok(PublishOutcome {
        archive_path: destination,
        archive_bytes: summary.bytes,
        entries: summary.entries,
        status: Some(response.status),
    })
}


#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::path::Path;
    use std::thread;
    use std::time::Duration;

    use tempfile::tempdir;
    use tiny_http::{Response, Server, StatusCode};

    use super::testing::RecordingReporter;
    use super::*;
    use crate::error::FailureKind;

    fn plan_for(root: &Path, repository: &str) -> UploadPlan {
        UploadPlan {
            project_dir: root.to_path_buf(),
            package_name: "acme/widget".to_string(),
            version: "1.2.3".to_string(),
            repository: repository.to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
            ignore: Vec::new(),
            connect_timeout: Duration::from_secs(5),
        }
    }

    fn write_file(root: &Path, relative: &str, content: &str) {
        std::fs::write(root.join(relative), content).expect("write file");
    }

    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    #[test]
    fn happy_path_archives_and_uploads() {
        let td = tempdir().expect("tempdir");
        write_file(td.path(), "a.txt", "alpha");

        let server = Server::http("127.0.0.1:0").expect("bind test server");
        let base = format!("http://{}", server.server_addr());
        let handle = thread::spawn(move || {
            let mut request = server.recv().expect("receive request");
            let method = request.method().to_string();
            let url = request.url().to_string();
            let mut payload = Vec::new();
            request
                .as_reader()
                .read_to_end(&mut payload)
                .expect("read body");
            request
                .respond(Response::from_string("stored").with_status_code(StatusCode(200)))
                .expect("respond");
            (method, url, payload)
        });

        let plan = plan_for(td.path(), &base);
        let mut reporter = RecordingReporter::default();
        let outcome = run(&plan, &mut reporter, false).expect("publish");

        let (method, url, payload) = handle.join().expect("join server");
        assert_eq!(method, "PUT");
        assert_eq!(url, "/packages/upload/acme/widget/1.2.3");
        let on_disk = std::fs::read(plan.archive_path()).expect("read archive");
        assert_eq!(payload, on_disk);

        assert_eq!(outcome.status, Some(200));
        assert_eq!(outcome.entries, 1);
        assert_eq!(outcome.archive_path, td.path().join("acme-widget-1.2.3.zip"));
        assert!(reporter.contains("Zipping project directory..."));
        assert!(reporter.contains("Adding: a.txt"));
        assert!(reporter.contains("Created:"));
        assert!(reporter.contains("Uploading to:"));
        assert!(reporter.contains("Response Status: HTTP 200"));
        assert!(reporter.contains("Upload succeeded with HTTP 200"));
    }

    #[test]
    fn non_200_answers_are_rejected_after_narration() {
        let td = tempdir().expect("tempdir");
        write_file(td.path(), "a.txt", "alpha");

        let server = Server::http("127.0.0.1:0").expect("bind test server");
        let base = format!("http://{}", server.server_addr());
        let handle = thread::spawn(move || {
            let request = server.recv().expect("receive request");
            request
                .respond(
                    Response::from_string("created instead").with_status_code(StatusCode(201)),
                )
                .expect("respond");
        });

        let plan = plan_for(td.path(), &base);
        let mut reporter = RecordingReporter::default();
        let err = run(&plan, &mut reporter, false).expect_err("must fail");
        handle.join().expect("join server");

        assert!(matches!(err, PublishError::Rejected { status: 201 }));
        assert_eq!(err.kind(), FailureKind::Rejected);
        assert_eq!(err.exit_code(), 6);
        assert!(reporter.contains("Response Status: HTTP 201"));
        assert!(reporter.contains("created instead"));
    }

    #[test]
    fn empty_archive_aborts_before_any_request() {
        let td = tempdir().expect("tempdir");
        write_file(td.path(), "only.log", "log line");

        // An unreachable repository proves no request was attempted.
        let mut plan = plan_for(td.path(), &closed_port_url());
        plan.ignore = vec!["*.log".to_string()];

        let mut reporter = RecordingReporter::default();
        let err = run(&plan, &mut reporter, false).expect_err("must fail");

        assert!(matches!(err, PublishError::EmptyArchive { .. }));
        assert_eq!(err.exit_code(), 4);
        assert!(plan.archive_path().exists(), "archive stays for inspection");
    }

    #[test]
    fn dry_run_stops_before_the_upload() {
        let td = tempdir().expect("tempdir");
        write_file(td.path(), "a.txt", "alpha");

        let plan = plan_for(td.path(), &closed_port_url());
        let mut reporter = RecordingReporter::default();
        let outcome = run(&plan, &mut reporter, true).expect("dry run");

        assert_eq!(outcome.status, None);
        assert_eq!(outcome.entries, 1);
        assert!(plan.archive_path().exists());
        assert!(reporter.contains("Dry run: skipping upload."));
        assert!(!reporter.contains("Uploading to:"));
    }

    #[test]
    fn bad_pattern_fails_before_the_archive_is_written() {
        let td = tempdir().expect("tempdir");
        write_file(td.path(), "a.txt", "alpha");

        let mut plan = plan_for(td.path(), "http://unused.invalid");
        plan.ignore = vec!["/[/".to_string()];

        let mut reporter = RecordingReporter::default();
        let err = run(&plan, &mut reporter, false).expect_err("must fail");

        assert!(matches!(err, PublishError::InvalidPattern { .. }));
        assert!(!plan.archive_path().exists());
        assert!(reporter.lines.is_empty());
    }

    #[test]
    fn transport_failure_surfaces_with_the_url() {
        let td = tempdir().expect("tempdir");
        write_file(td.path(), "a.txt", "alpha");

        let plan = plan_for(td.path(), &closed_port_url());
        let mut reporter = RecordingReporter::default();
        let err = run(&plan, &mut reporter, false).expect_err("must fail");

        assert!(matches!(err, PublishError::Transport { .. }));
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("/packages/upload/acme/widget/1.2.3"));
    }
}
