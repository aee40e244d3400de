use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use console::Style;

use nexus_upload::config::{self, OptionLayer, UploadPlan};
use nexus_upload::error::PublishError;
use nexus_upload::ignore::BUILT_IN_PATTERN;
use nexus_upload::publish::{self, Reporter};

mod reporter;

use crate::reporter::ConsoleReporter;

#[derive(Parser, Debug)]
#[command(name = "nexus-upload")]
#[command(about = "Zip a Composer project directory and PUT it to a Nexus-style package repository")]
struct Cli {
    /// Repository base URL, e.g. https://nexus.example.com
    #[arg(long)]
    repository: Option<String>,

    /// Basic-auth username.
    #[arg(long)]
    username: Option<String>,

    /// Basic-auth password. A bare --password sends an empty one.
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    password: Option<String>,

    /// Release version to publish; becomes part of the zip filename and the
    /// upload URL.
    #[arg(long)]
    version: Option<String>,

    /// Ignore pattern: glob-like (`*` spans anything, anchored to the path
    /// start), or a raw regex when wrapped in slashes. Repeatable.
    #[arg(long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Project directory holding composer.json, .nexus, and the files to ship.
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Connection timeout for the upload (e.g. 10s, 500ms).
    #[arg(long)]
    timeout: Option<String>,

    /// Resolve options and write the archive without uploading.
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn layer(&self) -> OptionLayer {
        OptionLayer {
            repository: self.repository.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            version: self.version.clone(),
            ignore: if self.ignore.is_empty() {
                None
            } else {
                Some(self.ignore.clone())
            },
            timeout: self.timeout.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut reporter = ConsoleReporter::new();

    match run(&cli, &mut reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            reporter.error(&format!("Error: {err:#}"));
            exit_code_for(&err)
        }
    }
}

fn run(cli: &Cli, reporter: &mut ConsoleReporter) -> Result<()> {
    let plan = config::resolve(&cli.project_dir, cli.layer())?;
    print_summary(&plan, cli.dry_run);

    let outcome = publish::run(&plan, reporter, cli.dry_run)?;
    if outcome.status.is_some() {
        reporter.success("Upload complete.");
    } else {
        reporter.success(&format!(
            "Dry run complete; archive at {}",
            outcome.archive_path.display()
        ));
    }
    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<PublishError>() {
        Some(publish_err) => ExitCode::from(publish_err.exit_code() as u8),
        None => ExitCode::FAILURE,
    }
}

fn print_summary(plan: &UploadPlan, dry_run: bool) {
    let header = Style::new().yellow().bold();
    println!("{}", header.apply_to("Running with:"));
    println!("\tRepository:      {}", plan.repository);
    println!("\tUsername:        {}", plan.username);
    println!(
        "\tPassword:        {}",
        if plan.password.is_empty() {
            "missing"
        } else {
            "(provided)"
        }
    );
    println!("\tVersion:         {}", plan.version);
    // The built-in exclusions apply on every run, so they always show here.
    let mut patterns: Vec<&str> = plan.ignore.iter().map(String::as_str).collect();
    patterns.push(BUILT_IN_PATTERN);
    println!("\tIgnore patterns: {}", patterns.join(", "));
    if dry_run {
        println!("\tMode:            dry run");
    }
    println!();
}
