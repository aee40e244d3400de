//! Styled console reporter.
//!
//! One color per level: blue for progress detail, green for success, yellow
//! for warnings, red for errors. Errors go to stderr, everything else to
//! stdout, and the `console` crate drops the styling on its own when the
//! stream is not a terminal.

use console::Style;
use nexus_upload::publish::Reporter;

pub struct ConsoleReporter {
    info: Style,
    success: Style,
    warn: Style,
    error: Style,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            info: Style::new().blue().bold(),
            success: Style::new().green().bold(),
            warn: Style::new().yellow().bold(),
            error: Style::new().red().bold().for_stderr(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn info(&mut self, msg: &str) {
        println!("{}", self.info.apply_to(msg));
    }

    fn success(&mut self, msg: &str) {
        println!("{}", self.success.apply_to(msg));
    }

    fn warn(&mut self, msg: &str) {
        println!("{}", self.warn.apply_to(msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.error.apply_to(msg));
    }
}
