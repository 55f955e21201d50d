use crate::agents::upgrade::ExitStatus;
use crate::error::Result;
use colored::Colorize;
use jiff::Zoned;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Per-run append-only log that mirrors everything shown on the console.
///
/// Console lines are colored; the log receives the same text uncolored,
/// plus the raw captured output of every subprocess. The closing footer is
/// written exactly once per process lifetime: explicitly at the end of the
/// run, or by the `Drop` fallback when the run unwinds early.
pub struct RunLog {
    path: PathBuf,
    file: File,
    verbose: bool,
    finalized: bool,
}

impl RunLog {
    /// Open `<dir>/sysup-YYYYmmdd-HHMMSS.log`, creating the directory
    /// first. Second-granularity stamps keep paths collision-free per run.
    pub fn create(dir: &Path, verbose: bool) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let stamp = Zoned::now().strftime("%Y%m%d-%H%M%S").to_string();
        let path = dir.join(format!("sysup-{stamp}.log"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut log = Self {
            path,
            file,
            verbose,
            finalized: false,
        };
        let started = Zoned::now().strftime("%Y-%m-%d %H:%M:%S").to_string();
        log.append(&format!("Run started: {started}"));
        log.append("----");
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Opening banner line.
    pub fn headline(&mut self, text: &str) {
        println!("{}", text.cyan().bold());
        self.append(text);
    }

    /// Numbered step header in the workflow voice.
    pub fn step(&mut self, text: &str) {
        println!("\n{}", text.yellow());
        self.append("");
        self.append(text);
    }

    pub fn info(&mut self, text: &str) {
        println!("{text}");
        self.append(text);
    }

    pub fn success(&mut self, text: &str) {
        let line = format!("✓ {text}");
        println!("{}", line.green());
        self.append(&line);
    }

    pub fn warning(&mut self, text: &str) {
        let line = format!("⚠ {text}");
        println!("{}", line.yellow());
        self.append(&line);
    }

    pub fn error(&mut self, text: &str) {
        let line = format!("✗ {text}");
        eprintln!("{}", line.red());
        self.append(&line);
    }

    /// Detail line: always logged, shown on the console only when verbose.
    pub fn detail(&mut self, text: &str) {
        if self.verbose {
            println!("{}", text.dimmed());
        }
        self.append(text);
    }

    /// Raw captured subprocess output: logged verbatim (indented), echoed
    /// to the console only when verbose.
    pub fn raw(&mut self, text: &str) {
        for line in text.lines() {
            if self.verbose {
                println!("  {line}");
            }
            self.append(&format!("  {line}"));
        }
    }

    /// Closing footer with the resolved exit status. Idempotent.
    pub fn finalize(&mut self, status: ExitStatus) {
        if self.finalized {
            return;
        }
        self.finalized = true;
        let stamp = Zoned::now().strftime("%Y-%m-%d %H:%M:%S").to_string();
        self.append("----");
        self.append(&format!(
            "Run finished: {stamp} (exit code {})",
            status.code()
        ));
    }

    // A log write failure must never take the run down with it.
    fn append(&mut self, text: &str) {
        let _ = writeln!(self.file, "{text}");
    }
}

impl Drop for RunLog {
    fn drop(&mut self) {
        // Covers panic unwinds and any path that skipped the explicit call.
        self.finalize(ExitStatus::CompletedWithErrors);
    }
}
