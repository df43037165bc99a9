//! Terminal output for the srcveto CLI
//!
//! Styled, quiet-aware printing shared by every command.

use console::style;

use crate::filter::Decision;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print only when verbose mode is on
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// One line per evaluated path
    pub fn decision(&self, path: &str, decision: Decision) {
        if self.quiet {
            return;
        }
        match decision {
            Decision::Include => println!("{} {}", style("✓ include").green().bold(), path),
            Decision::Exclude(reason) => println!(
                "{} {} {}",
                style("✗ exclude").red().bold(),
                path,
                style(format!("({reason})")).dim()
            ),
        }
    }

    pub fn table_row(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<24} {}", style(key).dim(), value);
        }
    }

    /// Print a count/summary with enhanced styling
    pub fn count(&self, icon: &str, message: &str, count: usize) {
        if !self.quiet {
            println!(
                "{} {} {}",
                style(icon).cyan().bold(),
                style(message).bold(),
                style(format!("({count})")).dim()
            );
        }
    }

    pub fn summary_stats(&self, label: &str, value: usize) {
        if !self.quiet {
            println!("  {} {}", style(label).dim(), style(value.to_string()).bold());
        }
    }

    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }
}
