// src/report.rs

//! Rendering findings for the operator
//!
//! Sinks only render: they never filter, merge or deduplicate findings.

use crate::check::{Finding, Section, Summary};
use serde::Serialize;
use std::io::{self, Write};

/// Receiver of check output
pub trait ReportSink {
    /// A new section starts; following findings belong to it
    fn begin_section(&mut self, section: Section) -> io::Result<()>;

    /// One finding of the current section
    fn finding(&mut self, finding: &Finding) -> io::Result<()>;

    /// All sections are done
    fn finish(&mut self, summary: &Summary) -> io::Result<()>;
}

/// Line-oriented text report
pub struct TextReport<W: Write> {
    out: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn begin_section(&mut self, section: Section) -> io::Result<()> {
        writeln!(self.out, "\n{}:", section.title())
    }

    fn finding(&mut self, finding: &Finding) -> io::Result<()> {
        writeln!(self.out, "{}", finding)
    }

    fn finish(&mut self, summary: &Summary) -> io::Result<()> {
        writeln!(
            self.out,
            "\n{} missing dependencies, {} missing shared libraries, {} duplicate providers",
            summary.missing_dependencies, summary.missing_shlibs, summary.duplicate_providers
        )?;
        self.out.flush()
    }
}

/// JSON report, written as one document once the check finishes
pub struct JsonReport<W: Write> {
    out: W,
    current: Option<Section>,
    runtime_dependencies: Vec<Finding>,
    shared_libraries: Vec<Finding>,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    runtime_dependencies: &'a [Finding],
    shared_libraries: &'a [Finding],
    summary: &'a Summary,
}

impl<W: Write> JsonReport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current: None,
            runtime_dependencies: Vec::new(),
            shared_libraries: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonReport<W> {
    fn begin_section(&mut self, section: Section) -> io::Result<()> {
        self.current = Some(section);
        Ok(())
    }

    fn finding(&mut self, finding: &Finding) -> io::Result<()> {
        match self.current {
            Some(Section::SharedLibraries) => self.shared_libraries.push(finding.clone()),
            // Collisions are reported while the provider index is built
            Some(Section::RuntimeDependencies) | None => {
                self.runtime_dependencies.push(finding.clone())
            }
        }
        Ok(())
    }

    fn finish(&mut self, summary: &Summary) -> io::Result<()> {
        let document = JsonDocument {
            runtime_dependencies: &self.runtime_dependencies,
            shared_libraries: &self.shared_libraries,
            summary,
        };
        serde_json::to_writer_pretty(&mut self.out, &document)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
