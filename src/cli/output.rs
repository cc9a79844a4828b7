/// Output formatting for CLI results
///
/// - JSON: one pretty-printed document per result (default)
/// - NDJSON: one compact line per result, or per element for lists
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Ndjson,
}

pub struct OutputWriter<W: Write = io::Stdout> {
    format: OutputFormat,
    writer: W,
}

impl OutputWriter {
    /// Writer bound to stdout
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn new(format: OutputFormat, writer: W) -> Self {
        Self { format, writer }
    }

    /// Write a single value
    pub fn write_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        match self.format {
            OutputFormat::Json => writeln!(self.writer, "{}", serde_json::to_string_pretty(value)?)?,
            OutputFormat::Ndjson => writeln!(self.writer, "{}", serde_json::to_string(value)?)?,
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Write a list: a JSON array, or one NDJSON line per element
    pub fn write_list<T: Serialize>(&mut self, items: &[T]) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.write_value(items),
            OutputFormat::Ndjson => {
                for item in items {
                    writeln!(self.writer, "{}", serde_json::to_string(item)?)?;
                }
                self.writer.flush()?;
                Ok(())
            }
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
