use super::writers::{JsonWriter, MarkdownWriter, TerminalWriter};
use crate::formatting::FormattingConfig;
use crate::report::FleetReport;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    #[default]
    Terminal,
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &FleetReport) -> anyhow::Result<()>;
}

/// Writer for `format` over any byte sink.
pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
    formatting: FormattingConfig,
) -> Box<dyn ReportWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer, formatting)),
    }
}

/// Render `report` to a string.
pub fn render_report(
    report: &FleetReport,
    format: OutputFormat,
    formatting: FormattingConfig,
) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    create_writer(format, &mut buffer, formatting).write_report(report)?;
    Ok(String::from_utf8(buffer)?)
}
