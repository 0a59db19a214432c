use super::{format_percent, format_reading, format_scan_age};
use crate::aggregation::RollupStats;
use crate::core::Network;
use crate::io::output::ReportWriter;
use crate::report::{EntityReport, FleetReport};
use chrono::{DateTime, Utc};
use std::io::Write;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &FleetReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(&report.summary)?;
        self.write_groups(report)?;
        self.write_entities(report)?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &FleetReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Fleet Risk Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "As of: {}",
            report.as_of.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, stats: &RollupStats) -> anyhow::Result<()> {
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Units | {} |", stats.unit_count)?;
        writeln!(self.writer, "| HIGH | {} |", stats.tiers.high)?;
        writeln!(self.writer, "| MED | {} |", stats.tiers.med)?;
        writeln!(self.writer, "| LOW | {} |", stats.tiers.low)?;
        writeln!(
            self.writer,
            "| Breakfix (primary / secondary / total) | {} / {} / {} |",
            stats.breakfix.primary, stats.breakfix.secondary, stats.breakfix.total
        )?;

        let averages = [
            ("Product compliance", &stats.averages.product_compliance),
            ("True policy", &stats.averages.true_policy),
            ("Raw policy", &stats.averages.raw_policy),
        ];
        for (label, pair) in averages {
            writeln!(
                self.writer,
                "| {} avg (primary / secondary) | {:.1}% / {:.1}% |",
                label, pair.primary, pair.secondary
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_groups(&mut self, report: &FleetReport) -> anyhow::Result<()> {
        if report.groups.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Groups")?;
        writeln!(self.writer)?;
        for (parent, rollups) in &report.groups {
            writeln!(self.writer, "### {}", escape(parent))?;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "| Group | Code | Units | HIGH | MED | LOW | Breakfix | Product % (P / S) |"
            )?;
            writeln!(
                self.writer,
                "|-------|------|-------|------|-----|-----|----------|-------------------|"
            )?;
            for rollup in rollups {
                let stats = &rollup.stats;
                writeln!(
                    self.writer,
                    "| {} | {} | {} | {} | {} | {} | {} | {:.1} / {:.1} |",
                    escape(&rollup.group.name),
                    escape(&rollup.group.short_code),
                    stats.unit_count,
                    stats.tiers.high,
                    stats.tiers.med,
                    stats.tiers.low,
                    stats.breakfix.total,
                    stats.averages.product_compliance.primary,
                    stats.averages.product_compliance.secondary,
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_entities(&mut self, report: &FleetReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Units")?;
        writeln!(self.writer)?;
        if report.entities.is_empty() {
            writeln!(self.writer, "No units in input.")?;
            return Ok(());
        }

        writeln!(
            self.writer,
            "| Unit | Group | Tier | VPH (P / S) | Product % (P / S) | Scan age (P / S) | Reasons |"
        )?;
        writeln!(
            self.writer,
            "|------|-------|------|-------------|-------------------|------------------|---------|"
        )?;
        for entity in report.by_severity() {
            self.write_entity_row(entity, report.as_of)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_entity_row(&mut self, report: &EntityReport, as_of: DateTime<Utc>) -> anyhow::Result<()> {
        let entity = &report.entity;
        let pair = |cell: &dyn Fn(Network) -> String| {
            let primary = cell(Network::Primary);
            if entity.is_excluded(Network::Secondary) {
                primary
            } else {
                format!("{} / {}", primary, cell(Network::Secondary))
            }
        };

        let vph = pair(&|n| format_reading(entity.network(n).vph, 2));
        let product = pair(&|n| format_percent(entity.network(n).product_compliance));
        let scan = pair(&|n| format_scan_age(entity.network(n), as_of));
        let reasons = if report.reason_text.is_empty() {
            "-".to_string()
        } else {
            report.reason_text.join("; ")
        };

        writeln!(
            self.writer,
            "| {} | {} | {} | {} | {} | {} | {} |",
            escape(&entity.id),
            escape(entity.group_key().unwrap_or("-")),
            report.tier(),
            vph,
            product,
            scan,
            escape(&reasons),
        )?;
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}
