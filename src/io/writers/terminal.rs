use super::{format_percent, format_reading, format_scan_age};
use crate::core::Network;
use crate::display::{DisplayTier, NetworkDisplayTiers};
use crate::formatting::{display_tier_color, paint_risk_tier, risk_tier_color, FormattingConfig};
use crate::io::output::ReportWriter;
use crate::report::{EntityReport, FleetReport};
use crate::risk::RiskTier;
use colored::*;
use comfy_table::{presets, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use std::io::Write;

pub struct TerminalWriter<W: Write> {
    writer: W,
    formatting: FormattingConfig,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        Self { writer, formatting }
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.formatting.unicode {
                presets::UTF8_FULL
            } else {
                presets::ASCII_FULL
            })
            .set_content_arrangement(ContentArrangement::Dynamic);
        if self.formatting.use_color() {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table
    }

    fn styled(&self, cell: Cell, tier: Option<DisplayTier>) -> Cell {
        match tier {
            Some(tier) if self.formatting.use_color() => cell.fg(display_tier_color(tier)),
            _ => cell,
        }
    }
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &FleetReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        self.write_groups(report)?;
        self.write_entities(report)?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_header(&mut self, report: &FleetReport) -> anyhow::Result<()> {
        let rule = if self.formatting.unicode {
            "═══════════════════════════════════════════"
        } else {
            "==========================================="
        };
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", rule.cyan())?;
        writeln!(self.writer, "{}", "           FLEET RISK REPORT".bold().cyan())?;
        writeln!(self.writer, "{}", rule.cyan())?;
        writeln!(
            self.writer,
            "As of {} ({:?} display bands)",
            report.as_of.format("%Y-%m-%d %H:%M UTC"),
            report.context
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &FleetReport) -> anyhow::Result<()> {
        let stats = &report.summary;
        writeln!(self.writer, "{}", "Summary".bold())?;
        writeln!(self.writer, "  Units: {}", stats.unit_count)?;
        writeln!(
            self.writer,
            "  {} {}   {} {}   {} {}",
            paint_risk_tier(RiskTier::High),
            stats.tiers.high,
            paint_risk_tier(RiskTier::Med),
            stats.tiers.med,
            paint_risk_tier(RiskTier::Low),
            stats.tiers.low
        )?;
        writeln!(
            self.writer,
            "  Breakfix: {} primary, {} secondary, {} total",
            stats.breakfix.primary, stats.breakfix.secondary, stats.breakfix.total
        )?;
        writeln!(
            self.writer,
            "  Product compliance avg: {:.1}% primary, {:.1}% secondary",
            stats.averages.product_compliance.primary, stats.averages.product_compliance.secondary
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_groups(&mut self, report: &FleetReport) -> anyhow::Result<()> {
        if report.groups.is_empty() {
            return Ok(());
        }

        let mut table = self.table();
        table.set_header(vec![
            "Parent", "Group", "Code", "Units", "HIGH", "MED", "LOW", "Breakfix", "Product % P",
            "Product % S",
        ]);
        for (parent, rollups) in &report.groups {
            for rollup in rollups {
                let stats = &rollup.stats;
                table.add_row(vec![
                    Cell::new(parent),
                    Cell::new(&rollup.group.name),
                    Cell::new(&rollup.group.short_code),
                    Cell::new(stats.unit_count).set_alignment(CellAlignment::Right),
                    Cell::new(stats.tiers.high).set_alignment(CellAlignment::Right),
                    Cell::new(stats.tiers.med).set_alignment(CellAlignment::Right),
                    Cell::new(stats.tiers.low).set_alignment(CellAlignment::Right),
                    Cell::new(stats.breakfix.total).set_alignment(CellAlignment::Right),
                    Cell::new(format!("{:.1}", stats.averages.product_compliance.primary))
                        .set_alignment(CellAlignment::Right),
                    Cell::new(format!("{:.1}", stats.averages.product_compliance.secondary))
                        .set_alignment(CellAlignment::Right),
                ]);
            }
        }

        writeln!(self.writer, "{}", "Groups".bold())?;
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_entities(&mut self, report: &FleetReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Units".bold())?;
        if report.entities.is_empty() {
            writeln!(self.writer, "  No units in input.")?;
            return Ok(());
        }

        let mut table = self.table();
        table.set_header(vec![
            "Unit", "Group", "Tier", "Net", "VPH", "Product %", "True %", "Raw %", "Scan age",
            "Reasons",
        ]);
        for entity in report.by_severity() {
            self.add_entity_rows(&mut table, entity, report);
        }

        writeln!(self.writer, "{table}")?;
        Ok(())
    }

    /// One row per applicable network; unit-level columns only on the first.
    fn add_entity_rows(&self, table: &mut Table, entity: &EntityReport, report: &FleetReport) {
        let record = &entity.entity;
        let networks = record.applicable_networks();

        for (index, &network) in networks.iter().enumerate() {
            let Some(tiers) = entity.display.network(network) else {
                continue;
            };
            let first = index == 0;
            let telemetry = record.network(network);

            let mut tier_cell = Cell::new(if first { entity.tier().label() } else { "" });
            if first && self.formatting.use_color() {
                tier_cell = tier_cell
                    .fg(risk_tier_color(entity.tier()))
                    .add_attribute(Attribute::Bold);
            }

            table.add_row(vec![
                Cell::new(if first { record.id.as_str() } else { "" }),
                Cell::new(if first {
                    record.group_key().unwrap_or("-")
                } else {
                    ""
                }),
                tier_cell,
                Cell::new(network_short(network)),
                self.metric_cell(format_reading(telemetry.vph, 2), tiers.vph),
                self.metric_cell(format_percent(telemetry.product_compliance), tiers.product_compliance),
                self.metric_cell(format_percent(telemetry.true_policy), tiers.true_policy),
                self.metric_cell(format_percent(telemetry.raw_policy), tiers.raw_policy),
                self.scan_cell(tiers, format_scan_age(telemetry, report.as_of)),
                Cell::new(if first {
                    entity.reason_text.join("\n")
                } else {
                    String::new()
                }),
            ]);
        }
    }

    fn metric_cell(&self, text: String, tier: Option<DisplayTier>) -> Cell {
        self.styled(Cell::new(text).set_alignment(CellAlignment::Right), tier)
    }

    fn scan_cell(&self, tiers: &NetworkDisplayTiers, text: String) -> Cell {
        self.styled(
            Cell::new(text).set_alignment(CellAlignment::Right),
            Some(tiers.scan_recency),
        )
    }
}

fn network_short(network: Network) -> &'static str {
    match network {
        Network::Primary => "P",
        Network::Secondary => "S",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::GroupRegistry;
    use crate::config::ThresholdConfig;
    use crate::display::DisplayContext;
    use crate::testkit::{reference_time, EntityBuilder};

    fn render(report: &FleetReport, formatting: FormattingConfig) -> String {
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer, formatting)
            .write_report(report)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn sample_report() -> FleetReport {
        let as_of = reference_time();
        let fleet = vec![
            EntityBuilder::healthy("unit-low", as_of).group("alpha").build(),
            EntityBuilder::healthy("unit-high", as_of)
                .group("alpha")
                .secondary(|t| t.breakfix = Some(4))
                .build(),
            EntityBuilder::healthy("unit-solo", as_of)
                .single_network()
                .build(),
        ];
        FleetReport::build(
            &fleet,
            &ThresholdConfig::default(),
            &GroupRegistry::new(),
            DisplayContext::Standard,
            as_of,
        )
    }

    #[test]
    fn test_plain_terminal_output() {
        colored::control::set_override(false);
        let output = render(&sample_report(), FormattingConfig::plain());

        assert!(output.contains("FLEET RISK REPORT"));
        assert!(output.contains("Units: 3"));
        assert!(output.contains("unit-high"));
        assert!(output.contains("Secondary breakfix 4 > 0 (HIGH)"));
        assert!(!output.contains('\u{1b}'), "plain output must not carry ANSI codes");
        assert!(!output.contains('═'));
    }

    #[test]
    fn test_high_units_listed_first() {
        colored::control::set_override(false);
        let output = render(&sample_report(), FormattingConfig::plain());
        let high = output.find("unit-high").unwrap();
        let low = output.find("unit-low").unwrap();
        assert!(high < low);
    }
}
