use crate::display::DisplayTier;
use crate::risk::RiskTier;
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
    /// Box-drawing characters in tables
    pub unicode: bool,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            unicode: true,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode, unicode: bool) -> Self {
        Self { color, unicode }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Check NO_COLOR environment variable (per no-color.org standard)
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    /// ASCII-only, no colors
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
            unicode: false,
        }
    }

    /// Apply a `use_color` setting from the config file. Environment
    /// overrides win over the file.
    pub fn with_config_color(mut self, use_color: Option<bool>) -> Self {
        if self.color == ColorMode::Auto {
            match use_color {
                Some(true) => self.color = ColorMode::Always,
                Some(false) => self.color = ColorMode::Never,
                None => {}
            }
        }
        self
    }

    pub fn use_color(&self) -> bool {
        self.color.should_use_color()
    }

    /// Point the `colored` crate at this configuration. Affects the whole
    /// process.
    pub fn apply(&self) {
        colored::control::set_override(self.use_color());
    }
}

pub fn paint_risk_tier(tier: RiskTier) -> ColoredString {
    match tier {
        RiskTier::High => tier.label().red().bold(),
        RiskTier::Med => tier.label().yellow().bold(),
        RiskTier::Low => tier.label().green(),
    }
}

pub fn display_tier_color(tier: DisplayTier) -> comfy_table::Color {
    match tier {
        DisplayTier::Best => comfy_table::Color::Green,
        DisplayTier::Mid => comfy_table::Color::Yellow,
        DisplayTier::Worst => comfy_table::Color::Red,
    }
}

pub fn risk_tier_color(tier: RiskTier) -> comfy_table::Color {
    match tier {
        RiskTier::High => comfy_table::Color::Red,
        RiskTier::Med => comfy_table::Color::Yellow,
        RiskTier::Low => comfy_table::Color::Green,
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
