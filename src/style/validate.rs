//! Configuration validation
//!
//! Runs once per loaded configuration, after analysis so undeclared variable
//! styles can be reported. Unknown names are warnings and are replaced by
//! the engine default. Malformed positions are hard errors.

use super::{
    AnimatedStyle, StyleConfig, StyleRecord, CODE_ID, DEFAULT_ANIMATION_STYLE,
    DEFAULT_CODE_TRACKING, DEFAULT_CREATION_STYLE, DEFAULT_HIGHLIGHTING_STYLE, SUBTITLE_ID,
    VARIABLES_ID,
};
use crate::semantic::diagnostics::{Diagnostics, Warning};
use crate::types::DataStructureKind;
use rustc_hash::FxHashSet;
use thiserror::Error;

pub const CREATION_STYLES: &[&str] = &[
    "FadeIn",
    "FadeInFromLarge",
    "Write",
    "GrowFromCenter",
    "ShowCreation",
    "DrawBorderThenFill",
];

pub const ANIMATION_STYLES: &[&str] = &[
    "FadeToColor",
    "Indicate",
    "ApplyWave",
    "WiggleOutThenIn",
    "CircleIndicate",
    "TurnInsideOut",
];

pub const CODE_TRACKING_MODES: &[&str] = &["stepInto", "stepOver"];

pub const HIGHLIGHTING_STYLES: &[&str] = &[
    "inkpot",
    "solarized-dark",
    "paraiso-dark",
    "vim",
    "fruity",
    "native",
    "monokai",
];

pub const RESERVED_IDS: &[&str] = &[CODE_ID, VARIABLES_ID, SUBTITLE_ID];

/// Minimum height of the code listing region
pub const MIN_CODE_HEIGHT: f64 = 1.0;
/// Minimum height of the variable table region
pub const MIN_VARIABLES_HEIGHT: f64 = 2.0;

/// Configuration faults that abort compilation before execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Missing field entry in position definition for '{id}': width and height must both be zero or both be non-zero")]
    IncompletePosition { id: String },

    #[error("Cannot create code block with height smaller than 1 (found {height})")]
    CodeBlockTooSmall { height: f64 },

    #[error("Cannot create variable block with height smaller than 2 (found {height})")]
    VariableBlockTooSmall { height: f64 },

    #[error("Position for '{id}' has negative dimensions")]
    NegativeDimensions { id: String },
}

/// Check `config`, record warnings and return the configuration with every
/// unknown name replaced by its default
pub fn validate(
    mut config: StyleConfig,
    declared: &FxHashSet<String>,
    diagnostics: &mut Diagnostics,
) -> Result<StyleConfig, ConfigError> {
    check_positions(&config)?;

    if !CODE_TRACKING_MODES.contains(&config.code_tracking.as_str()) {
        diagnostics.warn(Warning::UnknownCodeTracking {
            mode: std::mem::take(&mut config.code_tracking),
            fallback: DEFAULT_CODE_TRACKING,
        });
        config.code_tracking = DEFAULT_CODE_TRACKING.to_string();
    }

    if !HIGHLIGHTING_STYLES.contains(&config.syntax_highlighting_style.as_str()) {
        diagnostics.warn(Warning::UnknownHighlightingStyle {
            style: std::mem::take(&mut config.syntax_highlighting_style),
            fallback: DEFAULT_HIGHLIGHTING_STYLE,
        });
        config.syntax_highlighting_style = DEFAULT_HIGHLIGHTING_STYLE.to_string();
    }

    config.data_structures.retain(|name, _| {
        let known = DataStructureKind::from_name(name).is_some();
        if !known {
            diagnostics.warn(Warning::UnknownDataStructure { name: name.clone() });
        }
        known
    });

    for name in config.variables.keys() {
        if !declared.contains(name) && !RESERVED_IDS.contains(&name.as_str()) {
            diagnostics.warn(Warning::UndeclaredVariableStyle { name: name.clone() });
        }
    }

    sanitise_record(&mut config.subtitles, diagnostics);
    for record in config
        .variables
        .values_mut()
        .chain(config.data_structures.values_mut())
    {
        sanitise_record(record, diagnostics);
    }

    Ok(config)
}

fn check_positions(config: &StyleConfig) -> Result<(), ConfigError> {
    for (id, position) in &config.positions {
        if position.width < 0.0 || position.height < 0.0 {
            return Err(ConfigError::NegativeDimensions { id: id.clone() });
        }
        if (position.width == 0.0) != (position.height == 0.0) {
            return Err(ConfigError::IncompletePosition { id: id.clone() });
        }
    }

    if let Some(code) = config.positions.get(CODE_ID) {
        if !code.is_hidden() && code.height < MIN_CODE_HEIGHT {
            return Err(ConfigError::CodeBlockTooSmall {
                height: code.height,
            });
        }
    }
    if let Some(variables) = config.positions.get(VARIABLES_ID) {
        if !variables.is_hidden() && variables.height < MIN_VARIABLES_HEIGHT {
            return Err(ConfigError::VariableBlockTooSmall {
                height: variables.height,
            });
        }
    }
    Ok(())
}

fn sanitise_record(record: &mut StyleRecord, diagnostics: &mut Diagnostics) {
    if let Some(style) = &record.creation_style {
        if !CREATION_STYLES.contains(&style.as_str()) {
            diagnostics.warn(Warning::UnknownCreationStyle {
                style: style.clone(),
                fallback: DEFAULT_CREATION_STYLE,
            });
            record.creation_style = Some(DEFAULT_CREATION_STYLE.to_string());
        }
    }
    if let Some(animate) = &mut record.animate {
        sanitise_animation(animate, diagnostics);
    }
}

fn sanitise_animation(animate: &mut AnimatedStyle, diagnostics: &mut Diagnostics) {
    if let Some(style) = &animate.animation_style {
        if !ANIMATION_STYLES.contains(&style.as_str()) {
            diagnostics.warn(Warning::UnknownAnimationStyle {
                style: style.clone(),
                fallback: DEFAULT_ANIMATION_STYLE,
            });
            animate.animation_style = Some(DEFAULT_ANIMATION_STYLE.to_string());
        }
    }
}
