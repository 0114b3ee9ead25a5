//! Style configuration
//!
//! - [`StyleConfig`]: the configuration object handed in by the host
//! - [`resolver`]: three-tier field-level merge (variable > type > default)
//! - [`validate`]: warnings with default substitution, hard configuration errors
//!
//! Every field of a [`StyleRecord`] is optional so that each tier can
//! override a single property. The structs deserialise from the camelCase
//! keys used in configuration files.

pub mod resolver;
pub mod validate;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use resolver::{ResolvedAnimation, ResolvedStyle, StyleResolver};

pub const DEFAULT_BORDER_COLOR: &str = "BLUE";
pub const DEFAULT_TEXT_COLOR: &str = "YELLOW";
pub const DEFAULT_CREATION_STYLE: &str = "FadeIn";
pub const DEFAULT_ANIMATION_STYLE: &str = "FadeToColor";
pub const DEFAULT_HIGHLIGHT: &str = "YELLOW";
pub const DEFAULT_ANIMATED_TEXT_COLOR: &str = "YELLOW";
pub const DEFAULT_CODE_TRACKING: &str = "stepInto";
pub const DEFAULT_HIGHLIGHTING_STYLE: &str = "inkpot";
pub const DEFAULT_TAB_SPACING: u32 = 2;

/// Region holding the source code listing
pub const CODE_ID: &str = "_code";
/// Region holding the variable table
pub const VARIABLES_ID: &str = "_variables";
/// Region holding subtitles
pub const SUBTITLE_ID: &str = "_subtitle";

/// Presentation properties while an element is being changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimatedStyle {
    pub border_color: Option<String>,
    pub text_color: Option<String>,
    pub pointer: Option<bool>,
    pub highlight: Option<String>,
    pub animation_style: Option<String>,
    pub animation_time: Option<f64>,
}

impl AnimatedStyle {
    /// Field-level merge; `self` wins where set
    pub fn or(&self, lower: &AnimatedStyle) -> AnimatedStyle {
        AnimatedStyle {
            border_color: self.border_color.clone().or_else(|| lower.border_color.clone()),
            text_color: self.text_color.clone().or_else(|| lower.text_color.clone()),
            pointer: self.pointer.or(lower.pointer),
            highlight: self.highlight.clone().or_else(|| lower.highlight.clone()),
            animation_style: self
                .animation_style
                .clone()
                .or_else(|| lower.animation_style.clone()),
            animation_time: self.animation_time.or(lower.animation_time),
        }
    }
}

/// Resting presentation properties of one instance or type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleRecord {
    pub border_color: Option<String>,
    pub text_color: Option<String>,
    pub show_label: Option<bool>,
    pub creation_style: Option<String>,
    pub creation_time: Option<f64>,
    pub animate: Option<AnimatedStyle>,
}

impl StyleRecord {
    /// Field-level merge; `self` wins where set. The animated sub-style is
    /// merged independently.
    pub fn or(&self, lower: &StyleRecord) -> StyleRecord {
        let animate = match (&self.animate, &lower.animate) {
            (Some(upper), Some(lower)) => Some(upper.or(lower)),
            (upper, lower) => upper.clone().or_else(|| lower.clone()),
        };
        StyleRecord {
            border_color: self.border_color.clone().or_else(|| lower.border_color.clone()),
            text_color: self.text_color.clone().or_else(|| lower.text_color.clone()),
            show_label: self.show_label.or(lower.show_label),
            creation_style: self
                .creation_style
                .clone()
                .or_else(|| lower.creation_style.clone()),
            creation_time: self.creation_time.or(lower.creation_time),
            animate,
        }
    }
}

/// Explicit placement of one instance or reserved region
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Corner points in the order top-left, top-right, bottom-left, bottom-right
pub type Corners = [(f64, f64); 4];

impl Position {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Position {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero width and zero height hides the instance
    pub fn is_hidden(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    pub fn corners(&self) -> Corners {
        let Position {
            x,
            y,
            width,
            height,
        } = *self;
        [
            (x, y + height),
            (x + width, y + height),
            (x, y),
            (x + width, y),
        ]
    }
}

/// How the code pointer follows calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTracking {
    StepInto,
    StepOver,
}

impl CodeTracking {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "stepInto" => Some(CodeTracking::StepInto),
            "stepOver" => Some(CodeTracking::StepOver),
            _ => None,
        }
    }
}

/// Host-supplied configuration for one compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    pub code_tracking: String,
    pub hide_code: bool,
    pub hide_variables: bool,
    pub syntax_highlighting_on: bool,
    pub syntax_highlighting_style: String,
    pub display_new_lines_in_code: bool,
    pub tab_spacing: u32,
    pub subtitles: StyleRecord,
    pub variables: BTreeMap<String, StyleRecord>,
    pub data_structures: BTreeMap<String, StyleRecord>,
    pub positions: BTreeMap<String, Position>,
    /// Upper bound on data structures constructed in one run
    pub max_data_structures: usize,
}

impl StyleConfig {
    pub fn code_tracking_mode(&self) -> CodeTracking {
        CodeTracking::from_name(&self.code_tracking).unwrap_or(CodeTracking::StepInto)
    }

    /// Explicit positions switch layout to manual mode: every instance and
    /// visible region then needs an entry
    pub fn has_user_positions(&self) -> bool {
        !self.positions.is_empty()
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            code_tracking: DEFAULT_CODE_TRACKING.to_string(),
            hide_code: false,
            hide_variables: false,
            syntax_highlighting_on: true,
            syntax_highlighting_style: DEFAULT_HIGHLIGHTING_STYLE.to_string(),
            display_new_lines_in_code: true,
            tab_spacing: DEFAULT_TAB_SPACING,
            subtitles: StyleRecord::default(),
            variables: BTreeMap::new(),
            data_structures: BTreeMap::new(),
            positions: BTreeMap::new(),
            max_data_structures: crate::interpreter::constants::DEFAULT_MAX_DATA_STRUCTURES,
        }
    }
}
