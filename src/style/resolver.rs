//! Style resolution
//!
//! Precedence, highest first: the variable's own style, the style for its
//! data-structure kind, the engine defaults. Each field is merged on its
//! own, and the animated sub-style goes through the same three tiers
//! independently of the resting style.

use super::{
    AnimatedStyle, Position, StyleConfig, StyleRecord, DEFAULT_ANIMATED_TEXT_COLOR,
    DEFAULT_ANIMATION_STYLE, DEFAULT_BORDER_COLOR, DEFAULT_CREATION_STYLE, DEFAULT_HIGHLIGHT,
    DEFAULT_TEXT_COLOR,
};

/// Resting style with every field filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub border_color: String,
    pub text_color: String,
    pub show_label: bool,
    pub creation_style: String,
    pub creation_time: Option<f64>,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        ResolvedStyle {
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            show_label: true,
            creation_style: DEFAULT_CREATION_STYLE.to_string(),
            creation_time: None,
        }
    }
}

/// In-motion style with every field filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnimation {
    pub border_color: Option<String>,
    pub text_color: String,
    pub pointer: bool,
    pub highlight: String,
    pub animation_style: String,
    pub animation_time: Option<f64>,
}

impl From<AnimatedStyle> for ResolvedAnimation {
    fn from(style: AnimatedStyle) -> Self {
        ResolvedAnimation {
            border_color: style.border_color,
            text_color: style
                .text_color
                .unwrap_or_else(|| DEFAULT_ANIMATED_TEXT_COLOR.to_string()),
            pointer: style.pointer.unwrap_or(true),
            highlight: style.highlight.unwrap_or_else(|| DEFAULT_HIGHLIGHT.to_string()),
            animation_style: style
                .animation_style
                .unwrap_or_else(|| DEFAULT_ANIMATION_STYLE.to_string()),
            animation_time: style.animation_time,
        }
    }
}

/// Read-only view over a validated [`StyleConfig`]
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    config: StyleConfig,
}

impl StyleResolver {
    pub fn new(config: StyleConfig) -> Self {
        StyleResolver { config }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    fn tiers(&self, variable: &str, kind: &str) -> (Option<&StyleRecord>, Option<&StyleRecord>) {
        (
            self.config.variables.get(variable),
            self.config.data_structures.get(kind),
        )
    }

    /// Resting style for `variable`, whose data-structure kind is named `kind`
    pub fn resolve(&self, variable: &str, kind: &str) -> ResolvedStyle {
        let empty = StyleRecord::default();
        let (own, by_kind) = self.tiers(variable, kind);
        let merged = own.unwrap_or(&empty).or(by_kind.unwrap_or(&empty));
        let defaults = ResolvedStyle::default();

        ResolvedStyle {
            border_color: merged.border_color.unwrap_or(defaults.border_color),
            text_color: merged.text_color.unwrap_or(defaults.text_color),
            show_label: merged.show_label.unwrap_or(defaults.show_label),
            creation_style: merged.creation_style.unwrap_or(defaults.creation_style),
            creation_time: merged.creation_time,
        }
    }

    /// Animated style, present only when some tier declares an `animate` block
    pub fn resolve_animated(&self, variable: &str, kind: &str) -> Option<ResolvedAnimation> {
        let (own, by_kind) = self.tiers(variable, kind);
        let own = own.and_then(|record| record.animate.as_ref());
        let by_kind = by_kind.and_then(|record| record.animate.as_ref());

        let merged = match (own, by_kind) {
            (None, None) => return None,
            (Some(own), Some(by_kind)) => own.or(by_kind),
            (Some(only), None) | (None, Some(only)) => only.clone(),
        };
        Some(merged.into())
    }

    pub fn position(&self, uid: &str) -> Option<&Position> {
        self.config.positions.get(uid)
    }

    /// False only for instances placed with a zero-area position
    pub fn renders(&self, uid: &str) -> bool {
        self.position(uid).map_or(true, |position| !position.is_hidden())
    }
}
