//! The base workbench colors.

use crate::colors::registry::{ColorContribution, ColorRegistry};
use crate::colors::resolve::{darken, less_prominent, lighten, one_of, transparent};
use crate::colors::value::{ColorDefaults, ColorValue};
use crate::themes::Color;

pub const FOREGROUND: &str = "foreground";
pub const ERROR_FOREGROUND: &str = "errorForeground";
pub const DESCRIPTION_FOREGROUND: &str = "descriptionForeground";
pub const FOCUS_BORDER: &str = "focusBorder";
pub const CONTRAST_BORDER: &str = "contrastBorder";
pub const CONTRAST_ACTIVE_BORDER: &str = "contrastActiveBorder";

pub const EDITOR_BACKGROUND: &str = "editor.background";
pub const EDITOR_FOREGROUND: &str = "editor.foreground";
pub const EDITOR_SELECTION_BACKGROUND: &str = "editor.selectionBackground";
pub const EDITOR_INACTIVE_SELECTION_BACKGROUND: &str = "editor.inactiveSelectionBackground";
pub const EDITOR_SELECTION_HIGHLIGHT_BACKGROUND: &str = "editor.selectionHighlightBackground";
pub const EDITOR_FIND_MATCH_BACKGROUND: &str = "editor.findMatchBackground";
pub const EDITOR_FIND_MATCH_HIGHLIGHT_BACKGROUND: &str = "editor.findMatchHighlightBackground";
pub const EDITOR_LINE_NUMBER_FOREGROUND: &str = "editorLineNumber.foreground";
pub const EDITOR_ACTIVE_LINE_NUMBER_FOREGROUND: &str = "editorLineNumber.activeForeground";

pub const EDITOR_WIDGET_BACKGROUND: &str = "editorWidget.background";
pub const EDITOR_WIDGET_BORDER: &str = "editorWidget.border";
pub const EDITOR_HOVER_BACKGROUND: &str = "editorHoverWidget.background";
pub const EDITOR_HOVER_BORDER: &str = "editorHoverWidget.border";

pub const BUTTON_BACKGROUND: &str = "button.background";
pub const BUTTON_FOREGROUND: &str = "button.foreground";
pub const BUTTON_HOVER_BACKGROUND: &str = "button.hoverBackground";

fn hex(value: &str) -> ColorValue {
    ColorValue::from(value)
}

fn defaults(
    dark: impl Into<ColorValue>,
    light: impl Into<ColorValue>,
    hc: Option<ColorValue>,
) -> ColorDefaults {
    ColorDefaults {
        dark: Some(dark.into()),
        light: Some(light.into()),
        hc,
    }
}

/// Registers the base workbench colors into `registry`
pub fn register_standard_colors(registry: &ColorRegistry) {
    let contributions = [
        // base
        ColorContribution::new(
            FOREGROUND,
            defaults("#CCCCCC", "#616161", Some(Color::WHITE.into())),
            "Overall foreground color, used when not overridden by a component.",
        ),
        ColorContribution::new(
            ERROR_FOREGROUND,
            defaults("#F48771", "#A1260D", Some(hex("#F48771"))),
            "Overall foreground color for error messages.",
        ),
        ColorContribution::new(
            DESCRIPTION_FOREGROUND,
            defaults(
                transparent(FOREGROUND, 0.7),
                "#717171",
                Some(transparent(FOREGROUND, 0.7)),
            ),
            "Foreground color for description text providing additional information.",
        ),
        ColorContribution::new(
            FOCUS_BORDER,
            defaults("#007FD4", "#0090F1", Some(hex("#F38518"))),
            "Overall border color for focused elements.",
        ),
        ColorContribution::new(
            CONTRAST_BORDER,
            ColorDefaults {
                hc: Some(hex("#6FC3DF")),
                ..Default::default()
            },
            "An extra border around elements to separate them from others for greater contrast.",
        ),
        ColorContribution::new(
            CONTRAST_ACTIVE_BORDER,
            ColorDefaults {
                hc: Some(FOCUS_BORDER.into()),
                ..Default::default()
            },
            "An extra border around active elements to separate them from others for greater contrast.",
        ),
        // editor
        ColorContribution::new(
            EDITOR_BACKGROUND,
            defaults("#1E1E1E", "#FFFFFE", Some(Color::BLACK.into())),
            "Editor background color.",
        ),
        ColorContribution::new(
            EDITOR_FOREGROUND,
            defaults("#D4D4D4", "#333333", Some(Color::WHITE.into())),
            "Editor default foreground color.",
        ),
        ColorContribution::new(
            EDITOR_SELECTION_BACKGROUND,
            defaults("#264F78", "#ADD6FF", Some(hex("#F3F518"))),
            "Color of the editor selection.",
        ),
        ColorContribution::new(
            EDITOR_INACTIVE_SELECTION_BACKGROUND,
            ColorDefaults {
                dark: Some(transparent(EDITOR_SELECTION_BACKGROUND, 0.5)),
                light: Some(transparent(EDITOR_SELECTION_BACKGROUND, 0.5)),
                hc: Some(transparent(EDITOR_SELECTION_BACKGROUND, 0.5)),
            },
            "Color of the selection in an inactive editor.",
        )
        .needs_transparency(true),
        ColorContribution::new(
            EDITOR_SELECTION_HIGHLIGHT_BACKGROUND,
            ColorDefaults::new(
                less_prominent(EDITOR_SELECTION_BACKGROUND, EDITOR_BACKGROUND, 0.3, 0.6),
                less_prominent(EDITOR_SELECTION_BACKGROUND, EDITOR_BACKGROUND, 0.3, 0.6),
                hex("#00000000"),
            ),
            "Color for regions with the same content as the selection.",
        )
        .needs_transparency(true),
        ColorContribution::new(
            EDITOR_FIND_MATCH_BACKGROUND,
            defaults("#515C6A", "#A8AC94", None),
            "Color of the current search match.",
        ),
        ColorContribution::new(
            EDITOR_FIND_MATCH_HIGHLIGHT_BACKGROUND,
            defaults("#EA5C0055", "#EA5C0055", None),
            "Color of the other search matches.",
        )
        .needs_transparency(true),
        ColorContribution::new(
            EDITOR_LINE_NUMBER_FOREGROUND,
            defaults("#858585", "#237893", Some(Color::WHITE.into())),
            "Color of editor line numbers.",
        ),
        ColorContribution::new(
            EDITOR_ACTIVE_LINE_NUMBER_FOREGROUND,
            ColorDefaults::new(
                "#C6C6C6",
                "#0B216F",
                one_of([ColorValue::from(CONTRAST_ACTIVE_BORDER), EDITOR_LINE_NUMBER_FOREGROUND.into()]),
            ),
            "Color of the editor active line number.",
        ),
        // widgets
        ColorContribution::new(
            EDITOR_WIDGET_BACKGROUND,
            defaults("#252526", "#F3F3F3", Some(hex("#0C141F"))),
            "Background color of editor widgets, such as find/replace.",
        ),
        ColorContribution::new(
            EDITOR_WIDGET_BORDER,
            ColorDefaults {
                dark: Some(hex("#454545")),
                light: Some(hex("#C8C8C8")),
                hc: Some(CONTRAST_BORDER.into()),
            },
            "Border color of editor widgets.",
        ),
        ColorContribution::new(
            EDITOR_HOVER_BACKGROUND,
            ColorDefaults::all(EDITOR_WIDGET_BACKGROUND),
            "Background color of the editor hover.",
        ),
        ColorContribution::new(
            EDITOR_HOVER_BORDER,
            ColorDefaults::all(EDITOR_WIDGET_BORDER),
            "Border color of the editor hover.",
        ),
        // buttons
        ColorContribution::new(
            BUTTON_FOREGROUND,
            ColorDefaults::all(Color::WHITE),
            "Button foreground color.",
        ),
        ColorContribution::new(
            BUTTON_BACKGROUND,
            defaults("#0E639C", "#007ACC", None),
            "Button background color.",
        ),
        ColorContribution::new(
            BUTTON_HOVER_BACKGROUND,
            defaults(
                lighten(BUTTON_BACKGROUND, 0.2),
                darken(BUTTON_BACKGROUND, 0.2),
                None,
            ),
            "Button background color when hovering.",
        ),
    ];

    for contribution in contributions {
        registry.register_contribution(contribution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::{ColorTheme, Theme, ThemeType};

    fn color(hex: &str) -> Color {
        Color::from_hex(hex).unwrap()
    }

    fn registry() -> ColorRegistry {
        let registry = ColorRegistry::new();
        register_standard_colors(&registry);
        registry
    }

    #[test]
    fn registers_in_order() {
        let registry = registry();
        let colors = registry.get_colors();
        assert_eq!(colors[0].id, FOREGROUND);
        assert_eq!(colors.last().unwrap().id, BUTTON_HOVER_BACKGROUND);
        assert!(registry.contains(EDITOR_BACKGROUND));
        assert!(
            registry
                .get_color(EDITOR_FIND_MATCH_HIGHLIGHT_BACKGROUND)
                .unwrap()
                .needs_transparency
        );
    }

    #[test]
    fn resolves_per_theme_type() {
        let registry = registry();
        let dark = ColorTheme::new("dark", ThemeType::Dark).with_registry(registry.clone());
        let light = ColorTheme::new("light", ThemeType::Light).with_registry(registry.clone());
        let hc = ColorTheme::new("hc", ThemeType::HighContrast).with_registry(registry);

        assert_eq!(dark.get_color(EDITOR_BACKGROUND), Some(color("#1E1E1E")));
        assert_eq!(light.get_color(EDITOR_BACKGROUND), Some(color("#FFFFFE")));
        assert_eq!(hc.get_color(EDITOR_BACKGROUND), Some(Color::BLACK));

        // references
        assert_eq!(dark.get_color(EDITOR_HOVER_BACKGROUND), Some(color("#252526")));
        assert_eq!(hc.get_color(CONTRAST_ACTIVE_BORDER), Some(color("#F38518")));
        assert_eq!(dark.get_color(CONTRAST_BORDER), None);
        assert_eq!(dark.get_color(EDITOR_HOVER_BORDER), Some(color("#454545")));
        assert_eq!(hc.get_color(EDITOR_HOVER_BORDER), Some(color("#6FC3DF")));
        // one_of takes the contrast border before the line number color
        assert_eq!(hc.get_color(EDITOR_ACTIVE_LINE_NUMBER_FOREGROUND), Some(color("#F38518")));

        // derived
        assert_eq!(
            dark.get_color(EDITOR_INACTIVE_SELECTION_BACKGROUND),
            Some(color("#264F7880"))
        );
        assert_eq!(
            dark.get_color(DESCRIPTION_FOREGROUND),
            Some(color("#CCCCCC").transparent(0.7))
        );
        let hover = dark.get_color(BUTTON_HOVER_BACKGROUND).unwrap();
        assert!(hover.is_lighter_than(&color("#0E639C")));
        let hover = light.get_color(BUTTON_HOVER_BACKGROUND).unwrap();
        assert!(hover.is_darker_than(&color("#007ACC")));
        assert_eq!(hc.get_color(BUTTON_HOVER_BACKGROUND), None);
    }

    #[test]
    fn theme_colors_override_defaults_used_by_derived_colors() {
        let theme = ColorTheme::new("t", ThemeType::Dark)
            .with_color(EDITOR_BACKGROUND, Color::WHITE)
            .with_color(EDITOR_SELECTION_BACKGROUND, color("#808080"))
            .with_registry(registry());

        // the selection is darker than the white background: it gets lighter, then faded
        let highlight = theme
            .get_color(EDITOR_SELECTION_HIGHLIGHT_BACKGROUND)
            .unwrap();
        assert!(highlight.is_lighter_than(&color("#808080")));
        assert_eq!(highlight.alpha(), 153);
    }
}
