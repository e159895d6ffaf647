//! Resolution of color values against a theme, and the derived color combinators.

use std::cell::Cell;
use std::sync::Arc;

use crate::colors::value::{ColorValue, DerivedColor};
use crate::themes::{Color, Theme};

/// How many color identifier hops a single resolution may follow on a thread.
/// Deeper chains are assumed to be cycles and resolve to no color.
pub const MAX_REFERENCE_DEPTH: usize = 64;

thread_local! {
    static REFERENCE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct DepthGuard;

impl Drop for DepthGuard {
    fn drop(&mut self) {
        REFERENCE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Follows a color identifier through the theme. The theme may itself resolve it
/// through the registry defaults, hence the depth tracking.
fn follow_reference(id: &str, theme: &dyn Theme) -> Option<Color> {
    let depth = REFERENCE_DEPTH.with(|depth| {
        let next = depth.get() + 1;
        depth.set(next);
        next
    });
    let _guard = DepthGuard;

    if depth > MAX_REFERENCE_DEPTH {
        log::warn!(
            "[follow_reference] more than {MAX_REFERENCE_DEPTH} references while resolving {id:?}, \
             giving up (circular color references?)"
        );
        return None;
    }

    theme.get_color(id)
}

/// Resolves an optional color value, `None` resolving to no color
pub fn resolve_color_value(value: Option<&ColorValue>, theme: &dyn Theme) -> Option<Color> {
    value.and_then(|value| value.resolve(theme))
}

impl ColorValue {
    /// Computes the concrete color of this value for the theme
    pub fn resolve(&self, theme: &dyn Theme) -> Option<Color> {
        match self {
            ColorValue::Literal(color) => Some(*color),
            ColorValue::Reference(id) if id.starts_with('#') => Color::from_hex(id).ok(),
            ColorValue::Reference(id) => follow_reference(id, theme),
            ColorValue::Derived(derived) => derived.resolve(theme),
        }
    }
}

impl DerivedColor {
    pub fn resolve(&self, theme: &dyn Theme) -> Option<Color> {
        match self {
            DerivedColor::Darken { value, factor } => {
                value.resolve(theme).map(|c| c.darken(*factor))
            }
            DerivedColor::Lighten { value, factor } => {
                value.resolve(theme).map(|c| c.lighten(*factor))
            }
            DerivedColor::Transparent { value, factor } => {
                value.resolve(theme).map(|c| c.transparent(*factor))
            }
            DerivedColor::OneOf(values) => values.iter().find_map(|value| value.resolve(theme)),
            DerivedColor::LessProminent {
                value,
                background,
                factor,
                transparency,
            } => {
                let from = value.resolve(theme)?;
                let Some(background) = background.resolve(theme) else {
                    return Some(from.transparent(factor * transparency));
                };
                let blended = if from.is_darker_than(&background) {
                    Color::get_lighter_color(&from, &background, *factor)
                } else {
                    Color::get_darker_color(&from, &background, *factor)
                };
                Some(blended.transparent(*transparency))
            }
            DerivedColor::Custom(compute) => compute(theme),
        }
    }
}

pub fn darken(value: impl Into<ColorValue>, factor: f64) -> ColorValue {
    DerivedColor::Darken {
        value: value.into(),
        factor,
    }
    .into()
}

pub fn lighten(value: impl Into<ColorValue>, factor: f64) -> ColorValue {
    DerivedColor::Lighten {
        value: value.into(),
        factor,
    }
    .into()
}

pub fn transparent(value: impl Into<ColorValue>, factor: f64) -> ColorValue {
    DerivedColor::Transparent {
        value: value.into(),
        factor,
    }
    .into()
}

pub fn one_of<V: Into<ColorValue>>(values: impl IntoIterator<Item = V>) -> ColorValue {
    DerivedColor::OneOf(values.into_iter().map(Into::into).collect()).into()
}

/// Moves `value` towards `background` by `factor` (lighter if it is darker than the
/// background, darker otherwise) then applies `transparency` to the alpha.
///
/// If the background does not resolve, `value` only gets its alpha scaled by
/// `factor * transparency`.
pub fn less_prominent(
    value: impl Into<ColorValue>,
    background: impl Into<ColorValue>,
    factor: f64,
    transparency: f64,
) -> ColorValue {
    DerivedColor::LessProminent {
        value: value.into(),
        background: background.into(),
        factor,
        transparency,
    }
    .into()
}

pub fn custom(
    compute: impl Fn(&dyn Theme) -> Option<Color> + Send + Sync + 'static,
) -> ColorValue {
    DerivedColor::Custom(Arc::new(compute)).into()
}
