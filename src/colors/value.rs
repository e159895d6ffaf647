use std::fmt;
use std::sync::Arc;

use crate::themes::{Color, Theme, ThemeType};

/// A function computing a color from the active theme
pub type ColorFn = Arc<dyn Fn(&dyn Theme) -> Option<Color> + Send + Sync>;

/// The value of a color default: a literal color, another color identifier, or a color
/// derived from other values at resolution time.
#[derive(Clone)]
pub enum ColorValue {
    Literal(Color),
    Reference(String),
    Derived(Arc<DerivedColor>),
}

/// Colors computed from other color values when resolved against a theme
#[derive(Clone)]
pub enum DerivedColor {
    Darken {
        value: ColorValue,
        factor: f64,
    },
    Lighten {
        value: ColorValue,
        factor: f64,
    },
    Transparent {
        value: ColorValue,
        factor: f64,
    },
    /// The first value resolving to a color
    OneOf(Vec<ColorValue>),
    LessProminent {
        value: ColorValue,
        background: ColorValue,
        factor: f64,
        transparency: f64,
    },
    Custom(ColorFn),
}

impl fmt::Debug for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorValue::Literal(color) => write!(f, "{}", color.as_hex()),
            ColorValue::Reference(id) => write!(f, "{id:?}"),
            ColorValue::Derived(derived) => fmt::Debug::fmt(derived.as_ref(), f),
        }
    }
}

impl fmt::Debug for DerivedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivedColor::Darken { value, factor } => write!(f, "darken({value:?}, {factor})"),
            DerivedColor::Lighten { value, factor } => write!(f, "lighten({value:?}, {factor})"),
            DerivedColor::Transparent { value, factor } => {
                write!(f, "transparent({value:?}, {factor})")
            }
            DerivedColor::OneOf(values) => f.debug_tuple("oneOf").field(values).finish(),
            DerivedColor::LessProminent {
                value,
                background,
                factor,
                transparency,
            } => write!(
                f,
                "lessProminent({value:?}, {background:?}, {factor}, {transparency})"
            ),
            DerivedColor::Custom(_) => write!(f, "custom(..)"),
        }
    }
}

impl From<Color> for ColorValue {
    fn from(color: Color) -> Self {
        ColorValue::Literal(color)
    }
}

/// Strings starting with `#` are hex literals, anything else is a color identifier.
///
/// An invalid hex literal is kept as is and resolves to no color.
impl From<&str> for ColorValue {
    fn from(value: &str) -> Self {
        if value.starts_with('#') {
            match Color::from_hex(value) {
                Ok(color) => return ColorValue::Literal(color),
                Err(err) => log::warn!("[ColorValue::from] {err}"),
            }
        }
        ColorValue::Reference(value.to_owned())
    }
}

impl From<String> for ColorValue {
    fn from(value: String) -> Self {
        ColorValue::from(value.as_str())
    }
}

impl From<DerivedColor> for ColorValue {
    fn from(derived: DerivedColor) -> Self {
        ColorValue::Derived(Arc::new(derived))
    }
}

/// Default value of a color for each theme type. `None` means no default.
#[derive(Debug, Clone, Default)]
pub struct ColorDefaults {
    pub dark: Option<ColorValue>,
    pub light: Option<ColorValue>,
    pub hc: Option<ColorValue>,
}

impl ColorDefaults {
    pub fn new(
        dark: impl Into<ColorValue>,
        light: impl Into<ColorValue>,
        hc: impl Into<ColorValue>,
    ) -> Self {
        Self {
            dark: Some(dark.into()),
            light: Some(light.into()),
            hc: Some(hc.into()),
        }
    }

    /// The same default for every theme type
    pub fn all(value: impl Into<ColorValue>) -> Self {
        let value = value.into();
        Self {
            dark: Some(value.clone()),
            light: Some(value.clone()),
            hc: Some(value),
        }
    }

    pub fn get(&self, theme_type: ThemeType) -> Option<&ColorValue> {
        match theme_type {
            ThemeType::Dark => self.dark.as_ref(),
            ThemeType::Light => self.light.as_ref(),
            ThemeType::HighContrast => self.hc.as_ref(),
        }
    }
}
