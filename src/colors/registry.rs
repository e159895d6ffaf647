use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Mutex, RwLock};

use serde_json::{Map, Value, json};

use crate::colors::value::{ColorDefaults, ColorValue};
use crate::themes::{Color, Theme};

static GLOBAL: LazyLock<ColorRegistry> = LazyLock::new(ColorRegistry::new);

/// A color identifier with its description and per theme type defaults
#[derive(Debug, Clone)]
pub struct ColorContribution {
    pub id: String,
    pub description: String,
    pub defaults: ColorDefaults,
    /// Colors that must be transparent so they do not hide what is under them
    pub needs_transparency: bool,
    pub deprecation_message: Option<String>,
}

impl ColorContribution {
    pub fn new(
        id: impl Into<String>,
        defaults: ColorDefaults,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            defaults,
            needs_transparency: false,
            deprecation_message: None,
        }
    }

    pub fn needs_transparency(mut self, needs_transparency: bool) -> Self {
        self.needs_transparency = needs_transparency;
        self
    }

    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecation_message = Some(message.into());
        self
    }

    fn schema(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".into(), json!("string"));
        property.insert("description".into(), json!(self.description));
        property.insert("format".into(), json!("color-hex"));
        property.insert(
            "defaultSnippets".into(),
            json!([{ "body": "${1:#ff0000}" }]),
        );
        if self.needs_transparency {
            property.insert(
                "pattern".into(),
                json!("^#(?:(?<rgba>[0-9a-fA-f]{3}[0-9a-eA-E])|(?:[0-9a-fA-F]{6}(?:(?![fF]{2})(?:[0-9a-fA-F]{2}))))?$"),
            );
            property.insert(
                "patternErrorMessage".into(),
                json!("This color must be transparent or it will obscure content"),
            );
        }
        if let Some(message) = &self.deprecation_message {
            property.insert("deprecationMessage".into(), json!(message));
        }
        Value::Object(property)
    }
}

/// Sent to subscribers whenever the set of colors changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    Registered(String),
    Deregistered(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&SchemaChange) + Send + Sync>;

#[derive(Default)]
struct RegistryState {
    contributions: HashMap<String, ColorContribution>,
    /// Registration order, for enumeration and schemas
    order: Vec<String>,
}

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Listener)>>,
}

/// Registry of the color identifiers known to the application.
///
/// Cloning gives another handle to the same registry.
#[derive(Clone, Default)]
pub struct ColorRegistry {
    state: Arc<RwLock<RegistryState>>,
    listeners: Arc<Listeners>,
}

impl fmt::Debug for ColorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read().expect("Failed to lock color registry");
        f.debug_struct("ColorRegistry")
            .field("colors", &state.order)
            .finish_non_exhaustive()
    }
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process wide registry, where the standard colors are usually registered
    pub fn global() -> &'static ColorRegistry {
        &GLOBAL
    }

    /// Registers a color and returns its identifier.
    /// Registering an existing identifier replaces it but keeps its position.
    pub fn register_color(
        &self,
        id: impl Into<String>,
        defaults: ColorDefaults,
        description: impl Into<String>,
    ) -> String {
        self.register_contribution(ColorContribution::new(id, defaults, description))
    }

    pub fn register_contribution(&self, contribution: ColorContribution) -> String {
        let id = contribution.id.clone();
        {
            let mut state = self.state.write().expect("Failed to lock color registry");
            if state
                .contributions
                .insert(id.clone(), contribution)
                .is_none()
            {
                state.order.push(id.clone());
            } else {
                log::debug!("[register_contribution] replacing color {id}");
            }
        }
        log::trace!("[register_contribution] registered {id}");
        self.notify(&SchemaChange::Registered(id.clone()));
        id
    }

    /// Removes a color. Removing an unknown color changes nothing but still notifies.
    pub fn deregister_color(&self, id: &str) {
        {
            let mut state = self.state.write().expect("Failed to lock color registry");
            if state.contributions.remove(id).is_some() {
                state.order.retain(|registered| registered != id);
            }
        }
        self.notify(&SchemaChange::Deregistered(id.to_owned()));
    }

    /// All registered colors, in registration order
    pub fn get_colors(&self) -> Vec<ColorContribution> {
        let state = self.state.read().expect("Failed to lock color registry");
        state
            .order
            .iter()
            .filter_map(|id| state.contributions.get(id).cloned())
            .collect()
    }

    pub fn get_color(&self, id: &str) -> Option<ColorContribution> {
        let state = self.state.read().expect("Failed to lock color registry");
        state.contributions.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        let state = self.state.read().expect("Failed to lock color registry");
        state.contributions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        let state = self.state.read().expect("Failed to lock color registry");
        state.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The default of a registered color for the theme type of `theme`, resolved against
    /// that theme. Unknown colors and colors without a default for that type give `None`.
    pub fn resolve_default_color(&self, id: &str, theme: &dyn Theme) -> Option<Color> {
        // Resolving may look up other colors through the theme, and so through
        // this registry again: the lock must not be held.
        let value: ColorValue = {
            let state = self.state.read().expect("Failed to lock color registry");
            state
                .contributions
                .get(id)?
                .defaults
                .get(theme.theme_type())?
                .clone()
        };
        value.resolve(theme)
    }

    /// JSON schema validating a `colors` object of a theme
    pub fn color_schema(&self) -> Value {
        let state = self.state.read().expect("Failed to lock color registry");
        let mut properties = Map::new();
        for id in &state.order {
            if let Some(contribution) = state.contributions.get(id) {
                properties.insert(id.clone(), contribution.schema());
            }
        }
        json!({ "type": "object", "properties": properties })
    }

    /// JSON schema of a value naming a registered color
    pub fn color_reference_schema(&self) -> Value {
        let state = self.state.read().expect("Failed to lock color registry");
        let descriptions: Vec<&str> = state
            .order
            .iter()
            .filter_map(|id| state.contributions.get(id))
            .map(|contribution| contribution.description.as_str())
            .collect();
        json!({
            "type": "string",
            "enum": state.order,
            "enumDescriptions": descriptions,
        })
    }

    /// Calls `listener` after every registration or deregistration
    pub fn subscribe(
        &self,
        listener: impl Fn(&SchemaChange) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.listeners.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .entries
            .lock()
            .expect("Failed to lock color registry listeners")
            .push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self
            .listeners
            .entries
            .lock()
            .expect("Failed to lock color registry listeners");
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    fn notify(&self, change: &SchemaChange) {
        // listeners may use the registry
        let listeners: Vec<Listener> = self
            .listeners
            .entries
            .lock()
            .expect("Failed to lock color registry listeners")
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{darken, transparent};
    use crate::test_utils::MapTheme;
    use crate::themes::{ColorTheme, ThemeType};

    fn color(hex: &str) -> Color {
        Color::from_hex(hex).unwrap()
    }

    #[test]
    fn references_resolve_through_the_registry() {
        let registry = ColorRegistry::new();
        registry.register_color("a", ColorDefaults::new("#FF0000", "#00FF00", "#0000FF"), "A");
        registry.register_color("b", ColorDefaults::all("a"), "B");

        let dark = ColorTheme::new("dark", ThemeType::Dark).with_registry(registry.clone());
        assert_eq!(registry.resolve_default_color("b", &dark), Some(color("#FF0000")));
        assert_eq!(dark.get_color("b"), Some(color("#FF0000")));

        let light = ColorTheme::new("light", ThemeType::Light).with_registry(registry.clone());
        assert_eq!(light.get_color("b"), Some(color("#00FF00")));

        // a theme defining `a` overrides it for `b` too
        let custom = ColorTheme::new("custom", ThemeType::HighContrast)
            .with_color("a", color("#123456"))
            .with_registry(registry);
        assert_eq!(custom.get_color("b"), Some(color("#123456")));
    }

    #[test]
    fn unknown_and_missing_defaults_resolve_to_none() {
        let registry = ColorRegistry::new();
        registry.register_color(
            "dark.only",
            ColorDefaults {
                dark: Some("#000000".into()),
                ..Default::default()
            },
            "",
        );
        let theme = MapTheme::new(ThemeType::Light);
        assert_eq!(registry.resolve_default_color("unregistered", &theme), None);
        assert_eq!(registry.resolve_default_color("dark.only", &theme), None);
        assert_eq!(
            registry.resolve_default_color("dark.only", &MapTheme::new(ThemeType::Dark)),
            Some(Color::BLACK)
        );
    }

    #[test]
    fn derived_defaults() {
        let registry = ColorRegistry::new();
        registry.register_color("fg", ColorDefaults::all("#808080"), "");
        registry.register_color("fg.dim", ColorDefaults::all(darken("fg", 0.5)), "");
        registry.register_color("fg.faded", ColorDefaults::all(transparent("fg.dim", 0.5)), "");

        let theme = ColorTheme::new("t", ThemeType::Dark).with_registry(registry);
        assert_eq!(theme.get_color("fg.dim"), Some(color("#404040")));
        assert_eq!(theme.get_color("fg.faded"), Some(color("#40404080")));
    }

    #[test]
    fn cycles_resolve_to_none() {
        let registry = ColorRegistry::new();
        registry.register_color("a", ColorDefaults::all("b"), "");
        registry.register_color("b", ColorDefaults::all("a"), "");
        let theme = ColorTheme::new("t", ThemeType::Dark).with_registry(registry);
        assert_eq!(theme.get_color("a"), None);
    }

    #[test]
    fn deregistering() {
        let registry = ColorRegistry::new();
        registry.register_color("a", ColorDefaults::all("#FFFFFF"), "A");
        registry.register_color("b", ColorDefaults::all("#000000"), "B");
        registry.deregister_color("a");

        let ids: Vec<_> = registry.get_colors().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["b"]);
        assert!(!registry.contains("a"));
        assert_eq!(
            registry.resolve_default_color("a", &MapTheme::new(ThemeType::Dark)),
            None
        );

        registry.deregister_color("a");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reregistering_keeps_position() {
        let registry = ColorRegistry::new();
        for id in ["first", "second", "third"] {
            registry.register_color(id, ColorDefaults::all("#FFFFFF"), id);
        }
        registry.register_color("first", ColorDefaults::all("#000000"), "replaced");

        let colors = registry.get_colors();
        let ids: Vec<_> = colors.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
        assert_eq!(colors[0].description, "replaced");
        assert_eq!(
            registry.resolve_default_color("first", &MapTheme::new(ThemeType::Dark)),
            Some(Color::BLACK)
        );
    }

    #[test]
    fn schemas() {
        let registry = ColorRegistry::new();
        registry.register_color("editor.background", ColorDefaults::all("#1E1E1E"), "Editor background");
        registry.register_contribution(
            ColorContribution::new("editor.selectionHighlight", ColorDefaults::default(), "Highlights")
                .needs_transparency(true)
                .deprecated("Use editor.selectionBackground"),
        );

        let schema = registry.color_schema();
        assert_eq!(schema["type"], "object");
        let background = &schema["properties"]["editor.background"];
        assert_eq!(background["type"], "string");
        assert_eq!(background["format"], "color-hex");
        assert_eq!(background["description"], "Editor background");
        assert_eq!(background["defaultSnippets"][0]["body"], "${1:#ff0000}");
        assert!(background.get("pattern").is_none());
        assert!(background.get("deprecationMessage").is_none());

        let highlight = &schema["properties"]["editor.selectionHighlight"];
        assert!(highlight["pattern"].is_string());
        assert!(highlight["patternErrorMessage"].is_string());
        assert_eq!(highlight["deprecationMessage"], "Use editor.selectionBackground");

        let reference = registry.color_reference_schema();
        assert_eq!(
            reference,
            json!({
                "type": "string",
                "enum": ["editor.background", "editor.selectionHighlight"],
                "enumDescriptions": ["Editor background", "Highlights"],
            })
        );
    }

    #[test]
    fn subscribers_are_notified() {
        let registry = ColorRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = registry.subscribe(move |change| {
            sink.lock().unwrap().push(change.clone());
        });

        registry.register_color("a", ColorDefaults::all("#FFFFFF"), "");
        registry.deregister_color("a");
        registry.deregister_color("never.registered");
        assert!(registry.unsubscribe(subscription));
        assert!(!registry.unsubscribe(subscription));
        registry.register_color("b", ColorDefaults::all("#FFFFFF"), "");

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                SchemaChange::Registered("a".into()),
                SchemaChange::Deregistered("a".into()),
                SchemaChange::Deregistered("never.registered".into()),
            ]
        );
    }

    #[test]
    fn listeners_can_read_the_registry() {
        let registry = ColorRegistry::new();
        let handle = registry.clone();
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = counts.clone();
        registry.subscribe(move |_| sink.lock().unwrap().push(handle.len()));
        registry.register_color("a", ColorDefaults::all("#FFFFFF"), "");
        registry.register_color("b", ColorDefaults::all("#FFFFFF"), "");
        assert_eq!(*counts.lock().unwrap(), vec![1, 2]);
    }
}
