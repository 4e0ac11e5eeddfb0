//! Sheet content and configuration
//!
//! Presentation data carried by the sheet for its lifetime: the header
//! title, the selectable actions, and the close control. Config types are
//! serde-friendly so hosts can keep provider defaults in their app config.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Callback invoked after an action's close motion has been requested
pub type ActionCallback = Arc<dyn Fn() + Send + Sync>;

/// One selectable row in the sheet.
///
/// Selecting an action closes the sheet first and invokes the callback
/// second, so the callback can safely present new UI (including another
/// sheet) without racing the unmount.
#[derive(Clone)]
pub struct Action {
    /// Icon identifier, passed through to the presentation layer
    pub icon: Option<String>,
    /// Row label
    pub text: String,
    /// Row color override, passed through to the presentation layer
    pub color: Option<String>,
    on_select: ActionCallback,
}

impl Action {
    pub fn new<F>(text: impl Into<String>, on_select: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            icon: None,
            text: text.into(),
            color: None,
            on_select: Arc::new(on_select),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Invoke the selection callback
    pub fn invoke(&self) {
        (self.on_select)();
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("icon", &self.icon)
            .field("text", &self.text)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

/// Presentation data for the close control
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CloseConfig {
    pub text: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Default for CloseConfig {
    fn default() -> Self {
        Self {
            text: "Close".to_string(),
            color: None,
        }
    }
}

impl CloseConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Merge a per-invocation override over provider defaults.
    /// Keys present in the override win; its absent keys fall back.
    pub fn merged_over(self, base: &CloseConfig) -> CloseConfig {
        CloseConfig {
            text: self.text,
            color: self.color.or_else(|| base.color.clone()),
        }
    }
}

/// Font names handed through to the presentation layer
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    #[serde(default)]
    pub regular: Option<String>,
    #[serde(default)]
    pub semibold: Option<String>,
}

/// Provider-level defaults, merged under per-invocation overrides
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub fonts: Option<FontConfig>,
    #[serde(default)]
    pub close: Option<CloseConfig>,
}

/// Everything one `show` call carries
#[derive(Clone, Debug, Default)]
pub struct ShowProperties {
    /// Header title rendered above the actions
    pub header: Option<String>,
    /// Selectable actions, top to bottom
    pub actions: Vec<Action>,
    /// Per-invocation close control override
    pub close: Option<CloseConfig>,
}

impl ShowProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn close(mut self, close: CloseConfig) -> Self {
        self.close = Some(close);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_defaults_to_close_text() {
        let close = CloseConfig::default();
        assert_eq!(close.text, "Close");
        assert!(close.color.is_none());
    }

    #[test]
    fn test_merge_per_call_keys_win() {
        let base = CloseConfig::new("Dismiss").color("#888888");
        let merged = CloseConfig::new("Cancel").merged_over(&base);

        assert_eq!(merged.text, "Cancel");
        // Absent override key falls back to the base
        assert_eq!(merged.color.as_deref(), Some("#888888"));

        let merged = CloseConfig::new("Cancel").color("#ff0000").merged_over(&base);
        assert_eq!(merged.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_provider_config_from_toml() {
        let config: ProviderConfig = toml::from_str(
            r##"
            [fonts]
            regular = "Inter-Regular"
            semibold = "Inter-SemiBold"

            [close]
            text = "Done"
            color = "#ffffff"
            "##,
        )
        .unwrap();

        assert_eq!(
            config.fonts.as_ref().unwrap().regular.as_deref(),
            Some("Inter-Regular")
        );
        assert_eq!(config.close.as_ref().unwrap().text, "Done");
    }

    #[test]
    fn test_show_properties_builder() {
        let props = ShowProperties::new()
            .header("Share")
            .action(Action::new("Copy link", || {}))
            .action(Action::new("Delete", || {}).color("#ff3b30"))
            .close(CloseConfig::new("Cancel"));

        assert_eq!(props.header.as_deref(), Some("Share"));
        assert_eq!(props.actions.len(), 2);
        assert_eq!(props.actions[1].color.as_deref(), Some("#ff3b30"));
        assert!(props.close.is_some());
    }
}
