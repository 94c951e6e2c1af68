use serde::{Deserialize, Serialize};

/// The site-wide color scheme.
///
/// Persistence belongs to whoever hosts the page; widgets only read the
/// current value and ask for the other one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The theme a toggle press switches to.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Accessible label of the toggle button.
    pub fn toggle_label(self) -> String {
        format!("Switch to {} mode", self.toggled().as_str())
    }
}

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Foreground,
    MutedForeground,

    Primary,
    PrimaryForeground,

    Card,
    Border,
    ActiveBorder,

    // Navigation
    NavBackground,
    NavLink,
    NavLinkActive,
    NavUnderline,

    // Reveal transitions
    Hidden,

    // Carousel
    CarouselDot,
    CarouselDotActive,
    AutoPlayIndicator,

    // Contact form
    FieldBackground,
    FieldFocusGlow,
    SubmitButton,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_modes() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn toggle_label_names_target_mode() {
        assert_eq!(Theme::Dark.toggle_label(), "Switch to light mode");
        assert_eq!(Theme::Light.toggle_label(), "Switch to dark mode");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Theme::Light).unwrap_or_default();
        assert_eq!(json, "\"light\"");
    }
}
