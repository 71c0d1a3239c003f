use catppuccin::PALETTE;
use ratatui::style::Color;

/// Convert a catppuccin color to a ratatui color.
const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Terminal color theme.
///
/// Holds the palette colors the storefront draws with. Catalog style tokens
/// are mapped onto the accent colors through [`Theme::accent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    // Base colors
    pub base: Color,
    pub mantle: Color,

    // Surface and overlay colors
    pub surface0: Color,
    pub surface1: Color,
    pub overlay0: Color,
    pub overlay1: Color,

    // Text colors
    pub text: Color,
    pub subtext0: Color,

    // Accent colors
    pub pink: Color,
    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub teal: Color,
    pub sky: Color,
    pub blue: Color,
    pub lavender: Color,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            mantle: catppuccin_to_color(&c.mantle),
            surface0: catppuccin_to_color(&c.surface0),
            surface1: catppuccin_to_color(&c.surface1),
            overlay0: catppuccin_to_color(&c.overlay0),
            overlay1: catppuccin_to_color(&c.overlay1),
            text: catppuccin_to_color(&c.text),
            subtext0: catppuccin_to_color(&c.subtext0),
            pink: catppuccin_to_color(&c.pink),
            mauve: catppuccin_to_color(&c.mauve),
            red: catppuccin_to_color(&c.red),
            peach: catppuccin_to_color(&c.peach),
            yellow: catppuccin_to_color(&c.yellow),
            green: catppuccin_to_color(&c.green),
            teal: catppuccin_to_color(&c.teal),
            sky: catppuccin_to_color(&c.sky),
            blue: catppuccin_to_color(&c.blue),
            lavender: catppuccin_to_color(&c.lavender),
        }
    }

    /// Catppuccin Mocha theme (dark).
    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    /// Catppuccin Macchiato theme (dark).
    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }

    /// Catppuccin Frappé theme (dark).
    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    /// Catppuccin Latte theme (light).
    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }

    #[must_use]
    pub const fn base(&self) -> Color {
        self.base
    }

    #[must_use]
    pub const fn mantle(&self) -> Color {
        self.mantle
    }

    #[must_use]
    pub const fn surface0(&self) -> Color {
        self.surface0
    }

    #[must_use]
    pub const fn surface1(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn overlay0(&self) -> Color {
        self.overlay0
    }

    #[must_use]
    pub const fn overlay1(&self) -> Color {
        self.overlay1
    }

    #[must_use]
    pub const fn text(&self) -> Color {
        self.text
    }

    #[must_use]
    pub const fn subtext0(&self) -> Color {
        self.subtext0
    }

    #[must_use]
    pub const fn mauve(&self) -> Color {
        self.mauve
    }

    #[must_use]
    pub const fn red(&self) -> Color {
        self.red
    }

    #[must_use]
    pub const fn peach(&self) -> Color {
        self.peach
    }

    #[must_use]
    pub const fn yellow(&self) -> Color {
        self.yellow
    }

    #[must_use]
    pub const fn green(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn blue(&self) -> Color {
        self.blue
    }

    #[must_use]
    pub const fn lavender(&self) -> Color {
        self.lavender
    }

    #[must_use]
    pub const fn selection_bg(&self) -> Color {
        self.surface0
    }

    /// Resolve a catalog style token to an accent color.
    ///
    /// Tokens look like `from-red-500 to-red-700` or `border-teal-200`; the
    /// first recognised color word wins. Unknown tokens fall back to
    /// lavender.
    #[must_use]
    pub fn accent(&self, token: &str) -> Color {
        token
            .split(|c: char| c.is_whitespace() || c == '-')
            .find_map(|word| self.named_accent(word))
            .unwrap_or(self.lavender)
    }

    fn named_accent(&self, word: &str) -> Option<Color> {
        let color = match word {
            "red" => self.red,
            "rose" | "pink" | "fuchsia" => self.pink,
            "orange" | "amber" => self.peach,
            "yellow" | "lime" => self.yellow,
            "green" | "emerald" => self.green,
            "teal" | "cyan" => self.teal,
            "sky" => self.sky,
            "blue" => self.blue,
            "indigo" => self.lavender,
            "purple" | "violet" => self.mauve,
            "gray" | "grey" | "slate" | "zinc" | "neutral" | "stone" => self.overlay1,
            "black" => self.mantle,
            _ => return None,
        };
        Some(color)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Names accepted by [`theme_from_name`], in display order.
pub const THEME_NAMES: [&str; 4] = [
    "Catppuccin Mocha",
    "Catppuccin Macchiato",
    "Catppuccin Frappé",
    "Catppuccin Latte",
];

/// Look up a theme by name. Returns the default theme if not found.
pub fn theme_from_name(name: &str) -> Theme {
    match name {
        "Catppuccin Macchiato" => Theme::catppuccin_macchiato(),
        "Catppuccin Frappé" | "Catppuccin Frappe" => Theme::catppuccin_frappe(),
        "Catppuccin Latte" => Theme::catppuccin_latte(),
        "Catppuccin Mocha" => Theme::catppuccin_mocha(),
        other => {
            tracing::warn!(theme = other, available = ?THEME_NAMES, "Unknown theme, using default");
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_from_gradient_token() {
        let theme = Theme::catppuccin_mocha();
        assert_eq!(theme.accent("from-red-500 to-red-700"), theme.red);
        assert_eq!(theme.accent("from-purple-500 to-indigo-600"), theme.mauve);
        assert_eq!(theme.accent("border-teal-200"), theme.teal);
        assert_eq!(theme.accent("bg-green-50"), theme.green);
    }

    #[test]
    fn test_accent_fallback() {
        let theme = Theme::catppuccin_mocha();
        assert_eq!(theme.accent(""), theme.lavender);
        assert_eq!(theme.accent("shadow-lg"), theme.lavender);
    }

    #[test]
    fn test_theme_from_name() {
        assert_eq!(theme_from_name("Catppuccin Latte"), Theme::catppuccin_latte());
        assert_eq!(theme_from_name("Solarized"), Theme::catppuccin_mocha());
        for name in THEME_NAMES {
            assert_ne!(theme_from_name(name).base, Color::Reset);
        }
    }
}
