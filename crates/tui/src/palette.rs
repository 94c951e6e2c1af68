use folio_protocol::{Theme, ThemeToken};
use ratatui::style::Color;

pub fn resolve(theme: Theme, token: ThemeToken) -> Color {
    match theme {
        Theme::Dark => resolve_dark(token),
        Theme::Light => resolve_light(token),
    }
}

// Catppuccin Mocha
fn resolve_dark(token: ThemeToken) -> Color {
    use ThemeToken::*;
    match token {
        Background => Color::Rgb(0x1e, 0x1e, 0x2e),     // Base
        Foreground => Color::Rgb(0xcd, 0xd6, 0xf4),     // Text
        MutedForeground => Color::Rgb(0xa6, 0xad, 0xc8), // Subtext0

        Primary => Color::Rgb(0x89, 0xb4, 0xfa), // Blue
        PrimaryForeground => Color::Rgb(0x11, 0x11, 0x1b),

        Card => Color::Rgb(0x18, 0x18, 0x25),   // Mantle
        Border => Color::Rgb(0x31, 0x32, 0x44), // Surface0
        ActiveBorder => Color::Rgb(0xcb, 0xa6, 0xf7), // Mauve

        NavBackground => Color::Rgb(0x18, 0x18, 0x25),
        NavLink => Color::Rgb(0xba, 0xc2, 0xde), // Subtext1
        NavLinkActive => Color::Rgb(0x89, 0xb4, 0xfa),
        NavUnderline => Color::Rgb(0x89, 0xb4, 0xfa),

        Hidden => Color::Rgb(0x45, 0x47, 0x5a), // Surface1

        CarouselDot => Color::Rgb(0x6c, 0x70, 0x86), // Overlay0
        CarouselDotActive => Color::Rgb(0x89, 0xb4, 0xfa),
        AutoPlayIndicator => Color::Rgb(0xa6, 0xe3, 0xa1), // Green

        FieldBackground => Color::Rgb(0x31, 0x32, 0x44),
        FieldFocusGlow => Color::Rgb(0xb4, 0xbe, 0xfe), // Lavender
        SubmitButton => Color::Rgb(0x89, 0xb4, 0xfa),
    }
}

// Catppuccin Latte
fn resolve_light(token: ThemeToken) -> Color {
    use ThemeToken::*;
    match token {
        Background => Color::Rgb(0xef, 0xf1, 0xf5),
        Foreground => Color::Rgb(0x4c, 0x4f, 0x69),
        MutedForeground => Color::Rgb(0x6c, 0x6f, 0x85),

        Primary => Color::Rgb(0x1e, 0x66, 0xf5),
        PrimaryForeground => Color::Rgb(0xef, 0xf1, 0xf5),

        Card => Color::Rgb(0xe6, 0xe9, 0xef),
        Border => Color::Rgb(0xcc, 0xd0, 0xda),
        ActiveBorder => Color::Rgb(0x88, 0x39, 0xef),

        NavBackground => Color::Rgb(0xe6, 0xe9, 0xef),
        NavLink => Color::Rgb(0x5c, 0x5f, 0x77),
        NavLinkActive => Color::Rgb(0x1e, 0x66, 0xf5),
        NavUnderline => Color::Rgb(0x1e, 0x66, 0xf5),

        Hidden => Color::Rgb(0xbc, 0xc0, 0xcc),

        CarouselDot => Color::Rgb(0x9c, 0xa0, 0xb0),
        CarouselDotActive => Color::Rgb(0x1e, 0x66, 0xf5),
        AutoPlayIndicator => Color::Rgb(0x40, 0xa0, 0x2b),

        FieldBackground => Color::Rgb(0xcc, 0xd0, 0xda),
        FieldFocusGlow => Color::Rgb(0x72, 0x87, 0xfd),
        SubmitButton => Color::Rgb(0x1e, 0x66, 0xf5),
    }
}
