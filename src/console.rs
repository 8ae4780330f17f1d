#[cfg(feature = "console")]
use once_cell::sync::Lazy;


/// An ANSI color code for color terminals.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Color {
    DarkGray,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
}

#[cfg(feature = "console")]
static COLORS_ENABLED: Lazy<bool> = Lazy::new(|| {
    // https://no-color.org/
    let no_color = std::env::var_os("NO_COLOR")
        .map(|v| !v.is_empty())
        .unwrap_or(false);
    !no_color && console::colors_enabled()
});

#[cfg(feature = "console")]
fn colors_enabled() -> bool {
    *COLORS_ENABLED
}

#[cfg(not(feature = "console"))]
fn colors_enabled() -> bool {
    false
}

#[cfg(feature = "console")]
fn paint(text: String, color: Color) -> String {
    let styled = console::style(text).force_styling(true);
    let colored = match color {
        Color::DarkGray => styled.bright().black(),
        Color::Blue => styled.bright().blue(),
        Color::Green => styled.bright().green(),
        Color::Cyan => styled.bright().cyan(),
        Color::Red => styled.bright().red(),
        Color::Magenta => styled.bright().magenta(),
        Color::Yellow => styled.bright().yellow(),
        Color::White => styled.bright().white(),
    };
    colored.to_string()
}

#[cfg(not(feature = "console"))]
fn paint(text: String, _color: Color) -> String {
    text
}

/// Pads text to a specific length. Positive padding values pad at the end, negative at the
/// beginning; text that is already long enough is returned unchanged.
pub fn pad(text: &str, pad_to: isize) -> String {
    let width = pad_to.unsigned_abs();
    if pad_to < 0 {
        format!("{:>width$}", text, width = width)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

/// Outputs text, optionally in a given color, padded to a specific length (see [`pad`]).
pub fn write_in_color<S: AsRef<str>>(text: S, color: Option<Color>, pad_to: isize) {
    let padded = pad(text.as_ref(), pad_to);
    match color {
        Some(clr) if colors_enabled() => print!("{}", paint(padded, clr)),
        _ => print!("{}", padded),
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pad() {
        assert_eq!("ab   ", pad("ab", 5));
        assert_eq!("   ab", pad("ab", -5));
        assert_eq!("abcdef", pad("abcdef", 3));
        assert_eq!("abcdef", pad("abcdef", -3));
        assert_eq!("ab", pad("ab", 0));
    }
}
