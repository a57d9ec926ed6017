use std::io::{self, Write};

use crate::domain::primitive::{Color, Style};

/// Serialize a style as SGR escape sequences.
///
/// Always begins with `ESC[0m` so attributes never bleed additively from
/// the previous run, then one CSI per enabled attribute. Underline
/// variants use the extended sub-parameter form `4:n`.
pub fn write_sgr<W: Write>(out: &mut W, style: &Style) -> io::Result<()> {
    out.write_all(b"\x1b[0m")?;
    if style.bold {
        out.write_all(b"\x1b[1m")?;
    }
    if style.faint {
        out.write_all(b"\x1b[2m")?;
    }
    if style.italic {
        out.write_all(b"\x1b[3m")?;
    }
    if let Some(n) = style.underline.sgr_param() {
        write!(out, "\x1b[4:{n}m")?;
    }
    if style.blink {
        out.write_all(b"\x1b[5m")?;
    }
    if style.inverse {
        out.write_all(b"\x1b[7m")?;
    }
    if style.hidden {
        out.write_all(b"\x1b[8m")?;
    }
    if style.strikethrough {
        out.write_all(b"\x1b[9m")?;
    }
    write_color(out, style.fg, ColorPlane::Foreground)?;
    write_color(out, style.bg, ColorPlane::Background)?;
    Ok(())
}

enum ColorPlane {
    Foreground,
    Background,
}

/// Palette 0-7 uses the `3x`/`4x` codes, 8-15 the bright `9x`/`10x`
/// codes, anything above the 256-color `38;5;n`/`48;5;n` form.
fn write_color<W: Write>(out: &mut W, color: Color, plane: ColorPlane) -> io::Result<()> {
    match (color, plane) {
        (Color::Default, _) => Ok(()),
        (Color::Indexed(n @ 0..=7), ColorPlane::Foreground) => write!(out, "\x1b[{}m", 30 + n),
        (Color::Indexed(n @ 0..=7), ColorPlane::Background) => write!(out, "\x1b[{}m", 40 + n),
        (Color::Indexed(n @ 8..=15), ColorPlane::Foreground) => write!(out, "\x1b[{}m", 90 + n - 8),
        (Color::Indexed(n @ 8..=15), ColorPlane::Background) => {
            write!(out, "\x1b[{}m", 100 + n - 8)
        }
        (Color::Indexed(n), ColorPlane::Foreground) => write!(out, "\x1b[38;5;{n}m"),
        (Color::Indexed(n), ColorPlane::Background) => write!(out, "\x1b[48;5;{n}m"),
        (Color::Rgb(r, g, b), ColorPlane::Foreground) => write!(out, "\x1b[38;2;{r};{g};{b}m"),
        (Color::Rgb(r, g, b), ColorPlane::Background) => write!(out, "\x1b[48;2;{r};{g};{b}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::primitive::UnderlineKind;

    fn sgr(style: &Style) -> String {
        let mut out = Vec::new();
        write_sgr(&mut out, style).unwrap();
        String::from_utf8(out).unwrap()
    }

    // =========================================================================
    // Tests: reset prologue
    // =========================================================================

    #[test]
    fn plain_style_emits_only_reset() {
        assert_eq!(sgr(&Style::default()), "\x1b[0m");
    }

    #[test]
    fn bold_red_matches_frame_contract() {
        let style = Style {
            bold: true,
            fg: Color::Indexed(1),
            ..Style::default()
        };
        assert_eq!(sgr(&style), "\x1b[0m\x1b[1m\x1b[31m");
    }

    // =========================================================================
    // Tests: attributes
    // =========================================================================

    #[test]
    fn every_attribute_has_its_own_csi() {
        let style = Style {
            bold: true,
            faint: true,
            italic: true,
            underline: UnderlineKind::Single,
            blink: true,
            inverse: true,
            hidden: true,
            strikethrough: true,
            ..Style::default()
        };
        assert_eq!(
            sgr(&style),
            "\x1b[0m\x1b[1m\x1b[2m\x1b[3m\x1b[4:1m\x1b[5m\x1b[7m\x1b[8m\x1b[9m"
        );
    }

    #[test]
    fn underline_variants_use_extended_subparameters() {
        for (kind, n) in [
            (UnderlineKind::Double, 2),
            (UnderlineKind::Curly, 3),
            (UnderlineKind::Dotted, 4),
            (UnderlineKind::Dashed, 5),
        ] {
            let style = Style {
                underline: kind,
                ..Style::default()
            };
            assert_eq!(sgr(&style), format!("\x1b[0m\x1b[4:{n}m"));
        }
    }

    // =========================================================================
    // Tests: color encoding ranges
    // =========================================================================

    #[test]
    fn base_palette_uses_thirties_and_forties() {
        let style = Style {
            fg: Color::Indexed(2),
            bg: Color::Indexed(7),
            ..Style::default()
        };
        assert_eq!(sgr(&style), "\x1b[0m\x1b[32m\x1b[47m");
    }

    #[test]
    fn bright_palette_uses_nineties_and_hundreds() {
        let style = Style {
            fg: Color::Indexed(8),
            bg: Color::Indexed(15),
            ..Style::default()
        };
        assert_eq!(sgr(&style), "\x1b[0m\x1b[90m\x1b[107m");
    }

    #[test]
    fn extended_palette_uses_256_color_form() {
        let style = Style {
            fg: Color::Indexed(16),
            bg: Color::Indexed(231),
            ..Style::default()
        };
        assert_eq!(sgr(&style), "\x1b[0m\x1b[38;5;16m\x1b[48;5;231m");
    }

    #[test]
    fn rgb_uses_truecolor_form() {
        let style = Style {
            fg: Color::Rgb(255, 128, 0),
            bg: Color::Rgb(0, 0, 1),
            ..Style::default()
        };
        assert_eq!(sgr(&style), "\x1b[0m\x1b[38;2;255;128;0m\x1b[48;2;0;0;1m");
    }
}
