//! ASCII banner with gradient (MEDTRACK).

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::ExecutableCommand;
use figlet_rs::FIGfont;
use std::io::{stdout, Write};

/// Teal (#14b8a6).
const TEAL: (u8, u8, u8) = (0x14, 0xb8, 0xa6);
/// Soft blue (#60a5fa).
const SOFT_BLUE: (u8, u8, u8) = (0x60, 0xa5, 0xfa);

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Prints the welcome banner: "MEDTRACK" in figlet ASCII with a teal-to-blue
/// gradient, then version.
pub fn print_welcome() {
    let mut out = stdout();
    let Some(art) = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("MEDTRACK").map(|figure| figure.to_string()))
    else {
        let _ = out.execute(Print("MEDTRACK\r\n"));
        return;
    };
    let lines: Vec<&str> = art.lines().collect();
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(TEAL, SOFT_BLUE, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\r\n"));
        let _ = out.execute(ResetColor);
    }

    let version = env!("CARGO_PKG_VERSION");
    let _ = out.execute(SetForegroundColor(Color::Rgb {
        r: SOFT_BLUE.0,
        g: SOFT_BLUE.1,
        b: SOFT_BLUE.2,
    }));
    let _ = out.execute(Print(format!("v{} — lembrete de medicamentos\r\n", version)));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}
