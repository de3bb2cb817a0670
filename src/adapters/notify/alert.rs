//! In-terminal alert banner with audio cue. Implements AlertSink.

use std::io::{stdout, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::ExecutableCommand;

use crate::domain::Medication;
use crate::ports::AlertSink;

/// ASCII BEL: the audio cue. Most terminals ring or flash on it.
const BELL: &str = "\x07";

/// Colored banner printed on the controlling terminal. Never fails a tick:
/// write errors (e.g. stdout gone) are discarded.
pub struct TerminalAlertSink;

impl TerminalAlertSink {
    fn print_banner(medication: &Medication) {
        let mut out = stdout();
        let _ = out.execute(Print(BELL));
        let _ = out.execute(SetForegroundColor(Color::Yellow));
        let _ = out.execute(Print(format!(
            "\r\n  ⏰ Está na hora de tomar {} ({})\r\n",
            medication.name, medication.dose
        )));
        let _ = out.execute(SetForegroundColor(Color::DarkGrey));
        let _ = out.execute(Print(
            "     (menu: \"Registar toma do alerta\" para dispensar)\r\n",
        ));
        let _ = out.execute(ResetColor);
        let _ = out.flush();
    }
}

#[async_trait::async_trait]
impl AlertSink for TerminalAlertSink {
    async fn show_alert(&self, medication: &Medication) {
        Self::print_banner(medication);
    }
}
