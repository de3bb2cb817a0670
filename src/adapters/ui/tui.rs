//! Implements InputPort. Inquire-based interactive menu.
//!
//! Presentation only: list/calendar formatting plus prompts. All state
//! transitions live in the use cases and domain.

use std::sync::Arc;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Select, Text};

use crate::domain::calendar::WEEKDAY_HEADER;
use crate::domain::{CalendarCell, DomainError, HistoryFilter, Medication, TakeRecord};
use crate::ports::{InputPort, NotifierPort};
use crate::usecases::{HistoryService, MedicationService, ReminderService};

const MENU_MEDICATIONS: &str = "Medicamentos";
const MENU_ADD: &str = "Adicionar medicamento";
const MENU_EDIT: &str = "Editar medicamento";
const MENU_DELETE: &str = "Apagar medicamento";
const MENU_TAKE_NOW: &str = "Tomei agora";
const MENU_DISMISS: &str = "Registar toma do alerta";
const MENU_HISTORY: &str = "Histórico de tomas";
const MENU_EXPORT: &str = "Exportar histórico (CSV)";
const MENU_NOTIFICATIONS: &str = "Ativar notificações";
const MENU_QUIT: &str = "Sair";

/// TUI adapter. Inquire prompts over the application services.
pub struct TuiInputPort {
    reminder: Arc<ReminderService>,
    medications: Arc<MedicationService>,
    history: Arc<HistoryService>,
    notifier: Arc<dyn NotifierPort>,
}

impl TuiInputPort {
    pub fn new(
        reminder: Arc<ReminderService>,
        medications: Arc<MedicationService>,
        history: Arc<HistoryService>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        Self {
            reminder,
            medications,
            history,
            notifier,
        }
    }

    async fn show_medications(&self) {
        let meds = self.reminder.medications().await;
        if meds.is_empty() {
            println!("  (sem medicamentos)");
        }
        for med in &meds {
            println!("  {}", medication_line(med));
        }
        match self.reminder.next_dose().await {
            Some(next) => println!("  Próximo: {}", next.display()),
            None => println!("  Próximo: —"),
        }
    }

    async fn add_medication(&self) -> Result<(), DomainError> {
        let draft = prompt_draft(None)?;
        self.medications.create(&draft).await?;
        self.reminder.refresh().await.ok();
        println!("  Guardado.");
        Ok(())
    }

    async fn edit_medication(&self) -> Result<(), DomainError> {
        let Some(med) = self.pick_medication("Editar qual?").await? else {
            return Ok(());
        };
        let draft = prompt_draft(Some(&med))?;
        self.medications.update(med.id, &draft).await?;
        self.reminder.refresh().await.ok();
        println!("  Atualizado.");
        Ok(())
    }

    async fn delete_medication(&self) -> Result<(), DomainError> {
        let Some(med) = self.pick_medication("Apagar qual?").await? else {
            return Ok(());
        };
        self.medications.delete(med.id).await?;
        self.reminder.refresh().await.ok();
        println!("  Apagado: {}", med.name);
        Ok(())
    }

    async fn take_now(&self) -> Result<(), DomainError> {
        let Some(med) = self.pick_medication("Tomar qual?").await? else {
            return Ok(());
        };
        let note = prompt_note()?;
        if let Some(taken) = self.reminder.take_now(med.id, &note).await? {
            println!("  Registado e removido: {}", taken.name);
        }
        Ok(())
    }

    async fn dismiss_alert(&self) -> Result<(), DomainError> {
        if self.reminder.pending_alert().await.is_none() {
            println!("  Nenhum alerta pendente.");
            return Ok(());
        }
        let note = prompt_note()?;
        if let Some(med) = self.reminder.acknowledge(&note).await? {
            println!("  Toma registada: {} (continua na lista)", med.name);
        }
        Ok(())
    }

    async fn show_history(&self) -> Result<(), DomainError> {
        let filter = prompt_filter(&self.history.current_month())?;
        let takes = self.load_with_spinner(&filter).await?;

        if takes.is_empty() {
            println!("  (sem tomas no período)");
        }
        for take in &takes {
            println!("  {}", take_line(take));
        }

        if let Some(month) = &filter.month {
            if let Some((year, month)) = parse_month_key(month) {
                let cells = self.history.calendar(year, month, &takes);
                println!("{}", format_calendar(&cells));
            }
        }
        Ok(())
    }

    async fn export_history(&self) -> Result<(), DomainError> {
        let filter = prompt_filter(&self.history.current_month())?;
        let path = Text::new("Ficheiro de destino:")
            .with_default("historico_tomas.csv")
            .prompt()
            .map_err(prompt_err)?;
        let count = self
            .history
            .export_csv(&filter, std::path::Path::new(&path))
            .await?;
        println!("  Exportado: {count} tomas para {path}");
        Ok(())
    }

    async fn notifications(&self) -> Result<(), DomainError> {
        use crate::domain::NotifyPermission;
        match self.notifier.permission().await {
            NotifyPermission::Granted => println!("  Notificações já estão ativas."),
            NotifyPermission::Denied => println!("  Notificações bloqueadas."),
            NotifyPermission::Default => match self.notifier.request_permission().await? {
                NotifyPermission::Granted => println!("  Notificações ativadas."),
                _ => println!("  Permissão recusada."),
            },
        }
        Ok(())
    }

    /// Medication picker. None when the list is empty.
    async fn pick_medication(&self, prompt: &str) -> Result<Option<Medication>, DomainError> {
        let meds = self.reminder.medications().await;
        if meds.is_empty() {
            println!("  (sem medicamentos)");
            return Ok(None);
        }
        let options: Vec<String> = meds.iter().map(medication_line).collect();
        let selected = Select::new(prompt, options.clone())
            .prompt()
            .map_err(prompt_err)?;
        let idx = options.iter().position(|o| *o == selected).unwrap_or(0);
        Ok(Some(meds[idx].clone()))
    }

    async fn load_with_spinner(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<TakeRecord>, DomainError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| {
            ProgressStyle::default_spinner()
        }));
        spinner.set_message("A carregar histórico...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        let result = self.history.load(filter).await;
        spinner.finish_and_clear();
        result
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let options = vec![
                MENU_MEDICATIONS,
                MENU_ADD,
                MENU_EDIT,
                MENU_DELETE,
                MENU_TAKE_NOW,
                MENU_DISMISS,
                MENU_HISTORY,
                MENU_EXPORT,
                MENU_NOTIFICATIONS,
                MENU_QUIT,
            ];
            let choice = Select::new("Menu", options).prompt().map_err(prompt_err)?;

            let result = match choice {
                MENU_MEDICATIONS => {
                    self.show_medications().await;
                    Ok(())
                }
                MENU_ADD => self.add_medication().await,
                MENU_EDIT => self.edit_medication().await,
                MENU_DELETE => self.delete_medication().await,
                MENU_TAKE_NOW => self.take_now().await,
                MENU_DISMISS => self.dismiss_alert().await,
                MENU_HISTORY => self.show_history().await,
                MENU_EXPORT => self.export_history().await,
                MENU_NOTIFICATIONS => self.notifications().await,
                _ => return Ok(()),
            };

            // No error is fatal: show the message and return to the menu.
            if let Err(e) = result {
                println!("  {e}");
            }
        }
    }
}

fn prompt_err(e: inquire::InquireError) -> DomainError {
    DomainError::State(e.to_string())
}

fn medication_line(med: &Medication) -> String {
    let date = med
        .date
        .as_deref()
        .map(|d| format!(" • {d}"))
        .unwrap_or_default();
    format!("[{}] {} • {} • {}{}", med.id, med.name, med.dose, med.time, date)
}

fn take_line(take: &TakeRecord) -> String {
    let note = take
        .note
        .as_deref()
        .map(|n| format!(" • {n}"))
        .unwrap_or_default();
    format!(
        "{} {} — {} • {}{}",
        take.date, take.time, take.name, take.dose, note
    )
}

/// Prompt all medication fields, pre-filled from `current` when editing.
fn prompt_draft(current: Option<&Medication>) -> Result<crate::domain::MedicationDraft, DomainError> {
    let name = Text::new("Nome:")
        .with_initial_value(current.map(|m| m.name.as_str()).unwrap_or(""))
        .prompt()
        .map_err(prompt_err)?;
    let dose = Text::new("Dose:")
        .with_initial_value(current.map(|m| m.dose.as_str()).unwrap_or(""))
        .prompt()
        .map_err(prompt_err)?;
    let time = Text::new("Hora (HH:MM):")
        .with_initial_value(current.map(|m| m.time.as_str()).unwrap_or(""))
        .prompt()
        .map_err(prompt_err)?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let date = Text::new("Data (YYYY-MM-DD):")
        .with_initial_value(current.and_then(|m| m.date.as_deref()).unwrap_or(&today))
        .prompt()
        .map_err(prompt_err)?;
    Ok(crate::domain::MedicationDraft {
        name: name.trim().to_string(),
        dose: dose.trim().to_string(),
        time: time.trim().to_string(),
        date: date.trim().to_string(),
    })
}

fn prompt_note() -> Result<String, DomainError> {
    Text::new("Observação (opcional):")
        .with_default("")
        .prompt()
        .map_err(prompt_err)
}

/// History filter: current month or an explicit start/end range.
fn prompt_filter(current_month: &str) -> Result<HistoryFilter, DomainError> {
    let by_month = format!("Mês ({current_month})");
    let by_range = "Intervalo de datas".to_string();
    let choice = Select::new("Período", vec![by_month.clone(), by_range])
        .prompt()
        .map_err(prompt_err)?;
    if choice == by_month {
        return Ok(HistoryFilter::month(current_month));
    }
    let start = Text::new("Início (YYYY-MM-DD, vazio = sem limite):")
        .with_default("")
        .prompt()
        .map_err(prompt_err)?;
    let end = Text::new("Fim (YYYY-MM-DD, vazio = sem limite):")
        .with_default("")
        .prompt()
        .map_err(prompt_err)?;
    let opt = |s: String| if s.trim().is_empty() { None } else { Some(s.trim().to_string()) };
    Ok(HistoryFilter::range(opt(start), opt(end)))
}

/// `YYYY-MM` -> (year, month).
fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (y, m) = key.split_once('-')?;
    Some((y.parse().ok()?, m.parse().ok()?))
}

/// Text month grid: Sunday-first header, `•` marks days with takes, padding
/// days from adjacent months render blank.
fn format_calendar(cells: &[CalendarCell]) -> String {
    let mut out = String::from("\n   ");
    for w in WEEKDAY_HEADER {
        out.push_str(&format!("{w:>4}"));
    }
    for (i, cell) in cells.iter().enumerate() {
        if i % 7 == 0 {
            out.push_str("\n   ");
        }
        if cell.muted {
            out.push_str("    ");
        } else if cell.marked {
            out.push_str(&format!("{:>3}•", cell.day));
        } else {
            out.push_str(&format!("{:>4}", cell.day));
        }
    }
    out.push('\n');
    out
}
