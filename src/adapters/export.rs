//! CSV export for take history. Uses the `csv` crate for safe quoting.
//!
//! Column layout matches the backend's own export route
//! (`ID;Medicamento;Dose;Data;Hora;Nota`).

use crate::domain::TakeRecord;

/// Serialize take records to a semicolon-delimited CSV string with a header
/// row, newest-first order preserved from the input.
pub fn takes_to_csv(takes: &[TakeRecord]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(["ID", "Medicamento", "Dose", "Data", "Hora", "Nota"])?;

    for take in takes {
        let id = take.id.map(|i| i.to_string()).unwrap_or_default();
        let note = take.note.clone().unwrap_or_default();
        wtr.write_record([
            id.as_str(),
            take.name.as_str(),
            take.dose.as_str(),
            take.date.as_str(),
            take.time.as_str(),
            note.as_str(),
        ])?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(name: &str, note: Option<&str>) -> TakeRecord {
        TakeRecord {
            id: Some(7),
            med_id: Some(1),
            name: name.to_string(),
            dose: "500mg".to_string(),
            note: note.map(str::to_string),
            date: "2025-03-10".to_string(),
            time: "09:00:12".to_string(),
        }
    }

    #[test]
    fn header_and_rows() {
        let csv = takes_to_csv(&[take("Ben-u-ron", Some("com comida"))]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ID;Medicamento;Dose;Data;Hora;Nota"));
        assert_eq!(
            lines.next(),
            Some("7;Ben-u-ron;500mg;2025-03-10;09:00:12;com comida")
        );
    }

    #[test]
    fn missing_note_is_empty_field() {
        let csv = takes_to_csv(&[take("A", None)]).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(";"));
    }

    #[test]
    fn special_characters_are_quoted() {
        let csv = takes_to_csv(&[take("A;B", Some("line\nbreak"))]).unwrap();
        // The csv crate quotes fields containing the delimiter or newlines.
        assert!(csv.contains("\"A;B\""));
    }
}
