use crate::application::wizard::WizardSnapshot;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ReportRecord<'a> {
    step: u8,
    title: &'a str,
    phone: &'a str,
    selections: String,
    artifact: &'a str,
}

impl<'a> From<&'a WizardSnapshot> for ReportRecord<'a> {
    fn from(snapshot: &'a WizardSnapshot) -> Self {
        let selections: Vec<String> = snapshot
            .selections
            .iter()
            .map(ToString::to_string)
            .collect();
        Self {
            step: snapshot.step.number(),
            title: snapshot.title,
            phone: &snapshot.phone,
            selections: selections.join("|"),
            artifact: snapshot
                .artifact
                .as_ref()
                .map(|a| a.token.as_str())
                .unwrap_or_default(),
        }
    }
}

/// Writes the final state of a session as CSV.
///
/// Header: `step,title,phone,selections,artifact`. Selections are written as
/// `provider:account` pairs joined by `|`.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_snapshot(&mut self, snapshot: &WizardSnapshot) -> Result<()> {
        self.writer.serialize(ReportRecord::from(snapshot))?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the full snapshot as pretty-printed JSON.
pub fn write_json<W: Write>(mut sink: W, snapshot: &WizardSnapshot) -> Result<()> {
    serde_json::to_writer_pretty(&mut sink, snapshot)?;
    writeln!(sink)?;
    Ok(())
}
