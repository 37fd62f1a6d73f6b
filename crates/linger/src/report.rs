use std::io::{self, Write};

use linger_types::OperationRecord;

pub(crate) fn write_dump<W: Write>(out: &mut W, records: &[OperationRecord]) -> io::Result<()> {
    writeln!(
        out,
        "{} outstanding async operation(s):",
        records.len()
    )?;
    for record in records {
        writeln!(out)?;
        writeln!(
            out,
            "Type: {}, id: {}, trigger: {}",
            record.kind, record.id, record.trigger_id
        )?;
        if record.stack.is_empty() {
            writeln!(out, "    (no stack captured)")?;
        }
        for line in &record.stack {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "Resource: {:?}", record.resource)?;
    }
    Ok(())
}
