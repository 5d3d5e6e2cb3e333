// src/csv.rs
// Minimal CSV writer for the assembled run table. std-only.

use std::io::{self, Write};

use crate::extract::{Field, Value};
use crate::table::RunTable;

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Render one cell. Null is an empty cell; timestamps keep the portal's own
/// pattern.
fn render(v: &Value) -> String {
    match v {
        Value::Null => s!(),
        Value::Int(n) => n.to_string(),
        Value::Time(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        Value::Text(t) => t.clone(),
    }
}

/// Write the full table: a header row of field names, then one line per run.
pub fn write_table<W: Write>(mut w: W, table: &RunTable) -> io::Result<()> {
    let headers: Vec<String> = Field::ALL.iter().map(|f| s!(f.name())).collect();
    write_row(&mut w, &headers)?;
    for k in 0..table.len() {
        let row: Vec<String> = Field::ALL
            .iter()
            .map(|&f| render(&table.column(f)[k]))
            .collect();
        write_row(&mut w, &row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PageColumns;

    #[test]
    fn quoting() {
        let mut buf = Vec::new();
        write_row(&mut buf, &[s!("a"), s!("b,c"), s!("d\"e")]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a,\"b,c\",\"d\"\"e\"\n");
    }

    #[test]
    fn table_render() {
        let mut page: PageColumns = Field::ALL
            .iter()
            .map(|&f| (f, vec![Value::Null]))
            .collect();
        page.insert(Field::Id, vec![Value::Int(42)]);
        page.insert(Field::Result, vec![Value::Text(s!("Failed"))]);
        page.insert(Field::Duration, vec![Value::Int(3723)]);

        let mut table = RunTable::new();
        table.append(page);

        let mut buf = Vec::new();
        write_table(&mut buf, &table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,result,user,type,project,project_version,component,\
             component_version,start,duration,description,platforms"
        );
        assert_eq!(lines.next().unwrap(), "42,Failed,,,,,,,,3723,,");
    }
}
