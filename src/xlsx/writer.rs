//! Worksheet serialization.
//!
//! Only the `<sheetData>` element is regenerated. Everything around it in the
//! worksheet part (column widths, merged ranges, page setup, conditional
//! formatting) is spliced back in unchanged.

use std::fmt::Write;

use memchr::memmem;

use crate::common::xml::escape_xml;
use crate::common::{Error, Result};
use crate::sheet::{Cell, CellRef, CellValue, Sheet};

/// Render the sheet's cells as a complete `<sheetData>` element.
pub fn sheet_data_xml(sheet: &Sheet) -> String {
    let mut xml = String::with_capacity(64 * sheet.len() + 32);
    xml.push_str("<sheetData>");

    for row in sheet.row_numbers() {
        let _ = write!(xml, r#"<row r="{}""#, row);
        for (key, value) in sheet.row_attributes(row) {
            // Values were captured still escaped
            let _ = write!(xml, r#" {}="{}""#, key, value);
        }

        let mut cells = sheet.row_cells(row).peekable();
        if cells.peek().is_none() {
            xml.push_str("/>");
            continue;
        }
        xml.push('>');
        for (at, cell) in cells {
            write_cell(&mut xml, at, cell);
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData>");
    xml
}

fn write_cell(xml: &mut String, at: CellRef, cell: &Cell) {
    let _ = write!(xml, r#"<c r="{}""#, at);
    if let Some(style) = &cell.style {
        let _ = write!(xml, r#" s="{}""#, style);
    }

    let formula = cell.formula.as_deref().unwrap_or("");
    match &cell.value {
        CellValue::Empty if formula.is_empty() => {
            xml.push_str("/>");
            return;
        },
        CellValue::Empty => {
            let _ = write!(xml, ">{}", formula);
        },
        CellValue::Bool(b) => {
            let _ = write!(xml, r#" t="b">{}<v>{}</v>"#, formula, u8::from(*b));
        },
        CellValue::Int(i) => {
            let _ = write!(xml, ">{}<v>{}</v>", formula, i);
        },
        CellValue::Float(f) | CellValue::DateTime(f) => {
            let _ = write!(xml, ">{}<v>{}</v>", formula, f);
        },
        CellValue::String(s) if !formula.is_empty() => {
            let _ = write!(xml, r#" t="str">{}<v>{}</v>"#, formula, escape_xml(s));
        },
        CellValue::String(s) => {
            let _ = write!(
                xml,
                r#" t="inlineStr"><is><t xml:space="preserve">{}</t></is>"#,
                escape_xml(s)
            );
        },
        CellValue::Error(e) => {
            let _ = write!(xml, r#" t="e">{}<v>{}</v>"#, formula, escape_xml(e));
        },
    }
    xml.push_str("</c>");
}

/// Replace the `<sheetData>` element of `worksheet_xml` with `sheet_data`.
///
/// Handles both `<sheetData>...</sheetData>` and the self-closing form.
pub fn splice_sheet_data(worksheet_xml: &str, sheet_data: &str) -> Result<String> {
    let bytes = worksheet_xml.as_bytes();
    let start = find_sheet_data_start(bytes)
        .ok_or_else(|| Error::InvalidFormat("worksheet has no sheetData element".to_string()))?;

    let tag_end = memchr::memchr(b'>', &bytes[start..])
        .map(|i| start + i)
        .ok_or_else(|| Error::InvalidFormat("unterminated sheetData tag".to_string()))?;

    let end = if bytes[tag_end - 1] == b'/' {
        tag_end + 1
    } else {
        memmem::find(&bytes[tag_end..], b"</sheetData>")
            .map(|i| tag_end + i + "</sheetData>".len())
            .ok_or_else(|| Error::InvalidFormat("unterminated sheetData element".to_string()))?
    };

    let mut out = String::with_capacity(worksheet_xml.len() + sheet_data.len());
    out.push_str(&worksheet_xml[..start]);
    out.push_str(sheet_data);
    out.push_str(&worksheet_xml[end..]);
    Ok(out)
}

/// Locate `<sheetData` as a whole tag name (not e.g. `<sheetDataX`).
fn find_sheet_data_start(bytes: &[u8]) -> Option<usize> {
    let finder = memmem::Finder::new(b"<sheetData");
    let mut offset = 0;
    while let Some(i) = finder.find(&bytes[offset..]) {
        let pos = offset + i;
        match bytes.get(pos + "<sheetData".len()) {
            Some(b'>') | Some(b'/') | Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                return Some(pos);
            },
            _ => offset = pos + 1,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::CellSink;
    use crate::xlsx::reader::parse_sheet;

    #[test]
    fn test_sheet_data_xml() {
        let mut sheet = Sheet::new();
        sheet.set(CellRef::from_a1("D7"), "AV <Updates> & Scans");
        sheet.set(CellRef::from_a1("A10"), 3i64);
        sheet.set(CellRef::from_a1("J32"), 2.5);
        sheet.insert_cell(
            CellRef::from_a1("B7"),
            Cell {
                value: CellValue::Empty,
                style: Some("5".into()),
                formula: None,
            },
        );
        sheet.set_row_attributes(12, vec![("ht".into(), "15.75".into())]);

        let xml = sheet_data_xml(&sheet);
        assert!(xml.starts_with("<sheetData><row r=\"7\"><c r=\"B7\" s=\"5\"/>"));
        assert!(xml.contains(
            r#"<c r="D7" t="inlineStr"><is><t xml:space="preserve">AV &lt;Updates&gt; &amp; Scans</t></is></c>"#
        ));
        assert!(xml.contains(r#"<row r="10"><c r="A10"><v>3</v></c></row>"#));
        assert!(xml.contains(r#"<row r="12" ht="15.75"/>"#));
        assert!(xml.contains(r#"<c r="J32"><v>2.5</v></c>"#));
    }

    #[test]
    fn test_splice_preserves_surroundings() {
        let original = r#"<worksheet><cols><col min="1" max="1" width="12"/></cols><sheetData><row r="1"/></sheetData><mergeCells count="1"><mergeCell ref="D1:K1"/></mergeCells></worksheet>"#;
        let spliced = splice_sheet_data(original, "<sheetData></sheetData>").unwrap();
        assert_eq!(
            spliced,
            r#"<worksheet><cols><col min="1" max="1" width="12"/></cols><sheetData></sheetData><mergeCells count="1"><mergeCell ref="D1:K1"/></mergeCells></worksheet>"#
        );
    }

    #[test]
    fn test_splice_self_closing() {
        let original = "<worksheet><sheetData/><pageMargins/></worksheet>";
        let spliced = splice_sheet_data(original, "<sheetData><row r=\"1\"/></sheetData>").unwrap();
        assert_eq!(
            spliced,
            "<worksheet><sheetData><row r=\"1\"/></sheetData><pageMargins/></worksheet>"
        );
        assert!(splice_sheet_data("<worksheet/>", "<sheetData/>").is_err());
    }

    #[test]
    fn test_written_sheet_parses_back() {
        let mut sheet = Sheet::new();
        sheet.set(CellRef::from_a1("D1"), "Technician Work Order Information Sheet");
        sheet.set(CellRef::from_a1("B12"), "NCR123456W");
        sheet.set(CellRef::from_a1("E12"), true);
        sheet.set(CellRef::from_a1("H32"), 2i64);

        let xml = format!("<worksheet>{}</worksheet>", sheet_data_xml(&sheet));
        let reread = parse_sheet(&xml, &[]).unwrap();
        for at in ["D1", "B12", "E12", "H32"] {
            let at = CellRef::from_a1(at);
            assert_eq!(reread.cell(at), sheet.cell(at));
        }
    }
}
