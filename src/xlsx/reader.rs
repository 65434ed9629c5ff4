//! Parsers for the workbook, relationship, shared-string and worksheet parts.

use quick_xml::Reader;
use quick_xml::events::attributes::Attributes;
use quick_xml::events::{BytesStart, Event};

use crate::common::xml::{resolve_entity, unescape_xml};
use crate::common::{Error, Result};
use crate::sheet::{Cell, CellRef, CellValue, Sheet};

use super::package::Package;

/// Part used when the workbook's relationships can't be followed.
pub const DEFAULT_SHEET_PART: &str = "xl/worksheets/sheet1.xml";
const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Find the package path of the first worksheet listed in the workbook.
pub fn resolve_first_sheet(package: &Package) -> String {
    first_sheet_target(package).unwrap_or_else(|| DEFAULT_SHEET_PART.to_string())
}

fn first_sheet_target(package: &Package) -> Option<String> {
    let workbook = package.part_str(WORKBOOK_PART).ok()?;
    let rel_id = first_sheet_rel_id(workbook)?;
    let rels = package.part_str(WORKBOOK_RELS_PART).ok()?;
    let target = relationship_target(rels, &rel_id)?;

    let path = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    };
    package.part(&path).is_some().then_some(path)
}

fn first_sheet_rel_id(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sheet" => {
                return attribute_value(e.attributes(), b"id");
            },
            Ok(Event::Eof) | Err(_) => return None,
            _ => {},
        }
    }
}

fn relationship_target(xml: &str, id: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if attribute_value(e.attributes(), b"Id").as_deref() == Some(id) {
                    return attribute_value(e.attributes(), b"Target");
                }
            },
            Ok(Event::Eof) | Err(_) => return None,
            _ => {},
        }
    }
}

/// Look up an attribute by local name and return its unescaped value.
fn attribute_value(attributes: Attributes<'_>, local: &[u8]) -> Option<String> {
    attributes
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| std::str::from_utf8(&a.value).ok().map(unescape_xml))
}

/// Raw (still escaped) attribute value.
fn raw_attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(std::str::from_utf8(&attr.value)?.to_string()));
        }
    }
    Ok(None)
}

/// Parse `xl/sharedStrings.xml` into its list of strings.
///
/// Rich-text runs are concatenated; phonetic hints (`<rPh>`) are skipped.
pub fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut phonetic_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"rPh" => phonetic_depth += 1,
                b"t" if phonetic_depth == 0 => in_text = true,
                _ => {},
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => strings.push(current.take().unwrap_or_default()),
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {},
            },
            Event::Text(t) if in_text => {
                if let Some(s) = current.as_mut() {
                    s.push_str(std::str::from_utf8(&t)?);
                }
            },
            Event::CData(c) if in_text => {
                if let Some(s) = current.as_mut() {
                    s.push_str(std::str::from_utf8(&c)?);
                }
            },
            Event::GeneralRef(r) if in_text => {
                if let Some(s) = current.as_mut() {
                    push_entity(s, std::str::from_utf8(&r)?);
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(strings)
}

fn push_entity(out: &mut String, name: &str) {
    match resolve_entity(name) {
        Some(ch) => out.push(ch),
        None => {
            out.push('&');
            out.push_str(name);
            out.push(';');
        },
    }
}

/// What text the parser is currently collecting inside a `<c>` element.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Capture {
    None,
    Value,
    InlineText,
    Formula,
}

/// State for the `<c>` element being parsed.
#[derive(Debug, Default)]
struct PendingCell {
    at: Option<CellRef>,
    kind: Option<String>,
    style: Option<String>,
    value: String,
    inline: String,
    formula: Option<String>,
}

impl PendingCell {
    fn finish(self, shared: &[String]) -> Cell {
        let value = match self.kind.as_deref() {
            Some("s") => self
                .value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| shared.get(i))
                .map(|s| CellValue::from(s.as_str()))
                .unwrap_or_default(),
            Some("inlineStr") => CellValue::from(self.inline),
            Some("str") | Some("d") => CellValue::from(self.value),
            Some("b") => CellValue::Bool(self.value.trim() == "1"),
            Some("e") => CellValue::Error(self.value),
            _ => parse_number(&self.value),
        };

        Cell {
            value,
            style: self.style,
            formula: self.formula,
        }
    }
}

fn parse_number(raw: &str) -> CellValue {
    let raw = raw.trim();
    if raw.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = raw.parse::<i64>() {
        CellValue::Int(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        CellValue::Float(f)
    } else {
        CellValue::String(raw.to_string())
    }
}

/// Parse a worksheet part into a [`Sheet`].
///
/// Cell styles, formulas and row attributes are retained so the sheet can be
/// written back without losing formatting.
pub fn parse_sheet(xml: &str, shared: &[String]) -> Result<Sheet> {
    let mut reader = Reader::from_str(xml);
    let mut sheet = Sheet::new();

    let mut row = 0u32;
    let mut next_column = 1u32;
    let mut in_sheet_data = false;
    let mut pending: Option<PendingCell> = None;
    let mut capture = Capture::None;

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"sheetData" => in_sheet_data = !is_empty,
                    b"row" if in_sheet_data => {
                        row = read_row_start(e, row, &mut sheet)?;
                        next_column = 1;
                    },
                    b"c" if in_sheet_data => {
                        let cell = start_cell(e, row, next_column)?;
                        if let Some(at) = cell.at {
                            next_column = at.column() + 1;
                        }
                        if is_empty {
                            store(&mut sheet, cell, shared);
                        } else {
                            pending = Some(cell);
                        }
                    },
                    b"v" if pending.is_some() && !is_empty => capture = Capture::Value,
                    b"t" if pending.is_some() && !is_empty => capture = Capture::InlineText,
                    b"f" => {
                        if let Some(cell) = pending.as_mut() {
                            let tag = std::str::from_utf8(e)?;
                            if is_empty {
                                cell.formula = Some(format!("<{}/>", tag));
                            } else {
                                cell.formula = Some(format!("<{}>", tag));
                                capture = Capture::Formula;
                            }
                        }
                    },
                    _ => {},
                }
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"sheetData" => in_sheet_data = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        store(&mut sheet, cell, shared);
                    }
                    capture = Capture::None;
                },
                b"f" => {
                    if let Some(f) = pending.as_mut().and_then(|c| c.formula.as_mut()) {
                        f.push_str("</f>");
                    }
                    capture = Capture::None;
                },
                b"v" | b"t" => capture = Capture::None,
                _ => {},
            },
            Event::Text(ref t) => {
                if let Some(cell) = pending.as_mut() {
                    let text = std::str::from_utf8(t)?;
                    match capture {
                        Capture::Value => cell.value.push_str(text),
                        Capture::InlineText => cell.inline.push_str(text),
                        Capture::Formula => {
                            if let Some(f) = cell.formula.as_mut() {
                                f.push_str(text);
                            }
                        },
                        Capture::None => {},
                    }
                }
            },
            Event::CData(ref c) => {
                if let Some(cell) = pending.as_mut() {
                    let text = std::str::from_utf8(c)?;
                    match capture {
                        Capture::Value => cell.value.push_str(text),
                        Capture::InlineText => cell.inline.push_str(text),
                        _ => {},
                    }
                }
            },
            Event::GeneralRef(ref r) => {
                if let Some(cell) = pending.as_mut() {
                    let name = std::str::from_utf8(r)?;
                    match capture {
                        Capture::Value => push_entity(&mut cell.value, name),
                        Capture::InlineText => push_entity(&mut cell.inline, name),
                        Capture::Formula => {
                            // Formula text is kept escaped for verbatim output
                            if let Some(f) = cell.formula.as_mut() {
                                f.push('&');
                                f.push_str(name);
                                f.push(';');
                            }
                        },
                        Capture::None => {},
                    }
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(sheet)
}

fn read_row_start(e: &BytesStart<'_>, previous: u32, sheet: &mut Sheet) -> Result<u32> {
    let mut row = previous + 1;
    let mut extra = Vec::new();

    for attr in e.attributes() {
        let attr = attr?;
        let value = std::str::from_utf8(&attr.value)?;
        match attr.key.as_ref() {
            b"r" => {
                row = value
                    .parse()
                    .map_err(|_| Error::InvalidFormat(format!("bad row number: {}", value)))?;
            },
            b"spans" => {},
            key => extra.push((std::str::from_utf8(key)?.to_string(), value.to_string())),
        }
    }

    sheet.set_row_attributes(row, extra);
    Ok(row)
}

fn start_cell(e: &BytesStart<'_>, row: u32, next_column: u32) -> Result<PendingCell> {
    let at = match raw_attribute(e, b"r")? {
        Some(r) => CellRef::parse(&r)?,
        None => CellRef::new(next_column, row.max(1)),
    };

    Ok(PendingCell {
        at: Some(at),
        kind: raw_attribute(e, b"t")?,
        style: raw_attribute(e, b"s")?,
        ..Default::default()
    })
}

fn store(sheet: &mut Sheet, pending: PendingCell, shared: &[String]) {
    if let Some(at) = pending.at {
        let cell = pending.finish(shared);
        if cell.value.is_empty() && cell.style.is_none() && cell.formula.is_none() {
            return;
        }
        sheet.insert_cell(at, cell);
    }
}
