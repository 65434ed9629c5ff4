//! Built-in blank Technician Work Order Information Sheet.
//!
//! Used whenever no template spreadsheet is configured (or the configured one
//! can't be read). The generated package is a valid single-sheet workbook
//! carrying the structural header cells and the field labels, with every
//! value cell left empty.

use crate::common::Result;
use crate::sheet::{CellRef, CellSink, Sheet};

use super::package::Package;
use super::writer::{sheet_data_xml, splice_sheet_data};

/// Title marker expected in D1 of every work order sheet.
pub const DOCUMENT_TITLE: &str = "Technician Work Order Information Sheet";
/// Section marker expected in A13 of every work order sheet.
pub const PLANS_HEADER: &str = "Work Order Plans";

const LABELS: &[(&str, &str)] = &[
    ("D1", DOCUMENT_TITLE),
    ("A3", "Date"),
    ("A4", "Originator"),
    ("A5", "Prepared By"),
    ("A6", "Work Order #"),
    ("B6", "Site"),
    ("C6", "Special"),
    ("D6", "Title"),
    ("I6", "Type"),
    ("C8", "Location"),
    ("A9", "Priority"),
    ("B9", "Created By"),
    ("G9", "Related WO"),
    ("I9", "PAC"),
    ("A11", "NCR Required"),
    ("B11", "NCR #"),
    ("E11", "Task Lead Req."),
    ("F11", "Tech Witness Pt."),
    ("G11", "Peer Review Req."),
    ("H11", "Peer Review Att."),
    ("I11", "EHS Req."),
    ("J11", "QAMIP"),
    ("K11", "QA Review Req."),
    ("A13", PLANS_HEADER),
    ("A14", "Task #"),
    ("B14", "Task Description"),
    ("G14", "Reference"),
    ("A30", "Work Order Actuals"),
    ("A31", "Task #"),
    ("C31", "Date"),
    ("E31", "Technician"),
    ("H31", "# Techs"),
    ("J31", "Hours"),
    ("A77", "Start Date"),
    ("C77", "End Date"),
    ("A79", "Restoration Date"),
    ("C79", "Repair Time"),
    ("A85", "Comments"),
    ("I85", "Author"),
    ("K85", "Date"),
];

/// Generate the blank work order package.
pub fn blank_package() -> Result<Package> {
    let mut sheet = Sheet::new();
    for (at, label) in LABELS {
        sheet.set(CellRef::from_a1(at), *label);
    }
    let worksheet = splice_sheet_data(&generate_worksheet_shell(), &sheet_data_xml(&sheet))?;

    let mut package = Package::new();
    package.set_part("[Content_Types].xml", generate_content_types().into_bytes());
    package.set_part("_rels/.rels", generate_root_rels().into_bytes());
    package.set_part("xl/workbook.xml", generate_workbook_xml().into_bytes());
    package.set_part(
        "xl/_rels/workbook.xml.rels",
        generate_workbook_rels().into_bytes(),
    );
    package.set_part("xl/worksheets/sheet1.xml", worksheet.into_bytes());
    package.set_part("xl/styles.xml", generate_styles_xml().into_bytes());
    Ok(package)
}

/// Generate [Content_Types].xml for the XLSX package.
fn generate_content_types() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#.to_string()
}

/// Generate root _rels/.rels file.
fn generate_root_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#.to_string()
}

/// Generate xl/workbook.xml.
fn generate_workbook_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="TWOIS" sheetId="1" r:id="rId1"/>
</sheets>
</workbook>"#.to_string()
}

/// Generate xl/_rels/workbook.xml.rels.
fn generate_workbook_rels() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#.to_string()
}

/// Generate xl/styles.xml (minimal styles).
fn generate_styles_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
<borders count="1"><border/></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
</styleSheet>"#.to_string()
}

/// Worksheet part with an empty `<sheetData/>` for the labels to be spliced into.
fn generate_worksheet_shell() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<cols><col min="1" max="1" width="14" customWidth="1"/><col min="2" max="2" width="40" customWidth="1"/><col min="3" max="11" width="14" customWidth="1"/></cols>
<sheetData/>
<mergeCells count="1"><mergeCell ref="D1:K1"/></mergeCells>
<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>
</worksheet>"#.to_string()
}
