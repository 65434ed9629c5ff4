//! Workbook: a package plus its parsed active worksheet.

use std::path::Path;

use tracing::{debug, warn};

use crate::common::Result;
use crate::sheet::{CellRef, CellSink, CellSource, CellValue, Sheet};

use super::package::Package;
use super::reader::{SHARED_STRINGS_PART, parse_shared_strings, parse_sheet, resolve_first_sheet};
use super::template::blank_package;
use super::writer::{sheet_data_xml, splice_sheet_data};

/// An `.xlsx` workbook opened for reading and editing its first worksheet.
///
/// # Examples
///
/// ```no_run
/// use twois::sheet::{CellRef, CellSink, CellSource};
/// use twois::xlsx::Workbook;
///
/// # fn main() -> twois::Result<()> {
/// let mut book = Workbook::open("123456VBS - AV Updates.xlsx")?;
/// println!("Title: {}", book.text(CellRef::from_a1("D7")));
/// book.set(CellRef::from_a1("B4"), "RS");
/// book.save("123456VBS - AV Updates.xlsx")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Workbook {
    package: Package,
    sheet_path: String,
    sheet: Sheet,
}

impl Workbook {
    /// Open an existing workbook.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Parse the first worksheet of an already loaded package.
    pub fn from_package(package: Package) -> Result<Self> {
        let sheet_path = resolve_first_sheet(&package);
        let shared = match package.part(SHARED_STRINGS_PART) {
            Some(_) => parse_shared_strings(package.part_str(SHARED_STRINGS_PART)?)?,
            None => Vec::new(),
        };
        let sheet = parse_sheet(package.part_str(&sheet_path)?, &shared)?;

        Ok(Self {
            package,
            sheet_path,
            sheet,
        })
    }

    /// The built-in blank work order sheet.
    pub fn blank() -> Result<Self> {
        Self::from_package(blank_package()?)
    }

    /// Start from a template file, falling back to [`Workbook::blank`] when
    /// no template is given or the template can't be read.
    pub fn from_template(template: Option<&Path>) -> Result<Self> {
        if let Some(path) = template {
            match Self::open(path) {
                Ok(book) => return Ok(book),
                Err(e) => warn!(path = %path.display(), error = %e, "unusable template, using blank sheet"),
            }
        }
        Self::blank()
    }

    /// The active worksheet.
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Mutable access to the active worksheet.
    pub fn sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheet
    }

    /// Serialize the workbook, regenerating only the active sheet's data.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let original = self.package.part_str(&self.sheet_path)?;
        let updated = splice_sheet_data(original, &sheet_data_xml(&self.sheet))?;
        self.package.set_part(&self.sheet_path, updated.into_bytes());
        self.package.to_bytes()
    }

    /// Write the workbook to `path`. The parent directory must exist.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        debug!(path = %path.display(), "saved workbook");
        Ok(())
    }
}

impl CellSource for Workbook {
    fn value(&self, cell: CellRef) -> &CellValue {
        self.sheet.value(cell)
    }
}

impl CellSink for Workbook {
    fn set_value(&mut self, cell: CellRef, value: CellValue) {
        self.sheet.set_value(cell, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xlsx::template::{DOCUMENT_TITLE, PLANS_HEADER};
    use tempfile::tempdir;

    #[test]
    fn test_blank_has_structural_headers() {
        let book = Workbook::blank().unwrap();
        assert_eq!(book.text(CellRef::from_a1("D1")), DOCUMENT_TITLE);
        assert_eq!(book.text(CellRef::from_a1("A13")), PLANS_HEADER);
        assert!(book.is_blank(CellRef::from_a1("D7")));
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Pending-001 - Test.xlsx");

        let mut book = Workbook::blank().unwrap();
        book.set(CellRef::from_a1("D7"), "AV Updates & Scans");
        book.set(CellRef::from_a1("A10"), 2i64);
        book.save(&path).unwrap();

        let reopened = Workbook::open(&path).unwrap();
        assert_eq!(reopened.text(CellRef::from_a1("D7")), "AV Updates & Scans");
        assert_eq!(reopened.value(CellRef::from_a1("A10")), &CellValue::Int(2));
        assert_eq!(reopened.text(CellRef::from_a1("D1")), DOCUMENT_TITLE);
    }

    #[test]
    fn test_save_keeps_other_parts() {
        let mut book = Workbook::blank().unwrap();
        let styles_before = book.package.part("xl/styles.xml").unwrap().to_vec();
        book.set(CellRef::from_a1("B3"), "8/5/2024");
        let bytes = book.to_bytes().unwrap();

        let reread = Package::from_bytes(&bytes).unwrap();
        assert_eq!(reread.part("xl/styles.xml").unwrap(), styles_before.as_slice());
        let sheet = reread.part_str("xl/worksheets/sheet1.xml").unwrap();
        assert!(sheet.contains("<mergeCell ref=\"D1:K1\"/>"));
        assert!(sheet.contains("8/5/2024"));
    }

    #[test]
    fn test_from_template_falls_back() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("template.xlsx");
        std::fs::write(&bogus, b"not a zip").unwrap();

        let book = Workbook::from_template(Some(&bogus)).unwrap();
        assert_eq!(book.text(CellRef::from_a1("D1")), DOCUMENT_TITLE);
        assert!(Workbook::from_template(None).is_ok());
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        assert!(Workbook::open(dir.path().join("nope.xlsx")).is_err());
    }
}
