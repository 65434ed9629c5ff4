//! Raw OPC package access.
//!
//! An `.xlsx` file is a ZIP archive of XML parts. The package keeps every part
//! as raw bytes, in archive order, so that parts this crate never looks at
//! (styles, drawings, printer settings) are written back byte-for-byte.

use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::common::{Error, Result};

/// One named part of the package.
#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

/// All parts of an `.xlsx` package.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Create a new empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every part from the archive at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let package = Self::from_reader(std::io::BufReader::new(file))?;
        debug!(path = %path.display(), parts = package.parts.len(), "opened package");
        Ok(package)
    }

    /// Read every part from an in-memory archive.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.push(Part {
                name: entry.name().to_string(),
                data,
            });
        }

        Ok(Self { parts })
    }

    /// Get a part's bytes by name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Get a part as UTF-8 text, failing if it is missing.
    pub fn part_str(&self, name: &str) -> Result<&str> {
        let bytes = self
            .part(name)
            .ok_or_else(|| Error::ComponentNotFound(name.to_string()))?;
        Ok(std::str::from_utf8(bytes)?)
    }

    /// Replace a part, or append it if the package has no such part.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Names of all parts, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Serialize the package to ZIP bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for part in &self.parts {
            writer.start_file(part.name.as_str(), options)?;
            writer.write_all(&part.data)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Write the package to `path`, replacing any existing file.
    ///
    /// The parent directory must already exist.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes()?)?;
        debug!(path = %path.display(), "saved package");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_survive_round_trip_in_order() {
        let mut pkg = Package::new();
        pkg.set_part("[Content_Types].xml", b"<Types/>".to_vec());
        pkg.set_part("xl/styles.xml", b"<styleSheet/>".to_vec());
        pkg.set_part("xl/media/image1.png", vec![0x89, 0x50, 0x4E, 0x47]);

        let reread = Package::from_bytes(&pkg.to_bytes().unwrap()).unwrap();
        let names: Vec<&str> = reread.part_names().collect();
        assert_eq!(
            names,
            vec!["[Content_Types].xml", "xl/styles.xml", "xl/media/image1.png"]
        );
        assert_eq!(reread.part("xl/media/image1.png").unwrap(), &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_set_part_replaces() {
        let mut pkg = Package::new();
        pkg.set_part("a.xml", b"1".to_vec());
        pkg.set_part("a.xml", b"2".to_vec());
        assert_eq!(pkg.part_str("a.xml").unwrap(), "2");
        assert_eq!(pkg.part_names().count(), 1);
    }

    #[test]
    fn test_missing_part() {
        let pkg = Package::new();
        assert!(matches!(
            pkg.part_str("xl/workbook.xml"),
            Err(Error::ComponentNotFound(_))
        ));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            Package::from_bytes(b"plain text"),
            Err(Error::Zip(_))
        ));
    }
}
