// Where division data comes from. The layout engine only ever sees a
// `LayoutDocument`; loading, mock data and files stay behind this trait.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use once_cell::sync::Lazy;

use crate::ir::{Division, LayoutDocument, Rect};
use crate::parser::parse_layout;

pub trait DivisionSource {
    fn load(&self) -> anyhow::Result<LayoutDocument>;
}

/// Reads a JSON/JSON5 layout document from a file, or stdin for `-`.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DivisionSource for FileSource {
    fn load(&self) -> anyhow::Result<LayoutDocument> {
        let contents = if self.path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(&self.path)
                .with_context(|| format!("reading {}", self.path.display()))?
        };
        let document = parse_layout(&contents)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(document)
    }
}

/// An in-memory document, handed out as a fresh copy on every load.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    document: LayoutDocument,
}

impl StaticSource {
    pub fn new(document: LayoutDocument) -> Self {
        Self { document }
    }
}

impl DivisionSource for StaticSource {
    fn load(&self) -> anyhow::Result<LayoutDocument> {
        self.document.validate()?;
        Ok(self.document.clone())
    }
}

// Top row is evenly spaced; operations sits too close to support and gets pushed.
static DEFAULT_OFFICE: Lazy<Vec<Division>> = Lazy::new(|| {
    vec![
        Division::new("research", Rect::new(2.0, 5.0, 18.0, 20.0))
            .with_name("Research & Development"),
        Division::new("engineering", Rect::new(41.0, 5.0, 18.0, 20.0)).with_name("Engineering"),
        Division::new("sales", Rect::new(80.0, 5.0, 18.0, 20.0)).with_name("Sales & Marketing"),
        Division::new("support", Rect::new(10.0, 50.0, 30.0, 25.0)).with_name("Customer Support"),
        Division::new("operations", Rect::new(45.0, 45.0, 30.0, 25.0)).with_name("Operations"),
    ]
});

/// The stock office floor shown when no layout file is given.
pub fn default_office() -> StaticSource {
    StaticSource::new(LayoutDocument::new(DEFAULT_OFFICE.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_office_is_valid() {
        let doc = default_office().load().unwrap();
        assert_eq!(doc.divisions.len(), 5);
        assert!(doc.positions.is_empty());
        assert!(doc.division("operations").is_some());
    }

    #[test]
    fn missing_file_reports_path() {
        let source = FileSource::new("/definitely/not/here.json5");
        let err = source.load().unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json5"));
    }

    #[test]
    fn static_source_validates() {
        let doc = LayoutDocument::new(vec![
            Division::new("a", Rect::new(0.0, 0.0, 10.0, 10.0)),
            Division::new("a", Rect::new(0.0, 0.0, 10.0, 10.0)),
        ]);
        assert!(StaticSource::new(doc).load().is_err());
    }
}
