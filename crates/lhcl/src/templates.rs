//! collection of parsed templates ([Document] and path to source file)
//!
//! [Templates] keeps every document together with the path it was loaded from so errors and
//! output can point back to the file. Documents are kept in insertion order.
use crate::node::Document;
use std::path::{Path, PathBuf};

/// File extensions picked up by [Templates::load_directory]
pub const TEMPLATE_EXTENSIONS: &[&str] = &["tf", "tfvars", "hcl"];

#[derive(Default, Debug)]
pub struct Templates {
    sources: Vec<Source>,
    documents: Vec<Document>,
}

impl Templates {
    /// Adds a parsed document
    pub fn insert(&mut self, document: Document, path: impl Into<Option<PathBuf>>) {
        self.sources.push(path.into());
        self.documents.push(document);
    }

    /// All documents with their source
    pub fn documents(&self) -> impl Iterator<Item = SourceDocument<'_>> {
        self.sources.iter().zip(self.documents.iter())
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl Templates {
    pub fn load_file(&mut self, file_path: &Path) -> Result<(), LoadError> {
        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), "loading file");

        let file_contents = crate::normalize_line_endings(&std::fs::read_to_string(&file_path)?);
        let document = crate::parse(&file_contents).map_err(|source| LoadError::Parse {
            path: file_path.clone(),
            source,
        })?;

        self.insert(document, Some(file_path));
        Ok(())
    }

    /// Loads every template file of a directory (not recursive), in file name order
    pub fn load_directory(&mut self, dir_path: &Path) -> Result<(), LoadError> {
        let mut file_paths = vec![];

        for dir_entry in std::fs::read_dir(dir_path)? {
            let dir_entry = dir_entry?;
            if !dir_entry.file_type()?.is_file() {
                continue;
            }

            let file_path = dir_entry.path();
            let is_template = file_path
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| TEMPLATE_EXTENSIONS.contains(&extension));
            if is_template {
                file_paths.push(file_path);
            }
        }

        if file_paths.is_empty() {
            return Err(LoadError::NoFilesFound);
        }

        file_paths.sort();
        for file_path in file_paths {
            self.load_file(&file_path)?;
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("No template files found in directory")]
    NoFilesFound,
    #[error("IO error")]
    Io(#[from] std::io::Error),
    #[error("Unable to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: crate::ParseError,
    },
}

impl From<Document> for Templates {
    fn from(value: Document) -> Self {
        let mut templates = Templates::default();
        templates.insert(value, None);
        templates
    }
}

/// Utility macro to create [Templates]
///
/// Create from a single document
/// ```
/// # use lhcl::templates;
/// templates!("attribute = 42");
/// ```
///
/// Create from multiple documents (path required)
/// ```
/// # use lhcl::templates;
/// templates! {
///   "main.tf" => "resource \"a\" \"b\" {}",
///   "variables.tf" => "variable \"c\" {}"
/// };
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use lhcl::templates;
/// templates!("not = {valid");
/// ```
#[macro_export]
macro_rules! templates {
    // single document without source
    { $expr:expr } => {
        $crate::templates::Templates::from($crate::parse($expr).expect("template must parse"))
    };
    // multi document with sources
    { $($source:expr => $expr:expr),+ } => {{
        let mut templates = $crate::templates::Templates::default();
        $(
            templates.insert(
                $crate::parse($expr).expect("template must parse"),
                Some(::std::path::PathBuf::from($source)),
            );
        )+

        templates
    }};
}

pub type Source = Option<PathBuf>;
pub type SourceDocument<'a> = (&'a Source, &'a Document);
