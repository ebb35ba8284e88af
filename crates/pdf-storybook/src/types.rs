use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Manuscript parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("Manuscript has no pages")]
    EmptyManuscript,
    #[error("Image error for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<serde_json::Error> for ComposeError {
    fn from(err: serde_json::Error) -> Self {
        ComposeError::Parse {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// The structured text input: optional title and author plus one string per
/// text page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Manuscript {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    pub pages: Vec<String>,
}

impl Manuscript {
    /// Title to print, if any. An empty title counts as no title.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Author to print under the title, if any.
    pub fn display_author(&self) -> Option<&str> {
        self.author.as_deref().filter(|a| !a.is_empty())
    }

    pub fn has_title(&self) -> bool {
        self.display_title().is_some()
    }
}

/// An RGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub(crate) fn to_pdf(self) -> printpdf::Color {
        printpdf::Color::Rgb(printpdf::Rgb::new(self.r, self.g, self.b, None))
    }
}
