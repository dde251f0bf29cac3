//! Document model: metadata and page selection.
//!
//! A decoded OmniGraffle file is a single top-level mapping. Single-page
//! documents keep their `GraphicsList` at the top level; multi-page documents
//! keep one mapping per page under `Sheets`. [`Document`] captures the parts
//! the renderer needs: format version, print geometry, the image list, and
//! the selected page.

use log::{debug, trace};

use graffle_core::geometry::Point;
use graffle_parser::{Dict, Value, coords};

use crate::error::GraffleError;

/// US Letter, in points.
const DEFAULT_PAPER_SIZE: (f32, f32) = (612.0, 792.0);

/// Page and margin geometry from `PrintInfo`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintInfo {
    paper_size: (f32, f32),
    left_margin: f32,
    right_margin: f32,
    top_margin: f32,
    bottom_margin: f32,
}

impl PrintInfo {
    /// Reads a `PrintInfo` mapping.
    ///
    /// Entries are Cocoa archive pairs such as
    /// `NSPaperSize = ("size", "{612, 792}")`; the second element holds the
    /// value. Missing or unreadable entries keep their defaults.
    pub fn from_dict(dict: &Dict) -> Self {
        let mut info = Self::default();

        if let Some(size) = archived(dict, "NSPaperSize").and_then(Value::as_str) {
            match coords::parse_point(size) {
                Ok(size) => info.paper_size = size,
                Err(err) => debug!(err:%; "Ignoring unreadable paper size"),
            }
        }

        let margin = |key: &str, default: f32| {
            archived(dict, key)
                .and_then(Value::as_f32)
                .unwrap_or(default)
        };
        info.left_margin = margin("NSLeftMargin", info.left_margin);
        info.right_margin = margin("NSRightMargin", info.right_margin);
        info.top_margin = margin("NSTopMargin", info.top_margin);
        info.bottom_margin = margin("NSBottomMargin", info.bottom_margin);

        info
    }

    /// Paper `(width, height)` in points.
    pub fn paper_size(&self) -> (f32, f32) {
        self.paper_size
    }

    pub fn left_margin(&self) -> f32 {
        self.left_margin
    }

    pub fn right_margin(&self) -> f32 {
        self.right_margin
    }

    pub fn top_margin(&self) -> f32 {
        self.top_margin
    }

    pub fn bottom_margin(&self) -> f32 {
        self.bottom_margin
    }

    /// Paper size minus margins: the canvas area of a legacy document.
    pub fn printable_size(&self) -> (f32, f32) {
        let (width, height) = self.paper_size;
        (
            width - self.left_margin - self.right_margin,
            height - self.top_margin - self.bottom_margin,
        )
    }
}

impl Default for PrintInfo {
    fn default() -> Self {
        Self {
            paper_size: DEFAULT_PAPER_SIZE,
            left_margin: 0.0,
            right_margin: 0.0,
            top_margin: 0.0,
            bottom_margin: 0.0,
        }
    }
}

/// Returns the payload of an archived `PrintInfo` entry.
fn archived<'a>(dict: &'a Dict, key: &str) -> Option<&'a Value> {
    match dict.get(key)? {
        Value::Array(pair) => pair.get(1),
        value => Some(value),
    }
}

/// File-level metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileInfo {
    format_version: i64,
    print_info: PrintInfo,
}

impl FileInfo {
    /// Reads `GraphDocumentVersion` (0 when absent) and `PrintInfo`.
    pub fn from_dict(dict: &Dict) -> Self {
        let format_version = dict
            .get("GraphDocumentVersion")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let print_info = dict
            .get("PrintInfo")
            .and_then(Value::as_dict)
            .map(PrintInfo::from_dict)
            .unwrap_or_default();

        Self {
            format_version,
            print_info,
        }
    }

    pub fn format_version(&self) -> i64 {
        self.format_version
    }

    pub fn print_info(&self) -> &PrintInfo {
        &self.print_info
    }
}

/// How the page background is produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background<'a> {
    /// Version 6 and later: an ordinary graphic drawn before the page content.
    Graphic(&'a Dict),
    /// Earlier versions with a `CanvasColor`: a rectangle covering the
    /// printable area.
    Canvas { origin: Point, size: (f32, f32) },
    None,
}

/// A decoded document with one page selected for rendering.
#[derive(Debug, Clone)]
pub struct Document {
    file_info: FileInfo,
    images: Vec<String>,
    sheet_count: Option<usize>,
    page_index: usize,
    page: Dict,
}

impl Document {
    /// Builds the document model from a decoded value tree.
    ///
    /// # Errors
    ///
    /// Returns [`GraffleError::MalformedDocument`] when the tree has no
    /// top-level mapping, when `page` is not a valid `Sheets` index, or when
    /// the selected page has no `GraphicsList` array.
    pub fn from_value(value: &Value, page: usize) -> Result<Self, GraffleError> {
        let root = top_level_dict(value)
            .ok_or_else(|| GraffleError::malformed("no top-level mapping"))?;

        let file_info = FileInfo::from_dict(root);
        debug!(
            version = file_info.format_version(),
            paper:? = file_info.print_info().paper_size();
            "Read file info"
        );

        let images = root
            .get("ImageList")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let (sheet_count, selected) = match root.get("Sheets") {
            Some(Value::Array(sheets)) => {
                let selected = sheets
                    .get(page)
                    .ok_or_else(|| {
                        GraffleError::malformed(format!(
                            "page {page} out of range, document has {} sheet(s)",
                            sheets.len()
                        ))
                    })?
                    .as_dict()
                    .ok_or_else(|| {
                        GraffleError::malformed(format!("sheet {page} is not a mapping"))
                    })?;
                (Some(sheets.len()), selected)
            }
            Some(other) => {
                return Err(GraffleError::malformed(format!(
                    "`Sheets` is a {}, expected an array",
                    other.kind_name()
                )));
            }
            None if page > 0 => {
                return Err(GraffleError::malformed(format!(
                    "page {page} out of range, document has a single page"
                )));
            }
            None => (None, root),
        };

        match selected.get("GraphicsList") {
            Some(Value::Array(_)) => {}
            Some(other) => {
                return Err(GraffleError::malformed(format!(
                    "`GraphicsList` is a {}, expected an array",
                    other.kind_name()
                )));
            }
            None => return Err(GraffleError::malformed("page has no `GraphicsList`")),
        }

        trace!(page, sheet_count:?; "Selected page");
        Ok(Self {
            file_info,
            images,
            sheet_count,
            page_index: page,
            page: selected.clone(),
        })
    }

    pub fn file_info(&self) -> &FileInfo {
        &self.file_info
    }

    /// Image file names, indexed by `ImageID`.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Number of sheets, or `None` for a single-page document.
    pub fn sheet_count(&self) -> Option<usize> {
        self.sheet_count
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// The selected page's top-level graphics, in stored order.
    pub fn graphics(&self) -> &[Value] {
        self.page
            .get("GraphicsList")
            .and_then(Value::as_array)
            .unwrap_or_default()
    }

    /// Decides how the page background is drawn.
    pub fn background(&self) -> Background<'_> {
        if self.file_info.format_version() >= 6 {
            return match self.page.get("BackgroundGraphic").and_then(Value::as_dict) {
                Some(graphic) => Background::Graphic(graphic),
                None => Background::None,
            };
        }

        if !self.page.contains_key("CanvasColor") {
            return Background::None;
        }

        let origin = self
            .page
            .get("CanvasOrigin")
            .and_then(Value::as_str)
            .and_then(|origin| coords::parse_point(origin).ok())
            .map_or(Point::default(), |(x, y)| Point::new(x, y));

        Background::Canvas {
            origin,
            size: self.file_info.print_info().printable_size(),
        }
    }
}

/// Finds the top-level mapping, descending into a root array if needed.
fn top_level_dict(value: &Value) -> Option<&Dict> {
    match value {
        Value::Dict(dict) => Some(dict),
        Value::Array(items) => items.iter().find_map(top_level_dict),
        _ => None,
    }
}
