//! Search-hit regions parsed from `xywh=` selectors.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

static XYWH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*xywh=(\d+),(\d+),(\d+),(\d+)").unwrap());

/// Rectangle highlighting a search hit on a canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Matched text, if the hit carries it
    pub chars: Option<String>,
    pub is_visible: bool,
    pub canvas_index: usize,
    /// Position within its group
    pub index: usize,
}

impl AnnotationRect {
    /// Parses the region of a selector such as `https://x/canvas/1#xywh=10,20,30,40`.
    ///
    /// Returns None when the selector has no `xywh=` fragment or a component
    /// does not fit in a u32.
    pub fn parse(on: &str, chars: Option<&str>) -> Option<Self> {
        let caps = XYWH_REGEX.captures(on)?;
        let field = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();
        let rect = Self {
            x: field(1)?,
            y: field(2)?,
            width: field(3)?,
            height: field(4)?,
            chars: chars.map(String::from),
            is_visible: true,
            canvas_index: 0,
            index: 0,
        };
        trace!("parsed rect {:?} from {on}", (rect.x, rect.y, rect.width, rect.height));
        Some(rect)
    }
}

/// Search-hit rectangles belonging to one canvas, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationGroup {
    pub canvas_index: usize,
    pub rects: Vec<AnnotationRect>,
}

impl AnnotationGroup {
    pub fn new(canvas_index: usize) -> Self {
        Self {
            canvas_index,
            rects: Vec::new(),
        }
    }

    /// Adds the region of `on` to the group.
    ///
    /// Malformed selectors are ignored and yield None.
    pub fn add_rect(&mut self, on: &str, chars: Option<&str>) -> Option<&AnnotationRect> {
        let mut rect = AnnotationRect::parse(on, chars)?;
        rect.canvas_index = self.canvas_index;
        rect.index = self.rects.len();
        self.rects.push(rect);
        self.rects.last()
    }
}
