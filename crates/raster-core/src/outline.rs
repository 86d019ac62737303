//! Outline data model, validation, and fill-rule selection.
//!
//! The outline is an immutable, flat command stream — a closed 5-variant
//! sum type, never a class hierarchy ("'outline command' is a
//! closed tagged variant... implementations should use a sum type, not
//! subclassing"). This follows the `VertexSource`/command-stream style of
//! the ported AGG `PathStorage`, generalized from AGG's numeric command
//! tags to a Rust enum.

/// One command in a flattened, resolution-independent path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    QuadTo { cx: f64, cy: f64, x: f64, y: f64 },
    CubicTo { cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64 },
    Close,
}

impl PathCommand {
    /// `true` for commands that must be preceded by an open contour.
    pub fn requires_open_contour(&self) -> bool {
        !matches!(self, PathCommand::MoveTo { .. })
    }

    /// Every finite coordinate carried by this command.
    pub fn coords(&self) -> Vec<(f64, f64)> {
        match *self {
            PathCommand::MoveTo { x, y } => vec![(x, y)],
            PathCommand::LineTo { x, y } => vec![(x, y)],
            PathCommand::QuadTo { cx, cy, x, y } => vec![(cx, cy), (x, y)],
            PathCommand::CubicTo { cx1, cy1, cx2, cy2, x, y } => {
                vec![(cx1, cy1), (cx2, cy2), (x, y)]
            }
            PathCommand::Close => vec![],
        }
    }

    fn all_finite(&self) -> bool {
        self.coords().iter().all(|(x, y)| x.is_finite() && y.is_finite())
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn empty() -> Self {
        Bounds { min_x: f64::INFINITY, min_y: f64::INFINITY, max_x: f64::NEG_INFINITY, max_y: f64::NEG_INFINITY }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Whether `self` is fully contained in `other` (within `epsilon`).
    pub fn contained_in(&self, other: &Bounds, epsilon: f64) -> bool {
        self.is_empty()
            || (self.min_x >= other.min_x - epsilon
                && self.min_y >= other.min_y - epsilon
                && self.max_x <= other.max_x + epsilon
                && self.max_y <= other.max_y + epsilon)
    }

    pub fn negate_y(&self) -> Bounds {
        Bounds { min_x: self.min_x, min_y: -self.max_y, max_x: self.max_x, max_y: -self.min_y }
    }
}

/// Bitset carried alongside an outline. Only `EVEN_ODD_FILL` is defined
/// here; kept as a raw bitset rather than a single bool so upstream callers
/// have room for bits this core does not interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutlineFlags(pub u32);

impl OutlineFlags {
    pub const EVEN_ODD_FILL: OutlineFlags = OutlineFlags(1 << 0);

    pub fn contains(&self, other: OutlineFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn set(&mut self, other: OutlineFlags) {
        self.0 |= other.0;
    }
}

/// A resolution-independent vector outline: an ordered command stream plus
/// optional precomputed bounds and a flag set.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    pub commands: Vec<PathCommand>,
    pub bounds: Option<Bounds>,
    pub flags: OutlineFlags,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commands(commands: Vec<PathCommand>) -> Self {
        Outline { commands, bounds: None, flags: OutlineFlags::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Polygon fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl FillRule {
    /// Select the fill rule from outline flags.
    pub fn from_flags(flags: OutlineFlags) -> FillRule {
        if flags.contains(OutlineFlags::EVEN_ODD_FILL) {
            FillRule::EvenOdd
        } else {
            FillRule::NonZero
        }
    }
}

/// Outcome of [`validate_outline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineValidation {
    Ok,
    EmptyOutline,
    InvalidOutline(String),
}

/// Structural validation of an outline.
///
/// Checks, in order: emptiness (unless `allow_empty`), that every draw
/// command is preceded by an open contour, and that every coordinate is
/// finite. Unknown command tags cannot occur in Rust's closed enum, so that
/// check is a tautology here and is omitted (it is meaningful only in
/// languages where "commands" are an open numeric tag).
pub fn validate_outline(outline: &Outline, allow_empty: bool) -> OutlineValidation {
    if outline.commands.is_empty() {
        return if allow_empty { OutlineValidation::Ok } else { OutlineValidation::EmptyOutline };
    }

    let mut in_contour = false;
    for (i, cmd) in outline.commands.iter().enumerate() {
        if cmd.requires_open_contour() && !in_contour {
            return OutlineValidation::InvalidOutline(format!(
                "command {cmd:?} at index {i} has no preceding MoveTo"
            ));
        }
        if !cmd.all_finite() {
            return OutlineValidation::InvalidOutline(format!(
                "command at index {i} has a non-finite coordinate"
            ));
        }
        match cmd {
            PathCommand::MoveTo { .. } => in_contour = true,
            PathCommand::Close => in_contour = false,
            _ => {}
        }
    }
    OutlineValidation::Ok
}
