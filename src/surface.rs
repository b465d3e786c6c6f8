//! The vector-drawing collaborator the scene builder and driver talk to.
//!
//! Everything above this trait deals only in shape handles and a handful of
//! attribute setters; how shapes are stored or shown is up to the implementor.

use crate::geometry::Point;

/// Opaque handle to a shape created by a [`Surface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ShapeId(pub(crate) usize);

/// Named colours, as a browser would understand them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Paint {
    White,
    Black,
    Yellow,
    Blue,
    Grey,
    Red,
    Green,
    Pink,
    Orange,
    Brown,
}

impl Paint {
    pub(crate) fn css_name(self) -> &'static str {
        match self {
            Paint::White => "white",
            Paint::Black => "black",
            Paint::Yellow => "yellow",
            Paint::Blue => "blue",
            Paint::Grey => "grey",
            Paint::Red => "red",
            Paint::Green => "green",
            Paint::Pink => "pink",
            Paint::Orange => "orange",
            Paint::Brown => "brown",
        }
    }

    /// CSS named-colour values.
    pub(crate) fn rgb(self) -> (u8, u8, u8) {
        match self {
            Paint::White => (255, 255, 255),
            Paint::Black => (0, 0, 0),
            Paint::Yellow => (255, 255, 0),
            Paint::Blue => (0, 0, 255),
            Paint::Grey => (128, 128, 128),
            Paint::Red => (255, 0, 0),
            Paint::Green => (0, 128, 0),
            Paint::Pink => (255, 192, 203),
            Paint::Orange => (255, 165, 0),
            Paint::Brown => (165, 42, 42),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Stroke {
    pub(crate) color: Paint,
    pub(crate) opacity: f64,
    pub(crate) width: f64,
    /// Dash and gap length; `None` draws a solid stroke.
    pub(crate) dash: Option<f64>,
}

impl Stroke {
    pub(crate) fn solid(color: Paint, width: f64) -> Self {
        Self { color, opacity: 1.0, width, dash: None }
    }

    pub(crate) fn dashed(color: Paint, width: f64, dash: f64) -> Self {
        Self { dash: Some(dash), ..Self::solid(color, width) }
    }
}

pub(crate) trait Surface {
    /// Drawing area in scene units.
    fn size(&self) -> (f64, f64);

    fn group(&mut self, parent: Option<ShapeId>) -> ShapeId;
    fn circle(&mut self, parent: Option<ShapeId>, diameter: f64) -> ShapeId;
    fn line(&mut self, parent: Option<ShapeId>, from: Point, to: Point) -> ShapeId;
    fn text(&mut self, parent: Option<ShapeId>, content: &str) -> ShapeId;

    fn set_fill(&mut self, id: ShapeId, fill: Option<Paint>);
    fn set_stroke(&mut self, id: ShapeId, stroke: Stroke);
    fn set_visible(&mut self, id: ShapeId, visible: bool);

    /// Moves the shape so the centre of its bounds lands on `at`, in the
    /// parent's coordinates.
    fn move_center(&mut self, id: ShapeId, at: Point);
    fn center(&self, id: ShapeId) -> Point;

    /// Adds `degrees` to the shape's rotation about its own centre.
    fn rotate_by(&mut self, id: ShapeId, degrees: f64);
}
