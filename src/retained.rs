//! In-memory retained vector scene: the `Surface` every host draws from.

use crate::geometry::Point;
use crate::surface::{Paint, ShapeId, Stroke, Surface};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Shape {
    Group { children: Vec<ShapeId> },
    Circle { center: Point, radius: f64 },
    Line { from: Point, to: Point },
    Text { at: Point, content: String },
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) parent: Option<ShapeId>,
    pub(crate) shape: Shape,
    pub(crate) fill: Option<Paint>,
    pub(crate) stroke: Option<Stroke>,
    pub(crate) visible: bool,
    // groups only
    pub(crate) translate: Point,
    pub(crate) rotation: f64,
}

impl Node {
    fn new(parent: Option<ShapeId>, shape: Shape) -> Self {
        let fill = match shape {
            Shape::Circle { .. } | Shape::Text { .. } => Some(Paint::Black),
            _ => None,
        };
        Self {
            parent,
            shape,
            fill,
            stroke: None,
            visible: true,
            translate: Point::ZERO,
            rotation: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) min: Point,
    pub(crate) max: Point,
}

impl Bounds {
    fn at(p: Point) -> Self {
        Self { min: p, max: p }
    }

    fn union(self, o: Bounds) -> Bounds {
        Bounds {
            min: Point::new(self.min.x.min(o.min.x), self.min.y.min(o.min.y)),
            max: Point::new(self.max.x.max(o.max.x), self.max.y.max(o.max.y)),
        }
    }

    fn include(self, p: Point) -> Bounds {
        self.union(Bounds::at(p))
    }

    pub(crate) fn center(self) -> Point {
        Point::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }

    fn corners(self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}

/// World-space primitive, flattened out of the group tree.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DrawItem<'a> {
    Circle { center: Point, radius: f64, fill: Option<Paint>, stroke: Option<Stroke> },
    Line { from: Point, to: Point, stroke: Option<Stroke> },
    Text { at: Point, content: &'a str, fill: Option<Paint> },
}

#[derive(Clone, Copy)]
struct Frame {
    pivot: Point,
    rotation: f64,
    translate: Point,
}

fn to_world(frames: &[Frame], p: Point) -> Point {
    frames
        .iter()
        .rev()
        .fold(p, |p, f| p.rotate_about(f.pivot, f.rotation) + f.translate)
}

pub(crate) struct RetainedScene {
    width: f64,
    height: f64,
    nodes: Vec<Node>,
    roots: Vec<ShapeId>,
}

impl RetainedScene {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self { width, height, nodes: Vec::new(), roots: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, id: ShapeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn roots(&self) -> &[ShapeId] {
        &self.roots
    }

    #[cfg(test)]
    pub(crate) fn rotation(&self, id: ShapeId) -> f64 {
        self.node(id).rotation
    }

    /// Whether the shape and every group above it are visible.
    pub(crate) fn is_visible(&self, id: ShapeId) -> bool {
        let node = self.node(id);
        node.visible && node.parent.map_or(true, |p| self.is_visible(p))
    }

    fn push(&mut self, parent: Option<ShapeId>, shape: Shape) -> ShapeId {
        let id = ShapeId(self.nodes.len());
        self.nodes.push(Node::new(parent, shape));
        match parent {
            Some(p) => {
                if let Shape::Group { children } = &mut self.nodes[p.0].shape {
                    children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Bounds of a group's children in the group's own (untransformed) space.
    fn content_bounds(&self, children: &[ShapeId]) -> Option<Bounds> {
        children
            .iter()
            .filter_map(|c| self.bounds_in_parent(*c))
            .reduce(Bounds::union)
    }

    pub(crate) fn bounds_in_parent(&self, id: ShapeId) -> Option<Bounds> {
        let node = self.node(id);
        match &node.shape {
            Shape::Circle { center, radius } => {
                let r = Point::new(*radius, *radius);
                Some(Bounds { min: *center - r, max: *center + r })
            }
            Shape::Line { from, to } => Some(Bounds::at(*from).include(*to)),
            Shape::Text { at, .. } => Some(Bounds::at(*at)),
            Shape::Group { children } => {
                let local = self.content_bounds(children)?;
                let pivot = local.center();
                let mut corners = local
                    .corners()
                    .into_iter()
                    .map(|p| p.rotate_about(pivot, node.rotation) + node.translate);
                let first = Bounds::at(corners.next()?);
                Some(corners.fold(first, Bounds::include))
            }
        }
    }

    /// Centre of a group's content, the point its rotation turns about.
    pub(crate) fn group_pivot(&self, id: ShapeId) -> Point {
        match &self.node(id).shape {
            Shape::Group { children } => self
                .content_bounds(children)
                .map(Bounds::center)
                .unwrap_or(Point::ZERO),
            _ => Point::ZERO,
        }
    }

    /// Visible primitives in world space, in paint order.
    pub(crate) fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let mut out = Vec::new();
        let mut frames = Vec::new();
        for &id in &self.roots {
            self.flatten(id, &mut frames, &mut out);
        }
        out
    }

    fn flatten<'a>(&'a self, id: ShapeId, frames: &mut Vec<Frame>, out: &mut Vec<DrawItem<'a>>) {
        let node = self.node(id);
        if !node.visible {
            return;
        }
        match &node.shape {
            Shape::Group { children } => {
                frames.push(Frame {
                    pivot: self.group_pivot(id),
                    rotation: node.rotation,
                    translate: node.translate,
                });
                for &c in children {
                    self.flatten(c, frames, out);
                }
                frames.pop();
            }
            Shape::Circle { center, radius } => out.push(DrawItem::Circle {
                center: to_world(frames, *center),
                radius: *radius,
                fill: node.fill,
                stroke: node.stroke,
            }),
            Shape::Line { from, to } => out.push(DrawItem::Line {
                from: to_world(frames, *from),
                to: to_world(frames, *to),
                stroke: node.stroke,
            }),
            Shape::Text { at, content } => out.push(DrawItem::Text {
                at: to_world(frames, *at),
                content,
                fill: node.fill,
            }),
        }
    }
}

impl Surface for RetainedScene {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn group(&mut self, parent: Option<ShapeId>) -> ShapeId {
        self.push(parent, Shape::Group { children: Vec::new() })
    }

    fn circle(&mut self, parent: Option<ShapeId>, diameter: f64) -> ShapeId {
        self.push(parent, Shape::Circle { center: Point::ZERO, radius: diameter * 0.5 })
    }

    fn line(&mut self, parent: Option<ShapeId>, from: Point, to: Point) -> ShapeId {
        self.push(parent, Shape::Line { from, to })
    }

    fn text(&mut self, parent: Option<ShapeId>, content: &str) -> ShapeId {
        self.push(parent, Shape::Text { at: Point::ZERO, content: content.to_string() })
    }

    fn set_fill(&mut self, id: ShapeId, fill: Option<Paint>) {
        self.nodes[id.0].fill = fill;
    }

    fn set_stroke(&mut self, id: ShapeId, stroke: Stroke) {
        self.nodes[id.0].stroke = Some(stroke);
    }

    fn set_visible(&mut self, id: ShapeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    fn move_center(&mut self, id: ShapeId, at: Point) {
        let pivot = self.group_pivot(id);
        let node = &mut self.nodes[id.0];
        match &mut node.shape {
            Shape::Circle { center, .. } => *center = at,
            Shape::Text { at: pos, .. } => *pos = at,
            Shape::Line { from, to } => {
                let mid = Point::new((from.x + to.x) * 0.5, (from.y + to.y) * 0.5);
                let d = at - mid;
                *from = *from + d;
                *to = *to + d;
            }
            // rotation is about the pivot, so only the translation moves the centre
            Shape::Group { .. } => node.translate = at - pivot,
        }
    }

    fn center(&self, id: ShapeId) -> Point {
        let node = self.node(id);
        match &node.shape {
            Shape::Circle { center, .. } => *center,
            Shape::Text { at, .. } => *at,
            Shape::Line { from, to } => Point::new((from.x + to.x) * 0.5, (from.y + to.y) * 0.5),
            Shape::Group { .. } => self.group_pivot(id) + node.translate,
        }
    }

    fn rotate_by(&mut self, id: ShapeId, degrees: f64) {
        let node = &mut self.nodes[id.0];
        match &mut node.shape {
            Shape::Group { .. } => node.rotation += degrees,
            Shape::Line { from, to } => {
                let mid = Point::new((from.x + to.x) * 0.5, (from.y + to.y) * 0.5);
                *from = from.rotate_about(mid, degrees);
                *to = to.rotate_about(mid, degrees);
            }
            // symmetric about their own centre
            Shape::Circle { .. } | Shape::Text { .. } => {}
        }
    }
}
