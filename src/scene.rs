//! One-shot construction of every visual, wired back into the world state.

use crate::bodies::{BodyId, ORBITS, ROOT};
use crate::geometry::{interpolate_point, Point};
use crate::surface::{Paint, ShapeId, Stroke, Surface};
use crate::world::WorldState;
use std::f64::consts::PI;
use tracing::{debug, warn};

pub(crate) const MARKER_DIAMETER: f64 = 20.0;
pub(crate) const SKY_RADIUS: f64 = 375.0;
pub(crate) const SKY_TICKS: usize = 12;
/// How far each sky tick reaches from the rim towards the centre.
pub(crate) const SKY_TICK_INSET: f64 = 0.1;
const SKY_STROKE_WIDTH: f64 = 3.0;
const GUIDE_DASH: f64 = 4.0;
const GUIDE_STROKE_WIDTH: f64 = 1.0;

/// Paint order of the markers.
const MARKER_ORDER: [BodyId; 8] = [
    BodyId::Sun,
    BodyId::Earth,
    BodyId::Moon,
    BodyId::Mars,
    BodyId::Mercury,
    BodyId::Venus,
    BodyId::Jupiter,
    BodyId::Saturn,
];

pub(crate) fn build_scene<S: Surface>(world: &mut WorldState, surface: &mut S) {
    let (w, h) = surface.size();
    let origin = Point::new(w * 0.5, h * 0.5);

    for id in MARKER_ORDER {
        let visual = if id == ROOT {
            root_marker(world, surface, origin)
        } else {
            body_marker(world, surface, id)
        };
        world.body_mut(id).visual = Some(visual);
    }

    for o in ORBITS {
        let Some(anchor) = world.body(o.center).visual else {
            warn!(body = %o.body, center = %o.center, "centre has no marker; orbit guide skipped");
            continue;
        };
        let diameter = 2.0 * world.body(o.body).distance;
        let guide = surface.circle(None, diameter);
        surface.set_fill(guide, None);
        surface.set_stroke(guide, Stroke::dashed(Paint::White, GUIDE_STROKE_WIDTH, GUIDE_DASH));
        let at = surface.center(anchor);
        surface.move_center(guide, at);
        world.body_mut(o.body).orbit_guide = Some(guide);
    }

    let earth_at = match world.body(ROOT).visual {
        Some(earth) => surface.center(earth),
        None => origin,
    };
    let ring = sky_ring(surface, earth_at, SKY_RADIUS);
    surface.set_visible(ring, false);
    world.sky_ring = Some(ring);

    debug!(canvas_w = w, canvas_h = h, "scene built");
}

/// Earth is a bare disc pinned at the canvas centre; it carries no glyph.
fn root_marker<S: Surface>(world: &WorldState, surface: &mut S, at: Point) -> ShapeId {
    let disc = surface.circle(None, MARKER_DIAMETER);
    surface.move_center(disc, at);
    surface.set_fill(disc, Some(world.body(ROOT).spec.color));
    disc
}

fn body_marker<S: Surface>(world: &WorldState, surface: &mut S, id: BodyId) -> ShapeId {
    let body = world.body(id);
    let group = surface.group(None);
    let disc = surface.circle(Some(group), MARKER_DIAMETER);
    surface.set_fill(disc, Some(body.spec.color));
    let glyph = surface.text(Some(group), body.symbol);
    surface.set_fill(glyph, Some(body.spec.label_color()));
    let at = surface.center(disc);
    surface.move_center(glyph, at);
    group
}

fn sky_ring<S: Surface>(surface: &mut S, center: Point, radius: f64) -> ShapeId {
    let stroke = Stroke::solid(Paint::White, SKY_STROKE_WIDTH);
    let group = surface.group(None);

    let rim = surface.circle(Some(group), 2.0 * radius);
    surface.move_center(rim, center);
    surface.set_fill(rim, None);
    surface.set_stroke(rim, stroke);

    for i in 0..SKY_TICKS {
        let theta = 2.0 * PI * i as f64 / SKY_TICKS as f64;
        debug!(tick = i, theta, "sky ring tick");
        let edge = Point::new(radius * theta.cos() + center.x, radius * theta.sin() + center.y);
        let (x, y) = interpolate_point(edge.x, edge.y, center.x, center.y, SKY_TICK_INSET);
        let mark = surface.line(Some(group), edge, Point::new(x, y));
        surface.set_stroke(mark, stroke);
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::approx_eq;
    use crate::retained::{RetainedScene, Shape};

    fn built() -> (WorldState, RetainedScene) {
        let mut world = WorldState::new(240.0);
        let mut scene = RetainedScene::new(800.0, 800.0);
        build_scene(&mut world, &mut scene);
        (world, scene)
    }

    #[test]
    fn every_orbiting_body_is_wired() {
        let (world, _) = built();
        for o in ORBITS {
            let body = world.body(o.body);
            assert!(body.visual.is_some(), "{} has no marker", o.body);
            assert!(body.orbit_guide.is_some(), "{} has no guide", o.body);
        }
        assert!(world.body(ROOT).visual.is_some());
        assert!(world.body(ROOT).orbit_guide.is_none());
    }

    #[test]
    fn earth_sits_at_canvas_center() {
        let (world, scene) = built();
        let earth = world.body(BodyId::Earth).visual.unwrap();
        assert_eq!(scene.center(earth), Point::new(400.0, 400.0));
        match &scene.node(earth).shape {
            Shape::Circle { radius, .. } => assert_eq!(*radius, 10.0),
            other => panic!("earth should be a bare circle, got {other:?}"),
        }
        assert_eq!(scene.node(earth).fill, Some(Paint::Blue));
    }

    #[test]
    fn markers_carry_symbol_and_colors() {
        let (world, scene) = built();
        let venus = world.body(BodyId::Venus).visual.unwrap();
        let Shape::Group { children } = &scene.node(venus).shape else {
            panic!("venus marker should be a group");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(scene.node(children[0]).fill, Some(Paint::Pink));
        let glyph = scene.node(children[1]);
        assert_eq!(glyph.fill, Some(Paint::Black));
        match &glyph.shape {
            Shape::Text { content, at } => {
                assert_eq!(content, "♀\u{FE0E}");
                assert_eq!(*at, scene.center(children[0]));
            }
            other => panic!("expected glyph, got {other:?}"),
        }

        let jupiter = world.body(BodyId::Jupiter).visual.unwrap();
        let Shape::Group { children } = &scene.node(jupiter).shape else {
            panic!("jupiter marker should be a group");
        };
        assert_eq!(scene.node(children[1]).fill, Some(Paint::White));
    }

    #[test]
    fn guides_are_dashed_and_sized_by_distance() {
        let (world, scene) = built();
        for o in ORBITS {
            let guide = world.body(o.body).orbit_guide.unwrap();
            let node = scene.node(guide);
            match &node.shape {
                Shape::Circle { radius, .. } => {
                    assert_eq!(*radius, world.body(o.body).distance);
                }
                other => panic!("guide should be a circle, got {other:?}"),
            }
            assert_eq!(node.fill, None);
            let stroke = node.stroke.unwrap();
            assert_eq!(stroke.dash, Some(4.0));
            assert_eq!(stroke.color, Paint::White);
            let anchor = world.body(o.center).visual.unwrap();
            assert_eq!(scene.center(guide), scene.center(anchor), "{}", o.body);
        }
    }

    #[test]
    fn sky_ring_is_hidden_and_has_twelve_inward_ticks() {
        let (world, scene) = built();
        let ring = world.sky_ring.unwrap();
        assert!(!scene.is_visible(ring));

        let Shape::Group { children } = &scene.node(ring).shape else {
            panic!("ring should be a group");
        };
        assert_eq!(children.len(), 1 + SKY_TICKS);
        let center = Point::new(400.0, 400.0);
        assert_eq!(scene.center(ring), center);

        for &tick in &children[1..] {
            let Shape::Line { from, to } = scene.node(tick).shape else {
                panic!("tick should be a line");
            };
            assert!(approx_eq(from.distance_to(center), SKY_RADIUS));
            assert!(approx_eq(to.distance_to(center), SKY_RADIUS * (1.0 - SKY_TICK_INSET)));
        }
    }
}
