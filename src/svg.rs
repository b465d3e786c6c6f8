//! SVG export of a retained scene, groups and transforms kept intact.

use crate::geometry::Point;
use crate::retained::{RetainedScene, Shape};
use crate::surface::{Paint, ShapeId, Stroke, Surface};
use anyhow::{Context, Result};
use std::{fmt::Write, fs, path::Path};

pub(crate) fn to_svg(scene: &RetainedScene) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_document(scene, &mut out);
    out
}

pub(crate) fn write_svg(path: &Path, scene: &RetainedScene) -> Result<()> {
    fs::write(path, to_svg(scene)).with_context(|| format!("writing {}", path.display()))
}

fn write_document<W: Write>(scene: &RetainedScene, out: &mut W) -> std::fmt::Result {
    let (w, h) = scene.size();
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    )?;
    writeln!(out, r#"  <rect width="{w}" height="{h}" fill="black"/>"#)?;
    for &id in scene.roots() {
        write_node(scene, id, 1, out)?;
    }
    writeln!(out, "</svg>")
}

fn write_node<W: Write>(scene: &RetainedScene, id: ShapeId, depth: usize, out: &mut W) -> std::fmt::Result {
    let node = scene.node(id);
    let pad = "  ".repeat(depth);
    let hidden = if node.visible { "" } else { r#" visibility="hidden""# };

    match &node.shape {
        Shape::Group { children } => {
            write!(out, "{pad}<g")?;
            write_transform(out, node.translate, node.rotation, scene.group_pivot(id))?;
            writeln!(out, "{hidden}>")?;
            for &c in children {
                write_node(scene, c, depth + 1, out)?;
            }
            writeln!(out, "{pad}</g>")
        }
        Shape::Circle { center, radius } => {
            write!(out, r#"{pad}<circle cx="{}" cy="{}" r="{radius}""#, center.x, center.y)?;
            write_paint(out, node.fill, node.stroke)?;
            writeln!(out, "{hidden}/>")
        }
        Shape::Line { from, to } => {
            write!(
                out,
                r#"{pad}<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                from.x, from.y, to.x, to.y
            )?;
            write_paint(out, None, node.stroke)?;
            writeln!(out, "{hidden}/>")
        }
        Shape::Text { at, content } => {
            write!(
                out,
                r#"{pad}<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle""#,
                at.x, at.y
            )?;
            write_paint(out, node.fill, node.stroke)?;
            writeln!(out, "{hidden}>{}</text>", escape(content))
        }
    }
}

fn write_transform<W: Write>(out: &mut W, translate: Point, rotation: f64, pivot: Point) -> std::fmt::Result {
    let moved = translate != Point::ZERO;
    let turned = rotation != 0.0;
    if !moved && !turned {
        return Ok(());
    }
    write!(out, r#" transform=""#)?;
    if moved {
        write!(out, "translate({} {})", translate.x, translate.y)?;
    }
    if turned {
        if moved {
            write!(out, " ")?;
        }
        write!(out, "rotate({rotation} {} {})", pivot.x, pivot.y)?;
    }
    write!(out, "\"")
}

fn write_paint<W: Write>(out: &mut W, fill: Option<Paint>, stroke: Option<Stroke>) -> std::fmt::Result {
    write!(out, r#" fill="{}""#, fill.map_or("none", Paint::css_name))?;
    if let Some(s) = stroke {
        write!(
            out,
            r#" stroke="{}" stroke-opacity="{}" stroke-width="{}""#,
            s.color.css_name(),
            s.opacity,
            s.width
        )?;
        if let Some(dash) = s.dash {
            write!(out, r#" stroke-dasharray="{dash}""#)?;
        }
    }
    Ok(())
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Driver;
    use crate::world::WorldState;

    fn running(frames: u64) -> Driver<RetainedScene> {
        let mut d = Driver::start(WorldState::new(240.0), RetainedScene::new(800.0, 800.0)).unwrap();
        for _ in 0..frames {
            d.tick();
        }
        d
    }

    #[test]
    fn snapshot_holds_every_visual() {
        let svg = to_svg(running(0).surface());
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        // 7 glyph markers + earth + 7 guides + sky rim
        assert_eq!(svg.matches("<circle").count(), 16);
        assert_eq!(svg.matches("<line").count(), 12);
        assert_eq!(svg.matches(r#"stroke-dasharray="4""#).count(), 7);
        for glyph in ["☉", "☿", "☾", "♃", "♄"] {
            assert!(svg.contains(glyph), "missing {glyph}");
        }
        assert!(svg.contains(r#"cx="400" cy="400" r="10" fill="blue""#));
    }

    #[test]
    fn sky_ring_is_exported_hidden_and_rotated() {
        let svg = to_svg(running(3).surface());
        assert_eq!(svg.matches(r#"visibility="hidden""#).count(), 1);
        assert!(svg.contains(r#"<g transform="rotate(180 400 400)" visibility="hidden">"#), "{svg}");
    }

    #[test]
    fn markers_are_translated_groups() {
        let svg = to_svg(running(1).surface());
        // frame 0: sun one earth distance east of earth
        assert!(svg.contains(r#"<g transform="translate(520 400)">"#), "{svg}");
    }

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
        assert_eq!(escape("☉"), "☉");
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sky.svg");
        write_svg(&path, running(5).surface()).unwrap();
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.contains("<svg "));
    }
}
