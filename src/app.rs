use crate::config::Settings;
use crate::driver::Driver;
use crate::input::{collect_input_nonblocking, map_event_to_action, Action};
use crate::render::{canvas_to_cells, draw_glyphs, draw_text, rasterize, Pixel, Terminal, Viewport};
use crate::retained::RetainedScene;
use crate::surface::Surface;
use crate::svg::write_svg;
use crate::world::WorldState;
use crossterm::style::Color;
use tracing::{debug, info};

pub(crate) fn run(settings: &Settings) -> anyhow::Result<()> {
    let world = WorldState::new(settings.time_rate);
    for body in world.bodies() {
        debug!(body = %body.spec.id, period_frames = body.period, distance = body.distance, "body");
    }
    let surface = RetainedScene::new(settings.canvas_w, settings.canvas_h);

    if let Some(path) = &settings.svg {
        let mut driver = start(world, surface, settings)?;
        for _ in 0..settings.frames {
            driver.tick();
        }
        write_svg(path, driver.surface())?;
        info!(path = %path.display(), frame = driver.frame(), "snapshot written");
        return Ok(());
    }

    let mut term = Terminal::begin()?;
    let result = animate(&mut term, world, surface, settings);
    // restore the terminal even when the loop failed
    let restored = term.end();
    finish(result, restored)
}

/// The loop's own error wins; a failed restore is attached to it.
fn finish(result: anyhow::Result<()>, restored: anyhow::Result<()>) -> anyhow::Result<()> {
    match (result, restored) {
        (Err(e), Err(end)) => Err(e.context(format!("terminal restore also failed: {end:#}"))),
        (Err(e), Ok(())) => Err(e),
        (Ok(()), restored) => restored,
    }
}

/// The scene is built once, right before the first frame.
fn start(world: WorldState, surface: RetainedScene, settings: &Settings) -> anyhow::Result<Driver<RetainedScene>> {
    let mut driver = Driver::start(world, surface)?;
    let ring = driver.sky_ring();
    driver.surface_mut().set_visible(ring, settings.show_sky);
    info!(shapes = driver.surface().len(), sky = settings.show_sky, "scene ready");
    Ok(driver)
}

fn animate(
    term: &mut Terminal,
    world: WorldState,
    surface: RetainedScene,
    settings: &Settings,
) -> anyhow::Result<()> {
    let mut driver = start(world, surface, settings)?;
    let delay = settings.tick_delay();

    loop {
        if term.resize_if_needed()? {
            debug!(cols = term.cols, rows = term.rows, "resized");
        }

        for ev in collect_input_nonblocking(delay)? {
            match map_event_to_action(&ev) {
                Some(Action::Quit) => {
                    info!(frame = driver.frame(), "quit");
                    return Ok(());
                }
                Some(Action::ToggleSky) => {
                    let ring = driver.sky_ring();
                    let shown = !driver.surface().is_visible(ring);
                    driver.surface_mut().set_visible(ring, shown);
                    debug!(shown, "sky ring toggled");
                }
                None => {}
            }
        }

        driver.tick();
        render_frame(term, &driver)?;

        // fixed delay after each frame, not a fixed rate
        std::thread::sleep(delay);
    }
}

fn render_frame(term: &mut Terminal, driver: &Driver<RetainedScene>) -> anyhow::Result<()> {
    let bg = Color::Black;
    term.cur.clear(bg);
    term.canvas.clear(Pixel::default());

    let scene = driver.surface();
    let (w, h) = scene.size();
    let vp = Viewport::fit(w, h, term.canvas.w, term.canvas.h);
    let glyphs = rasterize(&scene.draw_list(), vp, &mut term.canvas);
    canvas_to_cells(&term.canvas, &mut term.cur, bg);
    draw_glyphs(&mut term.cur, &glyphs, bg);

    let status = format!(
        " frame {}  day {:.1}  sky {:.0}°  [c] constellations  [q] quit",
        driver.frame(),
        driver.elapsed_days(),
        driver.sky_rotation_degrees() % 360.0,
    );
    let row = term.rows.saturating_sub(1);
    draw_text(&mut term.cur, 0, row, &status, Color::Grey, bg);

    term.present(true)
}
