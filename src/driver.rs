use crate::bodies::{sky_step_degrees, BodyId, ORBITS, ROOT};
use crate::geometry::orbital_offset;
use crate::scene::build_scene;
use crate::surface::{ShapeId, Surface};
use crate::world::WorldState;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum SceneError {
    #[error("{0} has no marker")]
    MissingVisual(BodyId),
    #[error("{0} has no orbit guide")]
    MissingOrbitGuide(BodyId),
    #[error("sky ring was never built")]
    MissingSkyRing,
}

#[derive(Clone, Copy, Debug)]
struct Wiring {
    body: ShapeId,
    center: ShapeId,
    guide: ShapeId,
    distance: f64,
    period: f64,
}

/// Owns the world and its surface and advances both one frame at a time.
///
/// Scheduling is the caller's business: call [`Driver::tick`] on whatever
/// cadence the host wants.
pub(crate) struct Driver<S: Surface> {
    world: WorldState,
    surface: S,
    wiring: Vec<Wiring>,
    sky_ring: ShapeId,
    sky_step: f64,
    frame: u64,
}

impl<S: Surface> Driver<S> {
    /// Builds the scene on `surface` and starts running.
    pub(crate) fn start(mut world: WorldState, mut surface: S) -> Result<Self, SceneError> {
        build_scene(&mut world, &mut surface);
        Self::resume(world, surface)
    }

    /// Takes over a world whose visuals were already built on `surface`.
    pub(crate) fn resume(world: WorldState, surface: S) -> Result<Self, SceneError> {
        let visual = |id: BodyId| world.body(id).visual.ok_or(SceneError::MissingVisual(id));
        visual(ROOT)?;

        let wiring = ORBITS
            .iter()
            .map(|o| -> Result<Wiring, SceneError> {
                let motion = world.body(o.driven_by);
                Ok(Wiring {
                    body: visual(o.body)?,
                    center: visual(o.center)?,
                    guide: world
                        .body(o.body)
                        .orbit_guide
                        .ok_or(SceneError::MissingOrbitGuide(o.body))?,
                    distance: motion.distance,
                    period: motion.period,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let sky_ring = world.sky_ring.ok_or(SceneError::MissingSkyRing)?;
        let sky_step = sky_step_degrees(world.time_rate());

        debug!(orbits = wiring.len(), sky_step, "driver running");
        Ok(Self { world, surface, wiring, sky_ring, sky_step, frame: 0 })
    }

    /// One frame: place every body around its (already placed) centre, spin
    /// the sky, advance the counter.
    pub(crate) fn tick(&mut self) {
        let f = self.frame as f64;
        for w in &self.wiring {
            let center = self.surface.center(w.center);
            let at = center + orbital_offset(w.distance, w.period, f);
            self.surface.move_center(w.body, at);
            self.surface.move_center(w.guide, center);
        }
        self.surface.rotate_by(self.sky_ring, self.sky_step);
        trace!(frame = self.frame, "tick");
        self.frame += 1;
    }

    pub(crate) fn frame(&self) -> u64 {
        self.frame
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &WorldState {
        &self.world
    }

    pub(crate) fn surface(&self) -> &S {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub(crate) fn sky_ring(&self) -> ShapeId {
        self.sky_ring
    }

    #[cfg(test)]
    pub(crate) fn sky_step_degrees(&self) -> f64 {
        self.sky_step
    }

    /// Total sky rotation so far; never wrapped.
    pub(crate) fn sky_rotation_degrees(&self) -> f64 {
        self.frame as f64 * self.sky_step
    }

    /// Simulated days elapsed since the first frame.
    pub(crate) fn elapsed_days(&self) -> f64 {
        self.frame as f64 * self.world.time_rate() / (24.0 * 60.0)
    }
}
