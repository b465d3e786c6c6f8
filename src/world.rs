use crate::bodies::{period_frames, BodyId, BodySpec, BODIES};
use crate::surface::ShapeId;

#[derive(Clone, Debug)]
pub(crate) struct CelestialBody {
    pub(crate) spec: &'static BodySpec,
    /// Frames per revolution; zero for the sun.
    pub(crate) period: f64,
    pub(crate) distance: f64,
    pub(crate) symbol: &'static str,
    pub(crate) visual: Option<ShapeId>,
    pub(crate) orbit_guide: Option<ShapeId>,
}

/// Everything the driver reads and the scene builder wires up.
#[derive(Clone, Debug)]
pub(crate) struct WorldState {
    time_rate: f64,
    bodies: Vec<CelestialBody>,
    pub(crate) sky_ring: Option<ShapeId>,
}

impl WorldState {
    pub(crate) fn new(time_rate: f64) -> Self {
        let bodies = BODIES
            .iter()
            .map(|spec| CelestialBody {
                spec,
                period: period_frames(spec.period_days, time_rate),
                distance: spec.distance,
                symbol: spec.symbol,
                visual: None,
                orbit_guide: None,
            })
            .collect();
        Self { time_rate, bodies, sky_ring: None }
    }

    pub(crate) fn time_rate(&self) -> f64 {
        self.time_rate
    }

    pub(crate) fn body(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id.index()]
    }

    pub(crate) fn body_mut(&mut self, id: BodyId) -> &mut CelestialBody {
        &mut self.bodies[id.index()]
    }

    pub(crate) fn bodies(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_world_has_no_visuals() {
        let world = WorldState::new(240.0);
        assert_eq!(world.bodies().count(), 8);
        assert!(world.bodies().all(|b| b.visual.is_none() && b.orbit_guide.is_none()));
        assert!(world.sky_ring.is_none());
    }

    #[test]
    fn periods_follow_time_rate() {
        let world = WorldState::new(240.0);
        assert_eq!(world.body(BodyId::Earth).period, 2190.0);
        assert_eq!(world.body(BodyId::Sun).period, 0.0);
        assert_eq!(world.body(BodyId::Saturn).distance, 275.0);
        assert_eq!(world.body(BodyId::Moon).symbol, "☾");
        assert_eq!(world.time_rate(), 240.0);
    }
}
