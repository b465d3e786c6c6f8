//! Body table and the orbits relation.
//!
//! Periods are stored in days and only become frame counts once a time rate
//! is known (see [`period_frames`]).

use crate::surface::Paint;

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum BodyId {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
}

impl BodyId {
    #[cfg(test)]
    pub(crate) const ALL: [BodyId; 8] = [
        BodyId::Sun,
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Earth,
        BodyId::Moon,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn spec(self) -> &'static BodySpec {
        &BODIES[self.index()]
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().name)
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct BodySpec {
    pub(crate) id: BodyId,
    pub(crate) name: &'static str,
    pub(crate) period_days: f64,
    /// Orbit radius in scene units.
    pub(crate) distance: f64,
    pub(crate) symbol: &'static str,
    pub(crate) color: Paint,
    pub(crate) label: Option<Paint>,
}

impl BodySpec {
    pub(crate) fn label_color(&self) -> Paint {
        self.label.unwrap_or(Paint::White)
    }
}

// Indexed by `BodyId as usize`.
pub(crate) static BODIES: [BodySpec; 8] = [
    BodySpec {
        id: BodyId::Sun,
        name: "Sun",
        period_days: 0.0,
        distance: 120.0,
        symbol: "☉",
        color: Paint::Yellow,
        label: Some(Paint::Black),
    },
    BodySpec {
        id: BodyId::Mercury,
        name: "Mercury",
        period_days: 88.0,
        distance: 30.0,
        symbol: "☿",
        color: Paint::Green,
        label: None,
    },
    BodySpec {
        id: BodyId::Venus,
        name: "Venus",
        period_days: 224.7,
        distance: 60.0,
        symbol: "♀\u{FE0E}",
        color: Paint::Pink,
        label: Some(Paint::Black),
    },
    BodySpec {
        id: BodyId::Earth,
        name: "Earth",
        period_days: 365.0,
        distance: 120.0,
        symbol: "♁",
        color: Paint::Blue,
        label: None,
    },
    BodySpec {
        id: BodyId::Moon,
        name: "Moon",
        period_days: 27.3,
        distance: 35.0,
        symbol: "☾",
        color: Paint::Grey,
        label: Some(Paint::White),
    },
    BodySpec {
        id: BodyId::Mars,
        name: "Mars",
        period_days: 687.0,
        distance: 190.0,
        symbol: "♂\u{FE0E}",
        color: Paint::Red,
        label: None,
    },
    BodySpec {
        id: BodyId::Jupiter,
        name: "Jupiter",
        period_days: 4331.0,
        distance: 235.0,
        symbol: "♃",
        color: Paint::Orange,
        label: None,
    },
    BodySpec {
        id: BodyId::Saturn,
        name: "Saturn",
        period_days: 10747.0,
        distance: 275.0,
        symbol: "♄",
        color: Paint::Brown,
        label: None,
    },
];

/// Earth sits still at the canvas centre; everything else hangs off it.
pub(crate) const ROOT: BodyId = BodyId::Earth;

/// `body` is drawn circling `center`, moving with `driven_by`'s period and distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Orbit {
    pub(crate) body: BodyId,
    pub(crate) center: BodyId,
    pub(crate) driven_by: BodyId,
}

const fn orbit(body: BodyId, center: BodyId) -> Orbit {
    Orbit { body, center, driven_by: body }
}

/// Topological order: every centre is the root or an earlier body.
///
/// The sun's entry is Earth's own orbit seen from Earth, so the sun swings
/// around a fixed Earth with Earth's period and distance.
pub(crate) const ORBITS: [Orbit; 7] = [
    Orbit { body: BodyId::Sun, center: BodyId::Earth, driven_by: BodyId::Earth },
    orbit(BodyId::Moon, BodyId::Earth),
    orbit(BodyId::Mars, BodyId::Sun),
    orbit(BodyId::Mercury, BodyId::Sun),
    orbit(BodyId::Venus, BodyId::Sun),
    orbit(BodyId::Jupiter, BodyId::Sun),
    orbit(BodyId::Saturn, BodyId::Sun),
];

/// Frames per revolution for a real period in days, given simulated minutes per frame.
pub(crate) fn period_frames(period_days: f64, time_rate: f64) -> f64 {
    period_days * MINUTES_PER_DAY / time_rate
}

/// Sky rotation per frame in degrees: 15° per simulated hour.
pub(crate) fn sky_step_degrees(time_rate: f64) -> f64 {
    time_rate * 15.0 / 60.0
}
