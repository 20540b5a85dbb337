use glam::{Vec2, Vec3};
use ridgeline_core::config::GenerationConfig;
use ridgeline_core::constants::CHUNK_SPAN;

use crate::error::FlightError;
use crate::input::{InputState, Key};

/// Scripted flights. Each drives the same `InputState` a live viewer would
/// fill from window events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Fast flight straight ahead (-Z).
    Straight,
    /// Forward and sideways at once, crossing chunk corners.
    Diagonal,
    /// One full turn while flying forward.
    Circle,
    /// Straight flight with a terrain regeneration halfway.
    Regenerate,
    /// Forward while rising.
    Climb,
    /// Straight flight with a jump far outside the resident diamond halfway.
    Teleport,
}

/// Out-of-band changes a route makes at a given frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteEvent {
    None,
    /// Replace the generation parameters; every resident chunk is regenerated.
    Regenerate(GenerationConfig),
    /// Move the camera by a world-space offset.
    Teleport(Vec3),
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Straight,
        Route::Diagonal,
        Route::Circle,
        Route::Regenerate,
        Route::Climb,
        Route::Teleport,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Route::Straight => "straight",
            Route::Diagonal => "diagonal",
            Route::Circle => "circle",
            Route::Regenerate => "regenerate",
            Route::Climb => "climb",
            Route::Teleport => "teleport",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, FlightError> {
        Self::ALL
            .into_iter()
            .find(|route| route.name() == name)
            .ok_or_else(|| FlightError::UnknownRoute(name.to_string()))
    }

    /// Configuration a regenerating route switches to.
    pub fn regenerated_config() -> GenerationConfig {
        GenerationConfig {
            grid_size: 350,
            octaves: 8,
            lacunarity: 2.1,
            gain: 0.45,
        }
    }

    /// Offset applied by the teleport route: ten chunks along +X.
    pub fn teleport_offset() -> Vec3 {
        Vec3::new(10.0 * CHUNK_SPAN as f32, 0.0, 0.0)
    }

    /// Set the input for `frame` of a `total`-frame run.
    pub fn drive(
        &self,
        frame: u32,
        total: u32,
        sensitivity: f32,
        input: &mut InputState,
    ) -> RouteEvent {
        input.release_all();
        let halfway = frame == total / 2 && frame > 0;

        match self {
            Route::Straight => {
                input.press(Key::W);
                input.press(Key::T);
                RouteEvent::None
            }
            Route::Diagonal => {
                input.press(Key::W);
                input.press(Key::D);
                input.press(Key::T);
                RouteEvent::None
            }
            Route::Circle => {
                input.press(Key::W);
                input.press(Key::T);
                if sensitivity > 0.0 && total > 0 {
                    let pixels_per_frame = 360.0 / (sensitivity * total as f32);
                    input.move_mouse_by(Vec2::new(pixels_per_frame, 0.0));
                }
                RouteEvent::None
            }
            Route::Regenerate => {
                input.press(Key::W);
                if halfway {
                    RouteEvent::Regenerate(Self::regenerated_config())
                } else {
                    RouteEvent::None
                }
            }
            Route::Climb => {
                input.press(Key::W);
                input.press(Key::Space);
                RouteEvent::None
            }
            Route::Teleport => {
                input.press(Key::W);
                if halfway {
                    RouteEvent::Teleport(Self::teleport_offset())
                } else {
                    RouteEvent::None
                }
            }
        }
    }
}
