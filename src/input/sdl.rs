//! SDL2 game-controller backend
//!
//! Hints are applied for the duration of one enumeration and restored when
//! the scope ends; the SDL context is dropped (SDL_Quit) before that, on every
//! return path.

use std::ffi::CStr;
use std::os::raw::c_int;
use tracing::{debug, warn};

use sdl2::controller::GameController;
use sdl2::{hint, GameControllerSubsystem, JoystickSubsystem};

use super::enumerate::{ControllerEnumerator, EnumerationConfig, RawGamepad};
use super::error::EnumerationError;

/// Enumerator backed by the system SDL2 library
#[derive(Debug, Default, Clone, Copy)]
pub struct SdlEnumerator;

impl ControllerEnumerator for SdlEnumerator {
    fn name(&self) -> &str {
        "sdl2"
    }

    fn enumerate_raw(&self, config: &EnumerationConfig) -> Result<Vec<RawGamepad>, EnumerationError> {
        let _hints = HintScope::apply(&config.hints);

        let sdl = sdl2::init().map_err(EnumerationError::Init)?;
        let controllers = sdl.game_controller().map_err(EnumerationError::Init)?;
        let joysticks = sdl.joystick().map_err(EnumerationError::Init)?;
        let count = controllers.num_joysticks().map_err(EnumerationError::Init)?;
        debug!("SDL reports {} joystick(s)", count);

        let mut pads = Vec::new();
        for index in 0..count {
            if !controllers.is_game_controller(index) {
                debug!("Joystick {} is not a game controller", index);
                continue;
            }
            match read_slot(&controllers, &joysticks, index) {
                Ok(pad) => pads.push(pad),
                Err(e) => warn!("Skipping {}", e),
            }
        }

        Ok(pads)
    }
}

fn read_slot(
    controllers: &GameControllerSubsystem,
    joysticks: &JoystickSubsystem,
    index: u32,
) -> Result<RawGamepad, EnumerationError> {
    let slot_error = |reason: String| EnumerationError::Slot { index, reason };

    let pad: GameController = controllers.open(index).map_err(|e| slot_error(e.to_string()))?;
    let guid = joysticks
        .device_guid(index)
        .map_err(|e| slot_error(e.to_string()))?
        .string();
    let path = joystick_path(index).ok_or_else(|| slot_error("no device path".to_string()))?;

    Ok(RawGamepad {
        index,
        path,
        guid,
        mapping: pad.mapping(),
    })
}

fn joystick_path(index: u32) -> Option<String> {
    // SAFETY: SDL owns the returned string; it is copied before the next SDL call.
    unsafe {
        let ptr = sdl2::sys::SDL_JoystickPathForIndex(index as c_int);
        if ptr.is_null() {
            None
        } else {
            Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
        }
    }
}

/// Sets hints on creation and puts the previous values back on drop.
struct HintScope {
    previous: Vec<(String, Option<String>)>,
}

impl HintScope {
    fn apply(hints: &[(String, String)]) -> Self {
        let mut previous = Vec::with_capacity(hints.len());
        for (name, value) in hints {
            previous.push((name.clone(), hint::get(name)));
            if !hint::set(name, value) {
                warn!("SDL rejected hint {}={}", name, value);
            }
        }
        Self { previous }
    }
}

impl Drop for HintScope {
    fn drop(&mut self) {
        for (name, value) in self.previous.iter().rev() {
            // An empty value makes SDL fall back to the hint's default
            hint::set(name, value.as_deref().unwrap_or(""));
        }
    }
}
