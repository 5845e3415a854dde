//! Input mapping from raw events to semantic actions
//!
//! Maps demo keys to high-level actions like ToggleWireframe, Exit, etc.
//! Pointer input over the gradient is NOT mapped here - it goes to the PointerRouter.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by demo keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Toggle wireframe rendering (W key)
    ToggleWireframe,
    /// Switch to the next palette (C key)
    NextPalette,
    /// Raise the animation speed (Up arrow)
    SpeedUp,
    /// Lower the animation speed (Down arrow)
    SpeedDown,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Exit application (Escape)
    Exit,
}

/// Maps raw keyboard events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for demo keys on press, `None` otherwise
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::KeyW => Some(InputAction::ToggleWireframe),
            KeyCode::KeyC => Some(InputAction::NextPalette),
            KeyCode::ArrowUp => Some(InputAction::SpeedUp),
            KeyCode::ArrowDown => Some(InputAction::SpeedDown),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::Escape => Some(InputAction::Exit),
            _ => None,
        }
    }
}

/// Step `speed` by `delta`, clamped to the tuned range
pub fn step_speed(speed: f32, delta: f32) -> f32 {
    let stepped = speed + delta;
    // Snap to the step grid so repeated presses don't accumulate float error
    let snapped = if delta != 0.0 {
        (stepped / delta.abs()).round() * delta.abs()
    } else {
        stepped
    };
    snapped.clamp(0.0, 0.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_keys() {
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyW, ElementState::Pressed),
            Some(InputAction::ToggleWireframe)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyC, ElementState::Pressed),
            Some(InputAction::NextPalette)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::ArrowUp, ElementState::Pressed),
            Some(InputAction::SpeedUp)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::ArrowDown, ElementState::Pressed),
            Some(InputAction::SpeedDown)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyF, ElementState::Pressed),
            Some(InputAction::ToggleFullscreen)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::Escape, ElementState::Pressed),
            Some(InputAction::Exit)
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let action = InputMapper::map_keyboard(KeyCode::Escape, ElementState::Released);
        assert_eq!(action, None);
    }

    #[test]
    fn test_other_keys_not_mapped() {
        for key in [KeyCode::KeyA, KeyCode::KeyS, KeyCode::Space] {
            let action = InputMapper::map_keyboard(key, ElementState::Pressed);
            assert_eq!(action, None, "Key {:?} should not be mapped", key);
        }
    }

    #[test]
    fn test_step_speed_clamped() {
        assert!((step_speed(0.01, 0.001) - 0.011).abs() < 1e-6);
        assert!((step_speed(0.01, -0.001) - 0.009).abs() < 1e-6);
        assert_eq!(step_speed(0.0, -0.001), 0.0);
        assert_eq!(step_speed(0.1, 0.001), 0.1);
    }
}
