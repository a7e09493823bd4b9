//! Keyboard bindings.

use winit::keyboard::KeyCode;

use crate::camera::CameraView;
use crate::effects::EffectKind;
use crate::engine::Command;
use crate::modes::ModeKind;

/// Sensitivity change per Up/Down key press
pub const SENSITIVITY_STEP: f32 = 0.25;

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Command(Command),
    Quit,
}

/// Map a pressed key to an action; unbound keys yield `None`
pub fn key_action(key: KeyCode) -> Option<KeyAction> {
    let command = match key {
        KeyCode::Escape => return Some(KeyAction::Quit),

        KeyCode::Digit1 => Command::SwitchMode(ModeKind::Vortex),
        KeyCode::Digit2 => Command::SwitchMode(ModeKind::Terrain),
        KeyCode::Digit3 => Command::SwitchMode(ModeKind::Droplet),
        KeyCode::Tab => Command::NextMode,

        KeyCode::KeyF => Command::SetCameraState(CameraView::Front),
        KeyCode::KeyR => Command::SetCameraState(CameraView::Rear),
        KeyCode::KeyT => Command::SetCameraState(CameraView::Top),
        KeyCode::KeyM => Command::SetCameraState(CameraView::FollowMouse),
        KeyCode::KeyP => Command::SetCameraState(CameraView::AutoPan),

        KeyCode::KeyH => Command::ToggleEffect(EffectKind::Highlight),
        KeyCode::KeyE => Command::ToggleEffect(EffectKind::Expand),
        KeyCode::KeyV => Command::ToggleEffect(EffectKind::Revolve),
        KeyCode::KeyX => Command::ToggleEffect(EffectKind::Particle),
        KeyCode::KeyB => Command::ToggleEffect(EffectKind::Blur),
        KeyCode::KeyI => Command::ToggleEffect(EffectKind::Invert),

        KeyCode::ArrowUp => Command::AdjustSensitivity(SENSITIVITY_STEP),
        KeyCode::ArrowDown => Command::AdjustSensitivity(-SENSITIVITY_STEP),

        _ => return None,
    };
    Some(KeyAction::Command(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(key_action(KeyCode::Escape), Some(KeyAction::Quit));
        assert_eq!(
            key_action(KeyCode::Digit2),
            Some(KeyAction::Command(Command::SwitchMode(ModeKind::Terrain)))
        );
        assert_eq!(
            key_action(KeyCode::KeyP),
            Some(KeyAction::Command(Command::SetCameraState(CameraView::AutoPan)))
        );
        assert_eq!(
            key_action(KeyCode::KeyX),
            Some(KeyAction::Command(Command::ToggleEffect(EffectKind::Particle)))
        );
        assert_eq!(key_action(KeyCode::KeyQ), None);
    }
}
