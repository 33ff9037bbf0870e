//! Keyboard and mouse state for the windowed app.
//!
//! [`Input`] tracks instantaneous events (key just pressed) and continuous
//! state (key held down) from raw winit events. The app turns pressed keys
//! into [`Command`]s and held keys into a pan direction, then calls the
//! controller; nothing in here touches the canvas directly.
//!
//! | Key | Command |
//! |---|---|
//! | `1`..`6` | create nebula, galaxy, black hole, star cluster, pulsar, quasar under the pointer |
//! | arrows / WASD (held) | pan |
//! | `+` / `-` | zoom in / out |
//! | `H` | recenter |
//! | `E` / `R` / `T` | cycle size / density / hue of the selection |
//! | `` ` `` | delete the selection |
//! | `Esc` | restart |
//! | `Ctrl+S` | export |
//! | `I` | toggle the info overlay |

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::controller::Mutation;
use crate::object::ObjectKind;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Left,
        }
    }
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Key1, Key2, Key3, Key4, Key5, Key6,
    W, A, S, D,
    E, R, T, H, I,
    Up, Down, Left, Right,
    Plus, Minus,
    Backquote,
    Escape,
    Control,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Digit1 => KeyCode::Key1,
            WinitKeyCode::Digit2 => KeyCode::Key2,
            WinitKeyCode::Digit3 => KeyCode::Key3,
            WinitKeyCode::Digit4 => KeyCode::Key4,
            WinitKeyCode::Digit5 => KeyCode::Key5,
            WinitKeyCode::Digit6 => KeyCode::Key6,

            WinitKeyCode::KeyW => KeyCode::W,
            WinitKeyCode::KeyA => KeyCode::A,
            WinitKeyCode::KeyS => KeyCode::S,
            WinitKeyCode::KeyD => KeyCode::D,
            WinitKeyCode::KeyE => KeyCode::E,
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::KeyT => KeyCode::T,
            WinitKeyCode::KeyH => KeyCode::H,
            WinitKeyCode::KeyI => KeyCode::I,

            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowRight => KeyCode::Right,

            WinitKeyCode::Equal | WinitKeyCode::NumpadAdd => KeyCode::Plus,
            WinitKeyCode::Minus | WinitKeyCode::NumpadSubtract => KeyCode::Minus,
            WinitKeyCode::Backquote => KeyCode::Backquote,
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::ControlLeft
            | WinitKeyCode::ControlRight
            | WinitKeyCode::SuperLeft
            | WinitKeyCode::SuperRight => KeyCode::Control,

            _ => KeyCode::Other(key as u32),
        }
    }
}

/// A discrete action triggered by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Create(ObjectKind),
    ZoomIn,
    ZoomOut,
    Recenter,
    Cycle(Mutation),
    DeleteSelected,
    Restart,
    Export,
    ToggleInfo,
}

/// Input state tracking for keyboard and mouse.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: Vec<KeyCode>,

    mouse_held: HashSet<MouseButton>,
    mouse_pressed: HashSet<MouseButton>,
    mouse_released: HashSet<MouseButton>,

    mouse_position: Vec2,
    mouse_moved: bool,
    scroll_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }

    /// Pointer position in screen pixels.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Whether the pointer moved since the last frame.
    pub fn mouse_moved(&self) -> bool {
        self.mouse_moved
    }

    /// Scroll wheel delta this frame, positive when scrolling up.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Held pan direction from arrows and WASD. `S` is ignored while a
    /// modifier is held so `Ctrl+S` does not pan.
    pub fn pan_direction(&self) -> Vec2 {
        let held = |a: KeyCode, b: KeyCode| self.key_held(a) || self.key_held(b);
        let ctrl = self.key_held(KeyCode::Control);
        let mut dir = Vec2::ZERO;
        if held(KeyCode::Left, KeyCode::A) {
            dir.x -= 1.0;
        }
        if held(KeyCode::Right, KeyCode::D) {
            dir.x += 1.0;
        }
        if held(KeyCode::Up, KeyCode::W) {
            dir.y -= 1.0;
        }
        if self.key_held(KeyCode::Down) || (self.key_held(KeyCode::S) && !ctrl) {
            dir.y += 1.0;
        }
        dir
    }

    /// Commands for the keys pressed this frame, in press order.
    pub fn commands(&self) -> Vec<Command> {
        let ctrl = self.key_held(KeyCode::Control);
        self.keys_pressed
            .iter()
            .filter_map(|&key| match key {
                KeyCode::Key1 => Some(Command::Create(ObjectKind::Nebula)),
                KeyCode::Key2 => Some(Command::Create(ObjectKind::Galaxy)),
                KeyCode::Key3 => Some(Command::Create(ObjectKind::BlackHole)),
                KeyCode::Key4 => Some(Command::Create(ObjectKind::StarCluster)),
                KeyCode::Key5 => Some(Command::Create(ObjectKind::Pulsar)),
                KeyCode::Key6 => Some(Command::Create(ObjectKind::Quasar)),
                KeyCode::Plus => Some(Command::ZoomIn),
                KeyCode::Minus => Some(Command::ZoomOut),
                KeyCode::H => Some(Command::Recenter),
                KeyCode::E => Some(Command::Cycle(Mutation::Size)),
                KeyCode::R => Some(Command::Cycle(Mutation::Density)),
                KeyCode::T => Some(Command::Cycle(Mutation::Hue)),
                KeyCode::Backquote => Some(Command::DeleteSelected),
                KeyCode::Escape => Some(Command::Restart),
                KeyCode::S if ctrl => Some(Command::Export),
                KeyCode::I => Some(Command::ToggleInfo),
                _ => None,
            })
            .collect()
    }

    /// Clear per-frame state. Call after the frame has consumed it.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.mouse_moved = false;
        self.scroll_delta = 0.0;
    }

    pub(crate) fn press(&mut self, key: KeyCode) {
        // Only fire on the initial press, not on key repeat
        if self.keys_held.insert(key) {
            self.keys_pressed.push(key);
        }
    }

    pub(crate) fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let key = KeyCode::from(keycode);
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                if state.control_key() || state.super_key() {
                    self.keys_held.insert(KeyCode::Control);
                } else {
                    self.keys_held.remove(&KeyCode::Control);
                }
            }

            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                self.mouse_held.clear();
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let btn = MouseButton::from(*button);
                match state {
                    ElementState::Pressed => {
                        self.mouse_pressed.insert(btn);
                        self.mouse_held.insert(btn);
                    }
                    ElementState::Released => {
                        self.mouse_held.remove(&btn);
                        self.mouse_released.insert(btn);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Vec2::new(position.x as f32, position.y as f32);
                self.mouse_moved = true;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }

            _ => {}
        }
    }
}
