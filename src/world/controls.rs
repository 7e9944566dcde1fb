use winit::event::{KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

pub const FLAGS_PER_DOZER: usize = 4;

/// Control flags and accumulated heading for one dozer. Flags are held
/// while the bound key is down; heading accumulates unbounded.
#[derive(Debug, Clone, Default)]
pub struct DozerControls {
    pub flags: [bool; FLAGS_PER_DOZER],
    pub heading: f32,
}

#[derive(Debug, Clone, Copy)]
struct KeyBinding {
    key: KeyCode,
    dozer: usize,
    flag: usize,
}

const BINDINGS: [KeyBinding; 8] = [
    // first dozer
    KeyBinding { key: KeyCode::KeyA, dozer: 0, flag: 0 },
    KeyBinding { key: KeyCode::KeyZ, dozer: 0, flag: 1 },
    KeyBinding { key: KeyCode::KeyS, dozer: 0, flag: 2 },
    KeyBinding { key: KeyCode::KeyX, dozer: 0, flag: 3 },
    // second dozer
    KeyBinding { key: KeyCode::Semicolon, dozer: 1, flag: 0 },
    KeyBinding { key: KeyCode::Period, dozer: 1, flag: 1 },
    KeyBinding { key: KeyCode::Quote, dozer: 1, flag: 2 },
    KeyBinding { key: KeyCode::Slash, dozer: 1, flag: 3 },
];

/// Keyboard state feeding the simulation: one flag set per dozer plus the
/// quit signal.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    pub dozers: Vec<DozerControls>,
    pub quit_requested: bool,
}

impl ControlState {
    pub fn new(dozer_count: usize) -> Self {
        Self {
            dozers: vec![DozerControls::default(); dozer_count],
            quit_requested: false,
        }
    }

    /// Returns true when the event was consumed.
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => self.apply_key(*code, state.is_pressed()),
            _ => false,
        }
    }

    fn apply_key(&mut self, code: KeyCode, pressed: bool) -> bool {
        if code == KeyCode::Escape {
            if pressed {
                self.quit_requested = true;
            }
            return true;
        }
        for binding in BINDINGS {
            if binding.key == code && binding.dozer < self.dozers.len() {
                self.dozers[binding.dozer].flags[binding.flag] = pressed;
                return true;
            }
        }
        false
    }
}
