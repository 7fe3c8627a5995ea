//! Button → action dispatch tables.
//!
//! Both classifiers produce `(ButtonId, Gesture)`; the [`ActionTable`]
//! turns that into a [`LightAction`]. Lookup is pure; executing the action
//! is the service's job.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  ActionTable                                                  │
//! │  ┌────────────────┬───────────────────┬──────────────────────┐ │
//! │  │ ButtonId       │ press             │ hold                 │ │
//! │  ├────────────────┼───────────────────┼──────────────────────┤ │
//! │  │ Switch(Top)    │ Increment         │ JumpTo(High)         │ │
//! │  │ Switch(Middle) │ ToggleOff         │ JumpTo(Mid)          │ │
//! │  │ Switch(Bottom) │ Decrement         │ JumpTo(Low)          │ │
//! │  │ Remote(0x18)   │ Increment         │ Increment            │ │
//! │  │ Remote(...)    │ ...               │ ...                  │ │
//! │  └────────────────┴───────────────────┴──────────────────────┘ │
//! └───────────────────────────────────────────────────────────────┘
//! ```

use heapless::FnvIndexMap;

use crate::config::{IR_LEVEL_COUNT, LightConfig};
use crate::drivers::Gesture;
use crate::drivers::button::SwitchLine;
use crate::error::InputError;
use crate::light::{LightAction, NamedLevel};

/// Capacity of the remote table (power of two, required by the index map).
pub const REMOTE_TABLE_CAP: usize = 32;

/// Logical identity of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Switch(SwitchLine),
    /// Raw NEC command byte.
    Remote(u8),
}

/// The pair of actions bound to one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonActions {
    pub press: LightAction,
    pub hold: LightAction,
}

impl ButtonActions {
    pub const fn new(press: LightAction, hold: LightAction) -> Self {
        Self { press, hold }
    }

    /// Bound but inert in both directions.
    pub const INERT: Self = Self::new(LightAction::None, LightAction::None);

    pub const fn for_gesture(&self, gesture: Gesture) -> LightAction {
        match gesture {
            Gesture::Press => self.press,
            Gesture::Hold => self.hold,
        }
    }
}

/// Codes sent by the 17-key NEC remote.
pub mod remote_codes {
    pub const KEY_1: u8 = 0x45;
    pub const KEY_2: u8 = 0x46;
    pub const KEY_3: u8 = 0x47;
    pub const KEY_4: u8 = 0x44;
    pub const KEY_5: u8 = 0x40;
    pub const KEY_6: u8 = 0x43;
    pub const KEY_7: u8 = 0x07;
    pub const KEY_8: u8 = 0x15;
    pub const KEY_9: u8 = 0x09;
    pub const KEY_STAR: u8 = 0x16;
    pub const KEY_0: u8 = 0x19;
    pub const KEY_POUND: u8 = 0x0d;
    pub const KEY_UP: u8 = 0x18;
    pub const KEY_DOWN: u8 = 0x52;
    pub const KEY_LEFT: u8 = 0x08;
    pub const KEY_RIGHT: u8 = 0x5a;
    pub const KEY_OK: u8 = 0x1c;

    /// Keys 2–8, in the order of `LightConfig::ir_levels`.
    pub const PRESET_KEYS: [u8; super::IR_LEVEL_COUNT] =
        [KEY_2, KEY_3, KEY_4, KEY_5, KEY_6, KEY_7, KEY_8];
}

pub struct ActionTable {
    switches: [ButtonActions; SwitchLine::COUNT],
    remote: FnvIndexMap<u8, ButtonActions, REMOTE_TABLE_CAP>,
}

impl ActionTable {
    /// An empty remote table with the given switch bindings.
    pub fn new(switches: [ButtonActions; SwitchLine::COUNT]) -> Self {
        Self {
            switches,
            remote: FnvIndexMap::new(),
        }
    }

    /// Bind (or rebind) a remote code. Returns `false` if the table is full.
    pub fn bind_remote(&mut self, code: u8, actions: ButtonActions) -> bool {
        self.remote.insert(code, actions).is_ok()
    }

    /// Resolve a classified input to its action.
    pub fn lookup(&self, button: ButtonId, gesture: Gesture) -> Result<LightAction, InputError> {
        let actions = match button {
            ButtonId::Switch(line) => self.switches[line.index()],
            ButtonId::Remote(code) => *self
                .remote
                .get(&code)
                .ok_or(InputError::UnmappedButton(code))?,
        };
        Ok(actions.for_gesture(gesture))
    }

    /// Number of bound remote codes.
    pub fn remote_len(&self) -> usize {
        self.remote.len()
    }
}

/// Build the default table. Called once at startup.
pub fn build_action_table(config: &LightConfig) -> ActionTable {
    use remote_codes::*;
    use LightAction::{Decrement, Increment, JumpTo, SetLevelIfOn, ToggleOff};

    let mut table = ActionTable::new([
        // Top
        ButtonActions::new(Increment, JumpTo(NamedLevel::High)),
        // Middle
        ButtonActions::new(ToggleOff, JumpTo(NamedLevel::Mid)),
        // Bottom
        ButtonActions::new(Decrement, JumpTo(NamedLevel::Low)),
    ]);

    let mut bind = |code, actions| {
        let bound = table.bind_remote(code, actions);
        debug_assert!(bound, "remote table full");
    };

    bind(KEY_1, ButtonActions::new(JumpTo(NamedLevel::Low), LightAction::None));
    for (code, level) in PRESET_KEYS.into_iter().zip(config.ir_levels) {
        bind(code, ButtonActions::new(SetLevelIfOn(level), LightAction::None));
    }
    bind(KEY_9, ButtonActions::new(JumpTo(NamedLevel::High), LightAction::None));
    bind(KEY_STAR, ButtonActions::new(ToggleOff, LightAction::None));
    bind(KEY_UP, ButtonActions::new(Increment, Increment));
    bind(KEY_DOWN, ButtonActions::new(Decrement, Decrement));
    // Spare keys: mapped so they are not reported as unknown.
    for code in [KEY_0, KEY_POUND, KEY_LEFT, KEY_RIGHT, KEY_OK] {
        bind(code, ButtonActions::INERT);
    }

    table
}
