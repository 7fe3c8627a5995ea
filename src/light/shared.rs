//! The single shared brightness resource.
//!
//! Switch contexts, the IR callback, and the main loop all reach the
//! brightness state through one [`SharedLight`]. Every mutation, including
//! the physical duty write that follows it, runs inside one critical
//! section, so two inputs firing in the same instant can never interleave
//! a read-modify-write of `level` / `last_valid_level`.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::warn;

use super::{Brightness, LevelChange, LightAction};
use crate::app::ports::DutyPort;
use crate::error::Result;

/// Read-only copy of the brightness state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSnapshot {
    pub level: u16,
    pub last_valid_level: u16,
    pub duty: u16,
    pub is_off: bool,
}

pub struct SharedLight {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Brightness>>,
}

impl SharedLight {
    pub fn new(brightness: Brightness) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(brightness)),
        }
    }

    /// Run `action` and, if it changed anything, write the new duty to
    /// `out` before releasing the lock. Returns the change so the caller
    /// can notify the display outside the critical section.
    ///
    /// A failed write rolls the state back, so `level` always describes
    /// what the output is actually driving.
    pub fn apply(&self, action: LightAction, out: &mut impl DutyPort) -> Result<Option<LevelChange>> {
        self.inner.lock(|cell| -> Result<Option<LevelChange>> {
            let mut state = cell.borrow_mut();
            let before = state.clone();
            let change = state.apply(action)?;
            if let Some(c) = &change {
                if let Err(e) = out.set_duty(c.duty) {
                    warn!("duty write {} failed: {}, keeping level {}", c.duty, e, before.level());
                    *state = before;
                    return Err(e.into());
                }
            }
            Ok(change)
        })
    }

    /// Re-write the current duty.
    pub fn sync_output(&self, out: &mut impl DutyPort) -> Result<LevelChange> {
        self.inner.lock(|cell| -> Result<LevelChange> {
            let current = cell.borrow().current();
            out.set_duty(current.duty)?;
            Ok(current)
        })
    }

    /// Force `level` to an arbitrary value, bypassing every check.
    #[cfg(test)]
    pub(crate) fn corrupt(&self, level: u16) {
        self.inner.lock(|cell| cell.borrow_mut().corrupt(level));
    }

    pub fn snapshot(&self) -> LightSnapshot {
        self.inner.lock(|cell| {
            let b = cell.borrow();
            LightSnapshot {
                level: b.level(),
                last_valid_level: b.last_valid_level(),
                duty: b.duty(),
                is_off: b.is_off(),
            }
        })
    }
}
