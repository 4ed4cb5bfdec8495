use std::cell::Cell;

use crate::error::{Control, Error};

/// Enabled/disabled state of the controls that start long operations.
///
/// Session commands take `&mut self`, so a flag is never seen busy from a
/// second caller; the guard exists to expose the enable/disable state while
/// an operation runs and to re-enable on every exit path.
#[derive(Debug, Default)]
pub struct Controls {
    find: Cell<bool>,
    save: Cell<bool>,
    load: Cell<bool>,
}

impl Controls {
    fn busy_flag(&self, control: Control) -> &Cell<bool> {
        match control {
            Control::Find => &self.find,
            Control::Save => &self.save,
            Control::Load => &self.load,
        }
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        !self.busy_flag(control).get()
    }

    /// Disable `control` until the returned guard is dropped.
    pub fn acquire(&self, control: Control) -> Result<BusyGuard<'_>, Error> {
        let flag = self.busy_flag(control);
        if flag.replace(true) {
            return Err(Error::Busy(control));
        }
        Ok(BusyGuard { flag })
    }
}

/// Re-enables its control on drop, whatever path the operation took
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
