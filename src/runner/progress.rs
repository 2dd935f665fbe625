use std::io::Write;

/// One `.` on stderr per finished call when enabled.
#[derive(Debug)]
pub(super) struct Progress {
    enabled: bool,
    ticked: bool,
}

impl Progress {
    pub(super) const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ticked: false,
        }
    }

    pub(super) fn tick(&mut self) {
        if !self.enabled {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        drop(stderr.write_all(b"."));
        drop(stderr.flush());
        self.ticked = true;
    }

    /// Ends the tick line; safe to call more than once.
    pub(super) fn finish(&mut self) {
        if self.ticked {
            eprintln!();
            self.ticked = false;
        }
    }
}
