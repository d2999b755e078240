//! OS signals translated into flag writes.
//!
//! The handlers installed here store `true` into an atomic and nothing else.
//! Interrupt and terminate request a stop; a window-size change requests a
//! resize followed by a repaint. All real work happens on the next tick.

use std::io;

#[cfg(unix)]
use signal_hook::{
    SigId,
    consts::signal::{SIGINT, SIGTERM, SIGWINCH},
};

use crate::flags::{DirtyFlags, RunningFlag};

/// Registered signal handlers. Dropping the bridge unregisters them.
#[derive(Debug)]
pub struct SignalBridge {
    #[cfg(unix)]
    ids: Vec<SigId>,
}

impl SignalBridge {
    /// Route interrupt, terminate and window-change signals to the flags.
    pub fn install(running: &RunningFlag, flags: &DirtyFlags) -> io::Result<Self> {
        #[cfg(unix)]
        {
            // Registration order is dispatch order: resize lands before refresh.
            let ids = vec![
                signal_hook::flag::register(SIGINT, running.stop_handle())?,
                signal_hook::flag::register(SIGTERM, running.stop_handle())?,
                signal_hook::flag::register(SIGWINCH, flags.resize_handle())?,
                signal_hook::flag::register(SIGWINCH, flags.refresh_handle())?,
            ];
            tracing::debug!(handlers = ids.len(), "signal handlers installed");
            Ok(Self { ids })
        }

        #[cfg(not(unix))]
        {
            let _ = (running, flags);
            Ok(Self {})
        }
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        #[cfg(unix)]
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    // One test only: raised signals reach every bridge in the process.
    #[test]
    fn signals_set_flags() {
        let running = RunningFlag::new();
        let flags = DirtyFlags::new();
        let bridge = SignalBridge::install(&running, &flags).unwrap();

        signal_hook::low_level::raise(SIGWINCH).unwrap();
        assert!(flags.take_resize());
        assert!(flags.take_refresh());
        assert!(running.is_running());

        signal_hook::low_level::raise(SIGINT).unwrap();
        assert!(!running.is_running());

        drop(bridge);
        signal_hook::low_level::raise(SIGWINCH).unwrap();
        assert!(!flags.resize_pending());
    }
}
