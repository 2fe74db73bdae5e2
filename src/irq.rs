//! Process-wide interrupt dispatch.
//!
//! Interrupt entry points cannot carry a context argument on this target, so
//! the one live [`Discipline`] and the tick source its latches read are held
//! in explicit process-wide state: set once by [`enable_interrupts`], never
//! reassigned, dispatched through by the two `extern`-style entry points
//! below. The single-instance lifecycle is a documented hard precondition,
//! not something the crate tries to paper over.
//!
//! The hosting environment routes its PPS GPIO edge to [`pps_interrupt`] and
//! its network-frame-arrival event to [`recv_interrupt`]. Before
//! registration both entry points are no-ops, so wiring order does not
//! matter during bring-up.

use core::cell::Cell;

use critical_section::Mutex;

use crate::discipline::Discipline;
use crate::error::Error;
use crate::traits::TickSource;

/// What the entry points need: where the state lives and how to read ticks.
#[derive(Clone, Copy)]
struct IrqHook {
    discipline: &'static Discipline,
    ticks: &'static (dyn TickSource + Sync),
}

static HOOK: Mutex<Cell<Option<IrqHook>>> = Mutex::new(Cell::new(None));

/// Wires the interrupt entry points to the one live instance.
///
/// Both references must be `'static`: interrupt handlers may fire for the
/// remaining lifetime of the process. Fails if a registration already
/// exists — the slot is set once and never reassigned.
pub fn enable_interrupts(
    discipline: &'static Discipline,
    ticks: &'static (dyn TickSource + Sync),
) -> Result<(), Error> {
    critical_section::with(|cs| {
        let slot = HOOK.borrow(cs);
        if slot.get().is_some() {
            return Err(Error::InterruptsAlreadyEnabled);
        }
        slot.set(Some(IrqHook { discipline, ticks }));
        Ok(())
    })
}

/// PPS rising-edge entry point. Bounded work: one tick read, one masked
/// state update.
pub fn pps_interrupt() {
    if let Some(hook) = current() {
        hook.discipline.pps_edge(hook.ticks.now_us());
    }
}

/// Network-frame-arrival entry point. Runs per inbound packet, so it does no
/// more than the PPS handler: one tick read, one masked latch.
pub fn recv_interrupt() {
    if let Some(hook) = current() {
        hook.discipline.recv_edge(hook.ticks.now_us());
    }
}

fn current() -> Option<IrqHook> {
    critical_section::with(|cs| HOOK.borrow(cs).get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discipline::NOMINAL_US_PER_SEC;
    use core::sync::atomic::{AtomicU32, Ordering};

    struct AtomicTicks(AtomicU32);

    impl TickSource for AtomicTicks {
        fn now_us(&self) -> u32 {
            self.0.load(Ordering::Relaxed)
        }
    }

    // The registration slot is process-wide, so its whole lifecycle lives in
    // one test: no-op before wiring, dispatch after, rejection of a second
    // registration.
    #[test]
    fn registration_lifecycle() {
        static CLOCK: Discipline = Discipline::new(NOMINAL_US_PER_SEC);
        static TICKS: AtomicTicks = AtomicTicks(AtomicU32::new(0));

        // Unregistered entry points must be safe no-ops.
        pps_interrupt();
        recv_interrupt();
        assert_eq!(CLOCK.baseline_secs(), 0);

        enable_interrupts(&CLOCK, &TICKS).unwrap();

        TICKS.0.store(1_000_000, Ordering::Relaxed);
        pps_interrupt();
        assert_eq!(CLOCK.baseline_secs(), 1);

        TICKS.0.store(1_250_000, Ordering::Relaxed);
        recv_interrupt();
        let recv = CLOCK.recv_time().unwrap();
        assert_eq!(recv.secs, 1);

        static OTHER: Discipline = Discipline::new(NOMINAL_US_PER_SEC);
        assert_eq!(
            enable_interrupts(&OTHER, &TICKS),
            Err(Error::InterruptsAlreadyEnabled)
        );
    }
}
