//! Ordered phase transitions for one match.
//!
//! The cycler owns the current [`Phase`] instance and is the only code
//! that creates or destroys phases. Because a phase can only leave the
//! cycler through [`advance`](PhaseCycler::advance),
//! [`cancel`](PhaseCycler::cancel), or
//! [`teardown`](PhaseCycler::teardown) -- each of which runs the exit
//! hook on the instance it takes out -- the exit hook runs exactly once
//! per phase instance, for natural, forced, and cancelled stops alike.

use skirmish_types::{PhaseKind, StopReason};

use crate::phase::{Phase, PhaseContext, PhaseDirective, PhaseError};

/// Whether the match is still running after a cycler operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A phase is active; keep ticking.
    Running,
    /// The final phase concluded (or the match was cancelled or
    /// abandoned); the owner should unregister the match.
    Finished,
}

/// Drives the fixed Waiting -> Playing -> Done sequence for one match.
#[derive(Debug, Default)]
pub struct PhaseCycler {
    current: Option<Phase>,
}

impl PhaseCycler {
    /// Create a cycler with no active phase.
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Enter the initial Waiting phase.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] if phase entry fails.
    pub fn start(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        self.current = Some(Phase::enter(PhaseKind::Waiting, ctx)?);
        Ok(())
    }

    /// The kind of the active phase, if any.
    pub fn kind(&self) -> Option<PhaseKind> {
        self.current.as_ref().map(Phase::kind)
    }

    /// Borrow the active phase.
    pub const fn current(&self) -> Option<&Phase> {
        self.current.as_ref()
    }

    /// Whether the cycler has run out of phases.
    pub const fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// Forward one tick to the active phase and apply its directive.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] on a lifecycle fault from the phase's
    /// update or from entry into the next phase.
    pub fn update(&mut self, ctx: &mut PhaseContext<'_>) -> Result<CycleOutcome, PhaseError> {
        let Some(phase) = self.current.as_mut() else {
            return Ok(CycleOutcome::Finished);
        };

        match phase.update(ctx)? {
            PhaseDirective::Continue => Ok(CycleOutcome::Running),
            PhaseDirective::Advance => self.advance(ctx, StopReason::Natural),
            PhaseDirective::Teardown => {
                self.stop_current(StopReason::Forced, ctx);
                Ok(CycleOutcome::Finished)
            }
        }
    }

    /// End the current phase and enter the next one in sequence.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] if entering the next phase fails; the old
    /// phase's exit hook has already run by then.
    pub fn advance(
        &mut self,
        ctx: &mut PhaseContext<'_>,
        reason: StopReason,
    ) -> Result<CycleOutcome, PhaseError> {
        let Some(kind) = self.stop_current(reason, ctx) else {
            return Ok(CycleOutcome::Finished);
        };

        match kind.next() {
            Some(next) => {
                self.current = Some(Phase::enter(next, ctx)?);
                Ok(CycleOutcome::Running)
            }
            None => Ok(CycleOutcome::Finished),
        }
    }

    /// Forcibly end the current phase and move on (the privileged
    /// force-start / force-stop path).
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] if entering the next phase fails.
    pub fn cycle_next(&mut self, ctx: &mut PhaseContext<'_>) -> Result<CycleOutcome, PhaseError> {
        self.advance(ctx, StopReason::Forced)
    }

    /// End the current phase with a cancelled reason without advancing.
    /// The match is over afterwards.
    pub fn cancel(&mut self, ctx: &mut PhaseContext<'_>) {
        let _ = self.stop_current(StopReason::Cancelled, ctx);
    }

    /// Forcibly end the current phase without advancing (the fault and
    /// abandonment path). The match is over afterwards.
    pub fn teardown(&mut self, ctx: &mut PhaseContext<'_>) {
        let _ = self.stop_current(StopReason::Forced, ctx);
    }

    /// Take the current phase out and run its exit hook once.
    /// Returns the kind of the phase that stopped.
    fn stop_current(
        &mut self,
        reason: StopReason,
        ctx: &mut PhaseContext<'_>,
    ) -> Option<PhaseKind> {
        let mut phase = self.current.take()?;
        phase.exit(reason, ctx);
        Some(phase.kind())
    }
}
