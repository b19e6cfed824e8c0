//! Two-phase auto-play state machine.
//!
//! Phase A runs on every interval tick: reveal the answer, or, when the
//! answer is already showing, hide it and hand out an [`AdvanceTicket`].
//! Phase B runs after a short delay and advances to the next card, but only
//! if the ticket still belongs to the current playback generation.

/// Outcome of an interval tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayTick {
    /// Not playing; the timer should stop.
    Stopped,
    /// The answer side is now showing.
    Revealed,
    /// The answer was hidden; redeem the ticket after the advance delay.
    Advance(AdvanceTicket),
}

/// Permission to perform one delayed advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u64,
}

/// Playback flag plus a generation counter.
///
/// Every start or stop bumps the generation, which invalidates tickets
/// issued before it.
#[derive(Debug, Clone, Default)]
pub struct AutoPlay {
    playing: bool,
    generation: u64,
}

impl AutoPlay {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn start(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.playing = true;
    }

    /// Stop playback. Returns whether it was playing.
    pub fn stop(&mut self) -> bool {
        let was_playing = self.playing;
        self.generation = self.generation.wrapping_add(1);
        self.playing = false;
        was_playing
    }

    /// Phase A. `answer_visible` is the side currently shown.
    pub fn tick(&self, answer_visible: bool) -> PlayTick {
        if !self.playing {
            PlayTick::Stopped
        } else if answer_visible {
            PlayTick::Advance(AdvanceTicket {
                generation: self.generation,
            })
        } else {
            PlayTick::Revealed
        }
    }

    /// Phase B gate.
    pub fn redeem(&self, ticket: AdvanceTicket) -> bool {
        self.playing && ticket.generation == self.generation
    }
}
