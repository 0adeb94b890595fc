//! Phase detector: locates the bin where each second's pulse begins among
//! 100 cyclic 10 ms bins, then classifies the pulse length once locked.
use crate::score_bin::ScoreBin;
use crate::symbol::{Pulse, PulseClass, Symbol};

/// Number of 10 ms bins per second.
pub const BIN_COUNT: usize = 100;
/// Minimum correlation for a bin to be treated as a phase candidate.
const LOCK_THRESHOLD: u32 = 75;
/// Width, in bins, of the expected pulse body (100 ms).
const BINS_PER_100MS: usize = 10;
/// Width, in bins, of the expected "either state" region (100-200 ms).
const BINS_PER_200MS: usize = 20;

const fn wrap(value: usize) -> usize {
    let mut v = value;
    while v >= BIN_COUNT {
        v -= BIN_COUNT;
    }
    v
}

/// Three-state pulse-length classifier, referenced to the phase detector's
/// locked `pulse_start_bin`. Activates once per second.
enum ClassifierState {
    /// Waiting for `active_bin` to enter the pulse window.
    Idle,
    /// Accumulating the tri-state sum across the 100 ms pulse body (plus
    /// the one early-entry tick, so the sum can range beyond ±10 — see
    /// scenario S2 in the test suite below).
    Body { sum: i8, remaining: u8 },
    /// Accumulating the tri-state sum across the following 100 ms tail,
    /// which decides SHORT vs LONG.
    Tail { sum: i8, remaining: u8, is_sync_candidate: bool },
}

struct PulseClassifier {
    state: ClassifierState,
}

impl PulseClassifier {
    const fn new() -> Self {
        Self { state: ClassifierState::Idle }
    }

    /// Step the state machine by one 10 ms tick. `pulse_start_bin` must be
    /// the currently locked phase; callers only invoke this once locked.
    fn step(&mut self, active_bin: usize, pulse_start_bin: usize, symbol: Symbol) -> Option<Pulse> {
        let val = symbol.signed();
        match self.state {
            ClassifierState::Idle => {
                if active_bin == wrap(BIN_COUNT + pulse_start_bin - 1) {
                    self.state = ClassifierState::Body { sum: val, remaining: 10 };
                }
                None
            }
            ClassifierState::Body { sum, remaining } => {
                let sum = sum.saturating_add(val);
                if remaining == 0 {
                    let is_sync_candidate = sum < -10;
                    self.state = ClassifierState::Tail { sum: 0, remaining: 10, is_sync_candidate };
                } else {
                    self.state = ClassifierState::Body { sum, remaining: remaining - 1 };
                }
                None
            }
            ClassifierState::Tail { sum, remaining, is_sync_candidate } => {
                let sum = sum.saturating_add(val);
                if remaining == 0 {
                    let class = if sum > 6 {
                        PulseClass::Long
                    } else if sum < -6 {
                        PulseClass::Short
                    } else {
                        PulseClass::Unknown
                    };
                    self.state = ClassifierState::Idle;
                    Some(Pulse { class, is_sync_candidate })
                } else {
                    self.state = ClassifierState::Tail { sum, remaining: remaining - 1, is_sync_candidate };
                    None
                }
            }
        }
    }
}

/// Locates the start of each second among 100 cyclic 10 ms bins and, once
/// locked, classifies each second's pulse length.
pub struct PhaseDetector {
    bin: ScoreBin<BIN_COUNT>,
    correlation: [u32; BIN_COUNT],
    active_bin: usize,
    pulse_start_bin: Option<usize>,
    classifier: PulseClassifier,
}

impl PhaseDetector {
    pub const fn new() -> Self {
        Self {
            bin: ScoreBin::new(i8::MIN),
            correlation: [0; BIN_COUNT],
            active_bin: 0,
            pulse_start_bin: None,
            classifier: PulseClassifier::new(),
        }
    }

    /// Currently locked pulse-start bin, or `None` if not (yet) locked.
    pub fn pulse_start_bin(&self) -> Option<usize> {
        self.pulse_start_bin
    }

    /// Discard the phase lock and every accumulated bin score, e.g. after a
    /// signal gap. Starts re-acquiring from a cold state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed one 10 ms symbol. Returns `Some(pulse)` once per second, once
    /// the phase has locked.
    pub fn on_symbol(&mut self, symbol: Symbol) -> Option<Pulse> {
        self.active_bin = wrap(self.active_bin + 1);
        match symbol.signed() {
            1 => self.bin.add(self.active_bin, 1),
            -1 => self.bin.add(self.active_bin, -1),
            _ => {}
        }

        let candidate = self.correlate();
        if let Some(candidate) = candidate {
            self.track(candidate);
        }

        match self.pulse_start_bin {
            Some(start) => self.classifier.step(self.active_bin, start, symbol),
            None => None,
        }
    }

    /// Recompute `correlation[active_bin]` against the expected pulse
    /// template and find the bin with the globally maximum correlation.
    /// Ties are broken by the *earlier* index (unlike [`ScoreBin::maximum`]):
    /// a transient glitch in a fresh bin should not steal the candidate from
    /// an already-matching one recomputed earlier in this same pass.
    fn correlate(&mut self) -> Option<usize> {
        let mut body: u32 = 0;
        for k in 0..BINS_PER_100MS {
            body += self.bin.get_unsigned(wrap(self.active_bin + k)) as u32;
        }
        let mut total = body * 2;
        for k in BINS_PER_100MS..BINS_PER_200MS {
            total += self.bin.get_unsigned(wrap(self.active_bin + k)) as u32;
        }
        self.correlation[self.active_bin] = total;

        let mut max_correlation = 0u32;
        let mut best = None;
        for (i, &c) in self.correlation.iter().enumerate() {
            if c > max_correlation.max(LOCK_THRESHOLD) {
                max_correlation = c;
                best = Some(i);
            }
        }
        best
    }

    /// Slew-rate limiter: move `pulse_start_bin` at most one bin per 10 ms
    /// towards `candidate`, picking the direction that minimises circular
    /// distance. This prevents a single-tick glitch from destroying an
    /// established lock.
    fn track(&mut self, candidate: usize) {
        match self.pulse_start_bin {
            None => self.pulse_start_bin = Some(candidate),
            Some(start) => {
                if wrap(BIN_COUNT + start - candidate) > BIN_COUNT / 2 {
                    self.pulse_start_bin = Some(wrap(start + 1));
                } else if start != candidate {
                    self.pulse_start_bin = Some(wrap(BIN_COUNT + start - 1));
                }
            }
        }
    }
}

impl Default for PhaseDetector {
    fn default() -> Self {
        Self::new()
    }
}
