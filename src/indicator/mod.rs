//! Indicator lamps: the state cadence loop, the incident feedback blink and
//! the hardware-unavailable warning.
//!
//! The loop only reads the recording state and the info-mode counter; it never
//! takes a lock the recorder needs, so a slow lamp can delay at most itself.


use crate::config::Timings;
use crate::gpio::OutputLine;
use crate::recorder::{RecordingState, RecordingStateCell};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

/// The counter stays in `0..100`; only `% 4` matters for the cadence.
const INFO_MODE_MODULUS: u8 = 100;

/// Operator-selected blink mode, advanced by the info button.
#[derive(Debug, Default)]
pub struct InfoMode(AtomicU8);

impl InfoMode {
    pub fn get(&self) -> u8 {
        self.0.load(Ordering::SeqCst)
    }

    /// Advance to the next mode and return it.
    pub fn cycle(&self) -> u8 {
        let previous = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |mode| {
                Some((mode % INFO_MODE_MODULUS + 1) % INFO_MODE_MODULUS)
            })
            .unwrap_or_else(|mode| mode);
        (previous % INFO_MODE_MODULUS + 1) % INFO_MODE_MODULUS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// One heartbeat every `slow_heartbeat_ticks` ticks.
    SlowHeartbeat,
    /// One heartbeat every tick.
    Heartbeat,
    SteadyOn,
    Dark,
}

impl Cadence {
    pub fn from_info_mode(mode: u8) -> Self {
        match mode % 4 {
            0 => Cadence::SlowHeartbeat,
            1 => Cadence::Heartbeat,
            2 => Cadence::SteadyOn,
            _ => Cadence::Dark,
        }
    }
}

/// The three lamps on the front panel.
#[derive(Clone)]
pub struct IndicatorLines {
    pub power: Arc<dyn OutputLine>,
    pub info: Arc<dyn OutputLine>,
    /// Lit while an incident copy runs.
    pub copy: Arc<dyn OutputLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveLine {
    Info,
    Power,
}

pub struct IndicatorCoordinator {
    power: Arc<dyn OutputLine>,
    info: Arc<dyn OutputLine>,
    state: Arc<RecordingStateCell>,
    info_mode: Arc<InfoMode>,
    dim_percent: u8,
    timings: Timings,
    ticks: u32,
    active: Option<ActiveLine>,
    /// Last level written to the active line; `None` until known.
    lit: Option<bool>,
    stopping: bool,
}

impl IndicatorCoordinator {
    pub fn new(
        lines: &IndicatorLines,
        state: Arc<RecordingStateCell>,
        info_mode: Arc<InfoMode>,
        dim_percent: u8,
        timings: Timings,
    ) -> Self {
        Self {
            power: Arc::clone(&lines.power),
            info: Arc::clone(&lines.info),
            state,
            info_mode,
            dim_percent,
            timings,
            ticks: 0,
            active: None,
            lit: None,
            stopping: false,
        }
    }

    /// One pass of the loop. A heartbeat started here runs to completion
    /// before the next state is looked at.
    pub fn tick(&mut self) {
        let state = self.state.load();
        let active = match state {
            RecordingState::Recording => ActiveLine::Power,
            RecordingState::Off | RecordingState::Stopping => ActiveLine::Info,
        };
        self.switch_to(active);
        if self.stopping && state != RecordingState::Stopping && active == ActiveLine::Info {
            // The stop toggle may have left the info lamp lit; the slow
            // heartbeat would not touch it again for many ticks.
            self.info.set_off();
            self.lit = Some(false);
        }
        self.stopping = state == RecordingState::Stopping;
        let tick = self.ticks;
        self.ticks = self.ticks.wrapping_add(1);

        if state == RecordingState::Stopping {
            // Stop pending: toggle every tick regardless of the info mode.
            if self.lit == Some(true) {
                self.info.set_off();
                self.lit = Some(false);
            } else {
                self.info.set_duty_cycle(self.dim_percent);
                self.lit = Some(true);
            }
            return;
        }

        let line = Arc::clone(self.line(active));
        match Cadence::from_info_mode(self.info_mode.get()) {
            Cadence::SlowHeartbeat => {
                if tick % self.timings.slow_heartbeat_ticks.max(1) == 0 {
                    heartbeat(line.as_ref(), self.dim_percent, &self.timings);
                    self.lit = Some(false);
                }
            }
            Cadence::Heartbeat => {
                heartbeat(line.as_ref(), self.dim_percent, &self.timings);
                self.lit = Some(false);
            }
            Cadence::SteadyOn => {
                if self.lit != Some(true) {
                    line.set_on();
                    line.set_duty_cycle(self.dim_percent);
                    self.lit = Some(true);
                }
            }
            Cadence::Dark => {
                if self.lit != Some(false) {
                    line.set_off();
                    self.lit = Some(false);
                }
            }
        }
    }

    /// Tick until the shutdown channel fires or disconnects, then darken both lamps.
    pub fn run(mut self, shutdown: Receiver<()>) {
        loop {
            self.tick();
            match shutdown.recv_timeout(self.timings.indicator_tick) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.power.set_off();
        self.info.set_off();
    }

    fn switch_to(&mut self, active: ActiveLine) {
        if let Some(previous) = self.active {
            if previous != active {
                self.line(previous).set_off();
                self.lit = None;
            }
        }
        self.active = Some(active);
    }

    fn line(&self, which: ActiveLine) -> &Arc<dyn OutputLine> {
        match which {
            ActiveLine::Info => &self.info,
            ActiveLine::Power => &self.power,
        }
    }
}

/// Double pulse: dim, off, dim, off.
pub fn heartbeat(line: &dyn OutputLine, dim_percent: u8, timings: &Timings) {
    line.set_duty_cycle(dim_percent);
    thread::sleep(timings.heartbeat_pulse);
    line.set_duty_cycle(0);
    thread::sleep(timings.heartbeat_gap);
    line.set_duty_cycle(dim_percent);
    thread::sleep(timings.heartbeat_tail);
    line.set_duty_cycle(0);
}

/// "Copy done" blink; leaves the line off.
pub fn feedback_blink(line: &dyn OutputLine, timings: &Timings) {
    let step_ms = timings.feedback_blink_step.as_millis().max(1);
    let rounds = timings.feedback_blink_total.as_millis() / step_ms;
    for round in 0..rounds {
        if round % 2 == 0 {
            line.set_on();
        } else {
            line.set_off();
        }
        thread::sleep(timings.feedback_blink_step);
    }
    line.set_off();
}

/// Sustained pattern shown when storage or the encoder is unavailable.
pub fn warning_blink(line: &dyn OutputLine, timings: &Timings) {
    for _ in 0..timings.warning_blinks {
        line.set_on();
        thread::sleep(timings.warning_step);
        line.set_off();
        thread::sleep(timings.warning_step);
    }
}
