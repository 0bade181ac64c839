//! TPIC6B595 shift-register chain driving the four digits.
//!
//! One register per digit, daisy-chained, so the last digit is shifted
//! out first. The logical buffer is converted with [`segment::to_wire`]
//! here and nowhere else.

use crate::config::DIGIT_COUNT;
use crate::error::Error;
use crate::segment;
use crate::timer::TimerState;
use embedded_hal::digital::OutputPin;

/// Bit-banged shift-register output.
pub struct SegmentDriver<P: OutputPin> {
    data: P,
    clock: P,
    latch: P,
}

impl<P: OutputPin> SegmentDriver<P> {
    pub fn new(data: P, clock: P, latch: P) -> Self {
        Self { data, clock, latch }
    }

    /// Latch the timer's segment buffer if it changed.
    ///
    /// The dirty flag is cleared only after the frame is out, so a failed
    /// write is retried on the next call. Returns whether a frame was sent.
    pub fn refresh(&mut self, state: &mut TimerState) -> Result<bool, Error> {
        if !state.segments_dirty() {
            return Ok(false);
        }
        self.show(state.segments())?;
        state.clear_segments_dirty();
        Ok(true)
    }

    /// Latch a new frame. `segments` is the logical (upright) buffer.
    pub fn show(&mut self, segments: &[u8; DIGIT_COUNT]) -> Result<(), Error> {
        let wire = segment::to_wire(segments);

        self.latch.set_low().map_err(|_| Error::Segments)?;
        for &byte in wire.iter().rev() {
            self.shift_out(byte)?;
        }
        self.latch.set_high().map_err(|_| Error::Segments)?;
        Ok(())
    }

    /// MSB first, data sampled on the rising clock edge.
    fn shift_out(&mut self, byte: u8) -> Result<(), Error> {
        for bit in (0..8).rev() {
            let level = if byte & (1 << bit) != 0 {
                self.data.set_high()
            } else {
                self.data.set_low()
            };
            level.map_err(|_| Error::Segments)?;
            self.clock.set_high().map_err(|_| Error::Segments)?;
            self.clock.set_low().map_err(|_| Error::Segments)?;
        }
        Ok(())
    }
}
