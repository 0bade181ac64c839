//! segtimer firmware entry point.
//!
//! Task layout:
//!
//! - `keypad_task` scans the matrix and sends debounced keys into
//!   [`KEY_CHANNEL`].
//! - `main` owns the [`TimerState`]: it waits for either a key or the next
//!   poll tick, feeds the state machine, then refreshes the segment digits
//!   (only when dirty) and the OLED (when the key log is dirty or every
//!   [`OLED_REFRESH_MS`]). Dirty flags are cleared only after a successful
//!   write, so a failed refresh is retried on the next pass.
//!
//! Everything hardware-independent comes from the `segtimer` library.

#![no_std]
#![no_main]

#[macro_use]
mod fmt;

#[path = "keypad/matrix.rs"]
mod matrix;
#[path = "ui/display.rs"]
mod display;

use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Ticker};
use {defmt_rtt as _, panic_probe as _};

use segtimer::config::{KEY_QUEUE_DEPTH, OLED_REFRESH_MS, POLL_INTERVAL_MS};
use segtimer::keypad::Key;
use segtimer::timer::TimerState;
use segtimer::ui::segments::SegmentDriver;
use segtimer::ui::status;

use crate::display::Display;
use crate::matrix::{KeySender, Matrix};

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Debounced keys, scanner → main loop.
static KEY_CHANNEL: Channel<CriticalSectionRawMutex, Key, KEY_QUEUE_DEPTH> = Channel::new();

#[embassy_executor::task]
async fn keypad_task(matrix: Matrix, tx: KeySender) -> ! {
    matrix::scan_task(matrix, tx).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("segtimer starting");

    // Keypad matrix: rows in with pull-up, columns out idling high.
    let rows = [
        Input::new(p.P1_01, Pull::Up),
        Input::new(p.P1_02, Pull::Up),
        Input::new(p.P1_03, Pull::Up),
        Input::new(p.P1_04, Pull::Up),
    ];
    let cols = [
        Output::new(p.P1_05, Level::High, OutputDrive::Standard),
        Output::new(p.P1_06, Level::High, OutputDrive::Standard),
        Output::new(p.P1_07, Level::High, OutputDrive::Standard),
        Output::new(p.P1_08, Level::High, OutputDrive::Standard),
    ];
    if spawner
        .spawn(keypad_task(Matrix::new(rows, cols), KEY_CHANNEL.sender()))
        .is_err()
    {
        warn!("Keypad task could not be spawned");
    }

    // Segment shift registers. /G stays low: full brightness.
    let _output_enable = Output::new(p.P0_29, Level::Low, OutputDrive::Standard);
    let mut segments = SegmentDriver::new(
        Output::new(p.P0_03, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_04, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_28, Level::Low, OutputDrive::Standard),
    );

    // Status OLED. The timer keeps running without it.
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut oled: Option<Display<_>> = match display::init(i2c) {
        Ok(d) => Some(d),
        Err(e) => {
            warn!("OLED init failed: {}", e);
            None
        }
    };

    let mut state = TimerState::new();
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    let mut last_oled_ms = 0u64;

    loop {
        let key = match select(KEY_CHANNEL.receive(), ticker.next()).await {
            Either::First(key) => Some(key),
            Either::Second(()) => None,
        };

        let now_ms = Instant::now().as_millis();
        if let Some(key) = key {
            state.apply_key(key, now_ms);
        }
        state.advance(now_ms);

        if let Err(e) = segments.refresh(&mut state) {
            warn!("Segment refresh failed: {}", e);
        }

        let refresh_due = now_ms.saturating_sub(last_oled_ms) >= OLED_REFRESH_MS;
        if state.log_dirty() || refresh_due {
            let drawn = match oled.as_mut() {
                Some(oled) => {
                    let clock = status::clock(&state);
                    match display::draw_status(
                        oled,
                        status::label(&state),
                        clock.as_deref(),
                        state.key_log(),
                    ) {
                        Ok(()) => true,
                        Err(e) => {
                            warn!("OLED refresh failed: {}", e);
                            false
                        }
                    }
                }
                // Nothing to draw on.
                None => true,
            };
            if drawn {
                state.clear_log_dirty();
            }
            last_oled_ms = now_ms;
        }
    }
}
