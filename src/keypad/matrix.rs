//! GPIO keypad matrix scanner.
//!
//! Columns are outputs idling high, rows are inputs with pull-ups. Each
//! scan drives one column low at a time and reads which row follows it
//! down. The raw result goes through the [`Debouncer`], and accepted keys
//! are pushed into the key channel that the main loop drains.

use embassy_nrf::gpio::{Input, Output};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Instant, Ticker, Timer};
use segtimer::config::{KEY_QUEUE_DEPTH, KEY_SCAN_INTERVAL_MS};
use segtimer::error::Error;
use segtimer::keypad::debounce::{decode_scan, Debouncer};
use segtimer::keypad::{Key, COLS, ROWS};

/// Producer side of the debounced-key channel.
pub type KeySender = Sender<'static, CriticalSectionRawMutex, Key, KEY_QUEUE_DEPTH>;

/// Column settle time after driving a column low.
const COLUMN_SETTLE: Duration = Duration::from_micros(20);

/// Matrix pins.
pub struct Matrix {
    rows: [Input<'static>; ROWS],
    cols: [Output<'static>; COLS],
}

impl Matrix {
    /// `rows` must be configured with pull-ups, `cols` must start high.
    pub fn new(rows: [Input<'static>; ROWS], cols: [Output<'static>; COLS]) -> Self {
        Self { rows, cols }
    }

    /// One full pass over the columns. Returns the first pressed key.
    pub async fn scan(&mut self) -> Option<Key> {
        for col in 0..COLS {
            self.cols[col].set_low();
            Timer::after(COLUMN_SETTLE).await;

            let row_bits = self
                .rows
                .iter()
                .enumerate()
                .fold(0u8, |bits, (row, pin)| {
                    if pin.is_high() {
                        bits | (1 << row)
                    } else {
                        bits
                    }
                });
            self.cols[col].set_high();

            if let Some(key) = decode_scan(col, row_bits) {
                return Some(key);
            }
        }
        None
    }
}

/// Scan the matrix forever, sending each debounced press to `tx`.
///
/// Keys are never held back waiting for the consumer: if the channel is
/// full the press is dropped and logged.
pub async fn scan_task(mut matrix: Matrix, tx: KeySender) -> ! {
    let mut debouncer = Debouncer::new();
    let mut ticker = Ticker::every(Duration::from_millis(KEY_SCAN_INTERVAL_MS));

    loop {
        let raw = matrix.scan().await;
        if let Some(key) = debouncer.update(raw, Instant::now().as_millis()) {
            info!("Keypad: {}", key);
            if tx.try_send(key).is_err() {
                warn!("Keypad: {}", Error::ChannelFull);
            }
        }
        ticker.next().await;
    }
}
