//! SSD1306 OLED status line.
//!
//! Three text rows inside the visible window of the glass:
//! status label, `m:ss` clock (running modes only), key log.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use segtimer::config::{OLED_OFFSET_X, OLED_OFFSET_Y};
use segtimer::error::Error;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Text row baselines relative to the window origin.
const ROW_LABEL: i32 = 4;
const ROW_CLOCK: i32 = 16;
const ROW_LOG: i32 = 28;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Result<Display<I2C>, Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init().map_err(|_| Error::Display)?;
    display.clear_buffer();
    display.flush().map_err(|_| Error::Display)?;
    Ok(display)
}

fn text_style() -> embedded_graphics::mono_font::MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

fn at(row: i32) -> Point {
    Point::new(OLED_OFFSET_X + 4, OLED_OFFSET_Y + row)
}

/// Render the status screen.
pub fn draw_status<I2C>(
    display: &mut Display<I2C>,
    label: &str,
    clock: Option<&str>,
    key_log: &str,
) -> Result<(), Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    display.clear_buffer();

    let _ = Text::new(label, at(ROW_LABEL), text_style()).draw(display);
    if let Some(clock) = clock {
        let _ = Text::new(clock, at(ROW_CLOCK), text_style()).draw(display);
    }
    let _ = Text::new(key_log, at(ROW_LOG), text_style()).draw(display);

    display.flush().map_err(|_| Error::Display)
}
