#![no_std]
//! Driver for JHD1313 character displays (sold as "Grove 16x2 LCD RGB Backlight") connected
//! via i2c. The module carries two chips on one bus: an HD44780-compatible character
//! controller at `0x3e` and a separate RGB backlight driver whose address depends on the
//! hardware revision. The backlight chip is probed during [`sync_lcd::Lcd::init`], no
//! configuration needed. It requires an I2C instance implementing
//! [`embedded_hal::i2c::I2c`] and an instance to delay execution with
//! [`embedded_hal::delay::DelayNs`].
//!
//! Usage:
//! ```ignore
//! // Create an I2C instance, needs to implement embedded_hal::i2c::I2c, this
//! // particular uses the rp2040-hal crate for the Raspberry Pi Pico.
//! let mut i2c = rp2040_hal::I2C::i2c0(
//!     dp.I2C0,
//!     sda_pin, // use respective pins
//!     scl_pin,
//!     100.kHz(),
//!     &mut dp.RESETS,
//!     125_000_000.Hz(),
//! );
//! let mut delay = cortex_m::delay::Delay::new(core.SYST, 125_000_000);
//!
//! let mut lcd = lcd_jhd1313_i2c::sync_lcd::Lcd::new(&mut i2c, &mut delay).init().unwrap();
//! lcd.set_rgb(0, 128, 64).unwrap();
//! lcd.write_str("Hello world!").unwrap();
//! ```
//!
//! Unlike backpack-style displays, the JHD1313 speaks the HD44780 command set over plain
//! 2-byte i2c frames: `[0x80, command]` for commands and `[0x40, data]` for character
//! data, always in 8 bit mode. Transmissions are fire and forget by default; see
//! [`sync_lcd::Lcd::with_strict_errors`] for surfacing bus errors instead.

#[cfg(feature = "async")]
pub mod async_lcd;
pub mod sync_lcd;

/// Bus address of the character controller (`0x7c` on the wire).
pub const LCD_ADDRESS: u8 = 0x7c >> 1;
/// Bus address of the backlight driver on boards up to V4.0 (`0xc4` on the wire).
pub const RGB_ADDRESS: u8 = 0xc4 >> 1;
/// Bus address of the backlight driver fitted from board revision V5.0 on.
pub const RGB_ADDRESS_V5: u8 = 0x30;

// Control byte prefixed to every frame sent to the character controller.
pub(crate) const CMD_PREFIX: u8 = 0x80;
pub(crate) const DATA_PREFIX: u8 = 0x40;

#[repr(u8)]
#[derive(Copy, Clone)]
pub(crate) enum Commands {
    Clear = 0x01,
    ReturnHome = 0x02,
    EntryModeSet = 0x04,
    DisplayControl = 0x08,
    CursorShift = 0x10,
    FunctionSet = 0x20,
    SetCgramAddr = 0x40,
}

// flags for display entry mode
pub(crate) const ENTRY_LEFT: u8 = 0x02;
pub(crate) const ENTRY_SHIFT_INCREMENT: u8 = 0x01;

// flags for display on/off control
pub(crate) const DISPLAY_ON: u8 = 0x04;
pub(crate) const CURSOR_ON: u8 = 0x02;
pub(crate) const BLINK_ON: u8 = 0x01;

// flags for display/cursor shift
pub(crate) const DISPLAY_MOVE: u8 = 0x08;
pub(crate) const MOVE_RIGHT: u8 = 0x04;
pub(crate) const MOVE_LEFT: u8 = 0x00;

// flags for function set
pub(crate) const TWO_LINE: u8 = 0x08;

// registers of the legacy backlight driver
pub(crate) const REG_MODE1: u8 = 0x00;
pub(crate) const REG_MODE2: u8 = 0x01;
pub(crate) const REG_OUTPUT: u8 = 0x08;

/// Backlight driver fitted on the board, detected once during init and cached.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RgbChip {
    /// Driver found on board revisions up to V4.0, at [`RGB_ADDRESS`].
    Legacy,
    /// Driver found on board revision V5.0, at [`RGB_ADDRESS_V5`].
    V5,
}

impl RgbChip {
    /// Bus address of this driver variant.
    pub const fn address(self) -> u8 {
        match self {
            RgbChip::Legacy => RGB_ADDRESS,
            RgbChip::V5 => RGB_ADDRESS_V5,
        }
    }

    /// PWM registers driving the red, green and blue channels, in that order.
    /// The register order is reversed between the two variants.
    pub(crate) const fn rgb_registers(self) -> [u8; 3] {
        match self {
            RgbChip::Legacy => [0x04, 0x03, 0x02],
            RgbChip::V5 => [0x06, 0x07, 0x08],
        }
    }
}

/// Backlight colors addressable through a single PWM level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    White,
    Red,
    Green,
    Blue,
}

// Preset colors for `set_color`, indexed white, red, green, blue.
pub(crate) const COLOR_DEFINE: [[u8; 3]; 4] = [
    [255, 255, 255],
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
];
