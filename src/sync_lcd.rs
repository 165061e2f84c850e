use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use ufmt_write::uWrite;

use crate::{
    Color, Commands, RgbChip, BLINK_ON, CMD_PREFIX, COLOR_DEFINE, CURSOR_ON, DATA_PREFIX,
    DISPLAY_MOVE, DISPLAY_ON, ENTRY_LEFT, ENTRY_SHIFT_INCREMENT, LCD_ADDRESS, MOVE_LEFT,
    MOVE_RIGHT, REG_MODE1, REG_MODE2, REG_OUTPUT, RGB_ADDRESS_V5, TWO_LINE,
};

/// API to write to the LCD and control its RGB backlight.
pub struct Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    i2c: &'a mut I,
    delay: &'a mut D,
    rgb_chip: RgbChip,
    display_function: u8,
    display_control: u8,
    display_mode: u8,
    strict: bool,
}

impl<'a, I, D> Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Create new instance with only the I2C and delay instance.
    pub fn new(i2c: &'a mut I, delay: &'a mut D) -> Self {
        Self {
            i2c,
            delay,
            rgb_chip: RgbChip::Legacy,
            display_function: 0,
            display_control: 0,
            display_mode: 0,
            strict: false,
        }
    }

    /// Surface transport errors to the caller instead of dropping them.
    ///
    /// By default every transmission is fire and forget: a failed bus write is
    /// treated as success and the in-memory flags are committed regardless.
    pub fn with_strict_errors(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Initializes the hardware.
    ///
    /// Runs the bring-up sequence from the HD44780 datasheet (page 45 figure 23)
    /// and probes which backlight driver is fitted. Must complete before any other
    /// operation is meaningful. Re-running it is safe but repeats all delays.
    pub fn init(mut self) -> Result<Self, I::Error> {
        self.display_function |= TWO_LINE;

        // Datasheet wants at least 40ms after power rises above 2.7V before
        // sending commands. Sleep for 50ms just to be sure.
        self.delay.delay_ms(50);

        // The controller may still be in its power-on 8 bit boot state and needs
        // the function set command repeated to resynchronize.
        let function_set = Commands::FunctionSet as u8 | self.display_function;
        self.command(function_set)?;
        self.delay.delay_us(4500);
        self.command(function_set)?;
        self.delay.delay_us(150);
        self.command(function_set)?;
        // Fourth write latches line count and font.
        self.command(function_set)?;

        // Display on with no cursor or blinking by default.
        self.display_control = DISPLAY_ON;
        self.command(Commands::DisplayControl as u8 | self.display_control)?;

        self.clear()?;

        // Default text direction for romance languages.
        self.display_mode = ENTRY_LEFT;
        self.command(Commands::EntryModeSet as u8 | self.display_mode)?;

        // Only the V5 revision answers on 0x30, so one read tells the chips apart.
        let mut scratch = [0u8; 1];
        if self.i2c.read(RGB_ADDRESS_V5, &mut scratch).is_ok() {
            self.rgb_chip = RgbChip::V5;
            self.set_reg(0x00, 0x07)?; // reset the chip
            self.delay.delay_us(200); // wait for the reset to complete
            self.set_reg(0x04, 0x15)?; // set all leds always on
        } else {
            self.rgb_chip = RgbChip::Legacy;
            self.set_reg(REG_MODE1, 0x00)?;
            // Leds controllable by both PWM and GRPPWM registers.
            self.set_reg(REG_OUTPUT, 0xff)?;
            // DMBLNK set, group control dims by blinking.
            self.set_reg(REG_MODE2, 0x20)?;
        }

        self.set_color_white()?;
        Ok(self)
    }

    /// Backlight driver detected during [`Lcd::init`].
    pub fn rgb_chip(&self) -> RgbChip {
        self.rgb_chip
    }

    /// Send one command byte to the character controller.
    fn command(&mut self, value: u8) -> Result<(), I::Error> {
        let res = self.i2c.write(LCD_ADDRESS, &[CMD_PREFIX, value]);
        self.guard(res)
    }

    /// Write one register of the backlight driver.
    fn set_reg(&mut self, reg: u8, value: u8) -> Result<(), I::Error> {
        let res = self.i2c.write(self.rgb_chip.address(), &[reg, value]);
        self.guard(res)
    }

    /// Drop transport errors unless strict error reporting was requested.
    fn guard(&self, res: Result<(), I::Error>) -> Result<(), I::Error> {
        match res {
            Err(e) if self.strict => Err(e),
            _ => Ok(()),
        }
    }

    /// Clear the display and reset the cursor position to zero.
    pub fn clear(&mut self) -> Result<(), I::Error> {
        self.command(Commands::Clear as u8)?;
        self.delay.delay_us(2000); // this command takes a long time
        Ok(())
    }

    /// Return the cursor to the upper left corner, i.e. (0,0).
    pub fn return_home(&mut self) -> Result<(), I::Error> {
        self.command(Commands::ReturnHome as u8)?;
        self.delay.delay_us(2000); // this command takes a long time
        Ok(())
    }

    /// Set the cursor to (col, row). Coordinates are zero-based.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), I::Error> {
        let addr = if row == 0 { col | 0x80 } else { col | 0xc0 };
        let res = self.i2c.write(LCD_ADDRESS, &[CMD_PREFIX, addr]);
        self.guard(res)
    }

    /// Turn the display on or off (quickly).
    pub fn show_display(&mut self, on: bool) -> Result<(), I::Error> {
        let control = if on {
            self.display_control | DISPLAY_ON
        } else {
            self.display_control & !DISPLAY_ON
        };
        self.command(Commands::DisplayControl as u8 | control)?;
        self.display_control = control;
        Ok(())
    }

    /// Turn the underline cursor on or off.
    pub fn show_cursor(&mut self, on: bool) -> Result<(), I::Error> {
        let control = if on {
            self.display_control | CURSOR_ON
        } else {
            self.display_control & !CURSOR_ON
        };
        self.command(Commands::DisplayControl as u8 | control)?;
        self.display_control = control;
        Ok(())
    }

    /// Turn cursor blinking on or off.
    pub fn blink_cursor(&mut self, on: bool) -> Result<(), I::Error> {
        let control = if on {
            self.display_control | BLINK_ON
        } else {
            self.display_control & !BLINK_ON
        };
        self.command(Commands::DisplayControl as u8 | control)?;
        self.display_control = control;
        Ok(())
    }

    /// Scroll the display contents to the left without changing the RAM.
    pub fn scroll_display_left(&mut self) -> Result<(), I::Error> {
        self.command(Commands::CursorShift as u8 | DISPLAY_MOVE | MOVE_LEFT)
    }

    /// Scroll the display contents to the right without changing the RAM.
    pub fn scroll_display_right(&mut self) -> Result<(), I::Error> {
        self.command(Commands::CursorShift as u8 | DISPLAY_MOVE | MOVE_RIGHT)
    }

    /// Text flows left to right.
    pub fn left_to_right(&mut self) -> Result<(), I::Error> {
        let mode = self.display_mode | ENTRY_LEFT;
        self.command(Commands::EntryModeSet as u8 | mode)?;
        self.display_mode = mode;
        Ok(())
    }

    /// Text flows right to left.
    pub fn right_to_left(&mut self) -> Result<(), I::Error> {
        let mode = self.display_mode & !ENTRY_LEFT;
        self.command(Commands::EntryModeSet as u8 | mode)?;
        self.display_mode = mode;
        Ok(())
    }

    /// Shift the display on every write, 'right justifying' text from the cursor.
    pub fn autoscroll(&mut self, on: bool) -> Result<(), I::Error> {
        let mode = if on {
            self.display_mode | ENTRY_SHIFT_INCREMENT
        } else {
            self.display_mode & !ENTRY_SHIFT_INCREMENT
        };
        self.command(Commands::EntryModeSet as u8 | mode)?;
        self.display_mode = mode;
        Ok(())
    }

    /// Fill one of the 8 CGRAM slots with a custom character.
    ///
    /// The slot is masked to the valid range, so slot 9 ends up in slot 1.
    pub fn create_char(&mut self, slot: u8, charmap: [u8; 8]) -> Result<(), I::Error> {
        let slot = slot & 0x7; // we only have 8 slots 0-7
        self.command(Commands::SetCgramAddr as u8 | (slot << 3))?;
        let mut frame = [DATA_PREFIX; 9];
        frame[1..].copy_from_slice(&charmap);
        let res = self.i2c.write(LCD_ADDRESS, &frame);
        self.guard(res)
    }

    /// Write one byte to the current cursor position.
    ///
    /// Reports one byte written, regardless of the transport outcome.
    pub fn write_byte(&mut self, data: u8) -> Result<usize, I::Error> {
        let res = self.i2c.write(LCD_ADDRESS, &[DATA_PREFIX, data]);
        self.guard(res)?;
        Ok(1)
    }

    /// Write a string to the display.
    pub fn write_str(&mut self, data: &str) -> Result<(), I::Error> {
        for c in data.chars() {
            self.write_byte(c as u8)?;
        }
        Ok(())
    }

    /// Set the backlight color. 255 is full brightness per channel.
    pub fn set_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<(), I::Error> {
        let [reg_r, reg_g, reg_b] = self.rgb_chip.rgb_registers();
        self.set_reg(reg_r, r)?;
        self.set_reg(reg_g, g)?;
        self.set_reg(reg_b, b)
    }

    /// Set one color channel to the given PWM level, all others off.
    /// [`Color::White`] sets all three channels to the level.
    pub fn set_pwm(&mut self, color: Color, level: u8) -> Result<(), I::Error> {
        match color {
            Color::White => self.set_rgb(level, level, level),
            Color::Red => self.set_rgb(level, 0, 0),
            Color::Green => self.set_rgb(0, level, 0),
            Color::Blue => self.set_rgb(0, 0, level),
        }
    }

    /// Set the backlight to one of the presets white, red, green, blue (0-3).
    /// Indices out of range are silently ignored.
    pub fn set_color(&mut self, color: u8) -> Result<(), I::Error> {
        if color > 3 {
            return Ok(());
        }
        let [r, g, b] = COLOR_DEFINE[color as usize];
        self.set_rgb(r, g, b)
    }

    /// Turn all backlight channels off.
    pub fn set_color_all_off(&mut self) -> Result<(), I::Error> {
        self.set_rgb(0, 0, 0)
    }

    /// Full white backlight.
    pub fn set_color_white(&mut self) -> Result<(), I::Error> {
        self.set_rgb(255, 255, 255)
    }

    /// Blink the backlight at roughly one second period, half on and half off.
    pub fn blink_backlight(&mut self) -> Result<(), I::Error> {
        match self.rgb_chip {
            RgbChip::V5 => {
                // Attach all leds to pwm1.
                // Blink period in seconds = (<reg 1> + 2) * 0.128s,
                // pwm1 on/off ratio = <reg 2> / 256.
                self.set_reg(0x04, 0x2a)?;
                self.set_reg(0x01, 0x06)?; // blink every second
                self.set_reg(0x02, 0x7f) // half on, half off
            }
            RgbChip::Legacy => {
                // Blink period in seconds = (<reg 7> + 1) / 24,
                // on/off ratio = <reg 6> / 256.
                self.set_reg(0x07, 0x17)?; // blink every second
                self.set_reg(0x06, 0x7f) // half on, half off
            }
        }
    }

    /// Stop blinking the backlight.
    pub fn stop_blink_backlight(&mut self) -> Result<(), I::Error> {
        match self.rgb_chip {
            RgbChip::V5 => self.set_reg(0x04, 0x15),
            RgbChip::Legacy => {
                self.set_reg(0x07, 0x00)?;
                self.set_reg(0x06, 0xff)
            }
        }
    }
}

impl<'a, I, D> uWrite for Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = I::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::{RGB_ADDRESS, RGB_ADDRESS_V5};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    /// An `Lcd` in the state `init` leaves it in, with the given backlight chip.
    fn ready_lcd<'a>(
        i2c: &'a mut I2cMock,
        delay: &'a mut NoopDelay,
        chip: RgbChip,
    ) -> Lcd<'a, I2cMock, NoopDelay> {
        Lcd {
            i2c,
            delay,
            rgb_chip: chip,
            display_function: TWO_LINE,
            display_control: DISPLAY_ON,
            display_mode: ENTRY_LEFT,
            strict: false,
        }
    }

    #[test]
    fn init_with_legacy_backlight() {
        let expected = std::vec![
            // Function set (0x20 | two line 0x08) repeated four times before
            // anything else touches the controller.
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x28]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x28]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x28]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x28]),
            // Display control: display on, cursor off, blink off.
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x0c]),
            // Clear display.
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x01]),
            // Entry mode: left to right, shift decrement.
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x06]),
            // Probe fails, so the legacy chip is assumed.
            I2cTransaction::read(RGB_ADDRESS_V5, std::vec![0x00])
                .with_error(ErrorKind::Other),
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x00, 0x00]),
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x08, 0xff]),
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x01, 0x20]),
            // White preset, legacy register order r/g/b = 0x04/0x03/0x02.
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x04, 0xff]),
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x03, 0xff]),
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x02, 0xff]),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let lcd = Lcd::new(&mut i2c, &mut delay).init().unwrap();
        assert_eq!(lcd.rgb_chip(), RgbChip::Legacy);

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn init_with_v5_backlight() {
        let expected = std::vec![
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x28]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x28]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x28]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x28]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x0c]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x01]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x06]),
            // Probe answers, so this is the V5 chip.
            I2cTransaction::read(RGB_ADDRESS_V5, std::vec![0x00]),
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x00, 0x07]),
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x04, 0x15]),
            // White preset, V5 register order r/g/b = 0x06/0x07/0x08.
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x06, 0xff]),
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x07, 0xff]),
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x08, 0xff]),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let lcd = Lcd::new(&mut i2c, &mut delay).init().unwrap();
        assert_eq!(lcd.rgb_chip(), RgbChip::V5);

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn set_cursor_encodes_ddram_address() {
        let expected = std::vec![
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x85]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0xc5]),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        lcd.set_cursor(5, 0).unwrap();
        lcd.set_cursor(5, 1).unwrap();

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn display_toggle_round_trips() {
        let expected = std::vec![
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x08]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x0c]),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        lcd.show_display(false).unwrap();
        lcd.show_display(true).unwrap();
        assert_eq!(lcd.display_control, DISPLAY_ON);

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn cursor_and_blink_toggles_accumulate() {
        let expected = std::vec![
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x0e]), // + cursor
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x0f]), // + blink
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x0d]), // - cursor
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x0c]), // - blink
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        lcd.show_cursor(true).unwrap();
        lcd.blink_cursor(true).unwrap();
        lcd.show_cursor(false).unwrap();
        lcd.blink_cursor(false).unwrap();
        assert_eq!(lcd.display_control, DISPLAY_ON);

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn entry_mode_toggles_round_trip() {
        let expected = std::vec![
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x04]), // right to left
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x06]), // left to right
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x07]), // autoscroll on
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x06]), // autoscroll off
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        lcd.right_to_left().unwrap();
        lcd.left_to_right().unwrap();
        lcd.autoscroll(true).unwrap();
        lcd.autoscroll(false).unwrap();
        assert_eq!(lcd.display_mode, ENTRY_LEFT);

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn scroll_is_one_shot() {
        let expected = std::vec![
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x18]),
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x1c]),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        lcd.scroll_display_left().unwrap();
        lcd.scroll_display_right().unwrap();

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn create_char_masks_slot_to_valid_range() {
        let charmap = [0x0e, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11, 0x00];
        // Slot 9 masks down to slot 1, so both emit the same frames.
        for slot in [1u8, 9u8] {
            let expected = std::vec![
                I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x48]),
                I2cTransaction::write(
                    LCD_ADDRESS,
                    std::vec![0x40, 0x0e, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11, 0x00],
                ),
            ];
            let mut i2c = I2cMock::new(&expected);
            let mut delay = NoopDelay::new();

            let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
            lcd.create_char(slot, charmap).unwrap();

            drop(lcd);
            i2c.done();
        }
    }

    #[test]
    fn write_byte_reports_one_byte() {
        let expected = std::vec![I2cTransaction::write(LCD_ADDRESS, std::vec![0x40, b'A'])];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        assert_eq!(lcd.write_byte(b'A').unwrap(), 1);

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn preset_color_lookup_uses_active_register_map() {
        let expected = std::vec![
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x04, 0x00]),
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x03, 0xff]),
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x02, 0x00]),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        lcd.set_color(2).unwrap(); // green

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn preset_color_out_of_range_is_a_noop() {
        let mut i2c = I2cMock::new(&[]);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        lcd.set_color(4).unwrap();

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn set_pwm_zeroes_the_other_channels() {
        let expected = std::vec![
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x06, 0x00]),
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x07, 128]),
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x08, 0x00]),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::V5);
        lcd.set_pwm(Color::Green, 128).unwrap();

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn blink_backlight_per_chip_registers() {
        let expected = std::vec![
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x04, 0x2a]),
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x01, 0x06]),
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x02, 0x7f]),
            I2cTransaction::write(RGB_ADDRESS_V5, std::vec![0x04, 0x15]),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::V5);
        lcd.blink_backlight().unwrap();
        lcd.stop_blink_backlight().unwrap();

        drop(lcd);
        i2c.done();

        let expected = std::vec![
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x07, 0x17]),
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x06, 0x7f]),
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x07, 0x00]),
            I2cTransaction::write(RGB_ADDRESS, std::vec![0x06, 0xff]),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        lcd.blink_backlight().unwrap();
        lcd.stop_blink_backlight().unwrap();

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn transport_errors_are_dropped_by_default() {
        let expected = std::vec![
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x01]).with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        assert!(lcd.clear().is_ok());

        drop(lcd);
        i2c.done();
    }

    #[test]
    fn strict_mode_surfaces_transport_errors() {
        let expected = std::vec![
            I2cTransaction::write(LCD_ADDRESS, std::vec![0x80, 0x01]).with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();

        let mut lcd = ready_lcd(&mut i2c, &mut delay, RgbChip::Legacy);
        lcd.strict = true;
        assert!(lcd.clear().is_err());

        drop(lcd);
        i2c.done();
    }
}
