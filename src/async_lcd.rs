use embedded_hal_async::{delay::DelayNs, i2c::I2c};

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
    pub async fn init(mut self) -> Result<Self, I::Error> {
        self.display_function |= TWO_LINE;

        // Datasheet wants at least 40ms after power rises above 2.7V before
        // sending commands. Sleep for 50ms just to be sure.
        self.delay.delay_ms(50).await;

        // The controller may still be in its power-on 8 bit boot state and needs
        // the function set command repeated to resynchronize.
        let function_set = Commands::FunctionSet as u8 | self.display_function;
        self.command(function_set).await?;
        self.delay.delay_us(4500).await;
        self.command(function_set).await?;
        self.delay.delay_us(150).await;
        self.command(function_set).await?;
        // Fourth write latches line count and font.
        self.command(function_set).await?;

        // Display on with no cursor or blinking by default.
        self.display_control = DISPLAY_ON;
        self.command(Commands::DisplayControl as u8 | self.display_control)
            .await?;

        self.clear().await?;

        // Default text direction for romance languages.
        self.display_mode = ENTRY_LEFT;
        self.command(Commands::EntryModeSet as u8 | self.display_mode)
            .await?;

        // Only the V5 revision answers on 0x30, so one read tells the chips apart.
        let mut scratch = [0u8; 1];
        if self.i2c.read(RGB_ADDRESS_V5, &mut scratch).await.is_ok() {
            self.rgb_chip = RgbChip::V5;
            self.set_reg(0x00, 0x07).await?; // reset the chip
            self.delay.delay_us(200).await; // wait for the reset to complete
            self.set_reg(0x04, 0x15).await?; // set all leds always on
        } else {
            self.rgb_chip = RgbChip::Legacy;
            self.set_reg(REG_MODE1, 0x00).await?;
            // Leds controllable by both PWM and GRPPWM registers.
            self.set_reg(REG_OUTPUT, 0xff).await?;
            // DMBLNK set, group control dims by blinking.
            self.set_reg(REG_MODE2, 0x20).await?;
        }

        self.set_color_white().await?;
        Ok(self)
    }

    /// Backlight driver detected during [`Lcd::init`].
    pub fn rgb_chip(&self) -> RgbChip {
        self.rgb_chip
    }

    /// Send one command byte to the character controller.
    async fn command(&mut self, value: u8) -> Result<(), I::Error> {
        let res = self.i2c.write(LCD_ADDRESS, &[CMD_PREFIX, value]).await;
        self.guard(res)
    }

    /// Write one register of the backlight driver.
    async fn set_reg(&mut self, reg: u8, value: u8) -> Result<(), I::Error> {
        let res = self.i2c.write(self.rgb_chip.address(), &[reg, value]).await;
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
    pub async fn clear(&mut self) -> Result<(), I::Error> {
        self.command(Commands::Clear as u8).await?;
        self.delay.delay_us(2000).await; // this command takes a long time
        Ok(())
    }

    /// Return the cursor to the upper left corner, i.e. (0,0).
    pub async fn return_home(&mut self) -> Result<(), I::Error> {
        self.command(Commands::ReturnHome as u8).await?;
        self.delay.delay_us(2000).await; // this command takes a long time
        Ok(())
    }

    /// Set the cursor to (col, row). Coordinates are zero-based.
    pub async fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), I::Error> {
        let addr = if row == 0 { col | 0x80 } else { col | 0xc0 };
        let res = self.i2c.write(LCD_ADDRESS, &[CMD_PREFIX, addr]).await;
        self.guard(res)
    }

    /// Turn the display on or off (quickly).
    pub async fn show_display(&mut self, on: bool) -> Result<(), I::Error> {
        let control = if on {
            self.display_control | DISPLAY_ON
        } else {
            self.display_control & !DISPLAY_ON
        };
        self.command(Commands::DisplayControl as u8 | control).await?;
        self.display_control = control;
        Ok(())
    }

    /// Turn the underline cursor on or off.
    pub async fn show_cursor(&mut self, on: bool) -> Result<(), I::Error> {
        let control = if on {
            self.display_control | CURSOR_ON
        } else {
            self.display_control & !CURSOR_ON
        };
        self.command(Commands::DisplayControl as u8 | control).await?;
        self.display_control = control;
        Ok(())
    }

    /// Turn cursor blinking on or off.
    pub async fn blink_cursor(&mut self, on: bool) -> Result<(), I::Error> {
        let control = if on {
            self.display_control | BLINK_ON
        } else {
            self.display_control & !BLINK_ON
        };
        self.command(Commands::DisplayControl as u8 | control).await?;
        self.display_control = control;
        Ok(())
    }

    /// Scroll the display contents to the left without changing the RAM.
    pub async fn scroll_display_left(&mut self) -> Result<(), I::Error> {
        self.command(Commands::CursorShift as u8 | DISPLAY_MOVE | MOVE_LEFT)
            .await
    }

    /// Scroll the display contents to the right without changing the RAM.
    pub async fn scroll_display_right(&mut self) -> Result<(), I::Error> {
        self.command(Commands::CursorShift as u8 | DISPLAY_MOVE | MOVE_RIGHT)
            .await
    }

    /// Text flows left to right.
    pub async fn left_to_right(&mut self) -> Result<(), I::Error> {
        let mode = self.display_mode | ENTRY_LEFT;
        self.command(Commands::EntryModeSet as u8 | mode).await?;
        self.display_mode = mode;
        Ok(())
    }

    /// Text flows right to left.
    pub async fn right_to_left(&mut self) -> Result<(), I::Error> {
        let mode = self.display_mode & !ENTRY_LEFT;
        self.command(Commands::EntryModeSet as u8 | mode).await?;
        self.display_mode = mode;
        Ok(())
    }

    /// Shift the display on every write, 'right justifying' text from the cursor.
    pub async fn autoscroll(&mut self, on: bool) -> Result<(), I::Error> {
        let mode = if on {
            self.display_mode | ENTRY_SHIFT_INCREMENT
        } else {
            self.display_mode & !ENTRY_SHIFT_INCREMENT
        };
        self.command(Commands::EntryModeSet as u8 | mode).await?;
        self.display_mode = mode;
        Ok(())
    }

    /// Fill one of the 8 CGRAM slots with a custom character.
    ///
    /// The slot is masked to the valid range, so slot 9 ends up in slot 1.
    pub async fn create_char(&mut self, slot: u8, charmap: [u8; 8]) -> Result<(), I::Error> {
        let slot = slot & 0x7; // we only have 8 slots 0-7
        self.command(Commands::SetCgramAddr as u8 | (slot << 3))
            .await?;
        let mut frame = [DATA_PREFIX; 9];
        frame[1..].copy_from_slice(&charmap);
        let res = self.i2c.write(LCD_ADDRESS, &frame).await;
        self.guard(res)
    }

    /// Write one byte to the current cursor position.
    ///
    /// Reports one byte written, regardless of the transport outcome.
    pub async fn write_byte(&mut self, data: u8) -> Result<usize, I::Error> {
        let res = self.i2c.write(LCD_ADDRESS, &[DATA_PREFIX, data]).await;
        self.guard(res)?;
        Ok(1)
    }

    /// Write a string to the display.
    pub async fn write_str(&mut self, data: &str) -> Result<(), I::Error> {
        for c in data.chars() {
            self.write_byte(c as u8).await?;
        }
        Ok(())
    }

    /// Set the backlight color. 255 is full brightness per channel.
    pub async fn set_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<(), I::Error> {
        let [reg_r, reg_g, reg_b] = self.rgb_chip.rgb_registers();
        self.set_reg(reg_r, r).await?;
        self.set_reg(reg_g, g).await?;
        self.set_reg(reg_b, b).await
    }

    /// Set one color channel to the given PWM level, all others off.
    /// [`Color::White`] sets all three channels to the level.
    pub async fn set_pwm(&mut self, color: Color, level: u8) -> Result<(), I::Error> {
        match color {
            Color::White => self.set_rgb(level, level, level).await,
            Color::Red => self.set_rgb(level, 0, 0).await,
            Color::Green => self.set_rgb(0, level, 0).await,
            Color::Blue => self.set_rgb(0, 0, level).await,
        }
    }

    /// Set the backlight to one of the presets white, red, green, blue (0-3).
    /// Indices out of range are silently ignored.
    pub async fn set_color(&mut self, color: u8) -> Result<(), I::Error> {
        if color > 3 {
            return Ok(());
        }
        let [r, g, b] = COLOR_DEFINE[color as usize];
        self.set_rgb(r, g, b).await
    }

    /// Turn all backlight channels off.
    pub async fn set_color_all_off(&mut self) -> Result<(), I::Error> {
        self.set_rgb(0, 0, 0).await
    }

    /// Full white backlight.
    pub async fn set_color_white(&mut self) -> Result<(), I::Error> {
        self.set_rgb(255, 255, 255).await
    }

    /// Blink the backlight at roughly one second period, half on and half off.
    pub async fn blink_backlight(&mut self) -> Result<(), I::Error> {
        match self.rgb_chip {
            RgbChip::V5 => {
                // Attach all leds to pwm1.
                // Blink period in seconds = (<reg 1> + 2) * 0.128s,
                // pwm1 on/off ratio = <reg 2> / 256.
                self.set_reg(0x04, 0x2a).await?;
                self.set_reg(0x01, 0x06).await?; // blink every second
                self.set_reg(0x02, 0x7f).await // half on, half off
            }
            RgbChip::Legacy => {
                // Blink period in seconds = (<reg 7> + 1) / 24,
                // on/off ratio = <reg 6> / 256.
                self.set_reg(0x07, 0x17).await?; // blink every second
                self.set_reg(0x06, 0x7f).await // half on, half off
            }
        }
    }

    /// Stop blinking the backlight.
    pub async fn stop_blink_backlight(&mut self) -> Result<(), I::Error> {
        match self.rgb_chip {
            RgbChip::V5 => self.set_reg(0x04, 0x15).await,
            RgbChip::Legacy => {
                self.set_reg(0x07, 0x00).await?;
                self.set_reg(0x06, 0xff).await
            }
        }
    }
}
