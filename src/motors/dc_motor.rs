// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Single DC motor driven by one PWM channel and one direction pin.
//!
//! Speed is open-loop: the command frequency becomes the PWM output frequency at 50% duty. The
//! sign selects the level of the direction pin. Zero parks the PWM pin as a plain output, which
//! silences the motor without touching the PWM registers.
//!
//! Startup (in order):
//! 1. bring up the PWM clock (kill, divisor, enable, with settle delays)
//! 2. PWM pin → alt0, direction pin → output
//! 3. enable the PWM controller in mark-space mode
//!
//! Per command:
//! 1. parse the frequency
//! 2. drive the direction pin high (forward), regardless of sign
//! 3. zero → PWM pin to output; otherwise PWM pin to alt0, direction pin by sign, program the
//!    range/data pair for `|freq|`

use core::fmt;

use embedded_hal::delay::DelayNs;
use tracing::{debug, info, warn};

use crate::hw::{self, pwm, Channel, ClockConfig, GpioFunction, MotorPins, Peripherals};
use crate::hw::{PwmCounts, RegisterRegion};
use crate::protocol::{parse_signed_frequency, Direction, FrequencyCommand};
use crate::protocol::{TransferError, UserBuffer};

/// Error type for `DcMotor` operations.
#[derive(Debug)]
pub enum Error {
    /// Register access or hardware configuration failed.
    Hw(hw::Error),
    /// The command bytes could not be read.
    Transfer(TransferError),
}

impl From<hw::Error> for Error {
    fn from(e: hw::Error) -> Self {
        Error::Hw(e)
    }
}

impl From<TransferError> for Error {
    fn from(e: TransferError) -> Self {
        Error::Transfer(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Hw(e) => e.fmt(f),
            Error::Transfer(e) => e.fmt(f),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Hw(e) => Some(e),
            Error::Transfer(e) => Some(e),
        }
    }
}

/// Board-level configuration for one motor.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct MotorConfig {
    pub pins: MotorPins,
    pub channel: Channel,
    pub clock: ClockConfig,
}

/// Hardware state after a command.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Drive {
    Stopped,
    Running {
        direction: Direction,
        counts: PwmCounts,
    },
}

/// DC motor bound to a started hardware context.
///
/// Only [`DcMotor::start`] creates one, so the clock bring-up has always run exactly once before
/// the first command.
pub struct DcMotor<R> {
    hw: Peripherals<R>,
    config: MotorConfig,
}

impl<R: RegisterRegion> DcMotor<R> {
    /// Run the startup sequence and take ownership of the hardware.
    ///
    /// Blocks for the clock settle time twice.
    pub fn start<D: DelayNs>(
        mut hw: Peripherals<R>,
        config: MotorConfig,
        delay: &mut D,
    ) -> Result<Self, Error> {
        if config.clock.output_hz() != Some(pwm::BASE_CLOCK_HZ) {
            warn!(
                clock = ?config.clock,
                "PWM clock is not 9.6 MHz; output frequencies will not match commands"
            );
        }

        hw.clock.init(&config.clock, delay)?;

        hw.gpio.set_function(config.pins.pwm, GpioFunction::Alt0)?;
        hw.gpio.set_function(config.pins.direction, GpioFunction::Output)?;

        hw.pwm.enable()?;
        let ctrl = hw.pwm.control()?;
        debug!(pwm_ctrl = format_args!("{ctrl:08X}"), "PWM controller enabled");

        info!(
            direction_pin = config.pins.direction,
            pwm_pin = config.pins.pwm,
            "motor driver loaded"
        );

        Ok(Self { hw, config })
    }

    /// Handle one write of `len` bytes from `buf`. Returns the bytes consumed.
    ///
    /// Only the first command (up to and including its `\n`) is used; the caller resubmits the
    /// rest.
    pub fn on_write<B: UserBuffer + ?Sized>(&mut self, buf: &B, len: usize) -> Result<usize, Error> {
        let parsed = parse_signed_frequency(buf, len)?;
        if parsed.invalid > 0 {
            debug!(invalid = parsed.invalid, "skipped invalid bytes in command");
        }

        self.hw.gpio.set_high(self.config.pins.direction)?;
        self.apply(parsed.command)?;

        Ok(parsed.consumed)
    }

    /// Apply a frequency command to the hardware.
    pub fn apply(&mut self, cmd: FrequencyCommand) -> Result<Drive, Error> {
        let freq = cmd.magnitude();
        if freq == 0 {
            self.disable_output()?;
            debug!("PWM output disabled");
            return Ok(Drive::Stopped);
        }

        let pins = self.config.pins;
        self.hw.gpio.set_function(pins.pwm, GpioFunction::Alt0)?;
        match cmd.direction() {
            Direction::Forward => self.hw.gpio.set_high(pins.direction)?,
            Direction::Reverse => self.hw.gpio.set_low(pins.direction)?,
        }

        if freq > pwm::MAX_FREQUENCY_HZ as u32 {
            warn!(
                requested = freq,
                limit = pwm::MAX_FREQUENCY_HZ,
                "frequency above limit, clamping"
            );
        }
        let counts = self.hw.pwm.set_frequency(self.config.channel, freq)?;

        debug!(
            hz = cmd.hz(),
            range = counts.range,
            data = counts.data,
            "motor command applied"
        );

        Ok(Drive::Running {
            direction: cmd.direction(),
            counts,
        })
    }

    /// Park the PWM pin as a plain output, halting the motor.
    pub fn disable_output(&mut self) -> Result<(), Error> {
        self.hw
            .gpio
            .set_function(self.config.pins.pwm, GpioFunction::Output)?;
        Ok(())
    }

    /// Stop the motor.
    pub fn stop(&mut self) -> Result<(), Error> {
        self.disable_output()?;
        info!("motor stopped");
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &MotorConfig {
        &self.config
    }

    #[inline]
    pub fn peripherals(&self) -> &Peripherals<R> {
        &self.hw
    }

    /// Release the hardware. Registers keep their last-written state.
    pub fn free(self) -> Peripherals<R> {
        self.hw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::clock::{self, CLOCK_SPAN};
    use crate::hw::gpio::{self, GPIO_SPAN};
    use crate::hw::pwm::PWM_SPAN;
    use crate::hw::MemRegion;
    use core::cell::RefCell;
    use std::vec;
    use std::vec::Vec;

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn started() -> DcMotor<MemRegion> {
        DcMotor::start(Peripherals::simulated(), MotorConfig::default(), &mut NoDelay).unwrap()
    }

    /// Write log of each block since `mark`, where `mark` is `(gpio, pwm)` log lengths.
    fn marks(m: &DcMotor<MemRegion>) -> (usize, usize) {
        let p = m.peripherals();
        (p.gpio.regs().writes().len(), p.pwm.regs().writes().len())
    }

    fn since(m: &DcMotor<MemRegion>, mark: (usize, usize)) -> (Vec<(usize, u32)>, Vec<(usize, u32)>) {
        let p = m.peripherals();
        (
            p.gpio.regs().writes()[mark.0..].to_vec(),
            p.pwm.regs().writes()[mark.1..].to_vec(),
        )
    }

    #[test]
    fn start_configures_clock_pins_and_controller() {
        let m = started();
        let p = m.peripherals();

        assert_eq!(
            p.clock.regs().writes(),
            &[
                (clock::reg::CM_PWMCTL, 0x5A00_0020),
                (clock::reg::CM_PWMDIV, 0x5A00_2000),
                (clock::reg::CM_PWMCTL, 0x5A00_0011),
            ]
        );
        assert_eq!(p.gpio.function(24).unwrap(), GpioFunction::Output);
        assert_eq!(p.gpio.function(13).unwrap(), GpioFunction::Alt0);
        assert_eq!(p.pwm.regs().writes(), &[(pwm::reg::CTL, 0x8181)]);
    }

    #[derive(Copy, Clone, Debug, PartialEq)]
    enum Block {
        Gpio,
        Pwm,
        Clock,
    }

    struct Tap<'a> {
        block: Block,
        mem: MemRegion,
        log: &'a RefCell<Vec<Block>>,
    }

    impl RegisterRegion for Tap<'_> {
        fn len(&self) -> usize {
            self.mem.len()
        }

        fn read32(&self, offset: usize) -> Result<u32, hw::Error> {
            self.mem.read32(offset)
        }

        fn write32(&mut self, offset: usize, value: u32) -> Result<(), hw::Error> {
            self.log.borrow_mut().push(self.block);
            self.mem.write32(offset, value)
        }
    }

    #[test]
    fn clock_is_up_before_pins_and_pwm() {
        let log = RefCell::new(Vec::new());
        let tap = |block, len| Tap {
            block,
            mem: MemRegion::new(len),
            log: &log,
        };
        let hw = Peripherals::new(
            tap(Block::Gpio, GPIO_SPAN),
            tap(Block::Pwm, PWM_SPAN),
            tap(Block::Clock, CLOCK_SPAN),
        );

        let m = DcMotor::start(hw, MotorConfig::default(), &mut NoDelay).unwrap();
        drop(m);

        assert_eq!(
            log.into_inner(),
            vec![
                Block::Clock,
                Block::Clock,
                Block::Clock,
                Block::Gpio,
                Block::Gpio,
                Block::Pwm,
            ]
        );
    }

    #[test]
    fn zero_parks_the_pwm_pin_without_touching_pwm() {
        let mut m = started();
        let mark = marks(&m);

        assert_eq!(m.on_write(&b"0\n"[..], 2).unwrap(), 2);

        let (gpio_w, pwm_w) = since(&m, mark);
        assert!(pwm_w.is_empty());
        assert_eq!(gpio_w[0], (gpio::reg::GPSET0, 1 << 24));
        assert_eq!(m.peripherals().gpio.function(13).unwrap(), GpioFunction::Output);
    }

    #[test]
    fn negative_command_reverses_and_programs_pwm() {
        let mut m = started();
        let mark = marks(&m);

        assert_eq!(m.on_write(&b"-50\n"[..], 4).unwrap(), 4);

        let (gpio_w, pwm_w) = since(&m, mark);
        let gpfsel1 = m.peripherals().gpio.regs().read32(0x04).unwrap();
        assert_eq!(
            gpio_w,
            vec![
                (gpio::reg::GPSET0, 1 << 24),
                (0x04, gpfsel1),
                (gpio::reg::GPCLR0, 1 << 24),
            ]
        );
        assert_eq!(m.peripherals().gpio.function(13).unwrap(), GpioFunction::Alt0);
        assert_eq!(
            pwm_w,
            vec![(pwm::reg::RNG2, 192_000), (pwm::reg::DAT2, 96_000)]
        );
    }

    #[test]
    fn positive_command_keeps_forward() {
        let mut m = started();
        let drive = m.apply(FrequencyCommand::new(100)).unwrap();

        assert_eq!(
            drive,
            Drive::Running {
                direction: Direction::Forward,
                counts: PwmCounts {
                    range: 96_000,
                    data: 48_000
                },
            }
        );
        let last = *m.peripherals().gpio.regs().writes().last().unwrap();
        assert_eq!(last, (gpio::reg::GPSET0, 1 << 24));
    }

    #[test]
    fn restart_after_stop_reselects_alt0() {
        let mut m = started();
        m.on_write(&b"0\n"[..], 2).unwrap();
        m.on_write(&b"10\n"[..], 3).unwrap();
        assert_eq!(m.peripherals().gpio.function(13).unwrap(), GpioFunction::Alt0);
    }

    #[test]
    fn out_of_band_frequency_is_clamped() {
        let mut m = started();
        let drive = m.apply(FrequencyCommand::new(-20_000)).unwrap();
        assert_eq!(
            drive,
            Drive::Running {
                direction: Direction::Reverse,
                counts: PwmCounts {
                    range: 960,
                    data: 480
                },
            }
        );
    }

    #[test]
    fn transfer_failure_touches_nothing() {
        let mut m = started();
        let mark = marks(&m);

        let err = m.on_write(&b"12"[..], 5).unwrap_err();

        assert!(matches!(err, Error::Transfer(TransferError { index: 2 })));
        let (gpio_w, pwm_w) = since(&m, mark);
        assert!(gpio_w.is_empty());
        assert!(pwm_w.is_empty());
    }

    #[test]
    fn only_the_first_command_is_consumed() {
        let mut m = started();
        assert_eq!(m.on_write(&b"50\n-20\n"[..], 7).unwrap(), 3);
        assert_eq!(m.peripherals().pwm.regs().read32(pwm::reg::RNG2).unwrap(), 192_000);
    }

    #[test]
    fn invalid_pin_aborts_startup_before_pwm_enable() {
        let config = MotorConfig {
            pins: MotorPins {
                direction: 60,
                pwm: 13,
            },
            ..MotorConfig::default()
        };
        let result = DcMotor::start(Peripherals::simulated(), config, &mut NoDelay);
        assert!(matches!(result, Err(Error::Hw(hw::Error::InvalidPin(60)))));
    }

    #[test]
    fn stop_parks_the_pin() {
        let mut m = started();
        m.apply(FrequencyCommand::new(50)).unwrap();
        m.stop().unwrap();
        assert_eq!(m.peripherals().gpio.function(13).unwrap(), GpioFunction::Output);
    }
}
