//! Firmware for a solar-charged, battery-powered two-LED night light.
//!
//! # Overview
//!
//! This firmware controls a low-power decorative light featuring:
//! - Two LEDs fading through four pre-authored light shows
//! - A solar cell doubling as an ambient light sensor
//! - Ultra-low power operation using STM32L031G6 in STOP mode
//! - RTC wakeup timer as the only wake source
//!
//! # Hardware
//!
//! - **MCU**: STM32L031G6U6 (Cortex-M0+, ultra-low-power)
//! - **LEDs**: 2x, driven by TIM2 CH1/CH2 PWM
//! - **Sensor**: Solar cell on a pulled-up digital input
//! - **RTC**: 32.768 kHz crystal for timekeeping in STOP mode
//!
//! # Duty Cycle
//!
//! The MCU wakes every 8 seconds while there is daylight and does nothing
//! else. Once the solar cell goes dark it wakes every 4 seconds and plays the
//! next light show before going back to STOP mode. See
//! [`twinkle::duty_cycle`] for the loop itself.
//!
//! # Module Organization
//!
//! - [`power`] - RTC wakeup timer, wake interrupt and STOP mode
//! - [`hardware`] - Pin mappings and peripheral initialization

#![no_std]
#![no_main]

mod hardware;
mod power;

use embassy_executor::Spawner;
use embassy_stm32::{
    Config,
    rcc::{LsConfig, LseConfig, mux::ClockMux},
    time::Hertz,
};
use embassy_time::{Delay, Timer};
use twinkle::{DutyCycle, PatternPlayer, WakeScheduler};
use {defmt_rtt as _, panic_probe as _};

use hardware::Peripherals;
use power::WAKE;

/// Creates a low-power clock configuration for STM32L031.
///
/// # Clock Settings
///
/// - **MSI**: 66 kHz in normal mode, 2.097 MHz in debug mode (for reliable debugging)
/// - **System clock**: MSI (no PLL)
/// - **LSE**: 32.768 kHz external crystal for RTC
/// - **Voltage scale**: Range 1 (1.8V core for low power)
///
/// The LED fades only need millisecond delays and an 8-bit PWM, so the
/// slowest MSI range is enough. In debug mode, uses higher clock speed to
/// keep debug connection alive.
///
/// # Returns
///
/// Configured RCC settings for embassy-stm32 initialization
fn create_low_power_config() -> embassy_stm32::rcc::Config {
    embassy_stm32::rcc::Config {
        #[cfg(feature = "debug-mode")]
        msi: Some(embassy_stm32::rcc::MSIRange::RANGE2M),
        #[cfg(not(feature = "debug-mode"))]
        msi: Some(embassy_stm32::rcc::MSIRange::RANGE66K),
        hsi: false,
        hse: None,
        pll: None,
        sys: embassy_stm32::rcc::Sysclk::MSI,
        ahb_pre: embassy_stm32::rcc::AHBPrescaler::DIV1,
        apb1_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        apb2_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        ls: LsConfig {
            rtc: embassy_stm32::rcc::RtcClockSource::LSE,
            lsi: false,
            lse: Some(LseConfig {
                frequency: Hertz::hz(32768),
                mode: embassy_stm32::rcc::LseMode::Oscillator(embassy_stm32::rcc::LseDrive::Low),
            }),
        },
        voltage_scale: embassy_stm32::rcc::VoltageScale::RANGE1,
        mux: ClockMux::default(),
    }
}

/// Main entry point for the night light firmware.
///
/// # Initialization Sequence
///
/// 1. Configure clocks for low power operation (66 kHz MSI, LSE for RTC)
/// 2. Initialize STM32 peripherals
/// 3. Wait for a debugger to attach
/// 4. Set up PWM, sense inputs, RTC wakeup and STOP mode
/// 5. Hand everything to the duty cycle, which never returns
///
/// # Main Loop
///
/// Each RTC wakeup reads the solar cell. Daylight re-arms an 8 second
/// wakeup; darkness plays the next light show and re-arms a 4 second
/// wakeup. Between wakeups the MCU sits in STOP mode with the ADC clock off.
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let mut config = Config::default();
    config.rcc = create_low_power_config();

    let p = embassy_stm32::init(config);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Night light firmware starting...");

    // Wait 3 seconds after boot to allow debugger connection
    // before entering STOP mode. Negligible battery impact.
    #[cfg(feature = "debug-mode")]
    defmt::info!("Waiting 3 seconds for debugger connection...");

    Timer::after_secs(3).await;

    #[cfg(feature = "debug-mode")]
    defmt::info!("Initializing peripherals...");

    let core = cortex_m::Peripherals::take().unwrap();
    let peripherals = Peripherals::new(p, core.SCB);

    let player = PatternPlayer::new(peripherals.leds, Delay);
    let scheduler = WakeScheduler::new(peripherals.wake_timer, peripherals.sleep, &WAKE);
    let mut duty_cycle = DutyCycle::new(peripherals.light_sensor, player, scheduler);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Entering duty cycle...");

    duty_cycle.run()
}
