//! Wake timer and sleep control for the night light.
//!
//! The STM32L0 RTC wakeup timer takes the role of a periodic watchdog
//! interrupt: it keeps counting from the 32.768 kHz LSE while the core is in
//! STOP mode and raises EXTI line 20 when it expires.
//!
//! # Wakeup Timer Clock
//!
//! The wakeup counter runs from RTCCLK/16 = 2048 Hz, giving roughly 0.5 ms
//! resolution and a 32 s range, which covers every [`WakeInterval`].
//!
//! # Interrupt
//!
//! The RTC handler clears the hardware pending bits (required on STM32 or the
//! interrupt re-enters immediately) and then only raises [`WAKE`].

use cortex_m::peripheral::SCB;
use embassy_stm32::pac;
use pac::interrupt;
use twinkle::{SleepControl, WakeFlag, WakeInterval, WakeTimer};

/// EXTI line number for the RTC wakeup event (fixed at line 20 on STM32L0)
const RTC_WAKEUP_EXTI_LINE: usize = 20;

/// IMR register index for EXTI line 20 (lines 0-31 are in IMR1)
const IMR1_REG_IDX: usize = 0;

/// Wakeup counter ticks per second (RTCCLK/16)
const WAKEUP_CLOCK_HZ: u64 = 32_768 / 16;

/// Raised by the RTC wakeup interrupt, taken by the main loop.
///
/// Starts raised so the first duty cycle runs right after boot.
pub static WAKE: WakeFlag = WakeFlag::pending();

/// RTC wakeup interrupt handler (EXTI line 20).
///
/// Clears the wakeup flag and the EXTI pending bit, then raises [`WAKE`].
#[interrupt]
fn RTC() {
    pac::RTC.isr().modify(|w| w.set_wutf(false));
    pac::EXTI
        .pr(IMR1_REG_IDX)
        .modify(|w| w.set_line(RTC_WAKEUP_EXTI_LINE, true));

    WAKE.signal();
}

/// Periodic wake source built on the RTC wakeup timer.
pub struct RtcWakeTimer {
    _private: (),
}

impl RtcWakeTimer {
    /// Routes the RTC wakeup event to the CPU.
    ///
    /// Enables backup-domain write access, sets EXTI line 20 to trigger on a
    /// rising edge and unmasks the RTC interrupt in the NVIC. The timer itself
    /// is left stopped until the first [`WakeTimer::start`].
    pub fn new() -> Self {
        let exti = pac::EXTI;

        pac::RCC.apb1enr().modify(|w| w.set_pwren(true));
        pac::PWR.cr().modify(|w| w.set_dbp(true));

        exti.imr(IMR1_REG_IDX)
            .modify(|w| w.set_line(RTC_WAKEUP_EXTI_LINE, true));
        exti.rtsr(IMR1_REG_IDX)
            .modify(|w| w.set_line(RTC_WAKEUP_EXTI_LINE, true));

        unsafe {
            cortex_m::peripheral::NVIC::unmask(embassy_stm32::interrupt::RTC);
        };

        Self { _private: () }
    }

    /// Reload value for `interval`; the counter fires after reload + 1 ticks.
    fn reload(interval: WakeInterval) -> u16 {
        let ticks = interval.duration().as_millis() * WAKEUP_CLOCK_HZ / 1_000;
        u16::try_from(ticks.saturating_sub(1)).unwrap_or(u16::MAX)
    }
}

impl WakeTimer for RtcWakeTimer {
    /// Reprograms the wakeup counter.
    ///
    /// Follows the reference-manual sequence: unlock the RTC registers,
    /// stop the timer, wait for WUTWF, load the counter, restart with the
    /// interrupt enabled, lock again. A timer that never reports WUTWF hangs
    /// here; without the RTC there is no other time source to fall back on.
    fn start(&mut self, interval: WakeInterval) {
        let rtc = pac::RTC;

        rtc.wpr().write(|w| w.set_key(0xCA));
        rtc.wpr().write(|w| w.set_key(0x53));

        rtc.cr().modify(|w| {
            w.set_wute(false);
            w.set_wutie(false);
        });
        while !rtc.isr().read().wutwf() {}

        rtc.wutr().write(|w| w.set_wut(Self::reload(interval)));
        rtc.isr().modify(|w| w.set_wutf(false));
        rtc.cr().modify(|w| {
            w.set_wucksel(pac::rtc::vals::Wucksel::DIV16);
            w.set_wutie(true);
            w.set_wute(true);
        });

        rtc.wpr().write(|w| w.set_key(0xFF));
    }
}

/// STOP mode entry and ADC power gating.
pub struct StopMode {
    /// System control block, for the SLEEPDEEP bit
    scb: SCB,
}

impl StopMode {
    /// Creates the sleep controller.
    ///
    /// PWR_CR.PDDS resets to 0, so deep sleep enters STOP rather than
    /// STANDBY and RAM (including the pattern position) is kept.
    pub fn new(scb: SCB) -> Self {
        Self { scb }
    }
}

impl SleepControl for StopMode {
    fn disable_analog(&mut self) {
        pac::RCC.apb2enr().modify(|w| w.set_adcen(false));
    }

    fn enable_analog(&mut self) {
        pac::RCC.apb2enr().modify(|w| w.set_adcen(true));
    }

    /// Enters STOP mode until the next interrupt.
    ///
    /// WFI wakes on a pending interrupt even with interrupts masked, so the
    /// caller can check the wake flag and sleep without a race.
    fn sleep(&mut self) {
        self.scb.set_sleepdeep();
        cortex_m::asm::wfi();
        self.scb.clear_sleepdeep();
    }
}
