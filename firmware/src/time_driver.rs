//! Embassy time driver on the CH32V203 SysTick counter

use embassy_time_driver::{AlarmHandle, Driver};

const SYSTICK_BASE: usize = 0xE000_F000;
const STK_CTLR: usize = SYSTICK_BASE;
const STK_CNTL: usize = SYSTICK_BASE + 0x08;
const STK_CNTH: usize = SYSTICK_BASE + 0x0C;

/// Counter enable. STCLK left clear selects HCLK/8, 1 MHz from the 8 MHz HSI.
const STK_CTLR_STE: u32 = 1 << 0;

/// Free-running 64-bit up counter, one tick per microsecond
pub struct SysTickDriver;

impl SysTickDriver {
    const fn new() -> Self {
        Self
    }

    /// Zero the counter and start it
    pub fn start(&self) {
        unsafe {
            core::ptr::write_volatile(STK_CTLR as *mut u32, 0);
            core::ptr::write_volatile(STK_CNTL as *mut u32, 0);
            core::ptr::write_volatile(STK_CNTH as *mut u32, 0);
            core::ptr::write_volatile(STK_CTLR as *mut u32, STK_CTLR_STE);
        }
    }
}

impl Driver for SysTickDriver {
    fn now(&self) -> u64 {
        // Re-read if the low word wrapped between the two halves
        loop {
            let (high, low, again) = unsafe {
                (
                    core::ptr::read_volatile(STK_CNTH as *const u32),
                    core::ptr::read_volatile(STK_CNTL as *const u32),
                    core::ptr::read_volatile(STK_CNTH as *const u32),
                )
            };
            if high == again {
                return ((high as u64) << 32) | low as u64;
            }
        }
    }

    unsafe fn allocate_alarm(&self) -> Option<AlarmHandle> {
        // Only blocking delays are used, no timers
        None
    }

    fn set_alarm_callback(&self, _alarm: AlarmHandle, _callback: fn(*mut ()), _ctx: *mut ()) {}

    fn set_alarm(&self, _alarm: AlarmHandle, _timestamp: u64) -> bool {
        false
    }
}

embassy_time_driver::time_driver_impl!(static DRIVER: SysTickDriver = SysTickDriver::new());

/// Start the time base. Must run before anything reads the clock.
pub fn init() {
    DRIVER.start();
}

// Critical section implementation for single-core RISC-V
critical_section::set_impl!(RiscvCriticalSection);

struct RiscvCriticalSection;

unsafe impl critical_section::Impl for RiscvCriticalSection {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        let mstatus = riscv::register::mstatus::read();
        riscv::register::mstatus::clear_mie();
        mstatus.mie() as u8
    }

    unsafe fn release(was_enabled: critical_section::RawRestoreState) {
        if was_enabled != 0 {
            riscv::register::mstatus::set_mie();
        }
    }
}
