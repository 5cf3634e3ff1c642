//! Clock manager gating and hinting tests.

use socsmoke_core::soc::devices::clkmgr::{Clkmgr, GateableClock, HintableClock};

#[test]
fn power_up_state_has_everything_enabled() {
    let clkmgr = Clkmgr::new();
    for clock in GateableClock::ALL {
        assert!(clkmgr.gateable_get_enabled(clock).unwrap());
    }
    for clock in HintableClock::ALL {
        assert!(clkmgr.hintable_get_hint(clock).unwrap());
        assert!(clkmgr.hintable_get_enabled(clock).unwrap());
    }
}

#[test]
fn gateable_clock_follows_the_write() {
    let mut clkmgr = Clkmgr::new();
    clkmgr
        .gateable_set_enabled(GateableClock::UsbPeri, false)
        .unwrap();

    assert!(!clkmgr.gateable_get_enabled(GateableClock::UsbPeri).unwrap());
    // The other gateable clock is untouched.
    assert!(clkmgr
        .gateable_get_enabled(GateableClock::IoDiv4Peri)
        .unwrap());

    clkmgr
        .gateable_set_enabled(GateableClock::UsbPeri, true)
        .unwrap();
    assert!(clkmgr.gateable_get_enabled(GateableClock::UsbPeri).unwrap());
}

#[test]
fn idle_hintable_clock_follows_the_hint() {
    let mut clkmgr = Clkmgr::new();
    clkmgr
        .hintable_set_hint(HintableClock::MainHmac, false)
        .unwrap();

    assert!(!clkmgr.hintable_get_hint(HintableClock::MainHmac).unwrap());
    assert!(!clkmgr
        .hintable_get_enabled(HintableClock::MainHmac)
        .unwrap());
}

#[test]
fn busy_unit_keeps_its_clock_running_despite_the_hint() {
    let mut clkmgr = Clkmgr::new();
    clkmgr.set_unit_busy(HintableClock::MainKmac, true);
    clkmgr
        .hintable_set_hint(HintableClock::MainKmac, false)
        .unwrap();

    // Hint is recorded but the clock stays up until the unit idles.
    assert!(!clkmgr.hintable_get_hint(HintableClock::MainKmac).unwrap());
    assert!(clkmgr
        .hintable_get_enabled(HintableClock::MainKmac)
        .unwrap());

    clkmgr.set_unit_busy(HintableClock::MainKmac, false);
    assert!(!clkmgr
        .hintable_get_enabled(HintableClock::MainKmac)
        .unwrap());
}

#[test]
fn enabled_hint_always_implies_an_enabled_clock() {
    let mut clkmgr = Clkmgr::new();
    clkmgr
        .hintable_set_hint(HintableClock::MainHmac, true)
        .unwrap();
    assert!(clkmgr
        .hintable_get_enabled(HintableClock::MainHmac)
        .unwrap());
}
