//! Reset manager cause-bitfield tests.

use socsmoke_core::soc::devices::rstmgr::{
    Rstmgr, RESET_INFO_POR, RESET_INFO_SW_REQUEST, RESET_INFO_WATCHDOG,
};

#[test]
fn power_up_records_exactly_por() {
    let rstmgr = Rstmgr::new();
    assert_eq!(rstmgr.reset_info(), RESET_INFO_POR);
}

#[test]
fn recorded_causes_accumulate() {
    let mut rstmgr = Rstmgr::new();
    rstmgr.record(RESET_INFO_WATCHDOG);
    rstmgr.record(RESET_INFO_SW_REQUEST);

    let info = rstmgr.reset_info();
    assert_eq!(
        info,
        RESET_INFO_POR | RESET_INFO_WATCHDOG | RESET_INFO_SW_REQUEST
    );
}

#[test]
fn clear_empties_the_bitfield() {
    let mut rstmgr = Rstmgr::new();
    rstmgr.record(RESET_INFO_WATCHDOG);
    rstmgr.reset_info_clear();

    assert_eq!(rstmgr.reset_info(), 0);

    rstmgr.record(RESET_INFO_SW_REQUEST);
    assert_eq!(rstmgr.reset_info(), RESET_INFO_SW_REQUEST);
}
