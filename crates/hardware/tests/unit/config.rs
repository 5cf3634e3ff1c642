//! Configuration layer tests.

use std::time::Duration;

use socsmoke_core::config::Config;

#[test]
fn defaults_describe_the_reference_chip() {
    let config = Config::default();
    assert_eq!(config.peripheral_clk_hz, 24_000_000);
    assert_eq!(config.baud_rate, 115_200);
    assert_eq!(config.aon_clk_hz, 200_000);
    assert_eq!(config.aon_rounds, 40);
    assert_eq!(config.rv_timer_tick_hz, 1_000_000);
    assert_eq!(config.irq_wait(), Duration::from_millis(10));
}

#[test]
fn duration_helpers_convert_microseconds() {
    let config = Config {
        irq_wait_micros: 250,
        service_poll_micros: 7,
        aon_settle_micros: 1_500,
        ..Config::default()
    };
    assert_eq!(config.irq_wait(), Duration::from_micros(250));
    assert_eq!(config.service_poll(), Duration::from_micros(7));
    assert_eq!(config.aon_settle(), Duration::from_micros(1_500));
}

#[test]
fn json_overrides_a_subset_of_fields() {
    let config: Config = serde_json::from_str(
        r#"{ "baud_rate": 9600, "aon_rounds": 3 }"#,
    )
    .unwrap();

    assert_eq!(config.baud_rate, 9600);
    assert_eq!(config.aon_rounds, 3);
    // Everything else keeps its default.
    assert_eq!(config.peripheral_clk_hz, 24_000_000);
    assert_eq!(config.rv_timer_deadline_ticks, 100);
}

#[test]
fn empty_json_object_is_the_default_config() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.irq_wait_micros, Config::default().irq_wait_micros);
    assert_eq!(config.baud_rate, Config::default().baud_rate);
}
