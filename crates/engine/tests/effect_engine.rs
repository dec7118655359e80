//! Scheduler-level behaviour: blink synthesis, cancellation,
//! priority replacement, keep-alive cadence, and failure handling,
//! all against mock transports with a paused clock.

use std::sync::Arc;
use std::time::Duration;

use statuslight_engine::{
    ApplyOutcome, Effect, EngineConfig, LedIndex, LightEvent, LightId, Priority, Registry, Rgb,
    Speed,
};
use statuslight_hid_common::{HidBus, HidDeviceInfo, MockHidBus, MockHidTransport};
use statuslight_serial_common::{MockSerialBus, SerialBus};

const RED: Rgb = Rgb::new(255, 0, 0);
const BLUE: Rgb = Rgb::new(0, 0, 255);

const EMBRAVA_OFF: [u8; 9] = [0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0xFF, 0x22];
const EMBRAVA_RED: [u8; 9] = [0x00, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x22];

fn config() -> EngineConfig {
    EngineConfig::default()
}

fn registry(bus: &Arc<MockHidBus>) -> Registry {
    Registry::new(
        Arc::clone(bus) as Arc<dyn HidBus>,
        Arc::new(MockSerialBus::new()) as Arc<dyn SerialBus>,
        config(),
    )
}

async fn setup(
    vendor_id: u16,
    product_id: u16,
) -> (Registry, Arc<MockHidBus>, Arc<MockHidTransport>, LightId) {
    let bus = Arc::new(MockHidBus::new());
    let transport = bus.plug(HidDeviceInfo::new(vendor_id, product_id, "mock:0"));
    let registry = registry(&bus);
    registry.refresh().await;
    let id = registry.snapshot().first().expect("light adopted").id();
    (registry, bus, transport, id)
}

async fn apply(registry: &Registry, id: LightId, effect: Effect) -> ApplyOutcome {
    registry.apply(id, effect).await.expect("light present")
}

#[tokio::test(start_paused = true)]
async fn steady_is_a_single_write() {
    let (registry, _bus, transport, id) = setup(0x2C0D, 0x0001).await;

    let outcome = apply(&registry, id, Effect::steady(RED)).await;
    assert!(matches!(outcome, ApplyOutcome::Started(_)));
    assert_eq!(transport.write_history(), vec![EMBRAVA_RED.to_vec()]);

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn counted_blink_emits_exact_write_pairs_then_finalises() {
    let (registry, _bus, transport, id) = setup(0x2C0D, 0x0001).await;

    let effect = Effect::blink(RED).with_count(2).with_speed(Speed::Medium);
    let ApplyOutcome::Started(handle) = apply(&registry, id, effect).await else {
        panic!("blink rejected");
    };
    handle.wait().await;

    // on, off, on, off, plus the idempotent finaliser off.
    let writes = transport.write_history();
    assert_eq!(writes.len(), 5);
    assert_eq!(writes[0], EMBRAVA_RED.to_vec());
    assert_eq!(writes[1], EMBRAVA_OFF.to_vec());
    assert_eq!(writes[2], EMBRAVA_RED.to_vec());
    assert_eq!(writes[3], EMBRAVA_OFF.to_vec());
    assert_eq!(writes[4], EMBRAVA_OFF.to_vec());

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn open_ended_blink_uses_hardware_flash() {
    let (registry, _bus, transport, id) = setup(0x2C0D, 0x0001).await;

    let ApplyOutcome::Started(_) = apply(&registry, id, Effect::blink(RED)).await else {
        panic!("blink rejected");
    };
    // One report with the flash bit; the firmware does the rest.
    assert_eq!(transport.write_count(), 1);
    let report = transport.last_write().expect("written");
    assert_eq!(report[4] & 0x04, 0x04);

    // Cancellation still requires an explicit off.
    registry.stop(id).await;
    assert_eq!(transport.last_write(), Some(EMBRAVA_OFF.to_vec()));

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn cancelling_an_infinite_effect_drives_dark_promptly() {
    let (registry, _bus, transport, id) = setup(0x2C0D, 0x0001).await;

    let ApplyOutcome::Started(_) = apply(&registry, id, Effect::spectrum()).await else {
        panic!("spectrum rejected");
    };
    tokio::time::sleep(Duration::from_millis(220)).await;
    let before_stop = transport.write_count();
    assert!(before_stop >= 2, "spectrum should have emitted frames");

    registry.stop(id).await;
    assert_eq!(transport.last_write(), Some(EMBRAVA_OFF.to_vec()));

    // Quiescence: no further frames after the finaliser.
    let after_stop = transport.write_count();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(transport.write_count(), after_stop);

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn lower_priority_is_rejected_while_equal_replaces() {
    let (registry, _bus, _transport, id) = setup(0x2C0D, 0x0001).await;

    let ApplyOutcome::Started(_) = apply(&registry, id, Effect::blink(RED).with_count(1000)).await
    else {
        panic!("blink rejected");
    };

    // Spectrum is Low priority; the Normal blink wins.
    let outcome = apply(&registry, id, Effect::spectrum()).await;
    assert!(matches!(outcome, ApplyOutcome::Rejected { .. }));

    // Equal priority: last writer wins.
    let outcome = apply(&registry, id, Effect::fli(RED, BLUE).with_count(1000)).await;
    assert!(matches!(outcome, ApplyOutcome::Started(_)));

    // High priority replaces Normal.
    let outcome = apply(
        &registry,
        id,
        Effect::blink(BLUE).with_priority(Priority::High).with_count(1000),
    )
    .await;
    assert!(matches!(outcome, ApplyOutcome::Started(_)));

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn led_index_beyond_device_is_a_warned_noop() {
    let bus = Arc::new(MockHidBus::new());
    // Luxafor Flag: six LEDs.
    let transport = bus.plug(HidDeviceInfo::new(0x04D8, 0xF372, "mock:flag"));
    let registry = registry(&bus);
    registry.refresh().await;
    let id = registry.snapshot().first().expect("flag").id();

    let outcome = apply(&registry, id, Effect::steady(RED).with_led(LedIndex(9))).await;
    assert!(matches!(outcome, ApplyOutcome::Started(_)));
    // Transport untouched.
    assert_eq!(transport.write_count(), 0);

    // An in-range index writes normally.
    apply(&registry, id, Effect::steady(RED).with_led(LedIndex(6))).await;
    assert_eq!(transport.write_count(), 1);

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn stateful_light_renews_colour_and_watchdog() {
    let (registry, _bus, transport, id) = setup(0x27BB, 0x3BCA).await;

    apply(&registry, id, Effect::steady(Rgb::new(10, 20, 30))).await;
    assert_eq!(transport.write_count(), 1);

    // Keep-alive period is interval/2 = 7.5 s; 16 s covers two ticks.
    tokio::time::sleep(Duration::from_secs(16)).await;

    let writes = transport.write_history();
    // 1 initial + 2 ticks x (renewal + watchdog).
    assert_eq!(writes.len(), 5);

    let solid_programs: Vec<_> = writes
        .iter()
        .filter(|w| w[0] == 0x10 && w[2..5] == [10, 20, 30])
        .collect();
    assert!(
        solid_programs.len() >= 3,
        "colour payload must repeat within the interval window"
    );
    // Renewals are byte-identical to the original program.
    assert!(solid_programs.iter().all(|w| *w == solid_programs[0]));

    // Watchdog frames carry the keep-alive opcode and a valid checksum.
    let watchdogs: Vec<_> = writes.iter().filter(|w| w[0] == 0x8F).collect();
    assert_eq!(watchdogs.len(), 2);
    for frame in watchdogs {
        let bytes: [u8; 64] = frame.as_slice().try_into().expect("64-byte program");
        let sum = statuslight_hid_kuando_protocol::checksum(&bytes);
        assert_eq!(u16::from_be_bytes([bytes[62], bytes[63]]), sum);
    }

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn dim_to_black_keeps_the_keepalive_while_off_stops_it() {
    let (registry, _bus, transport, id) = setup(0x27BB, 0x3BCA).await;

    // on(black): the payload is the dark program, but the task plumbing
    // stays alive.
    apply(&registry, id, Effect::steady(Rgb::BLACK)).await;
    let first = transport.write_count();
    assert_eq!(first, 1);

    tokio::time::sleep(Duration::from_secs(8)).await;
    assert!(
        transport.write_count() > first,
        "keep-alive must keep renewing after on(black)"
    );

    // off terminates the keep-alive task.
    registry.stop(id).await;
    let after_stop = transport.write_count();
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(transport.write_count(), after_stop);

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn plug_and_unplug_produce_events_and_snapshot_changes() {
    let bus = Arc::new(MockHidBus::new());
    let registry = registry(&bus);
    registry.refresh().await;
    assert_eq!(registry.snapshot().len(), 0);

    let mut events = registry.subscribe();

    bus.plug(HidDeviceInfo::new(0x2C0D, 0x0001, "mock:hotplug"));
    // The poller (running because we subscribed) picks it up on the
    // next cycle.
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let event = events.recv().await.expect("plug event");
    let LightEvent::Plugged(descriptor) = event else {
        panic!("expected a plugged event");
    };
    assert_eq!(descriptor.logical_name, "Blynclight");
    assert_eq!(registry.snapshot().len(), 1);

    bus.unplug("mock:hotplug");
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let event = events.recv().await.expect("unplug event");
    assert!(matches!(event, LightEvent::Unplugged(_)));
    assert_eq!(registry.snapshot().len(), 0);

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn exhausted_write_recovery_drops_the_light() {
    let (registry, _bus, transport, id) = setup(0x2C0D, 0x0001).await;
    let mut events = registry.subscribe();

    // First failure triggers reopen+retry; the second kills the light.
    transport.fail_next_write(statuslight_errors::TransportError::Io("glitch".into()));
    transport.fail_next_write(statuslight_errors::TransportError::Io("still broken".into()));

    let outcome = apply(&registry, id, Effect::steady(RED)).await;
    assert!(matches!(outcome, ApplyOutcome::Rejected { .. }));

    let event = events.recv().await.expect("failure event");
    assert!(matches!(event, LightEvent::Unplugged(_)));
    assert_eq!(registry.snapshot().len(), 0);

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn transient_write_failure_recovers_invisibly() {
    let (registry, _bus, transport, id) = setup(0x2C0D, 0x0001).await;

    transport.fail_next_write(statuslight_errors::TransportError::Io("blip".into()));
    let outcome = apply(&registry, id, Effect::steady(RED)).await;
    assert!(matches!(outcome, ApplyOutcome::Started(_)));
    assert_eq!(transport.reopen_count(), 1);
    assert_eq!(transport.last_write(), Some(EMBRAVA_RED.to_vec()));

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_quiesces_everything_and_is_idempotent() {
    let (registry, _bus, transport, id) = setup(0x2C0D, 0x0001).await;

    apply(&registry, id, Effect::steady(RED)).await;
    registry.shutdown().await;

    assert_eq!(transport.last_write(), Some(EMBRAVA_OFF.to_vec()));
    assert!(!transport.is_open());
    assert_eq!(registry.snapshot().len(), 0);

    // Second shutdown is a no-op.
    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn serial_light_writes_line_commands() {
    let serial_bus = Arc::new(MockSerialBus::new());
    let transport = serial_bus.plug(statuslight_serial_common::SerialDeviceInfo::new(
        0x2047, 0x03DF, "mock:tty0",
    ));
    let registry = Registry::new(
        Arc::new(MockHidBus::new()) as Arc<dyn HidBus>,
        Arc::clone(&serial_bus) as Arc<dyn SerialBus>,
        config(),
    );
    registry.refresh().await;
    let id = registry.snapshot().first().expect("fit-statUSB").id();

    apply(&registry, id, Effect::steady(RED)).await;
    assert_eq!(transport.last_write(), Some(b"B#ff0000\n".to_vec()));

    registry.stop(id).await;
    assert_eq!(transport.last_write(), Some(b"B#000000\n".to_vec()));

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn blink1_commands_travel_as_feature_reports() {
    let (registry, _bus, transport, id) = setup(0x27B8, 0x01ED).await;

    apply(&registry, id, Effect::steady(RED)).await;
    assert_eq!(transport.feature_write_count(), 1);
    assert_eq!(
        transport.last_write(),
        Some(vec![0x01, b'c', 255, 0, 0, 0, 10, 0])
    );

    // The mk2's bottom LED is addressable individually.
    apply(&registry, id, Effect::steady(BLUE).with_led(LedIndex(2))).await;
    let report = transport.last_write().expect("written");
    assert_eq!(report[7], 2);
    assert_eq!(&report[2..5], &[0, 0, 255]);

    registry.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn three_bit_device_gets_quantised_colours() {
    let (registry, _bus, transport, id) = setup(0x20A0, 0x42DA).await;

    // 200,20,130 quantises to red+blue.
    apply(&registry, id, Effect::steady(Rgb::new(200, 20, 130))).await;
    assert_eq!(transport.last_write(), Some(vec![0x00, 0x01 | 0x04]));

    registry.shutdown().await;
}
