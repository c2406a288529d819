//! Integration tests for the lighting server.

mod common;

use common::{CLIENT, FakePlatform, acked, advance, unacked};
use embassy_time::Duration;
use myrtio_mesh_lighting::{
    LightbulbRecord, LightingServer, LightingServerConfig, LightingTimer, LightnessScale, Phase,
    record::{ON_POWER_UP_OFF, ON_POWER_UP_ON, ON_POWER_UP_RESTORE},
};
use myrtio_mesh_model::{
    State, StateKind,
    model::{GENERIC_LEVEL_SERVER, GENERIC_ONOFF_SERVER, LIGHT_LIGHTNESS_SERVER},
    state::Range,
};

const NOW: Duration = Duration::from_millis(0);

fn started(config: LightingServerConfig) -> (FakePlatform, LightingServer) {
    let mut platform = FakePlatform::new();
    let mut lighting = LightingServer::new(config);
    lighting.init(&mut platform).unwrap();
    platform.clear();
    (platform, lighting)
}

fn stored(platform: &mut FakePlatform, config: &LightingServerConfig, record: &LightbulbRecord) {
    platform
        .store
        .insert(config.ps_key, bytemuck::bytes_of(record).to_vec());
}

fn set_lightness(platform: &mut FakePlatform, lighting: &mut LightingServer, lightness: u16) {
    lighting
        .lightness_request(platform, &unacked(0, 0), LightnessScale::Actual, lightness)
        .unwrap();
}

// -----------------------------------------------------------------------------
// Lightness transitions
// -----------------------------------------------------------------------------

#[test]
fn delayed_transition_reaches_target() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);

    lighting
        .lightness_request(&mut platform, &acked(200, 50), LightnessScale::Actual, 800)
        .unwrap();

    assert_eq!(lighting.lightness_phase(), Phase::DelayedPending);
    assert_eq!(lighting.lightness_current(), 0);
    assert_eq!(lighting.lightness_target(), 800);
    assert!(platform.lightness.is_empty());

    let (client, response) = platform.responses[0];
    assert_eq!(client, CLIENT);
    assert_eq!(response.current, State::LightnessActual(0));
    assert_eq!(response.target, Some(State::LightnessActual(800)));
    assert_eq!(response.remaining_ms, 250);

    advance(&mut platform, &mut lighting, None, 50);
    assert_eq!(lighting.lightness_phase(), Phase::Transitioning);
    assert_eq!(
        platform.last_lightness(),
        Some((800, Duration::from_millis(200)))
    );

    advance(&mut platform, &mut lighting, None, 199);
    assert_eq!(lighting.lightness_current(), 0);

    advance(&mut platform, &mut lighting, None, 1);
    let record = lighting.record();
    assert_eq!(lighting.lightness_phase(), Phase::Idle);
    assert_eq!(record.lightness_current, 800);
    assert_eq!(record.lightness_last, 800);
    assert_eq!(record.onoff_current, 1);
    assert_eq!(record.pri_level_current, -31968);
    assert_eq!(
        platform.last_update(LIGHT_LIGHTNESS_SERVER).map(|update| update.current),
        Some(State::LightnessActual(800))
    );
}

#[test]
fn immediate_request_publishes_bound_states() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);

    lighting
        .lightness_request(&mut platform, &acked(0, 0), LightnessScale::Actual, 1200)
        .unwrap();

    assert_eq!(lighting.lightness_current(), 1200);
    assert_eq!(platform.last_lightness(), Some((1200, NOW)));
    assert_eq!(platform.scene_resets, [0]);
    assert!(platform.published(LIGHT_LIGHTNESS_SERVER, 0, StateKind::LightnessActual));
    assert!(platform.published(LIGHT_LIGHTNESS_SERVER, 0, StateKind::LightnessLinear));
    assert!(platform.published(GENERIC_ONOFF_SERVER, 0, StateKind::OnOff));
    assert!(platform.published(GENERIC_LEVEL_SERVER, 0, StateKind::Level));
}

#[test]
fn linear_request_is_converted_to_actual() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);

    lighting
        .lightness_request(&mut platform, &acked(0, 0), LightnessScale::Linear, 16384)
        .unwrap();

    assert_eq!(lighting.lightness_current(), 32767);
    let (_, response) = platform.responses[0];
    assert_eq!(response.current, State::LightnessLinear(16384));
}

#[test]
fn request_is_clamped_into_range() {
    let config = LightingServerConfig {
        lightness_min: 1000,
        lightness_max: 2000,
        ..LightingServerConfig::DEFAULT
    };
    let (mut platform, mut lighting) = started(config);

    set_lightness(&mut platform, &mut lighting, 5000);
    assert_eq!(lighting.lightness_current(), 2000);

    set_lightness(&mut platform, &mut lighting, 10);
    assert_eq!(lighting.lightness_current(), 1000);

    set_lightness(&mut platform, &mut lighting, 0);
    assert_eq!(lighting.lightness_current(), 0);
    assert_eq!(lighting.record().onoff_current, 0);
}

// -----------------------------------------------------------------------------
// Idempotent requests
// -----------------------------------------------------------------------------

#[test]
fn repeated_request_only_answers() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);
    set_lightness(&mut platform, &mut lighting, 500);
    platform.clear();

    lighting
        .lightness_request(&mut platform, &acked(0, 0), LightnessScale::Actual, 500)
        .unwrap();

    assert_eq!(platform.responses.len(), 1);
    assert!(platform.updates.is_empty());
    assert!(platform.publishes.is_empty());
    assert!(platform.scene_resets.is_empty());
    assert!(platform.lightness.is_empty());

    platform.clear();
    set_lightness(&mut platform, &mut lighting, 500);
    assert!(platform.responses.is_empty());
}

#[test]
fn request_for_pending_target_keeps_transition() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);
    lighting
        .lightness_request(&mut platform, &unacked(200, 0), LightnessScale::Actual, 800)
        .unwrap();
    advance(&mut platform, &mut lighting, None, 50);
    platform.clear();

    lighting
        .lightness_request(&mut platform, &acked(100, 0), LightnessScale::Actual, 800)
        .unwrap();

    assert_eq!(lighting.lightness_phase(), Phase::Transitioning);
    assert_eq!(
        platform
            .timers
            .remaining(LightingTimer::LightnessTransition.into()),
        Some(Duration::from_millis(150))
    );
    assert!(platform.lightness.is_empty());
    let (_, response) = platform.responses[0];
    assert_eq!(response.current, State::LightnessActual(0));
    assert_eq!(response.target, None);
}

// -----------------------------------------------------------------------------
// Generic OnOff
// -----------------------------------------------------------------------------

#[test]
fn turning_on_reads_on_during_transition() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);

    lighting
        .onoff_request(&mut platform, &acked(100, 0), 1)
        .unwrap();

    assert_eq!(lighting.record().onoff_current, 1);
    assert_eq!(lighting.lightness_current(), 0);
    assert_eq!(lighting.lightness_target(), 0xFFFF);
    assert_eq!(
        platform.last_lightness(),
        Some((0xFFFF, Duration::from_millis(100)))
    );
    let (_, response) = platform.responses[0];
    assert_eq!(response.current, State::OnOff(1));
    assert_eq!(response.target, Some(State::OnOff(1)));
    assert!(platform.published(LIGHT_LIGHTNESS_SERVER, 0, StateKind::LightnessActual));
    assert!(platform.published(GENERIC_LEVEL_SERVER, 0, StateKind::Level));

    advance(&mut platform, &mut lighting, None, 100);
    assert_eq!(lighting.onoff_phase(), Phase::Idle);
    assert_eq!(lighting.lightness_current(), 0xFFFF);
}

#[test]
fn off_then_on_restores_last_lightness() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);
    set_lightness(&mut platform, &mut lighting, 3000);

    lighting
        .onoff_request(&mut platform, &unacked(0, 0), 0)
        .unwrap();
    let record = lighting.record();
    assert_eq!(record.lightness_current, 0);
    assert_eq!(record.lightness_last, 3000);
    assert_eq!(record.pri_level_current, i16::MIN);

    lighting
        .onoff_request(&mut platform, &unacked(0, 0), 1)
        .unwrap();
    assert_eq!(lighting.lightness_current(), 3000);
    assert_eq!(platform.last_lightness(), Some((3000, NOW)));
}

#[test]
fn onoff_request_preempts_lightness_transition() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);
    set_lightness(&mut platform, &mut lighting, 3000);
    lighting
        .lightness_request(&mut platform, &unacked(1000, 0), LightnessScale::Actual, 9000)
        .unwrap();

    lighting
        .onoff_request(&mut platform, &unacked(0, 0), 0)
        .unwrap();

    assert_eq!(lighting.lightness_phase(), Phase::Idle);
    assert!(!platform.is_running(LightingTimer::LightnessTransition));
    assert_eq!(lighting.lightness_current(), 0);

    advance(&mut platform, &mut lighting, None, 1000);
    assert_eq!(lighting.lightness_current(), 0);
}

// -----------------------------------------------------------------------------
// Primary level
// -----------------------------------------------------------------------------

#[test]
fn halted_move_keeps_last_step() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);

    lighting
        .level_move_request(&mut platform, &acked(50, 0), 100)
        .unwrap();
    assert_eq!(lighting.level_phase(), Phase::MoveActive);
    assert_eq!(
        platform.last_lightness(),
        Some((100, Duration::from_millis(50)))
    );

    advance(&mut platform, &mut lighting, None, 120);
    lighting
        .level_halt_request(&mut platform, &acked(0, 0))
        .unwrap();

    let record = lighting.record();
    assert_eq!(record.lightness_current, 200);
    assert_eq!(record.pri_level_current, -32568);
    assert_eq!(record.pri_level_target, -32568);
    assert_eq!(lighting.level_phase(), Phase::Idle);
    assert!(!platform.is_running(LightingTimer::LevelMove));
    assert!(!platform.is_running(LightingTimer::LevelDelayed));
    assert!(!platform.is_running(LightingTimer::LevelTransition));
    assert_eq!(platform.last_lightness(), Some((200, NOW)));
}

#[test]
fn halt_stops_timed_level_transition() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);

    lighting
        .level_request(&mut platform, &acked(1000, 0), 0)
        .unwrap();
    assert_eq!(lighting.level_phase(), Phase::Transitioning);

    advance(&mut platform, &mut lighting, None, 100);
    lighting
        .level_halt_request(&mut platform, &acked(0, 0))
        .unwrap();

    let record = lighting.record();
    assert_eq!(lighting.level_phase(), Phase::Idle);
    assert!(!platform.is_running(LightingTimer::LevelTransition));
    assert!(!platform.is_running(LightingTimer::LevelDelayed));
    assert_eq!(record.lightness_current, 0);
    assert_eq!(record.lightness_target, 0);
    assert_eq!(record.pri_level_target, record.pri_level_current);
    assert_eq!(platform.last_lightness(), Some((0, NOW)));

    advance(&mut platform, &mut lighting, None, 2000);
    assert_eq!(lighting.lightness_current(), 0);
}

#[test]
fn halt_stops_lightness_transition() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);

    lighting
        .lightness_request(&mut platform, &acked(500, 0), LightnessScale::Actual, 800)
        .unwrap();
    advance(&mut platform, &mut lighting, None, 100);
    lighting
        .level_halt_request(&mut platform, &unacked(0, 0))
        .unwrap();

    assert_eq!(lighting.lightness_phase(), Phase::Idle);
    assert!(!platform.is_running(LightingTimer::LightnessTransition));
    assert_eq!(lighting.lightness_target(), 0);
    assert_eq!(lighting.record().onoff_current, 0);
    assert_eq!(lighting.record().onoff_target, 0);

    advance(&mut platform, &mut lighting, None, 1000);
    assert_eq!(lighting.lightness_current(), 0);
}

#[test]
fn delayed_halt_lets_move_run_until_it_fires() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);
    lighting
        .level_move_request(&mut platform, &unacked(50, 0), 100)
        .unwrap();

    lighting
        .level_halt_request(&mut platform, &acked(0, 120))
        .unwrap();
    assert_eq!(lighting.level_phase(), Phase::MoveActive);
    let (_, response) = platform.responses[0];
    assert_eq!(response.remaining_ms, 120);

    advance(&mut platform, &mut lighting, None, 120);
    assert_eq!(lighting.lightness_current(), 200);
    assert_eq!(lighting.level_phase(), Phase::Idle);
    assert!(!platform.is_running(LightingTimer::LevelMove));

    advance(&mut platform, &mut lighting, None, 200);
    assert_eq!(lighting.lightness_current(), 200);
}

#[test]
fn move_settles_on_range_bound() {
    let config = LightingServerConfig {
        lightness_max: 40000,
        ..LightingServerConfig::DEFAULT
    };
    let (mut platform, mut lighting) = started(config);

    lighting
        .level_move_request(&mut platform, &unacked(10, 0), 16384)
        .unwrap();
    advance(&mut platform, &mut lighting, None, 23);
    assert_eq!(lighting.record().pri_level_current, 0);

    advance(&mut platform, &mut lighting, None, 1);
    let record = lighting.record();
    assert_eq!(record.pri_level_current, 7232);
    assert_eq!(record.lightness_current, 40000);
    assert_eq!(record.lightness_last, 40000);
    assert_eq!(lighting.level_phase(), Phase::Idle);
    assert!(!platform.is_running(LightingTimer::LevelMove));
}

#[test]
fn move_without_delta_stops() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);
    lighting
        .level_move_request(&mut platform, &unacked(50, 0), 100)
        .unwrap();

    lighting
        .level_move_request(&mut platform, &unacked(50, 0), 0)
        .unwrap();

    assert_eq!(lighting.level_phase(), Phase::Idle);
    assert!(!platform.is_running(LightingTimer::LevelMove));
}

#[test]
fn level_delta_saturates_at_maximum() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);
    set_lightness(&mut platform, &mut lighting, 60000);

    lighting
        .level_delta_request(&mut platform, &unacked(0, 0), 100_000)
        .unwrap();

    assert_eq!(lighting.record().pri_level_current, i16::MAX);
    assert_eq!(lighting.lightness_current(), 0xFFFF);
}

// -----------------------------------------------------------------------------
// Lightness setup
// -----------------------------------------------------------------------------

#[test]
fn range_change_pulls_lightness_inside() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);
    set_lightness(&mut platform, &mut lighting, 500);
    platform.clear();

    let range = Range { min: 1000, max: 2000 };
    lighting
        .lightness_range_request(&mut platform, &acked(0, 0), range)
        .unwrap();

    let record = lighting.record();
    assert_eq!(record.lightness_current, 1000);
    assert_eq!(record.pri_level_current, -31768);
    assert_eq!(platform.last_lightness(), Some((1000, NOW)));
    let (_, response) = platform.responses[0];
    assert_eq!(response.current, State::LightnessRange(range));
}

#[test]
fn reported_inverted_range_is_corrected() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);
    set_lightness(&mut platform, &mut lighting, 500);
    platform.clear();

    lighting
        .setup_change(&mut platform, &State::LightnessRange(Range { min: 100, max: 50 }))
        .unwrap();

    let record = lighting.record();
    assert_eq!(record.lightness_min, 50);
    assert_eq!(record.lightness_max, 50);
    assert_eq!(record.lightness_current, 50);
    assert_eq!(record.lightness_target, 50);
    assert_eq!(record.pri_level_current, -32718);
    assert_eq!(record.pri_level_target, -32718);
    assert_eq!(platform.last_lightness(), Some((50, NOW)));
}

#[test]
fn reported_default_is_clamped_into_range() {
    let config = LightingServerConfig {
        lightness_min: 1000,
        lightness_max: 2000,
        ..LightingServerConfig::DEFAULT
    };
    let (mut platform, mut lighting) = started(config);

    lighting
        .setup_change(&mut platform, &State::LightnessDefault(5000))
        .unwrap();

    assert_eq!(lighting.lightness_default(), 2000);
}

#[test]
fn unacked_setup_request_updates_only() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);

    lighting
        .lightness_default_request(&mut platform, &unacked(0, 0), 4000)
        .unwrap();

    assert_eq!(lighting.lightness_default(), 4000);
    assert!(platform.responses.is_empty());
    assert_eq!(
        platform.last_update(LIGHT_LIGHTNESS_SERVER).map(|update| update.current),
        Some(State::LightnessDefault(4000))
    );
}

#[test]
fn unknown_transition_time_is_ignored() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);

    lighting
        .transition_time_request(&mut platform, &unacked(0, 0), 0x3F)
        .unwrap();
    assert_eq!(lighting.record().transition_time, 0);

    lighting
        .transition_time_request(&mut platform, &unacked(0, 0), 0x45)
        .unwrap();
    assert_eq!(lighting.record().transition_time, 0x45);
    assert_eq!(lighting.default_transition_ms(), 5000);
}

// -----------------------------------------------------------------------------
// Persistence
// -----------------------------------------------------------------------------

#[test]
fn changes_are_stored_once_after_quiet_period() {
    let config = LightingServerConfig::DEFAULT;
    let (mut platform, mut lighting) = started(config);
    lighting
        .power_onoff_request(&mut platform, &unacked(0, 0), ON_POWER_UP_RESTORE)
        .unwrap();
    set_lightness(&mut platform, &mut lighting, 1000);

    advance(&mut platform, &mut lighting, None, 3000);
    set_lightness(&mut platform, &mut lighting, 2000);
    advance(&mut platform, &mut lighting, None, 3000);
    assert!(platform.saves.is_empty());

    advance(&mut platform, &mut lighting, None, 2000);
    assert_eq!(platform.saves, [config.ps_key]);

    let mut restored = LightingServer::new(config);
    restored.init(&mut platform).unwrap();
    assert_eq!(restored.on_power_up(), ON_POWER_UP_RESTORE);
    assert_eq!(restored.lightness_current(), 2000);
}

#[test]
fn stored_range_is_corrected_on_load() {
    let config = LightingServerConfig::DEFAULT;
    let mut platform = FakePlatform::new();
    let record = LightbulbRecord {
        lightness_min: 100,
        lightness_max: 50,
        lightness_current: 70,
        lightness_target: 70,
        lightness_last: 70,
        on_power_up: ON_POWER_UP_RESTORE,
        ..LightbulbRecord::defaults(&config)
    };
    stored(&mut platform, &config, &record);

    let mut lighting = LightingServer::new(config);
    lighting.init(&mut platform).unwrap();

    let record = lighting.record();
    assert_eq!(record.lightness_min, 50);
    assert_eq!(record.lightness_max, 50);
    assert_eq!(record.lightness_current, 50);
    assert_eq!(record.onoff_current, 1);
    assert_eq!(platform.last_lightness(), Some((50, NOW)));
}

#[test]
fn record_of_other_size_falls_back_to_defaults() {
    let config = LightingServerConfig::DEFAULT;
    let mut platform = FakePlatform::new();
    platform.store.insert(config.ps_key, vec![1, 2, 3]);

    let mut lighting = LightingServer::new(config);
    lighting.init(&mut platform).unwrap();

    assert_eq!(lighting.record().lightness_min, config.lightness_min);
    assert_eq!(lighting.lightness_current(), 0);
}

#[test]
fn reset_erases_record() {
    let config = LightingServerConfig::DEFAULT;
    let (mut platform, mut lighting) = started(config);
    set_lightness(&mut platform, &mut lighting, 1000);
    advance(&mut platform, &mut lighting, None, 5000);
    assert!(platform.store.contains_key(&config.ps_key));

    lighting.reset(&mut platform).unwrap();

    assert!(!platform.store.contains_key(&config.ps_key));
    assert_eq!(*lighting.record(), LightbulbRecord::defaults(&config));
    assert!(!platform.is_running(LightingTimer::Save));
}

#[test]
fn transport_failures_do_not_fail_requests() {
    let (mut platform, mut lighting) = started(LightingServerConfig::DEFAULT);
    platform.transport_down = true;

    lighting
        .lightness_request(&mut platform, &acked(0, 0), LightnessScale::Actual, 700)
        .unwrap();

    assert_eq!(lighting.lightness_current(), 700);
    assert!(platform.updates.is_empty());
}

// -----------------------------------------------------------------------------
// Power up
// -----------------------------------------------------------------------------

#[test]
fn power_up_off_starts_dark() {
    let config = LightingServerConfig::DEFAULT;
    let mut platform = FakePlatform::new();
    let record = LightbulbRecord {
        lightness_current: 500,
        lightness_target: 500,
        lightness_last: 500,
        on_power_up: ON_POWER_UP_OFF,
        ..LightbulbRecord::defaults(&config)
    };
    stored(&mut platform, &config, &record);

    let mut lighting = LightingServer::new(config);
    lighting.init(&mut platform).unwrap();

    let record = lighting.record();
    assert_eq!(record.lightness_current, 0);
    assert_eq!(record.lightness_target, 0);
    assert_eq!(record.onoff_current, 0);
    assert_eq!(record.lightness_last, 500);
    assert_eq!(platform.last_lightness(), Some((0, NOW)));
}

#[test]
fn power_up_on_uses_last_without_default() {
    let config = LightingServerConfig::DEFAULT;
    let mut platform = FakePlatform::new();
    let record = LightbulbRecord {
        lightness_last: 1234,
        lightness_default: 0,
        on_power_up: ON_POWER_UP_ON,
        ..LightbulbRecord::defaults(&config)
    };
    stored(&mut platform, &config, &record);

    let mut lighting = LightingServer::new(config);
    lighting.init(&mut platform).unwrap();

    let record = lighting.record();
    assert_eq!(record.lightness_current, 1234);
    assert_eq!(record.onoff_current, 1);
    assert_eq!(record.pri_level_current, -31534);
}

#[test]
fn power_up_on_fades_to_default() {
    let config = LightingServerConfig::DEFAULT;
    let mut platform = FakePlatform::new();
    let record = LightbulbRecord {
        lightness_default: 3000,
        transition_time: 0x0A,
        on_power_up: ON_POWER_UP_ON,
        ..LightbulbRecord::defaults(&config)
    };
    stored(&mut platform, &config, &record);

    let mut lighting = LightingServer::new(config);
    lighting.init(&mut platform).unwrap();

    assert_eq!(lighting.lightness_phase(), Phase::Transitioning);
    assert_eq!(lighting.lightness_current(), 0);
    assert_eq!(
        platform.lightness,
        [(0, NOW), (3000, Duration::from_millis(1000))]
    );

    advance(&mut platform, &mut lighting, None, 1000);
    assert_eq!(lighting.lightness_current(), 3000);
    assert_eq!(lighting.record().onoff_current, 1);
}

#[test]
fn power_up_restore_keeps_dark_light_off() {
    let config = LightingServerConfig::DEFAULT;
    let mut platform = FakePlatform::new();
    let record = LightbulbRecord {
        lightness_current: 0,
        lightness_target: 0,
        lightness_min: 100,
        on_power_up: ON_POWER_UP_RESTORE,
        ..LightbulbRecord::defaults(&config)
    };
    stored(&mut platform, &config, &record);

    let mut lighting = LightingServer::new(config);
    lighting.init(&mut platform).unwrap();

    assert_eq!(lighting.lightness_current(), 0);
    assert_eq!(lighting.record().onoff_current, 0);
}
