/// Integration tests that drive the engine the way the window does: input sources push
/// events into the queue and the engine drains them at the start of each tick.
use cgmath::{Point3, Vector3};
use voxel_canvas::{
    application_state::{
        input_manager::InputManager, input_state::InputEvent, touch_control::TouchBridge,
    },
    core::EventQueue,
    engine_state::{
        config::EngineConfig,
        persistence::MemoryStorage,
        rendering::CLEAR_COLOR,
        voxels::block::block_type::BlockType,
        EngineState,
    },
};
use winit::keyboard::KeyCode;

const WINDOW: (u32, u32) = (200, 150);

fn engine() -> EngineState {
    let config = EngineConfig {
        seed: Some(5),
        width: WINDOW.0,
        height: WINDOW.1,
        fog_limit: 0.0,
        ..Default::default()
    };
    EngineState::with_storage(config, Box::new(MemoryStorage::new()))
}

/// An engine whose only block is the given one, with the player floating at the origin
/// looking along +z.
fn scene_engine(block: Point3<i32>) -> EngineState {
    let mut engine = engine();
    engine.player.gravity = false;
    engine.player.collision = false;
    engine
        .player
        .set_pose(Point3::new(0.5, 0.0, 0.5), Vector3::new(0.0, 0.0, 0.0), &mut engine.world);
    engine.world.reset(5);
    engine.world.add_block(block, BlockType::STONE);
    engine
}

#[test]
fn held_key_walks_until_released() {
    let mut engine = scene_engine(Point3::new(0, 1, 4));
    let mut input = InputManager::new(WINDOW);
    let mut queue = EventQueue::new();

    input.set_key(KeyCode::KeyW, true);
    input.emit_events(&mut queue);
    engine.tick(0.1, &mut queue);
    assert!(queue.is_empty());
    assert!((engine.player.position().z - 1.0).abs() < 1e-4);

    input.emit_events(&mut queue);
    engine.tick(0.1, &mut queue);
    assert!((engine.player.position().z - 1.5).abs() < 1e-4);

    input.set_key(KeyCode::KeyW, false);
    input.emit_events(&mut queue);
    engine.tick(0.1, &mut queue);
    assert!((engine.player.position().z - 1.5).abs() < 1e-4);
}

#[test]
fn digit_keys_select_and_scroll_steps_through_the_catalog() {
    let mut engine = engine();
    let mut input = InputManager::new(WINDOW);
    let mut queue = EventQueue::new();

    input.set_key(KeyCode::Digit6, true);
    input.emit_events(&mut queue);
    engine.tick(0.0, &mut queue);
    assert_eq!(engine.selected(), BlockType::WOOD);

    queue.push(InputEvent::SelectStep(1));
    engine.tick(0.0, &mut queue);
    assert_eq!(engine.selected(), BlockType::BRICKS);
}

#[test]
fn touch_drag_walks_and_tap_places() {
    let mut engine = scene_engine(Point3::new(0, 1, 4));
    let mut touch = TouchBridge::new(25.0, WINDOW);
    let mut queue = EventQueue::new();

    touch.begin(1, (100.0, 75.0));
    touch.drag(1, (100.0, 20.0), &mut queue);
    engine.tick(0.1, &mut queue);
    assert!((engine.player.position().z - 1.0).abs() < 1e-4);

    touch.end(1, (100.0, 20.0), &mut queue);
    engine.tick(0.1, &mut queue);
    assert!((engine.player.position().z - 1.0).abs() < 1e-4);
    assert!(engine.world.get_block(Point3::new(0, 1, 3)).is_none());

    touch.begin(2, (100.0, 75.0));
    touch.end(2, (100.0, 75.0), &mut queue);
    engine.tick(0.0, &mut queue);
    assert_eq!(
        engine.world.get_block(Point3::new(0, 1, 3)).map(|block| block.block_type),
        Some(engine.selected())
    );
}

#[test]
fn spawned_player_sees_the_terrain() {
    let mut engine = engine();
    let spawn = engine.world.spawn();
    engine.player.set_pose(
        Point3::new(0.5, spawn.y as f32, 0.5),
        Vector3::new(-1.2, 0.0, 0.0),
        &mut engine.world,
    );

    let stats = engine.tick(0.016, &mut EventQueue::new());
    assert!(stats.chunks > 0);
    assert!(stats.nodes > 0);
    assert!(stats.faces > 0);
    assert!(engine
        .frame()
        .color_buffer_slice()
        .iter()
        .any(|&pixel| pixel != CLEAR_COLOR));
}
