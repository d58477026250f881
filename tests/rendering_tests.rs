/// Integration tests that run the rasterizer over a world and check what reaches the frame.
use cgmath::{Point2, Point3, Vector3};
use voxel_canvas::engine_state::{
    camera_state::Player,
    rendering::{RenderMode, RenderSettings, Renderer, CLEAR_COLOR},
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType},
        world::World,
    },
};

/// A world holding only the given blocks, viewed from the origin along +z.
fn scene(blocks: &[(Point3<i32>, BlockType)]) -> (World, Player) {
    let mut world = World::new(5);
    let mut player = Player::new(&mut world);
    player.set_pose(Point3::new(0.5, 0.0, 0.5), Vector3::new(0.0, 0.0, 0.0), &mut world);
    world.reset(5);
    for (position, block_type) in blocks {
        world.add_block(*position, *block_type);
    }
    (world, player)
}

fn renderer() -> Renderer {
    let settings = RenderSettings {
        fog_limit: 0.0,
        ..Default::default()
    };
    Renderer::new(200, 150, settings, RenderMode::Flat)
}

#[test]
fn single_block_is_drawn_and_clicked() {
    let block = Point3::new(0, 1, 4);
    let (world, player) = scene(&[(block, BlockType::STONE)]);
    let mut renderer = renderer();

    let (stats, target) = renderer.render(&world, &player, Some(Point2::new(0.0, 0.0)));
    assert_eq!(stats.chunks, 1);
    assert_eq!(stats.nodes, 1);
    assert!(stats.faces >= 1);

    let target = target.unwrap();
    assert_eq!(target.block, block);
    assert_eq!(target.side, BlockSide::BACK);
    assert_eq!(target.placement_position(), Point3::new(0, 1, 3));

    let frame = renderer.framebuffer();
    assert_ne!(frame.pixel(100, 75), Some(CLEAR_COLOR));
    assert_eq!(frame.pixel(0, 0), Some(CLEAR_COLOR));
}

#[test]
fn removed_block_disappears_from_the_next_frame() {
    let block = Point3::new(0, 1, 4);
    let (mut world, player) = scene(&[(block, BlockType::STONE)]);
    let mut renderer = renderer();

    renderer.render(&world, &player, None);
    world.remove_block(block);
    let (stats, target) = renderer.render(&world, &player, Some(Point2::new(0.0, 0.0)));

    assert_eq!(stats.nodes, 0);
    assert!(target.is_none());
    assert!(renderer
        .framebuffer()
        .color_buffer_slice()
        .iter()
        .all(|&pixel| pixel == CLEAR_COLOR));
}

#[test]
fn click_hits_the_nearer_of_two_blocks() {
    let near = Point3::new(0, 1, 3);
    let far = Point3::new(0, 1, 6);
    let (world, player) = scene(&[(far, BlockType::BRICKS), (near, BlockType::GLASS)]);
    let mut renderer = renderer();

    let (stats, target) = renderer.render(&world, &player, Some(Point2::new(0.0, 0.0)));
    assert_eq!(stats.nodes, 2);
    assert_eq!(target.map(|target| target.block), Some(near));
}

#[test]
fn resizing_changes_the_frame() {
    let (world, player) = scene(&[(Point3::new(0, 1, 4), BlockType::DIRT)]);
    let mut renderer = renderer();

    renderer.resize(64, 48);
    renderer.render(&world, &player, None);
    assert_eq!(renderer.framebuffer().width(), 64);
    assert_eq!(renderer.framebuffer().color_buffer_slice().len(), 64 * 48);

    renderer.resize(0, 0);
    let (stats, target) = renderer.render(&world, &player, Some(Point2::new(0.0, 0.0)));
    assert_eq!(stats.nodes, 0);
    assert!(target.is_none());
}
