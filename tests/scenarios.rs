use glam::Vec2;

use raycaster::demo::{demo_level, demo_textures};
use raycaster::pool::partition_columns;
use raycaster::raycast::cast_rays;
use raycaster::{
    Camera, Colour, Filter, Framebuffer, Level, PixelFormat, RenderConfig, RenderPipeline,
    Texture, TextureCache, Wall,
};

const WALL: Colour = Colour::new(180, 40, 40);
const FLOOR: Colour = Colour::new(40, 160, 40);
const CEILING: Colour = Colour::new(40, 40, 160);
const FILL: Colour = Colour::new(230, 200, 20);
const RIM: Colour = Colour::new(20, 20, 20);

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn textures() -> TextureCache {
    let mut cache = TextureCache::new();
    cache.insert(1, Texture::solid(8, 8, WALL));
    cache.insert(2, Texture::solid(8, 8, FLOOR));
    cache.insert(3, Texture::solid(8, 8, FLOOR));
    cache.insert(6, Texture::solid(8, 8, CEILING));
    cache.insert(8, Texture::disc(16, FILL, RIM));
    cache
}

fn square_room(size: f32) -> Level {
    let c = [
        Vec2::new(0.0, 0.0),
        Vec2::new(size, 0.0),
        Vec2::new(size, size),
        Vec2::new(0.0, size),
    ];
    let mut level = Level::default();
    for i in 0..4 {
        level.walls.push(Wall::new(c[i], c[(i + 1) % 4], 1));
    }
    level
}

#[test]
fn room_distances() {
    let level = square_room(8.0);
    let camera = Camera::new(Vec2::new(3.5, 3.5), 0.0, 0.25, 8.0, 0.5).unwrap();
    let candidates = cast_rays(&level, &camera, 64, 0..64, true);

    // straight ahead: from the plane at x = 3.75 to the wall at x = 8
    let centre = &candidates[32];
    assert_eq!(centre.hits.len(), 1);
    assert!(approx(centre.hits[0].distance, 4.25));
    assert_eq!(centre.hits[0].texture, 1);

    // left edge of the screen leans into the y = 8 wall
    let left = &candidates[0];
    assert_eq!(left.hits.len(), 1);
    assert!(approx(left.hits[0].position.y, 8.0));
    assert!(approx(left.hits[0].position.x, 5.75));
    // euclidean 4.47 from the plane, 2 units ahead of it
    assert!(approx(left.hits[0].distance, 2.0));

    // right edge leans into y = 0
    let right = &candidates[63];
    assert_eq!(right.hits.len(), 1);
    assert!(approx(right.hits[0].position.y, 0.0));
}

#[test]
fn sprite_in_front_of_wall() {
    let mut level = Level::default();
    level.walls.push(Wall::new(Vec2::new(7.0, -5.0), Vec2::new(7.0, 7.0), 1));
    level.spawn_sprite(Vec2::new(2.0, 1.0), 8);
    let camera = Camera::new(Vec2::new(1.0, 1.0), 0.0, 0.25, 8.0, 0.5).unwrap();

    let candidates = cast_rays(&level, &camera, 64, 32..33, true);
    let hits = &candidates[0].hits;
    let textures: Vec<_> = hits.iter().map(|h| h.texture).collect();
    assert_eq!(textures, [8, 1]);
    assert!(approx(hits[0].distance, 0.75));
    assert!(approx(hits[0].u, 0.5));
    assert!(approx(hits[1].distance, 5.75));

    let config = RenderConfig {
        fog: false,
        ..RenderConfig::default()
    };
    let pipeline = RenderPipeline::new(self::textures(), 4).unwrap();
    let mut fb = Framebuffer::new(64, 48, PixelFormat::Xrgb8888);
    pipeline.render(&level, &camera, &mut fb, &config).unwrap();

    // the middle of the barrel
    assert_eq!(fb.read_pixel(32, 24), FILL);
    // near the billboard's left edge, top row: a transparent corner of the
    // disc, so the ceiling behind shows
    assert_eq!(fb.read_pixel(25, 0), CEILING);
    // beside the billboard the wall is visible at the horizon
    assert_eq!(fb.read_pixel(20, 24), WALL);
}

#[test]
fn hits_stay_in_occlusion_order() {
    let level = demo_level();
    for step in 0..24 {
        let yaw = step as f32 * 0.27;
        let camera = Camera::new(level.player_start + Vec2::new(1.2, 0.9), yaw, 0.01, 12.0, 0.01)
            .unwrap();
        let width = 96;
        let candidates = cast_rays(&level, &camera, width, 0..width, true);
        for (column, ray) in candidates.iter().enumerate() {
            let (origin, _) = camera.column_ray(column, width);
            for pair in ray.hits.windows(2) {
                assert!(origin.distance(pair[0].position) <= origin.distance(pair[1].position));
                assert!(pair[0].distance <= pair[1].distance);
            }
        }
    }
}

#[test]
fn columns_are_split_without_gaps() {
    for width in 0..100 {
        for workers in 1..16 {
            let mut covered = vec![0u8; width];
            for range in partition_columns(width, workers) {
                for column in range {
                    covered[column] += 1;
                }
            }
            assert!(covered.iter().all(|&c| c == 1));
        }
    }
}

#[test]
fn demo_renders_with_every_toggle() {
    let level = demo_level();
    let pipeline = RenderPipeline::new(demo_textures(), 6).unwrap();
    let camera = Camera::new(level.player_start, 0.6, 0.01, 6.0, 0.01).unwrap();
    let mut fb = Framebuffer::new(320, 180, PixelFormat::Xrgb8888);

    for bits in 0u32..64 {
        let flag = |n: u32| bits & (1 << n) != 0;
        let config = RenderConfig {
            fog: flag(0),
            dither_fog: flag(1),
            filter: if flag(2) { Filter::Bilinear } else { Filter::Nearest },
            textures: flag(3),
            draw_floor: flag(4),
            checkerboard_floor: flag(5),
            ..RenderConfig::default()
        };
        pipeline.render(&level, &camera, &mut fb, &config).unwrap();
    }
}

#[test]
fn spawned_sprite_shows_up_next_frame() {
    let mut level = square_room(8.0);
    let camera = Camera::new(Vec2::new(4.0, 4.0), 0.0, 0.25, 8.0, 0.5).unwrap();
    let pipeline = RenderPipeline::new(textures(), 2).unwrap();
    let config = RenderConfig {
        fog: false,
        ..RenderConfig::default()
    };
    let mut fb = Framebuffer::new(32, 32, PixelFormat::Xrgb8888);

    pipeline.render(&level, &camera, &mut fb, &config).unwrap();
    assert_eq!(fb.read_pixel(16, 16), WALL);

    level.spawn_sprite(camera.position() + camera.forward(), 8);
    pipeline.render(&level, &camera, &mut fb, &config).unwrap();
    assert_eq!(fb.read_pixel(16, 16), FILL);
}
