use bevy::prelude::*;

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("Camera spawned");
}

/// Map an engine position (origin top-left, y down) inside a `bounds`-sized
/// playfield to Bevy world space (origin centre, y up).
pub fn canvas_to_world(position: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(position.x - bounds.x / 2.0, bounds.y / 2.0 - position.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_corners_map_to_world_corners() {
        let bounds = Vec2::new(800.0, 600.0);
        assert_eq!(canvas_to_world(Vec2::ZERO, bounds), Vec2::new(-400.0, 300.0));
        assert_eq!(canvas_to_world(bounds, bounds), Vec2::new(400.0, -300.0));
        assert_eq!(canvas_to_world(bounds / 2.0, bounds), Vec2::ZERO);
    }
}
