//! Procedural board geometry.
//!
//! Every body on the board is a pure function of the viewport size, the slot
//! count and the base unit scale `S`. Nothing here touches the physics world;
//! [`crate::board::Board::assemble`] turns a [`BoardLayout`] into bodies.
//!
//! Coordinates are screen-like: x grows to the right, y grows downwards.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::LayoutError;

/// Number of peg rows.
pub const PEG_ROWS: usize = 13;

/// Fraction of the content height used as the base unit scale.
pub const SCALE_FACTOR: f32 = 0.055;

/// Number of pentagon parts stacked in each funnel wall.
pub const FUNNEL_PARTS: usize = 6;

/// Restitution of the falling disc.
pub const DISC_RESTITUTION: f32 = 0.9;

/// Immutable board configuration for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: f32,
    pub height: f32,
    pub slot_count: usize,
    pub scale: f32,
}

impl BoardConfig {
    /// Creates a configuration whose scale is derived from the viewport height.
    pub fn new(width: f32, height: f32, slot_count: usize) -> Result<Self, LayoutError> {
        Self::with_content_height(width, height, height, slot_count)
    }

    /// Creates a configuration whose scale is derived from a separate content height.
    pub fn with_content_height(
        width: f32,
        height: f32,
        content_height: f32,
        slot_count: usize,
    ) -> Result<Self, LayoutError> {
        Self::with_scale(width, height, slot_count, content_height * SCALE_FACTOR)
    }

    /// Creates a configuration with an explicit base unit scale.
    pub fn with_scale(
        width: f32,
        height: f32,
        slot_count: usize,
        scale: f32,
    ) -> Result<Self, LayoutError> {
        let config = Self {
            width,
            height,
            slot_count,
            scale,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration invariants.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.slot_count < 1 {
            return Err(LayoutError::NoSlots(self.slot_count));
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(LayoutError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        if !positive(self.scale) {
            return Err(LayoutError::InvalidScale(self.scale));
        }
        Ok(())
    }

    /// Horizontal center of the board.
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Slot count as a float, for geometry.
    #[allow(clippy::cast_precision_loss)]
    pub fn slots(&self) -> f32 {
        self.slot_count as f32
    }

    /// X of the first even-row peg column; centers the board horizontally.
    pub fn left_offset(&self) -> f32 {
        self.center_x() - self.scale * (self.slots() - 2.0) / 2.0
    }

    /// Horizontal center of slot `index`.
    #[allow(clippy::cast_precision_loss)]
    pub fn slot_center_x(&self, index: usize) -> f32 {
        self.left_offset() - self.scale / 2.0 + self.scale * index as f32
    }
}

/// Stable identity of a peg, assigned in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PegId(pub usize);

/// How a body should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub fill: Color,
    pub opacity: f32,
}

impl RenderStyle {
    pub const fn solid(fill: Color) -> Self {
        Self { fill, opacity: 1.0 }
    }

    /// Style for bodies that exist only for the simulation.
    pub const fn hidden(fill: Color) -> Self {
        Self { fill, opacity: 0.0 }
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// A static circular peg.
#[derive(Debug, Clone, PartialEq)]
pub struct Peg {
    pub id: PegId,
    pub row: usize,
    pub col: usize,
    pub center: [f32; 2],
    pub radius: f32,
}

/// A static axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub center: [f32; 2],
    pub size: [f32; 2],
    pub style: RenderStyle,
}

/// Which side of the board a funnel wall sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One pentagon of a funnel wall.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelPart {
    /// Part centroid relative to the wall's center, before the wall rotation.
    pub offset: [f32; 2],
    /// Vertices relative to the part centroid, before the wall rotation.
    pub vertices: Vec<[f32; 2]>,
}

/// Static compound body forming one side of the funnel.
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelWall {
    pub side: Side,
    pub center: [f32; 2],
    /// Rotation of the whole compound in radians.
    pub rotation: f32,
    pub parts: Vec<FunnelPart>,
}

impl FunnelWall {
    /// Vertices of every part in world coordinates.
    pub fn world_polygons(&self) -> Vec<Vec<[f32; 2]>> {
        let (sin, cos) = self.rotation.sin_cos();
        let rotate = |p: [f32; 2]| [p[0] * cos - p[1] * sin, p[0] * sin + p[1] * cos];

        self.parts
            .iter()
            .map(|part| {
                part.vertices
                    .iter()
                    .map(|v| {
                        let local = rotate([part.offset[0] + v[0], part.offset[1] + v[1]]);
                        [self.center[0] + local[0], self.center[1] + local[1]]
                    })
                    .collect()
            })
            .collect()
    }
}

/// Non-rendered sensor region catching the disc in one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSensor {
    pub index: usize,
    pub center: [f32; 2],
    pub size: [f32; 2],
    pub style: RenderStyle,
}

/// Spawn description of the dynamic disc.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscSpec {
    pub center: [f32; 2],
    pub radius: f32,
    pub restitution: f32,
    pub style: RenderStyle,
}

/// The complete static board plus the disc spawn point.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub config: BoardConfig,
    pub pegs: Vec<Peg>,
    pub left_funnel: FunnelWall,
    pub right_funnel: FunnelWall,
    pub backstop: Block,
    pub end_caps: [Block; 2],
    pub separators: Vec<Block>,
    pub sensors: Vec<SlotSensor>,
    /// Top, left, right, bottom.
    pub walls: [Block; 4],
    pub disc: DiscSpec,
}

/// Number of pegs in `row` for a board with `slot_count` slots.
///
/// Even rows line up with slot boundaries, odd rows are staggered by half a unit.
pub fn pegs_in_row(row: usize, slot_count: usize) -> usize {
    if row % 2 == 0 {
        slot_count.saturating_sub(1)
    } else {
        slot_count.saturating_sub(2)
    }
}

impl BoardLayout {
    /// Generates the whole board for a configuration.
    pub fn generate(config: &BoardConfig) -> Result<Self, LayoutError> {
        config.validate()?;

        let board = Self {
            config: *config,
            pegs: generate_pegs(config),
            left_funnel: generate_funnel(config, Side::Left),
            right_funnel: generate_funnel(config, Side::Right),
            backstop: generate_backstop(config),
            end_caps: generate_end_caps(config),
            separators: generate_separators(config),
            sensors: generate_sensors(config),
            walls: generate_walls(config),
            disc: generate_disc(config),
        };

        tracing::debug!(
            slots = config.slot_count,
            scale = config.scale,
            pegs = board.pegs.len(),
            "generated board layout"
        );

        Ok(board)
    }

    /// Total number of static bodies the layout will insert.
    pub fn static_body_count(&self) -> usize {
        self.pegs.len()
            + 2
            + 1
            + self.end_caps.len()
            + self.separators.len()
            + self.sensors.len()
            + self.walls.len()
    }
}

fn generate_pegs(config: &BoardConfig) -> Vec<Peg> {
    let s = config.scale;
    let top_offset = 2.0 * s;
    let left_offset = config.left_offset();

    let mut pegs = Vec::new();
    for row in 0..PEG_ROWS {
        let row_offset = if row % 2 == 0 { 0.0 } else { s / 2.0 };
        #[allow(clippy::cast_precision_loss)]
        let y = top_offset + s * row as f32;

        for col in 0..pegs_in_row(row, config.slot_count) {
            #[allow(clippy::cast_precision_loss)]
            let x = left_offset + s * col as f32 + row_offset;
            pegs.push(Peg {
                id: PegId(pegs.len()),
                row,
                col,
                center: [x, y],
                radius: s / 15.0,
            });
        }
    }
    pegs
}

/// Pentagon path in units of `S`, pointing to the right.
const FUNNEL_PATH: [[f32; 2]; 5] = [[0.0, 0.0], [0.5, 0.0], [1.0, 1.0], [0.5, 2.0], [0.0, 2.0]];

/// Area centroid of a simple polygon.
fn polygon_centroid(points: &[[f32; 2]]) -> [f32; 2] {
    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let cross = p[0] * q[1] - q[0] * p[1];
        area += cross;
        cx += (p[0] + q[0]) * cross;
        cy += (p[1] + q[1]) * cross;
    }
    area *= 0.5;
    [cx / (6.0 * area), cy / (6.0 * area)]
}

fn generate_funnel(config: &BoardConfig, side: Side) -> FunnelWall {
    let s = config.scale;
    let path: Vec<[f32; 2]> = FUNNEL_PATH.iter().map(|p| [p[0] * s, p[1] * s]).collect();
    let centroid = polygon_centroid(&path);
    let vertices: Vec<[f32; 2]> = path
        .iter()
        .map(|p| [p[0] - centroid[0], p[1] - centroid[1]])
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let part_ys: Vec<f32> = (0..FUNNEL_PARTS)
        .map(|i| s + 2.0 * s * (i as f32 + 1.0))
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let center_y = part_ys.iter().sum::<f32>() / FUNNEL_PARTS as f32;

    let half_width = s * config.slots() / 2.0 + s / 4.0;
    let (center_x, rotation) = match side {
        Side::Left => (config.center_x() - half_width, 0.0),
        Side::Right => (config.center_x() + half_width, std::f32::consts::PI),
    };

    let parts = part_ys
        .iter()
        .map(|y| FunnelPart {
            // The stack is symmetric about its center, so rotating it by half a
            // turn maps the set of part centers onto itself.
            offset: match side {
                Side::Left => [0.0, y - center_y],
                Side::Right => [0.0, center_y - y],
            },
            vertices: vertices.clone(),
        })
        .collect();

    FunnelWall {
        side,
        center: [center_x, center_y],
        rotation,
        parts,
    }
}

fn generate_backstop(config: &BoardConfig) -> Block {
    let s = config.scale;
    Block {
        center: [config.center_x(), 16.2 * s],
        size: [config.slots() * s + s * 1.28, 2.5 * s],
        style: RenderStyle::solid(Color::BOARD),
    }
}

fn generate_end_caps(config: &BoardConfig) -> [Block; 2] {
    let s = config.scale;
    let reach = s * (config.slots() / 2.0) + s / 2.56;
    let cap = |x: f32| Block {
        center: [x, 14.5 * s],
        size: [s / 2.0, s],
        style: RenderStyle::solid(Color::BOARD),
    };
    [cap(config.center_x() - reach), cap(config.center_x() + reach)]
}

fn generate_separators(config: &BoardConfig) -> Vec<Block> {
    let s = config.scale;
    (0..config.slot_count.saturating_sub(1))
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let x = config.left_offset() + s * i as f32;
            Block {
                center: [x, 14.8 * s],
                size: [s / 15.0, s / 2.0],
                style: RenderStyle::solid(Color::BOARD),
            }
        })
        .collect()
}

fn generate_sensors(config: &BoardConfig) -> Vec<SlotSensor> {
    let s = config.scale;
    (0..config.slot_count)
        .map(|index| SlotSensor {
            index,
            center: [config.slot_center_x(index), 14.6 * s],
            size: [s * 0.8, s * 0.7],
            style: RenderStyle::hidden(Color::ORANGE),
        })
        .collect()
}

fn generate_walls(config: &BoardConfig) -> [Block; 4] {
    let (w, h) = (config.width, config.height);
    let wall = |center: [f32; 2], size: [f32; 2]| Block {
        center,
        size,
        style: RenderStyle::hidden(Color::WHITE),
    };
    [
        wall([w / 2.0, -1.0], [w, 1.0]),
        wall([-1.0, h / 2.0], [1.0, h]),
        wall([w + 1.0, h / 2.0], [1.0, h]),
        wall([w / 2.0, h + 1.0], [w, 1.0]),
    ]
}

fn generate_disc(config: &BoardConfig) -> DiscSpec {
    let s = config.scale;
    DiscSpec {
        center: [config.center_x() - config.slots() / 2.0 - s * 9.55, s * 1.64],
        radius: s * 0.357,
        restitution: DISC_RESTITUTION,
        style: RenderStyle::solid(Color::DISC),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn layout(slots: usize) -> BoardLayout {
        let config = BoardConfig::new(1280.0, 800.0, slots).unwrap();
        BoardLayout::generate(&config).unwrap()
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(6)]
    #[case(12)]
    fn test_sensors_cover_every_slot_in_order(#[case] slots: usize) {
        let board = layout(slots);

        assert_eq!(board.sensors.len(), slots);
        let indices: Vec<usize> = board.sensors.iter().map(|s| s.index).collect();
        assert_eq!(indices, (0..slots).collect::<Vec<_>>());
        assert!(board
            .sensors
            .windows(2)
            .all(|pair| pair[0].center[0] < pair[1].center[0]));
        assert!(board.sensors.iter().all(|s| !s.style.is_visible()));
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 7)]
    #[case(3, 7 * 2 + 6)]
    #[case(6, 7 * 5 + 6 * 4)]
    fn test_peg_count(#[case] slots: usize, #[case] expected: usize) {
        let board = layout(slots);
        assert_eq!(board.pegs.len(), expected);

        let by_rows: usize = (0..PEG_ROWS).map(|row| pegs_in_row(row, slots)).sum();
        assert_eq!(by_rows, expected);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(6)]
    #[case(12)]
    fn test_pegs_inside_viewport(#[case] slots: usize) {
        let board = layout(slots);
        for peg in &board.pegs {
            assert!((0.0..=1280.0).contains(&peg.center[0]), "peg {:?}", peg.id);
            assert!((0.0..=800.0).contains(&peg.center[1]), "peg {:?}", peg.id);
        }
    }

    #[test]
    fn test_peg_rows_are_staggered() {
        let board = layout(6);
        let s = board.config.scale;
        let left = board.config.left_offset();

        let first_even = board.pegs.iter().find(|p| p.row == 0).unwrap();
        let first_odd = board.pegs.iter().find(|p| p.row == 1).unwrap();
        assert!((first_even.center[0] - left).abs() < 1e-4);
        assert!((first_odd.center[0] - (left + s / 2.0)).abs() < 1e-4);
        assert!((first_odd.center[1] - first_even.center[1] - s).abs() < 1e-4);
        assert!((first_even.center[1] - 2.0 * s).abs() < 1e-4);
        assert!((first_even.radius - s / 15.0).abs() < 1e-6);

        // Ids follow row-major order.
        for (i, peg) in board.pegs.iter().enumerate() {
            assert_eq!(peg.id, PegId(i));
        }
    }

    #[test]
    fn test_separators_sit_between_sensors() {
        let board = layout(6);
        assert_eq!(board.separators.len(), 5);

        for (i, sep) in board.separators.iter().enumerate() {
            let left = board.sensors[i].center[0];
            let right = board.sensors[i + 1].center[0];
            assert!((sep.center[0] - (left + right) / 2.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_funnel_walls_are_mirror_images() {
        let board = layout(6);
        let center_x = board.config.center_x();

        assert_eq!(board.left_funnel.parts.len(), FUNNEL_PARTS);
        assert_eq!(board.right_funnel.parts.len(), FUNNEL_PARTS);
        assert!(
            (center_x - board.left_funnel.center[0] - (board.right_funnel.center[0] - center_x))
                .abs()
                < 1e-3
        );

        let left = board.left_funnel.world_polygons();
        let right = board.right_funnel.world_polygons();
        let center_y = board.left_funnel.center[1];

        // Every right vertex mirrors some left vertex across the board center.
        for polygon in &right {
            for v in polygon {
                let mirrored = [2.0 * center_x - v[0], v[1]];
                let found = left.iter().flatten().any(|l| {
                    (l[0] - mirrored[0]).abs() < 1e-2 && (l[1] - mirrored[1]).abs() < 1e-2
                });
                assert!(found, "no mirror for {v:?}");
            }
        }

        // Part centers run from 3S to 13S around the middle of the funnel.
        let s = board.config.scale;
        assert!((center_y - 8.0 * s).abs() < 1e-3);
    }

    #[test]
    fn test_funnel_parts_point_inward() {
        let board = layout(6);
        let left_tip = board
            .left_funnel
            .world_polygons()
            .iter()
            .flatten()
            .map(|v| v[0])
            .fold(f32::MIN, f32::max);
        let right_tip = board
            .right_funnel
            .world_polygons()
            .iter()
            .flatten()
            .map(|v| v[0])
            .fold(f32::MAX, f32::min);
        let center_x = board.config.center_x();

        assert!(left_tip < center_x);
        assert!(right_tip > center_x);
        assert!(left_tip > board.left_funnel.center[0]);
        assert!(right_tip < board.right_funnel.center[0]);
    }

    #[test]
    fn test_polygon_centroid_of_square() {
        let c = polygon_centroid(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]);
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert!((c[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_walls_enclose_viewport() {
        let board = layout(4);
        let [top, left, right, bottom] = &board.walls;

        assert_eq!(top.center, [640.0, -1.0]);
        assert_eq!(left.center, [-1.0, 400.0]);
        assert_eq!(right.center, [1281.0, 400.0]);
        assert_eq!(bottom.center, [640.0, 801.0]);
        assert_eq!(top.size, [1280.0, 1.0]);
        assert_eq!(left.size, [1.0, 800.0]);
    }

    #[test]
    fn test_disc_spawn() {
        let board = layout(6);
        let s = board.config.scale;

        assert!((board.disc.radius - 0.357 * s).abs() < 1e-4);
        assert!((board.disc.restitution - 0.9).abs() < f32::EPSILON);
        assert!(board.disc.center[0] < board.config.center_x());
        assert!((board.disc.center[1] - 1.64 * s).abs() < 1e-4);
    }

    #[test]
    fn test_single_slot_board() {
        let board = layout(1);

        assert!(board.pegs.is_empty());
        assert!(board.separators.is_empty());
        assert_eq!(board.sensors.len(), 1);
        assert!((board.sensors[0].center[0] - board.config.slot_center_x(0)).abs() < 1e-4);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = BoardConfig::with_scale(1024.0, 768.0, 5, 40.0).unwrap();
        assert_eq!(
            BoardLayout::generate(&config).unwrap(),
            BoardLayout::generate(&config).unwrap()
        );
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        assert_eq!(
            BoardConfig::new(800.0, 600.0, 0),
            Err(LayoutError::NoSlots(0))
        );
        assert!(matches!(
            BoardConfig::new(0.0, 600.0, 3),
            Err(LayoutError::InvalidViewport { .. })
        ));
        assert!(matches!(
            BoardConfig::new(800.0, f32::NAN, 3),
            Err(LayoutError::InvalidViewport { .. })
        ));
        assert!(matches!(
            BoardConfig::with_scale(800.0, 600.0, 3, -1.0),
            Err(LayoutError::InvalidScale(_))
        ));

        let bogus = BoardConfig {
            width: 800.0,
            height: 600.0,
            slot_count: 0,
            scale: 10.0,
        };
        assert!(BoardLayout::generate(&bogus).is_err());
    }

    #[test]
    fn test_scale_follows_content_height() {
        let config = BoardConfig::with_content_height(1280.0, 800.0, 1000.0, 3).unwrap();
        assert!((config.scale - 55.0).abs() < 1e-4);
    }
}
