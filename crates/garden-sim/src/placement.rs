//! Placement legality.
//!
//! Checks run in a fixed order and the first failure wins: edge margins,
//! hero cap, covered quadrant, path proximity, trap-on-path, tower
//! collision, then water/land compatibility.

use glam::DVec2;

use garden_core::balance::TowerType;
use garden_core::enums::{PlacementRejection, SpecialFeatureKind};
use garden_core::maps::MapData;
use garden_core::rules::Rules;
use garden_core::types::BoardSize;

use crate::geometry::{distance_to_segment, in_water, quadrant_of};

/// Everything about the board a placement is checked against.
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub map: &'a MapData,
    /// Map paths already scaled to pixels.
    pub paths: &'a [Vec<DVec2>],
    pub board: BoardSize,
    pub rules: &'a Rules,
    /// Open quadrant on covered maps.
    pub open_quadrant: Option<u8>,
}

/// A tower already on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupant {
    pub position: DVec2,
    pub is_hero: bool,
}

/// Facts about an accepted spot that affect the placed tower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementSpot {
    /// Within the trap band of some path segment.
    pub on_path: bool,
    /// Inside the map's special feature (the stump).
    pub on_special_feature: bool,
}

pub fn validate_placement(
    point: DVec2,
    tower: &TowerType,
    occupants: &[Occupant],
    ctx: &PlacementContext<'_>,
) -> Result<PlacementSpot, PlacementRejection> {
    let rules = ctx.rules;
    let board = ctx.board;

    if point.x < rules.margin_x
        || point.x > board.width - rules.margin_x
        || point.y < rules.margin_top
        || point.y > board.height - rules.margin_bottom
    {
        return Err(PlacementRejection::TooCloseToEdge);
    }

    if tower.is_hero && occupants.iter().filter(|o| o.is_hero).count() >= rules.hero_limit {
        return Err(PlacementRejection::HeroLimit);
    }

    if ctx.map.covered {
        if let Some(open) = ctx.open_quadrant {
            if quadrant_of(point, board) != open {
                return Err(PlacementRejection::UnderGlass);
            }
        }
    }

    let mut spot = PlacementSpot::default();
    for segment in ctx.paths.iter().flat_map(|path| path.windows(2)) {
        let dist = distance_to_segment(point, segment[0], segment[1]);
        if dist < rules.trap_path_max_distance {
            spot.on_path = true;
        }
        if !tower.is_trap && dist < rules.tower_path_min_distance {
            return Err(PlacementRejection::TooCloseToPath);
        }
    }

    if tower.is_trap && !spot.on_path {
        return Err(PlacementRejection::TrapOffPath);
    }

    let collision = if tower.is_trap {
        rules.trap_collision_radius
    } else {
        rules.tower_collision_radius
    };
    if occupants
        .iter()
        .any(|o| o.position.distance(point) < collision)
    {
        return Err(PlacementRejection::TowerCollision);
    }

    if tower.is_trap {
        return Ok(spot);
    }

    let stump = ctx
        .map
        .special_feature
        .filter(|f| f.kind == SpecialFeatureKind::Stump);
    if let Some(feature) = stump {
        let center = DVec2::new(feature.x * board.width, feature.y * board.height);
        if point.distance(center) < rules.stump_radius {
            if tower.water_only {
                return Err(PlacementRejection::WaterTowerOnStump);
            }
            spot.on_special_feature = true;
            return Ok(spot);
        }
    }

    if tower.amphibious {
        return Ok(spot);
    }

    let water = in_water(point, ctx.map, board);
    if tower.water_only && !water {
        return Err(PlacementRejection::NeedsWater);
    }
    if !tower.water_only && water && !ctx.map.glass_floor {
        return Err(PlacementRejection::CannotBuildOnWater);
    }
    Ok(spot)
}
