#[cfg(test)]
mod tests {
    use crate::balance::{BalanceTable, EnemyType};
    use crate::commands::PlayerCommand;
    use crate::components::StatusEffects;
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::GameEvent;
    use crate::maps::MapCatalog;
    use crate::rules::Rules;
    use crate::state::GameStateSnapshot;
    use crate::types::{BoardSize, NormPoint};

    #[test]
    fn test_builtin_balance_parses_and_validates() {
        let table = BalanceTable::builtin().unwrap();
        table.validate().unwrap();
        assert!(table.tower("pea_shooter").is_some());
        assert!(table.enemy("emperor").is_some());
        assert_eq!(table.waves.base_count, 5);
        assert!(table.difficulty("medium").is_ok());
    }

    #[test]
    fn test_builtin_maps_parse_and_validate() {
        let catalog = MapCatalog::builtin().unwrap();
        for key in catalog.keys() {
            catalog.get(key).unwrap().validate(key).unwrap();
        }
        assert_eq!(catalog.get("crossing_roads").unwrap().paths.len(), 2);
        assert!(catalog.get("glass_layer").unwrap().glass_floor);
    }

    #[test]
    fn test_missing_keys_are_named() {
        let table = BalanceTable::builtin().unwrap();
        let err = table.difficulty("nightmare").unwrap_err();
        assert!(err.to_string().contains("nightmare"));

        let catalog = MapCatalog::builtin().unwrap();
        assert!(matches!(
            catalog.get("atlantis"),
            Err(ConfigError::MissingMap(key)) if key == "atlantis"
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_boss() {
        let mut table = BalanceTable::builtin().unwrap();
        table.waves.bosses.wave50 = "ghost".into();
        match table.validate() {
            Err(ConfigError::MissingEnemyType { id, referenced_by }) => {
                assert_eq!(id, "ghost");
                assert_eq!(referenced_by, "bosses.wave50");
            }
            other => panic!("expected MissingEnemyType, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_mismatched_weights() {
        let mut table = BalanceTable::builtin().unwrap();
        table.waves.spawn_rules.waves_11_25.weights.pop();
        assert!(matches!(
            table.validate(),
            Err(ConfigError::InvalidSpawnPool(label, _)) if label == "waves11_25"
        ));
    }

    #[test]
    fn test_empty_path_rejected() {
        let json = r#"{"broken": {"name": "Broken", "paths": [[{"x": 0.1, "y": 0.1}]]}}"#;
        let catalog = MapCatalog::from_json(json).unwrap();
        let map = catalog.get("broken").unwrap();
        assert!(matches!(map.validate("broken"), Err(ConfigError::EmptyPath(_))));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = BalanceTable::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { what: "balance table", .. }));
    }

    #[test]
    fn test_pool_tiers() {
        let table = BalanceTable::builtin().unwrap();
        let rules = &table.waves.spawn_rules;
        assert_eq!(rules.pool_for_wave(1).0, "waves1_10");
        assert_eq!(rules.pool_for_wave(10).0, "waves1_10");
        assert_eq!(rules.pool_for_wave(11).0, "waves11_25");
        assert_eq!(rules.pool_for_wave(40).0, "waves26_40");
        assert_eq!(rules.pool_for_wave(60).0, "waves41_60");
        assert_eq!(rules.pool_for_wave(61).0, "waves61plus");
    }

    #[test]
    fn test_effective_resistance() {
        let table = BalanceTable::builtin().unwrap();
        let resistance = |id: &str| table.enemy(id).unwrap().effective_resistance();
        assert_eq!(resistance("aphid"), Resistance::None);
        assert_eq!(resistance("knight"), Resistance::Armor);
        assert_eq!(resistance("reinforced_ninja"), Resistance::Reinforced);
    }

    #[test]
    fn test_enemy_type_defaults() {
        let json = r#"{"base_health": 10, "base_speed": 1.0, "bounty": 3}"#;
        let enemy: EnemyType = serde_json::from_str(json).unwrap();
        assert_eq!(enemy.radius, 10.0);
        assert_eq!(enemy.category, EnemyCategory::Normal);
        assert_eq!(enemy.lives_damage, None);
        assert_eq!(enemy.effective_resistance(), Resistance::None);
    }

    #[test]
    fn test_rules_partial_override() {
        let rules: Rules = serde_json::from_str(r#"{"spawn_delay_ticks": 10}"#).unwrap();
        assert_eq!(rules.spawn_delay_ticks, 10);
        assert_eq!(rules.wave_bonus_money, Rules::default().wave_bonus_money);
        assert_eq!(rules.meta_gold_for(3), rules.meta_gold_base + 3 * rules.meta_gold_per_wave);
    }

    #[test]
    fn test_board_scaling() {
        let board = BoardSize::new(1000.0, 700.0);
        let px = NormPoint::new(0.5, 0.5).to_board(board);
        assert_eq!(px.x, 500.0);
        assert_eq!(px.y, 350.0);
        let back = board.normalize(px);
        assert_eq!(back, NormPoint::new(0.5, 0.5));
    }

    #[test]
    fn test_status_effects_queries() {
        let mut effects = StatusEffects::default();
        assert!(!effects.is_active(StatusKind::Frozen));
        effects.remaining.insert(StatusKind::Frozen, 3);
        effects.remaining.insert(StatusKind::Burning, 0);
        assert!(effects.is_active(StatusKind::Frozen));
        assert!(!effects.is_active(StatusKind::Burning));
        assert_eq!(effects.active(), vec![StatusKind::Frozen]);
        assert_eq!(effects.remaining_ticks(StatusKind::Voided), 0);
    }

    #[test]
    fn test_speed_toggle() {
        assert_eq!(GameSpeed::Normal.steps_per_frame(), 1);
        assert_eq!(GameSpeed::Normal.toggled(), GameSpeed::Fast);
        assert_eq!(GameSpeed::Fast.steps_per_frame(), 2);
        assert_eq!(GameSpeed::Fast.toggled(), GameSpeed::Normal);
    }

    #[test]
    fn test_command_serde_tagging() {
        let cmd = PlayerCommand::PlaceTower {
            x: 120.0,
            y: 300.0,
            tower_type: "pea_shooter".into(),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"PlaceTower\""));
        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);

        let merge: PlayerCommand =
            serde_json::from_str(r#"{"type":"MergeParagon","tower_ids":[1,2,3]}"#).unwrap();
        assert_eq!(merge, PlayerCommand::MergeParagon { tower_ids: [1, 2, 3] });
    }

    #[test]
    fn test_event_carries_reject_reason() {
        let event = GameEvent::IntentRejected {
            reason: RejectReason::Placement(PlacementRejection::TooCloseToPath),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("TooCloseToPath"));
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_snapshot_default_serializes() {
        let snapshot = GameStateSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Playing);
        assert!(back.towers.is_empty());
    }
}
