//! Colony-game integration tests for the research engine.
//!
//! Models a small colony research tree: a farm whose yield research bumps
//! the farm's production configuration, and a farm-power upgrade gated by
//! the military-aid subsystem. The military subsystem and the building
//! configuration are game-side objects; the research system only sees a
//! condition flag and an effect target.

use research_core::ResearchError;
use research_core::condition::ConditionFlag;
use research_core::definition::ResearchDefinition;
use research_core::effect::{Effect, EffectTarget, EffectTargets, FieldOp, TargetError};
use research_core::event::ResearchEvent;
use research_core::fixed::Fixed64;
use research_core::graph::ResearchGraph;
use research_core::id::{ConditionId, ResearchId, TargetId};
use research_core::state::ResearchState;
use research_core::system::ResearchSystem;
use research_core::test_utils::fixed;

// ============================================================================
// Catalog
// ============================================================================

const TIER_I: ResearchId = ResearchId(0);
const FARM_I: ResearchId = ResearchId(1);
const CROP_YIELD_I: ResearchId = ResearchId(2);
const FARM_I_POWER_I: ResearchId = ResearchId(3);
const ROAD_SANDY: ResearchId = ResearchId(4);

const MILITARY_AID: ConditionId = ConditionId(0);

const FARM_I_CONFIG: TargetId = TargetId(0);

fn colony_catalog() -> ResearchGraph {
    ResearchGraph::from_definitions([
        ResearchDefinition::new(TIER_I, "Tier I").granted(),
        ResearchDefinition::new(FARM_I, "Farm I")
            .with_cost(500)
            .with_duration(12)
            .with_prerequisite(TIER_I),
        ResearchDefinition::new(CROP_YIELD_I, "Crop Yield I")
            .with_cost(1000)
            .with_duration(24)
            .with_prerequisite(FARM_I)
            .with_effect(Effect::add(
                FARM_I_CONFIG,
                "production_quantity",
                Fixed64::ONE,
            ))
            .with_specification("Affects Farm I")
            .with_specification("Opium: Output 2 > 3")
            .with_specification("Vegetables: Output 14 > 15")
            .with_specification("Coffee: Output 6 > 7"),
        ResearchDefinition::new(FARM_I_POWER_I, "Farm I Power I")
            .with_cost(1500)
            .with_prerequisite(FARM_I)
            .with_condition(MILITARY_AID),
        ResearchDefinition::new(ROAD_SANDY, "Sandy Road").granted(),
    ])
    .unwrap()
}

// ============================================================================
// Game-side collaborators
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Product {
    name: &'static str,
    production_quantity: Fixed64,
}

/// Production configuration of the Farm I building.
#[derive(Debug, Clone, PartialEq)]
struct FarmConfig {
    products: Vec<Product>,
}

impl Default for FarmConfig {
    fn default() -> Self {
        let product = |name, qty| Product {
            name,
            production_quantity: fixed(qty),
        };
        Self {
            products: vec![
                product("Opium", 2.0),
                product("Vegetables", 14.0),
                product("Coffee", 6.0),
            ],
        }
    }
}

impl EffectTarget for FarmConfig {
    fn apply(&mut self, field: &str, op: FieldOp) -> Result<(), TargetError> {
        if field != "production_quantity" {
            return Err(TargetError::UnknownField {
                field: field.to_string(),
            });
        }
        for product in &mut self.products {
            product.production_quantity = match op {
                FieldOp::Add(delta) => product.production_quantity + delta,
                FieldOp::Set(value) => value,
            };
        }
        Ok(())
    }

    fn field(&self, _name: &str) -> Option<Fixed64> {
        None
    }
}

#[derive(Debug, Default)]
struct BuildingConfigs {
    farm_i: FarmConfig,
}

impl EffectTargets for BuildingConfigs {
    fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn EffectTarget> {
        match id {
            FARM_I_CONFIG => Some(&mut self.farm_i),
            _ => None,
        }
    }
}

/// Owns the research-support toggle. Tells the research system when it flips.
#[derive(Debug)]
struct Military {
    research_support: ConditionFlag,
}

struct Game {
    research: ResearchSystem,
    military: Military,
    configs: BuildingConfigs,
}

impl Game {
    fn new() -> Self {
        let military = Military {
            research_support: ConditionFlag::new(false),
        };
        let mut research = ResearchSystem::new(colony_catalog());
        research.register_condition(MILITARY_AID, military.research_support.clone());
        Self {
            research,
            military,
            configs: BuildingConfigs::default(),
        }
    }

    fn activate_research_support(&mut self) {
        if self.military.research_support.set(true) {
            self.research.on_condition_changed(MILITARY_AID);
        }
    }

    fn deactivate_research_support(&mut self) {
        if self.military.research_support.set(false) {
            self.research.on_condition_changed(MILITARY_AID);
        }
    }

    fn research(&mut self, id: ResearchId) -> Result<(), ResearchError> {
        self.research.research(id, &mut self.configs)
    }

    fn state(&self, id: ResearchId) -> ResearchState {
        self.research.state_of(id).unwrap()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn initial_state() {
    let game = Game::new();

    assert_eq!(game.state(TIER_I), ResearchState::Researched);
    assert_eq!(game.state(FARM_I), ResearchState::Researchable);
    assert_eq!(game.state(CROP_YIELD_I), ResearchState::Unavailable);
    assert_eq!(game.state(FARM_I_POWER_I), ResearchState::Locked);
    assert_eq!(game.state(ROAD_SANDY), ResearchState::Researched);
}

#[test]
fn researching_farm_i_completes_it() {
    let mut game = Game::new();
    game.research(FARM_I).unwrap();
    assert_eq!(game.state(FARM_I), ResearchState::Researched);
}

#[test]
fn researching_farm_i_unlocks_crop_yield_i() {
    let mut game = Game::new();
    game.research(FARM_I).unwrap();
    assert_eq!(game.state(CROP_YIELD_I), ResearchState::Researchable);
}

#[test]
fn farm_power_stays_locked_without_military_aid() {
    let mut game = Game::new();
    game.research(FARM_I).unwrap();
    assert_eq!(game.state(FARM_I_POWER_I), ResearchState::Locked);
}

#[test]
fn military_aid_unlocks_farm_power() {
    let mut game = Game::new();
    game.activate_research_support();
    game.research(FARM_I).unwrap();
    assert_eq!(game.state(FARM_I_POWER_I), ResearchState::Researchable);
}

#[test]
fn removing_military_aid_relocks_farm_power() {
    let mut game = Game::new();
    game.activate_research_support();
    game.research(FARM_I).unwrap();
    game.deactivate_research_support();
    assert_eq!(game.state(FARM_I_POWER_I), ResearchState::Locked);
}

#[test]
fn military_aid_without_prerequisite_leaves_farm_power_unavailable() {
    let mut game = Game::new();
    game.activate_research_support();
    assert_eq!(game.state(FARM_I_POWER_I), ResearchState::Unavailable);
}

#[test]
fn researched_farm_power_survives_military_aid_toggling() {
    let mut game = Game::new();
    game.activate_research_support();
    game.research(FARM_I).unwrap();
    game.research(FARM_I_POWER_I).unwrap();

    game.deactivate_research_support();
    assert_eq!(game.state(FARM_I_POWER_I), ResearchState::Researched);

    game.activate_research_support();
    assert_eq!(game.state(FARM_I_POWER_I), ResearchState::Researched);
}

#[test]
fn crop_yield_i_raises_every_farm_product() {
    let mut game = Game::new();
    let defaults = FarmConfig::default();

    game.research(FARM_I).unwrap();
    game.research(CROP_YIELD_I).unwrap();
    assert_eq!(game.state(CROP_YIELD_I), ResearchState::Researched);

    for (before, after) in defaults.products.iter().zip(&game.configs.farm_i.products) {
        assert_eq!(after.name, before.name);
        assert_eq!(
            after.production_quantity,
            before.production_quantity + Fixed64::ONE
        );
    }
}

#[test]
fn crop_yield_i_requires_farm_i_first() {
    let mut game = Game::new();
    let result = game.research(CROP_YIELD_I);
    assert!(matches!(
        result,
        Err(ResearchError::NotResearchable {
            id: CROP_YIELD_I,
            state: ResearchState::Unavailable
        })
    ));
    assert_eq!(game.configs.farm_i, FarmConfig::default());
}

#[test]
fn granted_research_cannot_be_researched_again() {
    let mut game = Game::new();
    assert!(matches!(
        game.research(TIER_I),
        Err(ResearchError::NotResearchable {
            state: ResearchState::Researched,
            ..
        })
    ));
}

#[test]
fn toggling_military_aid_twice_emits_nothing() {
    let mut game = Game::new();
    game.activate_research_support();
    game.research.drain_events();

    game.activate_research_support();
    game.research.on_condition_changed(MILITARY_AID);
    assert!(game.research.drain_events().is_empty());
}

#[test]
fn completion_events_reach_game_code() {
    let mut game = Game::new();
    game.research(FARM_I).unwrap();

    let events = game.research.drain_events();
    assert!(events.contains(&ResearchEvent::Completed { id: FARM_I }));
    assert!(events.contains(&ResearchEvent::StateChanged {
        id: CROP_YIELD_I,
        from: ResearchState::Unavailable,
        to: ResearchState::Researchable,
    }));
    // Farm power is still locked; nothing to report for it.
    assert!(!events.iter().any(|e| matches!(
        e,
        ResearchEvent::StateChanged {
            id: FARM_I_POWER_I,
            ..
        }
    )));
}

#[test]
fn specifications_are_exposed_for_display() {
    let game = Game::new();
    let crop = game.research.definition(CROP_YIELD_I).unwrap();
    assert_eq!(crop.specifications.len(), 4);
    assert_eq!(crop.specifications[0], "Affects Farm I");
}
