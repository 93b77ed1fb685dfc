//! High-level run orchestrator.
//!
//! [`Runtime`] owns the run context and the single active combat session.
//! Every player action borrows both through a short-lived
//! [`CombatEngine`], then the outcome is logged and published on the
//! [`EventBus`].

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use game_content::{LoadoutId, MonsterCatalog, starting_operators};
use game_core::{
    CombatEngine, CombatPhase, CombatPreview, CombatSession, DieId, Encounter, GameConfig,
    GameError, MonsterOracle, RelicId, RunContext, RunState, Token, TurnResolution,
};

use crate::api::{Result, RuntimeError};
use crate::events::{CombatEvent, EncounterSummary, Event, EventBus, PlayerEvent, Topic};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    /// Run seed; every encounter derives its RNG from it.
    pub seed: u32,
    pub ascension: u8,
    pub loadout: LoadoutId,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: EventBus::DEFAULT_CAPACITY,
            seed: 1,
            ascension: 0,
            loadout: LoadoutId::default(),
        }
    }
}

/// One run of consecutive combats.
pub struct Runtime {
    config: RuntimeConfig,
    monsters: Arc<dyn MonsterOracle + Send + Sync>,
    ctx: RunContext,
    combat: Option<CombatSession>,
    abandoned: bool,
    bus: EventBus,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    pub fn combat(&self) -> Option<&CombatSession> {
        self.combat.as_ref()
    }

    pub fn event_bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// The run ends when the player dies or gives up.
    pub fn is_run_over(&self) -> bool {
        self.abandoned || !self.ctx.player.is_alive()
    }

    /// Hex SHA-256 of the active session.
    pub fn session_digest(&self) -> Result<String> {
        let session = self.combat.as_ref().ok_or(RuntimeError::NoActiveCombat)?;
        let digest = session
            .digest()
            .map_err(|e| RuntimeError::Serialization(e.to_string()))?;
        Ok(hex::encode(digest))
    }

    /// Encounter for the current floor: the act boss on the last floor of an
    /// act, an elite on every third floor, a regular otherwise.
    pub fn next_encounter(&self) -> Encounter {
        let run = &self.ctx.run;
        let floor_in_act = run.floor % RunState::FLOORS_PER_ACT;
        if floor_in_act == RunState::FLOORS_PER_ACT - 1
            && let Some(boss) = self.monsters.boss_for_act(run.act)
        {
            return Encounter::monster(boss);
        }
        Encounter::random(floor_in_act % 3 == 2)
    }

    /// Adds a relic to the player, applying its pickup effect.
    pub fn grant_relic(&mut self, relic: RelicId) -> Result<()> {
        self.ctx.player.add_relic(relic)?;
        info!(relic = %relic, "relic gained");
        self.bus.publish(PlayerEvent::RelicGained { relic });
        self.publish_hp();
        Ok(())
    }

    // ===== combat lifecycle =====

    pub fn start_combat(&mut self, encounter: Encounter) -> Result<&CombatSession> {
        if self.is_run_over() {
            return Err(RuntimeError::RunOver);
        }
        if self.combat.is_some() {
            return Err(RuntimeError::CombatInProgress);
        }

        let session = CombatEngine::start(&self.ctx, self.monsters.as_ref(), &encounter)
            .inspect_err(|e| warn!(code = e.error_code(), error = %e, "combat failed to start"))?;

        let monster = &session.monster;
        let summary = EncounterSummary {
            floor: self.ctx.run.floor,
            act: self.ctx.run.act,
            monster_id: monster.id.clone(),
            monster_name: monster.name.clone(),
            target: monster.hp,
            attack_die: monster.attack_die,
            attack_dice_count: monster.attack_dice_count,
            elite: monster.elite,
            boss: monster.boss,
            conditions: session.conditions.iter().copied().collect(),
        };
        info!(
            floor = summary.floor,
            monster = %summary.monster_id,
            target = summary.target,
            conditions = ?summary.conditions,
            "combat started"
        );
        self.bus.publish(CombatEvent::Started(summary));
        Ok(&*self.combat.insert(session))
    }

    /// Submits the current expression.
    ///
    /// Rejected submissions are published and returned as errors; nothing in
    /// the session or the run changes.
    pub fn evaluate(&mut self) -> Result<TurnResolution> {
        let hp_before = (self.ctx.player.hp, self.ctx.player.max_hp);
        let gold_before = self.ctx.player.gold;

        let outcome = self.engine()?.evaluate();
        let resolution = match outcome {
            Ok(resolution) => resolution,
            Err(err) => {
                let turn = self.combat.as_ref().map_or(0, |s| s.turn);
                warn!(turn, code = err.error_code(), reason = %err, "submission rejected");
                self.bus.publish(CombatEvent::Rejected {
                    turn,
                    code: err.error_code().to_string(),
                    reason: err.to_string(),
                });
                return Err(err.into());
            }
        };

        info!(
            turn = resolution.turn,
            result = resolution.value,
            target = resolution.target,
            outcome = ?resolution.outcome.kind,
            damage_taken = resolution.damage_taken,
            gold = resolution.gold_earned,
            "turn resolved"
        );
        self.bus
            .publish(CombatEvent::Resolved(Box::new(resolution.clone())));

        if let Some(relic) = resolution.rescued_by {
            info!(relic = %relic, "relic consumed");
            self.bus.publish(PlayerEvent::RelicConsumed { relic });
        }
        if (self.ctx.player.hp, self.ctx.player.max_hp) != hp_before {
            self.publish_hp();
        }
        if self.ctx.player.gold != gold_before {
            self.bus.publish(PlayerEvent::GoldChanged {
                gold: self.ctx.player.gold,
                delta: self.ctx.player.gold.saturating_sub(gold_before),
            });
        }
        if resolution.phase.is_over() {
            info!(phase = %resolution.phase, turns = resolution.turn, "combat ended");
            self.bus.publish(CombatEvent::Ended {
                phase: resolution.phase,
                turns: resolution.turn,
            });
        }
        Ok(resolution)
    }

    /// Closes a finished combat. A victory moves the run to the next floor.
    pub fn finish_combat(&mut self) -> Result<CombatPhase> {
        let phase = self
            .combat
            .as_ref()
            .map(|s| s.phase)
            .ok_or(RuntimeError::NoActiveCombat)?;
        if !phase.is_over() {
            return Err(RuntimeError::CombatNotFinished);
        }
        self.combat = None;

        if phase == CombatPhase::Victory {
            self.ctx.run.advance_floor();
            let (floor, act) = (self.ctx.run.floor, self.ctx.run.act);
            info!(floor, act, "floor advanced");
            self.bus.publish(PlayerEvent::FloorAdvanced { floor, act });
        }
        Ok(phase)
    }

    /// Abandons the run, discarding any combat in progress.
    pub fn give_up(&mut self) {
        if let Some(session) = self.combat.take() {
            info!(turn = session.turn, monster = %session.monster.id, "combat abandoned");
            self.bus
                .publish(CombatEvent::Abandoned { turn: session.turn });
        }
        self.abandoned = true;
        info!(floor = self.ctx.run.floor, "run abandoned");
    }

    // ===== expression editing =====

    pub fn place_die(&mut self, id: DieId) -> Result<()> {
        self.engine()?.place_die(id)?;
        debug!(die = %id, "die placed");
        Ok(())
    }

    pub fn place_operator(&mut self, hand_index: usize) -> Result<()> {
        self.engine()?.place_operator(hand_index)?;
        debug!(hand_index, "operator placed");
        Ok(())
    }

    pub fn place_token(&mut self, token: Token, index: Option<usize>) -> Result<()> {
        self.engine()?.place_token(token, index)?;
        Ok(())
    }

    pub fn remove_token(&mut self, index: usize) -> Result<Token> {
        Ok(self.engine()?.remove_token(index)?)
    }

    pub fn move_token(&mut self, from: usize, to: usize) -> Result<()> {
        self.engine()?.move_token(from, to)?;
        Ok(())
    }

    pub fn clear_expression(&mut self) -> Result<()> {
        self.engine()?.clear_expression();
        Ok(())
    }

    // ===== dice =====

    pub fn toggle_hold(&mut self, id: DieId) -> Result<bool> {
        Ok(self.engine()?.toggle_hold(id))
    }

    /// Re-rolls unheld dice. Returns `false` when no reroll was available.
    pub fn reroll(&mut self) -> Result<bool> {
        let rerolled = self.engine()?.reroll();
        if let Some(session) = self.combat.as_ref()
            && rerolled
        {
            debug!(rerolls_left = session.rerolls_left, "dice rerolled");
            self.bus.publish(CombatEvent::Rerolled {
                turn: session.turn,
                rerolls_left: session.rerolls_left,
            });
        }
        Ok(rerolled)
    }

    pub fn reroll_boss_target(&mut self) -> Result<bool> {
        let rerolled = self.engine()?.reroll_boss_target();
        if let Some(session) = self.combat.as_ref()
            && rerolled
        {
            info!(target = session.monster.hp, "boss target rerolled");
            self.bus.publish(CombatEvent::BossTargetRerolled {
                target: session.monster.hp,
            });
        }
        Ok(rerolled)
    }

    /// Projects the current expression. Leaves the session untouched.
    pub fn preview(&mut self) -> Result<CombatPreview> {
        Ok(self.engine()?.preview()?)
    }

    fn engine(&mut self) -> Result<CombatEngine<'_>> {
        let session = self.combat.as_mut().ok_or(RuntimeError::NoActiveCombat)?;
        Ok(CombatEngine::new(
            session,
            &mut self.ctx,
            &self.config.game_config,
        ))
    }

    fn publish_hp(&self) {
        self.bus.publish(PlayerEvent::HpChanged {
            hp: self.ctx.player.hp,
            max_hp: self.ctx.player.max_hp,
        });
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    monsters: Option<Arc<dyn MonsterOracle + Send + Sync>>,
    bus: Option<EventBus>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            monsters: None,
            bus: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn ascension(mut self, level: u8) -> Self {
        self.config.ascension = level;
        self
    }

    pub fn loadout(mut self, loadout: LoadoutId) -> Self {
        self.config.loadout = loadout;
        self
    }

    /// Replaces the built-in monster catalog.
    pub fn monsters(mut self, oracle: impl MonsterOracle + Send + Sync + 'static) -> Self {
        self.monsters = Some(Arc::new(oracle));
        self
    }

    /// Publishes on an existing bus instead of creating one.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn build(self) -> Result<Runtime> {
        let RuntimeConfig {
            ref game_config,
            event_buffer_size,
            seed,
            ascension,
            loadout,
        } = self.config;

        let ctx = RunContext::new_run(
            seed,
            loadout.dice(),
            starting_operators(),
            ascension,
            game_config,
        )?;
        info!(
            seed,
            ascension,
            loadout = %loadout,
            hp = ctx.player.hp,
            dice = ctx.player.dice_pool.len(),
            "run started"
        );

        Ok(Runtime {
            monsters: self.monsters.unwrap_or_else(|| Arc::new(MonsterCatalog)),
            bus: self
                .bus
                .unwrap_or_else(|| EventBus::with_capacity(event_buffer_size)),
            ctx,
            combat: None,
            abandoned: false,
            config: self.config,
        })
    }
}
