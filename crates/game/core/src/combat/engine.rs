use super::resolution::{GoldInputs, base_gold};
use super::{
    CombatError, CombatPhase, CombatPreview, CombatSession, DamagePreview, EvaluateError,
    TokenError, TurnResolution,
};
use crate::GameConfig;
use crate::condition::{
    ActiveConditions, BlockReason, ConditionId, DamageOutcome, DamageRules, OutcomeKind,
    calculate_damage, check_all_dice, pick_conditions, validate_conditions,
};
use crate::dice::{DieId, roll_pool};
use crate::env::{MonsterOracle, RngSource, SeededRng};
use crate::expression::{self, ExpressionError, Token};
use crate::monster::MonsterInstance;
use crate::numbers;
use crate::relic::{EvaluateContext, GoldContext, RelicMemo, RelicPipeline};
use crate::scoring::{ScoreContext, evaluate_combos};
use crate::state::{PlayerState, RunContext};

/// Fractions a `decimal_target` encounter adds to the floored target.
const DECIMAL_FRACTIONS: [f64; 3] = [0.5, 0.25, 0.75];

/// Which monster to fight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    /// Explicit template id. When absent, one is drawn from the tier 1
    /// regulars, or the tier 2 elites for an elite encounter.
    pub monster_id: Option<String>,
    pub elite: bool,
}

impl Encounter {
    pub fn monster(id: impl Into<String>) -> Self {
        Self {
            monster_id: Some(id.into()),
            elite: false,
        }
    }

    pub fn random(elite: bool) -> Self {
        Self {
            monster_id: None,
            elite,
        }
    }
}

/// Drives one encounter against the run it belongs to.
///
/// The engine borrows the session and the run context for the duration of a
/// single player action. Every mutating method either fully applies or leaves
/// both untouched.
pub struct CombatEngine<'a> {
    session: &'a mut CombatSession,
    ctx: &'a mut RunContext,
    config: &'a GameConfig,
}

impl<'a> CombatEngine<'a> {
    pub fn new(
        session: &'a mut CombatSession,
        ctx: &'a mut RunContext,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            session,
            ctx,
            config,
        }
    }

    pub fn session(&self) -> &CombatSession {
        self.session
    }

    /// Sets up an encounter on the current floor.
    ///
    /// The RNG is seeded from the run seed and floor. Draw order: monster pick
    /// (if needed), monster HP, conditions, decimal fraction (if needed), the
    /// dice tray, then roll and combat-start relics.
    pub fn start(
        ctx: &RunContext,
        monsters: &dyn MonsterOracle,
        encounter: &Encounter,
    ) -> Result<CombatSession, CombatError> {
        if ctx.player.dice_pool.is_empty() {
            return Err(CombatError::EmptyDicePool);
        }

        let floor = ctx.run.floor;
        let modifiers = ctx.run.modifiers;
        let mut rng = SeededRng::for_floor(ctx.run.seed, floor);

        let monster_id = match &encounter.monster_id {
            Some(id) => id.clone(),
            None => {
                let (kind, tier, pool) = if encounter.elite {
                    ("elite", 2, monsters.elites(2))
                } else {
                    ("regular", 1, monsters.regulars(1))
                };
                rng.pick(&pool)
                    .map(|id| id.to_string())
                    .ok_or(CombatError::EmptyMonsterPool { kind, tier })?
            }
        };
        let template = monsters
            .template(&monster_id)
            .ok_or_else(|| CombatError::UnknownMonster(monster_id.clone()))?;

        let mut monster = MonsterInstance::spawn(template, &mut rng, floor, &modifiers);
        let conditions = pick_conditions(
            floor,
            &mut rng,
            monster.hp,
            &ctx.player.operator_hand,
            &modifiers,
        );
        if conditions.contains(&ConditionId::DecimalTarget)
            && let Some(fraction) = rng.pick(&DECIMAL_FRACTIONS)
        {
            monster.hp = monster.hp.floor() + fraction;
            monster.max_hp = monster.hp;
        }

        let log = intro_log(&monster, &conditions);
        let mut session = CombatSession {
            monster,
            dice: Vec::new(),
            conditions,
            turn: 1,
            rerolls_left: 0,
            phase: CombatPhase::Building,
            expression: Vec::new(),
            log,
            last_resolution: None,
            boss_reroll_used: false,
            rng,
            memo: RelicMemo::default(),
        };
        roll_tray(&mut session, &ctx.player);
        Ok(session)
    }

    // ===== expression editing =====

    /// Inserts `token` at `index`, or appends it when `index` is `None`.
    ///
    /// Numbers must carry the die that shows them and operators the hand slot
    /// of their card. Each die may be placed once; each card once, or twice
    /// while the player holds a relic that recycles operators.
    pub fn place_token(&mut self, token: Token, index: Option<usize>) -> Result<(), TokenError> {
        self.ensure_building()?;
        self.check_token(&token)?;

        let len = self.session.expression.len();
        match index {
            Some(index) if index > len => Err(TokenError::IndexOutOfRange { index, len }),
            Some(index) => {
                self.session.expression.insert(index, token);
                Ok(())
            }
            None => {
                self.session.expression.push(token);
                Ok(())
            }
        }
    }

    /// Appends the value shown by die `id`.
    pub fn place_die(&mut self, id: DieId) -> Result<(), TokenError> {
        let die = self.session.die(id).ok_or(TokenError::UnknownDie(id))?;
        let value = die.value.ok_or(TokenError::DieNotRolled(id))?;
        self.place_token(Token::die(value, id), None)
    }

    /// Appends the operator card at `hand_index`.
    pub fn place_operator(&mut self, hand_index: usize) -> Result<(), TokenError> {
        let op = *self
            .ctx
            .player
            .operator_hand
            .get(hand_index)
            .ok_or(TokenError::UnknownCard(hand_index))?;
        self.place_token(Token::card(op, hand_index), None)
    }

    pub fn remove_token(&mut self, index: usize) -> Result<Token, TokenError> {
        self.ensure_building()?;
        let len = self.session.expression.len();
        if index >= len {
            return Err(TokenError::IndexOutOfRange { index, len });
        }
        Ok(self.session.expression.remove(index))
    }

    /// Moves the token at `from` so that it lands before the token currently
    /// at `to`. `to` may equal the length to move a token to the end.
    pub fn move_token(&mut self, from: usize, to: usize) -> Result<(), TokenError> {
        self.ensure_building()?;
        let len = self.session.expression.len();
        if from >= len {
            return Err(TokenError::IndexOutOfRange { index: from, len });
        }
        if to > len {
            return Err(TokenError::IndexOutOfRange { index: to, len });
        }

        let token = self.session.expression.remove(from);
        let insert_at = if to > from { to - 1 } else { to };
        self.session.expression.insert(insert_at, token);
        Ok(())
    }

    pub fn clear_expression(&mut self) {
        self.session.expression.clear();
    }

    // ===== dice =====

    /// Flips the hold flag on die `id`. Returns false if there is no such die.
    pub fn toggle_hold(&mut self, id: DieId) -> bool {
        if self.session.is_over() {
            return false;
        }
        match self.session.dice.iter_mut().find(|d| d.id == id) {
            Some(die) => {
                die.held = !die.held;
                true
            }
            None => false,
        }
    }

    /// Spends a reroll on every die that is not held.
    ///
    /// Roll relics apply to the rerolled dice only. Tokens that referenced a
    /// rerolled die leave the expression; held dice keep theirs.
    pub fn reroll(&mut self) -> bool {
        let session = &mut *self.session;
        if session.is_over() || session.rerolls_left == 0 {
            return false;
        }

        let rerolled: Vec<DieId> = session
            .dice
            .iter()
            .filter(|d| !d.held)
            .map(|d| d.id)
            .collect();
        for die in session.dice.iter_mut().filter(|d| !d.held) {
            die.roll(&mut session.rng);
        }
        RelicPipeline::new(&self.ctx.player.relics).on_roll(
            &mut session.dice,
            &rerolled,
            &mut session.rng,
        );
        RelicPipeline::on_reroll(&mut self.ctx.player);

        session
            .expression
            .retain(|t| t.die_id().is_none_or(|id| !rerolled.contains(&id)));
        session.rerolls_left -= 1;
        session.log.push("Rerolled unheld dice!".to_string());
        true
    }

    /// Draws a new boss target from its HP range. Once per encounter.
    pub fn reroll_boss_target(&mut self) -> bool {
        let session = &mut *self.session;
        if session.is_over() || !session.monster.is_boss() || session.boss_reroll_used {
            return false;
        }

        let target = session.monster.reroll_target(
            &mut session.rng,
            self.ctx.run.floor,
            &self.ctx.run.modifiers,
        );
        session.boss_reroll_used = true;
        session.expression.clear();
        session
            .log
            .push(format!("Boss target rerolled! New target: {target}"));
        true
    }

    // ===== resolution =====

    /// Projects what [`evaluate`](Self::evaluate) would do with the current
    /// expression. Draws nothing from the RNG and runs no relic hooks.
    pub fn preview(&self) -> Result<CombatPreview, ExpressionError> {
        let session = &*self.session;
        let evaluation = expression::evaluate(&session.expression)?;
        let result = evaluation.result;
        let target = session.monster.hp;

        let combos = evaluate_combos(&ScoreContext {
            result,
            target,
            tokens: &session.expression,
            total_dice: session.dice.len(),
        });
        let condition_error =
            validate_conditions(&session.conditions, result, &session.expression)
                .and_then(|()| {
                    check_all_dice(&session.conditions, &session.expression, session.dice.len())
                })
                .err()
                .map(|violation| violation.to_string());
        let boss_warning = session
            .monster
            .boss
            .filter(|ability| !ability.allows(result))
            .map(|ability| format!("{} {}", ability.warning(), ability.description()));

        let monster = &session.monster;
        let (min_damage, max_damage) = monster.attack_range();
        let diff = (result - target).abs();
        let damage = if boss_warning.is_some() {
            Some(DamagePreview {
                outcome: None,
                attack_die: monster.attack_die,
                attack_dice_count: monster.attack_dice_count,
                min_damage,
                max_damage,
                diff,
                boss_blocked: true,
            })
        } else if condition_error.is_none() {
            let outcome = calculate_damage(&session.conditions, result, target, &self.rules());
            let count = if outcome.retaliate {
                monster.attack_dice_count
            } else {
                0
            };
            Some(DamagePreview {
                outcome: Some(outcome),
                attack_die: monster.attack_die,
                attack_dice_count: count,
                min_damage: count,
                max_damage: count * monster.attack_die.sides(),
                diff,
                boss_blocked: false,
            })
        } else {
            None
        };

        Ok(CombatPreview {
            result,
            dice_used: evaluation.dice_used,
            operators_used: evaluation.operators_used,
            combos,
            condition_error,
            boss_warning,
            damage,
        })
    }

    /// Submits the expression and resolves the turn.
    ///
    /// Grammar, arithmetic and condition failures return an error and consume
    /// nothing. Everything else resolves: a boss or targeting block deals no
    /// damage but the monster still strikes back and the turn advances.
    pub fn evaluate(&mut self) -> Result<TurnResolution, EvaluateError> {
        self.ensure_building().map_err(|_| EvaluateError::NotBuilding)?;

        let session = &mut *self.session;
        let raw = expression::evaluate(&session.expression)?.result;
        validate_conditions(&session.conditions, raw, &session.expression)?;
        check_all_dice(&session.conditions, &session.expression, session.dice.len())?;

        let target = session.monster.hp;
        let boss_block = session.monster.boss.filter(|ability| !ability.allows(raw));
        let combos = evaluate_combos(&ScoreContext {
            result: raw,
            target,
            tokens: &session.expression,
            total_dice: session.dice.len(),
        });

        let relics = self.ctx.player.relics.clone();
        let pipeline = RelicPipeline::new(&relics);
        let eval_ctx = EvaluateContext {
            raw,
            target,
            evaluations: session.memo.evaluations,
        };
        let mods = pipeline.on_evaluate(&eval_ctx, &mut session.memo);
        for effect in &mods.effects {
            effect.apply(&mut self.ctx.player);
        }
        let value = mods.effective_value;

        let rules = DamageRules::new(self.config, &self.ctx.run.modifiers);
        let outcome = match boss_block {
            Some(ability) => DamageOutcome::blocked(BlockReason::Boss {
                ability,
                result: raw,
            }),
            None => calculate_damage(
                &session.conditions,
                mods.wrapped_overkill.unwrap_or(value),
                target,
                &rules,
            ),
        };

        let mut log = Vec::new();
        if let Some(summary) = combos.summary() {
            log.push(summary);
        }

        // Retaliation.
        let monster = &session.monster;
        let overkill_prevented = outcome.is_overkill() && mods.prevent_overkill_damage;
        let attack_rolls: Vec<u32> = if outcome.retaliate {
            let sides = i64::from(monster.attack_die.sides());
            (0..monster.attack_dice_count)
                .map(|_| session.rng.next_int(1, sides) as u32)
                .collect()
        } else {
            Vec::new()
        };
        let mut damage_taken: u32 = attack_rolls.iter().sum();
        if damage_taken > 0 {
            damage_taken = pipeline.on_take_damage(damage_taken, &mut session.memo);
        }
        // The dice are still rolled so later draws stay aligned.
        if overkill_prevented {
            damage_taken = 0;
        }
        self.ctx.player.take_damage(damage_taken);

        let monster_hp = match outcome.kind {
            OutcomeKind::Exact | OutcomeKind::Overkill | OutcomeKind::NearMiss => 0.0,
            OutcomeKind::Underkill => (target - outcome.dealt.max(0.0)).ceil(),
            OutcomeKind::Blocked(_) => target,
        };

        let roll_text = format!(
            "{}{}: [{}] = {} damage!",
            attack_rolls.len(),
            monster.attack_die,
            attack_rolls
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" + "),
            damage_taken
        );
        log.push(match outcome.kind {
            OutcomeKind::Exact => format!("EXACT HIT! {value} = {target}. Bonus gold!"),
            OutcomeKind::NearMiss => format!("Near miss! Monster slain, but it rolls {roll_text}"),
            OutcomeKind::Overkill if damage_taken > 0 => {
                format!("Overkill! Monster slain, but it rolls {roll_text}")
            }
            OutcomeKind::Overkill if overkill_prevented => {
                "Overkill! Monster slain! (overkill damage prevented)".to_string()
            }
            OutcomeKind::Overkill => "Overkill! Monster slain!".to_string(),
            OutcomeKind::Underkill => {
                format!("Underkill! Monster has {monster_hp} HP left. It rolls {roll_text}")
            }
            OutcomeKind::Blocked(reason) => format!("{reason} Monster rolls {roll_text}"),
        });

        let mut rescued_by = None;
        if !self.ctx.player.is_alive()
            && let Some(rescue) = pipeline.lethal_rescue()
        {
            RelicPipeline::apply_rescue(&mut self.ctx.player, &rescue);
            log.push(rescue.message());
            rescued_by = Some(rescue.relic);
        }

        let monster_dead = monster_hp <= 0.0;
        let player_dead = !self.ctx.player.is_alive();

        let gold = base_gold(
            self.config,
            &GoldInputs {
                monster_dead,
                elite: monster.elite,
                exact: outcome.is_exact(),
                floor: self.ctx.run.floor,
                target,
                ascension_multiplier: self.ctx.run.modifiers.gold_multiplier,
                combo_multiplier: combos.total_multiplier,
                relic_multiplier: mods.gold_multiplier,
            },
        );
        let gold = pipeline.on_gold_gain(
            gold,
            &GoldContext {
                combos: combos.combos.len(),
                exact: outcome.is_exact(),
            },
        );
        self.ctx.player.gold = self.ctx.player.gold.saturating_add(gold);

        let phase = if monster_dead {
            let mut line = format!("Victory! Earned {gold} gold.");
            if combos.total_multiplier > 1.0 {
                line.push_str(&format!(" (x{} from combos!)", combos.total_multiplier));
            }
            log.push(line);
            CombatPhase::Victory
        } else if player_dead {
            log.push("You have been defeated...".to_string());
            CombatPhase::Defeat
        } else {
            CombatPhase::Building
        };
        if phase.is_over() {
            RelicPipeline::on_combat_end(&mut self.ctx.player, phase == CombatPhase::Victory);
        }

        let stats = &mut self.ctx.run.stats;
        stats.turns_played += 1;
        if outcome.dealt > 0.0 {
            stats.total_damage_dealt += numbers::round_half_up(outcome.dealt) as u64;
        }
        stats.total_damage_taken += u64::from(damage_taken);
        if outcome.is_exact() {
            stats.exact_hits += 1;
        }
        if !combos.is_empty() {
            stats.total_combos_triggered += combos.combos.len() as u32;
            stats.best_combo_multiplier = stats.best_combo_multiplier.max(combos.total_multiplier);
        }
        stats.gold_earned += u64::from(gold);
        if monster_dead {
            stats.monsters_killed += 1;
        }

        let resolution = TurnResolution {
            turn: session.turn,
            raw_value: raw,
            value,
            target,
            outcome,
            combos,
            attack_die: monster.attack_die,
            attack_rolls,
            damage_taken,
            gold_earned: gold,
            monster_hp: monster_hp.max(0.0),
            player_hp: self.ctx.player.hp,
            monster_dead,
            player_dead,
            rescued_by,
            phase,
        };

        session.monster.hp = monster_hp.max(0.0);
        session.expression.clear();
        session.phase = phase;
        session.log.append(&mut log);
        if phase == CombatPhase::Building {
            session.turn += 1;
            session.log.push(format!(
                "--- Turn {} --- New target: {}",
                session.turn, session.monster.hp
            ));
            roll_tray(session, &self.ctx.player);
        }
        session.last_resolution = Some(resolution.clone());
        Ok(resolution)
    }

    // ===== helpers =====

    fn rules(&self) -> DamageRules {
        DamageRules::new(self.config, &self.ctx.run.modifiers)
    }

    fn ensure_building(&self) -> Result<(), TokenError> {
        if self.session.is_over() {
            return Err(TokenError::NotBuilding);
        }
        Ok(())
    }

    fn check_token(&self, token: &Token) -> Result<(), TokenError> {
        match token {
            Token::Number(number) => {
                let id = number.die.ok_or(TokenError::NumberWithoutDie)?;
                let die = self.session.die(id).ok_or(TokenError::UnknownDie(id))?;
                let value = die.value.ok_or(TokenError::DieNotRolled(id))?;
                if f64::from(value) != number.value {
                    return Err(TokenError::ValueMismatch(id));
                }
                if self.session.is_placed(id) {
                    return Err(TokenError::DieAlreadyPlaced(id));
                }
            }
            Token::Operator(card) => {
                let index = card.hand_index.ok_or(TokenError::OperatorWithoutCard)?;
                let held = *self
                    .ctx
                    .player
                    .operator_hand
                    .get(index)
                    .ok_or(TokenError::UnknownCard(index))?;
                if held != card.op {
                    return Err(TokenError::CardMismatch {
                        index,
                        held,
                        requested: card.op,
                    });
                }
                let uses = RelicPipeline::new(&self.ctx.player.relics).operator_card_uses();
                if self.session.card_uses(index) >= uses {
                    return Err(TokenError::CardExhausted(index));
                }
            }
        }
        Ok(())
    }
}

/// Rolls a fresh tray from the player's pool and applies roll and
/// combat-start relics. Rerolls reset to the per-turn allowance.
fn roll_tray(session: &mut CombatSession, player: &PlayerState) {
    let pipeline = RelicPipeline::new(&player.relics);
    let mut dice = roll_pool(&player.dice_pool, &mut session.rng);
    let rolled: Vec<DieId> = dice.iter().map(|d| d.id).collect();
    pipeline.on_roll(&mut dice, &rolled, &mut session.rng);

    let mut rerolls = player.rerolls_per_turn;
    pipeline.on_combat_start(&mut dice, &mut rerolls, &mut session.rng);
    session.dice = dice;
    session.rerolls_left = rerolls;
}

fn intro_log(monster: &MonsterInstance, conditions: &ActiveConditions) -> Vec<String> {
    let mut log = vec![format!(
        "A {} appears! Target: {}",
        monster.name, monster.hp
    )];
    if !conditions.is_empty() {
        let names = conditions
            .iter()
            .map(|c| format!("{}: {}", c.name(), c.description()))
            .collect::<Vec<_>>()
            .join(" | ");
        log.push(format!("Conditions: {names}"));
    }
    log
}
