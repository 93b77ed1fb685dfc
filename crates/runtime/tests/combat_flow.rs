use game_content::LoadoutId;
use game_core::{BossAbility, CombatPhase, DieId, Encounter, RelicId, StateError};
use runtime::{CombatEvent, Event, PlayerEvent, Runtime, RuntimeError, Topic};

fn runtime(seed: u32) -> Runtime {
    Runtime::builder()
        .seed(seed)
        .loadout(LoadoutId::Standard)
        .build()
        .expect("standard loadout builds")
}

fn tray(rt: &Runtime) -> Vec<DieId> {
    rt.combat()
        .expect("combat active")
        .dice
        .iter()
        .map(|d| d.id)
        .collect()
}

/// Places `d0 + d1 × d2` using the opening hand (add, subtract, multiply, divide).
fn build_attack(rt: &mut Runtime) {
    let dice = tray(rt);
    rt.place_die(dice[0]).unwrap();
    rt.place_operator(0).unwrap();
    rt.place_die(dice[1]).unwrap();
    rt.place_operator(2).unwrap();
    rt.place_die(dice[2]).unwrap();
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn first_floor_has_no_conditions() {
    let mut rt = runtime(7);
    let mut combat = rt.subscribe(Topic::Combat);

    let encounter = rt.next_encounter();
    assert_eq!(encounter, Encounter::random(false));
    let session = rt.start_combat(encounter).unwrap();
    assert!(session.conditions.is_empty());
    assert_eq!(session.turn, 1);
    assert_eq!(session.dice.len(), 5);
    assert!(session.dice.iter().all(|d| d.value.is_some()));

    match combat.try_recv() {
        Ok(Event::Combat(CombatEvent::Started(summary))) => {
            assert_eq!((summary.floor, summary.act), (0, 1));
            assert!(!summary.elite);
            assert!(summary.conditions.is_empty());
        }
        other => panic!("expected a start event, got {other:?}"),
    }
}

#[test]
fn same_seed_same_actions_same_outcome() {
    let mut a = runtime(1234);
    let mut b = runtime(1234);
    a.start_combat(Encounter::random(false)).unwrap();
    b.start_combat(Encounter::random(false)).unwrap();
    assert_eq!(a.session_digest().unwrap(), b.session_digest().unwrap());

    build_attack(&mut a);
    build_attack(&mut b);
    let ra = a.evaluate().unwrap();
    let rb = b.evaluate().unwrap();
    assert_eq!(ra, rb);
    assert_eq!(a.session_digest().unwrap(), b.session_digest().unwrap());
    assert_eq!(a.context(), b.context());
}

#[test]
fn rejected_submission_changes_nothing() {
    let mut rt = runtime(99);
    rt.start_combat(Encounter::random(false)).unwrap();
    let mut combat = rt.subscribe(Topic::Combat);
    let before = rt.session_digest().unwrap();

    let err = rt.evaluate().unwrap_err();
    assert!(matches!(err, RuntimeError::Evaluate(_)));
    assert_eq!(rt.session_digest().unwrap(), before);
    assert_eq!(rt.combat().unwrap().turn, 1);

    let events = drain(&mut combat);
    assert!(matches!(
        events.as_slice(),
        [Event::Combat(CombatEvent::Rejected { turn: 1, .. })]
    ));
}

#[test]
fn preview_leaves_the_session_alone() {
    let mut rt = runtime(5);
    rt.start_combat(Encounter::random(false)).unwrap();
    build_attack(&mut rt);
    let before = rt.session_digest().unwrap();

    let first = rt.preview().unwrap();
    let second = rt.preview().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.dice_used, 3);
    assert_eq!(first.operators_used, 2);
    assert_eq!(rt.session_digest().unwrap(), before);
}

#[test]
fn a_regular_fight_is_won_and_the_floor_advances() {
    let mut rt = runtime(2024);
    let mut player = rt.subscribe(Topic::Player);
    rt.start_combat(rt.next_encounter()).unwrap();

    let mut turns = 0;
    while !rt.combat().unwrap().is_over() {
        build_attack(&mut rt);
        let resolution = rt.evaluate().unwrap();
        turns += 1;
        assert_eq!(resolution.turn, turns);
        assert!(turns < 30, "combat never ended");
    }
    assert_eq!(rt.combat().unwrap().phase, CombatPhase::Victory);
    assert_eq!(rt.context().run.stats.monsters_killed, 1);
    assert!(rt.context().player.gold > 50);

    assert_eq!(rt.finish_combat().unwrap(), CombatPhase::Victory);
    assert!(rt.combat().is_none());
    assert_eq!(rt.context().run.floor, 1);

    let events = drain(&mut player);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::Player(PlayerEvent::FloorAdvanced { floor: 1, act: 1 })
    )));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, Event::Player(PlayerEvent::GoldChanged { .. })))
    );
}

#[test]
fn lifecycle_guards() {
    let mut rt = runtime(3);
    assert!(matches!(rt.evaluate(), Err(RuntimeError::NoActiveCombat)));
    assert!(matches!(
        rt.session_digest(),
        Err(RuntimeError::NoActiveCombat)
    ));
    assert!(matches!(
        rt.finish_combat(),
        Err(RuntimeError::NoActiveCombat)
    ));

    rt.start_combat(Encounter::random(false)).unwrap();
    assert!(matches!(
        rt.start_combat(Encounter::random(false)),
        Err(RuntimeError::CombatInProgress)
    ));
    assert!(matches!(
        rt.finish_combat(),
        Err(RuntimeError::CombatNotFinished)
    ));
    assert!(matches!(
        rt.start_combat(Encounter::monster("nobody")),
        Err(RuntimeError::CombatInProgress)
    ));
}

#[test]
fn unknown_monster_is_an_internal_error() {
    let mut rt = runtime(3);
    let err = rt.start_combat(Encounter::monster("nobody")).unwrap_err();
    assert!(matches!(err, RuntimeError::Combat(_)));
    assert!(rt.combat().is_none());
}

#[test]
fn giving_up_ends_the_run() {
    let mut rt = runtime(11);
    let mut combat = rt.subscribe(Topic::Combat);
    rt.start_combat(Encounter::random(true)).unwrap();
    rt.give_up();

    assert!(rt.combat().is_none());
    assert!(rt.is_run_over());
    assert!(matches!(
        rt.start_combat(Encounter::random(false)),
        Err(RuntimeError::RunOver)
    ));
    let events = drain(&mut combat);
    assert!(matches!(
        events.last(),
        Some(Event::Combat(CombatEvent::Abandoned { turn: 1 }))
    ));
}

#[test]
fn one_reroll_per_turn_by_default() {
    let mut rt = runtime(21);
    let mut combat = rt.subscribe(Topic::Combat);
    rt.start_combat(Encounter::random(false)).unwrap();

    assert!(rt.reroll().unwrap());
    assert!(!rt.reroll().unwrap());
    assert_eq!(rt.combat().unwrap().rerolls_left, 0);

    let rerolls: Vec<_> = drain(&mut combat)
        .into_iter()
        .filter(|e| matches!(e, Event::Combat(CombatEvent::Rerolled { .. })))
        .collect();
    assert_eq!(rerolls.len(), 1);
}

#[test]
fn boss_target_can_be_rerolled_once() {
    let mut rt = runtime(8);
    let mut combat = rt.subscribe(Topic::Combat);
    let session = rt
        .start_combat(Encounter::monster("prime_minister"))
        .unwrap();
    assert_eq!(session.monster.boss, Some(BossAbility::PrimeOnly));

    assert!(rt.reroll_boss_target().unwrap());
    assert!(!rt.reroll_boss_target().unwrap());

    let events = drain(&mut combat);
    let target = rt.combat().unwrap().monster.hp;
    assert!(events.iter().any(|e| matches!(
        e,
        Event::Combat(CombatEvent::BossTargetRerolled { target: t }) if *t == target
    )));
}

#[test]
fn relic_grants_are_published_and_deduplicated() {
    let mut rt = runtime(4);
    let mut player = rt.subscribe(Topic::Player);

    rt.grant_relic(RelicId::IronSkin).unwrap();
    assert_eq!(rt.context().player.max_hp, 95);
    let err = rt.grant_relic(RelicId::IronSkin).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::State(StateError::DuplicateRelic(RelicId::IronSkin))
    ));

    let events = drain(&mut player);
    assert_eq!(
        events.len(),
        2,
        "gain and hp change, nothing for the duplicate"
    );
    assert!(matches!(
        events[1],
        Event::Player(PlayerEvent::HpChanged { hp: 95, max_hp: 95 })
    ));
}

#[test]
fn minimalist_keeps_three_dice_at_top_ascension() {
    let rt = Runtime::builder()
        .seed(1)
        .ascension(10)
        .loadout(LoadoutId::Minimalist)
        .build()
        .unwrap();
    assert_eq!(rt.context().player.dice_pool.len(), 3);
    assert_eq!(rt.context().player.hp, 60);
}

#[tokio::test]
async fn resolved_turns_stream_to_subscribers() {
    let mut rt = runtime(77);
    let mut combat = rt.subscribe(Topic::Combat);
    rt.start_combat(Encounter::random(false)).unwrap();
    build_attack(&mut rt);
    let resolution = rt.evaluate().unwrap();

    let started = combat.recv().await.unwrap();
    assert!(matches!(started, Event::Combat(CombatEvent::Started(_))));
    match combat.recv().await.unwrap() {
        Event::Combat(CombatEvent::Resolved(event)) => assert_eq!(*event, resolution),
        other => panic!("expected a resolved turn, got {other:?}"),
    }

    let json = serde_json::to_string(&resolution).unwrap();
    assert!(json.contains("\"turn\":1"));
}
