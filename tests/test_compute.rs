use warrior_rush::compute::*;
use warrior_rush::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

fn attacking() -> InputSnapshot {
    InputSnapshot { attack: true, ..InputSnapshot::default() }
}

/// A fresh match that has already been started from the menu.
fn play_state() -> MatchState {
    apply_action(&new_match(), Action::Start)
}

// ── Construction & state machine ─────────────────────────────────────────────

#[test]
fn new_match_starts_in_menu() {
    let s = new_match();
    assert_eq!(s.phase, Phase::Menu);
    assert_eq!(s.wave, 1);
    assert_eq!(s.spawn_timer, 0);
    assert_eq!(s.frame, 0);
    assert!(s.enemies.is_empty());
    assert_eq!(s.player.body.hp, PLAYER_MAX_HP);
}

#[test]
fn start_action_enters_play_fresh() {
    let s = play_state();
    assert_eq!(s.phase, Phase::Play);
    assert_eq!(s.player.score, 0);
    assert_eq!(s.player.kills, 0);
    assert_eq!(s.player.body.hp, 200);
    assert!(s.enemies.is_empty());
}

#[test]
fn wrong_phase_actions_are_noops() {
    // Retry/Menu mean nothing in the menu
    let menu = new_match();
    assert_eq!(apply_action(&menu, Action::Retry).phase, Phase::Menu);
    assert_eq!(apply_action(&menu, Action::Menu).phase, Phase::Menu);

    // Start means nothing mid-play and must not reset progress
    let mut play = play_state();
    play.player.score = 70;
    let after = apply_action(&play, Action::Start);
    assert_eq!(after.phase, Phase::Play);
    assert_eq!(after.player.score, 70);
}

#[test]
fn tick_outside_play_is_identity() {
    let menu = new_match();
    let (after, fx) = tick(&menu, &attacking(), &mut seeded_rng());
    assert_eq!(after.phase, Phase::Menu);
    assert_eq!(after.frame, 0);
    assert!(after.enemies.is_empty());
    assert!(fx.swing.is_none());
}

#[test]
fn frame_advances_only_in_play() {
    let mut s = play_state();
    for _ in 0..5 {
        s = tick(&s, &idle(), &mut seeded_rng()).0;
    }
    assert_eq!(s.frame, 5);
}

// ── Wave difficulty arithmetic ───────────────────────────────────────────────

#[test]
fn enemy_stats_scale_with_wave() {
    for wave in 1..=10u32 {
        let e = new_enemy(0.0, 0.0, wave);
        assert_eq!(e.body.hp, 35 + 5 * wave as i32);
        assert_eq!(e.damage, 7 + wave as i32);
        assert!((e.speed - (1.2 + 0.1 * wave as f32)).abs() < 1e-5);
        assert_eq!(e.hit_cooldown, 0);
    }
}

#[test]
fn wave_counter_stays_flat() {
    // Flat difficulty is intentional: nothing increments the wave
    let mut s = play_state();
    let mut rng = seeded_rng();
    for _ in 0..300 {
        s = tick(&s, &idle(), &mut rng).0;
    }
    assert_eq!(s.wave, 1);
    assert!(s.enemies.iter().all(|e| e.body.hp == 40));
}

// ── Player movement ──────────────────────────────────────────────────────────

#[test]
fn player_stays_in_bounds_for_every_input_combination() {
    let starts = [(0.0, 100.0), (704.0, 504.0), (300.0, 300.0)];
    for (sx, sy) in starts {
        for bits in 0..16u8 {
            let input = InputSnapshot {
                left: bits & 1 != 0,
                right: bits & 2 != 0,
                up: bits & 4 != 0,
                down: bits & 8 != 0,
                attack: false,
            };
            let mut p = new_player();
            p.body.x = sx;
            p.body.y = sy;
            for _ in 0..300 {
                p = move_player(&p, &input);
                assert!(p.body.x >= 0.0 && p.body.x <= (SCREEN_W - PLAYER_SIZE) as f32);
                assert!(
                    p.body.y >= HUD_MARGIN as f32 && p.body.y <= (SCREEN_H - PLAYER_SIZE) as f32
                );
            }
        }
    }
}

#[test]
fn facing_follows_horizontal_input_right_wins_ties() {
    let p = new_player();
    let left = move_player(&p, &InputSnapshot { left: true, ..idle() });
    assert_eq!(left.face, -1);

    let right = move_player(&left, &InputSnapshot { right: true, ..idle() });
    assert_eq!(right.face, 1);

    // Both held in the same tick: right is evaluated last and wins
    let both = move_player(&left, &InputSnapshot { left: true, right: true, ..idle() });
    assert_eq!(both.face, 1);
    assert!(both.body.x > left.body.x);
}

#[test]
fn diagonal_movement_is_not_normalized() {
    let mut p = new_player();
    p.body.x = 300.0;
    p.body.y = 300.0;
    let moved = move_player(&p, &InputSnapshot { left: true, up: true, ..idle() });
    // Full speed on both axes — diagonals run √2 faster
    assert_eq!(moved.body.x, 296.0);
    assert_eq!(moved.body.y, 296.0);
}

// ── Swing & recovery ─────────────────────────────────────────────────────────

#[test]
fn swing_sets_recovery_and_yields_hitbox() {
    let (after, hitbox) = player_swing(&new_player());
    assert_eq!(after.cooldown, SWING_RECOVERY);
    let hb = hitbox.expect("fresh player can swing");
    // Player at (100, 420) facing right: hitbox off the leading edge
    assert_eq!(hb, Rect { x: 196, y: 445, w: 50, h: 45 });
}

#[test]
fn swing_hitbox_flips_with_facing() {
    let mut p = new_player();
    p.face = -1;
    let (_, hitbox) = player_swing(&p);
    assert_eq!(hitbox.unwrap(), Rect { x: 50, y: 445, w: 50, h: 45 });
}

#[test]
fn second_swing_within_recovery_is_refused() {
    let (after_first, first) = player_swing(&new_player());
    assert!(first.is_some());
    let (_, second) = player_swing(&after_first);
    assert!(second.is_none());
}

#[test]
fn swing_allowed_again_after_recovery_decrements() {
    let (mut p, _) = player_swing(&new_player());

    for _ in 0..19 {
        p = move_player(&p, &idle());
    }
    assert_eq!(p.cooldown, 1);
    assert!(player_swing(&p).1.is_none());

    p = move_player(&p, &idle());
    assert_eq!(p.cooldown, 0);
    assert!(player_swing(&p).1.is_some());
}

// ── Enemy pursuit ────────────────────────────────────────────────────────────

#[test]
fn chase_advances_by_speed_along_unit_vector() {
    let e = new_enemy(0.0, 0.0, 1); // speed 1.3
    let chased = enemy_chase(&e, 300.0, 400.0); // distance 500
    assert!((chased.body.x - 0.78).abs() < 1e-4);
    assert!((chased.body.y - 1.04).abs() < 1e-4);
}

#[test]
fn chase_at_zero_distance_holds_still() {
    let e = new_enemy(250.0, 250.0, 1);
    let chased = enemy_chase(&e, 250.0, 250.0);
    assert_eq!(chased.body.x, 250.0);
    assert_eq!(chased.body.y, 250.0);
}

// ── Contact damage ───────────────────────────────────────────────────────────

#[test]
fn contact_damage_fires_once_per_recovery_window() {
    let player = new_player();
    // Enemy parked on top of the player — continuous overlap
    let mut enemy = new_enemy(player.body.x, player.body.y, 1); // damage 8
    let mut p = player;

    let mut hits = 0;
    for _ in 0..47 {
        let before = p.body.hp;
        let (e2, p2) = enemy_strike(&enemy, &p);
        enemy = e2;
        p = p2;
        if p.body.hp < before {
            hits += 1;
        }
    }
    // Strikes on tick 1 and tick 47, never inside the 45-tick window
    assert_eq!(hits, 2);
    assert_eq!(p.body.hp, 200 - 2 * 8);
}

#[test]
fn contact_counts_touching_edges() {
    let player = new_player(); // left edge at x = 100
    let enemy = new_enemy(player.body.x - 80.0, player.body.y, 1);
    let (struck, hit) = enemy_strike(&enemy, &player);
    assert_eq!(hit.body.hp, 200 - 8);
    assert_eq!(struck.hit_cooldown, CONTACT_RECOVERY);
}

#[test]
fn no_contact_without_overlap() {
    let player = new_player();
    let enemy = new_enemy(player.body.x + 300.0, player.body.y, 1);
    let (struck, unhurt) = enemy_strike(&enemy, &player);
    assert_eq!(unhurt.body.hp, 200);
    assert_eq!(struck.hit_cooldown, 0);
}

// ── Spawn director ───────────────────────────────────────────────────────────

#[test]
fn first_spawn_lands_on_tick_81() {
    let mut s = play_state();
    let mut rng = seeded_rng();
    for _ in 0..80 {
        s = tick(&s, &idle(), &mut rng).0;
    }
    assert!(s.enemies.is_empty());
    assert_eq!(s.spawn_timer, 80);

    s = tick(&s, &idle(), &mut rng).0;
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.spawn_timer, 0);

    // Positioned 90 units beyond its chosen edge, fully off-screen
    let e = &s.enemies[0];
    assert!(
        e.body.x == -90.0 || e.body.x == 890.0 || e.body.y == -90.0 || e.body.y == 690.0,
        "spawn not on an edge offset: ({}, {})",
        e.body.x,
        e.body.y
    );
    let r = e.body.rect();
    assert!(r.x + r.w <= 0 || r.x >= SCREEN_W || r.y + r.h <= 0 || r.y >= SCREEN_H);
}

#[test]
fn side_edges_use_the_lower_band_only() {
    let mut rng = seeded_rng();
    let mut saw_side = false;
    let mut saw_vertical = false;
    for _ in 0..200 {
        let e = spawn_enemy(1, &mut rng);
        let (x, y) = (e.body.x, e.body.y);
        if x == -90.0 || x == 890.0 {
            saw_side = true;
            assert!((300.0..=600.0).contains(&y), "side spawn y out of band: {y}");
        } else {
            saw_vertical = true;
            assert!(y == -90.0 || y == 690.0);
            assert!((0.0..=800.0).contains(&x));
        }
    }
    assert!(saw_side && saw_vertical);
}

// ── Combat scoring ───────────────────────────────────────────────────────────

#[test]
fn killing_blow_scores_ten_and_one_kill() {
    let mut s = play_state();
    // Wave-1 enemy (40 hp) inside the facing-right hitbox
    s.enemies.push(new_enemy(200.0, 430.0, 1));

    let (after, fx) = tick(&s, &attacking(), &mut seeded_rng());
    assert!(fx.swing.is_some());
    assert_eq!(fx.kills, 1);
    assert_eq!(after.player.score, 10);
    assert_eq!(after.player.kills, 1);
    assert!(after.enemies.is_empty(), "corpse must be pruned");
}

#[test]
fn surviving_enemy_scores_nothing_until_it_dies() {
    let mut s = play_state();
    // Wave-10 enemy: 85 hp, survives the first 45-damage swing
    s.enemies.push(new_enemy(200.0, 430.0, 10));
    let mut rng = seeded_rng();

    s = tick(&s, &attacking(), &mut rng).0;
    assert_eq!(s.player.score, 0);
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.enemies[0].body.hp, 40);

    // Hold the attack key until the recovery elapses and the second swing
    // connects; the kill must be counted exactly once
    for _ in 0..40 {
        s = tick(&s, &attacking(), &mut rng).0;
        if s.enemies.is_empty() {
            break;
        }
    }
    assert!(s.enemies.is_empty());
    assert_eq!(s.player.score, 10);
    assert_eq!(s.player.kills, 1);
}

#[test]
fn swing_out_of_reach_hits_nothing() {
    let mut s = play_state();
    s.enemies.push(new_enemy(600.0, 430.0, 1));

    let (after, fx) = tick(&s, &attacking(), &mut seeded_rng());
    assert!(fx.swing.is_some());
    assert_eq!(fx.kills, 0);
    assert_eq!(after.player.score, 0);
    assert_eq!(after.enemies.len(), 1);
    assert_eq!(after.enemies[0].body.hp, 40);
}

// ── Defeat & retry loop ──────────────────────────────────────────────────────

#[test]
fn lethal_contact_moves_match_to_game_over() {
    let mut s = play_state();
    s.player.body.hp = 5;
    // Enemy on top of the player: strikes for 8 on the next tick
    s.enemies
        .push(new_enemy(s.player.body.x, s.player.body.y, 1));

    let (after, _) = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(after.player.body.hp, 0);
    assert_eq!(after.phase, Phase::GameOver);

    // Terminal per-match: further ticks change nothing
    let (frozen, _) = tick(&after, &attacking(), &mut seeded_rng());
    assert_eq!(frozen.phase, Phase::GameOver);
    assert_eq!(frozen.frame, after.frame);
}

#[test]
fn retry_restarts_play_with_a_fresh_player() {
    let mut s = play_state();
    s.player.body.hp = 5;
    s.player.score = 120;
    s.enemies
        .push(new_enemy(s.player.body.x, s.player.body.y, 1));
    let (over, _) = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(over.phase, Phase::GameOver);

    let retried = apply_action(&over, Action::Retry);
    assert_eq!(retried.phase, Phase::Play);
    assert_eq!(retried.player.body.hp, 200);
    assert_eq!(retried.player.score, 0);
    assert!(retried.enemies.is_empty());

    let back = apply_action(&over, Action::Menu);
    assert_eq!(back.phase, Phase::Menu);
    assert!(back.enemies.is_empty());
}

// ── UI hit-regions ───────────────────────────────────────────────────────────

#[test]
fn buttons_contain_their_centers_and_do_not_collide() {
    let start = start_button();
    assert!(start.contains(start.x + start.w / 2, start.y + start.h / 2));

    let retry = retry_button();
    let menu = menu_button();
    assert!(retry.contains(retry.x + retry.w / 2, retry.y + retry.h / 2));
    assert!(menu.contains(menu.x + menu.w / 2, menu.y + menu.h / 2));
    assert!(!retry.overlaps(&menu));

    // Both sit inside the game-over panel
    let panel = game_over_panel();
    assert!(panel.contains(retry.x, retry.y));
    assert!(panel.contains(menu.x + menu.w, menu.y + menu.h));
}
