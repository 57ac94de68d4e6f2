/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::entities::{
    Cloud, Coin, Effect, EffectKind, Enemy, Event, GameState, GameStatus, Platform, Player,
};

// ── World & gameplay constants ───────────────────────────────────────────────

/// The simulation runs in a fixed abstract world; the display layer
/// projects it onto whatever terminal size is available.
pub const WORLD_W: f32 = 1000.0;
pub const WORLD_H: f32 = 600.0;

/// Player horizontal run speed, world units per second.
pub const SPEED: f32 = 200.0;
/// Upward impulse applied on a grounded jump.
pub const JUMP_FORCE: f32 = 800.0;
/// Downward acceleration, world units per second².
pub const GRAVITY: f32 = 800.0;
/// Enemy patrol speed.
pub const ENEMY_SPEED: f32 = 50.0;
/// Score awarded per coin.
pub const COIN_VALUE: u32 = 10;

pub const PLAYER_W: f32 = 32.0;
pub const PLAYER_H: f32 = 48.0;
pub const ENEMY_SIZE: f32 = 24.0;
pub const COIN_SIZE: f32 = 16.0;

/// Fixed respawn point, also the initial player position.
pub const SPAWN_X: f32 = 100.0;
pub const SPAWN_Y: f32 = 100.0;

pub const MAX_HEALTH: u32 = 3;
pub const MAX_LIVES: u32 = 3;

/// Seconds the player is drawn white after taking a hit.
pub const FLASH_TIME: f32 = 0.1;

// Decorative-effect lifespans, seconds.
const DUST_TTL: f32 = 0.2;
const JUMP_FLASH_TTL: f32 = 0.3;
const JUMP_DUST_TTL: f32 = 0.5;
const POPUP_TTL: f32 = 1.0;

const CLOUD_COUNT: usize = 10;

// ── Entity factories ─────────────────────────────────────────────────────────

/// Patrol enemy starting out walking right.
pub fn spawn_enemy(x: f32, y: f32) -> Enemy {
    Enemy {
        x,
        y,
        direction: 1.0,
        speed: ENEMY_SPEED,
    }
}

/// Static collectible; no behaviour of its own.
pub fn spawn_coin(x: f32, y: f32) -> Coin {
    Coin { x, y }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial scene: ground, three floating platforms, three
/// patrol enemies, six coins, and the player dropped in at the spawn
/// point.  The RNG only places the background clouds.
pub fn init_state(rng: &mut impl Rng) -> GameState {
    let platforms = vec![
        // Ground runs the full width of the world
        Platform { x: 0.0, y: WORLD_H - 50.0, w: WORLD_W, h: 50.0 },
        Platform { x: 200.0, y: WORLD_H - 200.0, w: 150.0, h: 20.0 },
        Platform { x: 500.0, y: WORLD_H - 350.0, w: 150.0, h: 20.0 },
        Platform { x: 750.0, y: WORLD_H - 150.0, w: 150.0, h: 20.0 },
    ];

    let enemies = vec![
        spawn_enemy(250.0, WORLD_H - 250.0),
        spawn_enemy(550.0, WORLD_H - 400.0),
        spawn_enemy(800.0, WORLD_H - 200.0),
    ];

    let coins = vec![
        spawn_coin(300.0, WORLD_H - 250.0),
        spawn_coin(600.0, WORLD_H - 400.0),
        spawn_coin(850.0, WORLD_H - 200.0),
        spawn_coin(100.0, WORLD_H - 100.0),
        spawn_coin(400.0, WORLD_H - 100.0),
        spawn_coin(700.0, WORLD_H - 100.0),
    ];

    // Scatter clouds through the upper 70% of the sky
    let clouds = (0..CLOUD_COUNT)
        .map(|_| Cloud {
            x: rng.gen_range(0.0..WORLD_W),
            y: rng.gen_range(0.0..WORLD_H * 0.7),
        })
        .collect();

    GameState {
        player: Some(Player {
            x: SPAWN_X,
            y: SPAWN_Y,
            vx: 0.0,
            vy: 0.0,
            grounded: false,
            flash: 0.0,
        }),
        platforms,
        enemies,
        coins,
        effects: Vec::new(),
        clouds,
        score: 0,
        health: MAX_HEALTH,
        lives: MAX_LIVES,
        status: GameStatus::Playing,
    }
}

// ── Game state tracker ───────────────────────────────────────────────────────

pub fn is_game_over(state: &GameState) -> bool {
    state.status == GameStatus::GameOver
}

/// One hit, whether from enemy contact or from falling off-screen.
///
/// Decrements health and respawns the player at the spawn point with a
/// brief white flash.  Health rolling over to 0 costs a life and refills
/// health; losing the last life enters the terminal Game-Over state and
/// destroys the player.  No-op once terminal.
pub fn apply_damage(state: &GameState) -> GameState {
    if is_game_over(state) {
        return state.clone();
    }

    let mut next = state.clone();
    next.health = next.health.saturating_sub(1);

    if next.health == 0 {
        next.lives = next.lives.saturating_sub(1);
        if next.lives == 0 {
            next.status = GameStatus::GameOver;
            next.player = None;
            return next;
        }
        next.health = MAX_HEALTH;
    }

    if let Some(p) = next.player.as_mut() {
        p.x = SPAWN_X;
        p.y = SPAWN_Y;
        p.vx = 0.0;
        p.vy = 0.0;
        p.grounded = false;
        p.flash = FLASH_TIME;
    }
    next
}

/// Score a coin pickup.  No-op once terminal.
pub fn collect_coin(state: &GameState) -> GameState {
    if is_game_over(state) {
        return state.clone();
    }
    GameState {
        score: state.score + COIN_VALUE,
        ..state.clone()
    }
}

// ── Event reducer ────────────────────────────────────────────────────────────

/// Apply a single event.  Input-driven events and collision events found
/// by `tick` both route through here, so the damage/score rules live in
/// exactly one place.
pub fn apply_event(state: &GameState, event: Event, rng: &mut impl Rng) -> GameState {
    match event {
        Event::EnemyHit | Event::FellOffScreen => apply_damage(state),

        Event::CoinCollected(i) => {
            if is_game_over(state) || i >= state.coins.len() {
                return state.clone();
            }
            let mut next = collect_coin(state);
            let coin = next.coins.remove(i);
            next.effects.push(Effect {
                x: coin.x,
                y: coin.y - 20.0,
                ttl: POPUP_TTL,
                kind: EffectKind::ScorePopup,
            });
            next
        }

        Event::MovePressed(dir) => {
            let mut next = state.clone();
            let mut feet = None;
            if let Some(p) = next.player.as_mut() {
                p.vx = dir.sign() * SPEED;
                if p.grounded {
                    feet = Some((p.x + PLAYER_W / 2.0, p.y + PLAYER_H));
                }
            }
            // Running on the ground kicks up a dust particle
            if let Some((fx, fy)) = feet {
                next.effects.push(Effect {
                    x: fx,
                    y: fy,
                    ttl: DUST_TTL,
                    kind: EffectKind::Dust,
                });
            }
            next
        }

        Event::JumpPressed => {
            let mut next = state.clone();
            let mut feet = None;
            if let Some(p) = next.player.as_mut() {
                // Airborne presses do nothing — no double-jump
                if p.grounded {
                    p.vy = -JUMP_FORCE;
                    p.grounded = false;
                    feet = Some((p.x + PLAYER_W / 2.0, p.y + PLAYER_H));
                }
            }
            if let Some((fx, fy)) = feet {
                next.effects.push(Effect {
                    x: fx,
                    y: fy,
                    ttl: JUMP_FLASH_TTL,
                    kind: EffectKind::JumpFlash,
                });
                for _ in 0..3 {
                    let jitter: f32 = rng.gen_range(-10.0..10.0);
                    next.effects.push(Effect {
                        x: fx + jitter,
                        y: fy,
                        ttl: JUMP_DUST_TTL,
                        kind: EffectKind::JumpDust,
                    });
                }
            }
            next
        }

        Event::RestartPressed => {
            // Only a terminal Game-Over can be restarted
            if is_game_over(state) {
                init_state(rng)
            } else {
                state.clone()
            }
        }
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

fn aabb(ax: f32, ay: f32, aw: f32, ah: f32, bx: f32, by: f32, bw: f32, bh: f32) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

/// Advance the simulation by `dt` seconds.
///
/// Effects age and enemies patrol regardless of status; player physics
/// and collision detection only run while Playing.  Collisions are
/// turned into events and folded through `apply_event`, with at most one
/// damage event per frame.
pub fn tick(state: &GameState, dt: f32, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();

    // 1. Decorative effects age and self-remove, independent of status
    for e in next.effects.iter_mut() {
        e.ttl -= dt;
    }
    next.effects.retain(|e| e.ttl > 0.0);

    // 2. Enemy patrol: bounce between the horizontal world bounds
    let max_enemy_x = WORLD_W - ENEMY_SIZE;
    for enemy in next.enemies.iter_mut() {
        enemy.x += enemy.direction * enemy.speed * dt;
        if enemy.x <= 0.0 || enemy.x >= max_enemy_x {
            enemy.direction = -enemy.direction;
            enemy.x = enemy.x.clamp(0.0, max_enemy_x);
        }
    }

    if next.status != GameStatus::Playing {
        return next;
    }

    // 3. Player physics
    let mut fell = false;
    let mut hit_enemy = false;
    let mut picked: Option<usize> = None;

    if let Some(p) = next.player.as_mut() {
        p.vy += GRAVITY * dt;
        p.x += p.vx * dt;
        let old_bottom = p.y + PLAYER_H;
        p.y += p.vy * dt;

        // One-way landing: a falling player whose bottom edge crossed a
        // platform top this frame comes to rest on it
        p.grounded = false;
        if p.vy >= 0.0 {
            let new_bottom = p.y + PLAYER_H;
            for plat in &next.platforms {
                let overlaps_x = p.x + PLAYER_W > plat.x && p.x < plat.x + plat.w;
                if overlaps_x && old_bottom <= plat.y && new_bottom >= plat.y {
                    p.y = plat.y - PLAYER_H;
                    p.vy = 0.0;
                    p.grounded = true;
                }
            }
        }

        // Keep the player inside the horizontal world bounds
        p.x = p.x.clamp(0.0, WORLD_W - PLAYER_W);

        p.flash = (p.flash - dt).max(0.0);

        // Horizontal velocity is re-asserted each frame a key is held
        p.vx = 0.0;

        // 4. Collision detection against the post-integration position
        if p.y > WORLD_H {
            fell = true;
        } else {
            let (px, py) = (p.x, p.y);
            hit_enemy = next
                .enemies
                .iter()
                .any(|e| aabb(px, py, PLAYER_W, PLAYER_H, e.x, e.y, ENEMY_SIZE, ENEMY_SIZE));
            picked = next
                .coins
                .iter()
                .position(|c| aabb(px, py, PLAYER_W, PLAYER_H, c.x, c.y, COIN_SIZE, COIN_SIZE));
        }
    }

    // Coin first, so the popup spawns at the coin before any respawn
    if let Some(i) = picked {
        next = apply_event(&next, Event::CoinCollected(i), rng);
    }
    if fell {
        next = apply_event(&next, Event::FellOffScreen, rng);
    } else if hit_enemy {
        next = apply_event(&next, Event::EnemyHit, rng);
    }

    next
}
