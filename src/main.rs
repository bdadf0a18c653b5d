//! Tower Stack entry point
//!
//! Native headless host: runs the game loop against the rapier physics world
//! and the recording scene with an autopilot pressing the button.
//!
//! Usage: `tower-stack [tuning.json]`. Data files live in `$TOWER_STACK_DATA`
//! (defaults to the working directory).

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use tower_stack::assets::{AssetError, ReadyModel};
    use tower_stack::consts::*;
    use tower_stack::leaderboard::format_date;
    use tower_stack::platform::{DirectInput, LogNavigation};
    use tower_stack::renderer::NodeInstance;
    use tower_stack::score::unix_millis;
    use tower_stack::sim::{
        GameLoop, GamePhase, Interaction, Ports, RapierWorld, RecordingScene, autopilot_should_cut,
    };
    use tower_stack::{Leaderboard, Settings, Tuning};

    /// Give up on a run after this many simulated frames (~5 minutes)
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    /// Keep simulating debris for a moment after the run ends
    const GAME_OVER_FRAMES: u32 = 90;

    /// Simulated host frame times, uneven like a real display
    const FRAME_TIMES: [f32; 4] = [1.0 / 60.0, 1.0 / 60.0, 1.0 / 30.0, 1.0 / 144.0];

    struct Host {
        game: GameLoop<RapierWorld, RecordingScene>,
        accumulator: f32,
    }

    impl Host {
        /// Run simulation ticks for one host frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.game.tick();
                self.autopilot();
                self.export_instances();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// What a GPU host would upload for this frame
        fn export_instances(&self) {
            if !log::log_enabled!(log::Level::Debug) {
                return;
            }
            let instances = self.game.scene().instances();
            log::debug!(
                "Instance buffer: {} nodes, {} bytes",
                instances.len(),
                NodeInstance::as_bytes(&instances).len()
            );
        }

        fn autopilot(&mut self) {
            if self.game.phase() != GamePhase::Playing {
                return;
            }
            let Some(session) = self.game.session() else {
                return;
            };
            // Gets sloppier as the swing speeds up
            let tolerance = 0.02 + session.round as f32 * 0.005;
            if autopilot_should_cut(session, tolerance) {
                if let Interaction::Cut(report) = self.game.on_interact() {
                    log::debug!("Autopilot cut: {:?}", report);
                }
            }
        }
    }

    fn data_dir() -> PathBuf {
        std::env::var_os("TOWER_STACK_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn load_tuning(path: Option<&Path>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Bad tuning file {} ({}), using defaults", path.display(), e);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Tower Stack (native) starting...");

        let tuning_path = std::env::args().nth(1).map(PathBuf::from);
        let tuning = load_tuning(tuning_path.as_deref());

        let dir = data_dir();
        let board_path = dir.join("leaderboard.json");
        let settings_path = dir.join("settings.json");
        let settings = Settings::load(&settings_path);
        log::info!("Music {}", if settings.music_enabled { "on" } else { "off" });

        let ports = Ports {
            input: Box::new(DirectInput::new()),
            navigation: Box::new(LogNavigation),
            persistence: Box::new(Leaderboard::load(&board_path)),
            // No model files natively; blocks render as boxes
            models: Box::new(ReadyModel::failed(AssetError::NotFound("block.glb".into()))),
        };
        let world = RapierWorld::new(tuning.gravity, tuning.friction);
        let game = GameLoop::new(tuning, world, RecordingScene::new(), ports).with_settings(settings);
        let mut host = Host {
            game,
            accumulator: 0.0,
        };

        host.game.on_interact();
        let mut frames = 0;
        let mut over_for = 0;
        while frames < MAX_FRAMES && over_for < GAME_OVER_FRAMES {
            host.update(FRAME_TIMES[frames as usize % FRAME_TIMES.len()]);
            frames += 1;
            if host.game.is_game_over() {
                over_for += 1;
            }
        }

        let view = host.game.view();
        println!(
            "Run finished after {} frames: score {}, tower height {:.1}, {} dropped, {} clouds ({:?})",
            frames, view.score, view.tower_height, view.dropped, view.clouds, view.cause
        );

        if host.game.is_game_over() {
            let name = host
                .game
                .settings()
                .player_name
                .clone()
                .unwrap_or_else(|| "autopilot".to_string());
            match host.game.save_score(&name) {
                Ok(record) => println!("Saved {} for {}", record.score, record.name),
                Err(e) => println!("Score not saved: {}", e),
            }
        }

        if let Err(e) = host.game.settings().save(&settings_path) {
            log::warn!("Failed to save settings: {}", e);
        }
        host.game.view_leaderboard();

        let board = Leaderboard::load(&board_path);
        let now = unix_millis();
        println!("\nLeaderboard");
        for (rank, entry) in board.entries.iter().enumerate() {
            println!(
                "{:>2}. {:<16} {:>4}  {}",
                rank + 1,
                entry.name,
                entry.score,
                format_date(entry.timestamp, now)
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive the library directly
}
