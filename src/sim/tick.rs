//! Game loop controller
//!
//! Owns the session and drives it one fixed timestep at a time: swing the
//! active block, step physics through the bridge, climb the camera, spawn
//! clouds, check for game over, render. Interactions cut the tower or start a
//! new run; teardown releases everything the session created.

use glam::Vec3;
use serde::Serialize;

use super::bridge::Released;
use super::cut::{CutReport, block_node, perform_cut};
use super::physics::{BodySpec, RigidBodyWorld};
use super::scene::{NodeGeometry, NodeSpec, SceneGraph};
use super::state::{GameOverCause, GamePhase, GameStateMachine, Session};
use crate::assets::{ModelProvider, ModelSlot};
use crate::consts::SIM_DT;
use crate::persistence::{ScorePersistence, ScoreRecord};
use crate::platform::{InputPort, NavigationPort, Screen};
use crate::renderer::colors;
use crate::score::{SaveError, ScoreTracker, unix_millis};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Ground slab thickness (the top surface sits at `ground_y`)
const GROUND_THICKNESS: f32 = 1.0;
/// Ground plane extent
const GROUND_SIZE: f32 = 100.0;

/// Host capabilities the loop talks to
pub struct Ports {
    pub input: Box<dyn InputPort>,
    pub navigation: Box<dyn NavigationPort>,
    pub persistence: Box<dyn ScorePersistence>,
    pub models: Box<dyn ModelProvider>,
}

/// Whether ticks advance anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
}

/// Result of a single user interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// A new session was started
    Started,
    /// The active block was cut
    Cut(CutReport),
    /// Nothing happened (game over, or no active block)
    Ignored,
}

/// Read-only snapshot for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub phase: GamePhase,
    pub cause: Option<GameOverCause>,
    pub score: u32,
    pub round: u32,
    pub is_game_over: bool,
    pub is_saved: bool,
    pub camera_y: f32,
    pub tower_height: f32,
    pub layers: usize,
    pub dropped: usize,
    pub clouds: usize,
    /// Simulation ticks run by the current session
    pub ticks: u64,
}

pub struct GameLoop<W: RigidBodyWorld, S: SceneGraph> {
    tuning: Tuning,
    world: W,
    scene: S,
    ports: Ports,
    machine: GameStateMachine,
    session: Option<Session>,
    score: ScoreTracker,
    model: ModelSlot,
    settings: Settings,
    state: LoopState,
}

impl<W: RigidBodyWorld, S: SceneGraph> GameLoop<W, S> {
    pub fn new(tuning: Tuning, world: W, scene: S, ports: Ports) -> Self {
        Self {
            tuning,
            world,
            scene,
            ports,
            machine: GameStateMachine::new(),
            session: None,
            score: ScoreTracker::new(),
            model: ModelSlot::new(),
            settings: Settings::default(),
            state: LoopState::Stopped,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Direct session access for hosts and tooling (autopilot, replays)
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    pub fn cause(&self) -> Option<GameOverCause> {
        self.machine.cause()
    }

    pub fn loop_state(&self) -> LoopState {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.session.as_ref().map(|s| s.round).unwrap_or(0)
    }

    pub fn score(&self) -> u32 {
        ScoreTracker::score(self.round())
    }

    pub fn is_game_over(&self) -> bool {
        self.machine.is_game_over()
    }

    pub fn is_saved(&self) -> bool {
        self.score.is_saved()
    }

    pub fn view(&self) -> GameView {
        let session = self.session.as_ref();
        GameView {
            phase: self.machine.phase(),
            cause: self.machine.cause(),
            score: self.score(),
            round: self.round(),
            is_game_over: self.is_game_over(),
            is_saved: self.is_saved(),
            camera_y: session
                .map(|s| s.camera.y())
                .unwrap_or(self.tuning.camera_start.y),
            tower_height: session.map(|s| s.tower_height()).unwrap_or(0.0),
            layers: session.map(|s| s.tower.len()).unwrap_or(0),
            dropped: session.map(|s| s.dropped.len()).unwrap_or(0),
            clouds: session.map(|s| s.clouds.len()).unwrap_or(0),
            ticks: session.map(|s| s.time_ticks).unwrap_or(0),
        }
    }

    /// Handle a click/tap/key press
    pub fn on_interact(&mut self) -> Interaction {
        match self.machine.phase() {
            GamePhase::Idle => {
                self.start_session();
                Interaction::Started
            }
            GamePhase::Playing => self.cut(),
            GamePhase::GameOver => Interaction::Ignored,
        }
    }

    /// Advance one fixed timestep. Returns false if the loop is stopped.
    pub fn tick(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.model.refresh(self.ports.models.as_mut());

        let tuning = &self.tuning;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let playing = self.machine.is_playing();

        if playing {
            let speed = tuning.speed_for_round(session.round);
            session.angle += speed;
            if let Some(active) = session.active.as_mut() {
                let offset = session.angle.sin() * tuning.amplitude;
                session.swing_velocity = offset - session.last_offset;
                session.last_offset = offset;
                active.axis.set(&mut active.position, offset);
                session
                    .bridge
                    .place(&mut self.scene, active.id, active.position, None);
            }
        }

        session.bridge.step(&mut self.world, &mut self.scene, SIM_DT);
        for dropped in session.dropped.iter_mut() {
            if let Some(t) = session.bridge.transform(&self.world, dropped.id) {
                dropped.position = t.position;
                dropped.orientation = t.orientation;
            }
        }

        if playing {
            let speed = tuning.speed_for_round(session.round);
            session
                .camera
                .update(speed, session.round, tuning.block_height, tuning.follow_margin);
            if let Some(cloud) = session.cloud_spawner.update(session.camera.y()) {
                let id = session.next_entity_id();
                let (width, height) = cloud.variant.size();
                session.bridge.spawn_visual(
                    &mut self.scene,
                    id,
                    NodeSpec {
                        geometry: NodeGeometry::Billboard { width, height },
                        position: cloud.position,
                        scale: Vec3::ONE,
                        color: colors::CLOUD,
                    },
                );
                session.clouds.push(super::state::CloudInstance {
                    id,
                    position: cloud.position,
                    variant: cloud.variant,
                });
                log::debug!("Cloud {:?} at y={:.1}", cloud.variant, cloud.position.y);
            }

            let floor = tuning.game_over_floor;
            if let Some(fallen) = session.dropped.iter().find(|d| d.position.y < floor) {
                let (id, round) = (fallen.id, session.round);
                if self.machine.finish(GameOverCause::Fell) {
                    log::info!("Game over: block {} fell, score {}", id, round);
                }
            }
        }

        session.time_ticks += 1;
        self.scene.render(&session.camera.view());
        true
    }

    /// GameOver (or Playing) -> Idle; the next interaction starts fresh
    pub fn restart(&mut self) {
        self.teardown();
        self.machine.reset();
        self.score.reset();
        log::info!("Restarted");
    }

    /// Submit this run's score under `name`
    pub fn save_score(&mut self, name: &str) -> Result<ScoreRecord, SaveError> {
        self.save_score_at(name, unix_millis())
    }

    pub fn save_score_at(&mut self, name: &str, timestamp: f64) -> Result<ScoreRecord, SaveError> {
        if !self.machine.is_game_over() {
            return Err(SaveError::NotGameOver);
        }
        let round = self.round();
        let record = self
            .score
            .submit(self.ports.persistence.as_mut(), name, round, timestamp)?;
        self.settings.remember_name(&record.name);
        Ok(record)
    }

    pub fn back_to_menu(&mut self) {
        self.leave(Screen::Menu);
    }

    pub fn view_leaderboard(&mut self) {
        self.leave(Screen::Leaderboard);
    }

    /// Tear down and return to Idle (component unmount)
    pub fn unmount(&mut self) -> Released {
        let released = self.teardown();
        self.machine.reset();
        released
    }

    /// Stop ticking, then release bodies, nodes and the input subscription.
    /// Safe to call any number of times.
    pub fn teardown(&mut self) -> Released {
        self.state = LoopState::Stopped;
        let Some(mut session) = self.session.take() else {
            return Released::default();
        };
        let released = session.bridge.teardown(&mut self.world, &mut self.scene);
        if let Some(subscription) = session.input.take() {
            self.ports.input.unsubscribe(subscription);
        }
        log::info!(
            "Session torn down: {} bodies, {} nodes released",
            released.bodies,
            released.nodes
        );
        released
    }

    fn leave(&mut self, screen: Screen) {
        self.unmount();
        self.ports.navigation.go_to(screen);
    }

    fn start_session(&mut self) {
        self.teardown();
        self.model.refresh(self.ports.models.as_mut());
        let geometry = self.model.geometry();
        let tuning = &self.tuning;
        let mut session = Session::new(tuning);

        let ground = session.next_entity_id();
        let ground_center = Vec3::new(0.0, tuning.ground_y - GROUND_THICKNESS / 2.0, 0.0);
        session.bridge.spawn(
            &mut self.world,
            &mut self.scene,
            ground,
            BodySpec::fixed(
                ground_center,
                Vec3::new(GROUND_SIZE / 2.0, GROUND_THICKNESS / 2.0, GROUND_SIZE / 2.0),
            ),
            NodeSpec {
                geometry: NodeGeometry::Plane { size: GROUND_SIZE },
                position: Vec3::new(0.0, tuning.ground_y, 0.0),
                scale: Vec3::ONE,
                color: colors::GROUND,
            },
        );
        session.ground = Some(ground);

        for base in &session.tower {
            session.bridge.spawn(
                &mut self.world,
                &mut self.scene,
                base.id,
                BodySpec::fixed(base.position, base.half_extents()),
                block_node(&geometry, base.position, base.size(), base.hue),
            );
        }
        if let Some(active) = &session.active {
            session.bridge.spawn_visual(
                &mut self.scene,
                active.id,
                block_node(&geometry, active.position, active.size(), active.hue),
            );
        }

        session.input = Some(self.ports.input.subscribe());
        self.session = Some(session);
        self.score.reset();
        self.machine.begin();
        self.state = LoopState::Running;
        log::info!("New session (seed {:#x})", self.tuning.seed);
    }

    fn cut(&mut self) -> Interaction {
        let Some(session) = self.session.as_mut() else {
            return Interaction::Ignored;
        };
        let geometry = self.model.geometry();
        let toss = session.swing_velocity * self.tuning.toss_scale;
        let Some(report) = perform_cut(
            session,
            &mut self.world,
            &mut self.scene,
            &self.tuning,
            &geometry,
            toss,
        ) else {
            return Interaction::Ignored;
        };

        match report {
            CutReport::Placed { overlap, .. } => {
                log::debug!("Round {} (overlap {:.3})", session.round, overlap);
            }
            CutReport::Missed { dropped } => {
                if self.machine.finish(GameOverCause::Missed) {
                    log::info!("Game over: block {} missed, score {}", dropped, session.round);
                }
            }
        }
        Interaction::Cut(report)
    }
}

/// Autopilot for demo mode: cut when the swing lines up with the layer below
pub fn autopilot_should_cut(session: &Session, tolerance: f32) -> bool {
    let (Some(active), Some(top)) = (session.active.as_ref(), session.top()) else {
        return false;
    };
    let axis = active.axis;
    (axis.get(active.position) - axis.get(top.position)).abs() <= tolerance
}
