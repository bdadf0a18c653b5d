//! Shared harness for integration tests: a game loop wired to inspectable ports

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use tower_stack::assets::{AssetError, ReadyModel};
use tower_stack::persistence::{PersistenceError, ScorePersistence, ScoreRecord};
use tower_stack::platform::{DirectInput, InputPort, NavigationPort, Screen, Subscription};
use glam::{Quat, Vec3};
use tower_stack::Tuning;
use tower_stack::sim::{
    BodyHandle, BodySpec, BodyTransform, CameraView, GameLoop, NodeHandle, NodeSpec, Ports,
    RapierWorld, RecordingScene, RigidBodyWorld, SceneGraph,
};

pub type Game = GameLoop<RapierWorld, RecordingScene>;

#[derive(Default)]
pub struct Harness {
    pub input: DirectInput,
    pub screens: Vec<Screen>,
    pub saved: Vec<ScoreRecord>,
    pub fail_saves: bool,
}

pub type SharedHarness = Rc<RefCell<Harness>>;

struct HarnessInput(SharedHarness);
struct HarnessNavigation(SharedHarness);
struct HarnessStore(SharedHarness);

impl InputPort for HarnessInput {
    fn subscribe(&mut self) -> Subscription {
        self.0.borrow_mut().input.subscribe()
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.0.borrow_mut().input.unsubscribe(subscription);
    }
}

impl NavigationPort for HarnessNavigation {
    fn go_to(&mut self, screen: Screen) {
        self.0.borrow_mut().screens.push(screen);
    }
}

impl ScorePersistence for HarnessStore {
    fn save(&mut self, record: &ScoreRecord) -> Result<(), PersistenceError> {
        let mut harness = self.0.borrow_mut();
        if harness.fail_saves {
            return Err(PersistenceError::Rejected("backend offline".into()));
        }
        harness.saved.push(record.clone());
        Ok(())
    }
}

fn ports(harness: &SharedHarness) -> Ports {
    Ports {
        input: Box::new(HarnessInput(harness.clone())),
        navigation: Box::new(HarnessNavigation(harness.clone())),
        persistence: Box::new(HarnessStore(harness.clone())),
        models: Box::new(ReadyModel::failed(AssetError::NotFound("block.glb".into()))),
    }
}

pub fn game_with(tuning: Tuning) -> (Game, SharedHarness) {
    let harness = SharedHarness::default();
    let ports = ports(&harness);
    let world = RapierWorld::new(tuning.gravity, tuning.friction);
    (GameLoop::new(tuning, world, RecordingScene::new(), ports), harness)
}

pub fn game() -> (Game, SharedHarness) {
    game_with(Tuning::default())
}

/// Ordered record of calls made across the world, scene and input ports
pub type Journal = Rc<RefCell<Vec<&'static str>>>;

pub struct JournalWorld {
    inner: RapierWorld,
    journal: Journal,
}

impl RigidBodyWorld for JournalWorld {
    fn add_body(&mut self, spec: BodySpec) -> BodyHandle {
        self.inner.add_body(spec)
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.journal.borrow_mut().push("remove_body");
        self.inner.remove_body(handle)
    }

    fn step(&mut self, dt: f32) {
        self.journal.borrow_mut().push("step");
        self.inner.step(dt);
    }

    fn transform(&self, handle: BodyHandle) -> Option<BodyTransform> {
        self.inner.transform(handle)
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.inner.velocity(handle)
    }

    fn body_count(&self) -> usize {
        self.inner.body_count()
    }
}

pub struct JournalScene {
    inner: RecordingScene,
    journal: Journal,
}

impl SceneGraph for JournalScene {
    fn add_node(&mut self, spec: NodeSpec) -> NodeHandle {
        self.inner.add_node(spec)
    }

    fn remove_node(&mut self, handle: NodeHandle) -> bool {
        self.journal.borrow_mut().push("remove_node");
        self.inner.remove_node(handle)
    }

    fn set_position(&mut self, handle: NodeHandle, position: Vec3) {
        self.inner.set_position(handle, position);
    }

    fn set_scale(&mut self, handle: NodeHandle, scale: Vec3) {
        self.inner.set_scale(handle, scale);
    }

    fn set_orientation(&mut self, handle: NodeHandle, orientation: Quat) {
        self.inner.set_orientation(handle, orientation);
    }

    fn render(&mut self, camera: &CameraView) {
        self.inner.render(camera);
    }

    fn node_count(&self) -> usize {
        self.inner.node_count()
    }
}

struct JournalInput {
    inner: HarnessInput,
    journal: Journal,
}

impl InputPort for JournalInput {
    fn subscribe(&mut self) -> Subscription {
        self.inner.subscribe()
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.journal.borrow_mut().push("unsubscribe");
        self.inner.unsubscribe(subscription);
    }
}

pub type JournalGame = GameLoop<JournalWorld, JournalScene>;

/// A game whose world, scene and input all append to one shared journal
pub fn journaled_game() -> (JournalGame, SharedHarness, Journal) {
    let tuning = Tuning::default();
    let harness = SharedHarness::default();
    let journal = Journal::default();
    let mut ports = ports(&harness);
    ports.input = Box::new(JournalInput {
        inner: HarnessInput(harness.clone()),
        journal: journal.clone(),
    });
    let world = JournalWorld {
        inner: RapierWorld::new(tuning.gravity, tuning.friction),
        journal: journal.clone(),
    };
    let scene = JournalScene {
        inner: RecordingScene::new(),
        journal: journal.clone(),
    };
    (GameLoop::new(tuning, world, scene, ports), harness, journal)
}

/// Put the active block at `offset` on its axis, with no swing velocity
pub fn line_up<W: RigidBodyWorld, S: SceneGraph>(game: &mut GameLoop<W, S>, offset: f32) {
    let session = game.session_mut().expect("session");
    session.swing_velocity = 0.0;
    let active = session.active.as_mut().expect("active block");
    let axis = active.axis;
    axis.set(&mut active.position, offset);
}

/// Offset of the active block relative to the top layer on its axis
pub fn line_up_relative<W: RigidBodyWorld, S: SceneGraph>(game: &mut GameLoop<W, S>, delta: f32) {
    let session = game.session().expect("session");
    let top = session.top().expect("tower").clone();
    let axis = session.active.as_ref().expect("active block").axis;
    line_up(game, axis.get(top.position) + delta);
}
