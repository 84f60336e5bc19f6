#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use lanepath::error::{LaneChangeError, LanePathError};
use lanepath::event::PathEvent;
use lanepath::geometry::{Pose, SplineKind};
use lanepath::graph::{PathGraph, PathId, PathNode};
use lanepath::lane::LaneChangeConfig;
use lanepath::math::{Isometry3, Point3, Vector3};
use lanepath::path::{SampledPath, SamplingParams};
use lanepath::sim::{AgentConfig, LaneIntent, Simulation};
use lanepath::travel::{RouteFollower, TravelConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn straight(name: &str, x: f64, z0: f64, z1: f64, lane: i32) -> PathNode {
    PathNode::new(name, vec![Point3::new(x, 0.0, z0), Point3::new(x, 0.0, z1)]).in_lane(lane)
}

fn three_lanes() -> (PathGraph, [PathId; 3]) {
    let mut graph = PathGraph::new();
    let left = graph.add_path(straight("left", -3.5, 0.0, 100.0, 0));
    let middle = graph.add_path(straight("middle", 0.0, 0.0, 100.0, 1));
    let right = graph.add_path(straight("right", 3.5, 0.0, 100.0, 2));
    graph.link_lanes(left, middle).unwrap();
    graph.link_lanes(middle, right).unwrap();
    (graph, [left, middle, right])
}

fn count(events: &[PathEvent], pred: impl Fn(&PathEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn winding_path_table_properties() {
    init_tracing();
    let cps = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(4.0, 0.0, 10.0),
        Point3::new(-3.0, 1.0, 20.0),
        Point3::new(2.0, 0.0, 30.0),
        Point3::new(0.0, 0.0, 40.0),
    ];
    let path = SampledPath::sample(&cps, &Isometry3::identity(), &SamplingParams::default());

    assert!(path.distances().windows(2).all(|w| w[0] <= w[1]));
    assert_relative_eq!(path.distances()[0], 0.0);
    assert_relative_eq!(*path.distances().last().unwrap(), path.total_length());
    assert!(path.total_length() > 40.0);

    let first = path.points()[0];
    let last = *path.points().last().unwrap();
    assert_relative_eq!(path.position_at_distance(0.0).unwrap(), first);
    assert_relative_eq!(
        path.position_at_distance(path.total_length()).unwrap(),
        last,
        epsilon = 1e-9
    );
    assert_relative_eq!(path.position_at_distance(-5.0).unwrap(), first);
    assert_relative_eq!(path.position_at_distance(1e6).unwrap(), last, epsilon = 1e-9);

    for &d in path.distances() {
        let dir = path.direction_at_distance(d).unwrap();
        assert_relative_eq!(dir.norm(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn bezier_path_passes_through_group_ends() {
    let cps = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 5.0),
        Point3::new(5.0, 0.0, 10.0),
        Point3::new(5.0, 0.0, 15.0),
    ];
    let params = SamplingParams {
        kind: SplineKind::Bezier,
        ..SamplingParams::default()
    };
    let path = SampledPath::sample(&cps, &Isometry3::identity(), &params);
    assert_relative_eq!(path.points()[0], cps[0], epsilon = 1e-12);
    assert_relative_eq!(*path.points().last().unwrap(), cps[3], epsilon = 1e-12);
}

#[test]
fn runner_clamps_at_path_end() {
    init_tracing();
    let mut graph = PathGraph::new();
    let road = graph.add_path(straight("road", 0.0, 0.0, 100.0, 0));
    let mut sim = Simulation::new(graph);
    let id = sim.spawn(AgentConfig::default()).unwrap();
    sim.place(id, road, 0.0).unwrap();
    sim.start(id).unwrap();
    sim.drain_events();

    for tick in 1..=11 {
        sim.tick(1.0);
        let events = sim.drain_events();
        let ends = count(&events, |e| matches!(e, PathEvent::ReachedPathEnd { .. }));
        let traveler = sim.agent(id).unwrap().traveler();
        if tick < 10 {
            assert_eq!(ends, 0);
            assert_relative_eq!(traveler.distance(), 10.0 * f64::from(tick));
        } else if tick == 10 {
            assert_eq!(ends, 1);
            assert_relative_eq!(traveler.distance(), 100.0);
            assert!(!traveler.is_moving());
        } else {
            assert_eq!(ends, 0);
            assert_relative_eq!(traveler.distance(), 100.0);
        }
    }
    assert_relative_eq!(sim.pose(id).unwrap().position, Point3::new(0.0, 0.0, 100.0));
}

#[test]
fn lane_change_completes_once_on_target() {
    init_tracing();
    let (graph, [_, middle, right]) = three_lanes();
    let mut sim = Simulation::new(graph);
    let id = sim
        .spawn(AgentConfig {
            lane_change: Some(LaneChangeConfig::default()),
            ..AgentConfig::default()
        })
        .unwrap();
    sim.place(id, middle, 10.0).unwrap();
    sim.start(id).unwrap();
    sim.request_lane_change(id, LaneIntent::Right).unwrap();

    let mut completed = 0;
    for _ in 0..5 {
        sim.tick(0.1);
        completed += count(&sim.drain_events(), |e| {
            matches!(e, PathEvent::LaneChangeCompleted { path, .. } if *path == right)
        });
    }
    assert_eq!(completed, 1);

    let agent = sim.agent(id).unwrap();
    assert_eq!(agent.traveler().path(), Some(right));
    assert!(!agent.is_changing_lanes());
    assert!(agent.traveler().is_moving());
    assert_relative_eq!(sim.pose(id).unwrap().position.x, 3.5, epsilon = 1e-6);
}

#[test]
fn unsampled_lane_cannot_be_targeted() {
    init_tracing();
    let mut graph = PathGraph::new();
    let left = graph.add_path(straight("left", 0.0, 0.0, 100.0, 0));
    let right = graph.add_path(PathNode::with_frame(
        "right",
        Isometry3::identity(),
        vec![
            Point3::new(3.5, 0.0, 0.0),
            Point3::new(3.5, 0.0, 50.0),
            Point3::new(3.5, 0.0, 100.0),
        ],
        SamplingParams {
            kind: SplineKind::Bezier,
            ..SamplingParams::default()
        },
    ));
    graph.link_lanes(left, right).unwrap();

    let mut sim = Simulation::new(graph);
    let id = sim
        .spawn(AgentConfig {
            lane_change: Some(LaneChangeConfig::default()),
            ..AgentConfig::default()
        })
        .unwrap();
    sim.place(id, left, 40.0).unwrap();
    sim.start(id).unwrap();
    sim.drain_events();

    assert!(matches!(
        sim.request_lane_change(id, LaneIntent::Right),
        Err(LanePathError::LaneChange(LaneChangeError::TooFewControlPoints { .. }))
    ));
    for _ in 0..5 {
        sim.tick(0.1);
    }
    let traveler = sim.agent(id).unwrap().traveler();
    assert_eq!(traveler.path(), Some(left));
    assert!(traveler.is_moving());
    assert_relative_eq!(traveler.distance(), 45.0, epsilon = 1e-6);
    assert!(sim.drain_events().is_empty());
}

#[test]
fn cooldown_gates_consecutive_changes() {
    init_tracing();
    let (graph, [left, middle, right]) = three_lanes();
    let mut sim = Simulation::new(graph);
    let id = sim
        .spawn(AgentConfig {
            lane_change: Some(LaneChangeConfig {
                duration: 0.1,
                cooldown: 0.3,
                ..LaneChangeConfig::default()
            }),
            ..AgentConfig::default()
        })
        .unwrap();
    sim.place(id, right, 0.0).unwrap();
    sim.start(id).unwrap();

    sim.request_lane_change(id, LaneIntent::Left).unwrap();
    sim.tick(0.1);
    assert_eq!(sim.agent(id).unwrap().traveler().path(), Some(middle));

    assert!(matches!(
        sim.request_lane_change(id, LaneIntent::Left),
        Err(LanePathError::LaneChange(LaneChangeError::CoolingDown { .. }))
    ));
    sim.tick(0.1);
    sim.tick(0.1);

    sim.request_lane_change(id, LaneIntent::Left).unwrap();
    sim.tick(0.1);
    assert_eq!(sim.agent(id).unwrap().traveler().path(), Some(left));

    // No lane further left.
    sim.tick(0.3);
    assert!(matches!(
        sim.request_lane_change(id, LaneIntent::Left),
        Err(LanePathError::LaneChange(LaneChangeError::NoLane))
    ));
}

#[test]
fn snaps_to_closer_parallel_path() {
    init_tracing();
    let mut graph = PathGraph::new();
    let a = graph.add_path(straight("a", 0.0, 0.0, 50.0, 0));
    let _b = graph.add_path(straight("b", 5.0, 0.0, 50.0, 1));
    let mut sim = Simulation::new(graph);
    let id = sim.spawn(AgentConfig::default()).unwrap();
    sim.set_pose(id, Pose::facing(Point3::new(1.0, 0.0, 20.0), &Vector3::z()))
        .unwrap();

    let found = sim.snap_to_nearest(id).unwrap().unwrap();
    assert_eq!(found.path, a);
    assert_relative_eq!(found.distance, 20.0, epsilon = 1e-6);
    assert_relative_eq!(found.separation, 1.0, epsilon = 1e-6);
    assert_eq!(sim.agent(id).unwrap().traveler().path(), Some(a));
}

#[test]
fn traffic_follows_connected_road() {
    init_tracing();
    let mut graph = PathGraph::new();
    let first = graph.add_path(straight("first", 0.0, 0.0, 30.0, 0));
    let second = graph.add_path(straight("second", 0.0, 30.0, 50.0, 0));
    graph.connect(first, second).unwrap();

    let mut sim = Simulation::new(graph);
    let id = sim
        .spawn(AgentConfig {
            travel: TravelConfig {
                speed: 20.0,
                forward: true,
            },
            route: Some(RouteFollower::new(true)),
            ..AgentConfig::default()
        })
        .unwrap();
    sim.place(id, first, 0.0).unwrap();
    sim.start(id).unwrap();
    sim.drain_events();

    assert!(sim.tick(1.0).is_empty());
    assert!(sim.tick(1.0).is_empty());
    let events = sim.drain_events();
    assert_eq!(
        count(&events, |e| matches!(e, PathEvent::PathAdvanced { to, .. } if *to == second)),
        1
    );
    assert_eq!(sim.agent(id).unwrap().traveler().path(), Some(second));
    assert_relative_eq!(sim.agent(id).unwrap().traveler().distance(), 10.0, epsilon = 1e-9);

    let dead = sim.tick(1.0);
    assert_eq!(dead.len(), 1);
    assert!(!sim.agent(id).unwrap().traveler().is_moving());
    assert_relative_eq!(sim.pose(id).unwrap().position, Point3::new(0.0, 0.0, 50.0), epsilon = 1e-9);
}
