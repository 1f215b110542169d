//! Headless cohort run with scripted wheel contacts.
//!
//! Three vehicles share one shutdown signal. Each drifts into the target lane
//! some ticks after a lane change is triggered; the slowest one misses the
//! deadline, which ends the whole cohort's episodes.

use lanechange::{
    Cohort, EnvConfig, EpisodeRecorder, LaneChangeState, LaneKeepingPolicy, Policy,
    ScriptedBody, StartPoseSelection, Surface,
};

/// Ticks each agent waits in controlled access before crossing over.
const CROSSING_DELAY: [u32; 3] = [0, 20, 60];
const TICKS: usize = 2_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = EnvConfig {
        start_selection: StartPoseSelection::AgentIndex,
        ..EnvConfig::default()
    };
    let bodies = CROSSING_DELAY
        .iter()
        .map(|_| ScriptedBody::new())
        .collect::<Vec<_>>();
    let mut cohort = Cohort::new(config.clone(), bodies, 2024)?;
    let mut policy = LaneKeepingPolicy::new(&config);
    let mut recorder = EpisodeRecorder::new();

    for _ in 0..TICKS {
        for (agent, delay) in cohort.agents_mut().iter_mut().zip(CROSSING_DELAY) {
            let cycle = agent.cycle();
            let crossing = agent.lane_change_state() == LaneChangeState::ControlledAccess
                && cycle.counter() > cycle.trigger_threshold() + delay;
            let lane = if crossing {
                agent.target_lane()
            } else {
                agent.current_lane()
            };
            let surface = Some(Surface::Lane(lane));
            agent.body_mut().set_front_contacts(surface, surface);
        }

        let observations = cohort.observations();
        let actions = policy.select_actions(&observations);
        let results = cohort.step(&actions)?;
        recorder.record_all(&results);
    }

    println!("policy: {}", policy.name());
    print!("{}", recorder.summary());
    Ok(())
}
