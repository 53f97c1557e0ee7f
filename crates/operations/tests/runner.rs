mod common;

use async_trait::async_trait;
use common::{orchestrator, EditorSim};
use device::{DeviceDriver, DeviceError, UiElement};
use engine::{Engine, EngineConfig, ErrorKind};
use operations::{
    parse_plan, CommandOutcome, EffectCatalog, Orchestrator, TransitionCatalog,
};
use std::sync::Arc;
use timeline::{CalibrationConstants, Point, SessionState, TimelineModel, TimelineStore};

const PLAN: &str = r#"```json
{
  "thought_process": "shorten the second shot, then soften both cuts",
  "plan": [
    {"tool": "change_duration", "args": {"image_idx": 2, "duration": 3.0}},
    {"tool": "add_transition", "args": {"image1_idx": 1, "image2_idx": 3, "transition_type": "fade"}},
    {"tool": "add_transition", "args": {"image1_idx": 1, "image2_idx": 2, "transition_type": "mix"}},
    {"tool": "apply_effect", "args": {"image_idx": 4, "effects_list": ["Noise"]}}
  ]
}
```"#;

#[tokio::test]
async fn test_run_continues_past_rejected_step() {
    let sim = Arc::new(EditorSim::new(4));
    let orch = orchestrator(sim.clone());
    let mut store = TimelineStore::new();
    orch.engine().calibrate(&mut store, 4).await.unwrap();

    let plan = parse_plan(PLAN).unwrap();
    let report = orch.run_plan(&mut store, &plan).await;

    assert_eq!(report.commands.len(), 4);
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 0);
    assert!(matches!(
        report.commands[1].outcome,
        CommandOutcome::Failed {
            kind: ErrorKind::Validation,
            ..
        }
    ));
    assert_eq!(report.durations, vec![4.5, 2.5, 5.0, 5.0]);
    assert_eq!(report.session_id, Some(store.session().unwrap().id));
    assert_eq!(sim.state().durations, vec![4.5, 2.5, 5.0, 5.0]);
    assert_eq!(sim.state().bars.len(), 1);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["commands"][0]["status"], "done");
    assert_eq!(json["commands"][1]["status"], "failed");
    assert_eq!(json["commands"][1]["command"]["tool"], "add_transition");
}

#[tokio::test]
async fn test_uncalibrated_run_reports_every_step() {
    let sim = Arc::new(EditorSim::new(4));
    let orch = orchestrator(sim.clone());
    let mut store = TimelineStore::new();

    let plan = parse_plan(PLAN).unwrap();
    let report = orch.run_plan(&mut store, &plan).await;

    // Not being calibrated is recoverable: each step is tried and rejected.
    assert_eq!(report.failed(), 4);
    assert!(report.commands.iter().all(|c| matches!(
        c.outcome,
        CommandOutcome::Failed {
            kind: ErrorKind::NotCalibrated | ErrorKind::Validation,
            ..
        }
    )));
    assert_eq!(report.session_id, None);
    assert!(report.durations.is_empty());
    assert_eq!(sim.calls(), 0);
}

struct Disconnected;

#[async_trait]
impl DeviceDriver for Disconnected {
    async fn snapshot(&self) -> Result<Vec<UiElement>, DeviceError> {
        Err(DeviceError::CommandFailed("device offline".into()))
    }

    async fn tap(&self, _x: i32, _y: i32) -> Result<(), DeviceError> {
        Err(DeviceError::CommandFailed("device offline".into()))
    }

    async fn swipe(&self, _: i32, _: i32, _: i32, _: i32, _: u32) -> Result<(), DeviceError> {
        Err(DeviceError::CommandFailed("device offline".into()))
    }

    async fn type_text(&self, _text: &str, _index: usize) -> Result<(), DeviceError> {
        Err(DeviceError::CommandFailed("device offline".into()))
    }
}

#[tokio::test]
async fn test_device_failure_skips_remaining_steps() {
    let engine = Engine::new(Arc::new(Disconnected), EngineConfig::default().without_delays());
    let orch = Orchestrator::new(engine, EffectCatalog::default(), TransitionCatalog::default());
    let constants = CalibrationConstants {
        px_per_sec: 60.0,
        anchor: Point::new(540, 1460),
        track_height: 120,
    };
    let mut store =
        TimelineStore::with_session(SessionState::new(constants, TimelineModel::new(4, 5.0)));

    let plan = parse_plan(PLAN).unwrap();
    let report = orch.run_plan(&mut store, &plan).await;

    assert!(matches!(
        report.commands[0].outcome,
        CommandOutcome::Failed {
            kind: ErrorKind::Device,
            ..
        }
    ));
    assert_eq!(report.skipped(), 3);
    assert_eq!(report.durations, vec![5.0; 4]);
}
