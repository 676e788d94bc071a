use session_scribe::{Recording, Stage, StageJobMessage, StageStatus};
use uuid::Uuid;

#[test]
fn stage_job_serialization_roundtrip() {
    let id = Uuid::new_v4();
    let msg = StageJobMessage {
        recording_id: id,
        stage: Stage::Transcript,
        dispatched_at: "2026-08-07T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"stage\":\"transcript\""));
    assert!(json.contains(&id.to_string()));

    let deserialized: StageJobMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.recording_id, id);
    assert_eq!(deserialized.stage, Stage::Transcript);
    assert_eq!(deserialized.dispatched_at, "2026-08-07T14:30:00Z");
}

#[test]
fn stage_job_deserializes_from_wire_format() {
    let json = r#"{
        "recording_id": "6f2c8a47-9f5e-4d2a-b6a1-3c8e2d914f07",
        "stage": "summary",
        "dispatched_at": "2026-08-07T14:30:05Z"
    }"#;

    let msg: StageJobMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.stage, Stage::Summary);
    assert_eq!(
        msg.recording_id.to_string(),
        "6f2c8a47-9f5e-4d2a-b6a1-3c8e2d914f07"
    );
}

#[test]
fn statuses_serialize_lowercase() {
    assert_eq!(
        serde_json::to_string(&StageStatus::Pending).unwrap(),
        "\"pending\""
    );
    assert_eq!(
        serde_json::to_string(&StageStatus::Processing).unwrap(),
        "\"processing\""
    );
    assert_eq!(
        serde_json::to_string(&StageStatus::Completed).unwrap(),
        "\"completed\""
    );
    assert_eq!(
        serde_json::to_string(&StageStatus::Failed).unwrap(),
        "\"failed\""
    );
}

#[test]
fn new_recording_serializes_with_both_stages_pending() {
    let recording = Recording::new(Uuid::new_v4(), "abc123.audio".to_string(), 4096);
    let json = serde_json::to_string(&recording).unwrap();

    assert!(json.contains("\"transcript_status\":\"pending\""));
    assert!(json.contains("\"summary_status\":\"pending\""));
    assert!(json.contains("\"transcript\":null"));
    assert!(json.contains("\"summary\":null"));
    assert!(json.contains("\"duration_seconds\":null"));
}
