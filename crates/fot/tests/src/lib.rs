//! Shared case fixtures for the cross-crate tests.

use serde_json::{json, Value};

/// A complete emergency-department chest pain case.
pub fn chest_pain_record() -> Value {
    json!({
        "case_id": "ed-chest-001",
        "chief_complaint": "Chest pain radiating to left arm",
        "symptoms": {
            "chest_pain": { "intensity": 0.9, "duration": "2 hours" },
            "dyspnea": { "intensity": 0.6 },
            "diaphoresis": { "intensity": 0.4 }
        },
        "vital_signs": {
            "systolic_bp": 165,
            "diastolic_bp": 98,
            "heart_rate": 112,
            "temperature_c": 37.1,
            "respiratory_rate": 22,
            "oxygen_saturation": 94
        },
        "vital_trends": { "heart_rate_trend": "increasing" },
        "monitoring_frequency": "every 15 minutes",
        "pain_scale": 8,
        "age": 61,
        "gender": "male",
        "medications": [
            { "name": "aspirin", "dose": "81 mg", "frequency": "daily" },
            { "name": "metformin", "dose": "500 mg", "frequency": "bid" }
        ],
        "allergies": ["penicillin"],
        "previous_tests": ["EKG"],
        "diagnostic_plan": ["Troponin", "Chest X-ray"],
        "laboratory": { "troponin": 0.02, "creatinine": 1.1, "glucose": 140 },
        "test_timing": { "collection_time": "2024-01-15T10:30:00Z" }
    })
}

/// A record with nothing in it.
pub fn empty_record() -> Value {
    json!({})
}

/// Image study with no pixel dimensions and burned-in PHI.
pub fn image_study_with_phi() -> Value {
    json!({
        "modality": "XR",
        "bodySite": "chest",
        "acquiredAt": "2024-01-15T10:45:00Z",
        "deviceModel": "DR-9000",
        "pixelSpacingMm": 0.2,
        "phiBurninFlag": 1
    })
}

/// Audio recording meeting every default threshold.
pub fn clean_audio_recording() -> Value {
    json!({
        "bodySite": "chest",
        "sampleRateHz": 8000,
        "bitDepth": 16,
        "channels": 1,
        "durationSec": 30,
        "deviceModel": "Stetho-2",
        "acquiredAt": "2024-01-15T10:50:00Z",
        "calibrationPassed": true,
        "qualityMeasurements": [
            { "hasMetric": "faud:Quality_SNR_dB", "value": 28.0 },
            { "hasMetric": "faud:Quality_NoiseFloor_dBFS", "value": -48.0 },
            { "hasMetric": "faud:Quality_ArtifactScore", "value": 0.1 }
        ]
    })
}
