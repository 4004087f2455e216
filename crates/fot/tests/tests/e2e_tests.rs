#[path = "e2e/empty_case.rs"]
mod empty_case;

#[path = "e2e/modality_gates.rs"]
mod modality_gates;

#[path = "e2e/confirmatory_collapse.rs"]
mod confirmatory_collapse;

#[path = "e2e/case_pipeline.rs"]
mod case_pipeline;
