//! Feature execution.
//!
//! # Responsibilities
//! - Create a fresh [`ScenarioContext`] per scenario
//! - Run background steps, then the scenario's own steps, in order
//! - Stop a scenario at its first failing step; later steps are skipped
//! - Keep running the remaining scenarios

use std::fmt;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::EndpointOverrides;
use crate::http::{Dispatcher, Transport};
use crate::observability::metrics;
use crate::scenario::context::ScenarioContext;
use crate::scenario::feature::{Feature, Keyword, Scenario, StepLine};
use crate::scenario::steps::{Step, StepEnv};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Passed,
    Failed(String),
    Skipped,
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub keyword: Keyword,
    pub text: String,
    pub line: usize,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub id: Uuid,
    pub name: String,
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.outcome == StepOutcome::Passed)
    }

    /// The first failure message, if any.
    pub fn failure(&self) -> Option<&str> {
        self.steps.iter().find_map(|s| match &s.outcome {
            StepOutcome::Failed(message) => Some(message.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FeatureReport {
    pub name: String,
    pub scenarios: Vec<ScenarioReport>,
}

impl FeatureReport {
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn scenario(&self, name: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}

impl fmt::Display for FeatureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Feature: {}", self.name)?;
        for scenario in &self.scenarios {
            let mark = if scenario.passed() { "ok" } else { "FAILED" };
            writeln!(f, "  Scenario: {} ... {}", scenario.name, mark)?;
            for step in &scenario.steps {
                match &step.outcome {
                    StepOutcome::Passed => {}
                    StepOutcome::Failed(message) => writeln!(
                        f,
                        "    line {}: {} {}\n      {}",
                        step.line, step.keyword, step.text, message
                    )?,
                    StepOutcome::Skipped => {
                        writeln!(f, "    skipped: {} {}", step.keyword, step.text)?
                    }
                }
            }
        }
        write!(
            f,
            "{} scenarios ({} passed, {} failed)",
            self.scenarios.len(),
            self.passed(),
            self.failed()
        )
    }
}

/// Runs parsed features against a dispatcher.
pub struct FeatureRunner<T> {
    dispatcher: Dispatcher<T>,
    overrides: EndpointOverrides,
}

impl<T: Transport> FeatureRunner<T> {
    pub fn new(dispatcher: Dispatcher<T>, overrides: EndpointOverrides) -> Self {
        Self {
            dispatcher,
            overrides,
        }
    }

    pub async fn run_feature(&self, feature: &Feature) -> FeatureReport {
        tracing::info!(feature = %feature.name, scenarios = feature.scenarios.len(), "Running feature");

        let mut scenarios = Vec::with_capacity(feature.scenarios.len());
        for scenario in &feature.scenarios {
            scenarios.push(self.run_scenario(scenario, &feature.background).await);
        }

        FeatureReport {
            name: feature.name.clone(),
            scenarios,
        }
    }

    pub async fn run_scenario(&self, scenario: &Scenario, background: &[StepLine]) -> ScenarioReport {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("scenario", %id, name = %scenario.name);

        async {
            let env = StepEnv {
                dispatcher: &self.dispatcher,
                overrides: &self.overrides,
            };
            let mut ctx = ScenarioContext::new();
            let mut failed = false;
            let mut steps = Vec::with_capacity(background.len() + scenario.steps.len());

            for line in background.iter().chain(&scenario.steps) {
                let outcome = if failed {
                    StepOutcome::Skipped
                } else {
                    match run_step(line, &mut ctx, &env).await {
                        Ok(()) => StepOutcome::Passed,
                        Err(message) => {
                            tracing::warn!(line = line.line, step = %line.text, error = %message, "Step failed");
                            failed = true;
                            StepOutcome::Failed(message)
                        }
                    }
                };
                steps.push(StepReport {
                    keyword: line.keyword,
                    text: line.text.clone(),
                    line: line.line,
                    outcome,
                });
            }

            metrics::record_scenario(!failed);
            tracing::info!(passed = !failed, "Scenario finished");

            ScenarioReport {
                id,
                name: scenario.name.clone(),
                steps,
            }
        }
        .instrument(span)
        .await
    }
}

async fn run_step<T: Transport>(
    line: &StepLine,
    ctx: &mut ScenarioContext,
    env: &StepEnv<'_, T>,
) -> Result<(), String> {
    let step = line.text.parse::<Step>().map_err(|e| e.to_string())?;
    step.execute(ctx, env).await.map_err(|e| e.to_string())
}
