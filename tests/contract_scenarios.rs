//! Runs the shipped feature file against the fixture server over real sockets.

use std::path::Path;

use agify_contract::scenario::StepOutcome;
use agify_contract::{Dispatcher, Feature, FeatureRunner};

mod common;

const FEATURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/features/agify.feature");

#[tokio::test]
async fn test_feature_file_passes_against_fixtures() {
    let fixtures = common::start_fixtures().await;
    let config = common::config_for(&fixtures.base_url());

    let feature = Feature::from_file(Path::new(FEATURE)).unwrap();
    let runner = FeatureRunner::new(Dispatcher::from_config(&config).unwrap(), config.endpoints.clone());
    let report = runner.run_feature(&feature).await;

    assert!(report.all_passed(), "{}", report);
    assert_eq!(report.scenarios.len(), feature.scenarios.len());
    // Six scenarios only prepare; the rest hit the server once each.
    assert_eq!(fixtures.state().hits(), 4);

    fixtures.shutdown().await;
}

#[tokio::test]
async fn test_wrong_status_expectation_reports_mismatch() {
    let fixtures = common::start_fixtures().await;
    let config = common::config_for(&fixtures.base_url());

    let feature = Feature::parse(
        r#"
Feature: mismatch
  Scenario: unmatched query expected to succeed
    Given the API endpoint is "https://api.agify.io"
    And the query parameter "country_id" is set to "US"
    When I send the request
    Then the response status code should be 200
    And the response should have a JSON content type
"#,
    )
    .unwrap();

    let runner = FeatureRunner::new(Dispatcher::from_config(&config).unwrap(), config.endpoints.clone());
    let report = runner.run_feature(&feature).await;

    let scenario = &report.scenarios[0];
    assert!(!scenario.passed());
    assert_eq!(scenario.failure(), Some("Expected status 200 but got 404"));
    assert_eq!(scenario.steps[4].outcome, StepOutcome::Skipped);
    assert!(report.to_string().contains("1 scenarios (0 passed, 1 failed)"));

    fixtures.shutdown().await;
}

#[tokio::test]
async fn test_unset_endpoint_fails_before_any_request() {
    let fixtures = common::start_fixtures().await;
    let config = common::config_for(&fixtures.base_url());

    let feature = Feature::parse(
        r#"
Feature: no endpoint
  Scenario: send without endpoint
    Given the query parameter "name" is set to "edzelle"
    When I send the request
"#,
    )
    .unwrap();

    let runner = FeatureRunner::new(Dispatcher::from_config(&config).unwrap(), config.endpoints.clone());
    let report = runner.run_feature(&feature).await;

    assert_eq!(report.scenarios[0].failure(), Some("Endpoint is not set"));
    assert_eq!(fixtures.state().hits(), 0);

    fixtures.shutdown().await;
}
