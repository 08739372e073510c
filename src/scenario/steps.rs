//! Step vocabulary: text → [`Step`] → effect on a [`ScenarioContext`].
//!
//! # Design Decisions
//! - Patterns are anchored regexes; `"..."` captures a string argument and
//!   a bare integer captures a number
//! - Keywords (Given/When/Then/And/But) are stripped before matching, so
//!   any keyword can introduce any step
//! - Binding happens when the step runs, so an undefined step fails its
//!   scenario instead of the whole feature

use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::assertions::{self, AssertionError};
use crate::config::EndpointOverrides;
use crate::http::{DispatchError, Dispatcher, Transport};
use crate::scenario::context::ScenarioContext;

/// A bound step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    SetEndpoint(String),
    SetParameter { key: String, value: String },
    Prepare,
    ExpectValid,
    ExpectInvalid,
    ExpectParameter(String),
    Send,
    ExpectStatus(u16),
    ExpectJsonContentType,
    ExpectProperty(String),
    ExpectPropertyValue { property: String, value: String },
    ExpectPropertyNumber(String),
    ExpectPropertyNumberOrNull(String),
    ExpectArrayLength(usize),
    ExpectFirstItemProperty(String),
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("Undefined step: {0}")]
    Undefined(String),

    #[error("Invalid argument '{value}' in step: {step}")]
    InvalidArgument { step: String, value: String },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Assertion(#[from] AssertionError),
}

type Binder = fn(&Captures<'_>, &str) -> Result<Step, StepError>;

struct StepPattern {
    regex: Regex,
    bind: Binder,
}

const STRING: &str = r#""([^"]*)""#;
const INT: &str = r"(\d+)";

fn pattern(template: &str, bind: Binder) -> StepPattern {
    let source = format!(
        "^{}$",
        template.replace("{string}", STRING).replace("{int}", INT)
    );
    StepPattern {
        regex: Regex::new(&source).expect("step pattern is a valid regex"),
        bind,
    }
}

fn text(caps: &Captures<'_>, idx: usize) -> String {
    caps.get(idx)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn number<N: FromStr>(caps: &Captures<'_>, idx: usize, step: &str) -> Result<N, StepError> {
    let raw = text(caps, idx);
    raw.parse().map_err(|_| StepError::InvalidArgument {
        step: step.to_string(),
        value: raw,
    })
}

static PATTERNS: LazyLock<Vec<StepPattern>> = LazyLock::new(|| {
    vec![
        pattern("the API endpoint is {string}", |c, _| {
            Ok(Step::SetEndpoint(text(c, 1)))
        }),
        pattern("the query parameter {string} is set to {string}", |c, _| {
            Ok(Step::SetParameter {
                key: text(c, 1),
                value: text(c, 2),
            })
        }),
        pattern("I prepare the request", |_, _| Ok(Step::Prepare)),
        pattern("the request should be valid", |_, _| Ok(Step::ExpectValid)),
        pattern("the request should be invalid", |_, _| Ok(Step::ExpectInvalid)),
        pattern("the request should contain the query parameter {string}", |c, _| {
            Ok(Step::ExpectParameter(text(c, 1)))
        }),
        pattern("I send the request", |_, _| Ok(Step::Send)),
        pattern("the response status code should be {int}", |c, s| {
            Ok(Step::ExpectStatus(number(c, 1, s)?))
        }),
        pattern("the response should have a JSON content type", |_, _| {
            Ok(Step::ExpectJsonContentType)
        }),
        pattern("the response body should contain the {string} property", |c, _| {
            Ok(Step::ExpectProperty(text(c, 1)))
        }),
        pattern(
            "the response body should contain the {string} property with value {string}",
            |c, _| {
                Ok(Step::ExpectPropertyValue {
                    property: text(c, 1),
                    value: text(c, 2),
                })
            },
        ),
        pattern("the response body should contain the {string} property as number", |c, _| {
            Ok(Step::ExpectPropertyNumber(text(c, 1)))
        }),
        pattern(
            "the response body should contain the {string} property as number or null",
            |c, _| Ok(Step::ExpectPropertyNumberOrNull(text(c, 1))),
        ),
        pattern("the response body should be an array with length {int}", |c, s| {
            Ok(Step::ExpectArrayLength(number(c, 1, s)?))
        }),
        pattern("the first item should contain the {string} property", |c, _| {
            Ok(Step::ExpectFirstItemProperty(text(c, 1)))
        }),
    ]
});

impl FromStr for Step {
    type Err = StepError;

    fn from_str(step: &str) -> Result<Self, Self::Err> {
        let step = step.trim();
        PATTERNS
            .iter()
            .find_map(|p| p.regex.captures(step).map(|caps| (p.bind)(&caps, step)))
            .unwrap_or_else(|| Err(StepError::Undefined(step.to_string())))
    }
}

/// What steps need besides the context: the dispatcher and the endpoint
/// rewrites.
pub struct StepEnv<'a, T> {
    pub dispatcher: &'a Dispatcher<T>,
    pub overrides: &'a EndpointOverrides,
}

impl Step {
    /// Apply this step to `ctx`.
    pub async fn execute<T: Transport>(
        &self,
        ctx: &mut ScenarioContext,
        env: &StepEnv<'_, T>,
    ) -> Result<(), StepError> {
        match self {
            Step::SetEndpoint(endpoint) => {
                let resolved = env.overrides.resolve(endpoint);
                if resolved != *endpoint {
                    tracing::debug!(from = %endpoint, to = %resolved, "Endpoint overridden");
                }
                ctx.set_endpoint(resolved);
            }
            Step::SetParameter { key, value } => ctx.set_parameter(key.as_str(), value.as_str()),
            Step::Prepare => {
                ctx.prepare();
            }
            Step::ExpectValid => ctx.expect_valid()?,
            Step::ExpectInvalid => ctx.expect_invalid()?,
            Step::ExpectParameter(key) => ctx.expect_parameter(key)?,
            Step::Send => {
                ctx.send(env.dispatcher).await?;
            }
            Step::ExpectStatus(code) => ctx.expect_status(*code)?,
            Step::ExpectJsonContentType => assertions::has_json_content_type(ctx.response()?)?,
            Step::ExpectProperty(name) => assertions::has_property(ctx.response()?, name)?,
            Step::ExpectPropertyValue { property, value } => {
                assertions::property_equals(ctx.response()?, property, value)?
            }
            Step::ExpectPropertyNumber(name) => {
                assertions::property_is_number(ctx.response()?, name)?
            }
            Step::ExpectPropertyNumberOrNull(name) => {
                assertions::property_is_number_or_null(ctx.response()?, name)?
            }
            Step::ExpectArrayLength(len) => assertions::array_length_is(ctx.response()?, *len)?,
            Step::ExpectFirstItemProperty(name) => {
                assertions::first_item_has_property(ctx.response()?, name)?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureTransport;
    use crate::resilience::RetryPolicy;

    fn bind(text: &str) -> Step {
        text.parse().unwrap()
    }

    #[test]
    fn test_binds_string_arguments() {
        assert_eq!(
            bind(r#"the API endpoint is "https://api.agify.io""#),
            Step::SetEndpoint("https://api.agify.io".into())
        );
        assert_eq!(
            bind(r#"the query parameter "name[]" is set to "edzelle""#),
            Step::SetParameter {
                key: "name[]".into(),
                value: "edzelle".into()
            }
        );
        assert_eq!(
            bind(r#"the query parameter "name" is set to """#),
            Step::SetParameter {
                key: "name".into(),
                value: String::new()
            }
        );
    }

    #[test]
    fn test_property_variants_are_distinct() {
        assert_eq!(
            bind(r#"the response body should contain the "age" property"#),
            Step::ExpectProperty("age".into())
        );
        assert_eq!(
            bind(r#"the response body should contain the "count" property with value "0""#),
            Step::ExpectPropertyValue {
                property: "count".into(),
                value: "0".into()
            }
        );
        assert_eq!(
            bind(r#"the response body should contain the "age" property as number"#),
            Step::ExpectPropertyNumber("age".into())
        );
        assert_eq!(
            bind(r#"the response body should contain the "age" property as number or null"#),
            Step::ExpectPropertyNumberOrNull("age".into())
        );
    }

    #[test]
    fn test_binds_integers() {
        assert_eq!(bind("the response status code should be 200"), Step::ExpectStatus(200));
        assert_eq!(
            bind("the response body should be an array with length 2"),
            Step::ExpectArrayLength(2)
        );
        assert!(matches!(
            "the response status code should be 99999".parse::<Step>(),
            Err(StepError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_undefined_step() {
        let err = "I wait for the moon".parse::<Step>().unwrap_err();
        assert_eq!(err.to_string(), "Undefined step: I wait for the moon");
    }

    #[tokio::test]
    async fn test_endpoint_override_applies_on_set() {
        let dispatcher = Dispatcher::new(FixtureTransport::default(), RetryPolicy::default());
        let mut overrides = EndpointOverrides::new();
        overrides.insert("https://api.agify.io", "http://fixture");
        let env = StepEnv {
            dispatcher: &dispatcher,
            overrides: &overrides,
        };

        let mut ctx = ScenarioContext::new();
        for line in [
            r#"the API endpoint is "https://api.agify.io""#,
            r#"the query parameter "name" is set to "edzelle""#,
            "I send the request",
            "the response status code should be 200",
            r#"the response body should contain the "age" property with value "44""#,
        ] {
            bind(line).execute(&mut ctx, &env).await.unwrap();
        }
        assert_eq!(ctx.endpoint(), "http://fixture");
    }

    #[tokio::test]
    async fn test_assertion_before_send_reports_no_response() {
        let dispatcher = Dispatcher::new(FixtureTransport::default(), RetryPolicy::default());
        let overrides = EndpointOverrides::new();
        let env = StepEnv {
            dispatcher: &dispatcher,
            overrides: &overrides,
        };

        let err = Step::ExpectJsonContentType
            .execute(&mut ScenarioContext::new(), &env)
            .await
            .unwrap_err();
        assert!(matches!(err, StepError::Assertion(AssertionError::NoResponse)));
    }
}
