//! The strategy contract.
//!
//! A [`Policy`] sees one [`Observation`] per turn and answers with a command
//! mapping. It is reset once per match with the pre-match observation. The
//! engine queries both sides before applying either command, so a policy
//! cannot observe anything its opponent decided this turn.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::Value;

use crate::error::PolicyError;
use crate::game::Observation;

/// A strategy playing one side of a match.
pub trait Policy {
    /// Short name used in traces and reports.
    fn name(&self) -> &str;

    /// Called once before turn 1 with the starting observation.
    fn reset(&mut self, _initial: &Observation) {}

    /// Decide this turn's command.
    ///
    /// The answer must be a JSON object; see
    /// [`Command::parse`](crate::game::Command::parse) for the keys read.
    ///
    /// # Errors
    ///
    /// Any error makes the side play the empty command for this turn.
    fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError>;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn reset(&mut self, initial: &Observation) {
        (**self).reset(initial);
    }

    fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
        (**self).step(observation)
    }
}

/// Run [`Policy::reset`], turning a panic into an error.
pub(crate) fn guarded_reset(
    policy: &mut dyn Policy,
    initial: &Observation,
) -> Result<(), PolicyError> {
    catch_unwind(AssertUnwindSafe(|| policy.reset(initial)))
        .map_err(|payload| PolicyError::Panicked(panic_message(payload.as_ref())))
}

/// Run [`Policy::step`], turning a panic into an error.
pub(crate) fn guarded_step(
    policy: &mut dyn Policy,
    observation: &Observation,
) -> Result<Value, PolicyError> {
    catch_unwind(AssertUnwindSafe(|| policy.step(observation)))
        .unwrap_or_else(|payload| Err(PolicyError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::game::AgentState;
    use serde_json::json;

    struct Panicky;

    impl Policy for Panicky {
        fn name(&self) -> &str {
            "panicky"
        }

        fn reset(&mut self, _initial: &Observation) {
            panic!("reset blew up");
        }

        fn step(&mut self, _observation: &Observation) -> Result<Value, PolicyError> {
            panic!("step blew up {}", 7);
        }
    }

    struct Echo;

    impl Policy for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn step(&mut self, observation: &Observation) -> Result<Value, PolicyError> {
            Ok(json!({"expand": observation.turn}))
        }
    }

    fn observation() -> Observation {
        let settings = GameSettings::default();
        let agent = AgentState::new(&settings);
        Observation::build(&agent, &agent, 40, 1, &settings)
    }

    #[test]
    fn test_guarded_step_passes_answer_through() {
        let mut policy = Echo;
        let answer = guarded_step(&mut policy, &observation()).unwrap();
        assert_eq!(answer, json!({"expand": 1}));
    }

    #[test]
    fn test_guarded_step_catches_panic() {
        let mut policy = Panicky;
        let err = guarded_step(&mut policy, &observation()).unwrap_err();
        assert_eq!(err, PolicyError::Panicked("step blew up 7".to_string()));
    }

    #[test]
    fn test_guarded_reset_catches_panic() {
        let mut policy = Panicky;
        let err = guarded_reset(&mut policy, &observation()).unwrap_err();
        assert_eq!(err, PolicyError::Panicked("reset blew up".to_string()));
    }

    #[test]
    fn test_boxed_policy_delegates() {
        let mut policy: Box<dyn Policy> = Box::new(Echo);
        assert_eq!(policy.name(), "echo");
        assert!(policy.step(&observation()).is_ok());
    }
}
