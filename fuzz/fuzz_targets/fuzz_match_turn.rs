#![no_main]

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{json, Value};
use territory_duel::game::check_invariants;
use territory_duel::{Engine, GameSettings, Observation, Phase, Policy, PolicyError};

/// One raw answer a fuzzed strategy can give.
///
/// No panicking variant: the fuzzer's panic hook aborts before the engine
/// can catch the unwind.
#[derive(Arbitrary, Debug, Clone)]
enum Answer {
    Command {
        expand: i64,
        spend_attack: i64,
        spend_defense: i64,
        sell_attack: i64,
        sell_defense: i64,
        scout: bool,
    },
    Float(f64),
    Text(String),
    Fail,
}

impl Answer {
    fn to_value(&self) -> Result<Value, PolicyError> {
        match self {
            Self::Command {
                expand,
                spend_attack,
                spend_defense,
                sell_attack,
                sell_defense,
                scout,
            } => Ok(json!({
                "expand": expand % 1_000,
                "spend_attack": spend_attack,
                "spend_defense": spend_defense,
                "sell_attack": sell_attack,
                "sell_defense": sell_defense,
                "scout": scout,
            })),
            Self::Float(f) => Ok(json!({ "expand": f, "spend_defense": f })),
            Self::Text(s) => Ok(json!({ "expand": s, "note": s })),
            Self::Fail => Err(PolicyError::failed("fuzzed failure")),
        }
    }
}

/// Strategy replaying fuzzer-chosen answers, then idling.
struct Replay(VecDeque<Answer>);

impl Policy for Replay {
    fn name(&self) -> &str {
        "replay"
    }

    fn step(&mut self, _observation: &Observation) -> Result<Value, PolicyError> {
        match self.0.pop_front() {
            Some(answer) => answer.to_value(),
            None => Ok(json!({})),
        }
    }
}

#[derive(Arbitrary, Debug)]
struct MatchInput {
    max_turns: u8,
    p1: Vec<Answer>,
    p2: Vec<Answer>,
}

fuzz_target!(|input: MatchInput| {
    let settings = GameSettings::default().with_max_turns(u32::from(input.max_turns % 64));
    let total = 2 * u64::from(settings.start_territory) + u64::from(settings.neutral_territory);

    let mut engine = Engine::new(
        Box::new(Replay(input.p1.into_iter().collect())),
        Box::new(Replay(input.p2.into_iter().collect())),
        settings,
    );
    let result = engine.run();

    assert_eq!(engine.phase(), Phase::Finished);
    assert!(result.winner.is_some());
    assert!(result.turns_played <= settings.max_turns);
    let violations = check_invariants(engine.state(), total);
    assert!(violations.is_empty(), "invariants violated: {violations:?}");
});
