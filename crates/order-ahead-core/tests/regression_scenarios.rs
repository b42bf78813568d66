// crates/order-ahead-core/tests/regression_scenarios.rs
use chrono::{DateTime, Utc};
use order_ahead_core::OrderQueue;
use order_ahead_protocol::csv_codec::{
    format_expired, format_order, parse_scenario_line, ScenarioCommand,
};

const INPUT: &str = include_str!("data/scenarios.csv");
const EXPECTED: &str = include_str!("data/expected_output.csv");

/// Replays one scenario's commands against a fresh queue.
///
/// Admissions happen at the last tick's timestamp, or at the purchase time
/// when no tick has been seen yet.
fn replay(lines: &[&str]) -> Vec<String> {
    let mut queue = OrderQueue::new();
    let mut now: Option<DateTime<Utc>> = None;
    let mut outputs = Vec::new();

    for line in lines {
        let cmd = parse_scenario_line(line)
            .unwrap_or_else(|e| panic!("bad scenario line {line:?}: {e}"));
        let Some(cmd) = cmd else { continue };

        match cmd {
            ScenarioCommand::Admit(raw) => {
                let at = now.unwrap_or(raw.purchase_date);
                for key in queue.append(raw, at) {
                    outputs.push(format_expired(&key));
                }
            }
            ScenarioCommand::Tick(at) => {
                now = Some(at);
                for key in queue.tick(at) {
                    outputs.push(format_expired(&key));
                }
            }
            ScenarioCommand::Remove(key) => {
                queue.remove(&key);
            }
            ScenarioCommand::Process(key) => {
                queue.mark_processing(&key);
            }
            ScenarioCommand::Dump => {
                outputs.extend(queue.orders().iter().map(format_order));
            }
        }
    }

    outputs
}

fn split_scenarios(input: &str) -> Vec<(String, Vec<&str>)> {
    let mut scenarios: Vec<(String, Vec<&str>)> = Vec::new();
    for line in input.lines() {
        if let Some(name) = line.strip_prefix("#name:") {
            scenarios.push((name.trim().to_string(), Vec::new()));
        } else if let Some((_, lines)) = scenarios.last_mut() {
            lines.push(line);
        }
    }
    scenarios
}

#[test]
fn full_input_matches_reference_output() {
    let actual: Vec<String> = split_scenarios(INPUT)
        .iter()
        .flat_map(|(_, lines)| replay(lines))
        .collect();

    let expected: Vec<&str> = EXPECTED
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    assert_eq!(actual, expected);
}

#[test]
fn every_scenario_reports_each_expiry_once() {
    for (name, lines) in split_scenarios(INPUT) {
        let outputs = replay(&lines);
        let mut expiries: Vec<&String> = outputs.iter().filter(|l| l.starts_with("E,")).collect();
        let total = expiries.len();
        expiries.sort();
        expiries.dedup();
        assert_eq!(expiries.len(), total, "duplicate expiry in scenario {name}");
    }
}
