// crates/order-ahead-protocol/src/csv_codec.rs

//! Line-based scenario codec.
//!
//! Used to replay a sequence of queue events and compare the queue's
//! reactions against a recorded expectation.
//!
//! Input format (lines → [`ScenarioCommand`]):
//!
//! - Live-admit one order:
//!   `A, transactionOid, userOid, purchaseDate, eta(minutes)`
//! - Tick at a timestamp:
//!   `T, now`
//! - Remove (clear) an order:
//!   `R, transactionOid, userOid`
//! - Mark an order as processing:
//!   `P, transactionOid, userOid`
//! - Dump the working set:
//!   `D`
//!
//! Output format (queue reactions → line):
//!
//! - Expiry notification fired:
//!   `E, transactionOid, userOid`
//! - Unexpired order on dump:
//!   `O, transactionOid, userOid, m:ss`
//! - Expired order on dump:
//!   `X, transactionOid, userOid`
//!
//! Timestamps accept anything `purchase_date::parse` does.

use chrono::{DateTime, Utc};
use order_ahead_core::{purchase_date, Order, OrderKey, RawOrder};

use crate::error::ProtocolError;

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioCommand {
    Admit(RawOrder),
    Tick(DateTime<Utc>),
    Remove(OrderKey),
    Process(OrderKey),
    Dump,
}

/// Parse a single scenario line.
///
/// Returns `Ok(None)` for blank lines or comments (starting with `#`).
pub fn parse_scenario_line(line: &str) -> Result<Option<ScenarioCommand>, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = split_and_trim(trimmed, ',');
    let command = tokens[0].chars().next().unwrap_or('\0');
    if tokens[0].len() != 1 {
        return Err(ProtocolError::UnknownCommand(tokens[0].clone()));
    }

    let parsed = match command {
        'A' => {
            expect_arity(command, &tokens, 5)?;
            let purchased = parse_timestamp(&tokens[3])?;
            let eta = tokens[4]
                .parse::<i64>()
                .map_err(|_| ProtocolError::InvalidField("eta"))?;
            ScenarioCommand::Admit(RawOrder::new(
                tokens[1].clone(),
                tokens[2].clone(),
                purchased,
                eta,
            ))
        }
        'T' => {
            expect_arity(command, &tokens, 2)?;
            ScenarioCommand::Tick(parse_timestamp(&tokens[1])?)
        }
        'R' => {
            expect_arity(command, &tokens, 3)?;
            ScenarioCommand::Remove(OrderKey::new(tokens[1].clone(), tokens[2].clone()))
        }
        'P' => {
            expect_arity(command, &tokens, 3)?;
            ScenarioCommand::Process(OrderKey::new(tokens[1].clone(), tokens[2].clone()))
        }
        'D' => {
            expect_arity(command, &tokens, 1)?;
            ScenarioCommand::Dump
        }
        _ => return Err(ProtocolError::UnknownCommand(tokens[0].clone())),
    };

    Ok(Some(parsed))
}

/// Format an expiry notification line.
pub fn format_expired(key: &OrderKey) -> String {
    format!("E, {}, {}", key.transaction_oid, key.user_oid)
}

/// Format one order of a working-set dump.
pub fn format_order(order: &Order) -> String {
    if order.is_expired {
        format!("X, {}, {}", order.key.transaction_oid, order.key.user_oid)
    } else {
        format!(
            "O, {}, {}, {}",
            order.key.transaction_oid,
            order.key.user_oid,
            order.countdown()
        )
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn split_and_trim(s: &str, delim: char) -> Vec<String> {
    s.split(delim).map(|t| t.trim().to_string()).collect()
}

fn expect_arity(command: char, tokens: &[String], expected: usize) -> Result<(), ProtocolError> {
    if tokens.len() != expected {
        return Err(ProtocolError::WrongArity {
            command,
            expected,
            got: tokens.len(),
        });
    }
    Ok(())
}

fn parse_timestamp(token: &str) -> Result<DateTime<Utc>, ProtocolError> {
    purchase_date::parse(token).map_err(|_| ProtocolError::InvalidField("timestamp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_admit() {
        let cmd = parse_scenario_line("A, t1, u1, 2024-03-01 12:00:00, 5")
            .unwrap()
            .unwrap();
        let expected = RawOrder::new(
            "t1",
            "u1",
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            5,
        );
        assert_eq!(cmd, ScenarioCommand::Admit(expected));
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        assert!(parse_scenario_line("   ").unwrap().is_none());
        assert!(parse_scenario_line("#name: warmup").unwrap().is_none());
    }

    #[test]
    fn wrong_arity_is_reported() {
        let err = parse_scenario_line("R, t1").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::WrongArity { command: 'R', expected: 3, got: 2 }
        ));
    }

    #[test]
    fn unknown_command() {
        assert!(matches!(
            parse_scenario_line("Z, 1"),
            Err(ProtocolError::UnknownCommand(_))
        ));
        assert!(matches!(
            parse_scenario_line("AA, 1"),
            Err(ProtocolError::UnknownCommand(_))
        ));
    }

    #[test]
    fn bad_eta() {
        assert!(matches!(
            parse_scenario_line("A, t1, u1, 2024-03-01 12:00:00, soon"),
            Err(ProtocolError::InvalidField("eta"))
        ));
    }

    #[test]
    fn format_lines() {
        let raw = RawOrder::new(
            "t1",
            "u1",
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            5,
        );
        let mut order = Order::from_raw(raw);
        assert_eq!(format_order(&order), "O, t1, u1, 5:00");
        order.is_expired = true;
        assert_eq!(format_order(&order), "X, t1, u1");
        assert_eq!(format_expired(&order.key), "E, t1, u1");
    }
}
