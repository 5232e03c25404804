//! File-driven scenario tests
//!
//! Each scenario file holds one record per line and ends with an `R` line
//! naming the expected final `(all, bids, asks)` counts:
//!
//! ```text
//! A <type> <id> <side> <price> <qty>    add    (type: GTC FAK FOK GFD M)
//! M <id> <price> <qty>                  modify (side: B S)
//! C <id>                                cancel
//! R <allCount> <bidCount> <askCount>    expected final sizes
//! ```
//!
//! The replay drives the public facade only; parse failures are harness
//! errors and never reach the engine.

use std::fs;
use std::path::PathBuf;

use matching_engine::MatchingEngine;
use thiserror::Error;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderModify, OrderType, Side};

#[derive(Debug, Error)]
enum ScenarioError {
    #[error("unknown order type: {0}")]
    UnknownOrderType(String),

    #[error("unknown side: {0}")]
    UnknownSide(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("result must be the last line of the file")]
    MisplacedResult,

    #[error("no result specified")]
    MissingResult,
}

#[derive(Debug)]
enum Record {
    Add(Order),
    Modify(OrderModify),
    Cancel(OrderId),
}

#[derive(Debug, PartialEq, Eq)]
struct Expected {
    all: usize,
    bids: usize,
    asks: usize,
}

fn parse_order_type(token: &str) -> Result<OrderType, ScenarioError> {
    match token {
        "GTC" => Ok(OrderType::GoodTillCancel),
        "FAK" => Ok(OrderType::FillAndKill),
        "FOK" => Ok(OrderType::FillOrKill),
        "GFD" => Ok(OrderType::GoodForDay),
        "M" => Ok(OrderType::Market),
        other => Err(ScenarioError::UnknownOrderType(other.to_string())),
    }
}

fn parse_side(token: &str) -> Result<Side, ScenarioError> {
    match token {
        "B" => Ok(Side::Buy),
        "S" => Ok(Side::Sell),
        other => Err(ScenarioError::UnknownSide(other.to_string())),
    }
}

fn parse_u64(token: &str) -> Result<u64, ScenarioError> {
    token
        .parse()
        .map_err(|_| ScenarioError::InvalidNumber(token.to_string()))
}

fn parse_i64(token: &str) -> Result<i64, ScenarioError> {
    token
        .parse()
        .map_err(|_| ScenarioError::InvalidNumber(token.to_string()))
}

fn parse_record(line: &str) -> Result<Record, ScenarioError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let malformed = || ScenarioError::Malformed(line.to_string());

    match fields.first().copied() {
        Some("A") => {
            if fields.len() != 6 {
                return Err(malformed());
            }
            let order_type = parse_order_type(fields[1])?;
            let order_id = OrderId::new(parse_u64(fields[2])?);
            let side = parse_side(fields[3])?;
            let quantity = Quantity::new(parse_u64(fields[5])?);
            let order = match order_type {
                // The price field of a Market record is a placeholder.
                OrderType::Market => Order::market(order_id, side, quantity),
                _ => Order::new(
                    order_type,
                    order_id,
                    side,
                    Price::new(parse_i64(fields[4])?),
                    quantity,
                ),
            };
            Ok(Record::Add(order))
        }
        Some("M") => {
            if fields.len() != 4 {
                return Err(malformed());
            }
            Ok(Record::Modify(OrderModify::new(
                OrderId::new(parse_u64(fields[1])?),
                Price::new(parse_i64(fields[2])?),
                Quantity::new(parse_u64(fields[3])?),
            )))
        }
        Some("C") => {
            if fields.len() != 2 {
                return Err(malformed());
            }
            Ok(Record::Cancel(OrderId::new(parse_u64(fields[1])?)))
        }
        _ => Err(malformed()),
    }
}

fn parse_expected(line: &str) -> Result<Expected, ScenarioError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 4 || fields[0] != "R" {
        return Err(ScenarioError::Malformed(line.to_string()));
    }
    Ok(Expected {
        all: parse_u64(fields[1])? as usize,
        bids: parse_u64(fields[2])? as usize,
        asks: parse_u64(fields[3])? as usize,
    })
}

fn parse_scenario(text: &str) -> Result<(Vec<Record>, Expected), ScenarioError> {
    let mut records = Vec::new();
    let mut expected = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if expected.is_some() {
            return Err(ScenarioError::MisplacedResult);
        }
        if line.starts_with('R') {
            expected = Some(parse_expected(line)?);
        } else {
            records.push(parse_record(line)?);
        }
    }

    let expected = expected.ok_or(ScenarioError::MissingResult)?;
    Ok((records, expected))
}

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn run_scenario(name: &str) {
    let text = fs::read_to_string(scenario_path(name))
        .unwrap_or_else(|err| panic!("cannot read scenario {name}: {err}"));
    let (records, expected) = parse_scenario(&text)
        .unwrap_or_else(|err| panic!("cannot parse scenario {name}: {err}"));

    let engine = MatchingEngine::new();
    for record in records {
        match record {
            Record::Add(order) => {
                engine.add_order(order).unwrap();
            }
            Record::Modify(modify) => {
                engine.modify_order(modify).unwrap();
            }
            Record::Cancel(order_id) => engine.cancel_order(order_id),
        }
    }

    let snapshot = engine.order_infos();
    assert_eq!(engine.size(), expected.all, "{name}: live order count");
    assert_eq!(snapshot.bids.len(), expected.bids, "{name}: bid level count");
    assert_eq!(snapshot.asks.len(), expected.asks, "{name}: ask level count");
}

#[test]
fn match_good_till_cancel() {
    run_scenario("match_good_till_cancel.txt");
}

#[test]
fn match_fill_and_kill() {
    run_scenario("match_fill_and_kill.txt");
}

#[test]
fn match_fill_or_kill_hit() {
    run_scenario("match_fill_or_kill_hit.txt");
}

#[test]
fn match_fill_or_kill_miss() {
    run_scenario("match_fill_or_kill_miss.txt");
}

#[test]
fn cancel_success() {
    run_scenario("cancel_success.txt");
}

#[test]
fn modify_price() {
    run_scenario("modify_price.txt");
}

#[test]
fn match_market() {
    run_scenario("match_market.txt");
}

#[test]
fn add_duplicate_id() {
    run_scenario("add_duplicate_id.txt");
}

#[test]
fn cancel_unknown_id() {
    run_scenario("cancel_unknown_id.txt");
}

#[test]
fn partial_fill_rests() {
    run_scenario("partial_fill_rests.txt");
}

#[test]
fn parser_rejects_unknown_order_type() {
    let err = parse_scenario("A XXX 1 B 100 10\nR 0 0 0").unwrap_err();
    assert!(matches!(err, ScenarioError::UnknownOrderType(_)));
}

#[test]
fn parser_rejects_unknown_side() {
    let err = parse_scenario("A GTC 1 X 100 10\nR 0 0 0").unwrap_err();
    assert!(matches!(err, ScenarioError::UnknownSide(_)));
}

#[test]
fn parser_rejects_missing_result() {
    let err = parse_scenario("A GTC 1 B 100 10\n").unwrap_err();
    assert!(matches!(err, ScenarioError::MissingResult));
}

#[test]
fn parser_rejects_records_after_result() {
    let err = parse_scenario("R 0 0 0\nA GTC 1 B 100 10").unwrap_err();
    assert!(matches!(err, ScenarioError::MisplacedResult));
}
