//! `/split` - divide a court bill evenly across players.
//!
//! Amounts are handled in whole currency units for display but split in
//! cents, so shares always sum exactly to the total.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::domain::command::{
    CommandDefinition, CommandHandler, FieldMap, ParsedArguments, UsageError,
};
use crate::domain::foundation::{ChannelContext, DomainError};
use crate::domain::scheduling::split_evenly;
use crate::domain::wizard::{FieldValue, StepDefinition, StepValidationError};
use crate::ports::{ChatChannel, OutboundMessage};

use super::required_u64;

const USAGE: &str = "usage: /split <total> <players>";

/// Builds the `/split` command definition.
pub fn split_cost_command(channel: Arc<dyn ChatChannel>) -> CommandDefinition {
    CommandDefinition::new(
        "split",
        "Split a court bill across players",
        parse_arguments,
        vec![
            StepDefinition::validated("total", "What was the total? (e.g. 24.50)", parse_total),
            StepDefinition::validated("players", "How many players?", parse_players),
        ],
        Arc::new(SplitCostHandler { channel }),
    )
}

fn parse_arguments(args: &[String]) -> Result<ParsedArguments, UsageError> {
    if args.len() > 2 {
        return Err(UsageError::new(USAGE));
    }
    let mut parsed = ParsedArguments::default();

    match args.first() {
        Some(raw) => {
            let value = parse_total(raw).map_err(|err| UsageError::new(err.message()))?;
            parsed.fields.insert("total".to_string(), value);
        }
        None => parsed.missing.push("total".to_string()),
    }
    match args.get(1) {
        Some(raw) => {
            let value = parse_players(raw).map_err(|err| UsageError::new(err.message()))?;
            parsed.fields.insert("players".to_string(), value);
        }
        None => parsed.missing.push("players".to_string()),
    }

    Ok(parsed)
}

/// Parses an amount like `24.50` or `24` into cents.
///
/// Amounts stay within `i64` cents; absurdly large input is rejected the
/// same way as malformed input.
fn parse_total(raw: &str) -> Result<FieldValue, StepValidationError> {
    let invalid = || StepValidationError::new("Please send an amount like 24.50.");

    let raw = raw.trim();
    let (units, cents) = match raw.split_once('.') {
        Some((units, cents)) => (units, cents),
        None => (raw, "0"),
    };
    let units: u64 = units.parse().map_err(|_| invalid())?;
    if cents.is_empty() || cents.len() > 2 || !cents.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let mut fraction: u64 = cents.parse().map_err(|_| invalid())?;
    if cents.len() == 1 {
        fraction *= 10;
    }

    let total = units
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(fraction))
        .ok_or_else(invalid)?;
    if i64::try_from(total).is_err() {
        return Err(invalid());
    }
    Ok(FieldValue::from(total))
}

fn parse_players(raw: &str) -> Result<FieldValue, StepValidationError> {
    let players: u64 = raw
        .trim()
        .parse()
        .map_err(|_| StepValidationError::new("Please send a number of players."))?;
    if players == 0 {
        return Err(StepValidationError::new("At least one player is needed."));
    }
    Ok(FieldValue::from(players))
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

struct SplitCostHandler {
    channel: Arc<dyn ChatChannel>,
}

#[async_trait]
impl CommandHandler for SplitCostHandler {
    async fn execute(&self, fields: FieldMap, ctx: &ChannelContext) -> Result<(), DomainError> {
        let total = i64::try_from(required_u64(&fields, "total")?)
            .map_err(|_| DomainError::validation("total", "amount is too large"))?;
        let players = required_u64(&fields, "players")? as usize;

        let shares = split_evenly(total, players)?;
        info!(total, players, "cost split");

        // Shares differ by at most one cent, so two distinct amounts at most.
        let low = shares.last().copied().unwrap_or(0);
        let high = shares.first().copied().unwrap_or(0);
        let text = if low == high {
            format!(
                "{} each ({} players, {} total).",
                format_cents(high),
                players,
                format_cents(total),
            )
        } else {
            let high_count = shares.iter().filter(|&&s| s == high).count();
            format!(
                "{} pay {}, {} pay {} ({} total).",
                high_count,
                format_cents(high),
                players - high_count,
                format_cents(low),
                format_cents(total),
            )
        };
        self.channel.send(ctx, OutboundMessage::text(text)).await?;
        Ok(())
    }
}
