//! Cost splitting arithmetic.

use crate::domain::foundation::ValidationError;

/// Splits a total cost in minor units evenly across `players`.
///
/// The remainder is distributed one unit at a time from the front, so the
/// result is deterministic and sums exactly to `total`.
pub fn split_evenly(total: i64, players: usize) -> Result<Vec<i64>, ValidationError> {
    if players == 0 {
        return Err(ValidationError::out_of_range("players", 1, i64::MAX, 0));
    }
    if total < 0 {
        return Err(ValidationError::out_of_range("total", 0, i64::MAX, total));
    }

    let players_i64 = players as i64;
    let base = total / players_i64;
    let remainder = (total % players_i64) as usize;

    let shares = (0..players)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect();
    Ok(shares)
}
