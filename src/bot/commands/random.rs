//! Random commands - numbers, dice and picking between options.

use rand::{Rng, seq::IndexedRandom};

/// Lower bound of `random` when none is given.
pub const DEFAULT_FLOOR: i64 = 1;
/// Upper bound of `random` when none is given.
pub const DEFAULT_CEILING: i64 = 100;
/// Sides of a die when none are given.
pub const DEFAULT_SIDES: u32 = 20;
/// Smallest and largest die accepted.
pub const SIDES_RANGE: std::ops::RangeInclusive<u32> = 2..=1000;

/// Validates the requested bounds, falling back to 1 and 100.
pub fn number_range(floor: Option<i64>, ceiling: Option<i64>) -> Result<(i64, i64), String> {
    let floor = floor.unwrap_or(DEFAULT_FLOOR);
    let ceiling = ceiling.unwrap_or(DEFAULT_CEILING);
    if floor <= ceiling {
        Ok((floor, ceiling))
    } else {
        Err(format!("The floor ({floor}) can't be above the ceiling ({ceiling})."))
    }
}

/// A number between `floor` and `ceiling`, both included.
pub fn random_number<R: Rng + ?Sized>(rng: &mut R, floor: i64, ceiling: i64) -> i64 {
    rng.random_range(floor..=ceiling)
}

/// Validates the requested die, falling back to [`DEFAULT_SIDES`].
pub fn die_sides(requested: Option<u32>) -> Result<u32, String> {
    let sides = requested.unwrap_or(DEFAULT_SIDES);
    if SIDES_RANGE.contains(&sides) {
        Ok(sides)
    } else {
        Err(format!(
            "A die needs between {} and {} sides.",
            SIDES_RANGE.start(),
            SIDES_RANGE.end()
        ))
    }
}

/// Rolls a die with `sides` faces.
pub fn roll_die<R: Rng + ?Sized>(rng: &mut R, sides: u32) -> u32 {
    rng.random_range(1..=sides)
}

/// Splits on whitespace and picks one option.
pub fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &'a str) -> Option<&'a str> {
    let options: Vec<&str> = options.split_whitespace().collect();
    options.choose(rng).copied()
}

mod inner {
    #![allow(missing_docs)]

    use super::{die_sides, number_range, pick, random_number, roll_die};
    use crate::{bot::Context, errors::Result};

    /// Picks a random number in a range.
    #[poise::command(slash_command, prefix_command)]
    pub async fn random(
        ctx: Context<'_>,
        #[description = "Smallest number (default 1)"] floor: Option<i64>,
        #[description = "Largest number (default 100)"] ceiling: Option<i64>,
    ) -> Result<()> {
        let reply = match number_range(floor, ceiling) {
            Ok((floor, ceiling)) => {
                let value = random_number(&mut rand::rng(), floor, ceiling);
                format!("🔢 Your random number is **{value}** ({floor}-{ceiling})")
            }
            Err(message) => message,
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Rolls a die.
    #[poise::command(slash_command, prefix_command)]
    pub async fn roll(
        ctx: Context<'_>,
        #[description = "Number of sides (default 20)"] sides: Option<u32>,
    ) -> Result<()> {
        let reply = match die_sides(sides) {
            Ok(sides) => {
                let value = roll_die(&mut rand::rng(), sides);
                format!("🎲 You rolled a **{value}** (d{sides})")
            }
            Err(message) => message,
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Picks one of several space-separated options.
    #[poise::command(slash_command, prefix_command)]
    pub async fn choose(
        ctx: Context<'_>,
        #[description = "Options separated by spaces"]
        #[rest]
        options: String,
    ) -> Result<()> {
        let reply = pick(&mut rand::rng(), &options).map_or_else(
            || "Give me something to choose from.".to_string(),
            |choice| format!("I choose **{choice}**"),
        );
        ctx.say(reply).await?;
        Ok(())
    }
}

pub use inner::*;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_number_range_defaults_and_order() {
        assert_eq!(number_range(None, None), Ok((1, 100)));
        assert_eq!(number_range(Some(-5), None), Ok((-5, 100)));
        assert_eq!(number_range(None, Some(1)), Ok((1, 1)));
        assert!(number_range(Some(10), Some(3)).is_err());
    }

    #[test]
    fn test_random_number_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let value = random_number(&mut rng, DEFAULT_FLOOR, DEFAULT_CEILING);
            assert!((1..=100).contains(&value));
        }
        assert_eq!(random_number(&mut rng, 42, 42), 42);
    }

    #[test]
    fn test_die_sides_default_and_bounds() {
        assert_eq!(die_sides(None), Ok(20));
        assert_eq!(die_sides(Some(2)), Ok(2));
        assert_eq!(die_sides(Some(1000)), Ok(1000));
        assert!(die_sides(Some(1)).is_err());
        assert!(die_sides(Some(1001)).is_err());
    }

    #[test]
    fn test_roll_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let value = roll_die(&mut rng, DEFAULT_SIDES);
            assert!((1..=20).contains(&value));
        }
    }

    #[test]
    fn test_pick_from_options() {
        let mut rng = StdRng::seed_from_u64(7);
        let choice = pick(&mut rng, "tea  coffee\twater");
        assert!(matches!(choice, Some("tea" | "coffee" | "water")));
        assert_eq!(pick(&mut rng, "only"), Some("only"));
        assert_eq!(pick(&mut rng, "   "), None);
    }
}
