//! Input validation helpers for the generation form.

use surpresinhas::{defaults, GameVariant};

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} não pode ficar vazio", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} deve ser no mínimo {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} deve ser no máximo {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} deve ser um número válido", field_name)),
    }
}

/// Validate the plays-per-generation input
pub fn validate_play_count(input: &str) -> Result<usize, String> {
    validate_numeric_input(
        input,
        Some(defaults::MIN_PLAY_COUNT),
        Some(defaults::MAX_PLAY_COUNT),
        "Qtd. de surpresinhas",
    )
}

/// Validate the numbers-per-play input against the variant's bounds
pub fn validate_pick_count(input: &str, variant: GameVariant) -> Result<usize, String> {
    let bounds = variant.pick_bounds();
    validate_numeric_input(
        input,
        Some(*bounds.start()),
        Some(*bounds.end()),
        "Qtd. de dezenas",
    )
}

/// Parse the optional seed field: empty means random.
pub fn parse_seed(input: &str) -> Result<Option<u64>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| "Seed deve ser um número inteiro (vazio = aleatória)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_count_respects_global_bounds() {
        assert_eq!(validate_play_count("3"), Ok(3));
        assert_eq!(validate_play_count(" 12 "), Ok(12));
        assert!(validate_play_count("0").is_err());
        assert!(validate_play_count("13").is_err());
        assert!(validate_play_count("").is_err());
        assert!(validate_play_count("três").is_err());
    }

    #[test]
    fn pick_count_bounds_follow_the_variant() {
        assert_eq!(validate_pick_count("6", GameVariant::MegaSena), Ok(6));
        assert!(validate_pick_count("13", GameVariant::MegaSena).is_err());
        assert_eq!(validate_pick_count("15", GameVariant::Lotofacil), Ok(15));
        assert!(validate_pick_count("14", GameVariant::Lotofacil).is_err());
        assert!(validate_pick_count("21", GameVariant::Lotofacil).is_err());
    }

    #[test]
    fn empty_seed_means_random() {
        assert_eq!(parse_seed(""), Ok(None));
        assert_eq!(parse_seed("   "), Ok(None));
        assert_eq!(parse_seed("42"), Ok(Some(42)));
        assert!(parse_seed("-1").is_err());
        assert!(parse_seed("abc").is_err());
    }
}
