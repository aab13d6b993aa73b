//! Rules for the two-choice (coin flip) and multi-choice (rock paper
//! scissors) interaction variants.
//!
//! The opponent's draw is always taken after the player's choice resolved.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Result of a round, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Win,
    Loss,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub const ALL: [CoinSide; 2] = [CoinSide::Heads, CoinSide::Tails];

    pub fn token(self) -> &'static str {
        match self {
            CoinSide::Heads => "heads",
            CoinSide::Tails => "tails",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CoinSide::Heads => "Heads",
            CoinSide::Tails => "Tails",
        }
    }

    /// Uniform draw over both sides.
    pub fn flip<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        }
    }

    /// A bet wins when it matches the flip; there is no draw.
    pub fn judge(bet: CoinSide, flipped: CoinSide) -> Verdict {
        if bet == flipped {
            Verdict::Win
        } else {
            Verdict::Loss
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    pub fn token(self) -> &'static str {
        match self {
            Hand::Rock => "rock",
            Hand::Paper => "paper",
            Hand::Scissors => "scissors",
        }
    }

    /// The hand this one beats.
    pub fn beats(self) -> Hand {
        match self {
            Hand::Rock => Hand::Scissors,
            Hand::Scissors => Hand::Paper,
            Hand::Paper => Hand::Rock,
        }
    }

    /// Uniform draw over all three hands.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Hand::ALL.choose(rng).unwrap_or(&Hand::Rock)
    }

    pub fn judge(player: Hand, opponent: Hand) -> Verdict {
        if player == opponent {
            Verdict::Draw
        } else if player.beats() == opponent {
            Verdict::Win
        } else {
            Verdict::Loss
        }
    }
}

/// Error for tokens that name no coin side or hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToken(pub String);

impl fmt::Display for UnknownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown choice token `{}`", self.0)
    }
}

impl std::error::Error for UnknownToken {}

impl FromStr for CoinSide {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoinSide::ALL
            .into_iter()
            .find(|side| side.token().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownToken(s.to_string()))
    }
}

impl FromStr for Hand {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hand::ALL
            .into_iter()
            .find(|hand| hand.token().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownToken(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_dominance_table() {
        assert_eq!(Hand::judge(Hand::Rock, Hand::Scissors), Verdict::Win);
        assert_eq!(Hand::judge(Hand::Scissors, Hand::Paper), Verdict::Win);
        assert_eq!(Hand::judge(Hand::Paper, Hand::Rock), Verdict::Win);

        assert_eq!(Hand::judge(Hand::Scissors, Hand::Rock), Verdict::Loss);
        assert_eq!(Hand::judge(Hand::Paper, Hand::Scissors), Verdict::Loss);
        assert_eq!(Hand::judge(Hand::Rock, Hand::Paper), Verdict::Loss);

        for hand in Hand::ALL {
            assert_eq!(Hand::judge(hand, hand), Verdict::Draw);
        }
    }

    #[test]
    fn test_dominance_is_antisymmetric() {
        for a in Hand::ALL {
            for b in Hand::ALL {
                let forward = Hand::judge(a, b);
                let backward = Hand::judge(b, a);
                match forward {
                    Verdict::Win => assert_eq!(backward, Verdict::Loss),
                    Verdict::Loss => assert_eq!(backward, Verdict::Win),
                    Verdict::Draw => assert_eq!(backward, Verdict::Draw),
                }
            }
        }
    }

    #[test]
    fn test_coin_win_rate_is_about_half() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let rounds = 20_000;
        let wins = (0..rounds)
            .filter(|i| {
                let bet = if i % 2 == 0 { CoinSide::Heads } else { CoinSide::Tails };
                CoinSide::judge(bet, CoinSide::flip(&mut rng)) == Verdict::Win
            })
            .count();
        let rate = wins as f64 / rounds as f64;
        assert!((0.47..0.53).contains(&rate), "win rate {}", rate);
    }

    #[test]
    fn test_hand_draw_covers_all_hands() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [0usize; 3];
        for _ in 0..3_000 {
            match Hand::draw(&mut rng) {
                Hand::Rock => seen[0] += 1,
                Hand::Paper => seen[1] += 1,
                Hand::Scissors => seen[2] += 1,
            }
        }
        assert!(seen.iter().all(|&n| n > 800), "{:?}", seen);
    }

    #[test]
    fn test_tokens_parse_case_insensitively() {
        assert_eq!("Rock".parse::<Hand>(), Ok(Hand::Rock));
        assert_eq!("TAILS".parse::<CoinSide>(), Ok(CoinSide::Tails));
        assert!("lizard".parse::<Hand>().is_err());
    }
}
