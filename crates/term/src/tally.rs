use crate::types::Outcome;

/// Process-wide win/loss/tie counters.
///
/// Only concluded matches are recorded; a match abandoned by a
/// communication failure never reaches [`Tally::record`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::ClientWin => self.wins += 1,
            Outcome::OpponentWin => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    pub fn played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_outcome_bumps_one_counter() {
        let mut tally = Tally::default();
        tally.record(Outcome::ClientWin);
        tally.record(Outcome::Tie);
        tally.record(Outcome::ClientWin);
        assert_eq!(
            tally,
            Tally {
                wins: 2,
                losses: 0,
                ties: 1
            }
        );
        assert_eq!(tally.played(), 3);
    }
}
