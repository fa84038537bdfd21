use serde::{Deserialize, Serialize};

/// One of the seven review lenses of the EMPATHY framework.
///
/// Stages are strictly ordered; each lens examines the document produced by
/// the previous stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lens {
    /// E: End Goal in Mind
    EndGoal,
    /// M: Developmental Mindset
    Mindset,
    /// P: Peruse Paper Thoroughly
    Peruse,
    /// A: Allocate Critique Resources Wisely
    Allocate,
    /// T: Tone: Avoid Toxicity, Be Professional
    Tone,
    /// H: Holistic and Balanced Feedback
    Holistic,
    /// Y: Your Review as Roadmap
    Roadmap,
}

impl Lens {
    /// All lenses in review order.
    pub const ALL: [Lens; 7] = [
        Lens::EndGoal,
        Lens::Mindset,
        Lens::Peruse,
        Lens::Allocate,
        Lens::Tone,
        Lens::Holistic,
        Lens::Roadmap,
    ];

    /// 1-based stage number.
    pub fn number(self) -> u8 {
        match self {
            Lens::EndGoal => 1,
            Lens::Mindset => 2,
            Lens::Peruse => 3,
            Lens::Allocate => 4,
            Lens::Tone => 5,
            Lens::Holistic => 6,
            Lens::Roadmap => 7,
        }
    }

    /// Look up a lens by its 1-based stage number.
    pub fn from_number(n: u8) -> Option<Lens> {
        Lens::ALL.get(n.checked_sub(1)? as usize).copied()
    }

    /// The lens reviewed immediately before this one, if any.
    pub fn previous(self) -> Option<Lens> {
        Lens::from_number(self.number() - 1)
    }

    /// The lens reviewed immediately after this one, if any.
    pub fn next(self) -> Option<Lens> {
        Lens::from_number(self.number() + 1)
    }

    /// Framework letter for display.
    pub fn letter(self) -> char {
        match self {
            Lens::EndGoal => 'E',
            Lens::Mindset => 'M',
            Lens::Peruse => 'P',
            Lens::Allocate => 'A',
            Lens::Tone => 'T',
            Lens::Holistic => 'H',
            Lens::Roadmap => 'Y',
        }
    }

    /// Human-readable dimension title.
    pub fn title(self) -> &'static str {
        match self {
            Lens::EndGoal => "End Goal in Mind",
            Lens::Mindset => "Developmental Mindset",
            Lens::Peruse => "Peruse Paper Thoroughly",
            Lens::Allocate => "Allocate Critique Resources Wisely",
            Lens::Tone => "Tone: Avoid Toxicity, Be Professional",
            Lens::Holistic => "Holistic and Balanced Feedback",
            Lens::Roadmap => "Your Review as Roadmap",
        }
    }
}

impl std::fmt::Display for Lens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stage {} ({})", self.number(), self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lens_ordering() {
        assert_eq!(Lens::ALL.len(), 7);
        for (i, lens) in Lens::ALL.iter().enumerate() {
            assert_eq!(lens.number() as usize, i + 1);
            assert_eq!(Lens::from_number(lens.number()), Some(*lens));
        }
    }

    #[test]
    fn test_lens_neighbours() {
        assert_eq!(Lens::EndGoal.previous(), None);
        assert_eq!(Lens::EndGoal.next(), Some(Lens::Mindset));
        assert_eq!(Lens::Roadmap.next(), None);
        assert_eq!(Lens::Roadmap.previous(), Some(Lens::Holistic));
    }

    #[test]
    fn test_from_number_out_of_range() {
        assert_eq!(Lens::from_number(0), None);
        assert_eq!(Lens::from_number(8), None);
    }
}
