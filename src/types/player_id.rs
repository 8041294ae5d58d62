use std::fmt::Display;

/// Identity of one of the two players.
///
/// `PlayerFirst` owns the `+1` polarity and `PlayerSecond` the `-1` polarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerId {
    #[default]
    PlayerFirst = 0,
    PlayerSecond = 1,
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerId::PlayerFirst => f.write_fmt(format_args!("P1")),
            PlayerId::PlayerSecond => f.write_fmt(format_args!("P2")),
        }
    }
}

impl PlayerId {
    pub const VALUES: [PlayerId; 2] = [PlayerId::PlayerFirst, PlayerId::PlayerSecond];

    #[inline]
    pub fn opposite(self) -> PlayerId {
        match self {
            PlayerId::PlayerFirst => PlayerId::PlayerSecond,
            PlayerId::PlayerSecond => PlayerId::PlayerFirst,
        }
    }

    #[inline]
    pub fn select<T>(self, tuple: (T, T)) -> T {
        match self {
            PlayerId::PlayerFirst => tuple.0,
            PlayerId::PlayerSecond => tuple.1,
        }
    }

    /// The signed unit of this player: `+1` or `-1`.
    #[inline]
    pub fn sign(self) -> i8 {
        self.select((1, -1))
    }

    #[inline]
    pub fn from_sign(sign: i8) -> Option<PlayerId> {
        match sign {
            1 => Some(PlayerId::PlayerFirst),
            -1 => Some(PlayerId::PlayerSecond),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Character used when rendering a board.
    #[inline]
    pub fn symbol(self) -> char {
        self.select(('X', 'O'))
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerId;

    #[test]
    fn test_sign_round_trip() {
        for p in PlayerId::VALUES {
            assert_eq!(Some(p), PlayerId::from_sign(p.sign()));
            assert_eq!(-p.sign(), p.opposite().sign());
        }
        assert_eq!(None, PlayerId::from_sign(0));
    }
}
