use crate::Monotonicity;
use crate::Monotonicity::{Activation, Inhibition};

impl Monotonicity {
    /// Decode a sign of the fact format (`1` is activation, `0` is inhibition).
    pub fn try_from_bit(sign: u8) -> Option<Monotonicity> {
        match sign {
            0 => Some(Inhibition),
            1 => Some(Activation),
            _ => None,
        }
    }

    /// Encode this monotonicity as a sign of the fact format.
    pub fn to_bit(self) -> u8 {
        match self {
            Activation => 1,
            Inhibition => 0,
        }
    }

    /// The opposite sign.
    pub fn flipped(self) -> Monotonicity {
        match self {
            Activation => Inhibition,
            Inhibition => Activation,
        }
    }

    /// The regulator value which satisfies a term under this sign.
    pub fn satisfied_by(self) -> bool {
        self == Activation
    }
}
