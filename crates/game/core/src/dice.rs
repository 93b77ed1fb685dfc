//! Dice types, face classes and the combat dice tray.

use crate::env::RngSource;

/// Physical die shape. Determines the number of faces.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DieType {
    /// Attack dice progression used when monsters scale with depth.
    pub const ATTACK_PROGRESSION: [DieType; 5] = [
        DieType::D4,
        DieType::D6,
        DieType::D8,
        DieType::D10,
        DieType::D12,
    ];

    pub const fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
        }
    }

    /// Next die in the shop upgrade path.
    pub const fn upgrade(self) -> Option<DieType> {
        match self {
            Self::D4 => Some(Self::D6),
            Self::D6 => Some(Self::D8),
            Self::D8 => Some(Self::D10),
            Self::D10 => Some(Self::D12),
            Self::D12 => Some(Self::D20),
            Self::D20 => None,
        }
    }

    /// Shop price of upgrading this die, if it can be upgraded.
    pub const fn upgrade_cost(self) -> Option<u32> {
        match self {
            Self::D4 => Some(75),
            Self::D6 => Some(100),
            Self::D8 => Some(125),
            Self::D10 => Some(150),
            Self::D12 => Some(200),
            Self::D20 => None,
        }
    }
}

const FIBONACCI_FACES: [u32; 20] = [
    1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610, 987, 1597, 2584, 4181, 6765,
];
const PRIME_FACES: [u32; 20] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
];

/// Which number sequence is printed on a die's faces.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DiceClass {
    /// 1, 2, 3, ... N
    #[default]
    Standard,
    /// 1, 1, 2, 3, 5, 8, ...
    Fibonacci,
    /// 1, 4, 9, 16, ...
    Square,
    /// 2, 3, 5, 7, 11, ...
    Prime,
}

impl DiceClass {
    pub fn faces(self, sides: u32) -> Vec<u32> {
        let count = sides as usize;
        match self {
            Self::Standard => (1..=sides).collect(),
            Self::Fibonacci => FIBONACCI_FACES.iter().copied().take(count).collect(),
            Self::Square => (1..=sides).map(|i| i * i).collect(),
            Self::Prime => PRIME_FACES.iter().copied().take(count).collect(),
        }
    }
}

/// A die the player owns: its shape and face class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DieSpec {
    pub die_type: DieType,
    pub class: DiceClass,
}

impl DieSpec {
    pub const fn new(die_type: DieType, class: DiceClass) -> Self {
        Self { die_type, class }
    }

    pub const fn standard(die_type: DieType) -> Self {
        Self::new(die_type, DiceClass::Standard)
    }

    pub fn faces(&self) -> Vec<u32> {
        self.class.faces(self.die_type.sides())
    }

    /// Highest face value, used to cap roll bonuses.
    pub fn max_face(&self) -> u32 {
        self.faces().into_iter().max().unwrap_or(1)
    }

    /// Rolls one face uniformly.
    pub fn roll(&self, rng: &mut dyn RngSource) -> u32 {
        let faces = self.faces();
        let index = rng.next_index(faces.len());
        faces.get(index).copied().unwrap_or(1)
    }
}

/// Die granted by relics that add a free die to the tray.
pub const BONUS_DIE: DieSpec = DieSpec::standard(DieType::D6);

/// Identity of a die on the combat tray.
///
/// Dice from the player's pool use their pool index; bonus dice added by
/// relics are numbered after the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DieId(pub u32);

impl core::fmt::Display for DieId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "die-{}", self.0)
    }
}

/// A die on the combat tray. `value` is `None` until rolled.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Die {
    pub id: DieId,
    pub spec: DieSpec,
    pub value: Option<u32>,
    pub held: bool,
}

impl Die {
    pub const fn blank(id: DieId, spec: DieSpec) -> Self {
        Self {
            id,
            spec,
            value: None,
            held: false,
        }
    }

    pub fn roll(&mut self, rng: &mut dyn RngSource) {
        self.value = Some(self.spec.roll(rng));
    }
}

/// Rolls a fresh tray from the player's dice pool; nothing is held.
pub fn roll_pool(pool: &[DieSpec], rng: &mut dyn RngSource) -> Vec<Die> {
    pool.iter()
        .enumerate()
        .map(|(index, spec)| {
            let mut die = Die::blank(DieId(index as u32), *spec);
            die.roll(rng);
            die
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SeededRng;

    #[test]
    fn face_classes() {
        assert_eq!(DiceClass::Standard.faces(4), vec![1, 2, 3, 4]);
        assert_eq!(DiceClass::Fibonacci.faces(6), vec![1, 1, 2, 3, 5, 8]);
        assert_eq!(DiceClass::Square.faces(4), vec![1, 4, 9, 16]);
        assert_eq!(DiceClass::Prime.faces(6), vec![2, 3, 5, 7, 11, 13]);
        assert_eq!(DiceClass::Prime.faces(20).len(), 20);
    }

    #[test]
    fn rolls_land_on_faces() {
        let mut rng = SeededRng::new(8);
        let spec = DieSpec::new(DieType::D6, DiceClass::Square);
        let faces = spec.faces();
        for _ in 0..100 {
            assert!(faces.contains(&spec.roll(&mut rng)));
        }
    }

    #[test]
    fn roll_pool_numbers_dice_by_pool_index() {
        let mut rng = SeededRng::new(8);
        let pool = [
            DieSpec::standard(DieType::D6),
            DieSpec::standard(DieType::D4),
        ];
        let tray = roll_pool(&pool, &mut rng);
        assert_eq!(tray.len(), 2);
        assert_eq!(tray[1].id, DieId(1));
        assert!(tray.iter().all(|d| d.value.is_some() && !d.held));
    }

    #[test]
    fn upgrade_path_ends_at_d20() {
        assert_eq!(DieType::D12.upgrade(), Some(DieType::D20));
        assert_eq!(DieType::D20.upgrade(), None);
        assert_eq!(DieType::D20.upgrade_cost(), None);
        assert_eq!("d8".parse::<DieType>(), Ok(DieType::D8));
        assert_eq!(DieId(3).to_string(), "die-3");
    }
}
