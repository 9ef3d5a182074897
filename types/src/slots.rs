//! Slot-machine vocabulary: symbols, stats, spin results and bonuses.
//!
//! Symbols are encoded as `0..=4`:
//! - `0..=2` are the stat symbols (energy, hunger, happiness)
//! - `3` is cherry, `4` is diamond
//!
//! A triple of a stat symbol grants one increment of that stat. Triple cherry
//! grants every stat once; triple diamond grants every stat three times.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of slots on the machine.
pub const SLOT_COUNT: usize = 3;

/// Number of distinct reel symbols.
pub const SYMBOL_COUNT: usize = 5;

/// Pet stats the backend can increment.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Energy = 0,
    Hunger = 1,
    Happiness = 2,
}

impl Stat {
    /// All stats in settlement order.
    pub const ALL: [Stat; 3] = [Stat::Energy, Stat::Hunger, Stat::Happiness];

    /// Endpoint parameter and JSON response key for this stat.
    pub fn param(&self) -> &'static str {
        match self {
            Stat::Energy => "energy",
            Stat::Hunger => "hunger",
            Stat::Happiness => "happiness",
        }
    }
}

/// One reel symbol.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Energy = 0,
    Hunger = 1,
    Happiness = 2,
    Cherry = 3,
    Diamond = 4,
}

/// Error for out-of-range symbol encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("invalid symbol index: {0}")]
pub struct InvalidSymbol(pub u8);

impl Symbol {
    /// All symbols, indexable by their `u8` encoding.
    pub const ALL: [Symbol; SYMBOL_COUNT] = [
        Symbol::Energy,
        Symbol::Hunger,
        Symbol::Happiness,
        Symbol::Cherry,
        Symbol::Diamond,
    ];

    /// Display name matching the asset and wire naming.
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Energy => "energy",
            Symbol::Hunger => "hunger",
            Symbol::Happiness => "happiness",
            Symbol::Cherry => "cherry",
            Symbol::Diamond => "diamond",
        }
    }

    /// Static asset path for the symbol sprite.
    pub fn asset_path(&self) -> String {
        format!("/static/minigames/slots/{}.png", self.as_str())
    }

    /// The stat this symbol maps to, when it is a stat symbol.
    pub fn stat(&self) -> Option<Stat> {
        match self {
            Symbol::Energy => Some(Stat::Energy),
            Symbol::Hunger => Some(Stat::Hunger),
            Symbol::Happiness => Some(Stat::Happiness),
            Symbol::Cherry | Symbol::Diamond => None,
        }
    }
}

impl TryFrom<u8> for Symbol {
    type Error = InvalidSymbol;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Symbol::Energy),
            1 => Ok(Symbol::Hunger),
            2 => Ok(Symbol::Happiness),
            3 => Ok(Symbol::Cherry),
            4 => Ok(Symbol::Diamond),
            i => Err(InvalidSymbol(i)),
        }
    }
}

/// Ordered outcome of one spin, populated as each slot settles.
///
/// Created fresh per spin and discarded after evaluation. Evaluation must not
/// run until [`SpinResult::is_complete`] reports true.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpinResult {
    slots: [Option<Symbol>; SLOT_COUNT],
}

impl SpinResult {
    /// Empty result with no slot settled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the final symbol for a slot.
    ///
    /// Returns false when the index is out of range or the slot already
    /// settled; the recorded symbol is never overwritten.
    pub fn record(&mut self, slot: usize, symbol: Symbol) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) if entry.is_none() => {
                *entry = Some(symbol);
                true
            }
            _ => false,
        }
    }

    /// Number of slots that have settled so far.
    pub fn settled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True once every slot has a final symbol.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    /// The symbol a slot settled on, if it has.
    pub fn get(&self, slot: usize) -> Option<Symbol> {
        self.slots.get(slot).copied().flatten()
    }

    /// All three symbols, once the result is complete.
    pub fn symbols(&self) -> Option<[Symbol; SLOT_COUNT]> {
        Some([self.slots[0]?, self.slots[1]?, self.slots[2]?])
    }

    /// The matching symbol when all slots settled equal.
    pub fn triple(&self) -> Option<Symbol> {
        let [a, b, c] = self.symbols()?;
        if a == b && b == c {
            Some(a)
        } else {
            None
        }
    }
}

impl From<[Symbol; SLOT_COUNT]> for SpinResult {
    fn from(symbols: [Symbol; SLOT_COUNT]) -> Self {
        Self {
            slots: symbols.map(Some),
        }
    }
}

/// Stat increments granted for a matching triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bonus {
    /// Triple stat symbol: one increment of that stat.
    Stat(Stat),
    /// Triple cherry: every stat once.
    CherryCombo,
    /// Triple diamond: every stat three times.
    DiamondJackpot,
}

impl Bonus {
    /// The bonus granted for a triple of `symbol`.
    pub fn for_triple(symbol: Symbol) -> Self {
        match symbol.stat() {
            Some(stat) => Bonus::Stat(stat),
            None => match symbol {
                Symbol::Cherry => Bonus::CherryCombo,
                _ => Bonus::DiamondJackpot,
            },
        }
    }

    /// Ordered increment plan. Settlement issues one backend call per entry,
    /// in order, awaiting each before the next.
    pub fn increment_plan(&self) -> Vec<Stat> {
        match self {
            Bonus::Stat(stat) => vec![*stat],
            Bonus::CherryCombo => Stat::ALL.to_vec(),
            Bonus::DiamondJackpot => Stat::ALL
                .iter()
                .flat_map(|stat| std::iter::repeat(*stat).take(3))
                .collect(),
        }
    }

    /// User-facing reward message for this bonus.
    pub fn message(&self) -> String {
        match self {
            Bonus::Stat(stat) => format!("Triple {}! +1 {0}", stat.param()),
            Bonus::CherryCombo => "Triple cherry! Every stat gets a boost".to_string(),
            Bonus::DiamondJackpot => "DIAMOND JACKPOT! Every stat gets a triple boost".to_string(),
        }
    }
}
