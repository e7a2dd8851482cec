//! Sized numeric types and literal range checks.
//!
//! Every number type belongs to one of three categories (signed, unsigned,
//! decimal) and has a bit width. Unsuffixed literals may have several possible
//! sizes; [`NumberValue::possible_sizes`] computes them from the value.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberCategory {
    Int,
    UInt,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberSize {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Dec32,
    Dec64,
}

impl NumberSize {
    pub const ALL: [NumberSize; 10] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Dec32,
        Self::Dec64,
    ];

    pub fn category(self) -> NumberCategory {
        match self {
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => NumberCategory::Int,
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64 => NumberCategory::UInt,
            Self::Dec32 | Self::Dec64 => NumberCategory::Dec,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Self::Int8 | Self::UInt8 => 8,
            Self::Int16 | Self::UInt16 => 16,
            Self::Int32 | Self::UInt32 | Self::Dec32 => 32,
            Self::Int64 | Self::UInt64 | Self::Dec64 => 64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Dec32 => "dec32",
            Self::Dec64 => "dec64",
        }
    }

    pub fn from_name(name: &str) -> Option<NumberSize> {
        Self::ALL.into_iter().find(|size| size.name() == name)
    }

    pub fn is_unsigned(self) -> bool {
        self.category() == NumberCategory::UInt
    }

    pub fn is_decimal(self) -> bool {
        self.category() == NumberCategory::Dec
    }

    /// Same category and no wider than `target`.
    pub fn widens_to(self, target: NumberSize) -> bool {
        self.category() == target.category() && self.bits() <= target.bits()
    }

    /// Largest integer magnitude representable without loss.
    fn max_integer(self) -> u128 {
        match self {
            Self::Int8 => i8::MAX as u128,
            Self::Int16 => i16::MAX as u128,
            Self::Int32 => i32::MAX as u128,
            Self::Int64 => i64::MAX as u128,
            Self::UInt8 => u8::MAX as u128,
            Self::UInt16 => u16::MAX as u128,
            Self::UInt32 => u32::MAX as u128,
            Self::UInt64 => u64::MAX as u128,
            // Mantissa widths of binary32 / binary64.
            Self::Dec32 => 1 << 24,
            Self::Dec64 => 1 << 53,
        }
    }

    /// Whether a (non-negative) literal value is representable in this size.
    pub fn holds(self, value: &NumberValue) -> bool {
        match *value {
            NumberValue::Integer(v) => v <= self.max_integer(),
            NumberValue::Decimal(v) => match self {
                Self::Dec32 => (v as f32).is_finite(),
                Self::Dec64 => v.is_finite(),
                _ => false,
            },
        }
    }
}

impl std::fmt::Display for NumberSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of a number literal, sign excluded (negation is a unary operator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberValue {
    Integer(u128),
    Decimal(f64),
}

impl NumberValue {
    /// Parses literal digits. Underscores between digits are ignored.
    pub fn parse(digits: &str) -> Option<NumberValue> {
        let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
        if cleaned.is_empty() || !cleaned.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        if cleaned.contains('.') {
            let value: f64 = cleaned.parse().ok()?;
            return value.is_finite().then_some(NumberValue::Decimal(value));
        }
        cleaned.parse().ok().map(NumberValue::Integer)
    }

    /// Every size that can hold this value, in catalogue order.
    pub fn possible_sizes(&self) -> Vec<NumberSize> {
        NumberSize::ALL
            .into_iter()
            .filter(|size| size.holds(self))
            .collect()
    }
}
