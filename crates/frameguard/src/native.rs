// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native type system of the dataframe execution engine.
//!
//! These are the types the engine itself speaks (`StringType()`,
//! `DecimalType(10,2)`, ...). The type engine only needs three things from
//! them: a way to enumerate candidates ([`NativeType::catalog`]), a stable
//! string rendering ([`fmt::Display`]) and a family name
//! ([`NativeType::type_name`]).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Default decimal precision used by the execution engine.
pub const DEFAULT_DECIMAL_PRECISION: u8 = 10;

/// Default decimal scale used by the execution engine.
pub const DEFAULT_DECIMAL_SCALE: u8 = 0;

/// Largest precision a decimal can carry.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Family names whose members need construction arguments.
pub const PARAMETERIZED_FAMILIES: [&str; 3] = ["decimal", "array", "map"];

/// A type as expressed by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeType {
    Boolean,
    Binary,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    String,
    Date,
    Timestamp,
    /// Day-to-second interval (`DayTimeIntervalType(0, 3)`).
    DayTimeInterval,
    Decimal {
        precision: u8,
        scale: u8,
    },
    Array {
        element: Box<NativeType>,
        contains_null: bool,
    },
    Map {
        key: Box<NativeType>,
        value: Box<NativeType>,
        value_contains_null: bool,
    },
}

impl NativeType {
    /// Decimal with the engine's default precision and scale.
    pub const DEFAULT_DECIMAL: NativeType = NativeType::Decimal {
        precision: DEFAULT_DECIMAL_PRECISION,
        scale: DEFAULT_DECIMAL_SCALE,
    };

    /// Build a decimal, checking precision and scale bounds.
    pub fn decimal(precision: u8, scale: u8) -> Result<Self, ParseNativeError> {
        if precision == 0 || precision > MAX_DECIMAL_PRECISION {
            return Err(ParseNativeError::DecimalPrecision(precision));
        }
        if scale > precision {
            return Err(ParseNativeError::DecimalScale { precision, scale });
        }
        Ok(NativeType::Decimal { precision, scale })
    }

    pub fn array(element: NativeType, contains_null: bool) -> Self {
        NativeType::Array {
            element: Box::new(element),
            contains_null,
        }
    }

    pub fn map(key: NativeType, value: NativeType, value_contains_null: bool) -> Self {
        NativeType::Map {
            key: Box::new(key),
            value: Box::new(value),
            value_contains_null,
        }
    }

    /// Family name of the type (`"string"`, `"decimal"`, ...).
    pub const fn type_name(&self) -> &'static str {
        match self {
            NativeType::Boolean => "boolean",
            NativeType::Binary => "binary",
            NativeType::Byte => "byte",
            NativeType::Short => "short",
            NativeType::Integer => "integer",
            NativeType::Long => "long",
            NativeType::Float => "float",
            NativeType::Double => "double",
            NativeType::String => "string",
            NativeType::Date => "date",
            NativeType::Timestamp => "timestamp",
            NativeType::DayTimeInterval => "daytimeinterval",
            NativeType::Decimal { .. } => "decimal",
            NativeType::Array { .. } => "array",
            NativeType::Map { .. } => "map",
        }
    }

    /// Returns true if the family requires construction arguments.
    pub fn is_parameterized(&self) -> bool {
        is_parameterized_family(self.type_name())
    }

    /// Every simple type plus one member of each parameterized family
    /// (default decimal, array of strings, string-to-string map), in
    /// declaration order.
    pub fn catalog() -> Vec<NativeType> {
        vec![
            NativeType::Boolean,
            NativeType::Binary,
            NativeType::Byte,
            NativeType::Short,
            NativeType::Integer,
            NativeType::Long,
            NativeType::Float,
            NativeType::Double,
            NativeType::String,
            NativeType::Date,
            NativeType::Timestamp,
            NativeType::DayTimeInterval,
            NativeType::DEFAULT_DECIMAL,
            NativeType::array(NativeType::String, true),
            NativeType::map(NativeType::String, NativeType::String, true),
        ]
    }

    fn simple_from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "BooleanType" => NativeType::Boolean,
            "BinaryType" => NativeType::Binary,
            "ByteType" => NativeType::Byte,
            "ShortType" => NativeType::Short,
            "IntegerType" => NativeType::Integer,
            "LongType" => NativeType::Long,
            "FloatType" => NativeType::Float,
            "DoubleType" => NativeType::Double,
            "StringType" => NativeType::String,
            "DateType" => NativeType::Date,
            "TimestampType" => NativeType::Timestamp,
            _ => return None,
        };
        Some(ty)
    }
}

/// Returns true if `family` is one of [`PARAMETERIZED_FAMILIES`].
pub fn is_parameterized_family(family: &str) -> bool {
    PARAMETERIZED_FAMILIES.contains(&family)
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Boolean => f.write_str("BooleanType()"),
            NativeType::Binary => f.write_str("BinaryType()"),
            NativeType::Byte => f.write_str("ByteType()"),
            NativeType::Short => f.write_str("ShortType()"),
            NativeType::Integer => f.write_str("IntegerType()"),
            NativeType::Long => f.write_str("LongType()"),
            NativeType::Float => f.write_str("FloatType()"),
            NativeType::Double => f.write_str("DoubleType()"),
            NativeType::String => f.write_str("StringType()"),
            NativeType::Date => f.write_str("DateType()"),
            NativeType::Timestamp => f.write_str("TimestampType()"),
            NativeType::DayTimeInterval => f.write_str("DayTimeIntervalType(0, 3)"),
            NativeType::Decimal { precision, scale } => {
                write!(f, "DecimalType({},{})", precision, scale)
            }
            NativeType::Array {
                element,
                contains_null,
            } => write!(f, "ArrayType({}, {})", element, contains_null),
            NativeType::Map {
                key,
                value,
                value_contains_null,
            } => write!(f, "MapType({}, {}, {})", key, value, value_contains_null),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Errors produced while parsing a native type rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseNativeError {
    #[error("empty type string")]
    Empty,

    #[error("unknown native type '{0}'")]
    UnknownType(String),

    #[error("expected {expected} at offset {offset} in '{input}'")]
    Syntax {
        input: String,
        offset: usize,
        expected: &'static str,
    },

    #[error("decimal precision {0} out of range 1..=38")]
    DecimalPrecision(u8),

    #[error("decimal scale {scale} exceeds precision {precision}")]
    DecimalScale { precision: u8, scale: u8 },

    #[error("type nesting exceeds {0} levels")]
    TooDeep(usize),
}

impl FromStr for NativeType {
    type Err = ParseNativeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(ParseNativeError::Empty);
        }
        let mut parser = Parser {
            input,
            pos: 0,
            depth: 0,
        };
        let ty = parser.native()?;
        parser.skip_ws();
        if parser.pos != input.len() {
            return Err(parser.syntax("end of input"));
        }
        Ok(ty)
    }
}

/// Recursive-descent parser over renderings such as
/// `MapType(StringType(), ArrayType(LongType(), true), false)`.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

/// Deepest array/map nesting accepted by the parser.
pub const MAX_NESTING_DEPTH: usize = 32;

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn syntax(&self, expected: &'static str) -> ParseNativeError {
        ParseNativeError::Syntax {
            input: self.input.to_string(),
            offset: self.pos,
            expected,
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, expected: &'static str) -> Result<(), ParseNativeError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.syntax(expected))
        }
    }

    fn ident(&mut self) -> Result<&'a str, ParseNativeError> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.syntax("type name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn number(&mut self) -> Result<u8, ParseNativeError> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let value = rest[..len]
            .parse::<u8>()
            .map_err(|_| self.syntax("integer"))?;
        self.pos += len;
        Ok(value)
    }

    fn flag(&mut self) -> Result<bool, ParseNativeError> {
        match self.ident()? {
            "true" | "True" => Ok(true),
            "false" | "False" => Ok(false),
            _ => Err(self.syntax("boolean")),
        }
    }

    fn native(&mut self) -> Result<NativeType, ParseNativeError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseNativeError::TooDeep(MAX_NESTING_DEPTH));
        }
        self.depth += 1;
        let ty = self.native_inner();
        self.depth -= 1;
        ty
    }

    fn native_inner(&mut self) -> Result<NativeType, ParseNativeError> {
        let name = self.ident()?;
        match name {
            "DecimalType" => {
                if !self.eat('(') {
                    return Ok(NativeType::DEFAULT_DECIMAL);
                }
                if self.eat(')') {
                    return Ok(NativeType::DEFAULT_DECIMAL);
                }
                let precision = self.number()?;
                let scale = if self.eat(',') {
                    self.number()?
                } else {
                    DEFAULT_DECIMAL_SCALE
                };
                self.expect(')', "')'")?;
                NativeType::decimal(precision, scale)
            }
            "ArrayType" => {
                self.expect('(', "'('")?;
                let element = self.native()?;
                let contains_null = if self.eat(',') { self.flag()? } else { true };
                self.expect(')', "')'")?;
                Ok(NativeType::array(element, contains_null))
            }
            "MapType" => {
                self.expect('(', "'('")?;
                let key = self.native()?;
                self.expect(',', "','")?;
                let value = self.native()?;
                let value_contains_null = if self.eat(',') { self.flag()? } else { true };
                self.expect(')', "')'")?;
                Ok(NativeType::map(key, value, value_contains_null))
            }
            "DayTimeIntervalType" => {
                if self.eat('(') && !self.eat(')') {
                    // Only the full day-to-second range is supported.
                    let start = self.number()?;
                    self.expect(',', "','")?;
                    let end = self.number()?;
                    self.expect(')', "')'")?;
                    if (start, end) != (0, 3) {
                        return Err(ParseNativeError::UnknownType(format!(
                            "DayTimeIntervalType({}, {})",
                            start, end
                        )));
                    }
                }
                Ok(NativeType::DayTimeInterval)
            }
            other => {
                let ty = NativeType::simple_from_name(other)
                    .ok_or_else(|| ParseNativeError::UnknownType(other.to_string()))?;
                if self.eat('(') {
                    self.expect(')', "')'")?;
                }
                Ok(ty)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
