// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical logical data types.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::Result;
use crate::native::{is_parameterized_family, NativeType};
use crate::warnings::{self, CompatWarning};

/// Engine-independent representation of a column data type.
///
/// A `DataType` is a logical name plus the native type it stands for.
/// Family templates (`decimal`, `array`, `map`) carry no native type since
/// their members need construction arguments.
///
/// Equality follows the native type when both sides have one, so two
/// values wrapping the same native representation are always equal.
/// Templates compare by name.
#[derive(Debug, Clone)]
pub struct DataType {
    name: &'static str,
    native: Option<NativeType>,
}

impl DataType {
    /// Registered type backed by a concrete native type.
    pub const fn new(name: &'static str, native: NativeType) -> Self {
        Self {
            name,
            native: Some(native),
        }
    }

    /// Template for a parameterized family, e.g. `DataType::family("decimal")`.
    pub const fn family(name: &'static str) -> Self {
        Self { name, native: None }
    }

    /// Decimal with explicit precision and scale.
    pub fn decimal(precision: u8, scale: u8) -> Result<Self> {
        Ok(Self::parameterized(NativeType::decimal(precision, scale)?))
    }

    /// Array of `element`.
    pub fn array(element: NativeType, contains_null: bool) -> Self {
        Self::parameterized(NativeType::array(element, contains_null))
    }

    /// Map from `key` to `value`.
    pub fn map(key: NativeType, value: NativeType, value_contains_null: bool) -> Self {
        Self::parameterized(NativeType::map(key, value, value_contains_null))
    }

    pub(crate) fn parameterized(native: NativeType) -> Self {
        Self {
            name: native.type_name(),
            native: Some(native),
        }
    }

    /// Wrap a native type directly, bypassing the engine registry.
    ///
    /// This path is deprecated: it raises a [`CompatWarning`] and may fail
    /// with `CompatibilityWarning` when warnings are escalated to errors.
    /// Prefer [`Engine::dtype`](crate::Engine::dtype).
    ///
    /// A string is read as the native rendering (`"LongType()"`).
    pub fn from_native<'a>(repr: impl Into<NativeRepr<'a>>) -> Result<Self> {
        let native = repr.into().into_native()?;
        warnings::warn(CompatWarning::direct_construction(&native.to_string()))?;
        Ok(Self {
            name: native.type_name(),
            native: Some(native.into_owned()),
        })
    }

    /// Logical name (`"int32"`, `"decimal"`, ...).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Native type, absent for family templates.
    pub fn native_type(&self) -> Option<&NativeType> {
        self.native.as_ref()
    }

    /// Family name: the native family when present, else the logical name.
    pub fn family_name(&self) -> &'static str {
        match &self.native {
            Some(native) => native.type_name(),
            None => self.name,
        }
    }

    /// True for family templates and members of `decimal`, `array`, `map`.
    pub fn is_parameterized(&self) -> bool {
        match &self.native {
            Some(native) => native.is_parameterized(),
            None => true,
        }
    }

    /// True for a template that stands for a whole family.
    pub fn is_template(&self) -> bool {
        self.native.is_none()
    }

    /// Whether `other` satisfies this type.
    ///
    /// A family template accepts every member of its family; otherwise the
    /// types must be equal (decimals compare precision and scale).
    pub fn check(&self, other: &DataType) -> bool {
        if self == other {
            return true;
        }
        match (&self.native, &other.native) {
            (None, Some(native)) => {
                is_parameterized_family(self.name) && native.type_name() == self.name
            }
            _ => false,
        }
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        match (&self.native, &other.native) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.name == other.name,
            _ => false,
        }
    }
}

impl Eq for DataType {}

impl Hash for DataType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.native {
            Some(native) => native.hash(state),
            None => self.name.hash(state),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.native {
            Some(native) => write!(f, "{}", native),
            None => f.write_str(self.name),
        }
    }
}

// ---------------------------------------------------------------------------
// NativeRepr
// ---------------------------------------------------------------------------

/// A native type given as a value or as its string rendering.
#[derive(Debug, Clone, Copy)]
pub enum NativeRepr<'a> {
    Type(&'a NativeType),
    Text(&'a str),
}

impl<'a> NativeRepr<'a> {
    fn into_native(self) -> Result<Cow<'a, NativeType>> {
        match self {
            NativeRepr::Type(native) => Ok(Cow::Borrowed(native)),
            NativeRepr::Text(text) => Ok(Cow::Owned(text.parse()?)),
        }
    }
}

impl<'a> From<&'a NativeType> for NativeRepr<'a> {
    fn from(native: &'a NativeType) -> Self {
        NativeRepr::Type(native)
    }
}

impl<'a> From<&'a str> for NativeRepr<'a> {
    fn from(text: &'a str) -> Self {
        NativeRepr::Text(text)
    }
}

impl<'a> From<&'a String> for NativeRepr<'a> {
    fn from(text: &'a String) -> Self {
        NativeRepr::Text(text.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
