// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conversions between ether denominations.
//!
//! Amounts are exact: decimal strings are parsed into an integer number of wei and
//! formatted back without rounding.

use std::{fmt, str::FromStr};

use alloy_primitives::U256;

use crate::error::UnitError;

/// An ether denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Wei,
    Kwei,
    Mwei,
    Gwei,
    Szabo,
    Finney,
    Ether,
}

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::Wei,
        Unit::Kwei,
        Unit::Mwei,
        Unit::Gwei,
        Unit::Szabo,
        Unit::Finney,
        Unit::Ether,
    ];

    /// Number of decimal places between this unit and wei.
    pub const fn decimals(self) -> usize {
        match self {
            Unit::Wei => 0,
            Unit::Kwei => 3,
            Unit::Mwei => 6,
            Unit::Gwei => 9,
            Unit::Szabo => 12,
            Unit::Finney => 15,
            Unit::Ether => 18,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Unit::Wei => "wei",
            Unit::Kwei => "kwei",
            Unit::Mwei => "mwei",
            Unit::Gwei => "gwei",
            Unit::Szabo => "szabo",
            Unit::Finney => "finney",
            Unit::Ether => "ether",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wei" => Ok(Unit::Wei),
            "kwei" | "babbage" => Ok(Unit::Kwei),
            "mwei" | "lovelace" => Ok(Unit::Mwei),
            "gwei" | "shannon" => Ok(Unit::Gwei),
            "szabo" | "microether" => Ok(Unit::Szabo),
            "finney" | "milliether" => Ok(Unit::Finney),
            "ether" | "eth" => Ok(Unit::Ether),
            _ => Err(UnitError::UnknownUnit(s.to_string())),
        }
    }
}

/// Parses a non-negative decimal number into an integer scaled by `10^decimals`.
pub fn parse_decimal(amount: &str, decimals: usize) -> Result<U256, UnitError> {
    let invalid = || UnitError::InvalidNumber(amount.to_string());

    let trimmed = amount.trim();
    let (integer, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if integer.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals {
        return Err(UnitError::TooManyDecimals { max: decimals });
    }

    let scale = pow10(decimals)?;
    let integer = parse_digits(integer)?;
    let fraction = parse_digits(fraction)?
        .checked_mul(pow10(decimals - fraction.len())?)
        .ok_or(UnitError::Overflow)?;
    integer
        .checked_mul(scale)
        .and_then(|value| value.checked_add(fraction))
        .ok_or(UnitError::Overflow)
}

/// Formats `value / 10^decimals` as a decimal number without trailing zeros.
pub fn format_decimal(value: U256, decimals: usize) -> String {
    let digits = value.to_string();
    if decimals == 0 {
        return digits;
    }
    let digits = format!("{digits:0>width$}", width = decimals + 1);
    let (integer, fraction) = digits.split_at(digits.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}

/// Parses an amount expressed in `unit` into wei.
pub fn parse_units(amount: &str, unit: Unit) -> Result<U256, UnitError> {
    parse_decimal(amount, unit.decimals())
}

/// Formats a wei amount in `unit`.
pub fn format_units(wei: U256, unit: Unit) -> String {
    format_decimal(wei, unit.decimals())
}

/// Converts a decimal amount between two denominations, e.g. `convert(Wei, Ether, "1")`.
pub fn convert(from: Unit, to: Unit, amount: &str) -> Result<String, UnitError> {
    Ok(format_units(parse_units(amount, from)?, to))
}

/// Parses an amount with an optional unit suffix, such as `1.5ether`, `20 gwei` or `100`
/// (wei), into wei.
pub fn parse_amount(amount: &str) -> Result<U256, UnitError> {
    let amount = amount.trim();
    match amount.find(|c: char| c.is_ascii_alphabetic()) {
        Some(split) => {
            let (number, unit) = amount.split_at(split);
            parse_units(number, unit.parse()?)
        }
        None => parse_units(amount, Unit::Wei),
    }
}

fn parse_digits(digits: &str) -> Result<U256, UnitError> {
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10).map_err(|_| UnitError::Overflow)
}

fn pow10(exp: usize) -> Result<U256, UnitError> {
    U256::from(10)
        .checked_pow(U256::from(exp))
        .ok_or(UnitError::Overflow)
}
