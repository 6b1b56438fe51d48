//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random
//! but valid instances of core Rolecast types for property testing.
//!
//! Copyright (c) 2025 Rolecast Team
//! Licensed under the Apache-2.0 license

#![cfg(test)]

use crate::access::RoleSet;
use crate::value::{FieldType, FloatWidth, IntWidth, Value};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;

/// Strategy for generating integer widths
pub fn int_width_strategy() -> impl Strategy<Value = IntWidth> {
    prop_oneof![
        Just(IntWidth::W8),
        Just(IntWidth::W16),
        Just(IntWidth::W32),
        Just(IntWidth::W64),
        Just(IntWidth::Size),
    ]
}

/// Strategy for generating float widths
pub fn float_width_strategy() -> impl Strategy<Value = FloatWidth> {
    prop_oneof![Just(FloatWidth::F32), Just(FloatWidth::F64)]
}

/// Strategy for generating numeric field types
pub fn numeric_type_strategy() -> impl Strategy<Value = FieldType> {
    prop_oneof![
        int_width_strategy().prop_map(FieldType::Int),
        int_width_strategy().prop_map(FieldType::Uint),
        float_width_strategy().prop_map(FieldType::Float),
    ]
}

/// Strategy for generating in-range signed integer values
pub fn int_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i8>().prop_map(|v| Value::Int(IntWidth::W8, v.into())),
        any::<i16>().prop_map(|v| Value::Int(IntWidth::W16, v.into())),
        any::<i32>().prop_map(|v| Value::Int(IntWidth::W32, v.into())),
        any::<i64>().prop_map(|v| Value::Int(IntWidth::W64, v)),
    ]
}

/// Strategy for generating scalar values of any supported kind
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        int_value_strategy(),
        any::<u32>().prop_map(|v| Value::Uint(IntWidth::W32, v.into())),
        (-1.0e6f64..1.0e6).prop_map(|v| Value::Float(FloatWidth::F64, v)),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ]
}

/// Strategy for generating homogeneous string sequences
pub fn string_seq_strategy() -> impl Strategy<Value = Value> {
    vec("[a-z]{0,8}", 0..6).prop_map(|items| {
        Value::Seq(FieldType::String, items.into_iter().map(Value::String).collect())
    })
}

/// Strategy for generating role names
pub fn role_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// Strategy for generating role sets
pub fn role_set_strategy() -> impl Strategy<Value = RoleSet> {
    btree_set(role_strategy(), 0..4).prop_map(|roles| roles.into_iter().collect())
}

/// Strategy for generating access expression tokens
pub fn access_token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => role_strategy(),
        2 => role_strategy().prop_map(|role| format!("!{}", role)),
        1 => Just("*".to_string()),
        1 => Just(String::new()),
    ]
}

/// Strategy for generating access expressions, with irregular spacing
pub fn access_expression_strategy() -> impl Strategy<Value = String> {
    vec((access_token_strategy(), " {0,2}"), 0..5).prop_map(|tokens| {
        tokens
            .into_iter()
            .map(|(token, pad)| format!("{}{}{}", pad, token, pad))
            .collect::<Vec<_>>()
            .join(",")
    })
}
